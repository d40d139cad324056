//! Headless command-line driver: load a backdrop image, render the canvas
//! scene, and write the exported PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use markstage::config::Config;
use markstage::input::EditorState;
use markstage::{background, export};

#[derive(Parser, Debug)]
#[command(
    name = "markstage",
    version,
    about = "Annotation canvas engine: load a backdrop and export the rendered scene as PNG"
)]
struct Cli {
    /// Path or http(s) URL of the backdrop image
    image: String,

    /// Output PNG path (defaults to a timestamped name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Explicit configuration file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "800x600")]
    viewport: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut editor = EditorState::from_config(&config);
    let (width, height) = parse_viewport(&cli.viewport)?;
    editor.set_viewport(width, height);

    let max_bytes = config.canvas.max_background_bytes;
    let raster = if cli.image.starts_with("http://") || cli.image.starts_with("https://") {
        background::load_from_url(&cli.image, max_bytes)?
    } else {
        background::load_from_path(Path::new(&cli.image), max_bytes)?
    };
    editor.load_background(raster);

    let bytes = export::export_png(&mut editor)?;
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(export::export_file_name()));
    std::fs::write(&output, &bytes)
        .with_context(|| format!("cannot write {}", output.display()))?;
    info!("wrote {} ({} bytes)", output.display(), bytes.len());
    println!("{}", output.display());
    Ok(())
}

fn parse_viewport(raw: &str) -> Result<(f64, f64)> {
    let Some((w, h)) = raw.split_once('x') else {
        bail!("viewport must be WIDTHxHEIGHT, got '{raw}'");
    };
    let width: f64 = w.parse().with_context(|| format!("bad width '{w}'"))?;
    let height: f64 = h.parse().with_context(|| format!("bad height '{h}'"))?;
    if width < 1.0 || height < 1.0 {
        bail!("viewport must be at least 1x1");
    }
    Ok((width, height))
}
