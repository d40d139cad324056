//! Configuration file support for markstage.
//!
//! Handles loading and validating user settings from
//! `~/.config/markstage/config.toml`. Settings cover drawing defaults,
//! canvas limits, and export options. If no config file exists, sensible
//! defaults are used automatically.
//!
//! # Example TOML
//! ```toml
//! [drawing]
//! accent_color = "#1890ff"
//! stroke_width = 2.0
//! font_size = 40.0
//! font_family = "Arial"
//!
//! [canvas]
//! max_background_bytes = 10485760
//!
//! [export]
//! pixel_ratio = 2
//! ```

use crate::draw::color;
use crate::draw::{Color, FactoryDefaults};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure containing all user settings.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Drawing tool defaults (colors, stroke width, font)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Canvas input limits
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// PNG export options
    #[serde(default)]
    pub export: ExportConfig,
}

/// Drawing-related settings applied to newly created objects.
#[derive(Debug, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Stroke color for new shapes, as a hex string like `#1890ff`
    #[serde(default = "default_accent")]
    pub accent_color: Color,

    /// Stroke width for new shapes (valid range: 0.5 - 20.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Fill color for new text objects
    #[serde(default = "default_text_fill")]
    pub text_fill: Color,

    /// Font size for new text objects (valid range: 8.0 - 200.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Font family name for text rendering
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Placeholder content for new text objects
    #[serde(default = "default_text_placeholder")]
    pub text_placeholder: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent(),
            stroke_width: default_stroke_width(),
            text_fill: default_text_fill(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            text_placeholder: default_text_placeholder(),
        }
    }
}

/// Canvas input limits.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Maximum accepted background file size in bytes (default 10 MiB)
    #[serde(default = "default_max_background_bytes")]
    pub max_background_bytes: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            max_background_bytes: default_max_background_bytes(),
        }
    }
}

/// PNG export options.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Pixel density multiplier for exported rasters (valid range: 1 - 4)
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: default_pixel_ratio(),
        }
    }
}

fn default_accent() -> Color {
    color::ACCENT
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_text_fill() -> Color {
    color::TEXT_FILL
}

fn default_font_size() -> f64 {
    40.0
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_text_placeholder() -> String {
    "Text".to_string()
}

fn default_max_background_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_pixel_ratio() -> u32 {
    2
}

impl Config {
    /// Loads the configuration from the default path, falling back to
    /// defaults when the file is missing.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                debug!("No config file at {}; using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("Could not resolve config directory; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads and validates the configuration from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate();
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config file location: `~/.config/markstage/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("markstage").join("config.toml"))
    }

    /// Clamps all values to acceptable ranges, warning on adjustments.
    pub fn validate(&mut self) {
        let stroke = self.drawing.stroke_width;
        self.drawing.stroke_width = stroke.clamp(0.5, 20.0);
        if self.drawing.stroke_width != stroke {
            warn!(
                "stroke_width {} out of range, clamped to {}",
                stroke, self.drawing.stroke_width
            );
        }

        let font = self.drawing.font_size;
        self.drawing.font_size = font.clamp(8.0, 200.0);
        if self.drawing.font_size != font {
            warn!(
                "font_size {} out of range, clamped to {}",
                font, self.drawing.font_size
            );
        }

        let ratio = self.export.pixel_ratio;
        self.export.pixel_ratio = ratio.clamp(1, 4);
        if self.export.pixel_ratio != ratio {
            warn!(
                "pixel_ratio {} out of range, clamped to {}",
                ratio, self.export.pixel_ratio
            );
        }
    }

    /// Factory defaults derived from the drawing section.
    pub fn factory_defaults(&self) -> FactoryDefaults {
        FactoryDefaults {
            accent: self.drawing.accent_color,
            stroke_width: self.drawing.stroke_width,
            text_fill: self.drawing.text_fill,
            font_size: self.drawing.font_size,
            font_family: self.drawing.font_family.clone(),
            text_placeholder: self.drawing.text_placeholder.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_palette() {
        let config = Config::default();
        assert_eq!(config.drawing.accent_color, color::ACCENT);
        assert_eq!(config.drawing.stroke_width, 2.0);
        assert_eq!(config.canvas.max_background_bytes, 10 * 1024 * 1024);
        assert_eq!(config.export.pixel_ratio, 2);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let mut config: Config = toml::from_str(
            r##"
            [drawing]
            accent_color = "#ff0000"
            "##,
        )
        .unwrap();
        config.validate();
        assert_eq!(config.drawing.accent_color, Color::from_rgb8(255, 0, 0));
        assert_eq!(config.drawing.stroke_width, 2.0);
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        let mut config: Config = toml::from_str(
            r#"
            [drawing]
            stroke_width = 99.0
            font_size = 1.0

            [export]
            pixel_ratio = 10
            "#,
        )
        .unwrap();
        config.validate();
        assert_eq!(config.drawing.stroke_width, 20.0);
        assert_eq!(config.drawing.font_size, 8.0);
        assert_eq!(config.export.pixel_ratio, 4);
    }
}
