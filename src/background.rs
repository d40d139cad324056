//! Background image intake: validation, decoding, and viewport placement.
//!
//! Payloads are validated before any decode work happens: an unrecognizable
//! format or an oversized payload is rejected as invalid input, and only a
//! recognized payload that then fails to decode reports a decode failure.

use std::io::Read;
use std::path::Path;

use image::RgbaImage;
use log::{debug, info};

use crate::error::EditorError;

/// Computed world-space placement for a loaded background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Uniform fit scale, at most 1 (images are never scaled up).
    pub scale: f64,
}

/// Validates and decodes an image payload into an RGBA raster.
///
/// # Arguments
/// * `bytes` - Raw encoded image data (PNG, JPEG, WebP, GIF, or BMP)
/// * `max_bytes` - Size cap; larger payloads are rejected before decoding
pub fn decode(bytes: &[u8], max_bytes: u64) -> Result<RgbaImage, EditorError> {
    if bytes.len() as u64 > max_bytes {
        return Err(EditorError::InvalidInput(format!(
            "image payload is {} bytes, limit is {max_bytes}",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| EditorError::InvalidInput("payload is not a recognized image".into()))?;
    debug!("decoding {} byte {format:?} payload", bytes.len());

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| EditorError::DecodeFailure(e.to_string()))?;
    Ok(decoded.into_rgba8())
}

/// Reads and decodes a background image from a file on disk.
pub fn load_from_path(path: &Path, max_bytes: u64) -> Result<RgbaImage, EditorError> {
    let bytes = std::fs::read(path)
        .map_err(|e| EditorError::InvalidInput(format!("{}: {e}", path.display())))?;
    info!("loading background from {}", path.display());
    decode(&bytes, max_bytes)
}

/// Fetches and decodes a background image over HTTP(S).
///
/// The remote raster is decoded locally, so the resulting pixels carry no
/// origin taint and remain exportable.
pub fn load_from_url(url: &str, max_bytes: u64) -> Result<RgbaImage, EditorError> {
    info!("fetching background from {url}");
    let response = ureq::get(url)
        .call()
        .map_err(|e| EditorError::InvalidInput(format!("{url}: {e}")))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(max_bytes + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| EditorError::InvalidInput(format!("{url}: {e}")))?;
    decode(&bytes, max_bytes)
}

/// Computes the centered, fit-to-viewport placement for a raster.
///
/// The scale is `min(vw/iw, vh/ih, 1)`: the image shrinks to fit entirely
/// inside the viewport but is never enlarged.
pub fn fit_to_viewport(width: u32, height: u32, viewport: (f64, f64)) -> Placement {
    let (vw, vh) = viewport;
    let iw = f64::from(width.max(1));
    let ih = f64::from(height.max(1));
    let scale = (vw / iw).min(vh / ih).min(1.0);
    Placement {
        x: (vw - iw * scale) / 2.0,
        y: (vh - ih * scale) / 2.0,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_a_valid_png() {
        let raster = decode(&png_bytes(8, 4), 10 * 1024 * 1024).unwrap();
        assert_eq!(raster.dimensions(), (8, 4));
        assert_eq!(raster.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn rejects_oversized_payloads_before_decoding() {
        let bytes = png_bytes(8, 8);
        let err = decode(&bytes, 4).unwrap_err();
        assert!(matches!(err, EditorError::InvalidInput(_)));
    }

    #[test]
    fn rejects_non_image_payloads() {
        let err = decode(b"definitely not an image", 1024).unwrap_err();
        assert!(matches!(err, EditorError::InvalidInput(_)));
    }

    #[test]
    fn truncated_image_is_a_decode_failure() {
        let mut bytes = png_bytes(64, 64);
        bytes.truncate(bytes.len() / 2);
        let err = decode(&bytes, 1024 * 1024).unwrap_err();
        assert!(matches!(err, EditorError::DecodeFailure(_)));
    }

    #[test]
    fn small_image_is_centered_without_upscaling() {
        let placement = fit_to_viewport(200, 100, (800.0, 600.0));
        assert_eq!(placement.scale, 1.0);
        assert_eq!(placement.x, 300.0);
        assert_eq!(placement.y, 250.0);
    }

    #[test]
    fn large_image_shrinks_to_fit() {
        let placement = fit_to_viewport(1600, 600, (800.0, 600.0));
        assert_eq!(placement.scale, 0.5);
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 150.0);
    }
}
