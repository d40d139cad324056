//! RGBA color type with hex-string serialization and the default palette.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum). Colors
/// serialize as CSS-style hex strings (`#rrggbb` or `#rrggbbaa`) so object
/// snapshots and config files stay human-readable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components in the 0.0 to 1.0 range.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color from 8-bit RGB components.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Returns the color as 8-bit RGBA components for rasterization.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Whether the color contributes any visible pixels.
    pub fn is_visible(&self) -> bool {
        self.a > 0.0
    }

    /// Formats the color as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color string '{}'", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, or the keyword `transparent`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case("transparent") {
            return Ok(TRANSPARENT);
        }

        let hex = raw
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(raw.to_string()))?;
        let err = || ParseColorError(raw.to_string());
        let channel = |chunk: &str| u8::from_str_radix(chunk, 16).map_err(|_| err());

        let (r, g, b, a) = match hex.len() {
            3 => {
                let digit = |i: usize| channel(&hex[i..i + 1].repeat(2));
                (digit(0)?, digit(1)?, digit(2)?, 255)
            }
            6 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            ),
            8 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            ),
            _ => return Err(err()),
        };

        Ok(Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        })
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Default Palette
// ============================================================================

/// Accent blue used as the default stroke for new shapes.
pub const ACCENT: Color = Color::from_rgb8(0x18, 0x90, 0xff);

/// Dark gray used as the default text fill.
pub const TEXT_FILL: Color = Color::from_rgb8(0x33, 0x33, 0x33);

/// Red stroke for step markers.
pub const STEP_STROKE: Color = Color::from_rgb8(0xff, 0x4d, 0x4f);

/// Gray stroke around mosaic blocks.
pub const MOSAIC_STROKE: Color = Color::from_rgb8(0x66, 0x66, 0x66);

/// Semi-transparent gray placeholder fill for mosaic blocks.
pub const MOSAIC_FILL: Color = Color {
    r: 128.0 / 255.0,
    g: 128.0 / 255.0,
    b: 128.0 / 255.0,
    a: 0.8,
};

/// Default gradient start color (warm red).
pub const GRADIENT_START: Color = Color::from_rgb8(0xff, 0x6b, 0x6b);

/// Default gradient end color (teal).
pub const GRADIENT_END: Color = Color::from_rgb8(0x4e, 0xcd, 0xc4);

/// Opaque white (step marker fill).
pub const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);

/// Fully transparent color (default shape fill).
pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!("#333".parse::<Color>().unwrap(), TEXT_FILL);
        assert_eq!("#1890ff".parse::<Color>().unwrap(), ACCENT);
        let semi = "#00000080".parse::<Color>().unwrap();
        assert!((semi.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn parses_transparent_keyword() {
        assert_eq!("transparent".parse::<Color>().unwrap(), TRANSPARENT);
        assert!(!TRANSPARENT.is_visible());
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("1890ff".parse::<Color>().is_err());
        assert!("#18ff".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn hex_round_trip() {
        let c: Color = "#ff4d4f".parse().unwrap();
        assert_eq!(c.to_hex(), "#ff4d4f");
        assert_eq!(c.to_rgba8(), [0xff, 0x4d, 0x4f, 0xff]);
    }
}
