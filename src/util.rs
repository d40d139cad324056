//! Geometry helpers shared across the canvas engine.
//!
//! This module provides:
//! - The world/screen-space [`Point`] type
//! - Arrowhead geometry calculations for arrow rendering
//! - Rectangle normalization for drag-in-any-direction shapes

use serde::{Deserialize, Serialize};

/// A 2D point in either world or screen space.
///
/// Which space a point lives in is determined by context; the transform
/// functions in [`crate::canvas::transform`] convert between the two.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Calculates arrowhead points with custom length and angle.
///
/// Creates a V-shaped arrowhead at position (x1, y1) pointing in the direction
/// from (x2, y2) to (x1, y1). The arrowhead length is automatically capped at
/// 30% of the line length to prevent weird-looking arrows on short lines.
///
/// # Arguments
/// * `x1` - Arrowhead tip X coordinate
/// * `y1` - Arrowhead tip Y coordinate
/// * `x2` - Arrow tail X coordinate
/// * `y2` - Arrow tail Y coordinate
/// * `length` - Desired arrowhead length (capped at 30% of line length)
/// * `angle_degrees` - Angle between the arrowhead lines and the main line
///
/// # Returns
/// Array of two points `[(left_x, left_y), (right_x, right_y)]` for the
/// arrowhead lines. If the line is too short (< 1 unit), both points equal
/// (x1, y1).
pub fn calculate_arrowhead(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    length: f64,
    angle_degrees: f64,
) -> [(f64, f64); 2] {
    let dx = x1 - x2; // Direction from END to START (reversed)
    let dy = y1 - y2;
    let line_length = (dx * dx + dy * dy).sqrt();

    if line_length < 1.0 {
        // Line too short for arrowhead
        return [(x1, y1), (x1, y1)];
    }

    // Normalize direction vector (pointing from end to start)
    let ux = dx / line_length;
    let uy = dy / line_length;

    let arrow_length = length.min(line_length * 0.3);

    let angle = angle_degrees.to_radians();
    let cos_a = angle.cos();
    let sin_a = angle.sin();

    // Left side of arrowhead (at START point)
    let left_x = x1 - arrow_length * (ux * cos_a - uy * sin_a);
    let left_y = y1 - arrow_length * (uy * cos_a + ux * sin_a);

    // Right side of arrowhead (at START point)
    let right_x = x1 - arrow_length * (ux * cos_a + uy * sin_a);
    let right_y = y1 - arrow_length * (uy * cos_a - ux * sin_a);

    [(left_x, left_y), (right_x, right_y)]
}

// ============================================================================
// Rectangle Normalization
// ============================================================================

/// Normalizes a possibly-negative width/height rectangle to positive extents.
///
/// Box-like objects keep their raw drag dimensions (which can be negative when
/// the user drags up/left); rendering and hit math want the normalized form.
///
/// # Returns
/// Tuple `(x, y, w, h)` where `w` and `h` are non-negative.
pub fn normalize_rect(x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
    let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
    let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrowhead_caps_at_thirty_percent_of_line_length() {
        let [(lx, ly), _] = calculate_arrowhead(10.0, 10.0, 0.0, 10.0, 100.0, 30.0);
        let distance = ((10.0 - lx).powi(2) + (10.0 - ly).powi(2)).sqrt();
        assert!((distance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn arrowhead_handles_degenerate_lines() {
        let [(lx, ly), (rx, ry)] = calculate_arrowhead(5.0, 5.0, 5.0, 5.0, 15.0, 45.0);
        assert_eq!((lx, ly), (5.0, 5.0));
        assert_eq!((rx, ry), (5.0, 5.0));
    }

    #[test]
    fn normalize_rect_flips_negative_extents() {
        assert_eq!(normalize_rect(10.0, 10.0, -4.0, -6.0), (6.0, 4.0, 4.0, 6.0));
        assert_eq!(normalize_rect(1.0, 2.0, 3.0, 4.0), (1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
    }
}
