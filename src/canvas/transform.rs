//! Screen ⇄ world coordinate transforms and zoom math.
//!
//! Objects always store world-space geometry; the view applies
//! `screen = world * zoom + pan` once at the canvas root. These functions are
//! the exact inverses of each other (round-trip within floating-point
//! tolerance).

use crate::util::Point;

/// Minimum zoom factor the view may reach.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom factor the view may reach.
pub const MAX_ZOOM: f64 = 5.0;

/// Converts a screen-space point to world space under the given view.
pub fn screen_to_world(screen: Point, pan: Point, zoom: f64) -> Point {
    Point::new((screen.x - pan.x) / zoom, (screen.y - pan.y) / zoom)
}

/// Converts a world-space point to screen space under the given view.
pub fn world_to_screen(world: Point, pan: Point, zoom: f64) -> Point {
    Point::new(world.x * zoom + pan.x, world.y * zoom + pan.y)
}

/// Computes a zoom step that keeps the world point under `anchor` fixed.
///
/// `delta` is added to the current zoom and the result clamped to
/// [`MIN_ZOOM`]..=[`MAX_ZOOM`]. Returns the new `(zoom, pan)` pair, or `None`
/// when clamping left the zoom unchanged; in that case the pan must not be
/// recomputed either (idempotence guard).
pub fn zoom_around(zoom: f64, pan: Point, delta: f64, anchor: Point) -> Option<(f64, Point)> {
    let new_zoom = (zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    if new_zoom == zoom {
        return None;
    }

    // World point currently under the anchor stays under the anchor.
    let world_anchor = screen_to_world(anchor, pan, zoom);
    let new_pan = Point::new(
        anchor.x - world_anchor.x * new_zoom,
        anchor.y - world_anchor.y * new_zoom,
    );
    Some((new_zoom, new_pan))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_world_round_trip() {
        let pans = [Point::new(0.0, 0.0), Point::new(-35.5, 120.25)];
        let zooms = [0.1, 0.7, 1.0, 2.5, 5.0];
        let p = Point::new(123.456, -78.9);

        for pan in pans {
            for zoom in zooms {
                let rt = world_to_screen(screen_to_world(p, pan, zoom), pan, zoom);
                assert!((rt.x - p.x).abs() < 1e-9, "x mismatch at zoom {zoom}");
                assert!((rt.y - p.y).abs() < 1e-9, "y mismatch at zoom {zoom}");
            }
        }
    }

    #[test]
    fn screen_click_resolves_to_halved_world_at_double_zoom() {
        // Screen (40,40) with zoom=2, pan=(0,0) is world (20,20).
        let world = screen_to_world(Point::new(40.0, 40.0), Point::new(0.0, 0.0), 2.0);
        assert_eq!(world, Point::new(20.0, 20.0));
    }

    #[test]
    fn zoom_around_keeps_anchor_fixed() {
        let anchor = Point::new(400.0, 300.0);
        let pan = Point::new(25.0, -10.0);
        let zoom = 1.3;

        let world_before = screen_to_world(anchor, pan, zoom);
        let (new_zoom, new_pan) = zoom_around(zoom, pan, 0.4, anchor).unwrap();
        let world_after = screen_to_world(anchor, new_pan, new_zoom);

        assert!((world_before.x - world_after.x).abs() < 1e-9);
        assert!((world_before.y - world_after.y).abs() < 1e-9);
    }

    #[test]
    fn clamp_at_limits_leaves_pan_untouched() {
        let anchor = Point::new(100.0, 100.0);
        let pan = Point::new(5.0, 5.0);

        assert!(zoom_around(MAX_ZOOM, pan, 0.1, anchor).is_none());
        assert!(zoom_around(MIN_ZOOM, pan, -0.1, anchor).is_none());

        // A delta that overshoots still moves zoom to the clamp boundary.
        let (zoom, _) = zoom_around(4.95, pan, 0.1, anchor).unwrap();
        assert_eq!(zoom, MAX_ZOOM);
    }
}
