//! Object factory: constructs new annotation objects with per-type defaults.

use super::color::{
    self, Color, GRADIENT_END, GRADIENT_START, MOSAIC_FILL, MOSAIC_STROKE, STEP_STROKE, WHITE,
};
use super::object::{AnnotationObject, GradientDirection, IdAllocator, ToolKind};
use crate::util::Point;

/// Style defaults applied to freshly created objects.
///
/// Sourced from the drawing section of the config file; falls back to the
/// built-in palette.
#[derive(Debug, Clone)]
pub struct FactoryDefaults {
    /// Stroke color for new shapes.
    pub accent: Color,
    /// Stroke width for new shapes in world units.
    pub stroke_width: f64,
    /// Fill color for new text objects.
    pub text_fill: Color,
    /// Font size for new text objects.
    pub font_size: f64,
    /// Font family for new text objects.
    pub font_family: String,
    /// Placeholder content for new text objects.
    pub text_placeholder: String,
}

impl Default for FactoryDefaults {
    fn default() -> Self {
        Self {
            accent: color::ACCENT,
            stroke_width: 2.0,
            text_fill: color::TEXT_FILL,
            font_size: 40.0,
            font_family: "Arial".to_string(),
            text_placeholder: "Text".to_string(),
        }
    }
}

/// Computes the z-index for a newly created object: one above the current top.
pub fn next_z_index(existing: &[AnnotationObject]) -> i64 {
    existing.iter().map(|obj| obj.z_index).max().unwrap_or(0) + 1
}

/// Generates a display name for a new layer, e.g. `"Rectangle 3"`.
pub fn generate_layer_name(kind: ToolKind, index: usize) -> String {
    format!("{} {}", kind.label(), index)
}

/// Constructs a new annotation object of the given tool kind at a world
/// position, applying per-type defaults.
///
/// The object is a draft: it is not inserted into any store. Box kinds start
/// at zero size and grow during the drag; line/arrow start as a degenerate
/// zero-length segment; pen starts with a single point. Image objects only
/// reserve geometry here; pixel data is attached later, once decoded.
///
/// Non-shape kinds (select/drag) yield the unshaped base object; callers
/// treat such a draw as a no-op.
pub fn create(
    kind: ToolKind,
    pos: Point,
    existing: &[AnnotationObject],
    ids: &mut IdAllocator,
    defaults: &FactoryDefaults,
) -> AnnotationObject {
    let mut obj = AnnotationObject {
        id: ids.fresh(),
        kind,
        x: pos.x,
        y: pos.y,
        width: None,
        height: None,
        points: None,
        stroke: None,
        stroke_width: None,
        fill: None,
        text: None,
        font_size: None,
        font_family: None,
        rotation: None,
        scale_x: None,
        scale_y: None,
        step_number: None,
        mosaic_size: None,
        gradient_colors: None,
        gradient_direction: None,
        image: None,
        z_index: next_z_index(existing),
        locked: false,
        visible: true,
        name: generate_layer_name(kind, existing.len() + 1),
    };

    match kind {
        ToolKind::Rectangle | ToolKind::Circle => {
            obj.width = Some(0.0);
            obj.height = Some(0.0);
            obj.fill = Some(color::TRANSPARENT);
            obj.stroke = Some(defaults.accent);
            obj.stroke_width = Some(defaults.stroke_width);
        }
        ToolKind::Line | ToolKind::Arrow => {
            obj.points = Some(vec![pos.x, pos.y, pos.x, pos.y]);
            obj.stroke = Some(defaults.accent);
            obj.stroke_width = Some(defaults.stroke_width);
        }
        ToolKind::Pen => {
            obj.points = Some(vec![pos.x, pos.y]);
            obj.stroke = Some(defaults.accent);
            obj.stroke_width = Some(defaults.stroke_width);
        }
        ToolKind::Text => {
            obj.text = Some(defaults.text_placeholder.clone());
            obj.font_size = Some(defaults.font_size);
            obj.font_family = Some(defaults.font_family.clone());
            obj.fill = Some(defaults.text_fill);
            obj.width = Some(100.0);
            obj.height = Some(50.0);
        }
        ToolKind::Step => {
            let step_number = existing
                .iter()
                .filter(|o| o.kind == ToolKind::Step)
                .count() as u32
                + 1;
            obj.step_number = Some(step_number);
            obj.width = Some(40.0);
            obj.height = Some(40.0);
            obj.fill = Some(WHITE);
            obj.stroke = Some(STEP_STROKE);
            obj.stroke_width = Some(defaults.stroke_width);
        }
        ToolKind::Mosaic => {
            obj.width = Some(100.0);
            obj.height = Some(100.0);
            obj.fill = Some(MOSAIC_FILL);
            obj.stroke = Some(MOSAIC_STROKE);
            obj.stroke_width = Some(1.0);
            obj.mosaic_size = Some(10);
        }
        ToolKind::Gradient => {
            obj.width = Some(200.0);
            obj.height = Some(100.0);
            obj.gradient_colors = Some(vec![GRADIENT_START, GRADIENT_END]);
            obj.gradient_direction = Some(GradientDirection::Horizontal);
        }
        ToolKind::Image => {
            obj.width = Some(100.0);
            obj.height = Some(100.0);
        }
        ToolKind::Select | ToolKind::Drag => {}
    }

    obj
}

/// Updates a draft object's geometry from the current pointer position during
/// an active draw gesture.
///
/// Box kinds track the signed delta from the anchor; line/arrow replace their
/// second point; pen appends the current point to its path. Other kinds keep
/// their factory geometry (text, step and friends are placed, not dragged).
pub fn update_draft_geometry(obj: &mut AnnotationObject, current: Point, start: Point) {
    match obj.kind {
        ToolKind::Rectangle | ToolKind::Circle | ToolKind::Mosaic | ToolKind::Gradient => {
            obj.width = Some(current.x - start.x);
            obj.height = Some(current.y - start.y);
        }
        ToolKind::Line | ToolKind::Arrow => {
            obj.points = Some(vec![start.x, start.y, current.x, current.y]);
        }
        ToolKind::Pen => {
            let points = obj.points.get_or_insert_with(Vec::new);
            points.push(current.x);
            points.push(current.y);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(kind: ToolKind, existing: &[AnnotationObject]) -> AnnotationObject {
        let mut ids = IdAllocator::new();
        create(
            kind,
            Point::new(10.0, 20.0),
            existing,
            &mut ids,
            &FactoryDefaults::default(),
        )
    }

    #[test]
    fn rectangle_starts_at_zero_size_with_accent_stroke() {
        let obj = make(ToolKind::Rectangle, &[]);
        assert_eq!(obj.width, Some(0.0));
        assert_eq!(obj.height, Some(0.0));
        assert_eq!(obj.stroke, Some(color::ACCENT));
        assert_eq!(obj.stroke_width, Some(2.0));
        assert_eq!(obj.fill, Some(color::TRANSPARENT));
        assert_eq!(obj.z_index, 1);
        assert_eq!(obj.name, "Rectangle 1");
    }

    #[test]
    fn line_starts_as_degenerate_segment() {
        let obj = make(ToolKind::Line, &[]);
        assert_eq!(obj.points, Some(vec![10.0, 20.0, 10.0, 20.0]));
    }

    #[test]
    fn pen_starts_with_single_point() {
        let obj = make(ToolKind::Pen, &[]);
        assert_eq!(obj.points, Some(vec![10.0, 20.0]));
    }

    #[test]
    fn step_numbers_count_existing_steps_only() {
        let first = make(ToolKind::Step, &[]);
        assert_eq!(first.step_number, Some(1));

        let rect = make(ToolKind::Rectangle, &[]);
        let second = make(ToolKind::Step, &[first.clone(), rect]);
        assert_eq!(second.step_number, Some(2));
    }

    #[test]
    fn z_index_is_one_above_current_top() {
        let mut a = make(ToolKind::Rectangle, &[]);
        a.z_index = 7;
        let b = make(ToolKind::Circle, &[a]);
        assert_eq!(b.z_index, 8);
    }

    #[test]
    fn gradient_defaults_have_two_stops() {
        let obj = make(ToolKind::Gradient, &[]);
        let stops = obj.gradient_colors.unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(obj.gradient_direction, Some(GradientDirection::Horizontal));
        assert_eq!(obj.width, Some(200.0));
        assert_eq!(obj.height, Some(100.0));
    }

    #[test]
    fn select_tool_yields_unshaped_base_object() {
        let obj = make(ToolKind::Select, &[]);
        assert!(obj.width.is_none());
        assert!(obj.points.is_none());
        assert!(obj.stroke.is_none());
    }

    #[test]
    fn draft_geometry_tracks_drag_per_kind() {
        let start = Point::new(10.0, 10.0);
        let current = Point::new(110.0, 60.0);

        let mut rect = make(ToolKind::Rectangle, &[]);
        update_draft_geometry(&mut rect, current, start);
        assert_eq!(rect.width, Some(100.0));
        assert_eq!(rect.height, Some(50.0));

        let mut line = make(ToolKind::Line, &[]);
        update_draft_geometry(&mut line, current, start);
        assert_eq!(line.points, Some(vec![10.0, 10.0, 110.0, 60.0]));

        let mut pen = make(ToolKind::Pen, &[]);
        update_draft_geometry(&mut pen, Point::new(11.0, 21.0), start);
        update_draft_geometry(&mut pen, Point::new(12.0, 22.0), start);
        assert_eq!(pen.points, Some(vec![10.0, 20.0, 11.0, 21.0, 12.0, 22.0]));
    }
}
