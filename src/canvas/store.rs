//! Canonical mutable canvas state (object store).
//!
//! Single source of truth for the object collection, selection, tool, and
//! view. Mutation goes exclusively through the interaction state machine in
//! [`crate::input::state`]; everything else reads.

use super::layer;
use crate::draw::{AnnotationObject, ObjectId, ToolKind};
use crate::util::Point;
use image::RgbaImage;
use std::sync::Arc;

/// The loaded background raster plus its placement, computed once at load
/// time to center/fit the image in the viewport. Immutable after load.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pub image: Arc<RgbaImage>,
    /// Natural raster width in pixels.
    pub width: u32,
    /// Natural raster height in pixels.
    pub height: u32,
    /// World-space placement offset.
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

/// Root aggregate for the canvas.
///
/// Fields are private; the read surface is public and the mutation surface is
/// `pub(crate)` for the state machine.
#[derive(Debug, Clone)]
pub struct CanvasState {
    objects: Vec<AnnotationObject>,
    /// Single-id selection; multi-select is not supported.
    selected: Option<ObjectId>,
    selected_tool: ToolKind,
    zoom: f64,
    pan: Point,
    background: Option<BackgroundImage>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            selected: None,
            selected_tool: ToolKind::Select,
            zoom: 1.0,
            pan: Point::default(),
            background: None,
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn objects(&self) -> &[AnnotationObject] {
        &self.objects
    }

    /// Current selection, pruned: an id whose object no longer exists (e.g.
    /// undone past its creation) reads as no selection.
    pub fn selection(&self) -> Option<ObjectId> {
        self.selected
            .filter(|id| self.objects.iter().any(|o| o.id == *id))
    }

    pub fn selected_tool(&self) -> ToolKind {
        self.selected_tool
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn find_object(&self, id: ObjectId) -> Option<&AnnotationObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Visible objects in render order (ascending z, topmost last).
    pub fn render_order(&self) -> Vec<&AnnotationObject> {
        layer::sorted_by_z(&self.objects)
            .into_iter()
            .filter(|o| o.visible)
            .collect()
    }

    /// All objects in layer-panel order (topmost first).
    pub fn layer_order(&self) -> Vec<&AnnotationObject> {
        layer::panel_order(&self.objects)
    }

    // ------------------------------------------------------------------
    // Mutation surface (state machine only)
    // ------------------------------------------------------------------

    pub(crate) fn objects_mut(&mut self) -> &mut Vec<AnnotationObject> {
        &mut self.objects
    }

    pub(crate) fn find_object_mut(&mut self, id: ObjectId) -> Option<&mut AnnotationObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub(crate) fn push_object(&mut self, obj: AnnotationObject) {
        self.objects.push(obj);
    }

    pub(crate) fn replace_objects(&mut self, objects: Vec<AnnotationObject>) {
        self.objects = objects;
    }

    pub(crate) fn set_selection(&mut self, id: Option<ObjectId>) {
        self.selected = id;
    }

    pub(crate) fn set_tool(&mut self, tool: ToolKind) {
        self.selected_tool = tool;
    }

    pub(crate) fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    pub(crate) fn set_view(&mut self, zoom: f64, pan: Point) {
        self.zoom = zoom;
        self.pan = pan;
    }

    pub(crate) fn set_background(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{FactoryDefaults, IdAllocator, factory};

    #[test]
    fn new_state_defaults() {
        let state = CanvasState::new();
        assert_eq!(state.selected_tool(), ToolKind::Select);
        assert_eq!(state.zoom(), 1.0);
        assert_eq!(state.pan(), Point::default());
        assert!(state.objects().is_empty());
        assert!(state.selection().is_none());
        assert!(state.background().is_none());
    }

    #[test]
    fn stale_selection_is_pruned_on_read() {
        let mut state = CanvasState::new();
        let mut ids = IdAllocator::new();
        let obj = factory::create(
            ToolKind::Rectangle,
            Point::new(0.0, 0.0),
            &[],
            &mut ids,
            &FactoryDefaults::default(),
        );
        let id = obj.id;
        state.push_object(obj);
        state.set_selection(Some(id));
        assert_eq!(state.selection(), Some(id));

        // Object disappears (e.g. undo past creation); selection reads empty.
        state.replace_objects(Vec::new());
        assert!(state.selection().is_none());
    }

    #[test]
    fn render_order_skips_hidden_objects() {
        let mut state = CanvasState::new();
        let mut ids = IdAllocator::new();
        let defaults = FactoryDefaults::default();
        for i in 0..3 {
            let mut obj = factory::create(
                ToolKind::Rectangle,
                Point::new(0.0, 0.0),
                state.objects(),
                &mut ids,
                &defaults,
            );
            if i == 1 {
                obj.visible = false;
            }
            state.push_object(obj);
        }
        assert_eq!(state.render_order().len(), 2);
        assert_eq!(state.layer_order().len(), 3);
    }
}
