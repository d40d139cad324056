//! Keyboard actions, scene-event handling, and the command surface exposed
//! to the UI shell.

use log::debug;

use super::{EditorState, Gesture};
use crate::background;
use crate::canvas::{BackgroundImage, layer, transform};
use crate::draw::{AnnotationObject, ImagePayload, ObjectId, ObjectPatch, ToolKind, factory};
use crate::error::EditorError;
use crate::input::events::{Key, Modifiers, SceneEvent};
use crate::util::Point;
use image::RgbaImage;
use std::sync::Arc;

impl EditorState {
    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Processes a key-down event.
    ///
    /// While a text edit is active the host overlay owns the keyboard;
    /// only Escape (cancel edit) is honored here.
    pub fn on_key_press(&mut self, key: Key, mods: Modifiers) {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            if key == Key::Escape {
                self.cancel_text_edit();
            }
            return;
        }

        match key {
            Key::Char('z' | 'Z') if mods.primary() && mods.shift => self.redo(),
            Key::Char('z' | 'Z') if mods.primary() => self.undo(),
            Key::Char('y' | 'Y') if mods.primary() => self.redo(),
            Key::Delete | Key::Backspace => self.delete_selected(),
            Key::Space => {
                self.space_pressed = true;
            }
            Key::Escape => self.cancel_gesture(),
            _ => {}
        }
    }

    /// Processes a key-up event.
    ///
    /// Releasing space exits the transient pan mode; if a pan drag is mid
    /// flight it is cancelled immediately, with no partial commit.
    pub fn on_key_release(&mut self, key: Key) {
        if key == Key::Space {
            self.space_pressed = false;
            if matches!(self.gesture, Gesture::DraggingCanvas { .. }) {
                self.gesture = Gesture::Idle;
            }
        }
    }

    // ------------------------------------------------------------------
    // Scene events reported by the rendering adapter
    // ------------------------------------------------------------------

    /// Processes an event reported back by the rendering adapter.
    ///
    /// Any event referencing a missing object id is a silent no-op: the
    /// object may have been removed by an undo or delete since the adapter
    /// captured it.
    pub fn on_scene_event(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::Clicked(id) => {
                if self.store.find_object(id).is_some() {
                    self.store.set_selection(Some(id));
                }
            }
            SceneEvent::DragEnd { id, x, y, points } => self.apply_drag_end(id, x, y, points),
            SceneEvent::TransformEnd {
                id,
                x,
                y,
                scale_x,
                scale_y,
            } => self.apply_transform_end(id, x, y, scale_x, scale_y),
            SceneEvent::TextEditRequested(id) => self.begin_text_edit(id),
        }
    }

    fn apply_drag_end(&mut self, id: ObjectId, x: f64, y: f64, points: Option<Vec<f64>>) {
        let Some(obj) = self.store.find_object_mut(id) else {
            debug!("drag-end for missing object {id}; ignored");
            return;
        };
        if obj.locked {
            return;
        }
        obj.x = x;
        obj.y = y;
        if let Some(points) = points {
            obj.points = Some(points);
        }
        self.commit_history();
    }

    fn apply_transform_end(&mut self, id: ObjectId, x: f64, y: f64, scale_x: f64, scale_y: f64) {
        let editing = self.editing_text();
        let Some(obj) = self.store.find_object_mut(id) else {
            debug!("transform-end for missing object {id}; ignored");
            return;
        };
        if obj.locked || editing == Some(id) {
            return;
        }

        obj.x = x;
        obj.y = y;
        let max_scale = scale_x.max(scale_y);

        match obj.kind {
            ToolKind::Rectangle | ToolKind::Gradient => {
                obj.width = Some((obj.width_or_zero() * scale_x).max(5.0));
                obj.height = Some((obj.height_or_zero() * scale_y).max(5.0));
            }
            ToolKind::Mosaic | ToolKind::Image => {
                obj.width = Some((obj.width_or_zero() * scale_x).max(20.0));
                obj.height = Some((obj.height_or_zero() * scale_y).max(20.0));
            }
            ToolKind::Circle => {
                let radius = (obj.radius() * max_scale).max(5.0);
                obj.width = Some(radius * 2.0);
                obj.height = Some(radius * 2.0);
            }
            ToolKind::Text => {
                let font = obj.font_size.unwrap_or(40.0);
                obj.font_size = Some((font * max_scale).round().max(8.0));
                obj.width = Some(obj.width_or_zero() * scale_x);
                obj.height = Some(obj.height_or_zero() * scale_y);
            }
            ToolKind::Step => {
                let size = (obj.width_or_zero() * scale_x)
                    .max(obj.height_or_zero() * scale_y)
                    .max(20.0);
                obj.width = Some(size);
                obj.height = Some(size);
            }
            // Path kinds only reposition; their points carry the geometry.
            _ => {}
        }

        self.commit_history();
    }

    // ------------------------------------------------------------------
    // Text editing
    // ------------------------------------------------------------------

    /// Enters text-edit mode for a text object. Locked objects and
    /// non-text objects are ignored.
    pub fn begin_text_edit(&mut self, id: ObjectId) {
        let Some(obj) = self.store.find_object(id) else {
            return;
        };
        if obj.kind != ToolKind::Text || obj.locked {
            return;
        }
        self.gesture = Gesture::EditingText { id };
    }

    /// Commits a text edit with the new content.
    ///
    /// Saves history only when the content actually changed; either way the
    /// editor returns to Idle.
    pub fn commit_text_edit(&mut self, new_text: String) {
        let Some(id) = self.editing_text() else {
            return;
        };
        self.gesture = Gesture::Idle;

        let Some(obj) = self.store.find_object_mut(id) else {
            return;
        };
        if obj.text.as_deref() == Some(new_text.as_str()) {
            return;
        }
        obj.text = Some(new_text);
        self.commit_history();
    }

    /// Exits text-edit mode without mutating the object.
    pub fn cancel_text_edit(&mut self) {
        if matches!(self.gesture, Gesture::EditingText { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    // ------------------------------------------------------------------
    // Command surface (toolbar/panel shell)
    // ------------------------------------------------------------------

    /// Selects the active tool and clears the selection.
    ///
    /// An in-flight draw is discarded: switching tools mid-gesture never
    /// commits a partial object.
    pub fn select_tool(&mut self, tool: ToolKind) {
        if matches!(self.gesture, Gesture::Drawing { .. }) {
            self.gesture = Gesture::Idle;
        }
        self.store.set_tool(tool);
        self.store.set_selection(None);
    }

    /// Applies a zoom delta anchored on the viewport center.
    ///
    /// Clamped to the [0.1, 5.0] range; when the clamp leaves the zoom
    /// unchanged the pan is not recomputed.
    pub fn zoom(&mut self, delta: f64) {
        let anchor = self.viewport_center();
        if let Some((zoom, pan)) =
            transform::zoom_around(self.store.zoom(), self.store.pan(), delta, anchor)
        {
            self.store.set_view(zoom, pan);
        }
    }

    /// Rewinds the object set to the previous snapshot and clears the
    /// selection. No-op with no undo available.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.store.replace_objects(snapshot);
            self.store.set_selection(None);
        }
    }

    /// Re-applies the next snapshot and clears the selection. No-op with no
    /// redo available.
    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.store.replace_objects(snapshot);
            self.store.set_selection(None);
        }
    }

    /// Removes the selected object and snapshots history.
    ///
    /// Lock suppresses drag and transform, not deletion: a locked selected
    /// object is removed like any other. No-op with an empty selection.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.store.selection() else {
            return;
        };
        self.store.objects_mut().retain(|o| o.id != id);
        self.commit_history();
        self.store.set_selection(None);
    }

    /// Merges a partial update into an object and snapshots history.
    /// Unknown ids are silent no-ops.
    pub fn update_object_property(&mut self, id: ObjectId, patch: ObjectPatch) {
        let Some(obj) = self.store.find_object_mut(id) else {
            debug!("property update for missing object {id}; ignored");
            return;
        };
        patch.apply(obj);
        self.commit_history();
    }

    /// Applies a layer reorder operation; snapshots history only when the
    /// order actually changed.
    pub fn reorder_layer(&mut self, id: ObjectId, op: layer::LayerOp) {
        if layer::apply(self.store.objects_mut(), id, op) {
            self.commit_history();
        }
    }

    /// Toggles the lock flag on an object.
    pub fn toggle_lock(&mut self, id: ObjectId) {
        if layer::toggle_lock(self.store.objects_mut(), id) {
            self.commit_history();
        }
    }

    /// Toggles the visibility flag on an object.
    pub fn toggle_visibility(&mut self, id: ObjectId) {
        if layer::toggle_visibility(self.store.objects_mut(), id) {
            self.commit_history();
        }
    }

    // ------------------------------------------------------------------
    // Background and image intake
    // ------------------------------------------------------------------

    /// Validates and decodes an image payload, then installs it as the
    /// background. On error nothing is mutated and any previous background
    /// stays in place.
    pub fn load_background_bytes(&mut self, bytes: &[u8]) -> Result<(), EditorError> {
        let raster = background::decode(bytes, self.max_background_bytes)?;
        self.load_background(raster);
        Ok(())
    }

    /// Installs a decoded raster as the background image.
    ///
    /// The placement is computed once: scaled down to fit the viewport
    /// (never scaled up) and centered. Loading a background starts a fresh
    /// annotation session: objects, selection, view, and history all reset.
    pub fn load_background(&mut self, raster: RgbaImage) {
        let (width, height) = (raster.width(), raster.height());
        let placement = background::fit_to_viewport(width, height, self.viewport);
        debug!(
            "background {}x{} placed at ({:.1}, {:.1}) scale {:.3}",
            width, height, placement.x, placement.y, placement.scale
        );

        self.store.set_background(Some(BackgroundImage {
            image: Arc::new(raster),
            width,
            height,
            x: placement.x,
            y: placement.y,
            scale_x: placement.scale,
            scale_y: placement.scale,
        }));
        self.store.replace_objects(Vec::new());
        self.store.set_selection(None);
        self.store.set_view(1.0, Point::default());
        self.history.reset();
        self.gesture = Gesture::Idle;
    }

    /// Places a decoded raster as an image annotation at a world position.
    ///
    /// The object was geometry-only until now; this attaches the pixels,
    /// sizes the object to at most 300 world units per side, commits it, and
    /// selects it, mirroring the draw-commit flow.
    pub fn place_image(&mut self, world_pos: Point, raster: RgbaImage) {
        let (natural_width, natural_height) = (raster.width(), raster.height());
        let mut obj = factory::create(
            ToolKind::Image,
            world_pos,
            self.store.objects(),
            &mut self.ids,
            &self.defaults,
        );
        obj.width = Some((natural_width as f64).min(300.0));
        obj.height = Some((natural_height as f64).min(300.0));
        obj.image = Some(ImagePayload {
            pixels: Arc::new(raster),
            natural_width,
            natural_height,
        });

        let id = obj.id;
        self.store.push_object(obj);
        self.commit_history();
        self.store.set_tool(ToolKind::Select);
        self.store.set_selection(Some(id));
    }

    /// Replaces the full object set (used by panel-driven bulk edits) and
    /// snapshots history once.
    pub fn replace_objects(&mut self, objects: Vec<AnnotationObject>) {
        self.store.replace_objects(objects);
        self.commit_history();
    }
}
