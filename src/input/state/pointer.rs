//! Pointer event handling: draw, pan, and zoom gestures.

use log::debug;

use super::{EditorState, Gesture};
use crate::canvas::transform;
use crate::draw::{ToolKind, factory};
use crate::input::events::{HitTarget, Modifiers, WheelDirection};
use crate::util::Point;

impl EditorState {
    /// Processes a pointer-down event.
    ///
    /// # Behavior
    /// - Space held or drag tool: starts a canvas pan
    /// - No background loaded: ignored (no annotation without a backdrop)
    /// - Select tool on empty canvas/background: clears the selection
    ///   (object clicks arrive separately as `SceneEvent::Clicked`)
    /// - Shape tool on empty canvas/background: creates a draft object at
    ///   the world position and enters the Drawing state
    /// - Shape tool on an existing object: ignored
    pub fn on_pointer_down(&mut self, screen: Point, hit: HitTarget) {
        if self.space_pressed || self.store.selected_tool() == ToolKind::Drag {
            self.gesture = Gesture::DraggingCanvas { last: screen };
            return;
        }

        if self.store.background().is_none() {
            return;
        }

        let tool = self.store.selected_tool();
        if tool == ToolKind::Select {
            if matches!(hit, HitTarget::Canvas | HitTarget::Background) {
                self.store.set_selection(None);
            }
            return;
        }

        // Never start a new draw on top of an existing shape.
        if matches!(hit, HitTarget::Object(_)) {
            return;
        }

        if !tool.is_shape_tool() {
            return;
        }

        // Image pixel data loads out-of-band; the host opens its picker and
        // calls `place_image` once decoded.
        if tool == ToolKind::Image {
            return;
        }

        let world = transform::screen_to_world(screen, self.store.pan(), self.store.zoom());
        let draft = factory::create(
            tool,
            world,
            self.store.objects(),
            &mut self.ids,
            &self.defaults,
        );
        debug!("start drawing {:?} at ({:.1}, {:.1})", tool, world.x, world.y);
        self.gesture = Gesture::Drawing {
            draft,
            start: world,
        };
    }

    /// Processes pointer motion.
    ///
    /// While panning, applies the screen-space delta to the pan offset.
    /// While drawing, updates the draft object's geometry from the world
    /// position. Strict temporal order of move events between down and up is
    /// assumed; the host must not reorder or batch them.
    pub fn on_pointer_move(&mut self, screen: Point) {
        match &mut self.gesture {
            Gesture::DraggingCanvas { last } => {
                let dx = screen.x - last.x;
                let dy = screen.y - last.y;
                *last = screen;
                let pan = self.store.pan();
                self.store.set_pan(Point::new(pan.x + dx, pan.y + dy));
            }
            Gesture::Drawing { draft, start } => {
                let world =
                    transform::screen_to_world(screen, self.store.pan(), self.store.zoom());
                factory::update_draft_geometry(draft, world, *start);
            }
            _ => {}
        }
    }

    /// Processes a pointer-up event.
    ///
    /// Ends an active pan, or commits an active draw: the draft joins the
    /// object store, history snapshots once, the tool snaps back to select,
    /// and the new object becomes the selection. A pointer-up with no active
    /// gesture is a no-op.
    pub fn on_pointer_up(&mut self) {
        if matches!(self.gesture, Gesture::DraggingCanvas { .. }) {
            self.gesture = Gesture::Idle;
            return;
        }

        if matches!(self.gesture, Gesture::Drawing { .. }) {
            if let Gesture::Drawing { draft, .. } =
                std::mem::replace(&mut self.gesture, Gesture::Idle)
            {
                let id = draft.id;
                debug!("commit {} ({})", draft.name, id);
                self.store.push_object(draft);
                self.commit_history();
                self.store.set_tool(ToolKind::Select);
                self.store.set_selection(Some(id));
            }
        }
    }

    /// Cancels the active gesture without committing anything.
    ///
    /// An uncommitted draft is discarded; an active pan ends where it is.
    /// Text editing is not affected (it has explicit commit/cancel calls).
    pub fn cancel_gesture(&mut self) {
        match self.gesture {
            Gesture::Drawing { .. } | Gesture::DraggingCanvas { .. } => {
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
    }

    /// Processes a mouse wheel event.
    ///
    /// With Ctrl/Cmd held this is a zoom request of ±0.1 routed through the
    /// zoom-around-center transform; without the modifier it is ignored.
    pub fn on_wheel(&mut self, direction: WheelDirection, mods: Modifiers) {
        if !mods.primary() {
            return;
        }
        let delta = match direction {
            WheelDirection::Up => 0.1,
            WheelDirection::Down => -0.1,
        };
        self.zoom(delta);
    }
}
