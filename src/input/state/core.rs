//! Editor state machine core: gesture tracking and session state.

use crate::canvas::{CanvasState, History};
use crate::config::Config;
use crate::draw::{AnnotationObject, FactoryDefaults, IdAllocator, ObjectId};
use crate::util::Point;

/// Current gesture state machine.
///
/// Tracks whether the user is idle, dragging a new object into existence,
/// panning the canvas, or editing a text object. Resize/rotate gestures live
/// in the rendering adapter's transform handles; their commit arrives as a
/// [`crate::input::events::SceneEvent::TransformEnd`] and flows through the
/// editor while the gesture here stays `Idle`.
#[derive(Debug)]
pub enum Gesture {
    /// Not actively drawing - waiting for user input
    Idle,
    /// A new object is being dragged into existence. The draft is not part
    /// of the object store until pointer-up commits it.
    Drawing {
        /// The uncommitted object under construction
        draft: AnnotationObject,
        /// World-space anchor where the drag started
        start: Point,
    },
    /// The canvas is being panned (space held or drag tool active)
    DraggingCanvas {
        /// Last screen-space pointer position, for per-move deltas
        last: Point,
    },
    /// A text object's content is being edited in the host overlay
    EditingText { id: ObjectId },
}

/// The interaction state machine and command surface of the editor.
///
/// Owns the object store and the history; every mutation funnels through
/// here. Pointer and keyboard events arrive from the host event loop in
/// delivery order and are processed synchronously to completion, so no
/// locking is needed in the single-threaded host model.
pub struct EditorState {
    pub(crate) store: CanvasState,
    pub(crate) history: History,
    pub(crate) gesture: Gesture,
    /// Transient pan mode flag, independent of the selected tool.
    pub(crate) space_pressed: bool,
    /// Viewport size in screen pixels; zoom anchors on its center and
    /// background placement fits into it.
    pub(crate) viewport: (f64, f64),
    pub(crate) ids: IdAllocator,
    pub(crate) defaults: FactoryDefaults,
    /// Background intake size cap in bytes.
    pub(crate) max_background_bytes: u64,
    /// Pixel density multiplier for PNG export.
    pub(crate) pixel_ratio: u32,
}

impl EditorState {
    /// Creates an editor with built-in defaults and an 800x600 viewport.
    pub fn new() -> Self {
        Self::with_defaults(FactoryDefaults::default(), 10 * 1024 * 1024, 2)
    }

    /// Creates an editor from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_defaults(
            config.factory_defaults(),
            config.canvas.max_background_bytes,
            config.export.pixel_ratio,
        )
    }

    /// Creates an editor with explicit defaults.
    pub fn with_defaults(
        defaults: FactoryDefaults,
        max_background_bytes: u64,
        pixel_ratio: u32,
    ) -> Self {
        Self {
            store: CanvasState::new(),
            history: History::new(),
            gesture: Gesture::Idle,
            space_pressed: false,
            viewport: (800.0, 600.0),
            ids: IdAllocator::new(),
            defaults,
            max_background_bytes,
            pixel_ratio,
        }
    }

    /// Read-only view of the canvas state.
    pub fn state(&self) -> &CanvasState {
        &self.store
    }

    /// Current gesture, exposed for host cursor/overlay decisions.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// The uncommitted draft object during an active draw, for live preview.
    pub fn draft(&self) -> Option<&AnnotationObject> {
        match &self.gesture {
            Gesture::Drawing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Id of the text object currently being edited, if any.
    pub fn editing_text(&self) -> Option<ObjectId> {
        match &self.gesture {
            Gesture::EditingText { id } => Some(*id),
            _ => None,
        }
    }

    /// Whether the transient space-bar pan mode is active.
    pub fn pan_mode(&self) -> bool {
        self.space_pressed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Viewport size in screen pixels.
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Updates the viewport after a host resize.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width.max(1.0), height.max(1.0));
    }

    pub(crate) fn viewport_center(&self) -> Point {
        Point::new(self.viewport.0 / 2.0, self.viewport.1 / 2.0)
    }

    /// Snapshots the current object set into history. Called exactly once
    /// per committing mutation; never for in-progress gesture states.
    pub(crate) fn commit_history(&mut self) {
        let objects = self.store.objects().to_vec();
        self.history.save(&objects);
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
