//! Generic input event types for cross-host compatibility.
//!
//! The host UI (whatever windowing or web shell embeds the editor) maps its
//! native events to these types before feeding the state machine. The
//! rendering adapter reports hit-test results and gesture outcomes back
//! through [`SceneEvent`]; it never mutates state itself.

use crate::draw::ObjectId;

/// Generic key representation.
///
/// Only the keys with semantic meaning to the editor are distinguished;
/// everything else maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (used with Ctrl for undo/redo shortcuts)
    Char(char),
    /// Delete key (removes the selection)
    Delete,
    /// Backspace key (same as Delete)
    Backspace,
    /// Space bar (transient pan mode while held)
    Space,
    /// Return/Enter key (commits a text edit)
    Return,
    /// Escape key (cancels a text edit or gesture)
    Escape,
    /// Unmapped or unrecognized key
    Unknown,
}

/// Modifier key state delivered alongside key and wheel events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS hosts; treated the same as Ctrl.
    pub meta: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the platform primary shortcut modifier is held (Ctrl or Cmd).
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the pointer landed on, as reported by the rendering adapter's
/// hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty canvas outside any object and outside the background image
    Canvas,
    /// The background image itself
    Background,
    /// An existing annotation object
    Object(ObjectId),
}

/// Mouse wheel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

/// Events reported back into the core by the rendering adapter.
///
/// The adapter owns the live drawable nodes (transform handles, drag
/// previews) and reports only the committed outcome; the core applies the
/// mutation and snapshots history.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The user clicked an object (selection).
    Clicked(ObjectId),
    /// A drag of an existing object ended at a new position. Path-type
    /// objects may report a replacement points array instead of or alongside
    /// the anchor move.
    DragEnd {
        id: ObjectId,
        x: f64,
        y: f64,
        points: Option<Vec<f64>>,
    },
    /// A transform-handle resize ended with the given accumulated scale
    /// deltas. The adapter resets its transient scale to 1 after reporting.
    TransformEnd {
        id: ObjectId,
        x: f64,
        y: f64,
        scale_x: f64,
        scale_y: f64,
    },
    /// The user double-clicked a text object, requesting edit mode.
    TextEditRequested(ObjectId),
}
