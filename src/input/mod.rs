//! Input handling: generic event types and the interaction state machine.

pub mod events;
pub mod state;

pub use events::{HitTarget, Key, Modifiers, SceneEvent, WheelDirection};
pub use state::{EditorState, Gesture};
