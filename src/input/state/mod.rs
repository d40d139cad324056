//! Interaction state machine.
//!
//! Split by concern: [`core`] holds the state types and accessors,
//! [`pointer`] the pointer gesture handling, and [`actions`] the keyboard
//! shortcuts, scene-event application, and command surface.

mod actions;
mod core;
mod pointer;

pub use core::{EditorState, Gesture};
