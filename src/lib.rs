//! Canvas annotation engine: an object-based editor core for marking up a
//! backdrop image with shapes, text, and effects, then exporting the result
//! as a PNG.
//!
//! The crate is host-agnostic: a UI shell feeds generic pointer/keyboard
//! events into [`input::EditorState`] and reads the canvas state back for
//! display. All geometry lives in world space; the view transform (zoom and
//! pan) is applied once at render time.
//!
//! Module layout:
//! - [`draw`] - the annotation object model, colors, and the object factory
//! - [`canvas`] - object store, view transform math, history, and layering
//! - [`input`] - generic event types and the interaction state machine
//! - [`background`] - backdrop intake: validation, decoding, placement
//! - [`render`] - CPU rasterization of the scene
//! - [`export`] - PNG export with view reset
//! - [`config`] - TOML configuration with validation

pub mod background;
pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod input;
pub mod render;
pub mod util;

pub use canvas::{CanvasState, History, LayerOp};
pub use config::Config;
pub use draw::{AnnotationObject, Color, ObjectId, ObjectPatch, ToolKind};
pub use error::EditorError;
pub use input::{EditorState, Gesture, HitTarget, Key, Modifiers, SceneEvent, WheelDirection};
pub use util::Point;
