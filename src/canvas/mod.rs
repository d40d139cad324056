//! Canvas state: coordinate transforms, history, layering, and the store.

pub mod history;
pub mod layer;
pub mod store;
pub mod transform;

pub use history::History;
pub use layer::LayerOp;
pub use store::{BackgroundImage, CanvasState};
