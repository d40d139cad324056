//! Annotation object model, style defaults, and the object factory.

pub mod color;
pub mod factory;
pub mod object;

pub use color::Color;
pub use factory::FactoryDefaults;
pub use object::{
    AnnotationObject, GradientDirection, IdAllocator, ImagePayload, ObjectId, ObjectPatch,
    ToolKind,
};
