//! Drawing primitives shared by renderers.

mod stroke;

pub use stroke::{StrokeDefinition, StrokeStyle};
