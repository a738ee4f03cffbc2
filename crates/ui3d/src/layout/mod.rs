//! Label layout
//!
//! Stacks the title, detail and comment blocks top to bottom, sizes the
//! background panel around them and positions the whole label beside its
//! host object.

mod engine;
mod style;

pub use engine::{stack_blocks, LabelLayoutEngine};
pub use style::{BlockStyle, LabelStyle};
