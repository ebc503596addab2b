pub mod clipping;
pub mod pipeline;

pub use pipeline::{Pipeline, SnapOverrides};
