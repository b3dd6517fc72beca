//! Structured patching of chart value trees
//!
//! - **path**: dotted/indexed path strings parsed once into segments
//! - **patcher**: locate and rewrite image-reference fields in a values tree
//! - **document**: YAML load/store for chart documents

pub mod document;
pub mod patcher;
pub mod path;

pub use patcher::{ImageUpdate, ValueChange, apply};
pub use path::{PathSpec, Segment};
