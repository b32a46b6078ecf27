//! Pure domain types with minimal dependencies
//!
//! This module contains the annotation model, the ordered annotation
//! container, geometry primitives and selection state. Nothing here depends on
//! rendering or on the editing session.

pub mod annotation;
pub mod geometry;
pub mod list;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use list::*;
pub use selection::*;
