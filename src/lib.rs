#![doc = include_str!("../README.md")]

mod bbox;
pub mod bvh;
pub mod contains;
mod context;
pub mod distance;
mod error;
mod handle;
pub mod polygon;
mod r#type;

pub use bbox::BoundingBox;
pub use context::{Context, ContextOptions, DEFAULT_SCALE_FACTOR};
pub use error::{PolygonIndexError, Result};
pub use handle::{ContextHandle, ContextRegistry};
pub use r#type::Point2D;

#[cfg(test)]
pub(crate) mod test;
