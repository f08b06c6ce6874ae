//! An immutable, packed bounding-volume hierarchy over polygon edges or vertices.

mod builder;
mod index;
pub mod nearest;
pub mod traversal;
pub(crate) mod util;

pub use builder::{BvhBuilder, DEFAULT_BVH_NODE_SIZE};
pub use index::{Bvh, BvhMetadata};
pub use nearest::{nearest, Nearest, NearestMetric};
pub use traversal::Node;
