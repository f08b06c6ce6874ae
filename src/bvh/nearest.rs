//! Branch-and-bound nearest neighbor search.
//!
//! The search threads the best candidate found so far through the recursion. A subtree is skipped
//! when the metric's lower bound for its box exceeds the current best value, so the result never
//! depends on which subtrees were pruned.

use crate::bvh::traversal::Node;
use crate::distance::{squared_distance_point_bbox, squared_distance_point_segment};
use crate::polygon::{Edge, Vertex};
use crate::r#type::Point2D;

/// A value to minimize over the leaves of a tree, together with a lower bound for whole subtrees.
pub trait NearestMetric {
    /// The exact value of the leaf with the given insertion index.
    fn leaf_value(&self, index: usize, point: &Point2D) -> f64;

    /// A value no larger than [`NearestMetric::leaf_value`] of any leaf under `node`.
    fn lower_bound(&self, node: &Node<'_>, point: &Point2D) -> f64;
}

/// The best leaf found so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Insertion index of the leaf, `None` until a leaf has been folded in.
    pub index: Option<usize>,
    /// Value of that leaf under the metric.
    pub value: f64,
}

impl Nearest {
    /// No candidate yet.
    pub const NONE: Self = Self {
        index: None,
        value: f64::INFINITY,
    };

    /// Keep the current candidate unless `value` is strictly smaller, so that among equal values
    /// the first one visited wins. The first leaf is always taken, even at infinity, and a `NaN`
    /// candidate gives way to any comparable value.
    #[inline]
    #[must_use]
    fn fold(self, index: usize, value: f64) -> Self {
        if value < self.value || self.index.is_none() || (self.value.is_nan() && !value.is_nan()) {
            Self {
                index: Some(index),
                value,
            }
        } else {
            self
        }
    }
}

impl Default for Nearest {
    fn default() -> Self {
        Self::NONE
    }
}

/// Returns the better of `best` and the best leaf reachable under `node`.
///
/// Children are visited in construction order, hence leaves in insertion order.
pub fn nearest<M: NearestMetric>(
    node: Node<'_>,
    metric: &M,
    point: &Point2D,
    best: Nearest,
) -> Nearest {
    if node.is_leaf() {
        return best.fold(node.index(), metric.leaf_value(node.index(), point));
    }

    if metric.lower_bound(&node, point) > best.value {
        return best;
    }

    node.children().fold(best, |best, child| {
        if child.is_leaf() {
            best.fold(child.index(), metric.leaf_value(child.index(), point))
        } else {
            nearest(child, metric, point, best)
        }
    })
}

/// Squared distance to the nearest edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDistance<'a> {
    /// Leaves of the tree, in insertion order.
    pub edges: &'a [Edge],
    /// Vertices referenced by `edges`.
    pub vertices: &'a [Vertex],
}

impl NearestMetric for EdgeDistance<'_> {
    #[inline]
    fn leaf_value(&self, index: usize, point: &Point2D) -> f64 {
        let edge = &self.edges[index];
        squared_distance_point_segment(
            point,
            &self.vertices[edge.start].point,
            &self.vertices[edge.end].point,
        )
    }

    #[inline]
    fn lower_bound(&self, node: &Node<'_>, point: &Point2D) -> f64 {
        squared_distance_point_bbox(point, node.bbox())
    }
}

/// Squared distance to the nearest vertex.
#[derive(Debug, Clone, Copy)]
pub struct VertexDistance<'a> {
    /// Leaves of the tree, in insertion order.
    pub vertices: &'a [Vertex],
}

impl NearestMetric for VertexDistance<'_> {
    #[inline]
    fn leaf_value(&self, index: usize, point: &Point2D) -> f64 {
        point.squared_distance(&self.vertices[index].point)
    }

    #[inline]
    fn lower_bound(&self, node: &Node<'_>, point: &Point2D) -> f64 {
        squared_distance_point_bbox(point, node.bbox())
    }
}

/// Additively weighted vertex distance, `scale_factor * distance + weight`.
///
/// The bound of a subtree combines the box distance with the smallest weight stored under it, so
/// that a box close to the point but holding only heavy vertices can still be skipped, and a box
/// far away holding a very light vertex cannot be skipped wrongly. `scale_factor` must not be
/// negative.
#[derive(Debug, Clone, Copy)]
pub struct WeightedVertexDistance<'a> {
    /// Leaves of the tree, in insertion order.
    pub vertices: &'a [Vertex],
    /// Multiplier applied to the Euclidean distance.
    pub scale_factor: f64,
}

impl NearestMetric for WeightedVertexDistance<'_> {
    #[inline]
    fn leaf_value(&self, index: usize, point: &Point2D) -> f64 {
        let vertex = &self.vertices[index];
        self.scale_factor * point.squared_distance(&vertex.point).sqrt() + vertex.weight
    }

    #[inline]
    fn lower_bound(&self, node: &Node<'_>, point: &Point2D) -> f64 {
        self.scale_factor * squared_distance_point_bbox(point, node.bbox()).sqrt()
            + node.min_weight()
    }
}
