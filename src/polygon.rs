//! Vertex, edge and polygon records stored by a [`Context`][crate::Context].

use std::ops::Range;

use crate::bbox::BoundingBox;
use crate::error::{PolygonIndexError, Result};
use crate::r#type::Point2D;

/// A polygon vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Location of the vertex.
    pub point: Point2D,
    /// Global index, unique across all polygons of a context and assigned in insertion order.
    pub index: usize,
    /// Additive weight used by weighted nearest-vertex queries.
    pub weight: f64,
}

/// A polygon edge, referencing its endpoints by global vertex index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Global index of the first endpoint.
    pub start: usize,
    /// Global index of the second endpoint.
    pub end: usize,
}

impl Edge {
    /// The bounding box covering both endpoints.
    pub fn bbox(&self, vertices: &[Vertex]) -> BoundingBox {
        BoundingBox::from_point(&vertices[self.start].point).expand(&vertices[self.end].point)
    }
}

/// One ring of a context.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Global indices of this polygon's vertices.
    pub vertices: Range<usize>,
    /// Positions of this polygon's edges in the context's edge list.
    pub edges: Range<usize>,
    /// Bounding box of all vertices.
    pub bbox: BoundingBox,
}

/// Check a ring and its optional weights before anything is stored.
pub(crate) fn validate_ring(points: &[Point2D], weights: Option<&[f64]>) -> Result<()> {
    if let Some(weights) = weights {
        if weights.len() != points.len() {
            return Err(PolygonIndexError::InvalidPolygon(format!(
                "Got {} weights for {} vertices.",
                weights.len(),
                points.len()
            )));
        }
        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(PolygonIndexError::InvalidPolygon(format!(
                "Weight {} is not finite.",
                i
            )));
        }
    }

    if let Some(i) = points.iter().position(|p| !p.is_finite()) {
        return Err(PolygonIndexError::InvalidPolygon(format!(
            "Vertex {} has non-finite coordinates.",
            i
        )));
    }

    match points.first() {
        Some(first) if points.iter().any(|p| p != first) => {}
        _ => {
            return Err(PolygonIndexError::InvalidPolygon(
                "A polygon needs at least 2 distinct vertices.".to_string(),
            ))
        }
    }

    if let Some(i) = points.windows(2).position(|pair| pair[0] == pair[1]) {
        return Err(PolygonIndexError::InvalidPolygon(format!(
            "Vertices {} and {} are identical.",
            i,
            i + 1
        )));
    }

    Ok(())
}

/// Returns `true` if the ring repeats its first vertex at the end.
pub(crate) fn is_closed(points: &[Point2D]) -> bool {
    points.len() > 2 && points.first() == points.last()
}

/// Edges of a ring whose vertices hold the global indices `first..first + len`.
///
/// Consecutive pairs are joined and the closing edge back to the first vertex is added unless the
/// ring is already closed.
pub(crate) fn ring_edges(first: usize, len: usize, closed: bool) -> impl Iterator<Item = Edge> {
    let last = first + len - 1;
    let closing = (!closed).then_some(Edge {
        start: last,
        end: first,
    });
    (first..last)
        .map(|start| Edge {
            start,
            end: start + 1,
        })
        .chain(closing)
}
