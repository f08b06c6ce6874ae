//! Point-in-polygon tests using the crossing-number rule.
//!
//! A horizontal ray is cast from the point towards `+x` and the polygon edges it crosses are
//! counted; the point is inside if the count is odd. An edge only counts when the point's `y` lies
//! in the half-open range `[min(y1, y2), max(y1, y2))`, so a ray through a shared vertex is counted
//! once and horizontal edges never count. As a consequence points on a left or bottom boundary are
//! inside and points on a right or top boundary are outside.

use crate::polygon::{Edge, Polygon, Vertex};
use crate::r#type::Point2D;

/// Returns `true` if the ray from `point` towards `+x` crosses the segment `[a, b]`.
#[inline]
pub fn crosses(point: &Point2D, a: &Point2D, b: &Point2D) -> bool {
    let (low, high) = if a.y <= b.y { (a, b) } else { (b, a) };
    if point.y < low.y || point.y >= high.y {
        return false;
    }

    let x = low.x + (point.y - low.y) * (high.x - low.x) / (high.y - low.y);
    x > point.x
}

/// Crossing-number test of `point` against one polygon.
///
/// The polygon's bounding box is checked first so that points outside it never touch the edges.
pub fn contains(point: &Point2D, polygon: &Polygon, edges: &[Edge], vertices: &[Vertex]) -> bool {
    if !polygon.bbox.contains_point(point) {
        return false;
    }

    let num_crossings = edges[polygon.edges.clone()]
        .iter()
        .filter(|edge| {
            crosses(
                point,
                &vertices[edge.start].point,
                &vertices[edge.end].point,
            )
        })
        .count();
    num_crossings % 2 == 1
}

/// Returns `true` if `point` is inside at least one of `polygons`.
pub fn contains_any(
    point: &Point2D,
    polygons: &[Polygon],
    edges: &[Edge],
    vertices: &[Vertex],
) -> bool {
    polygons
        .iter()
        .any(|polygon| contains(point, polygon, edges, vertices))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::polygon::ring_edges;

    fn records(rings: &[&[(f64, f64)]]) -> (Vec<Polygon>, Vec<Edge>, Vec<Vertex>) {
        let mut polygons = vec![];
        let mut edges = vec![];
        let mut vertices: Vec<Vertex> = vec![];
        for ring in rings {
            let first_vertex = vertices.len();
            let first_edge = edges.len();
            vertices.extend(ring.iter().enumerate().map(|(i, &(x, y))| Vertex {
                point: Point2D::new(x, y),
                index: first_vertex + i,
                weight: 0.,
            }));
            edges.extend(ring_edges(first_vertex, ring.len(), false));
            polygons.push(Polygon {
                vertices: first_vertex..vertices.len(),
                edges: first_edge..edges.len(),
                bbox: BoundingBox::from_points(vertices[first_vertex..].iter().map(|v| &v.point)),
            });
        }
        (polygons, edges, vertices)
    }

    #[test]
    fn crossing_rule_is_half_open() {
        let a = Point2D::new(1., 0.);
        let b = Point2D::new(1., 2.);
        assert!(crosses(&Point2D::new(0., 0.), &a, &b));
        assert!(crosses(&Point2D::new(0., 1.), &a, &b));
        assert!(!crosses(&Point2D::new(0., 2.), &a, &b));
        assert!(!crosses(&Point2D::new(1., 1.), &a, &b));
        assert!(!crosses(&Point2D::new(2., 1.), &a, &b));

        let horizontal = Point2D::new(3., 0.);
        assert!(!crosses(&Point2D::new(0., 0.), &a, &horizontal));
    }

    #[test]
    fn unit_square() {
        let (polygons, edges, vertices) = records(&[&[(0., 0.), (1., 0.), (1., 1.), (0., 1.)]]);
        let inside = |x, y| contains(&Point2D::new(x, y), &polygons[0], &edges, &vertices);

        assert!(inside(0.5, 0.5));
        assert!(!inside(0.5, -0.5));
        assert!(!inside(1.5, 0.5));

        // left and bottom boundary inside, right and top outside
        assert!(inside(0., 0.5));
        assert!(inside(0.5, 0.));
        assert!(!inside(1., 0.5));
        assert!(!inside(0.5, 1.));
    }

    #[test]
    fn concave_polygon() {
        // U shape opening upwards
        let ring = [
            (0., 0.),
            (3., 0.),
            (3., 3.),
            (2., 3.),
            (2., 1.),
            (1., 1.),
            (1., 3.),
            (0., 3.),
        ];
        let (polygons, edges, vertices) = records(&[&ring]);
        let inside = |x, y| contains(&Point2D::new(x, y), &polygons[0], &edges, &vertices);

        assert!(inside(0.5, 2.));
        assert!(inside(2.5, 2.));
        assert!(inside(1.5, 0.5));
        assert!(!inside(1.5, 2.));
        // ray passes exactly through the vertices at y = 1
        assert!(inside(0.5, 1.));
        assert!(!inside(1.5, 1.));
    }

    #[test]
    fn overlapping_polygons_are_a_union() {
        let square = [(0., 0.), (2., 0.), (2., 2.), (0., 2.)];
        let shifted = [(1., 1.), (3., 1.), (3., 3.), (1., 3.)];
        let (polygons, edges, vertices) = records(&[&square, &shifted]);
        let inside = |x, y| contains_any(&Point2D::new(x, y), &polygons, &edges, &vertices);

        assert!(inside(1.5, 1.5));
        assert!(inside(0.5, 0.5));
        assert!(inside(2.5, 2.5));
        assert!(!inside(2.5, 0.5));
    }
}
