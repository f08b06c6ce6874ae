//! Distance primitives.
//!
//! Everything here works on squared distances. Square roots are only taken when a value is handed
//! back to the caller. The projection onto a segment is computed relative to the segment's extent,
//! so it stays finite for any finite input; the squared distances themselves are finite while the
//! distances involved stay below about `1.3e154`, and saturate to infinity beyond that.

use crate::bbox::BoundingBox;
use crate::r#type::Point2D;

/// Squared distance from `p` to the closed segment `[a, b]`.
///
/// A degenerate segment (`a == b`) is treated as the point `a`.
#[inline]
pub fn squared_distance_point_segment(p: &Point2D, a: &Point2D, b: &Point2D) -> f64 {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let extent = vx.abs().max(vy.abs());
    if extent == 0.0 {
        return p.squared_distance(a);
    }

    let (ux, uy) = (vx / extent, vy / extent);
    let (wx, wy) = ((p.x - a.x) / extent, (p.y - a.y) / extent);
    let t = ((wx * ux + wy * uy) / (ux * ux + uy * uy)).clamp(0.0, 1.0);
    let nearest = Point2D::new(a.x + t * vx, a.y + t * vy);
    p.squared_distance(&nearest)
}

/// Lower bound on the squared distance from `p` to anything inside `bbox`.
///
/// This is zero when `p` is inside the box. It is only ever used to prune, never as a result.
#[inline]
pub fn squared_distance_point_bbox(p: &Point2D, bbox: &BoundingBox) -> f64 {
    let dx = axis_dist(p.x, bbox.min_x, bbox.max_x);
    let dy = axis_dist(p.y, bbox.min_y, bbox.max_y);
    dx * dx + dy * dy
}

/// 1D distance from a value to a range.
#[inline]
fn axis_dist(k: f64, min: f64, max: f64) -> f64 {
    if k < min {
        min - k
    } else if k <= max {
        0.0
    } else {
        k - max
    }
}
