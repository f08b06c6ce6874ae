use bytemuck::{Pod, Zeroable};
use geo_traits::CoordTrait;

use crate::error::{PolygonIndexError, Result};

/// A 2-D point with double precision coordinates.
///
/// The layout is `#[repr(C)]` so that an interleaved `[x0, y0, x1, y1, ...]` buffer can be viewed
/// as a slice of points without copying, see [`Point2D::slice_from_interleaved`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Point2D {
    /// The `x` coordinate.
    pub x: f64,
    /// The `y` coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Copy the coordinates out of anything implementing [`CoordTrait`].
    pub fn from_coord(coord: &impl CoordTrait<T = f64>) -> Self {
        Self::new(coord.x(), coord.y())
    }

    /// Reinterpret an interleaved `[x0, y0, x1, y1, ...]` buffer as points.
    ///
    /// ```
    /// use polygon_bvh::Point2D;
    ///
    /// let points = Point2D::slice_from_interleaved(&[0., 1., 2., 3.]).unwrap();
    /// assert_eq!(points, &[Point2D::new(0., 1.), Point2D::new(2., 3.)]);
    /// ```
    pub fn slice_from_interleaved(coords: &[f64]) -> Result<&[Point2D]> {
        bytemuck::try_cast_slice(coords).map_err(|err| {
            PolygonIndexError::InvalidInput(format!(
                "Interleaved buffer of length {} is not a sequence of (x, y) pairs: {}.",
                coords.len(),
                err
            ))
        })
    }

    #[inline]
    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub(crate) fn squared_distance(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<[f64; 2]> for Point2D {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl CoordTrait for Point2D {
    type T = f64;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interleaved_buffer_is_viewed_in_place() {
        let coords = vec![0.5, 1.5, -2., 4.];
        let points = Point2D::slice_from_interleaved(&coords).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], Point2D::new(-2., 4.));
        assert_eq!(points.as_ptr() as *const f64, coords.as_ptr());
    }

    #[test]
    fn odd_interleaved_buffer_is_rejected() {
        let err = Point2D::slice_from_interleaved(&[0., 1., 2.]).unwrap_err();
        assert!(matches!(err, PolygonIndexError::InvalidInput(_)));
    }

    #[test]
    fn coord_trait_roundtrip() {
        let p = Point2D::new(3., 4.);
        assert_eq!(Point2D::from_coord(&p), p);
        assert_eq!(p.nth_or_panic(1), 4.);
    }
}
