//! Axis-aligned bounding boxes.

use geo_traits::RectTrait;

use crate::r#type::Point2D;

/// An axis-aligned bounding box.
///
/// [`BoundingBox::EMPTY`] uses `+inf` minimums and `-inf` maximums so that it is the identity for
/// both [`BoundingBox::expand`] and [`BoundingBox::merge`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum `x` value.
    pub min_x: f64,
    /// Minimum `y` value.
    pub min_y: f64,
    /// Maximum `x` value.
    pub max_x: f64,
    /// Maximum `y` value.
    pub max_y: f64,
}

impl BoundingBox {
    /// The empty box.
    pub const EMPTY: Self = Self {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    /// Create a box from its extents.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The degenerate box covering exactly one point.
    pub const fn from_point(point: &Point2D) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// The smallest box covering all `points`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2D>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |bbox, point| bbox.expand(point))
    }

    /// Returns `true` if nothing has been added to this box yet.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow the box to include `point`.
    #[inline]
    #[must_use]
    pub fn expand(self, point: &Point2D) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }

    /// The box covering both `self` and `other`.
    #[inline]
    #[must_use]
    pub fn merge(self, other: &BoundingBox) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Returns `true` if `point` lies inside the box or on its boundary.
    #[inline]
    pub fn contains_point(&self, point: &Point2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl RectTrait for BoundingBox {
    type T = f64;
    type CoordType<'a>
        = Point2D
    where
        Self: 'a;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn min(&self) -> Self::CoordType<'_> {
        Point2D::new(self.min_x, self.min_y)
    }

    fn max(&self) -> Self::CoordType<'_> {
        Point2D::new(self.max_x, self.max_y)
    }
}
