use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates of the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Exclusive right edge, saturating at `usize::MAX`.
    #[inline]
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    /// Geometric center, `(x + w/2, y + h/2)`, without integer truncation.
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Intersect with `[0, width) x [0, height)`.
    ///
    /// A region that lies completely outside collapses to zero size at the
    /// nearest image edge.
    pub fn clamp_to(&self, width: usize, height: usize) -> Region {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.right().min(width);
        let y1 = self.bottom().min(height);
        Region {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// `true` if the region lies entirely inside a `width x height` image.
    pub fn fits_in(&self, width: usize, height: usize) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// `true` if `self` lies inside `other`.
    pub fn is_inside(&self, other: &Region) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }
}
