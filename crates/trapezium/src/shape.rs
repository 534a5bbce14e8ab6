//! Trapezoid with a flat base on `y = 0` and a flat plateau at `y = height`.
//!
//! Vertex order is fixed: `(min,0)`, `(max,0)`, `(high_bp,H)`, `(low_bp,H)`.
//! The plateau may have zero length and either side may be vertical.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Four polygon vertices in the fixed order above.
pub type Quad = [Vector2<f64>; 4];

/// Trapezoid described by its four x-boundaries and plateau height.
///
/// Invariants (for a well-formed original):
/// - `min <= low_bp <= high_bp <= max`
/// - `height >= 0`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trapezoid {
    pub min: f64,
    pub max: f64,
    pub low_bp: f64,
    pub high_bp: f64,
    pub height: f64,
}

impl Trapezoid {
    #[inline]
    pub fn new(min: f64, max: f64, low_bp: f64, high_bp: f64, height: f64) -> Self {
        Self {
            min,
            max,
            low_bp,
            high_bp,
            height,
        }
    }

    /// Vertices `[(min,0), (max,0), (high_bp,H), (low_bp,H)]`.
    #[inline]
    pub fn polygon(&self) -> Quad {
        [
            Vector2::new(self.min, 0.0),
            Vector2::new(self.max, 0.0),
            Vector2::new(self.high_bp, self.height),
            Vector2::new(self.low_bp, self.height),
        ]
    }

    /// `min <= low_bp <= high_bp <= max` (exact comparison, no tolerance).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min <= self.low_bp && self.low_bp <= self.high_bp && self.high_bp <= self.max
    }

    /// Left side rises from `min` to `low_bp`; slanted when they differ by more than `tol`.
    #[inline]
    pub fn left_slanted(&self, tol: f64) -> bool {
        (self.low_bp - self.min).abs() > tol
    }

    /// Right side falls from `high_bp` to `max`; slanted when they differ by more than `tol`.
    #[inline]
    pub fn right_slanted(&self, tol: f64) -> bool {
        (self.high_bp - self.max).abs() > tol
    }
}

/// `min(max(v, lo), hi)`; unlike `f64::clamp` this never panics when `lo > hi`.
#[inline]
pub(crate) fn clamp_to(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
