//! Trapezium adjuster: clamp a candidate shape into the original envelope.
//!
//! Purpose
//! - Take the original FCESS trapezium and a caller-supplied adjusted
//!   candidate, force the candidate's boundaries into order inside the
//!   original, and derive the adjusted plateau height from how far each
//!   boundary moved along the original's slanted sides.
//! - Report the plateau reduction, if any, as `Some(Reduction)`.
//!
//! Algorithm (single pass)
//! 1. Containment (optional): pull every boundary and the height toward the
//!    original envelope.
//! 2. Ordering: clamp `min`, `low_bp`, `high_bp`, `max` left to right, each
//!    bounded below by its already-clamped left neighbour.
//! 3. Slant classification of the original sides (`|Δx| > tol`).
//! 4. Height candidates by linear interpolation along each slanted side. A
//!    slanted left side also pins `high_bp` to `max`, so the right side of the
//!    adjusted shape is drawn vertical and only one derived height is shared.
//! 5. Reduction when the final height sits more than `tol` below `H`.
//!
//! The `high_bp := max` overwrite in step 4 runs after the right-side
//! candidate is computed; callers relying on both sides being tracked
//! independently will lose the right-side breakpoint.

use serde::{Deserialize, Serialize};

use crate::cfg::DEFAULT_TOL;
use crate::shape::{clamp_to, Quad, Trapezoid};

/// Adjuster configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustCfg {
    /// Clamp the candidate toward the original envelope before ordering.
    pub contain_within_original: bool,
    /// Slant threshold, denominator guard and reduction threshold.
    pub tol: f64,
}

impl Default for AdjustCfg {
    fn default() -> Self {
        Self {
            contain_within_original: true,
            tol: DEFAULT_TOL,
        }
    }
}

/// Adjusted boundaries as supplied by the caller (unconstrained).
///
/// `service_qty = None` means "use the original plateau height".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub min: f64,
    pub max: f64,
    pub low_bp: f64,
    pub high_bp: f64,
    pub service_qty: Option<f64>,
}

impl Candidate {
    #[inline]
    pub fn new(min: f64, max: f64, low_bp: f64, high_bp: f64, service_qty: Option<f64>) -> Self {
        Self {
            min,
            max,
            low_bp,
            high_bp,
            service_qty,
        }
    }
}

impl From<Trapezoid> for Candidate {
    fn from(t: Trapezoid) -> Self {
        Self::new(t.min, t.max, t.low_bp, t.high_bp, Some(t.height))
    }
}

/// Plateau reduction relative to the original height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    /// Final adjusted plateau height.
    pub reduced_service_qty: f64,
    /// `H - reduced_service_qty` (strictly greater than `tol`).
    pub service_qty_reduction: f64,
}

/// Result of one adjuster pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub original: Trapezoid,
    pub adjusted: Trapezoid,
    /// `None` when the adjusted height is within `tol` of the original.
    pub reduction: Option<Reduction>,
}

impl Adjustment {
    #[inline]
    pub fn original_polygon(&self) -> Quad {
        self.original.polygon()
    }

    #[inline]
    pub fn adjusted_polygon(&self) -> Quad {
        self.adjusted.polygon()
    }

    /// `(reduced_service_qty, service_qty_reduction)`, both `None` without a reduction.
    #[inline]
    pub fn reduction_pair(&self) -> (Option<f64>, Option<f64>) {
        match self.reduction {
            Some(r) => (Some(r.reduced_service_qty), Some(r.service_qty_reduction)),
            None => (None, None),
        }
    }
}

/// Adjust `candidate` against `original` in a single pass.
///
/// Pre: `original` is ordered (`min <= low_bp <= high_bp <= max`) with
/// `height >= 0`; this is the caller's responsibility (see `Scenario::validate`).
/// Post: `orig.min <= adj.min <= adj.low_bp <= orig.low_bp`,
/// `adj.low_bp <= adj.high_bp <= adj.max <= orig.max`, `0 <= adj.height <= H`,
/// and `adj.high_bp <= orig.high_bp` whenever the original left side is vertical.
pub fn adjust_trapezoid(
    original: &Trapezoid,
    candidate: Candidate,
    cfg: AdjustCfg,
) -> Adjustment {
    let o = original;
    let h_max = o.height;
    let tol = cfg.tol;

    let mut min = candidate.min;
    let mut max = candidate.max;
    let mut low_bp = candidate.low_bp;
    let mut high_bp = candidate.high_bp;
    let mut height = candidate.service_qty.unwrap_or(h_max);

    if cfg.contain_within_original {
        min = min.max(o.min);
        max = max.min(o.max);
        low_bp = low_bp.min(o.low_bp);
        high_bp = high_bp.min(o.high_bp);
        height = height.min(h_max);
    }

    // Left to right: each bound depends on the neighbour already clamped.
    min = clamp_to(min, o.min, o.low_bp);
    low_bp = clamp_to(low_bp, min, o.low_bp);
    high_bp = clamp_to(high_bp, low_bp, o.high_bp);
    max = clamp_to(max, high_bp, o.max);

    let mut heights: Vec<f64> = Vec::with_capacity(2);
    if o.right_slanted(tol) {
        let denom = o.max - o.high_bp;
        if denom.abs() > tol {
            let h_right = h_max * (max - high_bp) / denom;
            heights.push(h_right.min(h_max).max(0.0));
        }
    }
    if o.left_slanted(tol) {
        high_bp = max;
        let denom = o.low_bp - o.min;
        if denom.abs() > tol {
            let h_left = h_max * (low_bp - min) / denom;
            heights.push(h_left.min(h_max).max(0.0));
        }
    }

    if let Some(h_slopes) = heights.into_iter().reduce(f64::min) {
        height = h_slopes.min(height);
    }
    height = height.min(h_max).max(0.0);

    let reduction = (height + tol < h_max).then(|| Reduction {
        reduced_service_qty: height,
        service_qty_reduction: h_max - height,
    });

    Adjustment {
        original: *o,
        adjusted: Trapezoid::new(min, max, low_bp, high_bp, height),
        reduction,
    }
}
