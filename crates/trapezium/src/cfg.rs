//! Tolerance defaults.
//!
//! The adjuster tolerance is caller-configurable through `AdjustCfg::tol`;
//! the label tolerance is fixed because it only affects annotation placement.

/// Default tolerance for slant classification, denominator guards and the
/// reduction threshold.
pub const DEFAULT_TOL: f64 = 1e-6;
/// Two annotated points closer than this on both axes share one label.
pub const LABEL_TOL: f64 = 1e-4;
