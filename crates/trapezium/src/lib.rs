//! FCESS trapezium geometry: envelope adjustment and plateau reduction.
//!
//! Layout
//! - `shape`: the trapezoid type and its vertex/edge helpers.
//! - `adjust`: the single-pass adjuster that clamps a candidate shape into the
//!   original envelope and derives its plateau height from slanted edges.
//! - `scenario`: the fourteen named inputs, form defaults, and the validation gate.
//! - `figure`: renderer-neutral plot description (axes, layers, labels).
//! - `sampler`: seeded scenario sampler for property tests and benches.
//!
//! Everything here is plain data plus pure functions; nothing is cached between calls.

pub mod adjust;
pub mod api;
pub mod cfg;
pub mod figure;
pub mod sampler;
pub mod scenario;
pub mod shape;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::adjust::{adjust_trapezoid, AdjustCfg, Adjustment, Candidate, Reduction};
    pub use crate::figure::{format_g, Figure};
    pub use crate::scenario::{Scenario, ScenarioError, ScenarioReport};
    pub use crate::shape::{Quad, Trapezoid};
    pub use nalgebra::Vector2 as Vec2;
}
