//! Named scenario inputs, form defaults, and the validation gate.
//!
//! A `Scenario` holds the fourteen named inputs of one FCESS trapezium request.
//! `facility` and `market` are display-only and pass through untouched.
//! `evaluate` is the only entry point that runs the validation gate; the
//! adjuster itself assumes a well-ordered original.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::adjust::{adjust_trapezoid, AdjustCfg, Adjustment, Candidate};
use crate::cfg::DEFAULT_TOL;
use crate::figure::Figure;
use crate::shape::Trapezoid;

/// Errors raised by the validation gate.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioError {
    /// A numeric input is NaN or infinite.
    NonFinite { field: &'static str },
    /// `orig_min <= orig_low_bp <= orig_high_bp <= orig_max` does not hold.
    OriginalOutOfOrder,
    /// `max_service_qty < 0`.
    NegativeHeight,
    /// `adj_service_qty < 0` (an absent quantity passes).
    NegativeServiceQty,
    /// `tol < 0`.
    NegativeTolerance,
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::OriginalOutOfOrder => {
                write!(f, "Original must satisfy: min ≤ low_bp ≤ high_bp ≤ max")
            }
            Self::NegativeHeight => write!(f, "Max service quantity H must be ≥ 0"),
            Self::NegativeServiceQty => write!(f, "Adjusted service quantity h must be ≥ 0"),
            Self::NegativeTolerance => write!(f, "Tolerance must be ≥ 0"),
        }
    }
}

impl std::error::Error for ScenarioError {}

/// One trapezium request: original envelope, adjusted candidate, and flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub facility: String,
    pub market: String,
    pub orig_min: f64,
    pub orig_max: f64,
    pub orig_low_bp: f64,
    pub orig_high_bp: f64,
    pub max_service_qty: f64,
    pub adj_min: f64,
    pub adj_max: f64,
    pub adj_low_bp: f64,
    pub adj_high_bp: f64,
    pub adj_service_qty: Option<f64>,
    pub contain_within_original: bool,
    pub tol: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            facility: "Facility name".to_string(),
            market: "Market type".to_string(),
            orig_min: 0.0,
            orig_max: 120.0,
            orig_low_bp: 30.0,
            orig_high_bp: 90.0,
            max_service_qty: 40.0,
            adj_min: 10.0,
            adj_max: 110.0,
            adj_low_bp: 20.0,
            adj_high_bp: 80.0,
            adj_service_qty: None,
            contain_within_original: true,
            tol: DEFAULT_TOL,
        }
    }
}

impl Scenario {
    #[inline]
    pub fn original(&self) -> Trapezoid {
        Trapezoid::new(
            self.orig_min,
            self.orig_max,
            self.orig_low_bp,
            self.orig_high_bp,
            self.max_service_qty,
        )
    }

    #[inline]
    pub fn candidate(&self) -> Candidate {
        Candidate::new(
            self.adj_min,
            self.adj_max,
            self.adj_low_bp,
            self.adj_high_bp,
            self.adj_service_qty,
        )
    }

    #[inline]
    pub fn cfg(&self) -> AdjustCfg {
        AdjustCfg {
            contain_within_original: self.contain_within_original,
            tol: self.tol,
        }
    }

    /// Check the inputs before the adjuster runs.
    ///
    /// Order: non-finite values, original ordering, negative height, negative
    /// adjusted quantity, negative tolerance.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let numbers = [
            ("orig_min", self.orig_min),
            ("orig_max", self.orig_max),
            ("orig_low_bp", self.orig_low_bp),
            ("orig_high_bp", self.orig_high_bp),
            ("max_service_qty", self.max_service_qty),
            ("adj_min", self.adj_min),
            ("adj_max", self.adj_max),
            ("adj_low_bp", self.adj_low_bp),
            ("adj_high_bp", self.adj_high_bp),
            ("adj_service_qty", self.adj_service_qty.unwrap_or(0.0)),
            ("tol", self.tol),
        ];
        if let Some(&(field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScenarioError::NonFinite { field });
        }
        if !self.original().is_ordered() {
            return Err(ScenarioError::OriginalOutOfOrder);
        }
        if self.max_service_qty < 0.0 {
            return Err(ScenarioError::NegativeHeight);
        }
        if self.adj_service_qty.is_some_and(|h| h < 0.0) {
            return Err(ScenarioError::NegativeServiceQty);
        }
        if self.tol < 0.0 {
            return Err(ScenarioError::NegativeTolerance);
        }
        Ok(())
    }

    /// Validate, adjust, and describe the resulting figure.
    pub fn evaluate(&self) -> Result<ScenarioReport, ScenarioError> {
        self.validate()?;
        let adjustment = adjust_trapezoid(&self.original(), self.candidate(), self.cfg());
        let figure = Figure::build(&self.facility, &self.market, &adjustment);
        Ok(ScenarioReport {
            facility: self.facility.clone(),
            market: self.market.clone(),
            adjustment,
            figure,
        })
    }

    /// File name the exporter uses for the rendered image.
    pub fn export_file_name(&self) -> String {
        format!("{}_{}_trapezium.png", self.facility, self.market)
    }
}

/// Outcome of a validated scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub facility: String,
    pub market: String,
    pub adjustment: Adjustment,
    pub figure: Figure,
}

impl ScenarioReport {
    /// Human-readable result lines (three decimals, MW).
    pub fn summary(&self) -> String {
        match self.adjustment.reduction {
            Some(r) => format!(
                "Reduced service qty (MW): {:.3}\nService qty reduction (MW): {:.3}",
                r.reduced_service_qty, r.service_qty_reduction
            ),
            None => "No FCESS max service quantity reduction.".to_string(),
        }
    }
}
