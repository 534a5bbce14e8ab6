//! Renderer-neutral description of the trapezium plot.
//!
//! A `Figure` lists everything a plotting backend needs: axis ranges, the two
//! styled polygons, labelled points (deduplicated), the optional reduction
//! line, and legend entries. No drawing happens here; backends walk the data.
//!
//! Conventions
//! - Original is solid blue, adjusted is dashed orange.
//! - x range pads the union of both shapes by 5% of its span on each side;
//!   y range is `[0, 1.1 H]` (or `[0, 1]` when `H = 0`).

mod labels;

pub use labels::{format_g, LabelRegistry};

use nalgebra::Vector2;
use serde::Serialize;

use crate::adjust::Adjustment;
use crate::cfg::LABEL_TOL;
use crate::shape::Quad;

pub const ORIGINAL_COLOR: &str = "#1f77b4";
pub const ADJUSTED_COLOR: &str = "#ff7f0e";

const X_PAD_FRAC: f64 = 0.05;
const Y_HEADROOM: f64 = 1.1;
const FILL_ALPHA: f64 = 0.2;
const POINT_LABEL_OFFSET: [f64; 2] = [6.0, 6.0];
const REDUCTION_LABEL_OFFSET: [f64; 2] = [6.0, -12.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Original,
    Adjusted,
}

impl Role {
    pub fn color(self) -> &'static str {
        match self {
            Role::Original => ORIGINAL_COLOR,
            Role::Adjusted => ADJUSTED_COLOR,
        }
    }

    pub fn line_style(self) -> LineStyle {
        match self {
            Role::Original => LineStyle::Solid,
            Role::Adjusted => LineStyle::Dashed,
        }
    }

    pub fn stroke(self) -> Stroke {
        Stroke {
            color: self.color(),
            style: self.line_style(),
            width: 2.0,
        }
    }

    pub fn legend_label(self) -> &'static str {
        match self {
            Role::Original => "original",
            Role::Adjusted => "adjusted",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stroke {
    pub color: &'static str,
    pub style: LineStyle,
    pub width: f64,
}

/// Filled outline of one trapezoid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolygonLayer {
    pub role: Role,
    pub vertices: Quad,
    pub stroke: Stroke,
    pub fill_alpha: f64,
}

impl PolygonLayer {
    fn new(role: Role, vertices: Quad) -> Self {
        Self {
            role,
            vertices,
            stroke: role.stroke(),
            fill_alpha: FILL_ALPHA,
        }
    }

    /// Vertices with the first one repeated at the end (closed outline).
    pub fn closed_path(&self) -> Vec<Vector2<f64>> {
        let mut path = self.vertices.to_vec();
        path.push(self.vertices[0]);
        path
    }
}

/// Text anchored at a data point, offset in typographic points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    pub at: Vector2<f64>,
    pub text: String,
    pub offset: [f64; 2],
    /// Dot drawn at `at` in this color; `None` for text-only annotations.
    pub marker: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReductionLine {
    pub y: f64,
    pub stroke: Stroke,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub stroke: Stroke,
}

/// Complete plot description for one adjustment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub layers: Vec<PolygonLayer>,
    pub labels: Vec<Label>,
    pub reduction_line: Option<ReductionLine>,
    pub legend: Vec<LegendEntry>,
    pub grid_alpha: f64,
    pub size_in: [f64; 2],
    pub dpi: u32,
}

impl Figure {
    pub fn build(facility: &str, market: &str, adj: &Adjustment) -> Self {
        let o = adj.original;
        let a = adj.adjusted;
        let h_max = o.height;

        let x_lo = o.min.min(a.min);
        let x_hi = o.max.max(a.max);
        let span = if x_hi - x_lo == 0.0 { 1.0 } else { x_hi - x_lo };
        let x_range = [x_lo - X_PAD_FRAC * span, x_hi + X_PAD_FRAC * span];
        let y_range = [0.0, if h_max > 0.0 { h_max * Y_HEADROOM } else { 1.0 }];

        let g = format_g;
        let points = [
            (o.min, 0.0, format!("min={}", g(o.min)), Role::Original),
            (o.max, 0.0, format!("max={}", g(o.max)), Role::Original),
            (
                o.low_bp,
                h_max,
                format!("low_bp={}, H={}", g(o.low_bp), g(h_max)),
                Role::Original,
            ),
            (
                o.high_bp,
                h_max,
                format!("high_bp={}, H={}", g(o.high_bp), g(h_max)),
                Role::Original,
            ),
            (a.min, 0.0, format!("adj_min={}", g(a.min)), Role::Adjusted),
            (a.max, 0.0, format!("adj_max={}", g(a.max)), Role::Adjusted),
            (
                a.low_bp,
                a.height,
                format!("adj_low_bp={}, h={}", g(a.low_bp), g(a.height)),
                Role::Adjusted,
            ),
            (
                a.high_bp,
                a.height,
                format!("adj_high_bp={}, h={}", g(a.high_bp), g(a.height)),
                Role::Adjusted,
            ),
        ];

        let mut registry = LabelRegistry::new(LABEL_TOL);
        let mut labels = Vec::with_capacity(points.len() + 1);
        for (x, y, text, role) in points {
            let at = Vector2::new(x, y);
            if registry.place(at) {
                labels.push(Label {
                    at,
                    text,
                    offset: POINT_LABEL_OFFSET,
                    marker: Some(role.color()),
                });
            }
        }

        let reduction_line = adj.reduction.map(|r| {
            let at = Vector2::new(x_lo, r.reduced_service_qty);
            if registry.place(at) {
                labels.push(Label {
                    at,
                    text: format!("reduced service quantity = {}", g(r.reduced_service_qty)),
                    offset: REDUCTION_LABEL_OFFSET,
                    marker: None,
                });
            }
            ReductionLine {
                y: r.reduced_service_qty,
                stroke: Stroke {
                    color: ADJUSTED_COLOR,
                    style: LineStyle::Dotted,
                    width: 1.0,
                },
            }
        });

        let legend = [Role::Original, Role::Adjusted]
            .into_iter()
            .map(|role| LegendEntry {
                label: role.legend_label(),
                stroke: role.stroke(),
            })
            .collect();

        Self {
            title: format!("{facility}: {market} FCESS trapezium"),
            x_label: "Enablement / Breakpoints (MW)",
            y_label: "Service quantity (MW)",
            x_range,
            y_range,
            layers: vec![
                PolygonLayer::new(Role::Original, adj.original_polygon()),
                PolygonLayer::new(Role::Adjusted, adj.adjusted_polygon()),
            ],
            labels,
            reduction_line,
            legend,
            grid_alpha: 0.15,
            size_in: [8.0, 5.0],
            dpi: 200,
        }
    }

    pub fn layer(&self, role: Role) -> Option<&PolygonLayer> {
        self.layers.iter().find(|l| l.role == role)
    }
}
