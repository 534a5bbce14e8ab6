//! CSV tables of scenarios (polars) for the `batch` and `sample` commands.
//!
//! Input layout: one row per scenario, columns named like the `Scenario`
//! fields. `facility`, `market`, `adj_service_qty`, `contain_within_original`
//! and `tol` are optional; missing required numbers become NaN and are
//! rejected row-by-row by the validation gate.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use trapezium::api::Scenario;

const REQUIRED: [&str; 9] = [
    "orig_min",
    "orig_max",
    "orig_low_bp",
    "orig_high_bp",
    "max_service_qty",
    "adj_min",
    "adj_max",
    "adj_low_bp",
    "adj_high_bp",
];

fn f64_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(col) = df.column(name) else {
        return Ok(None);
    };
    let cast = col
        .cast(&DataType::Float64)
        .with_context(|| format!("column {name} is not numeric"))?;
    Ok(Some(cast.f64()?.into_iter().collect()))
}

fn str_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Ok(col) = df.column(name) else {
        return Ok(None);
    };
    let cast = col.cast(&DataType::String)?;
    Ok(Some(
        cast.str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect(),
    ))
}

fn bool_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<bool>>>> {
    let Ok(col) = df.column(name) else {
        return Ok(None);
    };
    let cast = col
        .cast(&DataType::Boolean)
        .with_context(|| format!("column {name} is not boolean"))?;
    Ok(Some(cast.bool()?.into_iter().collect()))
}

/// Convert a frame in the input layout into scenarios.
pub fn scenarios_from_frame(df: &DataFrame) -> Result<Vec<Scenario>> {
    let n = df.height();
    let mut numbers = Vec::with_capacity(REQUIRED.len());
    for name in REQUIRED {
        let col = f64_column(df, name)?.with_context(|| format!("missing column {name}"))?;
        numbers.push(col);
    }
    let adj_qty = f64_column(df, "adj_service_qty")?;
    let tol = f64_column(df, "tol")?;
    let contain = bool_column(df, "contain_within_original")?;
    let facility = str_column(df, "facility")?;
    let market = str_column(df, "market")?;

    let defaults = Scenario::default();
    let num = |k: usize, i: usize| numbers[k][i].unwrap_or(f64::NAN);
    let text = |col: &Option<Vec<Option<String>>>, i: usize, fallback: &str| {
        col.as_ref()
            .and_then(|c| c[i].clone())
            .unwrap_or_else(|| fallback.to_string())
    };

    let rows = (0..n)
        .map(|i| Scenario {
            facility: text(&facility, i, &defaults.facility),
            market: text(&market, i, &defaults.market),
            orig_min: num(0, i),
            orig_max: num(1, i),
            orig_low_bp: num(2, i),
            orig_high_bp: num(3, i),
            max_service_qty: num(4, i),
            adj_min: num(5, i),
            adj_max: num(6, i),
            adj_low_bp: num(7, i),
            adj_high_bp: num(8, i),
            adj_service_qty: adj_qty.as_ref().and_then(|c| c[i]),
            contain_within_original: contain
                .as_ref()
                .and_then(|c| c[i])
                .unwrap_or(defaults.contain_within_original),
            tol: tol.as_ref().and_then(|c| c[i]).unwrap_or(defaults.tol),
        })
        .collect();
    Ok(rows)
}

pub fn read_scenarios(path: &str) -> Result<Vec<Scenario>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {path}"))?
        .collect()
        .with_context(|| format!("reading {path}"))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");
    scenarios_from_frame(&df)
}

/// Frame in the input layout (what `sample` writes and `batch` reads).
pub fn scenarios_frame(rows: &[Scenario]) -> Result<DataFrame> {
    let f = |get: fn(&Scenario) -> f64| rows.iter().map(get).collect::<Vec<f64>>();
    let df = df!(
        "facility" => rows.iter().map(|s| s.facility.clone()).collect::<Vec<_>>(),
        "market" => rows.iter().map(|s| s.market.clone()).collect::<Vec<_>>(),
        "orig_min" => f(|s| s.orig_min),
        "orig_max" => f(|s| s.orig_max),
        "orig_low_bp" => f(|s| s.orig_low_bp),
        "orig_high_bp" => f(|s| s.orig_high_bp),
        "max_service_qty" => f(|s| s.max_service_qty),
        "adj_min" => f(|s| s.adj_min),
        "adj_max" => f(|s| s.adj_max),
        "adj_low_bp" => f(|s| s.adj_low_bp),
        "adj_high_bp" => f(|s| s.adj_high_bp),
        "adj_service_qty" => rows.iter().map(|s| s.adj_service_qty).collect::<Vec<_>>(),
        "contain_within_original" => rows.iter().map(|s| s.contain_within_original).collect::<Vec<_>>(),
        "tol" => f(|s| s.tol)
    )?;
    Ok(df)
}

/// Evaluate every scenario; failed rows keep nulls and carry the gate message.
pub fn evaluate_frame(rows: &[Scenario]) -> Result<DataFrame> {
    let n = rows.len();
    let mut adj_min = Vec::with_capacity(n);
    let mut adj_max = Vec::with_capacity(n);
    let mut adj_low_bp = Vec::with_capacity(n);
    let mut adj_high_bp = Vec::with_capacity(n);
    let mut adj_qty = Vec::with_capacity(n);
    let mut reduced = Vec::with_capacity(n);
    let mut reduction = Vec::with_capacity(n);
    let mut error: Vec<Option<String>> = Vec::with_capacity(n);

    for (i, s) in rows.iter().enumerate() {
        match s.evaluate() {
            Ok(report) => {
                let a = report.adjustment.adjusted;
                let (r, dr) = report.adjustment.reduction_pair();
                adj_min.push(Some(a.min));
                adj_max.push(Some(a.max));
                adj_low_bp.push(Some(a.low_bp));
                adj_high_bp.push(Some(a.high_bp));
                adj_qty.push(Some(a.height));
                reduced.push(r);
                reduction.push(dr);
                error.push(None);
            }
            Err(e) => {
                tracing::warn!(row = i, facility = %s.facility, error = %e, "rejected");
                for col in [
                    &mut adj_min,
                    &mut adj_max,
                    &mut adj_low_bp,
                    &mut adj_high_bp,
                    &mut adj_qty,
                    &mut reduced,
                    &mut reduction,
                ] {
                    col.push(None);
                }
                error.push(Some(e.to_string()));
            }
        }
    }

    let mut df = scenarios_frame(rows)?;
    let out = df!(
        "final_adj_min" => adj_min,
        "final_adj_max" => adj_max,
        "final_adj_low_bp" => adj_low_bp,
        "final_adj_high_bp" => adj_high_bp,
        "final_adj_service_qty" => adj_qty,
        "reduced_service_qty" => reduced,
        "service_qty_reduction" => reduction,
        "error" => error
    )?;
    df = df.hstack(out.get_columns())?;
    Ok(df)
}

pub fn write_csv(df: &mut DataFrame, path: &str) -> Result<()> {
    let out_path = Path::new(path);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(out_path).with_context(|| format!("creating {path}"))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}
