use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;
use trapezium::api::{SamplerCfg, Scenario, ScenarioReport, ScenarioStream};

mod batch;
mod provenance;

#[derive(Parser)]
#[command(name = "trapezium")]
#[command(about = "FCESS trapezium adjuster: clamp an adjusted envelope and report reductions")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Adjust one scenario and print the service quantity reduction
    Adjust(AdjustArgs),
    /// Evaluate every row of a scenario CSV and write a results CSV
    Batch {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
    },
    /// Write seeded random scenarios in the batch input layout
    Sample {
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: String,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Scenario inputs; anything not given falls back to `--scenario` or the form defaults.
#[derive(Args)]
struct AdjustArgs {
    /// JSON file with (some of) the scenario fields
    #[arg(long)]
    scenario: Option<String>,
    #[arg(long)]
    facility: Option<String>,
    #[arg(long)]
    market: Option<String>,
    /// Standing enablement min (MW)
    #[arg(long, allow_hyphen_values = true)]
    orig_min: Option<f64>,
    /// Standing enablement max (MW)
    #[arg(long, allow_hyphen_values = true)]
    orig_max: Option<f64>,
    /// Standing low breakpoint (MW)
    #[arg(long, allow_hyphen_values = true)]
    orig_low_bp: Option<f64>,
    /// Standing high breakpoint (MW)
    #[arg(long, allow_hyphen_values = true)]
    orig_high_bp: Option<f64>,
    /// Max service quantity H (MW)
    #[arg(long, allow_hyphen_values = true)]
    max_service_qty: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    adj_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    adj_max: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    adj_low_bp: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    adj_high_bp: Option<f64>,
    /// Adjusted service quantity h (MW); omit to derive it from the slopes
    #[arg(long, allow_hyphen_values = true)]
    adj_service_qty: Option<f64>,
    /// Derive h from the slopes even if `--scenario` sets a quantity
    #[arg(long, conflicts_with = "adj_service_qty")]
    derive_service_qty: bool,
    /// Let the adjusted shape extend beyond the original envelope
    #[arg(long)]
    no_contain: bool,
    #[arg(long)]
    tol: Option<f64>,
    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    json: bool,
    /// Write the figure description (JSON) here, plus a provenance sidecar
    #[arg(long)]
    figure: Option<String>,
}

impl AdjustArgs {
    fn scenario(&self) -> Result<Scenario> {
        let mut s = match &self.scenario {
            Some(path) => {
                let raw = std::fs::read(path).with_context(|| format!("reading {path}"))?;
                serde_json::from_slice::<Scenario>(&raw)
                    .with_context(|| format!("parsing scenario {path}"))?
            }
            None => Scenario::default(),
        };
        if let Some(v) = &self.facility {
            s.facility = v.clone();
        }
        if let Some(v) = &self.market {
            s.market = v.clone();
        }
        let overrides = [
            (self.orig_min, &mut s.orig_min),
            (self.orig_max, &mut s.orig_max),
            (self.orig_low_bp, &mut s.orig_low_bp),
            (self.orig_high_bp, &mut s.orig_high_bp),
            (self.max_service_qty, &mut s.max_service_qty),
            (self.adj_min, &mut s.adj_min),
            (self.adj_max, &mut s.adj_max),
            (self.adj_low_bp, &mut s.adj_low_bp),
            (self.adj_high_bp, &mut s.adj_high_bp),
            (self.tol, &mut s.tol),
        ];
        for (given, slot) in overrides {
            if let Some(v) = given {
                *slot = v;
            }
        }
        if self.adj_service_qty.is_some() {
            s.adj_service_qty = self.adj_service_qty;
        }
        if self.derive_service_qty {
            s.adj_service_qty = None;
        }
        if self.no_contain {
            s.contain_within_original = false;
        }
        Ok(s)
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Adjust(args) => adjust(args),
        Action::Batch { input, out } => run_batch(input, out),
        Action::Sample { count, seed, out } => sample(count, seed, out),
        Action::Report => report(),
    }
}

#[derive(Serialize)]
struct AdjustOutput<'a> {
    scenario: &'a Scenario,
    report: &'a ScenarioReport,
}

fn adjust(args: AdjustArgs) -> Result<()> {
    let scenario = args.scenario()?;
    let report = scenario.evaluate()?;
    let (reduced, reduction) = report.adjustment.reduction_pair();
    tracing::info!(
        facility = %scenario.facility,
        market = %scenario.market,
        contain = scenario.contain_within_original,
        reduced = ?reduced,
        reduction = ?reduction,
        "adjust"
    );

    if args.json {
        let doc = AdjustOutput {
            scenario: &scenario,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        let a = report.adjustment.adjusted;
        println!(
            "Adjusted: min={} low_bp={} high_bp={} max={} h={}",
            a.min, a.low_bp, a.high_bp, a.max, a.height
        );
        println!("{}", report.summary());
    }

    if let Some(out) = &args.figure {
        let out_path = Path::new(out);
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(out_path, serde_json::to_vec_pretty(&report.figure)?)
            .with_context(|| format!("writing {out}"))?;
        let payload = provenance::Payload::new(
            "adjust",
            serde_json::json!({
                "scenario": &scenario,
                "export_file_name": scenario.export_file_name(),
            }),
        );
        let sidecar = provenance::write_sidecar(out_path, payload)?;
        tracing::info!(figure = %out, sidecar = %sidecar.display(), "figure_written");
    }
    Ok(())
}

fn run_batch(input: String, out: String) -> Result<()> {
    tracing::info!(input, out, "batch");
    let rows = batch::read_scenarios(&input)?;
    let mut df = batch::evaluate_frame(&rows)?;
    batch::write_csv(&mut df, &out)?;
    let payload = provenance::Payload::new(
        "batch",
        serde_json::json!({ "input": input, "rows": rows.len() }),
    );
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn sample(count: usize, seed: u64, out: String) -> Result<()> {
    tracing::info!(count, seed, out, "sample");
    let rows: Vec<Scenario> = ScenarioStream::new(SamplerCfg::default(), seed)?
        .take(count)
        .map(|(s, _)| s)
        .collect();
    let mut df = batch::scenarios_frame(&rows)?;
    batch::write_csv(&mut df, &out)?;
    let payload = provenance::Payload::new(
        "sample",
        serde_json::json!({ "count": count, "seed": seed }),
    );
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn report() -> Result<()> {
    let payload = provenance::Payload::new(
        "report",
        serde_json::json!({ "defaults": Scenario::default() }),
    );
    let doc = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cmd = Cmd::try_parse_from([
            "trapezium",
            "adjust",
            "--orig-min",
            "-10",
            "--adj-service-qty",
            "12.5",
            "--no-contain",
            "--facility",
            "Unit 2",
        ])
        .unwrap();
        let Action::Adjust(args) = cmd.action else {
            panic!("expected adjust");
        };
        let s = args.scenario().unwrap();
        assert_eq!(s.orig_min, -10.0);
        assert_eq!(s.adj_service_qty, Some(12.5));
        assert!(!s.contain_within_original);
        assert_eq!(s.facility, "Unit 2");
        assert_eq!(s.orig_max, Scenario::default().orig_max);
    }

    #[test]
    fn scenario_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"orig_max": 150.0, "adj_max": 140.0}"#).unwrap();
        let path = path.to_string_lossy().into_owned();
        let cmd =
            Cmd::try_parse_from(["trapezium", "adjust", "--scenario", &path, "--adj-max", "130"])
                .unwrap();
        let Action::Adjust(args) = cmd.action else {
            panic!("expected adjust");
        };
        let s = args.scenario().unwrap();
        assert_eq!(s.orig_max, 150.0);
        assert_eq!(s.adj_max, 130.0);
    }

    #[test]
    fn derive_flag_clears_file_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"adj_service_qty": 12.5}"#).unwrap();
        let path = path.to_string_lossy().into_owned();
        let cmd = Cmd::try_parse_from([
            "trapezium",
            "adjust",
            "--scenario",
            &path,
            "--derive-service-qty",
        ])
        .unwrap();
        let Action::Adjust(args) = cmd.action else {
            panic!("expected adjust");
        };
        assert_eq!(args.scenario().unwrap().adj_service_qty, None);

        let both = Cmd::try_parse_from([
            "trapezium",
            "adjust",
            "--adj-service-qty",
            "3",
            "--derive-service-qty",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn adjust_writes_figure_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let fig = dir.path().join("out").join("fig.json");
        let fig_s = fig.to_string_lossy().into_owned();
        let cmd = Cmd::try_parse_from(["trapezium", "adjust", "--figure", &fig_s]).unwrap();
        let Action::Adjust(args) = cmd.action else {
            panic!("expected adjust");
        };
        adjust(args).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&fig).unwrap()).unwrap();
        assert_eq!(parsed["title"], "Facility name: Market type FCESS trapezium");
        assert!(dir.path().join("out").join("fig.provenance.json").exists());
    }

    #[test]
    fn adjust_rejects_unordered_original() {
        let cmd =
            Cmd::try_parse_from(["trapezium", "adjust", "--orig-low-bp", "200"]).unwrap();
        let Action::Adjust(args) = cmd.action else {
            panic!("expected adjust");
        };
        let err = adjust(args).unwrap_err();
        assert!(err.to_string().contains("Original must satisfy"));
    }
}
