//! Evaluate the form-default scenario and print the numbers plus figure JSON.
//!
//! Usage:
//!   cargo run -p trapezium --example form_defaults

use trapezium::api::Scenario;

fn main() {
    let scenario = Scenario::default();
    let report = scenario
        .evaluate()
        .expect("form defaults pass the validation gate");
    let a = report.adjustment.adjusted;
    println!(
        "adjusted: min={} low_bp={} high_bp={} max={} h={:.4}",
        a.min, a.low_bp, a.high_bp, a.max, a.height
    );
    println!("{}", report.summary());
    println!(
        "{}",
        serde_json::to_string_pretty(&report.figure).expect("figure serializes")
    );
}
