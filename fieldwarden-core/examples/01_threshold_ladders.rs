//! Threshold Ladder Example
//!
//! This example demonstrates the simplest use of FieldWarden: running
//! measured values through the instrument's severity ladders and
//! aggregating the findings of one cycle.
//!
//! ## What You'll Learn
//!
//! - Building the stock classifier and reading its cut points
//! - Closed-open tier boundaries (a value at a cut belongs above it)
//! - Collecting one cycle's alerts and forming a summary line
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_threshold_ladders
//! ```

use fieldwarden_core::{
    classify::AlertBatch,
    Classifier, Severity, SignalId,
};

fn main() {
    println!("FieldWarden Threshold Ladder Example");
    println!("====================================\n");

    let classifier = Classifier::with_defaults().unwrap();

    // Show the installed ladders
    println!("Installed ladders:");
    for signal in [
        SignalId::DoseRate,
        SignalId::Co2,
        SignalId::Tvoc,
        SignalId::Lux,
        SignalId::LoopInterval,
    ] {
        let ladder = classifier.ladder(signal).unwrap();
        print!("  {:<14} ", signal.name());
        for step in ladder.steps() {
            if step.upper.is_finite() {
                print!("{} < {} {}  ", step.code, step.upper, signal.unit());
            } else {
                print!("{} above", step.code);
            }
        }
        println!();
    }
    println!();

    // Values at and around the CO2 cuts
    println!("CO2 boundary behavior (cuts at 1000 and 2000 ppm):\n");
    let test_values = [
        (999.9, "just under the caution cut"),
        (1000.0, "exactly at the caution cut"),
        (1999.9, "just under the danger cut"),
        (2000.0, "exactly at the danger cut"),
    ];
    for (ppm, description) in &test_values {
        let step = classifier.classify(SignalId::Co2, *ppm).unwrap();
        println!(
            "  {:7.1} ppm ({:<28}) -> {:<8} {}",
            ppm,
            description,
            step.severity.name(),
            step.code
        );
    }
    println!();

    // A mixed cycle, aggregated
    println!("One classification cycle with mixed findings:\n");
    let cycle = [
        (SignalId::Co2, 1_480.0),
        (SignalId::Tvoc, 0.2),
        (SignalId::DoseRate, 6.4),
        (SignalId::Lux, 240.0),
    ];

    let mut batch = AlertBatch::new();
    for (signal, value) in &cycle {
        match classifier.classify(*signal, *value).map(|s| s.severity) {
            Some(Severity::Normal) => {
                println!("  {:<14} {:8.1} - quiet", signal.name(), value);
            }
            Some(_) => {
                let alert = classifier.alert_for(*signal, *value, 0).unwrap();
                println!(
                    "  {:<14} {:8.1} - {} ({})",
                    signal.name(),
                    value,
                    alert.code,
                    alert.message
                );
                batch.push(alert);
            }
            None => println!("  {:<14} {:8.1} - no ladder", signal.name(), value),
        }
    }

    let summary = batch.summary(0).unwrap();
    println!("\nSummary line: {}", summary.message);

    println!("\n{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- Ladders are validated once; classification cannot fail");
    println!("- A value equal to a cut belongs to the tier above it");
    println!("- Quiet tiers produce no alert; summaries lead with the top tier");
}
