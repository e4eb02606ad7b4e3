//! The `skillgauge progress` command.

use std::path::PathBuf;

use anyhow::Result;

use skillgauge_core::history::ProgressReport;
use skillgauge_core::result::AssessmentResult;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: u8,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = AssessmentResult::load_json(&baseline_path)?;
    let current = AssessmentResult::load_json(&current_path)?;

    let report = ProgressReport::compare(&baseline, &current, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Progress: overall {:+}, {} improved, {} regressed, {} unchanged",
                report.overall_delta,
                report.improvements.len(),
                report.regressions.len(),
                report.unchanged
            );

            if !report.improvements.is_empty() {
                println!("\nImproved:");
                for c in &report.improvements {
                    println!(
                        "  {} {}% -> {}% ({:+})",
                        c.category, c.baseline_score, c.current_score, c.delta
                    );
                }
            }

            if !report.regressions.is_empty() {
                println!("\nRegressed:");
                for c in &report.regressions {
                    println!(
                        "  {} {}% -> {}% ({:+})",
                        c.category, c.baseline_score, c.current_score, c.delta
                    );
                }
            }

            if !report.new_categories.is_empty() {
                println!("\nNew categories: {}", report.new_categories.join(", "));
            }
            if !report.dropped_categories.is_empty() {
                println!("Dropped categories: {}", report.dropped_categories.join(", "));
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
