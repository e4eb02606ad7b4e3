//! The `skillgauge report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillgauge_core::result::AssessmentResult;
use skillgauge_report::html::generate_html;
use skillgauge_report::markdown::generate_markdown;

pub fn execute(result_path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let result = AssessmentResult::load_json(&result_path)?;

    let rendered = match format.as_str() {
        "markdown" | "md" => generate_markdown(&result),
        "html" => generate_html(&result),
        other => anyhow::bail!("unknown format: {other} (expected markdown or html)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
