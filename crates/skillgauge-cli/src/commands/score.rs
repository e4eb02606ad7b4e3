//! The `skillgauge score` command: batch scoring from an answers file.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use skillgauge_core::attempt::{AnswerSheet, SubmitTrigger};
use skillgauge_core::parser;
use skillgauge_core::scoring;

use super::summary::print_result_summary;

pub fn execute(set_path: PathBuf, answers_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let set = parser::parse_question_set(&set_path)?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers from {}", answers_path.display()))?;
    let picks: HashMap<String, usize> =
        serde_json::from_str(&content).context("failed to parse answers JSON")?;

    let mut sheet = AnswerSheet::new();
    for (id, index) in &picks {
        sheet.set_answer(id, *index);
    }

    let result = scoring::score_attempt(&set, &sheet, 0, SubmitTrigger::Manual);
    print_result_summary(&result);

    if let Some(path) = output {
        result.save_json(&path)?;
        eprintln!("\nResult saved to: {}", path.display());
    }

    Ok(())
}
