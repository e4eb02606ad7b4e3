//! The `skillgauge history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use skillgauge_core::history::AssessmentHistory;
use skillgauge_core::result::CompetencyLevel;
use skillgauge_providers::config::load_config_from;

pub fn execute(
    history_path: Option<PathBuf>,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = history_path.unwrap_or_else(|| config.history_path());

    let history = AssessmentHistory::load_json(&path)?;
    if history.is_empty() {
        println!("No assessments recorded yet.");
        return Ok(());
    }

    // Most recent entries last, as they were appended.
    let skip = limit.map_or(0, |l| history.len().saturating_sub(l));

    let mut table = Table::new();
    table.set_header(vec!["Date", "Role", "Score", "Level", "Gaps"]);
    for entry in history.entries.iter().skip(skip) {
        table.add_row(vec![
            Cell::new(entry.completed_at.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.role.as_deref().unwrap_or("-")),
            Cell::new(format!("{}%", entry.score)),
            Cell::new(CompetencyLevel::for_percentage(entry.score)),
            Cell::new(if entry.skill_gaps.is_empty() {
                "-".to_string()
            } else {
                entry.skill_gaps.join(", ")
            }),
        ]);
    }
    println!("{table}");

    let stats = history.stats();
    println!(
        "\n{} assessment(s), average {:.1}%, best {}%",
        stats.total_assessments, stats.average_score, stats.best_score
    );
    if !stats.gap_frequency.is_empty() {
        println!("Recurring gaps:");
        for (skill, count) in &stats.gap_frequency {
            println!("  {skill} ({count}x)");
        }
    }

    Ok(())
}
