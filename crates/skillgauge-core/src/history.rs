//! Append-only assessment history with aggregate stats and progress
//! comparison between two results.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::{AssessmentResult, CompetencyLevel};

/// Compact per-category record kept in a history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub score: u8,
    pub competency: CompetencyLevel,
}

/// Summary row for one completed assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub result_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub role: Option<String>,
    pub score: u8,
    pub category_scores: Vec<CategorySummary>,
    /// Names of the categories flagged as gaps.
    pub skill_gaps: Vec<String>,
}

/// A user's past assessments, oldest first. Append-only: entries are never
/// rewritten once recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentHistory {
    pub entries: Vec<HistoryEntry>,
}

impl AssessmentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a summary of `result` to the history.
    pub fn record(&mut self, result: &AssessmentResult) {
        self.entries.push(HistoryEntry {
            result_id: result.id,
            completed_at: result.completed_at,
            role: result.role.clone(),
            score: result.score,
            category_scores: result
                .category_scores
                .iter()
                .map(|cs| CategorySummary {
                    category: cs.category.clone(),
                    score: cs.score,
                    competency: cs.competency,
                })
                .collect(),
            skill_gaps: result.skill_gaps.iter().map(|g| g.skill.clone()).collect(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate statistics over all recorded entries.
    pub fn stats(&self) -> UserStats {
        let total = self.entries.len();
        let average_score = if total == 0 {
            0.0
        } else {
            self.entries.iter().map(|e| e.score as f64).sum::<f64>() / total as f64
        };
        let best_score = self.entries.iter().map(|e| e.score).max().unwrap_or(0);
        let latest_score = self.entries.last().map(|e| e.score);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            for gap in &entry.skill_gaps {
                *counts.entry(gap.as_str()).or_default() += 1;
            }
        }
        let mut gap_frequency: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(skill, count)| (skill.to_string(), count))
            .collect();
        gap_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        UserStats {
            total_assessments: total,
            average_score,
            best_score,
            latest_score,
            gap_frequency,
        }
    }

    /// Save the history as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize history")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        Ok(())
    }

    /// Load a history file; a missing file reads as an empty history.
    pub fn load_json(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history from {}", path.display()))?;
        let history: AssessmentHistory =
            serde_json::from_str(&content).context("failed to parse history JSON")?;
        Ok(history)
    }
}

/// Aggregate statistics derived from a history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_assessments: usize,
    /// Mean of all entry scores.
    pub average_score: f64,
    pub best_score: u8,
    pub latest_score: Option<u8>,
    /// How often each skill was flagged as a gap, most frequent first.
    pub gap_frequency: Vec<(String, usize)>,
}

/// Per-category change between two results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: String,
    pub baseline_score: u8,
    pub current_score: u8,
    pub delta: i32,
}

/// Result of comparing a current result against a baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Categories whose score rose beyond the threshold.
    pub improvements: Vec<CategoryDelta>,
    /// Categories whose score fell beyond the threshold.
    pub regressions: Vec<CategoryDelta>,
    /// Categories with no significant change.
    pub unchanged: usize,
    /// Categories in current but not baseline.
    pub new_categories: Vec<String>,
    /// Categories in baseline but not current.
    pub dropped_categories: Vec<String>,
    /// Overall score change.
    pub overall_delta: i32,
}

impl ProgressReport {
    /// Compare `current` against `baseline` per category. A delta strictly
    /// beyond `threshold` percentage points counts as a change.
    pub fn compare(baseline: &AssessmentResult, current: &AssessmentResult, threshold: u8) -> Self {
        let baseline_scores: HashMap<&str, u8> = baseline
            .category_scores
            .iter()
            .map(|cs| (cs.category.as_str(), cs.score))
            .collect();
        let current_names: Vec<&str> = current
            .category_scores
            .iter()
            .map(|cs| cs.category.as_str())
            .collect();

        let mut improvements = Vec::new();
        let mut regressions = Vec::new();
        let mut unchanged = 0usize;
        let mut new_categories = Vec::new();

        for cs in &current.category_scores {
            match baseline_scores.get(cs.category.as_str()) {
                Some(&baseline_score) => {
                    let delta = cs.score as i32 - baseline_score as i32;
                    if delta > threshold as i32 {
                        improvements.push(CategoryDelta {
                            category: cs.category.clone(),
                            baseline_score,
                            current_score: cs.score,
                            delta,
                        });
                    } else if delta < -(threshold as i32) {
                        regressions.push(CategoryDelta {
                            category: cs.category.clone(),
                            baseline_score,
                            current_score: cs.score,
                            delta,
                        });
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_categories.push(cs.category.clone()),
            }
        }

        let dropped_categories = baseline
            .category_scores
            .iter()
            .filter(|cs| !current_names.contains(&cs.category.as_str()))
            .map(|cs| cs.category.clone())
            .collect();

        ProgressReport {
            improvements,
            regressions,
            unchanged,
            new_categories,
            dropped_categories,
            overall_delta: current.score as i32 - baseline.score as i32,
        }
    }

    /// Returns true if any category regressed.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** overall {}{}, {} improved, {} regressed, {} unchanged\n\n",
            if self.overall_delta >= 0 { "+" } else { "" },
            self.overall_delta,
            self.improvements.len(),
            self.regressions.len(),
            self.unchanged
        ));

        if !self.improvements.is_empty() {
            md.push_str("### Improved\n\n");
            md.push_str("| Category | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in &self.improvements {
                md.push_str(&format!(
                    "| {} | {}% | {}% | +{} |\n",
                    c.category, c.baseline_score, c.current_score, c.delta
                ));
            }
            md.push('\n');
        }

        if !self.regressions.is_empty() {
            md.push_str("### Regressed\n\n");
            md.push_str("| Category | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in &self.regressions {
                md.push_str(&format!(
                    "| {} | {}% | {}% | {} |\n",
                    c.category, c.baseline_score, c.current_score, c.delta
                ));
            }
            md.push('\n');
        }

        if !self.new_categories.is_empty() {
            md.push_str(&format!("New categories: {}\n", self.new_categories.join(", ")));
        }
        if !self.dropped_categories.is_empty() {
            md.push_str(&format!(
                "Dropped categories: {}\n",
                self.dropped_categories.join(", ")
            ));
        }

        md
    }
}
