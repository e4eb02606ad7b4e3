//! Assessment result types with JSON persistence.
//!
//! An [`AssessmentResult`] is the immutable output artifact of one scored
//! attempt. It is computed exactly once at submission and then only read:
//! rendered by reports, appended to history, retried against persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attempt::SubmitTrigger;
use crate::model::Difficulty;

/// Qualitative competency label derived from a percentage score.
///
/// Ordering follows skill progression, so `Advanced > Intermediate` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompetencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl CompetencyLevel {
    /// Classify a percentage into a competency tier.
    ///
    /// Boundaries are inclusive at the lower bound of each tier: 90 is
    /// already Expert, 75 already Advanced, 60 already Intermediate.
    pub fn for_percentage(percentage: u8) -> Self {
        if percentage >= 90 {
            CompetencyLevel::Expert
        } else if percentage >= 75 {
            CompetencyLevel::Advanced
        } else if percentage >= 60 {
            CompetencyLevel::Intermediate
        } else {
            CompetencyLevel::Beginner
        }
    }
}

impl std::fmt::Display for CompetencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompetencyLevel::Beginner => write!(f, "Beginner"),
            CompetencyLevel::Intermediate => write!(f, "Intermediate"),
            CompetencyLevel::Advanced => write!(f, "Advanced"),
            CompetencyLevel::Expert => write!(f, "Expert"),
        }
    }
}

/// Per-category score accumulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Category name as it appears on the questions.
    pub category: String,
    /// Correctly answered questions in this category.
    pub correct: usize,
    /// Scoreable questions in this category, answered or not.
    pub total: usize,
    /// Percentage score for the category.
    pub score: u8,
    /// Competency tier for the category score.
    pub competency: CompetencyLevel,
}

/// A category that fell below the pass threshold, with topics to review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    /// The category name.
    pub skill: String,
    /// Percentage score the category achieved.
    pub score: u8,
    /// Distinct concepts from missed questions, in first-seen order.
    pub topics: Vec<String>,
}

/// Performance within one difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBreakdown {
    pub difficulty: Difficulty,
    pub correct: usize,
    pub total: usize,
    /// Distinct concepts missed at this tier.
    pub missed_concepts: Vec<String>,
}

/// The complete output of one scored assessment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Unique result identifier.
    pub id: Uuid,
    /// When the attempt was scored.
    pub completed_at: DateTime<Utc>,
    /// Job role the question set targeted, if any.
    pub role: Option<String>,
    /// What caused the submission.
    pub trigger: SubmitTrigger,
    /// Questions that entered scoring (malformed ones excluded).
    pub total_questions: usize,
    /// Questions answered correctly.
    pub correct_answers: usize,
    /// Overall percentage, `round(100 * correct / total)`, ties half up.
    pub score: u8,
    /// Wall-clock seconds spent on the attempt.
    pub time_spent_secs: u64,
    /// Point-weighted totals carried alongside the count-based score.
    pub points_earned: u32,
    pub points_possible: u32,
    /// Malformed questions excluded from both correct and total.
    pub skipped_questions: usize,
    /// Per-category accumulation, categories in first-encounter order.
    pub category_scores: Vec<CategoryScore>,
    /// Categories below the pass threshold.
    pub skill_gaps: Vec<SkillGap>,
    /// Categories at or above the pass threshold.
    pub strengths: Vec<String>,
    /// Per-tier performance, tiers with at least one question.
    pub difficulty_breakdown: Vec<DifficultyBreakdown>,
    /// Review guidance derived from the gaps.
    pub recommendations: Vec<String>,
}

impl AssessmentResult {
    /// Competency tier for the overall score.
    pub fn overall_competency(&self) -> CompetencyLevel {
        CompetencyLevel::for_percentage(self.score)
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: AssessmentResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }
}

/// A suggested course of study assembled from skill gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub title: String,
    pub description: String,
    /// One module per gap skill.
    pub modules: Vec<String>,
    /// Rough effort estimate, eight hours per gap.
    pub estimated_hours: u32,
    pub level: String,
}

impl LearningPath {
    /// Build a learning path from a result's gaps; `None` when there are
    /// no gaps to study.
    pub fn from_result(result: &AssessmentResult) -> Option<Self> {
        if result.skill_gaps.is_empty() {
            return None;
        }
        let skills: Vec<&str> = result.skill_gaps.iter().map(|g| g.skill.as_str()).collect();
        Some(LearningPath {
            title: "Personalized Learning Path".into(),
            description: format!("Course focusing on: {}", skills.join(", ")),
            modules: skills.iter().map(|s| format!("{s} Fundamentals")).collect(),
            estimated_hours: result.skill_gaps.len() as u32 * 8,
            level: "Intermediate".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(score: u8, gaps: Vec<SkillGap>) -> AssessmentResult {
        AssessmentResult {
            id: Uuid::nil(),
            completed_at: Utc::now(),
            role: Some("Frontend Developer".into()),
            trigger: SubmitTrigger::Manual,
            total_questions: 10,
            correct_answers: 5,
            score,
            time_spent_secs: 300,
            points_earned: 10,
            points_possible: 20,
            skipped_questions: 0,
            category_scores: vec![],
            skill_gaps: gaps,
            strengths: vec![],
            difficulty_breakdown: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn classifier_boundaries() {
        assert_eq!(CompetencyLevel::for_percentage(90), CompetencyLevel::Expert);
        assert_eq!(CompetencyLevel::for_percentage(89), CompetencyLevel::Advanced);
        assert_eq!(CompetencyLevel::for_percentage(75), CompetencyLevel::Advanced);
        assert_eq!(
            CompetencyLevel::for_percentage(74),
            CompetencyLevel::Intermediate
        );
        assert_eq!(
            CompetencyLevel::for_percentage(60),
            CompetencyLevel::Intermediate
        );
        assert_eq!(CompetencyLevel::for_percentage(59), CompetencyLevel::Beginner);
    }

    #[test]
    fn classifier_extremes() {
        assert_eq!(CompetencyLevel::for_percentage(100), CompetencyLevel::Expert);
        assert_eq!(CompetencyLevel::for_percentage(0), CompetencyLevel::Beginner);
    }

    #[test]
    fn competency_ordering() {
        assert!(CompetencyLevel::Expert > CompetencyLevel::Advanced);
        assert!(CompetencyLevel::Advanced > CompetencyLevel::Intermediate);
        assert!(CompetencyLevel::Intermediate > CompetencyLevel::Beginner);
    }

    #[test]
    fn json_roundtrip() {
        let result = make_result(50, vec![]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("attempt.json");

        result.save_json(&path).unwrap();
        let loaded = AssessmentResult::load_json(&path).unwrap();

        assert_eq!(loaded.score, 50);
        assert_eq!(loaded.role.as_deref(), Some("Frontend Developer"));
        assert_eq!(loaded.trigger, SubmitTrigger::Manual);
    }

    #[test]
    fn learning_path_from_gaps() {
        let result = make_result(
            40,
            vec![
                SkillGap {
                    skill: "React".into(),
                    score: 30,
                    topics: vec!["hooks".into()],
                },
                SkillGap {
                    skill: "CSS".into(),
                    score: 50,
                    topics: vec!["grid".into()],
                },
            ],
        );
        let path = LearningPath::from_result(&result).unwrap();
        assert_eq!(path.title, "Personalized Learning Path");
        assert_eq!(path.modules, vec!["React Fundamentals", "CSS Fundamentals"]);
        assert_eq!(path.estimated_hours, 16);
        assert!(path.description.contains("React, CSS"));
    }

    #[test]
    fn no_learning_path_without_gaps() {
        let result = make_result(95, vec![]);
        assert!(LearningPath::from_result(&result).is_none());
    }
}
