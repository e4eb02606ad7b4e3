//! Core data model types for skillgauge.
//!
//! These are the fundamental types that the entire skillgauge system uses
//! to represent questions and question sets. A [`Question`] is immutable
//! once presented to a test taker; mutation during an attempt happens only
//! in the answer sheet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestionDataError;

/// Number of answer options every scoreable question must carry.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its question set.
    pub id: String,
    /// The question text shown to the test taker.
    pub text: String,
    /// Answer options; exactly four for a scoreable question.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_option: usize,
    /// Difficulty tier.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Coarse grouping used for per-category score aggregation.
    pub category: String,
    /// Fine-grained topic label surfaced in skill-gap review lists.
    pub concept: String,
    /// Point weight for the weighted totals carried on a result.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Explanation of the correct answer, shown after scoring.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Free-form tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// Checks that this question is scoreable: four options and a
    /// correct-answer index that points at one of them.
    pub fn validate(&self) -> Result<(), QuestionDataError> {
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionDataError::WrongOptionCount {
                id: self.id.clone(),
                count: self.options.len(),
            });
        }
        if self.correct_option >= self.options.len() {
            return Err(QuestionDataError::AnswerOutOfRange {
                id: self.id.clone(),
                index: self.correct_option,
            });
        }
        Ok(())
    }
}

/// Question difficulty tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Default point weight for a question of this difficulty.
    pub fn default_points(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// All tiers in ascending order.
    pub fn all() -> [Difficulty; 3] {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// An ordered collection of questions presented as one assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Unique identifier for this question set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of what this set assesses.
    #[serde(default)]
    pub description: String,
    /// Job role this set targets, if any.
    #[serde(default)]
    pub role: Option<String>,
    /// Skills the set covers.
    #[serde(default)]
    pub skills: Vec<String>,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Time allowed for an attempt, in minutes.
    #[serde(default = "default_duration_mins")]
    pub duration_mins: u64,
}

fn default_duration_mins() -> u64 {
    45
}

/// Count of questions per difficulty tier in a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyMix {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl QuestionSet {
    /// Categories present in this set, in order of first encounter.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.category) {
                seen.push(q.category.clone());
            }
        }
        seen
    }

    /// Per-tier question counts.
    pub fn difficulty_mix(&self) -> DifficultyMix {
        let mut mix = DifficultyMix::default();
        for q in &self.questions {
            match q.difficulty {
                Difficulty::Easy => mix.easy += 1,
                Difficulty::Medium => mix.medium += 1,
                Difficulty::Hard => mix.hard += 1,
            }
        }
        mix
    }
}
