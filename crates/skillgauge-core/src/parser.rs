//! TOML question-set parser.
//!
//! Loads question sets from TOML files and directories, and validates them
//! against the input contract the scoring engine relies on.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionSet, OPTION_COUNT};

/// Intermediate TOML structure for reading and writing question set files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestionFile {
    set: TomlSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default = "default_duration")]
    duration_mins: u64,
}

fn default_duration() -> u64 {
    45
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    options: Vec<String>,
    correct_option: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    difficulty: Option<String>,
    category: String,
    concept: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

/// Parse a single TOML file into a `QuestionSet`.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a `QuestionSet` (useful for testing).
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let difficulty = q
                .difficulty
                .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!("{}", e)))
                .transpose()?
                .unwrap_or_default();

            Ok(Question {
                id: q.id,
                text: q.text,
                options: q.options,
                correct_option: q.correct_option,
                difficulty,
                category: q.category,
                concept: q.concept,
                points: q.points.unwrap_or_else(|| difficulty.default_points()),
                explanation: q.explanation,
                tags: q.tags,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionSet {
        id: parsed.set.id,
        name: parsed.set.name,
        description: parsed.set.description,
        role: parsed.set.role,
        skills: parsed.set.skills,
        questions,
        duration_mins: parsed.set.duration_mins,
    })
}

/// Serialize a question set into the TOML file format understood by
/// [`parse_question_set`].
pub fn question_set_to_toml(set: &QuestionSet) -> Result<String> {
    let file = TomlQuestionFile {
        set: TomlSetHeader {
            id: set.id.clone(),
            name: set.name.clone(),
            description: set.description.clone(),
            role: set.role.clone(),
            skills: set.skills.clone(),
            duration_mins: set.duration_mins,
        },
        questions: set
            .questions
            .iter()
            .map(|q| TomlQuestion {
                id: q.id.clone(),
                text: q.text.clone(),
                options: q.options.clone(),
                correct_option: q.correct_option,
                difficulty: Some(q.difficulty.to_string()),
                category: q.category.clone(),
                concept: q.concept.clone(),
                points: Some(q.points),
                explanation: q.explanation.clone(),
                tags: q.tags.clone(),
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize question set")
}

/// Write a question set file, creating parent directories as needed.
pub fn write_question_set(set: &QuestionSet, path: &Path) -> Result<()> {
    let content = question_set_to_toml(set)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write question set to {}", path.display()))?;
    Ok(())
}

/// Recursively load all `.toml` question set files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// A warning from question set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set against the scoring input contract.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for q in &set.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &set.questions {
        if q.options.len() != OPTION_COUNT {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("has {} options, expected {OPTION_COUNT}", q.options.len()),
            });
        } else if q.correct_option >= q.options.len() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("correct_option {} is out of range", q.correct_option),
            });
        }

        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "question text is empty".into(),
            });
        }
        if q.category.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "category is empty".into(),
            });
        }
        if q.concept.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: "concept is empty".into(),
            });
        }

        let mut seen_options = std::collections::HashSet::new();
        for option in &q.options {
            if !seen_options.insert(option.trim()) {
                warnings.push(ValidationWarning {
                    question_id: Some(q.id.clone()),
                    message: format!("duplicate option text: '{}'", option.trim()),
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[set]
id = "frontend-basics"
name = "Frontend Developer Basics"
description = "Core frontend knowledge check"
role = "Frontend Developer"
skills = ["React", "CSS"]
duration_mins = 30

[[questions]]
id = "q1"
text = "What is the correct way to update state in React functional components?"
options = ["this.setState()", "useState hook", "setState()", "state.update()"]
correct_option = 1
difficulty = "easy"
category = "React"
concept = "state management"
explanation = "useState returns the state value and its setter."
tags = ["hooks"]

[[questions]]
id = "q2"
text = "Which CSS property creates a responsive grid layout?"
options = ["display: block", "display: grid", "grid-layout: responsive", "layout: grid"]
correct_option = 1
difficulty = "medium"
category = "CSS"
concept = "grid"
"#;

    #[test]
    fn parse_valid_toml() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.id, "frontend-basics");
        assert_eq!(set.role.as_deref(), Some("Frontend Developer"));
        assert_eq!(set.duration_mins, 30);
        assert_eq!(set.questions.len(), 2);
        assert_eq!(set.questions[0].difficulty, Difficulty::Easy);
        assert_eq!(set.questions[0].correct_option, 1);
        assert!(set.questions[0].explanation.is_some());
    }

    #[test]
    fn parse_fills_defaults() {
        let toml = r#"
[set]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
text = "Pick one"
options = ["a", "b", "c", "d"]
correct_option = 0
category = "General"
concept = "general"
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.duration_mins, 45);
        assert!(set.role.is_none());
        assert_eq!(set.questions[0].difficulty, Difficulty::Medium);
        // points derived from difficulty when unspecified
        assert_eq!(set.questions[0].points, 2);
        assert!(set.questions[0].tags.is_empty());
    }

    #[test]
    fn parse_rejects_unknown_difficulty() {
        let toml = r#"
[set]
id = "bad"
name = "Bad"

[[questions]]
id = "q1"
text = "Pick one"
options = ["a", "b", "c", "d"]
correct_option = 0
difficulty = "impossible"
category = "General"
concept = "general"
"#;
        assert!(parse_question_set_str(toml, &PathBuf::from("test.toml")).is_err());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_set_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_duplicate_ids() {
        let toml = r#"
[set]
id = "dupes"
name = "Dupes"

[[questions]]
id = "same"
text = "First"
options = ["a", "b", "c", "d"]
correct_option = 0
category = "General"
concept = "general"

[[questions]]
id = "same"
text = "Second"
options = ["a", "b", "c", "d"]
correct_option = 1
category = "General"
concept = "general"
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question ID")));
    }

    #[test]
    fn validate_option_count_and_range() {
        let toml = r#"
[set]
id = "bad-options"
name = "Bad Options"

[[questions]]
id = "q1"
text = "Too few options"
options = ["a", "b", "c"]
correct_option = 0
category = "General"
concept = "general"

[[questions]]
id = "q2"
text = "Answer out of range"
options = ["a", "b", "c", "d"]
correct_option = 4
category = "General"
concept = "general"
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("3 options")));
        assert!(warnings.iter().any(|w| w.message.contains("out of range")));
    }

    #[test]
    fn validate_empty_set_and_duplicate_options() {
        let empty = parse_question_set_str(
            "[set]\nid = \"empty\"\nname = \"Empty\"\n",
            &PathBuf::from("test.toml"),
        )
        .unwrap();
        let warnings = validate_question_set(&empty);
        assert!(warnings.iter().any(|w| w.message.contains("no questions")));

        let toml = r#"
[set]
id = "dup-options"
name = "Dup Options"

[[questions]]
id = "q1"
text = "Repeated option"
options = ["same", "same", "c", "d"]
correct_option = 0
category = "General"
concept = "general"
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate option text")));
    }

    #[test]
    fn valid_set_produces_no_warnings() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert!(validate_question_set(&set).is_empty());
    }

    #[test]
    fn to_toml_roundtrips() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();

        let rendered = question_set_to_toml(&set).unwrap();
        let reparsed = parse_question_set_str(&rendered, &PathBuf::from("rendered.toml")).unwrap();

        assert_eq!(reparsed.id, set.id);
        assert_eq!(reparsed.role, set.role);
        assert_eq!(reparsed.duration_mins, set.duration_mins);
        assert_eq!(reparsed.questions.len(), set.questions.len());
        assert_eq!(reparsed.questions[0].difficulty, Difficulty::Easy);
        assert_eq!(reparsed.questions[0].options, set.questions[0].options);
        assert_eq!(reparsed.questions[1].points, set.questions[1].points);
    }

    #[test]
    fn write_question_set_creates_parent_dirs() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sets").join("frontend.toml");

        write_question_set(&set, &path).unwrap();
        let loaded = parse_question_set(&path).unwrap();
        assert_eq!(loaded.id, "frontend-basics");
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("frontend.toml");
        std::fs::write(&file_path, VALID_TOML).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sets = load_question_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, "frontend-basics");
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("bad.toml"), "not [valid }{").unwrap();

        let sets = load_question_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
    }
}
