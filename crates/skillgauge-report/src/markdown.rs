//! Markdown report generator.

use anyhow::Result;
use std::path::Path;

use skillgauge_core::result::{AssessmentResult, LearningPath};

fn fmt_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Render an assessment result as a Markdown document.
pub fn generate_markdown(result: &AssessmentResult) -> String {
    let mut md = String::new();

    md.push_str("# Skill Assessment Report\n\n");
    if let Some(role) = &result.role {
        md.push_str(&format!("- **Role:** {role}\n"));
    }
    md.push_str(&format!(
        "- **Completed:** {}\n",
        result.completed_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!(
        "- **Score:** {}% ({}/{} correct), {}\n",
        result.score,
        result.correct_answers,
        result.total_questions,
        result.overall_competency()
    ));
    md.push_str(&format!(
        "- **Time spent:** {}\n",
        fmt_duration(result.time_spent_secs)
    ));
    md.push_str(&format!(
        "- **Points:** {}/{}\n",
        result.points_earned, result.points_possible
    ));
    if result.skipped_questions > 0 {
        md.push_str(&format!(
            "- **Skipped questions:** {}\n",
            result.skipped_questions
        ));
    }

    if !result.category_scores.is_empty() {
        md.push_str("\n## Categories\n\n");
        md.push_str("| Category | Correct | Score | Level |\n");
        md.push_str("|---|---|---|---|\n");
        for cs in &result.category_scores {
            md.push_str(&format!(
                "| {} | {}/{} | {}% | {} |\n",
                cs.category, cs.correct, cs.total, cs.score, cs.competency
            ));
        }
    }

    md.push_str("\n## Skill Gaps\n\n");
    if result.skill_gaps.is_empty() {
        md.push_str("No skill gaps. Every category scored at or above the pass threshold.\n");
    } else {
        for gap in &result.skill_gaps {
            md.push_str(&format!("### {} ({}%)\n\n", gap.skill, gap.score));
            if !gap.topics.is_empty() {
                md.push_str(&format!("Review: {}\n\n", gap.topics.join(", ")));
            }
        }
    }

    if !result.strengths.is_empty() {
        md.push_str("\n## Strengths\n\n");
        for s in &result.strengths {
            md.push_str(&format!("- {s}\n"));
        }
    }

    if !result.difficulty_breakdown.is_empty() {
        md.push_str("\n## Difficulty\n\n");
        md.push_str("| Difficulty | Correct | Missed concepts |\n");
        md.push_str("|---|---|---|\n");
        for tier in &result.difficulty_breakdown {
            md.push_str(&format!(
                "| {} | {}/{} | {} |\n",
                tier.difficulty,
                tier.correct,
                tier.total,
                tier.missed_concepts.join(", ")
            ));
        }
    }

    if !result.recommendations.is_empty() {
        md.push_str("\n## Recommendations\n\n");
        for (i, rec) in result.recommendations.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, rec));
        }
    }

    if let Some(path) = LearningPath::from_result(result) {
        md.push_str(&format!("\n## {}\n\n", path.title));
        md.push_str(&format!(
            "{} ({}, about {} hours)\n\n",
            path.description, path.level, path.estimated_hours
        ));
        md.push_str("Modules:\n\n");
        for module in &path.modules {
            md.push_str(&format!("- {module}\n"));
        }
    }

    md
}

/// Write a Markdown report to a file.
pub fn write_markdown_report(result: &AssessmentResult, path: &Path) -> Result<()> {
    let md = generate_markdown(result);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, md)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use skillgauge_core::attempt::SubmitTrigger;
    use skillgauge_core::model::Difficulty;
    use skillgauge_core::result::{CategoryScore, CompetencyLevel, DifficultyBreakdown, SkillGap};
    use uuid::Uuid;

    fn make_result() -> AssessmentResult {
        AssessmentResult {
            id: Uuid::nil(),
            completed_at: Utc::now(),
            role: Some("Frontend Developer".into()),
            trigger: SubmitTrigger::Manual,
            total_questions: 4,
            correct_answers: 3,
            score: 75,
            time_spent_secs: 754,
            points_earned: 6,
            points_possible: 8,
            skipped_questions: 0,
            category_scores: vec![
                CategoryScore {
                    category: "React".into(),
                    correct: 1,
                    total: 2,
                    score: 50,
                    competency: CompetencyLevel::Beginner,
                },
                CategoryScore {
                    category: "CSS".into(),
                    correct: 2,
                    total: 2,
                    score: 100,
                    competency: CompetencyLevel::Expert,
                },
            ],
            skill_gaps: vec![SkillGap {
                skill: "React".into(),
                score: 50,
                topics: vec!["hooks".into(), "context".into()],
            }],
            strengths: vec!["CSS".into()],
            difficulty_breakdown: vec![DifficultyBreakdown {
                difficulty: Difficulty::Medium,
                correct: 3,
                total: 4,
                missed_concepts: vec!["hooks".into()],
            }],
            recommendations: vec!["Focus on improving React".into()],
        }
    }

    #[test]
    fn report_contains_all_sections() {
        let md = generate_markdown(&make_result());

        assert!(md.contains("# Skill Assessment Report"));
        assert!(md.contains("**Role:** Frontend Developer"));
        assert!(md.contains("75% (3/4 correct), Advanced"));
        assert!(md.contains("**Time spent:** 12m 34s"));
        assert!(md.contains("| React | 1/2 | 50% | Beginner |"));
        assert!(md.contains("### React (50%)"));
        assert!(md.contains("Review: hooks, context"));
        assert!(md.contains("- CSS"));
        assert!(md.contains("| medium | 3/4 | hooks |"));
        assert!(md.contains("1. Focus on improving React"));
        assert!(md.contains("## Personalized Learning Path"));
        assert!(md.contains("- React Fundamentals"));
    }

    #[test]
    fn gap_free_result_says_so() {
        let mut result = make_result();
        result.skill_gaps.clear();

        let md = generate_markdown(&result);
        assert!(md.contains("No skill gaps."));
        assert!(!md.contains("Personalized Learning Path"));
    }

    #[test]
    fn skipped_line_only_when_present() {
        let mut result = make_result();
        assert!(!generate_markdown(&result).contains("Skipped questions"));

        result.skipped_questions = 2;
        assert!(generate_markdown(&result).contains("**Skipped questions:** 2"));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");

        write_markdown_report(&make_result(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Skill Assessment Report"));
    }
}
