//! Console summary of a scored result, shared by `take` and `score`.

use comfy_table::{Cell, Table};

use skillgauge_core::result::AssessmentResult;

pub fn print_result_summary(result: &AssessmentResult) {
    println!(
        "\nScore: {}% ({}), {}/{} correct in {}",
        result.score,
        result.overall_competency(),
        result.correct_answers,
        result.total_questions,
        fmt_duration(result.time_spent_secs),
    );
    if result.skipped_questions > 0 {
        println!(
            "{} question(s) could not be scored and were skipped.",
            result.skipped_questions
        );
    }

    if !result.category_scores.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Score", "Correct", "Level"]);
        for cs in &result.category_scores {
            table.add_row(vec![
                Cell::new(&cs.category),
                Cell::new(format!("{}%", cs.score)),
                Cell::new(format!("{}/{}", cs.correct, cs.total)),
                Cell::new(cs.competency),
            ]);
        }
        println!("\n{table}");
    }

    if !result.skill_gaps.is_empty() {
        println!("\nSkill gaps:");
        for gap in &result.skill_gaps {
            if gap.topics.is_empty() {
                println!("  {} ({}%)", gap.skill, gap.score);
            } else {
                println!("  {} ({}%): review {}", gap.skill, gap.score, gap.topics.join(", "));
            }
        }
    }
    if !result.strengths.is_empty() {
        println!("Strengths: {}", result.strengths.join(", "));
    }

    if !result.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &result.recommendations {
            println!("  - {rec}");
        }
    }
}

pub fn fmt_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
