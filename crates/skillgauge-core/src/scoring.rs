//! Scoring engine: answer comparison, category aggregation, skill gaps.
//!
//! [`score_attempt`] is the single scoring path in the system. The
//! interactive session, batch scoring, and anything that persists a result
//! all go through it, so there is exactly one definition of "correct",
//! one rounding rule, and one gap threshold.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::attempt::{AnswerSheet, SubmitTrigger};
use crate::model::{Difficulty, QuestionSet};
use crate::result::{
    AssessmentResult, CategoryScore, CompetencyLevel, DifficultyBreakdown, SkillGap,
};

/// A category scoring below this percentage is reported as a skill gap.
pub const GAP_THRESHOLD: u8 = 70;

/// Percentage of `correct` over `total`, rounded to the nearest integer
/// with ties going up. Zero when `total` is zero.
pub fn score_percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // round half up without going through floats
    ((200 * correct + total) / (2 * total)) as u8
}

#[derive(Default)]
struct CategoryAcc {
    category: String,
    correct: usize,
    total: usize,
    missed_topics: Vec<String>,
}

#[derive(Default)]
struct TierAcc {
    correct: usize,
    total: usize,
    missed_concepts: Vec<String>,
}

/// Score a completed attempt.
///
/// One pass over the question list in presentation order. A response counts
/// correct iff the recorded index equals the question's correct index;
/// unanswered questions count incorrect but still increment their
/// category's total. Questions that fail [`crate::model::Question::validate`]
/// are skipped from both correct and total and tallied in
/// `skipped_questions`. Pure apart from the generated result id and
/// timestamp: identical inputs produce an identical scoring payload.
pub fn score_attempt(
    set: &QuestionSet,
    answers: &AnswerSheet,
    time_spent_secs: u64,
    trigger: SubmitTrigger,
) -> AssessmentResult {
    let mut correct_answers = 0usize;
    let mut total_questions = 0usize;
    let mut skipped_questions = 0usize;
    let mut points_earned = 0u32;
    let mut points_possible = 0u32;
    let mut categories: Vec<CategoryAcc> = Vec::new();
    let mut easy = TierAcc::default();
    let mut medium = TierAcc::default();
    let mut hard = TierAcc::default();

    for question in &set.questions {
        if let Err(err) = question.validate() {
            warn!(question = %question.id, %err, "skipping unscoreable question");
            skipped_questions += 1;
            continue;
        }

        total_questions += 1;
        points_possible += question.points;

        let is_correct = answers.answer(&question.id) == Some(question.correct_option);
        if is_correct {
            correct_answers += 1;
            points_earned += question.points;
        }

        let idx = match categories
            .iter()
            .position(|c| c.category == question.category)
        {
            Some(i) => i,
            None => {
                categories.push(CategoryAcc {
                    category: question.category.clone(),
                    ..Default::default()
                });
                categories.len() - 1
            }
        };
        let cat = &mut categories[idx];
        cat.total += 1;
        if is_correct {
            cat.correct += 1;
        } else if !cat.missed_topics.contains(&question.concept) {
            cat.missed_topics.push(question.concept.clone());
        }

        let tier = match question.difficulty {
            Difficulty::Easy => &mut easy,
            Difficulty::Medium => &mut medium,
            Difficulty::Hard => &mut hard,
        };
        tier.total += 1;
        if is_correct {
            tier.correct += 1;
        } else if !tier.missed_concepts.contains(&question.concept) {
            tier.missed_concepts.push(question.concept.clone());
        }
    }

    let mut category_scores = Vec::with_capacity(categories.len());
    let mut skill_gaps = Vec::new();
    let mut strengths = Vec::new();
    for acc in categories {
        let pct = score_percentage(acc.correct, acc.total);
        category_scores.push(CategoryScore {
            category: acc.category.clone(),
            correct: acc.correct,
            total: acc.total,
            score: pct,
            competency: CompetencyLevel::for_percentage(pct),
        });
        if pct < GAP_THRESHOLD {
            skill_gaps.push(SkillGap {
                skill: acc.category,
                score: pct,
                topics: acc.missed_topics,
            });
        } else {
            strengths.push(acc.category);
        }
    }

    let difficulty_breakdown = [
        (Difficulty::Easy, easy),
        (Difficulty::Medium, medium),
        (Difficulty::Hard, hard),
    ]
    .into_iter()
    .filter(|(_, tier)| tier.total > 0)
    .map(|(difficulty, tier)| DifficultyBreakdown {
        difficulty,
        correct: tier.correct,
        total: tier.total,
        missed_concepts: tier.missed_concepts,
    })
    .collect();

    let recommendations = build_recommendations(&skill_gaps);

    AssessmentResult {
        id: Uuid::new_v4(),
        completed_at: Utc::now(),
        role: set.role.clone(),
        trigger,
        total_questions,
        correct_answers,
        score: score_percentage(correct_answers, total_questions),
        time_spent_secs,
        points_earned,
        points_possible,
        skipped_questions,
        category_scores,
        skill_gaps,
        strengths,
        difficulty_breakdown,
        recommendations,
    }
}

/// Review guidance derived from the gap list.
pub fn build_recommendations(gaps: &[SkillGap]) -> Vec<String> {
    if gaps.is_empty() {
        vec![
            "Great job! Continue practicing to maintain your skills".into(),
            "Consider taking on more challenging projects".into(),
            "Share your knowledge with others".into(),
        ]
    } else {
        let skills: Vec<&str> = gaps.iter().map(|g| g.skill.as_str()).collect();
        vec![
            format!("Focus on improving {}", skills.join(", ")),
            "Practice more hands-on coding exercises".into(),
            "Review fundamental concepts in weak areas".into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn question(id: &str, category: &str, concept: &str, correct_option: usize) -> Question {
        Question {
            id: id.into(),
            text: format!("Question {id}"),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_option,
            difficulty: Difficulty::Medium,
            category: category.into(),
            concept: concept.into(),
            points: 2,
            explanation: None,
            tags: vec![],
        }
    }

    fn set_of(questions: Vec<Question>) -> QuestionSet {
        QuestionSet {
            id: "test-set".into(),
            name: "Test Set".into(),
            description: String::new(),
            role: None,
            skills: vec![],
            questions,
            duration_mins: 45,
        }
    }

    fn sheet(entries: &[(&str, usize)]) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for (id, index) in entries {
            sheet.set_answer(id, *index);
        }
        sheet
    }

    #[test]
    fn rounding_half_up() {
        assert_eq!(score_percentage(1, 2), 50);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(1, 8), 13);
        assert_eq!(score_percentage(5, 5), 100);
        assert_eq!(score_percentage(0, 7), 0);
    }

    #[test]
    fn zero_total_is_zero_percent() {
        assert_eq!(score_percentage(0, 0), 0);
    }

    #[test]
    fn two_question_worked_example() {
        // Q1 answered correctly, Q2 answered wrong; both in one category.
        let set = set_of(vec![
            question("q1", "JavaScript Fundamentals", "closures", 1),
            question("q2", "JavaScript Fundamentals", "hoisting", 1),
        ]);
        let answers = sheet(&[("q1", 1), ("q2", 0)]);

        let result = score_attempt(&set, &answers, 120, SubmitTrigger::Manual);

        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.score, 50);
        assert_eq!(result.category_scores.len(), 1);
        assert_eq!(result.category_scores[0].category, "JavaScript Fundamentals");
        assert_eq!(result.category_scores[0].correct, 1);
        assert_eq!(result.category_scores[0].total, 2);
        assert_eq!(result.skill_gaps.len(), 1);
        assert_eq!(result.skill_gaps[0].skill, "JavaScript Fundamentals");
        assert_eq!(result.skill_gaps[0].score, 50);
        assert_eq!(result.skill_gaps[0].topics, vec!["hoisting"]);
    }

    #[test]
    fn empty_set_scores_zero() {
        let set = set_of(vec![]);
        let answers = AnswerSheet::new();

        let result = score_attempt(&set, &answers, 0, SubmitTrigger::Manual);

        assert_eq!(result.total_questions, 0);
        assert_eq!(result.correct_answers, 0);
        assert_eq!(result.score, 0);
        assert!(result.category_scores.is_empty());
        assert!(result.skill_gaps.is_empty());
        assert!(result.strengths.is_empty());
        assert!(result.difficulty_breakdown.is_empty());
    }

    #[test]
    fn unanswered_counts_incorrect_but_in_total() {
        let set = set_of(vec![
            question("q1", "React", "hooks", 0),
            question("q2", "React", "context", 0),
        ]);
        // q2 never answered
        let answers = sheet(&[("q1", 0)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.category_scores[0].total, 2);
        assert_eq!(result.score, 50);
        assert_eq!(result.skill_gaps[0].topics, vec!["context"]);
    }

    #[test]
    fn gap_strength_partition_is_exact() {
        // React 1/2 = 50 (gap), CSS 2/2 = 100 (strength), SQL 1/2 = 50 (gap).
        let set = set_of(vec![
            question("q1", "React", "hooks", 0),
            question("q2", "React", "context", 0),
            question("q3", "CSS", "grid", 0),
            question("q4", "CSS", "flexbox", 0),
            question("q5", "SQL", "joins", 0),
            question("q6", "SQL", "indexes", 0),
        ]);
        let answers = sheet(&[("q1", 0), ("q3", 0), ("q4", 0), ("q5", 0), ("q2", 3), ("q6", 3)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        let gap_skills: Vec<&str> = result.skill_gaps.iter().map(|g| g.skill.as_str()).collect();
        assert_eq!(gap_skills, vec!["React", "SQL"]);
        assert_eq!(result.strengths, vec!["CSS"]);

        // Every category lands in exactly one of the two partitions.
        for cs in &result.category_scores {
            let in_gaps = gap_skills.contains(&cs.category.as_str());
            let in_strengths = result.strengths.contains(&cs.category);
            assert!(in_gaps != in_strengths, "category {} in both or neither", cs.category);
        }
        assert_eq!(
            result.skill_gaps.len() + result.strengths.len(),
            result.category_scores.len()
        );
    }

    #[test]
    fn all_correct_means_no_gaps_and_expert_everywhere() {
        let set = set_of(vec![
            question("q1", "React", "hooks", 2),
            question("q2", "CSS", "grid", 1),
            question("q3", "SQL", "joins", 3),
        ]);
        let answers = sheet(&[("q1", 2), ("q2", 1), ("q3", 3)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        assert_eq!(result.score, 100);
        assert!(result.skill_gaps.is_empty());
        assert_eq!(result.strengths.len(), 3);
        for cs in &result.category_scores {
            assert_eq!(cs.competency, CompetencyLevel::Expert);
        }
    }

    #[test]
    fn malformed_question_skipped_from_correct_and_total() {
        let mut bad = question("q2", "React", "context", 0);
        bad.options.pop();
        let set = set_of(vec![question("q1", "React", "hooks", 0), bad]);
        let answers = sheet(&[("q1", 0), ("q2", 0)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        assert_eq!(result.skipped_questions, 1);
        assert_eq!(result.total_questions, 1);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.score, 100);
        assert_eq!(result.category_scores[0].total, 1);
    }

    #[test]
    fn score_never_exceeds_bounds() {
        let set = set_of(vec![question("q1", "React", "hooks", 0)]);
        let all_wrong = sheet(&[("q1", 3)]);
        let all_right = sheet(&[("q1", 0)]);

        let low = score_attempt(&set, &all_wrong, 0, SubmitTrigger::Manual);
        let high = score_attempt(&set, &all_right, 0, SubmitTrigger::Manual);

        assert_eq!(low.score, 0);
        assert_eq!(high.score, 100);
    }

    #[test]
    fn gap_topics_are_distinct_in_first_seen_order() {
        let set = set_of(vec![
            question("q1", "React", "hooks", 0),
            question("q2", "React", "hooks", 0),
            question("q3", "React", "context", 0),
        ]);
        let answers = sheet(&[("q1", 1), ("q2", 1), ("q3", 1)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        assert_eq!(result.skill_gaps[0].topics, vec!["hooks", "context"]);
    }

    #[test]
    fn points_accumulate_independently_of_score() {
        let mut q1 = question("q1", "React", "hooks", 0);
        q1.points = 3;
        let mut q2 = question("q2", "React", "context", 0);
        q2.points = 1;
        let set = set_of(vec![q1, q2]);
        let answers = sheet(&[("q1", 0), ("q2", 1)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        assert_eq!(result.points_earned, 3);
        assert_eq!(result.points_possible, 4);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn difficulty_breakdown_only_lists_present_tiers() {
        let mut q1 = question("q1", "React", "hooks", 0);
        q1.difficulty = Difficulty::Easy;
        let mut q2 = question("q2", "React", "context", 0);
        q2.difficulty = Difficulty::Hard;
        let set = set_of(vec![q1, q2]);
        let answers = sheet(&[("q1", 0), ("q2", 1)]);

        let result = score_attempt(&set, &answers, 60, SubmitTrigger::Manual);

        assert_eq!(result.difficulty_breakdown.len(), 2);
        assert_eq!(result.difficulty_breakdown[0].difficulty, Difficulty::Easy);
        assert_eq!(result.difficulty_breakdown[0].correct, 1);
        assert_eq!(result.difficulty_breakdown[1].difficulty, Difficulty::Hard);
        assert_eq!(result.difficulty_breakdown[1].missed_concepts, vec!["context"]);
    }

    #[test]
    fn scoring_is_deterministic() {
        let set = set_of(vec![
            question("q1", "React", "hooks", 1),
            question("q2", "CSS", "grid", 2),
            question("q3", "SQL", "joins", 0),
        ]);
        let answers = sheet(&[("q1", 1), ("q2", 0)]);

        let a = score_attempt(&set, &answers, 90, SubmitTrigger::Manual);
        let b = score_attempt(&set, &answers, 90, SubmitTrigger::Manual);

        assert_eq!(a.score, b.score);
        assert_eq!(a.correct_answers, b.correct_answers);
        assert_eq!(a.category_scores, b.category_scores);
        assert_eq!(a.skill_gaps, b.skill_gaps);
        assert_eq!(a.strengths, b.strengths);
        assert_eq!(a.difficulty_breakdown, b.difficulty_breakdown);
        assert_eq!(a.recommendations, b.recommendations);
    }

    #[test]
    fn recommendations_follow_gap_presence() {
        let with_gaps = build_recommendations(&[SkillGap {
            skill: "React".into(),
            score: 40,
            topics: vec![],
        }]);
        assert!(with_gaps[0].contains("Focus on improving React"));

        let without = build_recommendations(&[]);
        assert!(without[0].starts_with("Great job"));
    }
}
