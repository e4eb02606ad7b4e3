//! Attempt lifecycle: answer recording and the submission state machine.
//!
//! An [`Attempt`] moves `NotStarted -> InProgress -> Submitted` and never
//! back. Answers are mutable only while in progress; submission invokes the
//! scoring engine exactly once and freezes the rest. The computed result
//! stays inside the attempt so a failed persistence call can be retried
//! without rescoring.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AttemptError;
use crate::model::QuestionSet;
use crate::result::AssessmentResult;
use crate::scoring;

/// What caused an attempt to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    /// Explicit submission by the test taker.
    Manual,
    /// The countdown reached zero.
    TimerExpired,
}

/// User responses keyed by question id.
///
/// Recording an answer overwrites any prior answer for that id. The sheet
/// performs no validation against a question's option count; sources
/// guarantee well-formed questions and the scoring engine treats an
/// out-of-range index the same as a wrong answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSheet {
    answers: HashMap<String, usize>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the selected option for a question, replacing any prior pick.
    pub fn set_answer(&mut self, question_id: &str, index: usize) {
        self.answers.insert(question_id.to_string(), index);
    }

    /// The recorded option index, or `None` if unanswered.
    pub fn answer(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Discard all recorded answers (between attempts, never within one).
    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

/// Lifecycle states of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Submitted,
}

/// A single timed run through a question set.
#[derive(Debug, Clone)]
pub struct Attempt {
    set: QuestionSet,
    sheet: AnswerSheet,
    state: AttemptState,
    started_at: Option<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
    result: Option<AssessmentResult>,
}

impl Attempt {
    pub fn new(set: QuestionSet) -> Self {
        Self {
            set,
            sheet: AnswerSheet::new(),
            state: AttemptState::NotStarted,
            started_at: None,
            deadline: None,
            result: None,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn question_set(&self) -> &QuestionSet {
        &self.set
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.sheet
    }

    /// Begin the attempt, stamping the start time and the deadline from the
    /// set's duration.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), AttemptError> {
        if self.state != AttemptState::NotStarted {
            return Err(AttemptError::AlreadyStarted);
        }
        self.state = AttemptState::InProgress;
        self.started_at = Some(now);
        self.deadline = Some(now + Duration::minutes(self.set.duration_mins as i64));
        Ok(())
    }

    /// Record an answer. Only legal while in progress.
    pub fn set_answer(&mut self, question_id: &str, index: usize) -> Result<(), AttemptError> {
        if self.state != AttemptState::InProgress {
            return Err(AttemptError::NotInProgress);
        }
        self.sheet.set_answer(question_id, index);
        Ok(())
    }

    pub fn answer(&self, question_id: &str) -> Option<usize> {
        self.sheet.answer(question_id)
    }

    /// Seconds left on the countdown; zero once the deadline has passed or
    /// before the attempt starts.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.deadline {
            Some(deadline) => (deadline - now).num_seconds().max(0) as u64,
            None => 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Transition to `Submitted`, scoring the attempt exactly once.
    ///
    /// A second call observes the terminal state and returns
    /// [`AttemptError::AlreadySubmitted`] without touching the stored
    /// result, so near-simultaneous submit triggers cannot double-score.
    pub fn submit(
        &mut self,
        trigger: SubmitTrigger,
        now: DateTime<Utc>,
    ) -> Result<&AssessmentResult, AttemptError> {
        match self.state {
            AttemptState::NotStarted => Err(AttemptError::NotInProgress),
            AttemptState::Submitted => Err(AttemptError::AlreadySubmitted),
            AttemptState::InProgress => {
                let time_spent_secs = self
                    .started_at
                    .map(|started| (now - started).num_seconds().max(0) as u64)
                    .unwrap_or(0);
                let result = scoring::score_attempt(&self.set, &self.sheet, time_spent_secs, trigger);
                self.state = AttemptState::Submitted;
                Ok(self.result.insert(result))
            }
        }
    }

    /// The computed result, present once submitted.
    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }
}
