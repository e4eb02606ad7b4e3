//! Mock question source for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skillgauge_core::error::SourceError;
use skillgauge_core::model::{Difficulty, Question};
use skillgauge_core::source::{GenerateRequest, QuestionSource};

/// A scripted question source for exercising the chain without real
/// network calls.
pub struct MockSource {
    name: String,
    questions: Vec<Question>,
    fail_with: Option<fn() -> SourceError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockSource {
    /// A source that always returns clones of `questions`.
    pub fn with_questions(name: &str, questions: Vec<Question>) -> Self {
        Self {
            name: name.to_string(),
            questions,
            fail_with: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A source that always fails with the error built by `fail_with`.
    pub fn failing(name: &str, fail_with: fn() -> SourceError) -> Self {
        Self {
            name: name.to_string(),
            questions: vec![],
            fail_with: Some(fail_with),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this source.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

/// Valid placeholder questions for tests.
pub fn sample_questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| Question {
            id: format!("q{}", i + 1),
            text: format!("Sample question {}", i + 1),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: i % 4,
            difficulty: Difficulty::Medium,
            category: "General".into(),
            concept: "sample".into(),
            points: 2,
            explanation: None,
            tags: vec![],
        })
        .collect()
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Question>, SourceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(fail) = self.fail_with {
            return Err(fail());
        }
        Ok(self.questions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            role: "Backend Developer".into(),
            skills: vec![],
            count: 3,
            difficulty: None,
            context: None,
        }
    }

    #[tokio::test]
    async fn scripted_questions() {
        let source = MockSource::with_questions("mock", sample_questions(3));

        let questions = source.generate(&request()).await.unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(source.call_count(), 1);
        assert_eq!(
            source.last_request().map(|r| r.role),
            Some("Backend Developer".to_string())
        );
    }

    #[tokio::test]
    async fn scripted_failure() {
        let source = MockSource::failing("mock", || SourceError::NetworkError("down".into()));

        let err = source.generate(&request()).await.unwrap_err();
        assert!(matches!(err, SourceError::NetworkError(_)));
        assert_eq!(source.call_count(), 1);
    }
}
