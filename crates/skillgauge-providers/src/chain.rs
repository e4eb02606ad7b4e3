//! Ordered fall-through over question sources.

use tracing::{error, info, warn};

use skillgauge_core::error::SourceError;
use skillgauge_core::model::Question;
use skillgauge_core::source::{GenerateRequest, QuestionSource};

/// Sources tried in order until one returns questions.
///
/// Every failure falls through to the next source; the chain only errors
/// when the whole list is exhausted. With [`crate::fallback::StaticFallback`]
/// as the final link the chain never fails.
pub struct SourceChain {
    sources: Vec<Box<dyn QuestionSource>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn QuestionSource>>) -> Self {
        Self { sources }
    }

    /// Source names in try order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order. Returns the questions together with the
    /// name of the source that produced them.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<(Vec<Question>, String), SourceError> {
        for source in &self.sources {
            match source.generate(request).await {
                Ok(questions) if questions.is_empty() => {
                    warn!(
                        source = source.name(),
                        "source returned no questions, trying next"
                    );
                }
                Ok(questions) => {
                    info!(
                        source = source.name(),
                        count = questions.len(),
                        "questions generated"
                    );
                    return Ok((questions, source.name().to_string()));
                }
                Err(err) if err.is_permanent() => {
                    error!(
                        source = source.name(),
                        %err,
                        "source failed permanently, trying next"
                    );
                }
                Err(err) => {
                    warn!(
                        source = source.name(),
                        %err,
                        "source failed, trying next"
                    );
                }
            }
        }
        Err(SourceError::Exhausted {
            role: request.role.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::StaticFallback;
    use crate::mock::{sample_questions, MockSource};

    fn request(count: usize) -> GenerateRequest {
        GenerateRequest {
            role: "Backend Developer".into(),
            skills: vec![],
            count,
            difficulty: None,
            context: None,
        }
    }

    #[tokio::test]
    async fn first_healthy_source_wins() {
        let chain = SourceChain::new(vec![
            Box::new(MockSource::with_questions("first", sample_questions(3))),
            Box::new(MockSource::with_questions("second", sample_questions(3))),
        ]);

        let (questions, used) = chain.generate(&request(3)).await.unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(used, "first");
    }

    #[tokio::test]
    async fn failure_falls_through_to_next_source() {
        let chain = SourceChain::new(vec![
            Box::new(MockSource::failing("first", || {
                SourceError::NetworkError("down".into())
            })),
            Box::new(MockSource::with_questions("second", sample_questions(2))),
        ]);

        let (_, used) = chain.generate(&request(2)).await.unwrap();
        assert_eq!(used, "second");
    }

    #[tokio::test]
    async fn permanent_failure_also_falls_through() {
        let chain = SourceChain::new(vec![
            Box::new(MockSource::failing("first", || {
                SourceError::AuthenticationFailed("bad key".into())
            })),
            Box::new(MockSource::with_questions("second", sample_questions(2))),
        ]);

        let (_, used) = chain.generate(&request(2)).await.unwrap();
        assert_eq!(used, "second");
    }

    #[tokio::test]
    async fn empty_success_counts_as_failure() {
        let chain = SourceChain::new(vec![
            Box::new(MockSource::with_questions("first", vec![])),
            Box::new(MockSource::with_questions("second", sample_questions(1))),
        ]);

        let (_, used) = chain.generate(&request(1)).await.unwrap();
        assert_eq!(used, "second");
    }

    #[tokio::test]
    async fn exhausted_chain_reports_role() {
        let chain = SourceChain::new(vec![Box::new(MockSource::failing("only", || {
            SourceError::Timeout(120)
        }))]);

        let err = chain.generate(&request(5)).await.unwrap_err();
        assert!(matches!(err, SourceError::Exhausted { role } if role == "Backend Developer"));
    }

    #[tokio::test]
    async fn fallback_terminated_chain_never_fails() {
        let chain = SourceChain::new(vec![
            Box::new(MockSource::failing("first", || {
                SourceError::NetworkError("down".into())
            })),
            Box::new(StaticFallback::new()),
        ]);

        let (questions, used) = chain.generate(&request(5)).await.unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(used, "fallback");
    }
}
