//! Question source trait and AI-reply handling.
//!
//! The async trait is implemented by the `skillgauge-providers` crate.
//! Parsing and normalization of model replies live here so every source
//! that speaks JSON emits questions meeting the same input contract:
//! exactly four options and an in-range correct index.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SourceError;
use crate::model::{Difficulty, Question, OPTION_COUNT};

/// Trait for backends that supply assessment questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Produce a batch of questions for the request.
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Question>, SourceError>;
}

/// Request for a batch of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Job role the questions should target.
    pub role: String,
    /// Skills to cover; falls back to the role when empty.
    #[serde(default)]
    pub skills: Vec<String>,
    /// How many questions to produce.
    pub count: usize,
    /// Fixed difficulty; `None` asks for a mixed spread.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Extra instructions forwarded to AI generators.
    #[serde(default)]
    pub context: Option<String>,
}

/// Build the generation prompt sent to AI sources.
pub fn build_prompt(request: &GenerateRequest) -> String {
    let skills = if request.skills.is_empty() {
        request.role.clone()
    } else {
        request.skills.join(", ")
    };
    let difficulty_line = match request.difficulty {
        Some(d) => format!("- Questions should be {d} difficulty"),
        None => {
            "- Mix of difficulty: roughly one third easy, one third medium, one third hard".into()
        }
    };
    let context_line = match &request.context {
        Some(ctx) => format!("\nContext: {ctx}\n"),
        None => String::new(),
    };

    format!(
        r#"Generate exactly {count} multiple-choice questions for a {role} assessment covering: {skills}.
{context_line}
Requirements:
- Generate exactly {count} questions (no more, no less)
- Each question must have exactly 4 options
- Only one option is correct
- Include practical, hands-on scenarios relevant to the role
{difficulty_line}
- Avoid generic trivia; make the questions role-specific

Return ONLY a valid JSON array in this exact format:
[
  {{
    "question": "When building a React component, what is the best practice for handling form state?",
    "options": ["Use document.getElementById", "Use useState hook", "Use global variables", "Use localStorage directly"],
    "correctAnswer": 1,
    "difficulty": "medium",
    "category": "Frontend Development",
    "concept": "React State Management",
    "explanation": "Why the correct option is right"
  }}
]"#,
        count = request.count,
        role = request.role,
    )
}

/// A question as models actually return it: partially filled, loosely
/// typed. [`normalize_questions`] turns these into scoreable [`Question`]s.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    #[serde(default, alias = "text")]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "correctAnswer")]
    pub correct_answer: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub concept: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Slice the JSON payload out of a model reply that may wrap it in prose
/// or markdown fences. Arrays are preferred; an object is accepted so
/// `{"questions": [...]}` replies still parse.
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if end > start {
            return Some(&text[start..=end]);
        }
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return Some(&text[start..=end]);
        }
    }
    None
}

/// Parse a model reply into raw questions.
pub fn parse_questions_text(text: &str) -> Result<Vec<RawQuestion>, SourceError> {
    let block = extract_json_block(text)
        .ok_or_else(|| SourceError::MalformedResponse("no JSON found in reply".into()))?;

    if let Ok(list) = serde_json::from_str::<Vec<RawQuestion>>(block) {
        return Ok(list);
    }

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(default)]
        questions: Vec<RawQuestion>,
    }
    serde_json::from_str::<Wrapper>(block)
        .map(|w| w.questions)
        .map_err(|e| SourceError::MalformedResponse(e.to_string()))
}

/// Normalize raw model output into scoreable questions.
///
/// Options are truncated to four; a question with fewer than four is
/// dropped with a warning. An out-of-range or missing correct index
/// defaults to 0, an unknown difficulty to the request's difficulty (or
/// medium), category to the first skill or the role, concept to the
/// category. Every returned question passes `validate`.
pub fn normalize_questions(raw: Vec<RawQuestion>, request: &GenerateRequest) -> Vec<Question> {
    let default_category = request
        .skills
        .first()
        .cloned()
        .unwrap_or_else(|| request.role.clone());
    let fallback_difficulty = request.difficulty.unwrap_or_default();

    let mut questions = Vec::new();
    for rq in raw.into_iter().take(request.count) {
        if rq.question.trim().is_empty() {
            warn!("dropping generated question with empty text");
            continue;
        }

        let mut options = rq.options;
        options.truncate(OPTION_COUNT);
        if options.len() < OPTION_COUNT {
            warn!(
                question = %rq.question,
                count = options.len(),
                "dropping generated question with too few options"
            );
            continue;
        }

        let correct_option = match rq.correct_answer {
            Some(i) if (0..OPTION_COUNT as i64).contains(&i) => i as usize,
            _ => 0,
        };
        let difficulty = rq
            .difficulty
            .as_deref()
            .and_then(|d| d.parse::<Difficulty>().ok())
            .unwrap_or(fallback_difficulty);
        let category = match rq.category {
            Some(c) if !c.trim().is_empty() => c,
            _ => default_category.clone(),
        };
        let concept = match rq.concept {
            Some(c) if !c.trim().is_empty() => c,
            _ => category.clone(),
        };

        questions.push(Question {
            id: format!("q{}", questions.len() + 1),
            text: rq.question,
            options,
            correct_option,
            difficulty,
            category,
            concept,
            points: rq.points.unwrap_or_else(|| difficulty.default_points()),
            explanation: rq.explanation,
            tags: rq.tags,
        });
    }
    questions
}
