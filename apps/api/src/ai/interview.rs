//! Interview practice: question generation and answer feedback.
//!
//! Both operations degrade instead of failing. Questions fall back to the
//! stored question bank and then to a built-in generic set; feedback falls
//! back to a neutral rating flagged with `fallback: true`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tracing::warn;
use validator::Validate;

use crate::ai::coerce::{clamp_score, lenient_number, lenient_text, string_list};
use crate::ai::prompts::{
    role_clause, INTERVIEW_FEEDBACK_PROMPT, INTERVIEW_FEEDBACK_SYSTEM, INTERVIEW_QUESTIONS_PROMPT,
    INTERVIEW_QUESTIONS_SYSTEM,
};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{LlmClient, LlmError};
use crate::question_bank::random_questions;
use crate::validation::{not_blank, trim_whitespace};

pub const DEFAULT_QUESTION_COUNT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

fn default_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

#[derive(Debug, Deserialize, Validate)]
pub struct QuestionsRequest {
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 2, max = 150), custom(function = "not_blank"))]
    pub role: String,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 20, message = "must be between 1 and 20"))]
    pub count: u32,
}

impl QuestionsRequest {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeQuestion {
    pub question: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub tips: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    Ai,
    QuestionBank,
    Builtin,
}

#[derive(Debug, Serialize)]
pub struct QuestionSet {
    pub role: String,
    pub source: QuestionSource,
    pub questions: Vec<PracticeQuestion>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuestion {
    #[serde(default, alias = "text", alias = "q", deserialize_with = "lenient_text")]
    question: Option<String>,
    #[serde(default, alias = "type", deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    difficulty: Option<String>,
    #[serde(default, alias = "tip", alias = "guidance", deserialize_with = "lenient_text")]
    tips: Option<String>,
}

/// Accepts `{"questions": [...]}` or a bare array; items may be plain strings
/// or objects. At most `count` questions are kept.
fn coerce_questions(value: Value, count: usize) -> Vec<PracticeQuestion> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| PracticeQuestion {
                    question: s.to_string(),
                    category: None,
                    difficulty: None,
                    tips: None,
                })
            }
            Value::Object(_) => {
                let raw: RawQuestion = serde_json::from_value(item).ok()?;
                Some(PracticeQuestion {
                    question: raw.question?,
                    category: raw.category,
                    difficulty: raw.difficulty.map(|d| d.to_lowercase()),
                    tips: raw.tips,
                })
            }
            _ => None,
        })
        .take(count)
        .collect()
}

async fn ai_questions(
    llm: &LlmClient,
    req: &QuestionsRequest,
) -> Result<Vec<PracticeQuestion>, LlmError> {
    let category_clause = req
        .category()
        .map(|c| format!("Focus on {c} questions.\n"))
        .unwrap_or_default();
    let difficulty_clause = req
        .difficulty
        .map(|d| format!("Pitch them at {} difficulty.\n", d.as_str()))
        .unwrap_or_default();
    let prompt = INTERVIEW_QUESTIONS_PROMPT
        .replace("{count}", &req.count.to_string())
        .replace("{role}", req.role.trim())
        .replace("{category_clause}", &category_clause)
        .replace("{difficulty_clause}", &difficulty_clause);

    let value = llm
        .call_json::<Value>(&prompt, &json_system(INTERVIEW_QUESTIONS_SYSTEM))
        .await?;
    Ok(coerce_questions(value, req.count as usize))
}

/// Generic questions that suit any role. `{role}` is substituted.
const BUILTIN_QUESTIONS: &[(&str, &str, &str, &str)] = &[
    (
        "general",
        "easy",
        "Tell me about yourself.",
        "Keep it to two minutes: current role, relevant experience, why this job.",
    ),
    (
        "general",
        "easy",
        "Why are you interested in this {role} position?",
        "Connect your skills to the duties listed in the posting.",
    ),
    (
        "behavioural",
        "medium",
        "Describe a time you had to meet a tight deadline.",
        "Use the STAR method: situation, task, action, result.",
    ),
    (
        "behavioural",
        "medium",
        "Tell me about a conflict with a co-worker and how you resolved it.",
        "Focus on what you did and what you learned, not on blame.",
    ),
    (
        "situational",
        "medium",
        "What would you do if you noticed a safety hazard on the job?",
        "Show that you follow procedure and report promptly.",
    ),
    (
        "general",
        "easy",
        "What are your greatest strengths?",
        "Pick two strengths and back each with a short example.",
    ),
    (
        "general",
        "medium",
        "What is one area you are working to improve?",
        "Name a real area and the concrete steps you are taking.",
    ),
    (
        "behavioural",
        "hard",
        "Describe a mistake you made at work and how you handled it.",
        "Own the mistake, explain the fix and what changed afterwards.",
    ),
    (
        "situational",
        "hard",
        "How would you handle your first 30 days as a new {role}?",
        "Cover getting to know the team and the tools, then aim for early wins.",
    ),
    (
        "general",
        "easy",
        "Do you have any questions for us?",
        "Always ask one or two questions about the team or the role.",
    ),
];

pub fn builtin_questions(role: &str, count: usize) -> Vec<PracticeQuestion> {
    let role = role.trim();
    BUILTIN_QUESTIONS
        .iter()
        .take(count)
        .map(|(category, difficulty, question, tips)| PracticeQuestion {
            question: question.replace("{role}", role),
            category: Some(category.to_string()),
            difficulty: Some(difficulty.to_string()),
            tips: Some(tips.to_string()),
        })
        .collect()
}

/// Model first, then the question bank, then the built-in set.
pub async fn generate_questions(
    pool: &PgPool,
    llm: &LlmClient,
    req: &QuestionsRequest,
) -> QuestionSet {
    let role = req.role.trim().to_string();
    let count = req.count as usize;

    match ai_questions(llm, req).await {
        Ok(questions) if !questions.is_empty() => {
            return QuestionSet {
                role,
                source: QuestionSource::Ai,
                questions,
            }
        }
        Ok(_) => warn!("Question generation returned no usable questions, using fallback"),
        Err(e) => warn!("Question generation failed, using fallback: {e}"),
    }

    let difficulty = req.difficulty.map(Difficulty::as_str);
    match random_questions(pool, req.category(), difficulty, req.count as i64).await {
        Ok(rows) if !rows.is_empty() => {
            return QuestionSet {
                role,
                source: QuestionSource::QuestionBank,
                questions: rows
                    .into_iter()
                    .map(|q| PracticeQuestion {
                        question: q.question,
                        category: req.category().map(str::to_string),
                        difficulty: Some(q.difficulty),
                        tips: q.tips,
                    })
                    .collect(),
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Question bank lookup failed: {e}"),
    }

    QuestionSet {
        questions: builtin_questions(&role, count),
        role,
        source: QuestionSource::Builtin,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 5, max = 1000), custom(function = "not_blank"))]
    pub question: String,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    pub answer: String,
    #[validate(length(max = 150))]
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFeedback {
    #[serde(default, alias = "score", deserialize_with = "lenient_number")]
    rating: Option<f64>,
    #[serde(default, deserialize_with = "string_list")]
    strengths: Vec<String>,
    #[serde(default, alias = "weaknesses", deserialize_with = "string_list")]
    improvements: Vec<String>,
    #[serde(default, alias = "sample_answer", deserialize_with = "lenient_text")]
    improved_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerFeedback {
    /// 1 to 10.
    pub rating: i32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub improved_answer: Option<String>,
    pub fallback: bool,
}

impl AnswerFeedback {
    pub fn neutral() -> Self {
        Self {
            rating: 5,
            strengths: Vec::new(),
            improvements: vec![
                "Structure your answer with the STAR method: situation, task, action and result."
                    .to_string(),
                "Close with a measurable outcome where you can.".to_string(),
            ],
            improved_answer: None,
            fallback: true,
        }
    }
}

impl From<RawFeedback> for AnswerFeedback {
    fn from(raw: RawFeedback) -> Self {
        Self {
            rating: clamp_score(raw.rating, 1, 10).unwrap_or(5),
            strengths: raw.strengths,
            improvements: raw.improvements,
            improved_answer: raw.improved_answer,
            fallback: false,
        }
    }
}

pub async fn answer_feedback(llm: &LlmClient, req: &FeedbackRequest) -> AnswerFeedback {
    let prompt = INTERVIEW_FEEDBACK_PROMPT
        .replace("{role_clause}", &role_clause("for a", req.role.as_deref()))
        .replace("{question}", req.question.trim())
        .replace("{answer}", req.answer.trim());

    match llm
        .call_json::<RawFeedback>(&prompt, &json_system(INTERVIEW_FEEDBACK_SYSTEM))
        .await
    {
        Ok(raw) => raw.into(),
        Err(e) => {
            warn!("Interview feedback unavailable, returning neutral default: {e}");
            AnswerFeedback::neutral()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_questions_object_form() {
        let questions = coerce_questions(
            json!({"questions": [
                {"question": "Why this role?", "category": "general", "difficulty": "Easy", "tips": ["Be specific."]},
                {"text": "Describe a safety incident."},
                {"category": "no question text"}
            ]}),
            10,
        );
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].difficulty.as_deref(), Some("easy"));
        assert_eq!(questions[0].tips.as_deref(), Some("Be specific."));
        assert_eq!(questions[1].question, "Describe a safety incident.");
    }

    #[test]
    fn test_coerce_questions_array_of_strings_respects_count() {
        let questions = coerce_questions(json!(["One?", " ", "Two?", "Three?"]), 2);
        let texts: Vec<_> = questions.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["One?", "Two?"]);
    }

    #[test]
    fn test_coerce_questions_unexpected_shape() {
        assert!(coerce_questions(json!({"answer": 42}), 5).is_empty());
        assert!(coerce_questions(json!("nope"), 5).is_empty());
    }

    #[test]
    fn test_builtin_questions_mention_role() {
        let questions = builtin_questions(" Forklift Operator ", 10);
        assert_eq!(questions.len(), 10);
        assert!(questions[1].question.contains("Forklift Operator position"));
        assert_eq!(builtin_questions("Cook", 3).len(), 3);
    }

    #[test]
    fn test_questions_request_defaults_and_bounds() {
        let req: QuestionsRequest = serde_json::from_value(json!({"role": "Cook"})).unwrap();
        assert_eq!(req.count, DEFAULT_QUESTION_COUNT);
        assert!(req.validate().is_ok());

        let req: QuestionsRequest =
            serde_json::from_value(json!({"role": "Cook", "count": 21})).unwrap();
        assert!(req.validate().is_err());

        let bad: Result<QuestionsRequest, _> =
            serde_json::from_value(json!({"role": "Cook", "difficulty": "extreme"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_feedback_from_reply() {
        let raw: RawFeedback = serde_json::from_value(json!({
            "score": "8.4",
            "strengths": "Clear example",
            "weaknesses": ["No result stated"],
            "sample_answer": "In my last role..."
        }))
        .unwrap();
        let feedback = AnswerFeedback::from(raw);
        assert_eq!(feedback.rating, 8);
        assert_eq!(feedback.strengths, vec!["Clear example"]);
        assert_eq!(feedback.improvements, vec!["No result stated"]);
        assert!(!feedback.fallback);
    }

    #[test]
    fn test_feedback_rating_clamped_and_defaulted() {
        let feedback = AnswerFeedback::from(RawFeedback {
            rating: Some(0.0),
            ..Default::default()
        });
        assert_eq!(feedback.rating, 1);
        let feedback = AnswerFeedback::from(RawFeedback::default());
        assert_eq!(feedback.rating, 5);
    }

    #[test]
    fn test_neutral_feedback() {
        let feedback = AnswerFeedback::neutral();
        assert_eq!(feedback.rating, 5);
        assert!(feedback.fallback);
    }
}
