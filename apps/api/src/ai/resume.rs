//! Resume enhancement and analysis.
//!
//! Enhancement is persisted: one `resume_sessions` row plus one ordered
//! `resume_sections` row per section, written in a single transaction after
//! the model has answered. Analysis is stateless and never fails the request.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::ai::coerce::{clamp_score, lenient_number, lenient_text, string_list};
use crate::ai::prompts::{
    role_clause, RESUME_ANALYZE_PROMPT, RESUME_ANALYZE_SYSTEM, RESUME_ENHANCE_PROMPT,
    RESUME_ENHANCE_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, NO_FABRICATION_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::resume::{ResumeSectionRow, ResumeSessionRow};
use crate::validation::{not_blank, trim_whitespace};

pub const MIN_RESUME_CHARS: usize = 50;
pub const MAX_RESUME_CHARS: usize = 20_000;

#[derive(Debug, Deserialize, Validate)]
pub struct ResumeTextRequest {
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(
        length(min = 50, max = 20000, message = "must be 50-20000 characters"),
        custom(function = "not_blank")
    )]
    pub resume_text: String,
    #[validate(length(max = 150, message = "must be at most 150 characters"))]
    pub target_role: Option<String>,
}

impl ResumeTextRequest {
    pub fn target_role(&self) -> Option<&str> {
        self.target_role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Enhancement
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawEnhancement {
    #[serde(default, deserialize_with = "lenient_text")]
    summary: Option<String>,
    #[serde(default, alias = "score", deserialize_with = "lenient_number")]
    overall_score: Option<f64>,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSection {
    #[serde(default, alias = "section_name", alias = "title", deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, alias = "original_text", deserialize_with = "lenient_text")]
    original: Option<String>,
    #[serde(default, alias = "enhanced_text", alias = "improved", deserialize_with = "lenient_text")]
    enhanced: Option<String>,
    #[serde(default, alias = "tips", deserialize_with = "string_list")]
    suggestions: Vec<String>,
}

/// Model output after coercion, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Enhancement {
    pub summary: Option<String>,
    pub overall_score: Option<i32>,
    pub sections: Vec<EnhancedSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedSection {
    pub name: String,
    pub original: String,
    pub enhanced: String,
    pub suggestions: Vec<String>,
}

/// Sections without enhanced text are dropped. A reply with no usable
/// section at all is treated as a failed call.
fn coerce_enhancement(raw: RawEnhancement) -> Result<Enhancement, AppError> {
    let sections: Vec<EnhancedSection> = raw
        .sections
        .into_iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let enhanced = s.enhanced?;
            Some(EnhancedSection {
                name: s.name.unwrap_or_else(|| format!("Section {}", i + 1)),
                original: s.original.unwrap_or_default(),
                enhanced,
                suggestions: s.suggestions,
            })
        })
        .collect();

    if sections.is_empty() {
        return Err(AppError::Llm(
            "resume enhancement returned no sections".to_string(),
        ));
    }

    Ok(Enhancement {
        summary: raw.summary,
        overall_score: clamp_score(raw.overall_score, 0, 100),
        sections,
    })
}

fn fill_prompt(template: &str, resume_text: &str, target_role: Option<&str>) -> String {
    template
        .replace("{target_role_clause}", &role_clause("for a", target_role))
        .replace("{resume_text}", resume_text)
}

/// Asks the model to rewrite the resume section by section.
pub async fn enhance(
    llm: &LlmClient,
    resume_text: &str,
    target_role: Option<&str>,
) -> Result<Enhancement, AppError> {
    let prompt = format!(
        "{}\n\n{}",
        fill_prompt(RESUME_ENHANCE_PROMPT, resume_text, target_role),
        NO_FABRICATION_INSTRUCTION
    );
    let raw = llm
        .call_json::<RawEnhancement>(&prompt, &json_system(RESUME_ENHANCE_SYSTEM))
        .await
        .map_err(|e| AppError::Llm(format!("Resume enhancement failed: {e}")))?;
    coerce_enhancement(raw)
}

#[derive(Debug, Serialize)]
pub struct ResumeSessionDetail {
    pub session: ResumeSessionRow,
    pub sections: Vec<ResumeSectionRow>,
}

/// Writes the session and its sections atomically.
pub async fn save_session(
    pool: &PgPool,
    resume_text: &str,
    target_role: Option<&str>,
    enhancement: Enhancement,
) -> Result<ResumeSessionDetail, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let session = sqlx::query_as::<_, ResumeSessionRow>(
        r#"
        INSERT INTO resume_sessions (id, target_role, original_text, summary, overall_score)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(target_role)
    .bind(resume_text)
    .bind(&enhancement.summary)
    .bind(enhancement.overall_score)
    .fetch_one(&mut *tx)
    .await?;

    let mut sections = Vec::with_capacity(enhancement.sections.len());
    for (position, section) in enhancement.sections.into_iter().enumerate() {
        let row = sqlx::query_as::<_, ResumeSectionRow>(
            r#"
            INSERT INTO resume_sections
                (id, session_id, position, section_name, original_text, enhanced_text, suggestions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session.id)
        .bind(position as i32)
        .bind(&section.name)
        .bind(&section.original)
        .bind(&section.enhanced)
        .bind(&section.suggestions)
        .fetch_one(&mut *tx)
        .await?;
        sections.push(row);
    }

    tx.commit().await?;

    info!(
        "Saved resume session {} with {} sections",
        session.id,
        sections.len()
    );

    Ok(ResumeSessionDetail { session, sections })
}

pub async fn load_session(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ResumeSessionDetail>, sqlx::Error> {
    let Some(session) =
        sqlx::query_as::<_, ResumeSessionRow>("SELECT * FROM resume_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
    else {
        return Ok(None);
    };

    let sections = sqlx::query_as::<_, ResumeSectionRow>(
        "SELECT * FROM resume_sections WHERE session_id = $1 ORDER BY position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ResumeSessionDetail { session, sections }))
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct RawAnalysis {
    #[serde(default, alias = "overall_score", deserialize_with = "lenient_number")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    strengths: Vec<String>,
    #[serde(default, alias = "weaknesses", deserialize_with = "string_list")]
    improvements: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeAnalysis {
    pub score: i32,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub keywords: Vec<String>,
    /// True when the model could not be reached and this is a placeholder.
    pub fallback: bool,
}

impl ResumeAnalysis {
    pub fn unavailable() -> Self {
        Self {
            score: 0,
            summary: "Automated analysis is unavailable right now. Please try again shortly."
                .to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            keywords: Vec::new(),
            fallback: true,
        }
    }
}

impl From<RawAnalysis> for ResumeAnalysis {
    fn from(raw: RawAnalysis) -> Self {
        Self {
            score: clamp_score(raw.score, 0, 100).unwrap_or(0),
            summary: raw.summary.unwrap_or_default(),
            strengths: raw.strengths,
            improvements: raw.improvements,
            keywords: raw.keywords,
            fallback: false,
        }
    }
}

/// Scores the resume. Any model failure yields `ResumeAnalysis::unavailable()`.
pub async fn analyze(
    llm: &LlmClient,
    resume_text: &str,
    target_role: Option<&str>,
) -> ResumeAnalysis {
    let prompt = fill_prompt(RESUME_ANALYZE_PROMPT, resume_text, target_role);
    match llm
        .call_json::<RawAnalysis>(&prompt, &json_system(RESUME_ANALYZE_SYSTEM))
        .await
    {
        Ok(raw) => raw.into(),
        Err(e) => {
            warn!("Resume analysis unavailable, returning default: {e}");
            ResumeAnalysis::unavailable()
        }
    }
}

/// Trims extracted text to the accepted maximum on a char boundary.
pub fn truncate_resume_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
