// Prompt templates for the AI career tools.
// Placeholders in braces are replaced before sending.

pub const RESUME_ENHANCE_SYSTEM: &str = "You are a senior recruiter at a Canadian staffing agency \
    who rewrites resumes so they are clear, results-oriented and easy for hiring managers to scan.";

pub const RESUME_ENHANCE_PROMPT: &str = r#"Improve the resume below{target_role_clause}.

Split it into its natural sections (for example Summary, Experience, Education, Skills,
Certifications). For each section return the original text, an enhanced rewrite that keeps
every fact intact, and 1-3 short suggestions for further improvement.

Return a JSON object with this EXACT schema:
{
  "summary": "two or three sentences on the overall state of the resume",
  "overall_score": 0-100,
  "sections": [
    {
      "name": "Experience",
      "original": "section text as given",
      "enhanced": "rewritten section text",
      "suggestions": ["suggestion"]
    }
  ]
}

RESUME:
{resume_text}"#;

pub const RESUME_ANALYZE_SYSTEM: &str = "You are an applicant-tracking-system expert and recruiter \
    who scores resumes for clarity, impact and keyword coverage.";

pub const RESUME_ANALYZE_PROMPT: &str = r#"Analyse the resume below{target_role_clause}.

Return a JSON object with this EXACT schema:
{
  "score": 0-100,
  "summary": "one paragraph assessment",
  "strengths": ["strength"],
  "improvements": ["specific, actionable improvement"],
  "keywords": ["keyword a recruiter would search for"]
}

RESUME:
{resume_text}"#;

pub const INTERVIEW_QUESTIONS_SYSTEM: &str = "You are an experienced recruiter preparing candidates \
    for job interviews. You write realistic questions that hiring managers actually ask.";

pub const INTERVIEW_QUESTIONS_PROMPT: &str = r#"Write {count} interview questions for a candidate applying to be a {role}.
{category_clause}{difficulty_clause}
Return a JSON object with this EXACT schema:
{
  "questions": [
    {
      "question": "the question",
      "category": "behavioural | technical | situational | general",
      "difficulty": "easy | medium | hard",
      "tips": "one or two sentences on what a strong answer covers"
    }
  ]
}"#;

pub const INTERVIEW_FEEDBACK_SYSTEM: &str = "You are an interview coach. You give candid, \
    encouraging feedback that helps candidates give stronger answers.";

pub const INTERVIEW_FEEDBACK_PROMPT: &str = r#"Evaluate this interview answer{role_clause}.

QUESTION:
{question}

CANDIDATE ANSWER:
{answer}

Return a JSON object with this EXACT schema:
{
  "rating": 1-10,
  "strengths": ["what worked"],
  "improvements": ["what to change"],
  "improved_answer": "a stronger version of the same answer, in the first person"
}"#;

pub fn role_clause(prefix: &str, role: Option<&str>) -> String {
    match role.map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => format!(" {prefix} {role}"),
        None => String::new(),
    }
}
