// Shared prompt fragments. Each feature that needs LLM calls keeps its own
// prompts.rs next to it and appends these where they apply.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated career advice honest.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    Never invent employers, job titles, dates, credentials or metrics that are not \
    present in the candidate's own text. Where a metric would help but is missing, \
    say so in the suggestions instead of making one up.";

/// Joins a role-specific system preamble with the JSON-only rules.
pub fn json_system(preamble: &str) -> String {
    format!("{preamble} {JSON_ONLY_SYSTEM}")
}
