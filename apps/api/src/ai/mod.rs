//! AI career tools: resume enhancement/analysis and interview practice.
//! Every model call goes through `crate::llm_client::LlmClient`.

pub mod coerce;
pub mod handlers;
pub mod interview;
pub mod prompts;
pub mod resume;
