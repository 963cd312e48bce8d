//! MemQA Answer — turns a question plus retrieved messages into a
//! natural-language answer via an external LLM.
//!
//! Non-streaming: one JSON request, one answer string. Supports Gemini
//! (the original deployment) and OpenAI-compatible chat APIs.

pub mod config;
pub mod prompt;
pub mod providers;

pub use config::{LlmConfig, LlmProvider};
pub use prompt::build_prompt;
pub use providers::Synthesizer;

/// Canned answer when retrieval finds nothing above the relevance
/// threshold; returned without calling the LLM at all.
pub const NO_RELEVANT_INFO: &str =
    "I could not find any relevant information in the member messages to answer this question.";

/// Fallback when the model returns a blank completion.
pub const BLANK_ANSWER_FALLBACK: &str =
    "I'm having trouble generating an answer. Please try rephrasing your question.";
