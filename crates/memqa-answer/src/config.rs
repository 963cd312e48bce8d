//! LLM provider selection and API key configuration.

use serde::{Deserialize, Serialize};

use memqa_core::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Gemini,
    OpenAI,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Gemini => write!(f, "gemini"),
            LlmProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Resolved LLM configuration: provider, model, key.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub api_key: String,
}

impl LlmConfig {
    /// Read provider selection and the matching API key from the
    /// environment.
    ///
    /// - `MEMQA_LLM_PROVIDER` (`gemini` | `openai`, default `gemini`)
    /// - `GEMINI_API_KEY` / `OPENAI_API_KEY` (required for the selected
    ///   provider; startup fails without it)
    /// - `MEMQA_LLM_MODEL` (optional model override)
    pub fn from_env() -> Result<Self> {
        let provider = match std::env::var("MEMQA_LLM_PROVIDER").as_deref() {
            Ok("openai") => LlmProvider::OpenAI,
            Ok("gemini") | Err(_) => LlmProvider::Gemini,
            Ok(other) => {
                return Err(Error::Config(format!(
                    "invalid MEMQA_LLM_PROVIDER: {other} (expected gemini or openai)"
                )))
            }
        };

        let (key_var, default_model) = match provider {
            LlmProvider::Gemini => ("GEMINI_API_KEY", DEFAULT_GEMINI_MODEL),
            LlmProvider::OpenAI => ("OPENAI_API_KEY", DEFAULT_OPENAI_MODEL),
        };

        let api_key = std::env::var(key_var)
            .map_err(|_| Error::Config(format!("{key_var} environment variable not set")))?;

        let model = std::env::var("MEMQA_LLM_MODEL").unwrap_or_else(|_| default_model.to_string());

        Ok(Self {
            provider,
            model,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_display() {
        assert_eq!(LlmProvider::Gemini.to_string(), "gemini");
        assert_eq!(LlmProvider::OpenAI.to_string(), "openai");
    }
}
