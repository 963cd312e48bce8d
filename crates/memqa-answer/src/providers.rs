//! Non-streaming generation calls to the configured LLM provider.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use memqa_core::{Error, Result};
use memqa_index::ScoredMessage;

use crate::config::{LlmConfig, LlmProvider};
use crate::prompt::build_prompt;
use crate::BLANK_ANSWER_FALLBACK;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Answer synthesis client. Holds the HTTP client and resolved provider
/// configuration; shared read-only across requests.
pub struct Synthesizer {
    client: Client,
    config: LlmConfig,
}

impl Synthesizer {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Synthesis(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate an answer to `question` grounded in the retrieved
    /// `context`. A blank model completion is replaced with a fixed
    /// retry-phrasing message rather than returned empty.
    pub async fn synthesize(&self, question: &str, context: &[ScoredMessage]) -> Result<String> {
        let prompt = build_prompt(question, context);
        debug!(provider = %self.config.provider, model = %self.config.model, "Synthesizing answer");

        let raw = match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(&prompt).await?,
            LlmProvider::OpenAI => self.generate_openai(&prompt).await?,
        };

        let answer = raw.trim();
        if answer.is_empty() {
            Ok(BLANK_ANSWER_FALLBACK.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    async fn generate_gemini(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.config.model, self.config.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!("API error {status}: {body}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::Synthesis(format!("invalid response: {e}")))?;
        parse_gemini_response(&payload)
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String> {
        let url = format!("{OPENAI_BASE_URL}/chat/completions");
        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!("API error {status}: {body}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::Synthesis(format!("invalid response: {e}")))?;
        parse_openai_response(&payload)
    }
}

/// Extract the answer text from a Gemini `generateContent` response:
/// all `candidates[0].content.parts[*].text` segments concatenated.
fn parse_gemini_response(payload: &Value) -> Result<String> {
    let parts = payload["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| Error::Synthesis("no candidates in response".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    Ok(text)
}

/// Extract the answer text from an OpenAI-compatible chat completion.
fn parse_openai_response(payload: &Value) -> Result<String> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Synthesis("no choices in response".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_gemini_response() {
        let payload = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Layla needs a suite " },
                        { "text": "for five nights." }
                    ]
                }
            }]
        });
        assert_eq!(
            parse_gemini_response(&payload).unwrap(),
            "Layla needs a suite for five nights."
        );
    }

    #[test]
    fn test_parse_gemini_empty_candidates_is_error() {
        let payload = json!({ "candidates": [] });
        assert!(parse_gemini_response(&payload).is_err());
    }

    #[test]
    fn test_parse_openai_response() {
        let payload = json!({
            "choices": [{ "message": { "role": "assistant", "content": "The answer." } }]
        });
        assert_eq!(parse_openai_response(&payload).unwrap(), "The answer.");
    }

    #[test]
    fn test_parse_openai_missing_content_is_error() {
        let payload = json!({ "choices": [] });
        assert!(parse_openai_response(&payload).is_err());
    }
}
