//! MemQA Corpus — one-shot fetch of the member message corpus.
//!
//! The upstream API serves the full (already deduplicated) batch in a
//! single `GET /messages?limit=N` call returning `{ "items": [...] }`.
//! The service never polls or subscribes; it fetches once at startup and
//! again only on an explicit index refresh.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use memqa_core::{Error, Message, Result};

#[derive(Debug, Deserialize)]
struct MessagesPage {
    #[serde(default)]
    items: Vec<Value>,
}

pub struct CorpusClient {
    client: reqwest::Client,
    base_url: String,
    fetch_limit: usize,
}

impl CorpusClient {
    pub fn new(base_url: impl Into<String>, fetch_limit: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Corpus(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            fetch_limit,
        })
    }

    /// Fetch the full corpus. Records missing a body or author name are
    /// skipped with a warning; everything else maps to `Message`.
    pub async fn fetch_all(&self) -> Result<Vec<Message>> {
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));
        info!(%url, limit = self.fetch_limit, "Fetching member messages");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.fetch_limit)])
            .send()
            .await
            .map_err(|e| Error::Corpus(format!("fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Corpus(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        let page: MessagesPage = response
            .json()
            .await
            .map_err(|e| Error::Corpus(format!("invalid response body: {e}")))?;

        let total = page.items.len();
        let messages: Vec<Message> = page
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| message_from_item(i, item))
            .collect();

        if messages.len() < total {
            warn!(
                skipped = total - messages.len(),
                "Skipped malformed corpus records"
            );
        }
        info!(count = messages.len(), "Corpus fetched");

        Ok(messages)
    }
}

/// Map one upstream record to a `Message`.
///
/// Body and author name are required (records without them are dropped,
/// matching the upstream's own contract). The id may arrive as a string
/// or a number; a record with neither gets a position-derived id so the
/// index invariant of one unique id per message still holds.
fn message_from_item(position: usize, item: &Value) -> Option<Message> {
    let body = item.get("message")?.as_str()?;
    let user_name = item.get("user_name")?.as_str()?;

    let id = match item.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("corpus-{position}"),
    };

    Some(Message {
        id,
        user_id: item
            .get("user_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        user_name: user_name.to_string(),
        timestamp: item
            .get("timestamp")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        message: body.to_string(),
    })
}
