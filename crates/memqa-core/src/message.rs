//! The member message record indexed and retrieved by the service.

use serde::{Deserialize, Serialize};

/// A single member message from the upstream data API.
///
/// Immutable after ingestion. The timestamp is kept as the ISO-8601 string
/// the upstream sends; it is not parsed or validated (it may lie in the past
/// or future relative to ingestion time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier across the corpus.
    pub id: String,
    /// Author identifier.
    #[serde(default)]
    pub user_id: String,
    /// Author display name.
    pub user_name: String,
    /// ISO-8601 timestamp string, unvalidated.
    #[serde(default)]
    pub timestamp: String,
    /// Free-text body.
    pub message: String,
}

impl Message {
    /// The text that gets embedded for this message.
    ///
    /// Prefixing the author name helps the embedding model associate
    /// statements with who made them ("Layla: I need a suite...").
    pub fn indexable_text(&self) -> String {
        format!("{}: {}", self.user_name, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexable_text_includes_author() {
        let msg = Message {
            id: "m1".into(),
            user_id: "u1".into(),
            user_name: "Layla".into(),
            timestamp: "2025-03-01T10:00:00Z".into(),
            message: "I need a suite for five nights".into(),
        };
        assert_eq!(msg.indexable_text(), "Layla: I need a suite for five nights");
    }

    #[test]
    fn test_deserialize_upstream_shape() {
        let json = serde_json::json!({
            "id": "42",
            "user_id": "u7",
            "user_name": "Amira",
            "timestamp": "2025-05-12T19:30:00Z",
            "message": "Book a car for tonight"
        });
        let msg: Message = serde_json::from_value(json).unwrap();
        assert_eq!(msg.id, "42");
        assert_eq!(msg.user_name, "Amira");
    }
}
