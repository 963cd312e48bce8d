//! Response-shape tests — validates that the HTTP surface matches what
//! API clients of the original deployment expect.
//!
//! These assert on the JSON shapes directly; handler behavior is covered
//! by in-crate router tests.

/// `GET /` status response:
/// { status, message, indexed_messages, embedding_dimension }
#[test]
fn test_status_response_shape() {
    let status = serde_json::json!({
        "status": "online",
        "message": "Member Q&A System is running.",
        "indexed_messages": 3312,
        "embedding_dimension": 384,
    });

    assert!(status["status"].is_string());
    assert!(status["message"].is_string());
    assert!(status["indexed_messages"].is_number());
    assert!(status["embedding_dimension"].is_number());
}

/// `POST /ask` request: { question, top_k? }
#[test]
fn test_ask_request_shape() {
    let minimal = serde_json::json!({ "question": "When is Layla planning her trip to London?" });
    assert!(minimal["question"].is_string());
    assert!(minimal.get("top_k").is_none());

    let with_k = serde_json::json!({ "question": "Who likes steakhouses?", "top_k": 5 });
    assert!(with_k["top_k"].is_number());
}

/// `POST /ask` response: { answer, context?: [{ id, user_name, message, score }] }
#[test]
fn test_ask_response_shape() {
    let response = serde_json::json!({
        "answer": "Based on the messages, Layla needs a suite for five nights...",
        "context": [
            {
                "id": "17",
                "user_name": "Layla",
                "message": "I need a suite for five nights",
                "score": 0.82,
            }
        ],
    });

    assert!(response["answer"].is_string());
    let context = response["context"].as_array().unwrap();
    assert!(context[0]["id"].is_string());
    assert!(context[0]["user_name"].is_string());
    assert!(context[0]["message"].is_string());
    assert!(context[0]["score"].is_number());
}

/// `POST /index/refresh` response: { status, indexed_messages }
#[test]
fn test_refresh_response_shape() {
    let response = serde_json::json!({
        "status": "rebuilt",
        "indexed_messages": 3312,
    });

    assert!(response["status"].is_string());
    assert!(response["indexed_messages"].is_number());
}

/// Error responses carry a single string field: { error }
#[test]
fn test_error_response_shape() {
    let error = serde_json::json!({
        "error": "Semantic index is empty: no build has succeeded",
    });
    assert!(error["error"].is_string());
}
