//! Error types for MemQA.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Semantic index is empty: no build has succeeded")]
    IndexEmpty,

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
