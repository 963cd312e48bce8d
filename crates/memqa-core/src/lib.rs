//! MemQA Core — shared message type, error taxonomy, configuration.

pub mod config;
pub mod error;
pub mod message;

pub use config::{EmbeddingBackend, EmbeddingConfig, QaConfig};
pub use error::{Error, Result};
pub use message::Message;
