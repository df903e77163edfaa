//! Crate-wide error type.
//!
//! Variants group into the four classes callers act on: unreadable
//! documents (skippable per file during ingest), storage failures,
//! answering failures (embedding/chat/transport), and configuration
//! problems (fatal before any work starts).

#[derive(Debug, thiserror::Error)]
pub enum DocbotError {
    /// Malformed or unreadable uploaded document. User-correctable;
    /// ingest reports it inline and moves on to the next file.
    #[error("unreadable document '{name}': {reason}")]
    Format { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("embedding request failed: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimMismatch { expected: usize, actual: usize },

    #[error("chat request failed: {0}")]
    Chat(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OPENAI_API_KEY is not set (export it or put it in a .env file)")]
    MissingApiKey,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type DocbotResult<T> = Result<T, DocbotError>;
