use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{DocbotError, DocbotResult};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory holding one subdirectory per knowledge space.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./db")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}
fn default_overlap() -> usize {
    400
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved to ground an answer.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dims")]
    pub dims: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dims: default_embedding_dims(),
            batch_size: default_batch_size(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_embedding_dims() -> usize {
    1536
}
fn default_batch_size() -> usize {
    64
}
fn default_embedding_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Models the user may select with `--model`.
    #[serde(default = "default_chat_models")]
    pub models: Vec<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            models: default_chat_models(),
            max_tokens: None,
            timeout_secs: default_chat_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_chat_models() -> Vec<String> {
    [
        "gpt-3.5-turbo",
        "gpt-4",
        "gpt-4-turbo",
        "gpt-4o-mini",
        "gpt-4o",
        "gpt-4.1-mini",
    ]
    .iter()
    .map(|m| m.to_string())
    .collect()
}

fn default_chat_timeout() -> u64 {
    120
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API, shared by the embedding and
    /// chat clients. A trailing slash or `/v1` suffix is tolerated.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

impl Config {
    /// Resolve the chat model for a command, honoring a `--model` override.
    /// The chosen model must be in the configured allow-list.
    pub fn resolve_model(&self, flag: Option<&str>) -> DocbotResult<String> {
        let model = flag.unwrap_or(&self.chat.model);
        if !self.chat.models.iter().any(|m| m == model) {
            return Err(DocbotError::Config(format!(
                "unknown chat model '{}'; configured models: {}",
                model,
                self.chat.models.join(", ")
            )));
        }
        Ok(model.to_string())
    }
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error: the built-in defaults apply, so the tool
/// works without any configuration. A present but unparsable or invalid
/// file is a configuration error.
pub fn load_config(path: &Path) -> DocbotResult<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            DocbotError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?
    } else {
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> DocbotResult<()> {
    if config.chunking.chunk_size == 0 {
        return Err(DocbotError::Config(
            "chunking.chunk_size must be > 0".to_string(),
        ));
    }
    if config.chunking.overlap >= config.chunking.chunk_size {
        return Err(DocbotError::Config(format!(
            "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
            config.chunking.overlap, config.chunking.chunk_size
        )));
    }
    if config.retrieval.top_k < 1 {
        return Err(DocbotError::Config(
            "retrieval.top_k must be >= 1".to_string(),
        ));
    }
    if config.embedding.model.is_empty() {
        return Err(DocbotError::Config(
            "embedding.model must not be empty".to_string(),
        ));
    }
    if config.embedding.dims == 0 {
        return Err(DocbotError::Config("embedding.dims must be > 0".to_string()));
    }
    if config.embedding.batch_size == 0 {
        return Err(DocbotError::Config(
            "embedding.batch_size must be >= 1".to_string(),
        ));
    }
    if config.chat.models.is_empty() {
        return Err(DocbotError::Config(
            "chat.models must list at least one model".to_string(),
        ));
    }
    if !config.chat.models.iter().any(|m| m == &config.chat.model) {
        return Err(DocbotError::Config(format!(
            "chat.model '{}' is not in chat.models",
            config.chat.model
        )));
    }
    if config.api.base_url.is_empty() {
        return Err(DocbotError::Config(
            "api.base_url must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Load a `.env` file if one exists (for development convenience).
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Read the provider API key from the environment.
///
/// Commands that call the embedding or chat API check this before doing any
/// other work; absence is fatal for them.
pub fn api_key() -> DocbotResult<String> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(DocbotError::MissingApiKey),
    }
}
