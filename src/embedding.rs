//! OpenAI embeddings client and vector helpers.
//!
//! [`EmbeddingClient`] turns texts into f32 vectors via the hosted
//! embeddings API (`POST /v1/embeddings`, Bearer auth, typed payloads).
//! Also provides the codec used to store vectors as SQLite BLOBs
//! ([`vec_to_blob`] / [`blob_to_vec`]) and [`cosine_similarity`] for
//! ranking.
//!
//! Failures surface immediately: a non-success status or transport error
//! becomes an Answering-class error for the caller to report. There is no
//! automatic retry; retrying is a user action.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::{DocbotError, DocbotResult};

/// Typed client for the embeddings endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    base_url: String,
    api_key: String,
    model: String,
    dims: usize,
    batch_size: usize,
    client: reqwest::Client,
}

impl EmbeddingClient {
    pub fn new(config: &Config, api_key: String) -> DocbotResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.embedding.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.api.base_url.clone(),
            api_key,
            model: config.embedding.model.clone(),
            dims: config.embedding.dims,
            batch_size: config.embedding.batch_size,
            client,
        })
    }

    /// Endpoint URL, tolerating a trailing slash or an existing `/v1`.
    fn embeddings_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/embeddings", base)
        } else {
            format!("{}/v1/embeddings", base)
        }
    }

    /// Embed every text, batching requests by the configured batch size.
    /// Returns one vector per input, in input order.
    pub async fn embed_all(&self, texts: &[String]) -> DocbotResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }

    /// Embed a single query text.
    pub async fn embed_query(&self, text: &str) -> DocbotResult<Vec<f32>> {
        let vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| DocbotError::Embedding("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> DocbotResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DocbotError::Embedding(format!("{}: {}", status, text)));
        }

        let payload: EmbedResponse = response.json().await?;
        let mut data = payload.data;
        // The API returns vectors in input order; the index field makes
        // that explicit.
        data.sort_by_key(|d| d.index);

        if data.len() != texts.len() {
            return Err(DocbotError::Embedding(format!(
                "expected {} vectors, got {}",
                texts.len(),
                data.len()
            )));
        }

        let mut vectors = Vec::with_capacity(data.len());
        for item in data {
            if item.embedding.len() != self.dims {
                return Err(DocbotError::EmbeddingDimMismatch {
                    expected: self.dims,
                    actual: item.embedding.len(),
                });
            }
            vectors.push(item.embedding);
        }
        Ok(vectors)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    index: usize,
    embedding: Vec<f32>,
}

/// Encode a float vector as a BLOB (little-endian f32 bytes).
///
/// Each `f32` is stored as 4 bytes in little-endian order, so the BLOB is
/// four times the vector length.
///
/// # Example
///
/// ```rust
/// use docbot::embedding::{vec_to_blob, blob_to_vec};
///
/// let v = vec![0.25f32, -8.0, 1e-3];
/// let blob = vec_to_blob(&v);
/// assert_eq!(blob.len(), v.len() * 4);
/// assert_eq!(blob_to_vec(&blob), v);
/// ```
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB produced by [`vec_to_blob`] back into a float vector.
/// Trailing bytes that do not fill a whole `f32` are dropped.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`; `0.0` for empty vectors or vectors of
/// different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
