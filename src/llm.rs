//! OpenAI-compatible chat completions client.
//!
//! [`ChatClient::complete`] posts a full message list and returns the
//! assistant's text. Conversation state lives in [`crate::session`]; this
//! module only speaks the wire format.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::{DocbotError, DocbotResult};

/// A single message in the chat payload.
///
/// `role` follows the wire format: `system`, `user` or `assistant`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

impl ApiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the Chat Completions API.
#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ApiMessage,
}

/// Typed client for the chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl ChatClient {
    /// Build a client for the given model. The model is passed in already
    /// resolved against the configured allow-list.
    pub fn new(config: &Config, api_key: String, model: String) -> DocbotResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.chat.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.api.base_url.clone(),
            api_key,
            model,
            max_tokens: config.chat.max_tokens,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint URL, tolerating a trailing slash or an existing `/v1`.
    fn chat_completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Send the message list and return the first choice's text.
    pub async fn complete(&self, messages: &[ApiMessage]) -> DocbotResult<String> {
        let body = ChatCompletionsRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.chat_completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DocbotError::Chat(format!("{}: {}", status, text)));
        }

        let payload: ChatCompletionsResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DocbotError::Chat("response contained no choices".to_string()))
    }
}
