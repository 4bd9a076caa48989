//! `POST /chat/completions` in JSON-object mode.

use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;

/// Errors from the text-service layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OpenAI API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The completion had no message content.
    #[error("OpenAI response contained no content")]
    EmptyResponse,

    /// The content was not a JSON object.
    #[error("OpenAI response was not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Shared client for the text service.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Run a completion and return the model's JSON object.
    pub async fn complete_json(
        &self,
        messages: &[ChatMessage],
    ) -> Result<serde_json::Value, OpenAiError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        tracing::debug!(model = %self.config.model, "Chat completion received");
        extract_json(parsed)
    }
}

fn extract_json(response: ChatResponse) -> Result<serde_json::Value, OpenAiError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(OpenAiError::EmptyResponse)?;
    Ok(serde_json::from_str(&content)?)
}
