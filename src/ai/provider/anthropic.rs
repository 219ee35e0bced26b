//! Anthropic API Provider
//!
//! LLM provider over the Anthropic Messages API. Supports free-text
//! completion and forced tool invocation via `tool_choice`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{LlmProvider, ProviderConfig, ToolSpec};
use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider with secure API key handling
pub struct AnthropicProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<&'a ToolSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    choice_type: &'a str,
    name: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse { name: String, input: Value },
    #[serde(other)]
    Other,
}

// =============================================================================
// Provider
// =============================================================================

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                LlmError::with_provider(
                    ErrorCategory::Auth,
                    "Anthropic API key not found. Set ANTHROPIC_API_KEY env var or provide in config",
                    "anthropic",
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = if config.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            config.timeout_secs
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                LlmError::with_provider(
                    ErrorCategory::Unknown,
                    format!("Failed to create HTTP client: {}", e),
                    "anthropic",
                )
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            client,
        })
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<MessagesResponse, LlmError> {
        let url = format!("{}/messages", self.api_base);

        debug!(model = %self.model, "Sending request to Anthropic API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_request_error(&e, "anthropic"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Anthropic API error");
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &body,
                "anthropic",
            ));
        }

        response.json().await.map_err(|e| {
            LlmError::with_provider(
                ErrorCategory::ParseError,
                format!("Failed to parse Anthropic response: {}", e),
                "anthropic",
            )
        })
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            tools: None,
            tool_choice: None,
        };

        let response = self.send(&request).await?;

        let text: String = response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(LlmError::with_provider(
                ErrorCategory::ParseError,
                "No text content in Anthropic response",
                "anthropic",
            ));
        }

        Ok(text)
    }

    async fn invoke_tool(
        &self,
        prompt: &str,
        tool: &ToolSpec,
        max_tokens: u32,
    ) -> Result<Value, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            tools: Some(vec![tool]),
            tool_choice: Some(ToolChoice {
                choice_type: "tool",
                name: &tool.name,
            }),
        };

        let response = self.send(&request).await?;

        response
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::ToolUse { name, input } if name == tool.name => Some(input),
                _ => None,
            })
            .ok_or_else(|| {
                LlmError::with_provider(
                    ErrorCategory::ParseError,
                    format!("Response did not invoke tool '{}'", tool.name),
                    "anthropic",
                )
            })
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
