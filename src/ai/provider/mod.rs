//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait with two calling conventions:
//!
//! - `complete`: free-text completion, used by the file selector where the
//!   response is a JSON array embedded in text
//! - `invoke_tool`: forced single-tool invocation returning the tool input
//!   payload, used by the architecture extractor and content generator where
//!   the output must match a schema
//!
//! Errors are always `LlmError` so call sites share one retry predicate.

mod anthropic;

pub use anthropic::AnthropicProvider;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Tool Specification
// =============================================================================

/// Tool definition for forced tool calls.
///
/// `input_schema` is a JSON Schema object; the provider forces the model to
/// invoke exactly this tool and returns its input payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Provider construction parameters
#[derive(Clone, Default)]
pub struct ProviderConfig {
    /// API key; providers fall back to their conventional env var when unset
    pub api_key: Option<String>,
    /// API base URL override
    pub api_base: Option<String>,
    /// Model identifier override
    pub model: Option<String>,
    /// Request timeout (seconds); 0 means provider default
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl From<&crate::config::LlmConfig> for ProviderConfig {
    fn from(config: &crate::config::LlmConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: Some(config.model.clone()),
            timeout_secs: config.timeout_secs,
        }
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// LLM provider interface
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Free-text completion
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;

    /// Forced invocation of a single tool; returns the tool's input payload.
    /// A response that does not invoke the tool is a `ParseError`.
    async fn invoke_tool(
        &self,
        prompt: &str,
        tool: &ToolSpec,
        max_tokens: u32,
    ) -> Result<Value, LlmError>;

    /// Provider name for logging and error context
    fn name(&self) -> &str;

    /// Model identifier, stamped onto generated overviews
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_config_debug_redacts_key() {
        let config = ProviderConfig {
            api_key: Some("sk-secret-value".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_tool_spec_serializes() {
        let tool = ToolSpec::new(
            "save_architecture",
            "Save extracted architecture",
            json!({"type": "object", "properties": {}}),
        );
        let v = serde_json::to_value(&tool).unwrap();
        assert_eq!(v["name"], "save_architecture");
        assert!(v["input_schema"].is_object());
    }
}
