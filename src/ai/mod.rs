//! AI provider abstraction and retry machinery.

pub mod provider;
pub mod retry;

pub use provider::{AnthropicProvider, LlmProvider, ProviderConfig, ToolSpec};
pub use retry::RetryPolicy;
