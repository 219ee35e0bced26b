//! Configuration loading and validation.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{Config, GithubConfig, LlmConfig, RetryConfig, SelectorConfig};
