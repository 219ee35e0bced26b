//! Configuration Types
//!
//! All configuration structures with sensible defaults. API credentials are
//! plain optional strings here; they are wrapped into `SecretString` by the
//! components that hold them, and env fallbacks apply at construction time.

use serde::{Deserialize, Serialize};

use crate::constants::{retry, selector};
use crate::types::{RepoLensError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API settings
    pub github: GithubConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// File selector tuning
    pub selector: SelectorConfig,

    /// Retry behavior for LLM call sites
    pub retry: RetryConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `RepoLensError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.github.max_concurrent_fetches == 0 {
            return Err(RepoLensError::Config(
                "github.max_concurrent_fetches must be greater than 0".to_string(),
            ));
        }

        if self.selector.min_select == 0 {
            return Err(RepoLensError::Config(
                "selector.min_select must be greater than 0".to_string(),
            ));
        }

        if self.selector.max_select < self.selector.min_select {
            return Err(RepoLensError::Config(format!(
                "selector.max_select ({}) must be >= selector.min_select ({})",
                self.selector.max_select, self.selector.min_select
            )));
        }

        if self.retry.max_attempts == 0 {
            return Err(RepoLensError::Config(
                "retry.max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// GitHub Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token. Falls back to GITHUB_TOKEN env var when unset.
    pub token: Option<String>,

    /// API base URL, overridable for GitHub Enterprise
    pub api_base: String,

    /// Concurrent file fetches per repository
    pub max_concurrent_fetches: usize,

    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: crate::constants::github::API_BASE.to_string(),
            max_concurrent_fetches: crate::constants::github::MAX_CONCURRENT_FETCHES,
            timeout_secs: crate::constants::github::REQUEST_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key. Falls back to ANTHROPIC_API_KEY env var when unset.
    pub api_key: Option<String>,

    /// API base URL
    pub api_base: Option<String>,

    /// Model identifier
    pub model: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: "claude-sonnet-4-20250514".to_string(),
            timeout_secs: 120,
        }
    }
}

// =============================================================================
// Selector Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Minimum files the selection should contain
    pub min_select: usize,

    /// Maximum files kept in a selection
    pub max_select: usize,

    /// Maximum tree entries sent to the model
    pub max_tree_files: usize,

    /// AI selections below this count are supplemented with heuristic
    /// fallback results. Defaults to `min_select / 2` when unset.
    pub fallback_supplement_threshold: Option<usize>,
}

impl SelectorConfig {
    pub fn supplement_threshold(&self) -> usize {
        self.fallback_supplement_threshold
            .unwrap_or(self.min_select / 2)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_select: selector::MIN_SELECT,
            max_select: selector::MAX_SELECT,
            max_tree_files: selector::MAX_TREE_FILES,
            fallback_supplement_threshold: None,
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per LLM call site
    pub max_attempts: usize,

    /// Extractor/generator backoff base (seconds)
    pub extractor_base_delay_secs: u64,

    /// Selector backoff base (seconds)
    pub selector_base_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            extractor_base_delay_secs: retry::EXTRACTOR_BASE_DELAY.as_secs(),
            selector_base_delay_secs: retry::SELECTOR_BASE_DELAY.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_selector_bounds() {
        let mut config = Config::default();
        config.selector.min_select = 40;
        config.selector.max_select = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.github.max_concurrent_fetches = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_supplement_threshold_defaults_to_half_min() {
        let selector = SelectorConfig::default();
        assert_eq!(selector.supplement_threshold(), selector.min_select / 2);

        let tuned = SelectorConfig {
            fallback_supplement_threshold: Some(8),
            ..Default::default()
        };
        assert_eq!(tuned.supplement_threshold(), 8);
    }
}
