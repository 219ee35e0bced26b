//! Unified Error Type System
//!
//! Centralized error types for the analysis pipeline.
//! Provides error classification for retry and degradation decisions.
//!
//! ## Error Categories
//!
//! - **Transient**: Temporary provider issues that may resolve (retry)
//! - **RateLimit**: API rate limiting (wait and retry)
//! - **Auth**: Authentication failures (fail fast)
//! - **Network**: Connectivity issues (retry with backoff)
//! - **BadRequest**: Malformed request (fail fast)
//!
//! ## Design Principles
//!
//! - One application error type (`RepoLensError`) with a `Result` alias
//! - Typed GitHub errors so callers can distinguish rename signals from
//!   plain failures
//! - Category-based retry predicate shared by every LLM-facing component

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for retry decisions on LLM-facing calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Parsing the LLM response failed - retry may yield valid output
    ParseError,
    /// Temporary server issues - retry
    Transient,
    /// Unknown error - don't retry
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth retrying without changing the request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Network | Self::Transient | Self::ParseError
        )
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM provider error with category and retry hints
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category for retry decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
    /// Suggested wait time before retry (if applicable)
    pub retry_after: Option<Duration>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
            retry_after: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
            retry_after: None,
        }
    }

    /// Add suggested retry delay
    pub fn retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

/// Classifier translating provider responses into categorized errors
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code from an LLM provider
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        match status {
            429 => LlmError::with_provider(ErrorCategory::RateLimit, message, provider)
                .retry_after(Duration::from_secs(30)),
            401 | 403 => LlmError::with_provider(ErrorCategory::Auth, message, provider),
            400 | 404 | 422 => {
                LlmError::with_provider(ErrorCategory::BadRequest, message, provider)
            }
            // 500 series are transient - can retry
            500 | 502 | 503 | 504 | 529 => {
                LlmError::with_provider(ErrorCategory::Transient, message, provider)
                    .retry_after(Duration::from_secs(5))
            }
            _ => LlmError::with_provider(ErrorCategory::Unknown, message, provider),
        }
    }

    /// Classify a transport-level request failure
    pub fn classify_request_error(err: &reqwest::Error, provider: &str) -> LlmError {
        if err.is_timeout() || err.is_connect() {
            LlmError::with_provider(ErrorCategory::Network, err.to_string(), provider)
                .retry_after(Duration::from_secs(5))
        } else if err.is_decode() {
            LlmError::with_provider(ErrorCategory::ParseError, err.to_string(), provider)
        } else {
            LlmError::with_provider(ErrorCategory::Unknown, err.to_string(), provider)
        }
    }
}

// =============================================================================
// GitHub Errors
// =============================================================================

/// New identity of a renamed or transferred repository, when resolvable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameTarget {
    /// Redirect location exposed the new owner/name pair
    FullName { owner: String, repo: String },
    /// Redirect only exposed the immutable numeric repository id
    Id(u64),
    /// Redirect carried no usable location
    Unknown,
}

impl std::fmt::Display for RenameTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullName { owner, repo } => write!(f, "{}/{}", owner, repo),
            Self::Id(id) => write!(f, "repository id {}", id),
            Self::Unknown => write!(f, "unknown target"),
        }
    }
}

/// Typed error from the GitHub API layer
#[derive(Debug, Clone, Error)]
pub enum GithubError {
    #[error("invalid or expired GitHub token")]
    Auth,

    #[error("repository or resource not found: {resource}")]
    NotFound { resource: String },

    #[error("GitHub API rate limit exceeded")]
    RateLimit {
        /// Unix timestamp when the limit resets, when the response exposed one
        reset: Option<i64>,
    },

    /// Repository was renamed or transferred upstream. Callers are expected
    /// to update persisted identifiers; the client never chases the redirect
    /// beyond one explicit follow-up lookup.
    #[error("repository has moved: {target}")]
    Renamed { target: RenameTarget },

    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GitHub request failed: {0}")]
    Network(String),

    #[error("failed to decode GitHub response: {0}")]
    Decode(String),
}

impl GithubError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum RepoLensError {
    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),

    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// Pipeline stage failure with context
    #[error("Pipeline error in stage {stage} ({stage_name}): {message}")]
    Pipeline {
        stage: u8,
        stage_name: String,
        message: String,
    },

    #[error("Progress sink error: {0}")]
    Progress(String),
}

impl From<LlmError> for RepoLensError {
    fn from(err: LlmError) -> Self {
        RepoLensError::Llm(err)
    }
}

impl RepoLensError {
    /// Create a pipeline error
    pub fn pipeline(stage: u8, stage_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            stage,
            stage_name: stage_name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoLensError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
        assert_eq!(ErrorCategory::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::RateLimit.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Transient.is_retryable());
        assert!(ErrorCategory::ParseError.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::BadRequest.is_retryable());
        assert!(!ErrorCategory::Unknown.is_retryable());
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "Rate limited", "anthropic");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);
        assert!(rate_limit.is_retryable());
        assert!(rate_limit.retry_after.is_some());

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "anthropic");
        assert_eq!(auth.category, ErrorCategory::Auth);
        assert!(!auth.is_retryable());

        let overloaded = ErrorClassifier::classify_http_status(529, "Overloaded", "anthropic");
        assert_eq!(overloaded.category, ErrorCategory::Transient);
        assert!(overloaded.is_retryable());
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "anthropic");
        assert_eq!(err.to_string(), "[anthropic:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_rename_target_display() {
        let full = RenameTarget::FullName {
            owner: "acme".to_string(),
            repo: "widget".to_string(),
        };
        assert_eq!(full.to_string(), "acme/widget");
        assert_eq!(RenameTarget::Id(42).to_string(), "repository id 42");
    }

    #[test]
    fn test_github_error_messages() {
        let err = GithubError::not_found("acme/widget");
        assert!(err.to_string().contains("acme/widget"));

        let rate = GithubError::RateLimit { reset: Some(1700000000) };
        assert!(rate.to_string().contains("rate limit"));
    }
}
