//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// GitHub client constants
pub mod github {
    /// REST API base URL
    pub const API_BASE: &str = "https://api.github.com";

    /// API version header value
    pub const API_VERSION: &str = "2022-11-28";

    /// Files larger than this (bytes) are skipped when fetching content
    pub const MAX_FILE_SIZE: u64 = 100_000;

    /// Concurrent file fetches per repository
    pub const MAX_CONCURRENT_FETCHES: usize = 5;

    /// Contributors kept per repository
    pub const CONTRIBUTOR_LIMIT: usize = 10;

    /// Request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Cache tuning per endpoint
    pub mod cache {
        use std::time::Duration;

        pub const DETAILS_TTL: Duration = Duration::from_secs(600);
        pub const DETAILS_MAX: usize = 200;

        pub const TREE_TTL: Duration = Duration::from_secs(300);
        pub const TREE_MAX: usize = 100;

        pub const LANGUAGES_TTL: Duration = Duration::from_secs(3600);
        pub const LANGUAGES_MAX: usize = 200;

        pub const CONTRIBUTORS_TTL: Duration = Duration::from_secs(3600);
        pub const CONTRIBUTORS_MAX: usize = 200;
    }
}

/// File selector constants
pub mod selector {
    /// Minimum files the selection should contain
    pub const MIN_SELECT: usize = 10;

    /// Maximum files kept in a selection
    pub const MAX_SELECT: usize = 50;

    /// Maximum tree entries sent to the model
    pub const MAX_TREE_FILES: usize = 1000;

    /// Token cap for selection responses
    pub const MAX_TOKENS: u32 = 2000;

    /// Maximum import-derived candidates added in refinement
    pub const MAX_REFINEMENT_CANDIDATES: usize = 30;
}

/// Retry schedule constants
pub mod retry {
    use std::time::Duration;

    /// Attempts per LLM call site
    pub const MAX_ATTEMPTS: usize = 3;

    /// Extractor/generator backoff base (2s, 4s, 8s)
    pub const EXTRACTOR_BASE_DELAY: Duration = Duration::from_secs(2);

    /// Selector backoff base (1s, 2s, 4s)
    pub const SELECTOR_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Exponential growth factor
    pub const FACTOR: f32 = 2.0;
}

/// Prompt assembly caps
pub mod prompt {
    /// Per-file character cap in architecture extraction prompts
    pub const ARCH_FILE_CAP: usize = 8000;

    /// Per-file character cap in content generation prompts
    pub const CONTENT_FILE_CAP: usize = 6000;

    /// README excerpt cap in selection prompts
    pub const README_CAP: usize = 3000;

    /// Items listed per architecture section before "...and N more"
    pub const SUMMARY_ITEM_CAP: usize = 5;

    /// Tagline length cap (characters)
    pub const ONE_LINER_MAX: usize = 150;

    /// Token cap for architecture extraction tool calls
    pub const ARCH_MAX_TOKENS: u32 = 8000;

    /// Token cap for content generation tool calls
    pub const CONTENT_MAX_TOKENS: u32 = 12_000;
}
