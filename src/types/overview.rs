//! Product Overview Types
//!
//! The structured output of a full analysis run. `ProductOverview` is the
//! one value that crosses the core boundary: the caller persists it and
//! handles status transitions; the pipeline's responsibility ends when the
//! value is returned.
//!
//! All stats fields that may lack underlying data are `Option` - an absent
//! value means "no data", while counts that are naturally zero-valid
//! (stars, forks) default to 0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Stats
// =============================================================================

/// Programming language share after cross-repository merging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    /// Language name, e.g. "TypeScript"
    pub name: String,
    /// Percentage of merged codebase (0-100), recomputed against the
    /// merged byte total
    pub percentage: f64,
    /// Hex color for visualization
    pub color: String,
}

/// Contributor after cross-repository merging by login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorStat {
    /// GitHub login
    pub name: String,
    /// Commit count summed across repositories
    pub commits: u64,
    /// Avatar URL, first one seen for this login
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Cross-repository statistics aggregate.
///
/// Derived purely from fetched `RepoContext`s; recomputed fully on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewStats {
    // Timeline
    /// ISO date (YYYY-MM-DD) of the earliest repository creation
    pub project_created: Option<String>,
    /// ISO date of the earliest first commit
    pub first_commit: Option<String>,
    /// ISO date of the latest commit
    pub last_commit: Option<String>,
    /// Human-readable relative time of the most recent push
    pub last_activity: Option<String>,

    // Code metrics
    /// Estimated LOC across fetched files (key files only)
    pub total_lines_of_code: Option<u64>,
    /// Total file count across repository trees
    pub total_files: Option<u64>,
    /// Total commit count (pagination-derived approximation)
    pub total_commits: Option<u64>,

    // Repository info
    /// Number of linked repositories analyzed
    pub repo_count: usize,
    /// Primary branch of the first repository
    pub default_branch: Option<String>,
    /// SPDX license identifier from the first repository that has one
    pub license: Option<String>,
    /// Open issue count summed across repositories
    pub open_issues: Option<u64>,

    // GitHub social metrics
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,

    // People
    /// Number of unique contributors across repositories
    pub contributor_count: usize,
    /// Top contributors by merged commit count
    pub top_contributors: Vec<ContributorStat>,

    // Languages
    /// Merged language breakdown, sorted by percentage descending
    pub languages: Vec<LanguageShare>,
}

// =============================================================================
// Architecture
// =============================================================================

/// API endpoint found in the analyzed code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    /// HTTP method: GET, POST, PUT, PATCH, DELETE
    pub method: String,
    /// Route path, e.g. "/api/v1/products"
    pub path: String,
    pub description: String,
}

/// Database model/entity definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseModel {
    pub name: String,
    /// Key field names
    pub fields: Vec<String>,
}

/// Backend service or module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub description: String,
}

/// Frontend page/route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendPage {
    pub path: String,
    pub name: String,
    pub description: String,
}

/// Structured architecture extracted from the filtered file set.
///
/// Each list may be empty when no files matched or the model found nothing -
/// entries are never fabricated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverviewArchitecture {
    pub api_endpoints: Vec<ApiEndpoint>,
    pub database_models: Vec<DatabaseModel>,
    pub services: Vec<ServiceInfo>,
    pub frontend_pages: Vec<FrontendPage>,
}

impl OverviewArchitecture {
    pub fn is_empty(&self) -> bool {
        self.api_endpoints.is_empty()
            && self.database_models.is_empty()
            && self.services.is_empty()
            && self.frontend_pages.is_empty()
    }
}

// =============================================================================
// Content
// =============================================================================

/// Project activity status inferred by the content generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Maintenance,
    Archived,
    Deprecated,
}

impl ProjectStatus {
    /// Parse the status enum from a tool payload, falling back to `Active`
    /// for unknown values.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "maintenance" => Self::Maintenance,
            "archived" => Self::Archived,
            "deprecated" => Self::Deprecated,
            _ => Self::Active,
        }
    }
}

/// Generated prose fields, before assembly into the final overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResult {
    /// Single tagline sentence, length-capped
    pub one_liner: String,
    /// Multi-paragraph markdown introduction
    pub introduction: String,
    pub status: ProjectStatus,
    pub technical_content: String,
    pub business_content: String,
    pub features_content: String,
    pub use_cases_content: String,
}

/// High-level project summary section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSummary {
    pub one_liner: String,
    pub introduction: String,
    pub status: ProjectStatus,
}

// =============================================================================
// ProductOverview
// =============================================================================

/// Complete analysis output: generated prose, merged stats, and extracted
/// architecture, stamped with completion time and generator model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOverview {
    pub summary: OverviewSummary,
    pub stats: OverviewStats,

    // Deep dive content (markdown)
    pub technical_content: String,
    pub business_content: String,
    pub features_content: String,
    pub use_cases_content: String,

    pub architecture: OverviewArchitecture,

    // Metadata
    pub analyzed_at: DateTime<Utc>,
    pub analyzer_model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_parse() {
        assert_eq!(ProjectStatus::parse_or_default("archived"), ProjectStatus::Archived);
        assert_eq!(ProjectStatus::parse_or_default("maintenance"), ProjectStatus::Maintenance);
        assert_eq!(ProjectStatus::parse_or_default("bogus"), ProjectStatus::Active);
    }

    #[test]
    fn test_project_status_serde_lowercase() {
        let json = serde_json::to_string(&ProjectStatus::Deprecated).unwrap();
        assert_eq!(json, "\"deprecated\"");
        let back: ProjectStatus = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(back, ProjectStatus::Maintenance);
    }

    #[test]
    fn test_architecture_is_empty() {
        let arch = OverviewArchitecture::default();
        assert!(arch.is_empty());

        let arch = OverviewArchitecture {
            services: vec![ServiceInfo {
                name: "AuthService".to_string(),
                description: "session handling".to_string(),
            }],
            ..Default::default()
        };
        assert!(!arch.is_empty());
    }

    #[test]
    fn test_overview_stats_defaults() {
        let stats = OverviewStats::default();
        assert_eq!(stats.repo_count, 0);
        assert_eq!(stats.stars, 0);
        assert!(stats.total_commits.is_none());
        assert!(stats.languages.is_empty());
    }
}
