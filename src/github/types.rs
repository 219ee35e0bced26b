//! GitHub API data types.
//!
//! Normalized views over raw API payloads. Wire structs stay private to the
//! client; these are what the rest of the pipeline consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized repository metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// Immutable numeric id, stable across renames and transfers
    pub github_id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub default_branch: String,
    pub is_private: bool,
    pub language: Option<String>,
    pub stars_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    /// SPDX identifier, e.g. "MIT"
    pub license_name: Option<String>,
}

/// Single entry in a repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTreeItem {
    pub path: String,
    /// "blob" for files, "tree" for directories
    #[serde(rename = "type")]
    pub item_type: String,
    pub size: Option<u64>,
    pub sha: String,
}

/// Repository file tree structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoTree {
    pub sha: String,
    /// Blob paths only
    pub files: Vec<String>,
    /// Directory paths only
    pub directories: Vec<String>,
    pub all_items: Vec<RepoTreeItem>,
    /// True when GitHub truncated the recursive listing
    pub truncated: bool,
}

/// Language statistics for a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    pub bytes: u64,
    /// Share of this repository's bytes (0-100, one decimal)
    pub percentage: f64,
    /// Hex color for display
    pub color: String,
}

/// Contributor information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorInfo {
    pub login: String,
    pub avatar_url: Option<String>,
    /// Commit count on the default branch
    pub contributions: u64,
}

/// Commit statistics for a repository.
///
/// `total_commits` is derived from the `Link` pagination header with one
/// commit per page, so a missing `rel="last"` means a single-page history
/// and a total of 1. It is an approximation, not a commit walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    pub total_commits: u64,
    /// ISO 8601 committer date of the earliest commit
    pub first_commit_date: Option<String>,
    /// ISO 8601 committer date of the latest commit
    pub last_commit_date: Option<String>,
}

/// Aggregated context for one repository, the unit of analysis.
///
/// Sub-fetch failures land in `errors` as strings; the context itself is
/// always produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoContext {
    pub owner: String,
    pub repo: String,
    pub full_name: String,
    pub default_branch: String,
    pub description: Option<String>,
    pub tree: Option<RepoTree>,
    /// path -> decoded content
    pub files: HashMap<String, String>,
    pub languages: Vec<LanguageStat>,
    pub contributors: Vec<ContributorInfo>,
    pub errors: Vec<String>,

    pub stars_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub pushed_at: Option<String>,
    pub license_name: Option<String>,

    pub commit_stats: Option<CommitStats>,
}

impl RepoContext {
    /// File paths from the tree, empty when the tree fetch failed
    pub fn tree_files(&self) -> &[String] {
        self.tree.as_ref().map(|t| t.files.as_slice()).unwrap_or(&[])
    }
}

/// Standard GitHub language color (subset of most common), used for
/// visualization in the language breakdown
pub fn language_color(name: &str) -> &'static str {
    match name {
        "Python" => "#3572A5",
        "JavaScript" => "#f1e05a",
        "TypeScript" => "#3178c6",
        "Java" => "#b07219",
        "C++" => "#f34b7d",
        "C" => "#555555",
        "C#" => "#178600",
        "Go" => "#00ADD8",
        "Rust" => "#dea584",
        "Ruby" => "#701516",
        "PHP" => "#4F5D95",
        "Swift" => "#F05138",
        "Kotlin" => "#A97BFF",
        "Scala" => "#c22d40",
        "Shell" => "#89e051",
        "HTML" => "#e34c26",
        "CSS" => "#563d7c",
        "SCSS" => "#c6538c",
        "Vue" => "#41b883",
        "Svelte" => "#ff3e00",
        "Dockerfile" => "#384d54",
        "Makefile" => "#427819",
        "SQL" => "#e38c00",
        "R" => "#198CE7",
        "Jupyter Notebook" => "#DA5B0B",
        "Markdown" => "#083fa1",
        "YAML" => "#cb171e",
        "JSON" => "#292929",
        "TOML" => "#9c4221",
        _ => "#8b8b8b",
    }
}
