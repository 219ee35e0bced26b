//! GitHub API client.
//!
//! One struct covers all read operations the pipeline needs: repository
//! details, trees, file contents, languages, contributors, and commit stats,
//! plus the `get_repo_context` aggregate that tolerates partial failure.
//!
//! Responses for slowly-changing endpoints go through per-endpoint TTL
//! caches owned by the client. The wire is behind `GithubTransport`, so
//! tests script responses instead of hitting the network.

use secrecy::SecretString;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::cache::TtlCache;
use super::transport::{ApiResponse, GithubTransport, HttpTransport};
use super::types::{
    CommitStats, ContributorInfo, LanguageStat, RepoContext, RepoMetadata, RepoTree, RepoTreeItem,
    language_color,
};
use crate::config::GithubConfig;
use crate::constants::github::{CONTRIBUTOR_LIMIT, MAX_FILE_SIZE, cache as cache_tuning};
use crate::types::{GithubError, RenameTarget};

/// Accept header for JSON API responses
const ACCEPT_JSON: &str = "application/vnd.github+json";
/// Accept header that returns file bodies raw, skipping the base64 envelope
const ACCEPT_RAW: &str = "application/vnd.github.raw+json";

/// Key files fetched for analysis. These provide the most context for
/// understanding a codebase.
pub const KEY_FILES: &[&str] = &[
    // Documentation
    "README.md",
    "README",
    "readme.md",
    "CLAUDE.md",
    "claude.md",
    // Python
    "pyproject.toml",
    "setup.py",
    "requirements.txt",
    // JavaScript/TypeScript
    "package.json",
    "tsconfig.json",
    // Rust
    "Cargo.toml",
    // Go
    "go.mod",
    // Java/Kotlin
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    // Configuration
    ".env.example",
    "docker-compose.yml",
    "docker-compose.yaml",
    "Dockerfile",
    "fly.toml",
    "vercel.json",
    "netlify.toml",
    // CI/CD
    ".github/workflows/ci.yml",
    ".github/workflows/ci.yaml",
    ".github/workflows/main.yml",
    ".github/workflows/main.yaml",
];

static LINK_LAST_PAGE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"page=(\d+)>;\s*rel="last""#).expect("valid regex")
});

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Deserialize)]
struct RawLicense {
    spdx_id: Option<String>,
}

#[derive(Deserialize)]
struct RawRepo {
    id: u64,
    name: String,
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    pushed_at: Option<String>,
    #[serde(default)]
    license: Option<RawLicense>,
}

impl From<RawRepo> for RepoMetadata {
    fn from(raw: RawRepo) -> Self {
        Self {
            github_id: raw.id,
            name: raw.name,
            full_name: raw.full_name,
            description: raw.description,
            url: raw.html_url,
            default_branch: raw.default_branch.unwrap_or_else(|| "main".to_string()),
            is_private: raw.private,
            language: raw.language,
            stars_count: raw.stargazers_count,
            forks_count: raw.forks_count,
            open_issues_count: raw.open_issues_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            pushed_at: raw.pushed_at,
            license_name: raw.license.and_then(|l| l.spdx_id),
        }
    }
}

#[derive(Deserialize)]
struct RawTreeItem {
    path: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    size: Option<u64>,
    sha: String,
}

#[derive(Deserialize)]
struct RawTree {
    sha: String,
    #[serde(default)]
    tree: Vec<RawTreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct RawContributor {
    login: String,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    contributions: u64,
}

// =============================================================================
// Client
// =============================================================================

/// GitHub API client with per-endpoint caching
pub struct GithubClient {
    transport: Arc<dyn GithubTransport>,
    api_base: String,
    max_concurrent_fetches: usize,

    details_cache: TtlCache<RepoMetadata>,
    tree_cache: TtlCache<RepoTree>,
    languages_cache: TtlCache<Vec<LanguageStat>>,
    contributors_cache: TtlCache<Vec<ContributorInfo>>,
}

impl GithubClient {
    /// Create a client over the real HTTP transport. The token falls back
    /// to the GITHUB_TOKEN env var when the config carries none.
    pub fn new(config: &GithubConfig) -> Result<Self, GithubError> {
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .ok_or(GithubError::Auth)?;
        let transport = HttpTransport::new(SecretString::from(token), config.timeout_secs)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Create a client over an injected transport
    pub fn with_transport(transport: Arc<dyn GithubTransport>, config: &GithubConfig) -> Self {
        Self {
            transport,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            max_concurrent_fetches: config.max_concurrent_fetches,
            details_cache: TtlCache::new(
                "repo_details",
                cache_tuning::DETAILS_TTL,
                cache_tuning::DETAILS_MAX,
            ),
            tree_cache: TtlCache::new("tree", cache_tuning::TREE_TTL, cache_tuning::TREE_MAX),
            languages_cache: TtlCache::new(
                "languages",
                cache_tuning::LANGUAGES_TTL,
                cache_tuning::LANGUAGES_MAX,
            ),
            contributors_cache: TtlCache::new(
                "contributors",
                cache_tuning::CONTRIBUTORS_TTL,
                cache_tuning::CONTRIBUTORS_MAX,
            ),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Map a non-success response to a typed error
    fn error_for(&self, response: &ApiResponse, resource: &str) -> GithubError {
        match response.status {
            301 => GithubError::Renamed {
                target: parse_rename_target(response.headers.location.as_deref()),
            },
            401 => GithubError::Auth,
            404 => GithubError::not_found(resource),
            403 if response.headers.rate_limit_exhausted() => GithubError::RateLimit {
                reset: response.headers.rate_limit_reset,
            },
            403 => GithubError::Api {
                status: 403,
                message: "GitHub API forbidden".to_string(),
            },
            status => GithubError::Api {
                status,
                message: response
                    .text()
                    .unwrap_or_else(|| "unreadable response body".to_string()),
            },
        }
    }

    // =========================================================================
    // Repository Metadata
    // =========================================================================

    /// Fetch repository details. Cached for 10 minutes.
    pub async fn get_repo_details(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepoMetadata, GithubError> {
        let cache_key = format!("{}/{}", owner, repo);
        if let Some(cached) = self.details_cache.get(&cache_key) {
            return Ok(cached);
        }

        let response = self
            .transport
            .get(&self.url(&format!("/repos/{}/{}", owner, repo)), &[], ACCEPT_JSON)
            .await?;

        if !response.is_success() {
            return Err(self.error_for(&response, &cache_key));
        }

        let details: RepoMetadata = response.json::<RawRepo>()?.into();
        self.details_cache.insert(cache_key, details.clone());
        Ok(details)
    }

    /// Fetch repository details by immutable numeric id. Used to resolve
    /// the current owner/name after a rename or transfer.
    pub async fn get_repo_by_id(&self, repo_id: u64) -> Result<RepoMetadata, GithubError> {
        let response = self
            .transport
            .get(&self.url(&format!("/repositories/{}", repo_id)), &[], ACCEPT_JSON)
            .await?;

        if !response.is_success() {
            return Err(self.error_for(&response, &format!("repository id {}", repo_id)));
        }

        Ok(response.json::<RawRepo>()?.into())
    }

    /// One explicit follow-up lookup for a rename signal. Never loops: an
    /// unknown target yields `None`, and a second rename propagates as-is.
    pub async fn resolve_renamed(
        &self,
        target: &RenameTarget,
    ) -> Result<Option<RepoMetadata>, GithubError> {
        match target {
            RenameTarget::FullName { owner, repo } => {
                self.get_repo_details(owner, repo).await.map(Some)
            }
            RenameTarget::Id(id) => self.get_repo_by_id(*id).await.map(Some),
            RenameTarget::Unknown => Ok(None),
        }
    }

    // =========================================================================
    // Trees and Files
    // =========================================================================

    /// Fetch the complete file tree via the Git Trees API with recursive=1.
    /// Cached for 5 minutes.
    pub async fn get_repo_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<RepoTree, GithubError> {
        let cache_key = format!("{}/{}@{}", owner, repo, branch);
        if let Some(cached) = self.tree_cache.get(&cache_key) {
            return Ok(cached);
        }

        let response = self
            .transport
            .get(
                &self.url(&format!("/repos/{}/{}/git/trees/{}", owner, repo, branch)),
                &[("recursive", "1".to_string())],
                ACCEPT_JSON,
            )
            .await?;

        if !response.is_success() {
            return Err(self.error_for(&response, &format!("{}/{}", owner, repo)));
        }

        let raw: RawTree = response.json()?;

        let mut files = Vec::new();
        let mut directories = Vec::new();
        let mut all_items = Vec::with_capacity(raw.tree.len());
        for item in raw.tree {
            match item.item_type.as_str() {
                "blob" => files.push(item.path.clone()),
                "tree" => directories.push(item.path.clone()),
                _ => {}
            }
            all_items.push(RepoTreeItem {
                path: item.path,
                item_type: item.item_type,
                size: item.size,
                sha: item.sha,
            });
        }

        let tree = RepoTree {
            sha: raw.sha,
            files,
            directories,
            all_items,
            truncated: raw.truncated,
        };
        self.tree_cache.insert(cache_key, tree.clone());
        Ok(tree)
    }

    /// Fetch one file's content via the raw media type.
    ///
    /// Returns `None` when the path does not exist, is a directory or
    /// submodule, exceeds `max_size` bytes (`MAX_FILE_SIZE` when unset), or
    /// is not valid UTF-8. Other failures propagate as errors.
    pub async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
        max_size: Option<u64>,
    ) -> Result<Option<String>, GithubError> {
        let max_size = max_size.unwrap_or(MAX_FILE_SIZE);
        let response = self
            .transport
            .get(
                &self.url(&format!("/repos/{}/{}/contents/{}", owner, repo, path)),
                &[("ref", branch.to_string())],
                ACCEPT_RAW,
            )
            .await?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(self.error_for(&response, &format!("{}/{}", owner, repo)));
        }

        // Directories and submodules come back as a JSON listing instead of
        // raw bytes; the content type tells them apart.
        let is_raw = response
            .headers
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("vnd.github.raw"));
        if !is_raw {
            return Ok(None);
        }

        if response.body.len() as u64 > max_size {
            debug!(path, size = response.body.len(), "skipping oversize file");
            return Ok(None);
        }

        Ok(response.text())
    }

    /// Fetch contents of specific files, bounded by a semaphore.
    /// Missing, oversize, and binary files are simply absent from the
    /// result; per-file errors are dropped.
    pub async fn fetch_files_by_paths(
        &self,
        owner: &str,
        repo: &str,
        paths: &[String],
        branch: &str,
    ) -> HashMap<String, String> {
        if paths.is_empty() {
            return HashMap::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let fetches = paths.iter().map(|path| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return (path.clone(), None);
                };
                match self.get_file_content(owner, repo, path, branch, None).await {
                    Ok(content) => (path.clone(), content),
                    Err(e) => {
                        warn!(path = %path, error = %e, "file fetch failed");
                        (path.clone(), None)
                    }
                }
            }
        });

        futures::future::join_all(fetches)
            .await
            .into_iter()
            .filter_map(|(path, content)| content.map(|c| (path, c)))
            .collect()
    }

    /// Fetch contents of well-known key files. When a tree is provided,
    /// only paths present in it are requested.
    pub async fn get_key_files(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        tree: Option<&RepoTree>,
    ) -> HashMap<String, String> {
        let paths: Vec<String> = match tree {
            Some(tree) => {
                let existing: HashSet<&str> = tree.files.iter().map(String::as_str).collect();
                KEY_FILES
                    .iter()
                    .filter(|f| existing.contains(**f))
                    .map(|f| f.to_string())
                    .collect()
            }
            None => KEY_FILES.iter().map(|f| f.to_string()).collect(),
        };

        self.fetch_files_by_paths(owner, repo, &paths, branch).await
    }

    // =========================================================================
    // Languages, Contributors, Commits
    // =========================================================================

    /// Fetch language breakdown sorted by percentage descending.
    /// Cached for 1 hour.
    pub async fn get_repo_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<LanguageStat>, GithubError> {
        let cache_key = format!("{}/{}", owner, repo);
        if let Some(cached) = self.languages_cache.get(&cache_key) {
            return Ok(cached);
        }

        let response = self
            .transport
            .get(
                &self.url(&format!("/repos/{}/{}/languages", owner, repo)),
                &[],
                ACCEPT_JSON,
            )
            .await?;

        if !response.is_success() {
            return Err(self.error_for(&response, &cache_key));
        }

        let data: HashMap<String, u64> = response.json()?;
        let total_bytes: u64 = data.values().sum();
        if total_bytes == 0 {
            return Ok(Vec::new());
        }

        let mut languages: Vec<LanguageStat> = data
            .into_iter()
            .map(|(name, bytes)| {
                let percentage = (bytes as f64 / total_bytes as f64 * 1000.0).round() / 10.0;
                let color = language_color(&name).to_string();
                LanguageStat {
                    name,
                    bytes,
                    percentage,
                    color,
                }
            })
            .collect();
        languages.sort_by(|a, b| {
            b.percentage
                .partial_cmp(&a.percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        self.languages_cache.insert(cache_key, languages.clone());
        Ok(languages)
    }

    /// Fetch top contributors sorted by contributions descending.
    /// Cached for 1 hour. A 204 (empty repository) yields an empty list.
    pub async fn get_repo_contributors(
        &self,
        owner: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<ContributorInfo>, GithubError> {
        let cache_key = format!("{}/{}#{}", owner, repo, limit);
        if let Some(cached) = self.contributors_cache.get(&cache_key) {
            return Ok(cached);
        }

        let response = self
            .transport
            .get(
                &self.url(&format!("/repos/{}/{}/contributors", owner, repo)),
                &[
                    ("per_page", limit.to_string()),
                    ("anon", "false".to_string()),
                ],
                ACCEPT_JSON,
            )
            .await?;

        if response.status == 204 {
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(self.error_for(&response, &format!("{}/{}", owner, repo)));
        }

        let raw: Vec<RawContributor> = response.json()?;
        let contributors: Vec<ContributorInfo> = raw
            .into_iter()
            .take(limit)
            .map(|c| ContributorInfo {
                login: c.login,
                avatar_url: c.avatar_url,
                contributions: c.contributions,
            })
            .collect();

        self.contributors_cache.insert(cache_key, contributors.clone());
        Ok(contributors)
    }

    /// Derive commit statistics from the paginated commits endpoint.
    ///
    /// With one commit per page, the `rel="last"` page number equals the
    /// total commit count; no `rel="last"` means a single page. Any
    /// non-success response degrades to a zeroed result.
    pub async fn get_commit_stats(&self, owner: &str, repo: &str, branch: &str) -> CommitStats {
        let url = self.url(&format!("/repos/{}/{}/commits", owner, repo));
        let first_page = self
            .transport
            .get(
                &url,
                &[
                    ("sha", branch.to_string()),
                    ("per_page", "1".to_string()),
                ],
                ACCEPT_JSON,
            )
            .await;

        let response = match first_page {
            Ok(r) if r.is_success() => r,
            _ => return CommitStats::default(),
        };

        let commits: Vec<serde_json::Value> = match response.json() {
            Ok(c) => c,
            Err(_) => return CommitStats::default(),
        };
        let Some(first) = commits.first() else {
            return CommitStats::default();
        };

        let last_commit_date = commit_date(first);

        let total_commits = response
            .headers
            .link
            .as_deref()
            .and_then(|link| LINK_LAST_PAGE.captures(link))
            .and_then(|c| c[1].parse::<u64>().ok())
            .unwrap_or(1);

        let first_commit_date = if total_commits > 1 {
            let last_page = self
                .transport
                .get(
                    &url,
                    &[
                        ("sha", branch.to_string()),
                        ("per_page", "1".to_string()),
                        ("page", total_commits.to_string()),
                    ],
                    ACCEPT_JSON,
                )
                .await;
            match last_page {
                Ok(r) if r.is_success() => r
                    .json::<Vec<serde_json::Value>>()
                    .ok()
                    .and_then(|c| c.first().and_then(commit_date)),
                _ => None,
            }
        } else {
            last_commit_date.clone()
        };

        CommitStats {
            total_commits,
            first_commit_date,
            last_commit_date,
        }
    }

    // =========================================================================
    // Aggregate Context
    // =========================================================================

    /// Fetch the complete context for one repository.
    ///
    /// Each sub-fetch is independent: failures are recorded as strings in
    /// `RepoContext::errors` and never abort the aggregate. When no branch
    /// is given and details cannot be fetched, the branch falls back to
    /// `main`.
    pub async fn get_repo_context(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        description: Option<&str>,
    ) -> RepoContext {
        let mut context = RepoContext {
            owner: owner.to_string(),
            repo: repo.to_string(),
            full_name: format!("{}/{}", owner, repo),
            description: description.map(String::from),
            ..Default::default()
        };

        let mut branch = branch.map(String::from);

        match self.get_repo_details(owner, repo).await {
            Ok(details) => {
                if branch.is_none() {
                    branch = Some(details.default_branch.clone());
                }
                if context.description.is_none() {
                    context.description = details.description;
                }
                context.stars_count = details.stars_count;
                context.forks_count = details.forks_count;
                context.open_issues_count = details.open_issues_count;
                context.created_at = details.created_at;
                context.updated_at = details.updated_at;
                context.pushed_at = details.pushed_at;
                context.license_name = details.license_name;
            }
            Err(e) => {
                context.errors.push(format!("Failed to get repo details: {}", e));
            }
        }

        let branch = branch.unwrap_or_else(|| "main".to_string());
        context.default_branch = branch.clone();

        match self.get_repo_tree(owner, repo, &branch).await {
            Ok(tree) => {
                if tree.truncated {
                    context
                        .errors
                        .push("Repository tree was truncated (very large repo)".to_string());
                }
                context.tree = Some(tree);
            }
            Err(e) => {
                context.errors.push(format!("Failed to get repo tree: {}", e));
            }
        }

        context.files = self
            .get_key_files(owner, repo, &branch, context.tree.as_ref())
            .await;

        match self.get_repo_languages(owner, repo).await {
            Ok(languages) => context.languages = languages,
            Err(e) => {
                context.errors.push(format!("Failed to get languages: {}", e));
            }
        }

        match self.get_repo_contributors(owner, repo, CONTRIBUTOR_LIMIT).await {
            Ok(contributors) => context.contributors = contributors,
            Err(e) => {
                context
                    .errors
                    .push(format!("Failed to get contributors: {}", e));
            }
        }

        context.commit_stats = Some(self.get_commit_stats(owner, repo, &branch).await);

        context
    }
}

/// Extract the committer date from a commits-endpoint entry
fn commit_date(commit: &serde_json::Value) -> Option<String> {
    commit
        .pointer("/commit/committer/date")
        .and_then(|v| v.as_str())
        .map(String::from)
}

/// Parse the new repository identity out of a 301 Location header.
///
/// Renames redirect to either `/repos/{owner}/{repo}/...` or
/// `/repositories/{id}/...`.
fn parse_rename_target(location: Option<&str>) -> RenameTarget {
    let Some(location) = location else {
        return RenameTarget::Unknown;
    };

    let path = match url::Url::parse(location) {
        Ok(parsed) => parsed.path().to_string(),
        // relative redirect
        Err(_) => location.split('?').next().unwrap_or(location).to_string(),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["repos", owner, repo, ..] => RenameTarget::FullName {
            owner: (*owner).to_string(),
            repo: (*repo).to_string(),
        },
        ["repositories", id, ..] => id
            .parse::<u64>()
            .map(RenameTarget::Id)
            .unwrap_or(RenameTarget::Unknown),
        _ => RenameTarget::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename_target_full_name() {
        let target =
            parse_rename_target(Some("https://api.github.com/repos/new-owner/new-name"));
        assert_eq!(
            target,
            RenameTarget::FullName {
                owner: "new-owner".to_string(),
                repo: "new-name".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rename_target_repository_id() {
        let target = parse_rename_target(Some("https://api.github.com/repositories/12345"));
        assert_eq!(target, RenameTarget::Id(12345));
    }

    #[test]
    fn test_parse_rename_target_relative_and_unknown() {
        assert_eq!(
            parse_rename_target(Some("/repos/acme/widget/git/trees/main?recursive=1")),
            RenameTarget::FullName {
                owner: "acme".to_string(),
                repo: "widget".to_string(),
            }
        );
        assert_eq!(parse_rename_target(None), RenameTarget::Unknown);
        assert_eq!(
            parse_rename_target(Some("https://example.com/elsewhere")),
            RenameTarget::Unknown
        );
    }

    #[test]
    fn test_link_header_last_page_regex() {
        let link = r#"<https://api.github.com/repos/a/b/commits?per_page=1&page=2>; rel="next", <https://api.github.com/repos/a/b/commits?per_page=1&page=347>; rel="last""#;
        let total: u64 = LINK_LAST_PAGE
            .captures(link)
            .and_then(|c| c[1].parse().ok())
            .unwrap();
        assert_eq!(total, 347);
    }

    #[test]
    fn test_raw_repo_normalization_defaults() {
        let raw: RawRepo = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "widget",
            "full_name": "acme/widget",
            "html_url": "https://github.com/acme/widget"
        }))
        .unwrap();
        let details: RepoMetadata = raw.into();
        assert_eq!(details.default_branch, "main");
        assert_eq!(details.stars_count, 0);
        assert!(details.license_name.is_none());
    }

    #[test]
    fn test_raw_repo_license_spdx() {
        let raw: RawRepo = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "widget",
            "full_name": "acme/widget",
            "html_url": "https://github.com/acme/widget",
            "license": {"key": "mit", "spdx_id": "MIT"}
        }))
        .unwrap();
        let details: RepoMetadata = raw.into();
        assert_eq!(details.license_name.as_deref(), Some("MIT"));
    }

    #[tokio::test]
    async fn test_repo_context_accumulates_every_sub_fetch_failure() {
        struct DownTransport;

        #[async_trait::async_trait]
        impl GithubTransport for DownTransport {
            async fn get(
                &self,
                _url: &str,
                _query: &[(&str, String)],
                _accept: &str,
            ) -> Result<ApiResponse, GithubError> {
                Err(GithubError::Network("connection refused".to_string()))
            }
        }

        let client =
            GithubClient::with_transport(Arc::new(DownTransport), &GithubConfig::default());
        let context = client.get_repo_context("acme", "widget", None, None).await;

        assert_eq!(context.full_name, "acme/widget");
        // no details means the branch falls back to main
        assert_eq!(context.default_branch, "main");
        assert!(context.tree.is_none());
        assert!(context.files.is_empty());
        assert!(context.languages.is_empty());
        assert!(context.contributors.is_empty());
        assert_eq!(context.commit_stats, Some(CommitStats::default()));
        // details, tree, languages, contributors each recorded a failure
        assert_eq!(context.errors.len(), 4);
    }

    #[tokio::test]
    async fn test_file_content_respects_size_bound() {
        use crate::github::transport::ResponseHeaders;

        struct RawFileTransport;

        #[async_trait::async_trait]
        impl GithubTransport for RawFileTransport {
            async fn get(
                &self,
                _url: &str,
                _query: &[(&str, String)],
                _accept: &str,
            ) -> Result<ApiResponse, GithubError> {
                Ok(ApiResponse {
                    status: 200,
                    headers: ResponseHeaders {
                        content_type: Some("application/vnd.github.raw+json".to_string()),
                        ..Default::default()
                    },
                    body: b"0123456789".to_vec(),
                })
            }
        }

        let client =
            GithubClient::with_transport(Arc::new(RawFileTransport), &GithubConfig::default());

        let tight = client
            .get_file_content("acme", "widget", "big.bin", "main", Some(5))
            .await
            .unwrap();
        assert!(tight.is_none());

        let default_bound = client
            .get_file_content("acme", "widget", "big.bin", "main", None)
            .await
            .unwrap();
        assert_eq!(default_bound.as_deref(), Some("0123456789"));
    }
}
