//! Stats Extractor
//!
//! Aggregates factual statistics from fetched repository contexts into one
//! `OverviewStats`. Pure: no LLM involvement, no network, fully recomputed
//! on every run. Repeated identical contexts sum twice - deduplication is
//! the caller's concern.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::github::RepoContext;
use crate::types::{ContributorStat, LanguageShare, OverviewStats};

/// Parse an ISO 8601 timestamp, tolerating both `Z` and offset suffixes.
/// Unparseable values are treated as absent.
fn parse_iso_date(date_str: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = date_str?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format as an ISO date (YYYY-MM-DD)
fn format_date_iso(dt: Option<DateTime<Utc>>) -> Option<String> {
    dt.map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Format as human-readable relative time ("3 days ago")
fn format_relative_time(dt: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<String> {
    let dt = dt?;
    let seconds = (now - dt).num_seconds();
    if seconds < 60 {
        return Some("just now".to_string());
    }

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {} ago", unit)
        } else {
            format!("{} {}s ago", n, unit)
        }
    };

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    Some(if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else if days < 28 {
        plural(days / 7, "week")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        plural(days / 365, "year")
    })
}

/// Estimate lines of code across fetched file contents.
///
/// Based on key files only; fetching every file for an exact count would
/// be prohibitively expensive.
pub fn calculate_lines_of_code(files: &HashMap<String, String>) -> u64 {
    files
        .values()
        .filter(|content| !content.is_empty())
        .map(|content| content.matches('\n').count() as u64 + 1)
        .sum()
}

/// Extract factual statistics from GitHub data
#[derive(Debug, Default, Clone, Copy)]
pub struct StatsExtractor;

impl StatsExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate statistics from multiple repositories
    pub fn extract_stats(&self, repo_contexts: &[RepoContext]) -> OverviewStats {
        self.extract_stats_at(repo_contexts, Utc::now())
    }

    /// Aggregation with an explicit "now" for relative-time formatting
    pub fn extract_stats_at(
        &self,
        repo_contexts: &[RepoContext],
        now: DateTime<Utc>,
    ) -> OverviewStats {
        if repo_contexts.is_empty() {
            return OverviewStats::default();
        }

        let total_stars: u64 = repo_contexts.iter().map(|c| c.stars_count).sum();
        let total_forks: u64 = repo_contexts.iter().map(|c| c.forks_count).sum();
        let total_open_issues: u64 = repo_contexts.iter().map(|c| c.open_issues_count).sum();

        let earliest_created = repo_contexts
            .iter()
            .filter_map(|c| parse_iso_date(c.created_at.as_deref()))
            .min();
        let latest_pushed = repo_contexts
            .iter()
            .filter_map(|c| parse_iso_date(c.pushed_at.as_deref()))
            .max();

        let mut total_commits: u64 = 0;
        let mut first_commit_dates = Vec::new();
        let mut last_commit_dates = Vec::new();
        for ctx in repo_contexts {
            if let Some(stats) = &ctx.commit_stats {
                total_commits += stats.total_commits;
                if let Some(dt) = parse_iso_date(stats.first_commit_date.as_deref()) {
                    first_commit_dates.push(dt);
                }
                if let Some(dt) = parse_iso_date(stats.last_commit_date.as_deref()) {
                    last_commit_dates.push(dt);
                }
            }
        }
        let earliest_first_commit = first_commit_dates.into_iter().min();
        let latest_last_commit = last_commit_dates.into_iter().max();

        let total_files: u64 = repo_contexts
            .iter()
            .map(|c| c.tree_files().len() as u64)
            .sum();
        let total_loc: u64 = repo_contexts
            .iter()
            .map(|c| calculate_lines_of_code(&c.files))
            .sum();

        // first repository that carries a license wins
        let license = repo_contexts
            .iter()
            .find_map(|c| c.license_name.clone());
        let default_branch = repo_contexts
            .first()
            .map(|c| c.default_branch.clone())
            .filter(|b| !b.is_empty());

        let contributors = merge_contributors(repo_contexts);
        let contributor_count = contributors.len();
        let top_contributors: Vec<ContributorStat> =
            contributors.into_iter().take(10).collect();

        let languages = merge_languages(repo_contexts);

        OverviewStats {
            project_created: format_date_iso(earliest_created),
            first_commit: format_date_iso(earliest_first_commit),
            last_commit: format_date_iso(latest_last_commit),
            last_activity: format_relative_time(latest_pushed, now),
            total_lines_of_code: (total_loc > 0).then_some(total_loc),
            total_files: (total_files > 0).then_some(total_files),
            total_commits: (total_commits > 0).then_some(total_commits),
            repo_count: repo_contexts.len(),
            default_branch,
            license,
            open_issues: (total_open_issues > 0).then_some(total_open_issues),
            stars: total_stars,
            forks: total_forks,
            // not fetched per-repo; watch counts mirror stars on GitHub
            watchers: 0,
            contributor_count,
            top_contributors,
            languages,
        }
    }
}

/// Merge contributors by login: commit counts summed, first avatar kept,
/// sorted by commits descending.
fn merge_contributors(repo_contexts: &[RepoContext]) -> Vec<ContributorStat> {
    let mut merged: HashMap<&str, ContributorStat> = HashMap::new();

    for ctx in repo_contexts {
        for contrib in &ctx.contributors {
            match merged.get_mut(contrib.login.as_str()) {
                Some(existing) => {
                    existing.commits += contrib.contributions;
                    if existing.avatar.is_none() {
                        existing.avatar = contrib.avatar_url.clone();
                    }
                }
                None => {
                    merged.insert(
                        contrib.login.as_str(),
                        ContributorStat {
                            name: contrib.login.clone(),
                            commits: contrib.contributions,
                            avatar: contrib.avatar_url.clone(),
                        },
                    );
                }
            }
        }
    }

    let mut contributors: Vec<ContributorStat> = merged.into_values().collect();
    contributors.sort_by(|a, b| b.commits.cmp(&a.commits).then(a.name.cmp(&b.name)));
    contributors
}

/// Merge languages by name: bytes summed, percentages recomputed against
/// the merged total, sorted by percentage descending.
fn merge_languages(repo_contexts: &[RepoContext]) -> Vec<LanguageShare> {
    let mut bytes_by_name: HashMap<&str, u64> = HashMap::new();
    let mut color_by_name: HashMap<&str, &str> = HashMap::new();

    for ctx in repo_contexts {
        for lang in &ctx.languages {
            *bytes_by_name.entry(lang.name.as_str()).or_insert(0) += lang.bytes;
            color_by_name
                .entry(lang.name.as_str())
                .or_insert(lang.color.as_str());
        }
    }

    let total_bytes: u64 = bytes_by_name.values().sum();
    if total_bytes == 0 {
        return Vec::new();
    }

    let mut languages: Vec<LanguageShare> = bytes_by_name
        .into_iter()
        .map(|(name, bytes)| LanguageShare {
            name: name.to_string(),
            percentage: (bytes as f64 / total_bytes as f64 * 1000.0).round() / 10.0,
            color: color_by_name
                .get(name)
                .copied()
                .unwrap_or("#8b8b8b")
                .to_string(),
        })
        .collect();

    languages.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    languages
}
