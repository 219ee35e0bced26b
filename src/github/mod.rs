//! GitHub API integration: transport seam, TTL caches, typed client.

pub mod cache;
pub mod client;
pub mod transport;
pub mod types;

pub use cache::TtlCache;
pub use client::{GithubClient, KEY_FILES};
pub use transport::{ApiResponse, GithubTransport, HttpTransport, ResponseHeaders};
pub use types::{
    CommitStats, ContributorInfo, LanguageStat, RepoContext, RepoMetadata, RepoTree, RepoTreeItem,
    language_color,
};
