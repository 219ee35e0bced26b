//! Core type definitions shared across the pipeline.

pub mod error;
pub mod overview;
pub mod product;
pub mod progress;
pub mod utils;

pub use error::{
    ErrorCategory, ErrorClassifier, GithubError, LlmError, RenameTarget, RepoLensError, Result,
};
pub use overview::{
    ApiEndpoint, ContentResult, ContributorStat, DatabaseModel, FrontendPage, LanguageShare,
    OverviewArchitecture, OverviewStats, OverviewSummary, ProductOverview, ProjectStatus,
    ServiceInfo,
};
pub use product::{ProductInfo, RepoRef};
pub use progress::{AnalysisProgress, AnalysisStage, NoopProgressSink, ProgressSink};
