//! Analysis Progress Reporting
//!
//! The pipeline reports progress through an injected `ProgressSink` before
//! each stage begins. Sink failures surface as errors to the orchestrator
//! so a caller can abort runs whose progress channel is gone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::error::Result;

// =============================================================================
// Stages
// =============================================================================

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Stage 1: fetching repository contexts
    FetchingRepos,
    /// Stage 2: scanning trees and selecting files
    ScanningFiles,
    /// Stage 3: statistics and architecture extraction
    AnalyzingCode,
    /// Stage 4: prose generation
    GeneratingContent,
}

impl AnalysisStage {
    pub const TOTAL: u8 = 4;

    pub fn stage_number(&self) -> u8 {
        match self {
            Self::FetchingRepos => 1,
            Self::ScanningFiles => 2,
            Self::AnalyzingCode => 3,
            Self::GeneratingContent => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchingRepos => "fetching_repos",
            Self::ScanningFiles => "scanning_files",
            Self::AnalyzingCode => "analyzing_code",
            Self::GeneratingContent => "generating_content",
        }
    }
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Progress
// =============================================================================

/// One progress checkpoint.
///
/// `stage_number`/`total_stages` give consumers a coarse progress bar;
/// the optional fields add detail when a stage is repo- or file-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub stage: AnalysisStage,
    pub stage_number: u8,
    pub total_stages: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_scanned: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisProgress {
    pub fn stage(stage: AnalysisStage) -> Self {
        Self {
            stage,
            stage_number: stage.stage_number(),
            total_stages: AnalysisStage::TOTAL,
            current_repo: None,
            current_file: None,
            files_scanned: None,
            total_files: None,
            message: None,
        }
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.current_repo = Some(repo.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_file_counts(mut self, scanned: usize, total: usize) -> Self {
        self.files_scanned = Some(scanned);
        self.total_files = Some(total);
        self
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Destination for progress checkpoints.
///
/// Implementations persist or broadcast the update; the orchestrator awaits
/// each write so checkpoint ordering matches stage ordering.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn update(&self, progress: &AnalysisProgress) -> Result<()>;
}

/// Sink that discards updates. Useful for tests and fire-and-forget runs.
#[derive(Debug, Default)]
pub struct NoopProgressSink;

#[async_trait]
impl ProgressSink for NoopProgressSink {
    async fn update(&self, _progress: &AnalysisProgress) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_numbers_are_ordered() {
        let stages = [
            AnalysisStage::FetchingRepos,
            AnalysisStage::ScanningFiles,
            AnalysisStage::AnalyzingCode,
            AnalysisStage::GeneratingContent,
        ];
        for (i, stage) in stages.iter().enumerate() {
            assert_eq!(stage.stage_number(), i as u8 + 1);
        }
        assert_eq!(AnalysisStage::TOTAL, 4);
    }

    #[test]
    fn test_progress_builder() {
        let progress = AnalysisProgress::stage(AnalysisStage::ScanningFiles)
            .with_repo("acme/widget")
            .with_file_counts(12, 340);
        assert_eq!(progress.stage_number, 2);
        assert_eq!(progress.current_repo.as_deref(), Some("acme/widget"));
        assert_eq!(progress.files_scanned, Some(12));
        assert_eq!(progress.total_files, Some(340));
        assert!(progress.message.is_none());
    }

    #[test]
    fn test_progress_serializes_without_absent_fields() {
        let progress = AnalysisProgress::stage(AnalysisStage::FetchingRepos);
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["stage"], "fetching_repos");
        assert!(json.get("current_repo").is_none());
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoopProgressSink;
        let progress = AnalysisProgress::stage(AnalysisStage::GeneratingContent);
        assert!(sink.update(&progress).await.is_ok());
    }
}
