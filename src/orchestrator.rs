//! Analysis Orchestrator
//!
//! Coordinates the full pipeline:
//! 1. Fetch repository contexts (sequential per repo, parallel inside each)
//! 2. Detect frameworks and select significant files, then fetch them
//! 3. Extract stats (pure, off the async runtime) and architecture (AI)
//!    concurrently
//! 4. Generate prose content and assemble the final `ProductOverview`
//!
//! A progress checkpoint goes to the injected sink before each stage.
//! Per-repository failures degrade (the repo is analyzed with whatever was
//! fetched); stage-level extraction or generation failure after retries
//! aborts the run.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{AnthropicProvider, LlmProvider, ProviderConfig, RetryPolicy};
use crate::config::Config;
use crate::constants::selector::MAX_REFINEMENT_CANDIDATES;
use crate::detector::FrameworkDetector;
use crate::extract::{ArchitectureExtractor, StatsExtractor};
use crate::generate::{ContentGenerator, empty_content};
use crate::github::{GithubClient, RepoContext};
use crate::selector::{FileSelector, FileSelectorInput};
use crate::types::{
    AnalysisProgress, AnalysisStage, ContentResult, NoopProgressSink, OverviewArchitecture,
    OverviewStats, OverviewSummary, ProductInfo, ProductOverview, ProgressSink, RepoLensError,
    RepoRef, Result,
};

/// Orchestrates the complete analysis workflow
pub struct AnalysisOrchestrator {
    github: Arc<GithubClient>,
    detector: FrameworkDetector,
    selector: FileSelector,
    stats: StatsExtractor,
    architecture: ArchitectureExtractor,
    generator: ContentGenerator,
    sink: Arc<dyn ProgressSink>,
    analyzer_model: String,
}

impl AnalysisOrchestrator {
    /// Wire the pipeline from a validated config, building the real GitHub
    /// client and Anthropic provider.
    pub fn from_config(config: &Config, sink: Arc<dyn ProgressSink>) -> Result<Self> {
        config.validate()?;
        let github = Arc::new(GithubClient::new(&config.github)?);
        let provider = Arc::new(AnthropicProvider::new(ProviderConfig::from(&config.llm))?);
        Ok(Self::new(github, provider, config, sink))
    }

    /// Wire the pipeline from pre-built components. This is the seam tests
    /// use to substitute transports and providers.
    pub fn new(
        github: Arc<GithubClient>,
        provider: Arc<dyn LlmProvider>,
        config: &Config,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        let selector_retry = RetryPolicy::selector(&config.retry);
        let extractor_retry = RetryPolicy::extractor(&config.retry);
        Self {
            github,
            detector: FrameworkDetector::new(),
            selector: FileSelector::new(
                provider.clone(),
                config.selector.clone(),
                selector_retry,
            ),
            stats: StatsExtractor::new(),
            architecture: ArchitectureExtractor::new(provider.clone(), extractor_retry),
            generator: ContentGenerator::new(provider.clone(), extractor_retry),
            sink,
            analyzer_model: provider.model().to_string(),
        }
    }

    /// Convenience constructor for fire-and-forget runs without progress
    pub fn without_progress(
        github: Arc<GithubClient>,
        provider: Arc<dyn LlmProvider>,
        config: &Config,
    ) -> Self {
        Self::new(github, provider, config, Arc::new(NoopProgressSink))
    }

    /// Run the full analysis for a product and its linked repositories
    pub async fn analyze_product(
        &self,
        product: &ProductInfo,
        repos: &[RepoRef],
    ) -> Result<ProductOverview> {
        info!(product = %product.name, repos = repos.len(), "starting analysis");

        // Stage 1: fetch repository contexts
        self.sink
            .update(
                &AnalysisProgress::stage(AnalysisStage::FetchingRepos)
                    .with_message("Connecting to GitHub..."),
            )
            .await?;

        if repos.is_empty() {
            warn!(product = %product.name, "no repositories linked");
            return Ok(self.empty_overview(product));
        }

        let mut repo_contexts = self.fetch_all_contexts(repos).await?;
        if repo_contexts.is_empty() {
            warn!(product = %product.name, "no repository contexts fetched");
            return Ok(self.empty_overview(product));
        }

        // Stage 2: framework detection, AI file selection, content fetch
        self.sink
            .update(
                &AnalysisProgress::stage(AnalysisStage::ScanningFiles).with_message(format!(
                    "Scanning {} repositories...",
                    repo_contexts.len()
                )),
            )
            .await?;

        for context in &mut repo_contexts {
            self.select_and_fetch_files(context).await?;
        }

        // Stage 3: stats and architecture, independent tasks run concurrently
        self.sink
            .update(
                &AnalysisProgress::stage(AnalysisStage::AnalyzingCode)
                    .with_message("Extracting statistics and architecture..."),
            )
            .await?;

        let stats_extractor = self.stats;
        let stats_contexts = repo_contexts.clone();
        let stats_task =
            tokio::task::spawn_blocking(move || stats_extractor.extract_stats(&stats_contexts));
        let (stats, architecture) =
            tokio::join!(stats_task, self.architecture.extract_architecture(&repo_contexts));
        let stats = stats.map_err(|e| {
            RepoLensError::pipeline(3, AnalysisStage::AnalyzingCode.name(), e.to_string())
        })?;
        let architecture = architecture?;

        info!(
            files = ?stats.total_files,
            stars = stats.stars,
            endpoints = architecture.api_endpoints.len(),
            models = architecture.database_models.len(),
            "extraction complete"
        );

        // Stage 4: prose generation
        self.sink
            .update(
                &AnalysisProgress::stage(AnalysisStage::GeneratingContent)
                    .with_message("Writing project documentation..."),
            )
            .await?;

        let content = self
            .generator
            .generate_content(product, &repo_contexts, &stats, &architecture)
            .await?;

        info!(product = %product.name, "analysis complete");
        Ok(self.build_overview(content, stats, architecture))
    }

    /// Fetch contexts sequentially to stay inside GitHub rate budgets; file
    /// fetches within each repository still run concurrently.
    async fn fetch_all_contexts(&self, repos: &[RepoRef]) -> Result<Vec<RepoContext>> {
        let mut repo_contexts = Vec::with_capacity(repos.len());

        for (i, repo) in repos.iter().enumerate() {
            self.sink
                .update(
                    &AnalysisProgress::stage(AnalysisStage::FetchingRepos)
                        .with_repo(repo.full_name())
                        .with_message(format!(
                            "Fetching repository {} of {}...",
                            i + 1,
                            repos.len()
                        )),
                )
                .await?;

            let context = self
                .github
                .get_repo_context(
                    &repo.owner,
                    &repo.repo,
                    repo.branch.as_deref(),
                    repo.description.as_deref(),
                )
                .await;

            info!(
                repo = %context.full_name,
                files = context.files.len(),
                stars = context.stars_count,
                errors = context.errors.len(),
                "fetched repository context"
            );
            repo_contexts.push(context);
        }

        Ok(repo_contexts)
    }

    /// Run detection + selection for one repository and merge the fetched
    /// contents into its context. Selection never fails; fetch errors land
    /// in the context's error list.
    async fn select_and_fetch_files(&self, context: &mut RepoContext) -> Result<()> {
        let tree_files = context.tree_files().to_vec();
        if tree_files.is_empty() {
            warn!(repo = %context.full_name, "no file tree, skipping file selection");
            return Ok(());
        }

        self.sink
            .update(
                &AnalysisProgress::stage(AnalysisStage::ScanningFiles)
                    .with_repo(context.full_name.clone())
                    .with_file_counts(context.files.len(), tree_files.len())
                    .with_message(format!("Identifying key files in {}...", context.full_name)),
            )
            .await?;

        let framework_hints = self.detector.detect(&context.files);
        let readme_content = context
            .files
            .get("README.md")
            .or_else(|| context.files.get("readme.md"))
            .cloned();

        let input = FileSelectorInput {
            repo_name: context.full_name.clone(),
            description: context.description.clone(),
            readme_content,
            file_paths: tree_files.clone(),
            framework_hints: Some(framework_hints),
        };

        let result = self.selector.select_files(&input).await;
        if result.selected_files.is_empty() {
            warn!(repo = %context.full_name, "file selection returned nothing");
            return Ok(());
        }

        info!(
            repo = %context.full_name,
            selected = result.selected_files.len(),
            truncated = result.truncated,
            fallback = result.used_fallback,
            "selected files"
        );

        let fetched = self
            .github
            .fetch_files_by_paths(
                &context.owner,
                &context.repo,
                &result.selected_files,
                &context.default_branch,
            )
            .await;
        context.files.extend(fetched);

        // Second pass: follow imports out of what was just read
        let additional = self
            .selector
            .refine_selection(
                &context.full_name,
                &tree_files,
                &result.selected_files,
                &context.files,
                MAX_REFINEMENT_CANDIDATES,
            )
            .await;

        if !additional.is_empty() {
            let fetched = self
                .github
                .fetch_files_by_paths(
                    &context.owner,
                    &context.repo,
                    &additional,
                    &context.default_branch,
                )
                .await;
            info!(
                repo = %context.full_name,
                refined = fetched.len(),
                total = context.files.len() + fetched.len(),
                "fetched refinement files"
            );
            context.files.extend(fetched);
        }

        Ok(())
    }

    fn build_overview(
        &self,
        content: ContentResult,
        stats: OverviewStats,
        architecture: OverviewArchitecture,
    ) -> ProductOverview {
        ProductOverview {
            summary: OverviewSummary {
                one_liner: content.one_liner,
                introduction: content.introduction,
                status: content.status,
            },
            stats,
            technical_content: content.technical_content,
            business_content: content.business_content,
            features_content: content.features_content,
            use_cases_content: content.use_cases_content,
            architecture,
            analyzed_at: Utc::now(),
            analyzer_model: self.analyzer_model.clone(),
        }
    }

    fn empty_overview(&self, product: &ProductInfo) -> ProductOverview {
        self.build_overview(
            empty_content(product),
            OverviewStats::default(),
            OverviewArchitecture::default(),
        )
    }
}
