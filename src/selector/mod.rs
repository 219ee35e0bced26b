//! File Selector
//!
//! Selects architecturally significant files from a repository tree: API
//! endpoints and routes, data models, services, frontend pages, entry
//! points. AI selection runs first; a deterministic heuristic fallback
//! supplements or replaces it when the model fails or returns too little.
//! Provider failure never surfaces to the caller.

pub mod fallback;
pub mod parser;
pub mod prompts;

pub use fallback::{heuristic_fallback, is_source_file, is_test_file, truncate_tree};
pub use parser::{extract_references, parse_selection};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{LlmProvider, RetryPolicy};
use crate::config::SelectorConfig;
use crate::constants::selector::MAX_TOKENS;
use crate::detector::DetectionResult;
use crate::types::{ErrorCategory, LlmError};

/// Input for file selection
#[derive(Debug, Clone, Default)]
pub struct FileSelectorInput {
    pub repo_name: String,
    pub description: Option<String>,
    pub readme_content: Option<String>,
    pub file_paths: Vec<String>,
    pub framework_hints: Option<DetectionResult>,
}

/// Result of file selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelectorResult {
    pub selected_files: Vec<String>,
    /// True when the input tree was truncated before prompting
    pub truncated: bool,
    pub file_count_before_truncation: usize,
    /// True when the heuristic fallback contributed to the selection
    pub used_fallback: bool,
}

/// Select architecturally significant files from a repository tree
pub struct FileSelector {
    provider: Arc<dyn LlmProvider>,
    config: SelectorConfig,
    retry: RetryPolicy,
}

impl FileSelector {
    pub fn new(provider: Arc<dyn LlmProvider>, config: SelectorConfig, retry: RetryPolicy) -> Self {
        Self {
            provider,
            config,
            retry,
        }
    }

    /// Select files for one repository.
    ///
    /// Degradation ladder: empty tree yields an empty result; a tree at or
    /// under `min_select` is returned whole without an LLM call; oversized
    /// trees are truncated before prompting; AI failure or an undersized AI
    /// selection is supplemented from the heuristic fallback. This method
    /// does not fail on provider errors.
    pub async fn select_files(&self, input: &FileSelectorInput) -> FileSelectorResult {
        let original_count = input.file_paths.len();

        if input.file_paths.is_empty() {
            return FileSelectorResult::default();
        }

        if original_count <= self.config.min_select {
            return FileSelectorResult {
                selected_files: input.file_paths.clone(),
                truncated: false,
                file_count_before_truncation: original_count,
                used_fallback: false,
            };
        }

        let mut truncated = false;
        let file_paths: Vec<String> = if original_count > self.config.max_tree_files {
            truncated = true;
            let kept = truncate_tree(&input.file_paths, self.config.max_tree_files);
            info!(
                from = original_count,
                to = kept.len(),
                "truncated file tree"
            );
            kept
        } else {
            input.file_paths.clone()
        };

        let prompt = prompts::build_selection_prompt(
            &input.repo_name,
            input.description.as_deref(),
            input.readme_content.as_deref(),
            &file_paths,
            input.framework_hints.as_ref(),
            self.config.min_select,
            self.config.max_select,
        );

        let mut used_fallback = false;
        let mut selected_files = match self.call_with_retry(&prompt, &file_paths).await {
            Ok(selected) => selected,
            Err(e) => {
                warn!(error = %e, "file selection failed, using fallback");
                used_fallback = true;
                Vec::new()
            }
        };

        if selected_files.len() < self.config.supplement_threshold() {
            info!(
                selected = selected_files.len(),
                "selection below threshold, supplementing with heuristic fallback"
            );
            let fallback_files = heuristic_fallback(
                &file_paths,
                input.framework_hints.as_ref(),
                self.config.max_select,
            );

            let mut existing: HashSet<String> = selected_files.iter().cloned().collect();
            for f in fallback_files {
                if selected_files.len() >= self.config.max_select {
                    break;
                }
                if existing.insert(f.clone()) {
                    selected_files.push(f);
                }
            }
            used_fallback = true;
        }

        FileSelectorResult {
            selected_files,
            truncated,
            file_count_before_truncation: original_count,
            used_fallback,
        }
    }

    /// Second-pass selection based on first-pass file contents.
    ///
    /// Extracts import references from the fetched files, resolves them
    /// against the tree, and asks the model which of the resulting
    /// candidates matter. On total AI failure the raw candidates are
    /// returned, truncated to `max_additional`.
    pub async fn refine_selection(
        &self,
        repo_name: &str,
        file_paths: &[String],
        already_selected: &[String],
        file_contents: &HashMap<String, String>,
        max_additional: usize,
    ) -> Vec<String> {
        if file_contents.is_empty() {
            return Vec::new();
        }

        let valid: HashSet<String> = file_paths.iter().cloned().collect();
        let referenced = extract_references(file_contents, &valid);

        let already: HashSet<&str> = already_selected.iter().map(String::as_str).collect();
        let additional: Vec<String> = referenced
            .into_iter()
            .filter(|f| !already.contains(f.as_str()))
            .collect();

        if additional.is_empty() {
            info!(repo = repo_name, "second pass found no additional files");
            return Vec::new();
        }

        // cap candidates sent to the prompt
        let candidates: Vec<String> = additional.iter().take(100).cloned().collect();
        let prompt =
            prompts::build_refinement_prompt(repo_name, file_contents, &candidates, max_additional);

        match self.call_with_retry(&prompt, &additional).await {
            Ok(selected) => {
                info!(
                    repo = repo_name,
                    count = selected.len(),
                    "second pass selected additional files"
                );
                selected.into_iter().take(max_additional).collect()
            }
            Err(e) => {
                warn!(repo = repo_name, error = %e, "second pass failed, keeping raw candidates");
                additional.into_iter().take(max_additional).collect()
            }
        }
    }

    /// One retried completion: empty or unparseable replies count as
    /// retryable parse errors, matching the transient-vs-terminal predicate.
    async fn call_with_retry(
        &self,
        prompt: &str,
        valid_files: &[String],
    ) -> Result<Vec<String>, LlmError> {
        let valid: HashSet<String> = valid_files.iter().cloned().collect();

        self.retry
            .run(|| async {
                let text = self.provider.complete(prompt, MAX_TOKENS).await?;
                let selected = parse_selection(&text, &valid, self.config.max_select);
                if selected.is_empty() {
                    return Err(LlmError::with_provider(
                        ErrorCategory::ParseError,
                        "selection reply was empty or invalid",
                        self.provider.name(),
                    ));
                }
                Ok(selected)
            })
            .await
    }
}
