//! RepoLens - Repository Analysis Orchestration Pipeline
//!
//! Analyzes a product's linked GitHub repositories and produces a structured
//! `ProductOverview`: merged statistics, extracted architecture, and
//! AI-generated documentation prose.
//!
//! ## Core Features
//!
//! - **Typed GitHub client**: TTL-cached fetches, rename detection, graceful
//!   per-resource degradation
//! - **Framework detection**: pure manifest inspection guiding file selection
//! - **AI file selection**: model-driven with a deterministic heuristic
//!   fallback, plus an import-following refinement pass
//! - **Forced tool calls**: architecture extraction and content generation
//!   always return structured payloads
//! - **Progress checkpoints**: a sink receives one update per pipeline stage
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use repolens::{AnalysisOrchestrator, ConfigLoader, ProductInfo, RepoRef};
//! use repolens::types::NoopProgressSink;
//!
//! let config = ConfigLoader::load()?;
//! let orchestrator = AnalysisOrchestrator::from_config(&config, Arc::new(NoopProgressSink))?;
//! let overview = orchestrator
//!     .analyze_product(&product, &[RepoRef::new("acme", "widget")])
//!     .await?;
//! ```
//!
//! ## Modules
//!
//! - [`github`]: GitHub API transport, caches, and context assembly
//! - [`detector`]: framework detection from manifest files
//! - [`selector`]: AI file selection with heuristic fallback
//! - [`extract`]: statistics aggregation and architecture extraction
//! - [`generate`]: prose content generation
//! - [`orchestrator`]: the four-stage pipeline

pub mod ai;
pub mod config;
pub mod constants;
pub mod detector;
pub mod extract;
pub mod generate;
pub mod github;
pub mod orchestrator;
pub mod selector;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error types
pub use types::error::{ErrorCategory, GithubError, LlmError, RepoLensError, Result};

// Pipeline
pub use orchestrator::AnalysisOrchestrator;

// Inputs and output
pub use types::{ProductInfo, ProductOverview, RepoRef};

// Components
pub use ai::{AnthropicProvider, LlmProvider};
pub use detector::FrameworkDetector;
pub use extract::{ArchitectureExtractor, StatsExtractor};
pub use generate::ContentGenerator;
pub use github::GithubClient;
pub use selector::FileSelector;
