//! Content Generator
//!
//! Generates prose documentation fields via a forced tool call. Receives
//! pre-computed stats and pre-extracted architecture; it only writes prose
//! and never recomputes facts. With no repositories to describe it produces
//! deterministic placeholder content without touching the model.

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::ai::{LlmProvider, RetryPolicy, ToolSpec};
use crate::constants::prompt::{CONTENT_FILE_CAP, CONTENT_MAX_TOKENS, ONE_LINER_MAX, SUMMARY_ITEM_CAP};
use crate::github::RepoContext;
use crate::types::utils::{json_string_or, truncate_with_marker};
use crate::types::{
    ContentResult, LlmError, OverviewArchitecture, OverviewStats, ProductInfo, ProjectStatus,
};

/// Generate prose documentation content
pub struct ContentGenerator {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl ContentGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Generate all prose fields for a product.
    ///
    /// Zero repository contexts yields placeholder content with no model
    /// call. Provider failure after retries propagates to the caller.
    pub async fn generate_content(
        &self,
        product: &ProductInfo,
        repo_contexts: &[RepoContext],
        stats: &OverviewStats,
        architecture: &OverviewArchitecture,
    ) -> Result<ContentResult, LlmError> {
        if repo_contexts.is_empty() {
            return Ok(empty_content(product));
        }

        let prompt = build_prompt(product, repo_contexts, stats, architecture);
        let tool = tool_spec();

        info!(
            product = %product.name,
            prompt_chars = prompt.len(),
            "generating content"
        );

        let payload = self
            .retry
            .run(|| async {
                self.provider
                    .invoke_tool(&prompt, &tool, CONTENT_MAX_TOKENS)
                    .await
            })
            .await?;

        Ok(parse_payload(&payload, product))
    }
}

/// Placeholder content for products with no linked repositories
pub fn empty_content(product: &ProductInfo) -> ContentResult {
    ContentResult {
        one_liner: format!("{} - No repositories linked for analysis", product.name),
        introduction: "This project has no GitHub repositories linked yet. \
                       Add repositories to enable analysis and documentation generation."
            .to_string(),
        status: ProjectStatus::Active,
        technical_content: "No technical analysis available - no repositories linked.".to_string(),
        business_content: "No business analysis available - no repositories linked.".to_string(),
        features_content: "No features analysis available - no repositories linked.".to_string(),
        use_cases_content: "No use cases analysis available - no repositories linked.".to_string(),
    }
}

fn build_prompt(
    product: &ProductInfo,
    repo_contexts: &[RepoContext],
    stats: &OverviewStats,
    architecture: &OverviewArchitecture,
) -> String {
    let mut sections: Vec<String> = vec![
        "You are writing documentation for a software project. Your goal is to create \
         clear, helpful content that helps developers quickly understand what this \
         project does and how it works."
            .to_string(),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Project Information".to_string(),
        String::new(),
        format!("**Name:** {}", product.name),
        format!(
            "**Description:** {}",
            product.description.as_deref().unwrap_or("Not provided")
        ),
        String::new(),
    ];

    sections.extend(format_stats_summary(stats));
    sections.extend(format_architecture_summary(architecture));
    sections.extend(format_key_files(repo_contexts));

    sections.extend(
        [
            "---",
            "",
            "## Your Task",
            "",
            "Generate documentation content using the `save_content` tool. Write for an \
             audience of developers who are joining the project or evaluating it.",
            "",
            "### 1. One-Liner",
            "Write a single compelling sentence (max 150 characters) that captures what \
             this project does. Think of it as the tagline you'd see on GitHub.",
            "",
            "### 2. Introduction",
            "Write 2-3 paragraphs providing an overview:",
            "- What problem does this solve?",
            "- What's the high-level approach?",
            "- What makes it interesting or unique?",
            "",
            "Use markdown formatting. Keep it engaging but informative.",
            "",
            "### 3. Status",
            "Determine the project status based on activity and state:",
            "- `active`: Regular commits, open issues being addressed",
            "- `maintenance`: Stable, occasional updates",
            "- `archived`: No longer actively developed",
            "- `deprecated`: Replaced or no longer recommended",
            "",
            "### 4. Technical Content (Technical Blueprint)",
            "Write detailed markdown covering:",
            "- System architecture and how components connect",
            "- Tech stack breakdown with version info if visible",
            "- Key patterns and design decisions",
            "- How data flows through the system",
            "",
            "### 5. Business Content (Business Overview)",
            "Write markdown explaining:",
            "- The business problem being solved",
            "- The value proposition",
            "- Target users or personas",
            "- How it fits in the market/ecosystem",
            "",
            "### 6. Features Content (Key Features)",
            "List and describe the main features:",
            "- Use bullet points or numbered lists",
            "- Group related features",
            "- Highlight what makes each feature valuable",
            "",
            "### 7. Use Cases Content",
            "Describe 3-4 concrete use cases:",
            "- Give each a name and brief scenario",
            "- Explain who benefits and how",
            "- Be specific with examples",
            "",
            "## Guidelines",
            "",
            "- Write in a professional but approachable tone",
            "- Use actual details from the codebase, don't invent features",
            "- Keep sections focused and scannable",
            "- Use markdown formatting (headers, lists, code blocks) appropriately",
            "- Aim for content that saves a new developer hours of exploration",
        ]
        .iter()
        .map(|s| s.to_string()),
    );

    sections.join("\n")
}

fn format_stats_summary(stats: &OverviewStats) -> Vec<String> {
    let mut sections = vec!["## Project Statistics".to_string(), String::new()];

    let mut timeline_parts = Vec::new();
    if let Some(created) = &stats.project_created {
        timeline_parts.push(format!("Created: {}", created));
    }
    if let Some(activity) = &stats.last_activity {
        timeline_parts.push(format!("Last activity: {}", activity));
    }
    if let Some(commits) = stats.total_commits {
        timeline_parts.push(format!("Commits: {}", commits));
    }
    if !timeline_parts.is_empty() {
        sections.push(format!("**Timeline:** {}", timeline_parts.join(" | ")));
    }

    let mut code_parts = Vec::new();
    if let Some(files) = stats.total_files {
        code_parts.push(format!("{} files", files));
    }
    if let Some(loc) = stats.total_lines_of_code {
        code_parts.push(format!("~{} lines", loc));
    }
    if stats.repo_count > 0 {
        code_parts.push(format!("{} repositories", stats.repo_count));
    }
    if !code_parts.is_empty() {
        sections.push(format!("**Code:** {}", code_parts.join(", ")));
    }

    if !stats.languages.is_empty() {
        let lang_str = stats
            .languages
            .iter()
            .take(SUMMARY_ITEM_CAP)
            .map(|lang| format!("{} ({}%)", lang.name, lang.percentage))
            .collect::<Vec<_>>()
            .join(", ");
        sections.push(format!("**Languages:** {}", lang_str));
    }

    let mut github_parts = Vec::new();
    if stats.stars > 0 {
        github_parts.push(format!("{} stars", stats.stars));
    }
    if stats.forks > 0 {
        github_parts.push(format!("{} forks", stats.forks));
    }
    if stats.contributor_count > 0 {
        github_parts.push(format!("{} contributors", stats.contributor_count));
    }
    if !github_parts.is_empty() {
        sections.push(format!("**GitHub:** {}", github_parts.join(", ")));
    }

    if let Some(license) = &stats.license {
        sections.push(format!("**License:** {}", license));
    }

    sections.push(String::new());
    sections
}

fn format_architecture_summary(architecture: &OverviewArchitecture) -> Vec<String> {
    let mut sections = vec!["## Architecture Summary".to_string(), String::new()];

    // Every section lists a handful of entries, then "...and N more"
    if !architecture.api_endpoints.is_empty() {
        sections.push(format!(
            "**API Endpoints:** {} endpoints",
            architecture.api_endpoints.len()
        ));
        for ep in architecture.api_endpoints.iter().take(SUMMARY_ITEM_CAP) {
            sections.push(format!("  - {} {}: {}", ep.method, ep.path, ep.description));
        }
        if architecture.api_endpoints.len() > SUMMARY_ITEM_CAP {
            sections.push(format!(
                "  - ... and {} more",
                architecture.api_endpoints.len() - SUMMARY_ITEM_CAP
            ));
        }
        sections.push(String::new());
    }

    if !architecture.database_models.is_empty() {
        sections.push(format!(
            "**Database Models:** {} models",
            architecture.database_models.len()
        ));
        for model in architecture.database_models.iter().take(SUMMARY_ITEM_CAP) {
            let mut fields_str = model
                .fields
                .iter()
                .take(4)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            if model.fields.len() > 4 {
                fields_str.push_str(", ...");
            }
            sections.push(format!("  - {}: {}", model.name, fields_str));
        }
        if architecture.database_models.len() > SUMMARY_ITEM_CAP {
            sections.push(format!(
                "  - ... and {} more",
                architecture.database_models.len() - SUMMARY_ITEM_CAP
            ));
        }
        sections.push(String::new());
    }

    if !architecture.services.is_empty() {
        sections.push(format!(
            "**Services:** {} services",
            architecture.services.len()
        ));
        for svc in architecture.services.iter().take(SUMMARY_ITEM_CAP) {
            sections.push(format!("  - {}: {}", svc.name, svc.description));
        }
        if architecture.services.len() > SUMMARY_ITEM_CAP {
            sections.push(format!(
                "  - ... and {} more",
                architecture.services.len() - SUMMARY_ITEM_CAP
            ));
        }
        sections.push(String::new());
    }

    if !architecture.frontend_pages.is_empty() {
        sections.push(format!(
            "**Frontend Pages:** {} pages",
            architecture.frontend_pages.len()
        ));
        for page in architecture.frontend_pages.iter().take(SUMMARY_ITEM_CAP) {
            sections.push(format!(
                "  - {} ({}): {}",
                page.path, page.name, page.description
            ));
        }
        if architecture.frontend_pages.len() > SUMMARY_ITEM_CAP {
            sections.push(format!(
                "  - ... and {} more",
                architecture.frontend_pages.len() - SUMMARY_ITEM_CAP
            ));
        }
        sections.push(String::new());
    }

    sections
}

fn format_key_files(repo_contexts: &[RepoContext]) -> Vec<String> {
    let mut sections = vec!["## Key Files".to_string(), String::new()];

    for ctx in repo_contexts {
        if ctx.files.is_empty() {
            continue;
        }

        if repo_contexts.len() > 1 {
            sections.push(format!("### Repository: {}", ctx.full_name));
            sections.push(String::new());
        }

        // deterministic prompt assembly
        let mut paths: Vec<&String> = ctx.files.keys().collect();
        paths.sort();

        for path in paths {
            let content = &ctx.files[path];
            sections.push(format!("**{}:**", path));
            sections.push("```".to_string());
            sections.push(truncate_with_marker(content, CONTENT_FILE_CAP));
            sections.push("```".to_string());
            sections.push(String::new());
        }
    }

    sections
}

fn tool_spec() -> ToolSpec {
    ToolSpec {
        name: "save_content".to_string(),
        description: "Save the generated documentation content".to_string(),
        input_schema: json!({
            "type": "object",
            "required": [
                "one_liner",
                "introduction",
                "status",
                "technical_content",
                "business_content",
                "features_content",
                "use_cases_content",
            ],
            "properties": {
                "one_liner": {
                    "type": "string",
                    "description": "Single compelling sentence (max 150 chars)",
                },
                "introduction": {
                    "type": "string",
                    "description": "2-3 paragraph overview with markdown formatting",
                },
                "status": {
                    "type": "string",
                    "enum": ["active", "maintenance", "archived", "deprecated"],
                    "description": "Project status based on activity",
                },
                "technical_content": {
                    "type": "string",
                    "description": "Technical blueprint markdown content",
                },
                "business_content": {
                    "type": "string",
                    "description": "Business overview markdown content",
                },
                "features_content": {
                    "type": "string",
                    "description": "Key features markdown content",
                },
                "use_cases_content": {
                    "type": "string",
                    "description": "Use cases markdown content",
                },
            },
        }),
    }
}

/// Map the tool payload into `ContentResult`. Missing fields fall back to
/// per-field placeholders, the tagline is hard-capped in length, and an
/// unknown status degrades to `active`.
fn parse_payload(payload: &Value, product: &ProductInfo) -> ContentResult {
    let mut one_liner = json_string_or(
        payload,
        "one_liner",
        &format!("{} - A software project", product.name),
    );
    if one_liner.chars().count() > ONE_LINER_MAX {
        one_liner = one_liner.chars().take(ONE_LINER_MAX).collect();
    }

    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .map(ProjectStatus::parse_or_default)
        .unwrap_or_default();

    ContentResult {
        one_liner,
        introduction: json_string_or(payload, "introduction", "No introduction available."),
        status,
        technical_content: json_string_or(
            payload,
            "technical_content",
            "No technical content available.",
        ),
        business_content: json_string_or(
            payload,
            "business_content",
            "No business content available.",
        ),
        features_content: json_string_or(
            payload,
            "features_content",
            "No features content available.",
        ),
        use_cases_content: json_string_or(
            payload,
            "use_cases_content",
            "No use cases content available.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::types::ApiEndpoint;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct CountingProvider {
        calls: AtomicUsize,
        payload: Value,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            unreachable!("generator only uses tool calls")
        }

        async fn invoke_tool(
            &self,
            _prompt: &str,
            _tool: &ToolSpec,
            _max_tokens: u32,
        ) -> Result<Value, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }
    }

    fn product() -> ProductInfo {
        ProductInfo {
            id: Uuid::nil(),
            name: "Widget".to_string(),
            description: Some("makes widgets".to_string()),
        }
    }

    fn generator(payload: Value) -> (Arc<CountingProvider>, ContentGenerator) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            payload,
        });
        let retry = RetryPolicy::extractor(&RetryConfig::default());
        (provider.clone(), ContentGenerator::new(provider, retry))
    }

    #[tokio::test]
    async fn test_zero_repos_yields_placeholders_without_model_call() {
        let (provider, generator) = generator(json!({}));
        let content = generator
            .generate_content(
                &product(),
                &[],
                &OverviewStats::default(),
                &OverviewArchitecture::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            content.one_liner,
            "Widget - No repositories linked for analysis"
        );
        assert_eq!(content.status, ProjectStatus::Active);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_parses_full_payload() {
        let payload = json!({
            "one_liner": "Widget builds widgets fast",
            "introduction": "An intro.",
            "status": "maintenance",
            "technical_content": "tech",
            "business_content": "biz",
            "features_content": "features",
            "use_cases_content": "uses"
        });
        let (_, generator) = generator(payload);
        let mut ctx = RepoContext::default();
        ctx.files
            .insert("main.py".to_string(), "print('hi')\n".to_string());
        let content = generator
            .generate_content(
                &product(),
                &[ctx],
                &OverviewStats::default(),
                &OverviewArchitecture::default(),
            )
            .await
            .unwrap();
        assert_eq!(content.one_liner, "Widget builds widgets fast");
        assert_eq!(content.status, ProjectStatus::Maintenance);
        assert_eq!(content.business_content, "biz");
    }

    #[test]
    fn test_parse_payload_defaults_and_caps_one_liner() {
        let payload = json!({
            "one_liner": "x".repeat(400),
            "status": "bogus"
        });
        let content = parse_payload(&payload, &product());
        assert_eq!(content.one_liner.chars().count(), ONE_LINER_MAX);
        assert_eq!(content.status, ProjectStatus::Active);
        assert_eq!(content.introduction, "No introduction available.");
    }

    #[test]
    fn test_stats_summary_skips_absent_values() {
        let stats = OverviewStats {
            repo_count: 2,
            stars: 5,
            ..Default::default()
        };
        let summary = format_stats_summary(&stats).join("\n");
        assert!(summary.contains("2 repositories"));
        assert!(summary.contains("5 stars"));
        assert!(!summary.contains("**Timeline:**"));
        assert!(!summary.contains("**License:**"));
    }

    #[test]
    fn test_architecture_summary_caps_listings() {
        let architecture = OverviewArchitecture {
            api_endpoints: (0..8)
                .map(|i| ApiEndpoint {
                    method: "GET".to_string(),
                    path: format!("/api/{}", i),
                    description: "endpoint".to_string(),
                })
                .collect(),
            ..Default::default()
        };
        let summary = format_architecture_summary(&architecture).join("\n");
        assert!(summary.contains("**API Endpoints:** 8 endpoints"));
        assert!(summary.contains("... and 3 more"));
        assert!(!summary.contains("/api/6"));
    }
}
