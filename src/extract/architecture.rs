//! Architecture Extractor
//!
//! Extracts structured architecture data (API endpoints, database models,
//! services, frontend pages) from fetched code files via a forced tool
//! call. Only architecture-relevant files reach the prompt; when none
//! match, no model call is made at all.

use regex::Regex;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};
use tracing::info;

use crate::ai::{LlmProvider, RetryPolicy, ToolSpec};
use crate::constants::prompt::{ARCH_FILE_CAP, ARCH_MAX_TOKENS};
use crate::github::RepoContext;
use crate::types::utils::{json_object_array, json_string_array, json_string_or, truncate_with_marker};
use crate::types::{
    ApiEndpoint, DatabaseModel, FrontendPage, LlmError, OverviewArchitecture, ServiceInfo,
};

/// Patterns for architecture-relevant file paths, matched against paths
/// normalized with a leading slash
static ARCHITECTURE_FILE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // API / route files
        r".*/(routes|api|endpoints|controllers|handlers)/.*\.(py|ts|js|go|java|rs)$",
        r".*/app\.(py|ts|js)$",
        r".*/main\.(py|ts|js|go)$",
        r".*/server\.(py|ts|js|go)$",
        r".*/router\.(py|ts|js)$",
        // Model / schema files
        r".*/(models|entities|schemas|types)/.*\.(py|ts|js|go|java|rs)$",
        r".*/models\.(py|ts|js)$",
        r".*/schema\.(py|ts|js)$",
        r".*/types\.(ts|js)$",
        // Service / domain files
        r".*/(services|domain|usecases|business)/.*\.(py|ts|js|go|java|rs)$",
        // Frontend page files (Next.js, Nuxt, SvelteKit)
        r".*/pages/.*\.(tsx|jsx|vue|svelte)$",
        r".*/app/.*page\.(tsx|jsx)$",
        r".*/views/.*\.(tsx|jsx|vue|svelte)$",
        r".*/routes/.*\.(tsx|jsx|svelte)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid architecture pattern"))
    .collect()
});

/// Entry points included whenever present, regardless of pattern matches
const ALWAYS_INCLUDE_FILES: &[&str] = &[
    "app/main.py",
    "src/main.py",
    "main.py",
    "app.py",
    "server.py",
    "src/app.ts",
    "src/index.ts",
    "src/server.ts",
    "index.ts",
    "app.ts",
    "server.ts",
];

pub fn is_architecture_file(path: &str) -> bool {
    if ALWAYS_INCLUDE_FILES.contains(&path) {
        return true;
    }
    let normalized = format!("/{}", path.trim_start_matches('/'));
    ARCHITECTURE_FILE_PATTERNS
        .iter()
        .any(|p| p.is_match(&normalized))
}

/// Extract structured architecture data from fetched code
pub struct ArchitectureExtractor {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl ArchitectureExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Extract architecture components from repository code.
    ///
    /// Filters to architecture-relevant files first; multi-repo inputs get
    /// their paths prefixed with the repository full name. An empty filter
    /// result short-circuits to an empty architecture without a model call.
    /// Provider failure after retries propagates to the caller.
    pub async fn extract_architecture(
        &self,
        repo_contexts: &[RepoContext],
    ) -> Result<OverviewArchitecture, LlmError> {
        if repo_contexts.is_empty() {
            return Ok(OverviewArchitecture::default());
        }

        // BTreeMap keeps prompt assembly deterministic
        let mut architecture_files: BTreeMap<String, &str> = BTreeMap::new();
        for ctx in repo_contexts {
            for (path, content) in &ctx.files {
                if !is_architecture_file(path) {
                    continue;
                }
                let key = if repo_contexts.len() > 1 {
                    format!("{}/{}", ctx.full_name, path)
                } else {
                    path.clone()
                };
                architecture_files.insert(key, content.as_str());
            }
        }

        if architecture_files.is_empty() {
            info!("no architecture-relevant files found");
            return Ok(OverviewArchitecture::default());
        }

        info!(
            files = architecture_files.len(),
            "extracting architecture"
        );

        let prompt = build_prompt(&architecture_files);
        let tool = tool_spec();

        let payload = self
            .retry
            .run(|| async { self.provider.invoke_tool(&prompt, &tool, ARCH_MAX_TOKENS).await })
            .await?;

        Ok(parse_payload(&payload))
    }
}

fn build_prompt(files: &BTreeMap<String, &str>) -> String {
    let mut sections: Vec<String> = vec![
        "You are extracting structured architecture information from code files.".to_string(),
        String::new(),
        "## Files".to_string(),
        String::new(),
    ];

    for (path, content) in files {
        sections.push(format!("### {}", path));
        sections.push("```".to_string());
        sections.push(truncate_with_marker(content, ARCH_FILE_CAP));
        sections.push("```".to_string());
        sections.push(String::new());
    }

    sections.extend(
        [
            "---",
            "",
            "## Task",
            "",
            "Extract and return using the `save_architecture` tool:",
            "",
            "### 1. API Endpoints",
            "Find all API routes/endpoints. For each:",
            "- `method`: HTTP method (GET, POST, PUT, PATCH, DELETE)",
            "- `path`: The route path (e.g., '/api/v1/users', '/products/{id}')",
            "- `description`: Brief description of what it does",
            "",
            "Look for patterns like:",
            "- FastAPI: `@router.get('/path')`, `@app.post('/path')`",
            "- Express: `router.get('/path')`, `app.post('/path')`",
            "- Next.js API: files in `pages/api/` or `app/api/`",
            "- Go: `r.HandleFunc`, `e.GET`, `router.POST`",
            "",
            "### 2. Database Models",
            "Find all database models/entities. For each:",
            "- `name`: Model/table name (e.g., 'User', 'Product')",
            "- `fields`: List of key field names (3-6 most important fields)",
            "",
            "Look for patterns like:",
            "- SQLModel/SQLAlchemy: `class User(SQLModel)`, `class Product(Base)`",
            "- Prisma: `model User {}`",
            "- TypeORM: `@Entity() class User`",
            "- Mongoose: `new Schema({})`",
            "",
            "### 3. Services",
            "Find backend services/modules. For each:",
            "- `name`: Service name (e.g., 'GitHubService', 'AuthService')",
            "- `description`: Brief description of what it does",
            "",
            "Look for patterns like:",
            "- Classes with 'Service', 'Repository', 'Handler' in name",
            "- Modules exporting business logic functions",
            "",
            "### 4. Frontend Pages",
            "Find frontend pages/routes. For each:",
            "- `path`: Route path (e.g., '/dashboard', '/products/[id]')",
            "- `name`: Page name (e.g., 'Dashboard', 'Product Detail')",
            "- `description`: Brief description of what the page shows",
            "",
            "Look for patterns like:",
            "- Next.js: files in `pages/` or `app/*/page.tsx`",
            "- React Router: `<Route path='/...'>`",
            "- Vue Router: `{ path: '/...' }`",
            "",
            "## Guidelines",
            "",
            "- Be exhaustive but concise",
            "- Only include items you actually find in the code",
            "- Don't make up endpoints, models, or pages that don't exist",
            "- For dynamic routes, use bracket notation: `/users/[id]`, `/products/{productId}`",
            "- Keep descriptions brief (5-15 words)",
        ]
        .iter()
        .map(|s| s.to_string()),
    );

    sections.join("\n")
}

fn tool_spec() -> ToolSpec {
    ToolSpec {
        name: "save_architecture".to_string(),
        description: "Save extracted architecture components".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["api_endpoints", "database_models", "services", "frontend_pages"],
            "properties": {
                "api_endpoints": {
                    "type": "array",
                    "description": "List of API endpoints found in the code",
                    "items": {
                        "type": "object",
                        "required": ["method", "path", "description"],
                        "properties": {
                            "method": {
                                "type": "string",
                                "enum": ["GET", "POST", "PUT", "PATCH", "DELETE"],
                            },
                            "path": {"type": "string"},
                            "description": {"type": "string"},
                        },
                    },
                },
                "database_models": {
                    "type": "array",
                    "description": "List of database models/entities",
                    "items": {
                        "type": "object",
                        "required": ["name", "fields"],
                        "properties": {
                            "name": {"type": "string"},
                            "fields": {"type": "array", "items": {"type": "string"}},
                        },
                    },
                },
                "services": {
                    "type": "array",
                    "description": "List of backend services/modules",
                    "items": {
                        "type": "object",
                        "required": ["name", "description"],
                        "properties": {
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                        },
                    },
                },
                "frontend_pages": {
                    "type": "array",
                    "description": "List of frontend pages/routes",
                    "items": {
                        "type": "object",
                        "required": ["path", "name", "description"],
                        "properties": {
                            "path": {"type": "string"},
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                        },
                    },
                },
            },
        }),
    }
}

/// Map the tool payload into the architecture schema, defaulting each
/// missing field rather than failing the extraction.
fn parse_payload(payload: &Value) -> OverviewArchitecture {
    OverviewArchitecture {
        api_endpoints: json_object_array(payload, "api_endpoints")
            .into_iter()
            .map(|ep| ApiEndpoint {
                method: json_string_or(ep, "method", "GET"),
                path: json_string_or(ep, "path", ""),
                description: json_string_or(ep, "description", ""),
            })
            .collect(),
        database_models: json_object_array(payload, "database_models")
            .into_iter()
            .map(|model| DatabaseModel {
                name: json_string_or(model, "name", ""),
                fields: json_string_array(model, "fields"),
            })
            .collect(),
        services: json_object_array(payload, "services")
            .into_iter()
            .map(|svc| ServiceInfo {
                name: json_string_or(svc, "name", ""),
                description: json_string_or(svc, "description", ""),
            })
            .collect(),
        frontend_pages: json_object_array(payload, "frontend_pages")
            .into_iter()
            .map(|page| FrontendPage {
                path: json_string_or(page, "path", ""),
                name: json_string_or(page, "name", ""),
                description: json_string_or(page, "description", ""),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        payload: Value,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            unreachable!("extractor only uses tool calls")
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

    fn extractor(payload: Value) -> (Arc<CountingProvider>, ArchitectureExtractor) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            payload,
        });
        let retry = RetryPolicy::extractor(&RetryConfig::default());
        (provider.clone(), ArchitectureExtractor::new(provider, retry))
    }

    #[test]
    fn test_architecture_file_patterns() {
        assert!(is_architecture_file("app/api/routes/users.py"));
        assert!(is_architecture_file("src/models/product.ts"));
        assert!(is_architecture_file("internal/handlers/auth.go"));
        assert!(is_architecture_file("app/dashboard/page.tsx"));
        assert!(is_architecture_file("app/main.py"));
        assert!(is_architecture_file("server.ts"));
        assert!(!is_architecture_file("README.md"));
        assert!(!is_architecture_file("docs/setup.py.md"));
        assert!(!is_architecture_file("scripts/migrate.sh"));
    }

    #[test]
    fn test_parse_payload_defaults_missing_fields() {
        let payload = json!({
            "api_endpoints": [{"path": "/users"}],
            "database_models": [{"name": "User"}],
            "services": "not an array"
        });
        let arch = parse_payload(&payload);
        assert_eq!(arch.api_endpoints[0].method, "GET");
        assert_eq!(arch.api_endpoints[0].path, "/users");
        assert!(arch.database_models[0].fields.is_empty());
        assert!(arch.services.is_empty());
        assert!(arch.frontend_pages.is_empty());
    }

    #[tokio::test]
    async fn test_empty_contexts_skip_model() {
        let (provider, extractor) = extractor(json!({}));
        let arch = extractor.extract_architecture(&[]).await.unwrap();
        assert!(arch.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_relevant_files_skip_model() {
        let mut ctx = RepoContext::default();
        ctx.files
            .insert("README.md".to_string(), "docs".to_string());
        let (provider, extractor) = extractor(json!({}));
        let arch = extractor.extract_architecture(&[ctx]).await.unwrap();
        assert!(arch.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extracts_from_tool_payload() {
        let mut ctx = RepoContext::default();
        ctx.files.insert(
            "app/api/routes/users.py".to_string(),
            "@router.get('/users')\n".to_string(),
        );
        let payload = json!({
            "api_endpoints": [
                {"method": "GET", "path": "/users", "description": "list users"}
            ],
            "database_models": [],
            "services": [],
            "frontend_pages": []
        });
        let (provider, extractor) = extractor(payload);
        let arch = extractor.extract_architecture(&[ctx]).await.unwrap();
        assert_eq!(arch.api_endpoints.len(), 1);
        assert_eq!(arch.api_endpoints[0].path, "/users");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_retried_until_success() {
        struct FlakyProvider {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl LlmProvider for FlakyProvider {
            async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
                unreachable!("extractor only uses tool calls")
            }

            async fn invoke_tool(
                &self,
                _prompt: &str,
                _tool: &ToolSpec,
                _max_tokens: u32,
            ) -> Result<Value, LlmError> {
                let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(LlmError::new(crate::types::ErrorCategory::RateLimit, "429"))
                } else {
                    Ok(json!({"api_endpoints": [], "database_models": [],
                              "services": [], "frontend_pages": []}))
                }
            }

            fn name(&self) -> &str {
                "flaky"
            }

            fn model(&self) -> &str {
                "flaky-model"
            }
        }

        let provider = Arc::new(FlakyProvider {
            calls: AtomicUsize::new(0),
        });
        let retry = RetryPolicy {
            max_attempts: 3,
            base_delay: std::time::Duration::from_millis(1),
            factor: 2.0,
        };
        let extractor = ArchitectureExtractor::new(provider.clone(), retry);

        let mut ctx = RepoContext::default();
        ctx.files
            .insert("app/main.py".to_string(), "app = FastAPI()\n".to_string());

        let arch = extractor.extract_architecture(&[ctx]).await.unwrap();
        assert!(arch.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_prompt_truncates_long_files() {
        let long = "x".repeat(ARCH_FILE_CAP + 100);
        let mut files = BTreeMap::new();
        files.insert("app/main.py".to_string(), long.as_str());
        let prompt = build_prompt(&files);
        assert!(prompt.contains("... (truncated,"));
    }
}
