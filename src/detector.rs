//! Framework Detection
//!
//! Identifies frameworks from manifest files (package.json, pyproject.toml,
//! go.mod, Cargo.toml, JVM builds) to provide context-aware hints for file
//! selection. Pure: same manifest contents always yield the same result,
//! and unparseable manifests simply contribute nothing.

use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

/// Information about one detected framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkInfo {
    pub name: &'static str,
    /// "frontend", "backend", "fullstack"
    pub category: &'static str,
    /// Suggested file glob patterns for this framework
    pub file_patterns: &'static [&'static str],
    /// Key directories to look in
    pub directory_hints: &'static [&'static str],
}

/// Result of framework detection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    pub frameworks: Vec<FrameworkInfo>,
    pub primary_language: Option<&'static str>,
    pub suggested_patterns: Vec<&'static str>,
    pub suggested_directories: Vec<&'static str>,
}

// =============================================================================
// Framework Table
// =============================================================================

struct FrameworkDef {
    category: &'static str,
    patterns: &'static [&'static str],
    directories: &'static [&'static str],
}

static FRAMEWORK_DEFINITIONS: LazyLock<HashMap<&'static str, FrameworkDef>> = LazyLock::new(|| {
    let mut defs = HashMap::new();
    // JavaScript/TypeScript frontend
    defs.insert(
        "next",
        FrameworkDef {
            category: "fullstack",
            patterns: &["app/**/page.tsx", "pages/**/*.tsx", "app/**/layout.tsx"],
            directories: &["app/", "pages/", "components/", "lib/"],
        },
    );
    defs.insert(
        "react",
        FrameworkDef {
            category: "frontend",
            patterns: &["src/**/*.tsx", "src/**/*.jsx", "src/App.tsx"],
            directories: &["src/", "components/", "hooks/", "contexts/"],
        },
    );
    defs.insert(
        "vue",
        FrameworkDef {
            category: "frontend",
            patterns: &["src/**/*.vue", "src/App.vue"],
            directories: &["src/", "components/", "views/", "stores/"],
        },
    );
    defs.insert(
        "svelte",
        FrameworkDef {
            category: "frontend",
            patterns: &["src/**/*.svelte", "src/routes/**/*.svelte"],
            directories: &["src/", "routes/", "lib/"],
        },
    );
    defs.insert(
        "angular",
        FrameworkDef {
            category: "frontend",
            patterns: &["src/app/**/*.component.ts", "src/app/**/*.module.ts"],
            directories: &["src/app/", "src/environments/"],
        },
    );
    // JavaScript/TypeScript backend
    defs.insert(
        "express",
        FrameworkDef {
            category: "backend",
            patterns: &["src/routes/**/*.ts", "src/middleware/**/*.ts", "app.ts"],
            directories: &["src/routes/", "src/middleware/", "src/controllers/"],
        },
    );
    defs.insert(
        "nestjs",
        FrameworkDef {
            category: "backend",
            patterns: &[
                "src/**/*.controller.ts",
                "src/**/*.module.ts",
                "src/**/*.service.ts",
            ],
            directories: &["src/", "src/modules/"],
        },
    );
    defs.insert(
        "fastify",
        FrameworkDef {
            category: "backend",
            patterns: &["src/routes/**/*.ts", "src/plugins/**/*.ts"],
            directories: &["src/routes/", "src/plugins/"],
        },
    );
    defs.insert(
        "hono",
        FrameworkDef {
            category: "backend",
            patterns: &["src/**/*.ts", "src/routes/**/*.ts"],
            directories: &["src/", "src/routes/"],
        },
    );
    // Python
    defs.insert(
        "fastapi",
        FrameworkDef {
            category: "backend",
            patterns: &["app/api/**/*.py", "app/routers/**/*.py", "app/models/**/*.py"],
            directories: &[
                "app/",
                "app/api/",
                "app/routers/",
                "app/models/",
                "app/services/",
            ],
        },
    );
    defs.insert(
        "django",
        FrameworkDef {
            category: "backend",
            patterns: &["**/views.py", "**/models.py", "**/urls.py", "**/admin.py"],
            directories: &["apps/", "core/", "api/"],
        },
    );
    defs.insert(
        "flask",
        FrameworkDef {
            category: "backend",
            patterns: &["app/**/*.py", "routes/**/*.py", "models/**/*.py"],
            directories: &["app/", "routes/", "models/", "blueprints/"],
        },
    );
    defs.insert(
        "starlette",
        FrameworkDef {
            category: "backend",
            patterns: &["app/**/*.py", "routes/**/*.py"],
            directories: &["app/", "routes/"],
        },
    );
    // Go
    defs.insert(
        "gin",
        FrameworkDef {
            category: "backend",
            patterns: &["**/*_handler.go", "**/routes.go", "**/router.go"],
            directories: &["handlers/", "routes/", "controllers/", "internal/"],
        },
    );
    defs.insert(
        "echo",
        FrameworkDef {
            category: "backend",
            patterns: &["**/*_handler.go", "**/routes.go"],
            directories: &["handlers/", "routes/", "internal/"],
        },
    );
    defs.insert(
        "fiber",
        FrameworkDef {
            category: "backend",
            patterns: &["**/*_handler.go", "**/routes.go"],
            directories: &["handlers/", "routes/"],
        },
    );
    // Rust
    defs.insert(
        "actix-web",
        FrameworkDef {
            category: "backend",
            patterns: &["src/**/*.rs", "src/routes/**/*.rs"],
            directories: &["src/", "src/routes/", "src/handlers/"],
        },
    );
    defs.insert(
        "axum",
        FrameworkDef {
            category: "backend",
            patterns: &["src/**/*.rs", "src/routes/**/*.rs"],
            directories: &["src/", "src/routes/", "src/handlers/"],
        },
    );
    defs.insert(
        "rocket",
        FrameworkDef {
            category: "backend",
            patterns: &["src/**/*.rs"],
            directories: &["src/"],
        },
    );
    // JVM
    defs.insert(
        "spring",
        FrameworkDef {
            category: "backend",
            patterns: &[
                "src/main/java/**/*Controller.java",
                "src/main/java/**/*Service.java",
                "src/main/java/**/*Repository.java",
            ],
            directories: &["src/main/java/", "src/main/kotlin/", "src/main/resources/"],
        },
    );
    defs
});

/// package.json dependency name -> framework name
const JS_DEPENDENCY_FRAMEWORKS: &[(&str, &str)] = &[
    ("next", "next"),
    ("react", "react"),
    ("vue", "vue"),
    ("svelte", "svelte"),
    ("@angular/core", "angular"),
    ("express", "express"),
    ("@nestjs/core", "nestjs"),
    ("fastify", "fastify"),
    ("hono", "hono"),
];

/// Python dependency name -> framework name
const PYTHON_DEPENDENCY_FRAMEWORKS: &[(&str, &str)] = &[
    ("fastapi", "fastapi"),
    ("django", "django"),
    ("flask", "flask"),
    ("starlette", "starlette"),
];

/// go.mod import path -> framework name
const GO_DEPENDENCY_FRAMEWORKS: &[(&str, &str)] = &[
    ("github.com/gin-gonic/gin", "gin"),
    ("github.com/labstack/echo", "echo"),
    ("github.com/gofiber/fiber", "fiber"),
];

/// Cargo.toml crate name -> framework name
const RUST_DEPENDENCY_FRAMEWORKS: &[(&str, &str)] = &[
    ("actix-web", "actix-web"),
    ("axum", "axum"),
    ("rocket", "rocket"),
];

fn framework_info(name: &'static str) -> FrameworkInfo {
    match FRAMEWORK_DEFINITIONS.get(name) {
        Some(def) => FrameworkInfo {
            name,
            category: def.category,
            file_patterns: def.patterns,
            directory_hints: def.directories,
        },
        None => FrameworkInfo {
            name,
            category: "unknown",
            file_patterns: &[],
            directory_hints: &[],
        },
    }
}

// =============================================================================
// Detector
// =============================================================================

/// Detect frameworks from project manifest files
#[derive(Debug, Default)]
pub struct FrameworkDetector;

impl FrameworkDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect frameworks from manifest file contents.
    ///
    /// The first manifest present decides `primary_language`, in priority
    /// order: package.json, pyproject.toml, requirements.txt, go.mod,
    /// Cargo.toml, JVM builds.
    pub fn detect(&self, files: &HashMap<String, String>) -> DetectionResult {
        let mut frameworks: Vec<FrameworkInfo> = Vec::new();
        let mut primary_language: Option<&'static str> = None;

        if let Some(package_json) = files.get("package.json") {
            primary_language.get_or_insert("typescript");
            frameworks.extend(detect_from_package_json(package_json));
        }

        let pyproject = files.get("pyproject.toml");
        if let Some(pyproject) = pyproject {
            primary_language.get_or_insert("python");
            frameworks.extend(detect_from_pyproject(pyproject));
        }

        // requirements.txt is the fallback when pyproject.toml is absent
        if pyproject.is_none()
            && let Some(requirements) = files.get("requirements.txt")
        {
            primary_language.get_or_insert("python");
            frameworks.extend(detect_from_requirements(requirements));
        }

        if let Some(go_mod) = files.get("go.mod") {
            primary_language.get_or_insert("go");
            frameworks.extend(detect_by_substring(go_mod, GO_DEPENDENCY_FRAMEWORKS, false));
        }

        if let Some(cargo_toml) = files.get("Cargo.toml") {
            primary_language.get_or_insert("rust");
            frameworks.extend(detect_by_substring(
                cargo_toml,
                RUST_DEPENDENCY_FRAMEWORKS,
                true,
            ));
        }

        let pom_xml = files.get("pom.xml");
        let build_gradle = files.get("build.gradle").or_else(|| files.get("build.gradle.kts"));
        if pom_xml.is_some() || build_gradle.is_some() {
            primary_language.get_or_insert("java");
            let combined = format!(
                "{}{}",
                pom_xml.map(String::as_str).unwrap_or(""),
                build_gradle.map(String::as_str).unwrap_or("")
            )
            .to_lowercase();
            if combined.contains("spring-boot") || combined.contains("springframework") {
                frameworks.push(framework_info("spring"));
            }
        }

        let mut suggested_patterns = Vec::new();
        let mut suggested_directories = Vec::new();
        for fw in &frameworks {
            for p in fw.file_patterns {
                if !suggested_patterns.contains(p) {
                    suggested_patterns.push(*p);
                }
            }
            for d in fw.directory_hints {
                if !suggested_directories.contains(d) {
                    suggested_directories.push(*d);
                }
            }
        }

        DetectionResult {
            frameworks,
            primary_language,
            suggested_patterns,
            suggested_directories,
        }
    }
}

fn detect_from_package_json(content: &str) -> Vec<FrameworkInfo> {
    let data: serde_json::Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => {
            warn!("Failed to parse package.json");
            return Vec::new();
        }
    };

    let has_dep = |name: &str| {
        data.get("dependencies")
            .and_then(|d| d.get(name))
            .or_else(|| data.get("devDependencies").and_then(|d| d.get(name)))
            .is_some()
    };

    JS_DEPENDENCY_FRAMEWORKS
        .iter()
        .filter(|(dep, _)| has_dep(dep))
        .map(|(_, fw)| framework_info(fw))
        .collect()
}

fn detect_from_pyproject(content: &str) -> Vec<FrameworkInfo> {
    // Loose dependency matching across poetry and PEP 621 styles:
    //   fastapi = "..."  |  "fastapi>=0.100"  |  "fastapi"  |  fastapi[all]
    let lower = content.to_lowercase();
    PYTHON_DEPENDENCY_FRAMEWORKS
        .iter()
        .filter(|(dep, _)| {
            let patterns = [
                format!(r#"["']?{}["']?\s*[=\[>]"#, regex::escape(dep)),
                format!(r#"["']{}["']"#, regex::escape(dep)),
                format!(r#"["']{}[>=<\[]"#, regex::escape(dep)),
            ];
            patterns.iter().any(|p| {
                regex::Regex::new(p)
                    .map(|re| re.is_match(&lower))
                    .unwrap_or(false)
            })
        })
        .map(|(_, fw)| framework_info(fw))
        .collect()
}

fn detect_from_requirements(content: &str) -> Vec<FrameworkInfo> {
    let lower = content.to_lowercase();
    let mut frameworks = Vec::new();
    for line in lower.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // package name stops at the first version specifier
        let pkg: String = line
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if let Some((_, fw)) = PYTHON_DEPENDENCY_FRAMEWORKS.iter().find(|(dep, _)| *dep == pkg) {
            frameworks.push(framework_info(fw));
        }
    }
    frameworks
}

fn detect_by_substring(
    content: &str,
    table: &[(&'static str, &'static str)],
    case_insensitive: bool,
) -> Vec<FrameworkInfo> {
    let haystack = if case_insensitive {
        content.to_lowercase()
    } else {
        content.to_string()
    };
    table
        .iter()
        .filter(|(needle, _)| haystack.contains(needle))
        .map(|(_, fw)| framework_info(fw))
        .collect()
}

/// Format a detection result as a prompt hint fragment.
/// Empty when nothing was detected.
pub fn format_framework_hints(result: &DetectionResult) -> String {
    if result.frameworks.is_empty() {
        return String::new();
    }

    let mut lines = vec!["## Detected Frameworks".to_string(), String::new()];
    for fw in &result.frameworks {
        lines.push(format!("- **{}** ({})", fw.name, fw.category));
    }

    if !result.suggested_directories.is_empty() {
        lines.push(String::new());
        lines.push("Key directories for this stack:".to_string());
        // cap to avoid prompt bloat
        for d in result.suggested_directories.iter().take(8) {
            lines.push(format!("- `{}`", d));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = FrameworkDetector::new().detect(&HashMap::new());
        assert!(result.frameworks.is_empty());
        assert!(result.primary_language.is_none());
        assert!(result.suggested_patterns.is_empty());
    }

    #[test]
    fn test_package_json_detects_next_and_react() {
        let result = FrameworkDetector::new().detect(&files(&[(
            "package.json",
            r#"{"dependencies": {"next": "14.0.0", "react": "^18"}}"#,
        )]));
        assert_eq!(result.primary_language, Some("typescript"));
        let names: Vec<_> = result.frameworks.iter().map(|f| f.name).collect();
        assert!(names.contains(&"next"));
        assert!(names.contains(&"react"));
    }

    #[test]
    fn test_malformed_package_json_is_ignored() {
        let result =
            FrameworkDetector::new().detect(&files(&[("package.json", "{not json")]));
        assert!(result.frameworks.is_empty());
        // manifest presence still decides the language
        assert_eq!(result.primary_language, Some("typescript"));
    }

    #[test]
    fn test_pyproject_detects_fastapi() {
        let result = FrameworkDetector::new().detect(&files(&[(
            "pyproject.toml",
            "[project]\ndependencies = [\"fastapi>=0.100\", \"uvicorn\"]\n",
        )]));
        assert_eq!(result.primary_language, Some("python"));
        assert_eq!(result.frameworks[0].name, "fastapi");
    }

    #[test]
    fn test_requirements_fallback_only_without_pyproject() {
        let both = files(&[
            ("pyproject.toml", "[project]\ndependencies = []\n"),
            ("requirements.txt", "flask==3.0\n"),
        ]);
        let result = FrameworkDetector::new().detect(&both);
        // requirements.txt must not contribute when pyproject.toml exists
        assert!(result.frameworks.is_empty());

        let only_requirements = files(&[("requirements.txt", "flask==3.0\n# comment\n")]);
        let result = FrameworkDetector::new().detect(&only_requirements);
        assert_eq!(result.frameworks[0].name, "flask");
    }

    #[test]
    fn test_manifest_priority_order() {
        let result = FrameworkDetector::new().detect(&files(&[
            ("package.json", r#"{"dependencies": {"express": "4"}}"#),
            ("Cargo.toml", "[dependencies]\naxum = \"0.7\"\n"),
        ]));
        // package.json wins the language even when Cargo.toml is present
        assert_eq!(result.primary_language, Some("typescript"));
        let names: Vec<_> = result.frameworks.iter().map(|f| f.name).collect();
        assert!(names.contains(&"express"));
        assert!(names.contains(&"axum"));
    }

    #[test]
    fn test_go_and_spring_detection() {
        let result = FrameworkDetector::new().detect(&files(&[(
            "go.mod",
            "module example.com/app\n\nrequire github.com/gin-gonic/gin v1.9.0\n",
        )]));
        assert_eq!(result.primary_language, Some("go"));
        assert_eq!(result.frameworks[0].name, "gin");

        let result = FrameworkDetector::new().detect(&files(&[(
            "build.gradle",
            "implementation 'org.springframework.boot:spring-boot-starter-web'\n",
        )]));
        assert_eq!(result.primary_language, Some("java"));
        assert_eq!(result.frameworks[0].name, "spring");
    }

    #[test]
    fn test_determinism() {
        let input = files(&[("package.json", r#"{"dependencies": {"vue": "3"}}"#)]);
        let detector = FrameworkDetector::new();
        assert_eq!(detector.detect(&input), detector.detect(&input));
    }

    #[test]
    fn test_format_framework_hints() {
        let result = FrameworkDetector::new().detect(&files(&[(
            "package.json",
            r#"{"dependencies": {"next": "14"}}"#,
        )]));
        let hints = format_framework_hints(&result);
        assert!(hints.contains("**next**"));
        assert!(hints.contains("Key directories"));

        assert!(format_framework_hints(&DetectionResult::default()).is_empty());
    }
}
