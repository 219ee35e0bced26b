//! Heuristic file selection.
//!
//! Deterministic regex- and structure-based selection used when AI
//! selection fails or comes back too small, plus the tree truncation
//! applied before any prompt is built.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::info;

use crate::detector::DetectionResult;

/// Priority directories for tree truncation. When truncating large trees,
/// files under these survive first.
pub const PRIORITY_DIRECTORIES: &[&str] = &[
    "src/",
    "app/",
    "lib/",
    "api/",
    "routes/",
    "pages/",
    "components/",
    "models/",
    "services/",
    "controllers/",
    "handlers/",
    "domain/",
    "core/",
    "pkg/",
    "cmd/",
    "internal/",
];

/// Heuristic patterns for fallback file selection
static FALLBACK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Entry points
        r"^(main|index|app|server)\.(py|ts|js|go|rs|java)$",
        r"^src/(main|index|app)\.(py|ts|js|go|rs)$",
        // Routes / API
        r".*/routes?/.*\.(py|ts|js|go)$",
        r".*/api/.*\.(py|ts|js|go)$",
        r".*/(controllers?|handlers?)/.*\.(py|ts|js|go)$",
        // Models
        r".*/models?/.*\.(py|ts|js|go)$",
        r".*/schemas?/.*\.(py|ts|js)$",
        r".*/entities?/.*\.(py|ts|java)$",
        // Services
        r".*/services?/.*\.(py|ts|js|go)$",
        r".*/domain/.*\.(py|ts|js)$",
        // Frontend pages
        r".*/pages?/.*\.(tsx|jsx|vue|svelte)$",
        r".*/app/.*/page\.(tsx|jsx)$",
        r".*/views?/.*\.(tsx|jsx|vue)$",
        // Config
        r"^(pyproject\.toml|package\.json|Cargo\.toml|go\.mod)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid fallback pattern"))
    .collect()
});

/// Source code file extensions
const SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".ts", ".tsx", ".js", ".jsx", ".go", ".rs", ".java", ".kt", ".scala", ".rb", ".php",
    ".cs", ".swift", ".vue", ".svelte",
];

/// Test file indicators
const TEST_INDICATORS: &[&str] = &[
    "/test/",
    "/tests/",
    "/__tests__/",
    "/spec/",
    "/specs/",
    "_test.",
    ".test.",
    ".spec.",
    "test_",
];

/// Key entry points to prioritize in fallback selection
const KEY_ENTRY_POINTS: &[&str] = &[
    "main.py",
    "app.py",
    "server.py",
    "index.ts",
    "index.js",
    "main.ts",
    "main.go",
    "main.rs",
    "src/main.py",
    "src/index.ts",
    "src/app.ts",
    "app/main.py",
];

pub fn is_source_file(path: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub fn is_test_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    TEST_INDICATORS.iter().any(|ind| lower.contains(ind))
}

fn in_directories(path: &str, dirs: &[&str]) -> bool {
    dirs.iter()
        .any(|d| path.starts_with(d) || path.contains(&format!("/{}", d)))
}

/// Truncate a large file tree to `max_files`.
///
/// Files in priority directories win, shallower paths win within each
/// category, and remaining slots fill from everything else.
pub fn truncate_tree(file_paths: &[String], max_files: usize) -> Vec<String> {
    let mut priority_files: Vec<&String> = Vec::new();
    let mut other_files: Vec<&String> = Vec::new();

    for path in file_paths {
        if in_directories(path, PRIORITY_DIRECTORIES) {
            priority_files.push(path);
        } else {
            other_files.push(path);
        }
    }

    priority_files.sort_by_key(|p| p.matches('/').count());
    other_files.sort_by_key(|p| p.matches('/').count());

    let mut result: Vec<String> = priority_files
        .into_iter()
        .take(max_files)
        .cloned()
        .collect();
    let remaining = max_files.saturating_sub(result.len());
    result.extend(other_files.into_iter().take(remaining).cloned());

    result
}

/// Select files using heuristic patterns.
///
/// Three passes: source files in framework-suggested directories, then
/// fallback pattern matches, then well-known entry points. Stops at
/// `max_select`.
pub fn heuristic_fallback(
    file_paths: &[String],
    framework_hints: Option<&DetectionResult>,
    max_select: usize,
) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    let mut selected_set: HashSet<&str> = HashSet::new();

    let priority_dirs: &[&str] = framework_hints
        .map(|h| h.suggested_directories.as_slice())
        .unwrap_or(&[]);

    // First pass: non-test source files in framework priority directories
    for path in file_paths {
        if selected.len() >= max_select {
            break;
        }
        if in_directories(path, priority_dirs)
            && !selected_set.contains(path.as_str())
            && is_source_file(path)
            && !is_test_file(path)
        {
            selected.push(path.clone());
            selected_set.insert(path);
        }
    }

    // Second pass: fallback pattern matches
    for path in file_paths {
        if selected.len() >= max_select {
            break;
        }
        if selected_set.contains(path.as_str()) {
            continue;
        }
        if FALLBACK_PATTERNS.iter().any(|p| p.is_match(path)) {
            selected.push(path.clone());
            selected_set.insert(path);
        }
    }

    // Third pass: entry points and common key files
    let path_set: HashSet<&str> = file_paths.iter().map(String::as_str).collect();
    for entry in KEY_ENTRY_POINTS {
        if selected.len() >= max_select {
            break;
        }
        if path_set.contains(entry) && !selected_set.contains(entry) {
            selected.push((*entry).to_string());
            selected_set.insert(entry);
        }
    }

    info!(count = selected.len(), "heuristic fallback selected files");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_source_and_test_predicates() {
        assert!(is_source_file("src/app.ts"));
        assert!(is_source_file("lib/widget.rs"));
        assert!(!is_source_file("README.md"));
        assert!(is_test_file("src/__tests__/app.test.ts"));
        assert!(is_test_file("tests/test_main.py"));
        assert!(!is_test_file("src/contest/rules.py"));
    }

    #[test]
    fn test_truncate_tree_prefers_priority_dirs_and_shallow_paths() {
        let input = paths(&[
            "docs/guide/advanced/setup.md",
            "src/deep/nested/module.rs",
            "src/main.rs",
            "README.md",
        ]);
        let result = truncate_tree(&input, 3);
        assert_eq!(result.len(), 3);
        // priority files first, shallowest of them leading
        assert_eq!(result[0], "src/main.rs");
        assert_eq!(result[1], "src/deep/nested/module.rs");
        assert_eq!(result[2], "README.md");
    }

    #[test]
    fn test_truncate_tree_noop_under_limit() {
        let input = paths(&["a.py", "b.py"]);
        assert_eq!(truncate_tree(&input, 10).len(), 2);
    }

    #[test]
    fn test_heuristic_fallback_patterns() {
        let input = paths(&[
            "main.py",
            "app/routes/users.py",
            "app/models/user.py",
            "docs/notes.txt",
            "package.json",
        ]);
        let selected = heuristic_fallback(&input, None, 50);
        assert!(selected.contains(&"main.py".to_string()));
        assert!(selected.contains(&"app/routes/users.py".to_string()));
        assert!(selected.contains(&"app/models/user.py".to_string()));
        assert!(selected.contains(&"package.json".to_string()));
        assert!(!selected.contains(&"docs/notes.txt".to_string()));
    }

    #[test]
    fn test_heuristic_fallback_respects_cap() {
        let input: Vec<String> = (0..100)
            .map(|i| format!("app/services/service_{}.py", i))
            .collect();
        let selected = heuristic_fallback(&input, None, 50);
        assert_eq!(selected.len(), 50);
    }

    #[test]
    fn test_heuristic_fallback_skips_tests_in_priority_dirs() {
        let hints = DetectionResult {
            suggested_directories: vec!["app/"],
            ..Default::default()
        };
        let input = paths(&["app/service.py", "app/tests/test_service.py"]);
        let selected = heuristic_fallback(&input, Some(&hints), 50);
        assert_eq!(selected, vec!["app/service.py".to_string()]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arbitrary_paths() -> impl Strategy<Value = Vec<String>> {
            proptest::collection::vec("[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.(py|ts|rs|md)", 0..60)
        }

        proptest! {
            #[test]
            fn truncate_tree_bounded_and_drawn_from_input(
                input in arbitrary_paths(),
                max in 1usize..40,
            ) {
                let result = truncate_tree(&input, max);
                prop_assert!(result.len() <= max);
                prop_assert!(result.len() <= input.len());
                for path in &result {
                    prop_assert!(input.contains(path));
                }
            }

            #[test]
            fn truncate_tree_keeps_everything_under_the_cap(
                input in arbitrary_paths(),
            ) {
                let result = truncate_tree(&input, input.len() + 1);
                prop_assert_eq!(result.len(), input.len());
            }

            #[test]
            fn truncate_tree_puts_priority_paths_first(
                input in arbitrary_paths(),
                max in 1usize..40,
            ) {
                let result = truncate_tree(&input, max);
                let first_non_priority = result
                    .iter()
                    .position(|p| !in_directories(p, PRIORITY_DIRECTORIES));
                if let Some(boundary) = first_non_priority {
                    for p in &result[boundary..] {
                        prop_assert!(!in_directories(p, PRIORITY_DIRECTORIES));
                    }
                }
            }

            #[test]
            fn heuristic_fallback_bounded_unique_and_drawn_from_input(
                input in arbitrary_paths(),
                max in 1usize..40,
            ) {
                let selected = heuristic_fallback(&input, None, max);
                prop_assert!(selected.len() <= max);
                let unique: HashSet<&String> = selected.iter().collect();
                prop_assert_eq!(unique.len(), selected.len());
                for path in &selected {
                    prop_assert!(input.contains(path));
                }
            }
        }
    }
}
