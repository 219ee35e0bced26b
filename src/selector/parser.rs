//! Selection response and import-reference parsing.
//!
//! Pure functions: parse the model's JSON-array reply (tolerating markdown
//! fences and surrounding prose), and extract import references from file
//! contents for the refinement pass.

use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

/// Patterns for common import statements, per language
static IMPORT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Python: from x import y, import x
        r#"from\s+["']?([.\w/]+)["']?\s+import"#,
        r#"import\s+["']?([.\w/]+)["']?"#,
        // JS/TS: import x from 'y', require('y')
        r#"import\s+.*\s+from\s+["']([^"']+)["']"#,
        r#"require\s*\(\s*["']([^"']+)["']\s*\)"#,
        // Go: import "x"
        r#"import\s+["']([^"']+)["']"#,
        // Rust: use x, mod x
        r"use\s+([:\w]+)",
        r"mod\s+(\w+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid import pattern"))
    .collect()
});

/// Parse the model's selection reply and validate paths against the input
/// set. Handles raw JSON arrays, arrays inside markdown code blocks, and
/// arrays embedded in prose. Anything unparseable yields an empty list.
pub fn parse_selection(
    response_text: &str,
    valid_files: &HashSet<String>,
    max_select: usize,
) -> Vec<String> {
    let mut text = response_text.trim().to_string();

    // Strip a markdown code fence if present
    if text.starts_with("```") {
        let mut lines: Vec<&str> = text.lines().skip(1).collect();
        if lines.last().is_some_and(|l| l.trim() == "```") {
            lines.pop();
        }
        text = lines.join("\n");
    }

    let parsed: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(_) => {
            // fall back to the first JSON array anywhere in the reply
            match JSON_ARRAY
                .find(&text)
                .and_then(|m| serde_json::from_str(m.as_str()).ok())
            {
                Some(v) => v,
                None => return Vec::new(),
            }
        }
    };

    let Some(items) = parsed.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|s| valid_files.contains(*s))
        .map(String::from)
        .take(max_select)
        .collect()
}

/// Extract file references (imports, requires) from file contents and
/// resolve them against the repository tree. Output is sorted for
/// determinism.
pub fn extract_references(
    file_contents: &HashMap<String, String>,
    valid_paths: &HashSet<String>,
) -> Vec<String> {
    let mut referenced: BTreeSet<String> = BTreeSet::new();

    for (file_path, content) in file_contents {
        let file_dir = match file_path.rfind('/') {
            Some(idx) => &file_path[..idx],
            None => "",
        };

        for pattern in IMPORT_PATTERNS.iter() {
            for captures in pattern.captures_iter(content) {
                if let Some(import) = captures.get(1) {
                    referenced.extend(resolve_import(import.as_str(), file_dir, valid_paths));
                }
            }
        }
    }

    referenced.into_iter().collect()
}

/// Resolve one import path to actual files: relative to the importing
/// file, from the repo root, and under common source prefixes, each with
/// a set of candidate extensions and index-file forms.
fn resolve_import(import_path: &str, current_dir: &str, valid_paths: &HashSet<String>) -> Vec<String> {
    let mut resolved = Vec::new();

    let import_path = import_path.replace('.', "/");
    let import_path = import_path.trim_matches('/');
    if import_path.is_empty() {
        return resolved;
    }

    const EXTENSIONS: &[&str] = &["", ".py", ".ts", ".tsx", ".js", ".jsx", ".go", ".rs"];
    const ROOT_PREFIXES: &[&str] = &["src/", "app/", "lib/", "pkg/", "internal/"];

    let try_candidate = |candidate: String, resolved: &mut Vec<String>| {
        if valid_paths.contains(&candidate) {
            resolved.push(candidate);
        }
    };

    if !current_dir.is_empty() {
        for ext in EXTENSIONS {
            try_candidate(
                format!("{}/{}{}", current_dir, import_path, ext),
                &mut resolved,
            );
            try_candidate(
                format!("{}/{}/index{}", current_dir, import_path, ext),
                &mut resolved,
            );
        }
    }

    for ext in EXTENSIONS {
        try_candidate(format!("{}{}", import_path, ext), &mut resolved);
        for prefix in ROOT_PREFIXES {
            try_candidate(format!("{}{}{}", prefix, import_path, ext), &mut resolved);
        }
    }

    resolved
}
