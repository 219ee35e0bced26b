//! Shared utility functions for JSON payload extraction.
//!
//! Provides ergonomic helpers for extracting values from `serde_json::Value`
//! with per-field defaulting. Used when parsing forced tool-call payloads,
//! where missing or malformed sub-fields must degrade to defaults rather
//! than fail the whole extraction.

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Extract string from JSON value by key.
///
/// Replaces verbose `v.get("key")?.as_str()?.to_string()` patterns.
#[inline]
pub fn json_string(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

/// Extract string with default value.
#[inline]
pub fn json_string_or(value: &serde_json::Value, key: &str, default: &str) -> String {
    json_string(value, key).unwrap_or_else(|| default.to_string())
}

/// Extract string array from JSON value by key.
#[inline]
pub fn json_string_array(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|s| s.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Extract array of objects from JSON value by key.
#[inline]
pub fn json_object_array<'a>(
    value: &'a serde_json::Value,
    key: &str,
) -> Vec<&'a serde_json::Value> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter(|v| v.is_object()).collect())
        .unwrap_or_default()
}

// =============================================================================
// String Utilities
// =============================================================================

/// Truncate a string to at most `max_chars` characters, appending a marker
/// when content was dropped. Respects char boundaries.
pub fn truncate_with_marker(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_chars).collect();
    format!(
        "{}\n... (truncated, {} chars total)",
        truncated,
        content.chars().count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_string() {
        let v = json!({"name": "widget", "count": 3});
        assert_eq!(json_string(&v, "name"), Some("widget".to_string()));
        assert_eq!(json_string(&v, "count"), None);
        assert_eq!(json_string(&v, "missing"), None);
    }

    #[test]
    fn test_json_string_or() {
        let v = json!({"name": "widget"});
        assert_eq!(json_string_or(&v, "name", "x"), "widget");
        assert_eq!(json_string_or(&v, "missing", "x"), "x");
    }

    #[test]
    fn test_json_string_array_filters_non_strings() {
        let v = json!({"items": ["a", 1, "b", null]});
        assert_eq!(json_string_array(&v, "items"), vec!["a", "b"]);
        assert!(json_string_array(&v, "missing").is_empty());
    }

    #[test]
    fn test_json_object_array() {
        let v = json!({"items": [{"a": 1}, "not-an-object", {"b": 2}]});
        assert_eq!(json_object_array(&v, "items").len(), 2);
    }

    #[test]
    fn test_truncate_with_marker() {
        assert_eq!(truncate_with_marker("short", 100), "short");
        let long = "x".repeat(200);
        let truncated = truncate_with_marker(&long, 100);
        assert!(truncated.starts_with(&"x".repeat(100)));
        assert!(truncated.contains("truncated, 200 chars total"));
    }
}
