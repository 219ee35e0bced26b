//! Selection prompt builders.

use std::collections::HashMap;

use crate::constants::prompt::README_CAP;
use crate::detector::{DetectionResult, format_framework_hints};

/// Build the prompt for initial file selection
pub fn build_selection_prompt(
    repo_name: &str,
    description: Option<&str>,
    readme_content: Option<&str>,
    file_paths: &[String],
    framework_hints: Option<&DetectionResult>,
    min_select: usize,
    max_select: usize,
) -> String {
    let mut sections: Vec<String> = vec![
        "You are analyzing a code repository to identify architecturally significant files."
            .to_string(),
        String::new(),
        "## Repository".to_string(),
        format!("Name: {}", repo_name),
    ];

    if let Some(description) = description {
        sections.push(format!("Description: {}", description));
    }
    sections.push(String::new());

    if let Some(hints) = framework_hints {
        let framework_section = format_framework_hints(hints);
        if !framework_section.is_empty() {
            sections.push(framework_section);
            sections.push(String::new());
        }
    }

    if let Some(readme) = readme_content {
        let mut truncated: String = readme.chars().take(README_CAP).collect();
        if readme.chars().count() > README_CAP {
            truncated.push_str("\n... (truncated)");
        }
        sections.push("## README".to_string());
        sections.push(truncated);
        sections.push(String::new());
    }

    sections.push("## File Tree".to_string());
    sections.push(format!("Total files: {}", file_paths.len()));
    sections.push(String::new());
    sections.push(file_paths.join("\n"));
    sections.push(String::new());
    sections.push("## Task".to_string());
    sections.push(String::new());
    sections.push(format!(
        "Select {}-{} files that would best help understand this codebase's architecture. Focus on:",
        min_select, max_select
    ));
    sections.push(String::new());
    sections.push(
        "1. **API/Routes** - Files defining HTTP endpoints, REST routes, GraphQL resolvers"
            .to_string(),
    );
    sections.push("2. **Data Models** - Database schemas, entities, type definitions".to_string());
    sections.push("3. **Services** - Business logic, domain services, use cases".to_string());
    sections.push("4. **Frontend Pages** - Page components, views, route definitions".to_string());
    sections.push("5. **Entry Points** - Main application files, configuration".to_string());
    sections.push(String::new());
    sections.push("Prioritize:".to_string());
    sections.push("- Entry points and core logic over utilities/helpers".to_string());
    sections.push("- Type definitions and interfaces".to_string());
    sections.push("- Files that define structure rather than implement details".to_string());

    if let Some(hints) = framework_hints
        && !hints.suggested_directories.is_empty()
    {
        sections.push(String::new());
        sections.push(
            "Based on the detected framework, pay special attention to these directories:"
                .to_string(),
        );
        sections.push(
            hints
                .suggested_directories
                .iter()
                .take(6)
                .map(|d| format!("`{}`", d))
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    sections.push(String::new());
    sections.push(
        "Return ONLY a JSON array of file paths. Include only files that exist in the tree above. Example:"
            .to_string(),
    );
    sections.push(String::new());
    sections.push("```json".to_string());
    sections.push(r#"["src/routes/api.ts", "src/models/user.py", "app/main.py"]"#.to_string());
    sections.push("```".to_string());

    sections.join("\n")
}

/// Build the prompt for second-pass refinement selection
pub fn build_refinement_prompt(
    repo_name: &str,
    file_contents: &HashMap<String, String>,
    candidate_files: &[String],
    max_to_select: usize,
) -> String {
    // Stable excerpt order; cap files and lines to keep the prompt bounded
    let mut paths: Vec<&String> = file_contents.keys().collect();
    paths.sort();

    let file_summaries: Vec<String> = paths
        .iter()
        .take(10)
        .map(|path| {
            let content = &file_contents[*path];
            let mut excerpt: String = content
                .lines()
                .take(50)
                .collect::<Vec<_>>()
                .join("\n");
            if content.lines().count() > 50 {
                excerpt.push_str("\n... (truncated)");
            }
            format!("### {}\n```\n{}\n```", path, excerpt)
        })
        .collect();

    format!(
        "You are analyzing code from repository {repo_name}.\n\n\
         Based on the files we've already read, identify additional files that would help \
         complete our understanding of the architecture.\n\n\
         ## Files Already Read\n\n\
         {files_section}\n\n\
         ## Candidate Files to Consider\n\n\
         {candidates}\n\n\
         ## Task\n\n\
         From the candidate files above, select up to {max_to_select} files that are:\n\
         1. Referenced or imported by the files we've read\n\
         2. Define types, interfaces, or models used by the files we've read\n\
         3. Contain related business logic or utilities\n\n\
         Return ONLY a JSON array of file paths. Example:\n\n\
         ```json\n\
         [\"src/types/user.ts\", \"src/utils/validation.py\"]\n\
         ```",
        repo_name = repo_name,
        files_section = file_summaries.join("\n\n"),
        candidates = candidate_files.join("\n"),
        max_to_select = max_to_select,
    )
}
