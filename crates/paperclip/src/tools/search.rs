use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{parse_args, Tool};
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::ToolDefinition;

#[derive(Deserialize)]
struct SearchArgs {
    path: String,
    pattern: String,
}

/// Recursive line search below a directory
pub struct SearchFilesTool;

impl SearchFilesTool {
    /// Patterns that are not valid regular expressions are matched literally
    fn compile(pattern: &str) -> AgentResult<Regex> {
        Regex::new(pattern)
            .or_else(|_| Regex::new(&regex::escape(pattern)))
            .map_err(|e| AgentError::InvalidParameters(format!("Invalid pattern: {}", e)))
    }

    fn search_file(path: &Path, pattern: &Regex, matches: &mut Vec<String>) {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), "Skipping file: {}", e);
                return;
            }
        };

        for (index, line) in content.lines().enumerate() {
            if pattern.is_match(line) {
                matches.push(format!("{}:{}:{}", path.display(), index + 1, line));
            }
        }
    }
}

#[async_trait]
impl Tool for SearchFilesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "search_files",
            "Search for a text pattern in files under a directory (recursive)",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The directory to search in"
                    },
                    "pattern": {
                        "type": "string",
                        "description": "The text or regular expression to search for"
                    }
                },
                "required": ["path", "pattern"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: SearchArgs = parse_args(arguments)?;
        let pattern = Self::compile(&args.pattern)?;

        let root = Path::new(&args.path);
        if !root.exists() {
            return Err(AgentError::ExecutionError(format!(
                "Path does not exist: {}",
                args.path
            )));
        }

        let mut matches = Vec::new();
        // entries that cannot be read are skipped, like grep -r does
        let entries = WalkDir::new(root).sort_by_file_name().into_iter().filter_map(|entry| {
            entry
                .map_err(|e| tracing::debug!("Skipping entry during search: {}", e))
                .ok()
        });
        for entry in entries {
            if entry.file_type().is_file() {
                Self::search_file(entry.path(), &pattern, &mut matches);
            }
        }

        if matches.is_empty() {
            return Ok("No matches found".to_string());
        }
        Ok(matches.join("\n"))
    }
}
