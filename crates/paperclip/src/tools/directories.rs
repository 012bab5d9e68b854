use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fs;

use super::{parse_args, Tool};
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::ToolDefinition;

#[derive(Deserialize)]
struct PathArgs {
    path: String,
}

pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "list_directory",
            "List all files and subdirectories in a directory",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The path to the directory to list"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: PathArgs = parse_args(arguments)?;

        let read_dir = fs::read_dir(&args.path).map_err(|e| {
            AgentError::ExecutionError(format!("Failed to read directory: {}", e))
        })?;

        let mut entries = read_dir
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AgentError::ExecutionError(format!("Failed to read directory: {}", e)))?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut listing = format!("Contents of {}:\n", args.path);
        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = entry.metadata().map_err(|e| {
                AgentError::ExecutionError(format!("Failed to read metadata of {}: {}", name, e))
            })?;

            if metadata.is_dir() {
                listing.push_str(&format!("  [DIR]  {}\n", name));
            } else {
                listing.push_str(&format!("  [FILE] {} ({} bytes)\n", name, metadata.len()));
            }
        }

        Ok(listing)
    }
}

pub struct CreateDirectoryTool;

#[async_trait]
impl Tool for CreateDirectoryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_directory",
            "Create a new directory (and any missing parent directories)",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The directory path to create"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: PathArgs = parse_args(arguments)?;
        fs::create_dir_all(&args.path).map_err(|e| {
            AgentError::ExecutionError(format!("Failed to create directory: {}", e))
        })?;
        Ok(format!("Successfully created directory {}", args.path))
    }
}

pub struct GetCurrentDirectoryTool;

#[async_trait]
impl Tool for GetCurrentDirectoryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_current_directory",
            "Get the current working directory",
            json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    async fn execute(&self, _arguments: &Map<String, Value>) -> AgentResult<String> {
        let cwd = std::env::current_dir().map_err(|e| {
            AgentError::ExecutionError(format!("Failed to get current directory: {}", e))
        })?;
        Ok(cwd.display().to_string())
    }
}
