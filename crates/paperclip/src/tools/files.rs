use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Map, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;

use super::{parse_args, Tool};
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::ToolDefinition;

fn execution_error(action: &str, e: std::io::Error) -> AgentError {
    AgentError::ExecutionError(format!("Failed to {}: {}", action, e))
}

#[derive(Deserialize)]
struct PathArgs {
    path: String,
}

#[derive(Deserialize)]
struct PathContentArgs {
    path: String,
    content: String,
}

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "read_file",
            "Read the contents of a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The path to the file to read"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: PathArgs = parse_args(arguments)?;
        fs::read_to_string(&args.path).map_err(|e| execution_error("read file", e))
    }
}

pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "write_file",
            "Write content to a file (overwrites existing content)",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The path to the file to write"
                    },
                    "content": {
                        "type": "string",
                        "description": "The content to write to the file"
                    }
                },
                "required": ["path", "content"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: PathContentArgs = parse_args(arguments)?;
        fs::write(&args.path, &args.content).map_err(|e| execution_error("write file", e))?;
        Ok(format!("Successfully wrote to {}", args.path))
    }
}

#[derive(Deserialize)]
struct EditArgs {
    path: String,
    target: String,
    replacement: String,
}

pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "edit_file",
            "Edit a file by replacing a specific target string with a replacement string",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The path to the file to edit"
                    },
                    "target": {
                        "type": "string",
                        "description": "The exact string to replace"
                    },
                    "replacement": {
                        "type": "string",
                        "description": "The new string to replace the target with"
                    }
                },
                "required": ["path", "target", "replacement"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: EditArgs = parse_args(arguments)?;

        let content = fs::read_to_string(&args.path).map_err(|e| execution_error("read file", e))?;
        if !content.contains(&args.target) {
            return Err(AgentError::ExecutionError(
                "target string not found in file".into(),
            ));
        }

        // only the first occurrence
        let new_content = content.replacen(&args.target, &args.replacement, 1);
        fs::write(&args.path, new_content).map_err(|e| execution_error("write file", e))?;

        Ok(format!("Successfully edited {}", args.path))
    }
}

pub struct AppendToFileTool;

#[async_trait]
impl Tool for AppendToFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "append_to_file",
            "Append content to the end of a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The file path to append to"
                    },
                    "content": {
                        "type": "string",
                        "description": "The content to append"
                    }
                },
                "required": ["path", "content"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: PathContentArgs = parse_args(arguments)?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&args.path)
            .map_err(|e| execution_error("open file", e))?;
        file.write_all(args.content.as_bytes())
            .map_err(|e| execution_error("append to file", e))?;

        Ok(format!("Successfully appended to {}", args.path))
    }
}

// Models send line numbers as JSON numbers, sometimes as floats
fn line_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(f64::deserialize(deserializer)? as i64)
}

#[derive(Deserialize)]
struct LineRangeArgs {
    path: String,
    #[serde(deserialize_with = "line_number")]
    start_line: i64,
    #[serde(deserialize_with = "line_number")]
    end_line: i64,
}

pub struct ReadFileLinesTool;

#[async_trait]
impl Tool for ReadFileLinesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "read_file_lines",
            "Read specific line ranges from a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The file path to read"
                    },
                    "start_line": {
                        "type": "number",
                        "description": "Starting line number (1-indexed)"
                    },
                    "end_line": {
                        "type": "number",
                        "description": "Ending line number (1-indexed)"
                    }
                },
                "required": ["path", "start_line", "end_line"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: LineRangeArgs = parse_args(arguments)?;

        let content = fs::read_to_string(&args.path).map_err(|e| execution_error("read file", e))?;
        let lines: Vec<&str> = content.split('\n').collect();
        let count = lines.len() as i64;

        if args.start_line < 1 || args.start_line > count {
            return Err(AgentError::InvalidParameters("start_line out of range".into()));
        }
        if args.end_line < args.start_line || args.end_line > count {
            return Err(AgentError::InvalidParameters("end_line out of range".into()));
        }

        let selected = &lines[(args.start_line - 1) as usize..args.end_line as usize];
        Ok(selected.join("\n"))
    }
}

pub struct DeleteFileTool;

#[async_trait]
impl Tool for DeleteFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "delete_file",
            "Delete a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "The file path to delete"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: PathArgs = parse_args(arguments)?;
        fs::remove_file(&args.path).map_err(|e| execution_error("delete file", e))?;
        Ok(format!("Successfully deleted {}", args.path))
    }
}

#[derive(Deserialize)]
struct MoveArgs {
    source: String,
    destination: String,
}

pub struct MoveFileTool;

#[async_trait]
impl Tool for MoveFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "move_file",
            "Move or rename a file",
            json!({
                "type": "object",
                "properties": {
                    "source": {
                        "type": "string",
                        "description": "The source file path"
                    },
                    "destination": {
                        "type": "string",
                        "description": "The destination file path"
                    }
                },
                "required": ["source", "destination"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: MoveArgs = parse_args(arguments)?;
        fs::rename(&args.source, &args.destination).map_err(|e| execution_error("move file", e))?;
        Ok(format!(
            "Successfully moved {} to {}",
            args.source, args.destination
        ))
    }
}
