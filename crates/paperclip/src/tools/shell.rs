use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::process::Command;

use super::{parse_args, Tool};
use crate::errors::{AgentError, AgentResult};
use crate::models::tool::ToolDefinition;

#[derive(Deserialize)]
struct CommandArgs {
    command: String,
}

/// Runs a command through `sh -c` with the permissions of the current user.
///
/// Nothing is sandboxed and there is no timeout; a slow command blocks the turn.
pub struct RunCommandTool;

#[async_trait]
impl Tool for RunCommandTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "run_command",
            "Execute a shell command and return its combined stdout and stderr",
            json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "The shell command to execute"
                    }
                },
                "required": ["command"]
            }),
        )
    }

    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String> {
        let args: CommandArgs = parse_args(arguments)?;

        let output = Command::new("sh")
            .arg("-c")
            .arg(&args.command)
            .output()
            .map_err(|e| AgentError::ExecutionError(format!("Failed to run command: {}", e)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        // the model needs to see why it failed, so this is still a result
        if !output.status.success() {
            return Ok(format!(
                "Command failed: {}\nOutput:\n{}",
                output.status, combined
            ));
        }

        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: &str) -> Map<String, Value> {
        json!({"command": command}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_run_command_output() {
        let result = RunCommandTool.execute(&args("echo hello")).await.unwrap();
        assert_eq!(result, "hello\n");
    }

    #[tokio::test]
    async fn test_run_command_includes_stderr() {
        let result = RunCommandTool
            .execute(&args("echo out; echo err 1>&2"))
            .await
            .unwrap();
        assert_eq!(result, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_failing_command_is_a_result() {
        let result = RunCommandTool
            .execute(&args("echo broken; exit 3"))
            .await
            .unwrap();
        assert!(result.starts_with("Command failed: exit status: 3\nOutput:\n"), "{}", result);
        assert!(result.ends_with("broken\n"));
    }

    #[tokio::test]
    async fn test_missing_command_argument() {
        let err = RunCommandTool.execute(&Map::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidParameters(_)));
    }
}
