//! The local capabilities the model can call
//!
//! Every tool receives its arguments as the untyped object the model produced and
//! decodes them into its own typed struct before touching the filesystem or
//! spawning anything. A decoding failure is reported as `InvalidParameters`.
pub mod directories;
pub mod files;
pub mod search;
pub mod shell;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{ToolCall, ToolDefinition};

pub use directories::{CreateDirectoryTool, GetCurrentDirectoryTool, ListDirectoryTool};
pub use files::{
    AppendToFileTool, DeleteFileTool, EditFileTool, MoveFileTool, ReadFileLinesTool,
    ReadFileTool, WriteFileTool,
};
pub use search::SearchFilesTool;
pub use shell::RunCommandTool;

/// Core trait for a capability the agent can offer to the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and argument schema. Must not have side effects.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool, returning the text the model will see
    async fn execute(&self, arguments: &Map<String, Value>) -> AgentResult<String>;
}

/// The full tool set, in the order it is offered to the model
pub fn default_tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(ReadFileTool),
        Box::new(WriteFileTool),
        Box::new(EditFileTool),
        Box::new(ListDirectoryTool),
        Box::new(SearchFilesTool),
        Box::new(CreateDirectoryTool),
        Box::new(DeleteFileTool),
        Box::new(MoveFileTool),
        Box::new(AppendToFileTool),
        Box::new(ReadFileLinesTool),
        Box::new(GetCurrentDirectoryTool),
        Box::new(RunCommandTool),
    ]
}

/// First tool whose definition carries the given name
pub fn find_tool<'a>(tools: &'a [Box<dyn Tool>], name: &str) -> Option<&'a dyn Tool> {
    tools
        .iter()
        .find(|tool| tool.definition().name == name)
        .map(|tool| &**tool)
}

/// Decode untyped arguments into the tool's typed argument struct
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: &Map<String, Value>) -> AgentResult<T> {
    serde_json::from_value(Value::Object(arguments.clone())).map_err(|e| {
        AgentError::InvalidParameters(format!("missing or invalid arguments: {}", e))
    })
}

/// A one line, human readable description of what a call is about to do
pub fn describe_call(call: &ToolCall) -> String {
    let arg = |key: &str| call.arguments.get(key).and_then(Value::as_str);

    let described = match call.name.as_str() {
        "read_file" => arg("path").map(|path| format!("📖 Reading file: {}", path)),
        "write_file" => arg("path").map(|path| format!("✍️  Writing file: {}", path)),
        "edit_file" => arg("path").map(|path| format!("✏️  Editing file: {}", path)),
        "list_directory" => arg("path").map(|path| format!("📁 Listing directory: {}", path)),
        "search_files" => arg("path").map(|path| match arg("pattern") {
            Some(pattern) => format!("🔍 Searching in {} for: {}", path, pattern),
            None => format!("🔍 Searching in: {}", path),
        }),
        "create_directory" => arg("path").map(|path| format!("📂 Creating directory: {}", path)),
        "delete_file" => arg("path").map(|path| format!("🗑️  Deleting file: {}", path)),
        "move_file" => arg("source").map(|source| match arg("destination") {
            Some(destination) => format!("📦 Moving {} → {}", source, destination),
            None => format!("📦 Moving: {}", source),
        }),
        "append_to_file" => arg("path").map(|path| format!("➕ Appending to: {}", path)),
        "read_file_lines" => arg("path").map(|path| format!("📖 Reading lines from: {}", path)),
        "run_command" => arg("command").map(|command| format!("⚡ Running: {}", command)),
        "get_current_directory" => Some("📍 Getting current directory".to_string()),
        _ => None,
    };

    described.unwrap_or_else(|| format!("🔧 Executing: {}", call.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_default_tools_have_unique_names() {
        let names: Vec<String> = default_tools()
            .iter()
            .map(|tool| tool.definition().name)
            .collect();
        assert_eq!(names.len(), 12);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), 12);
        assert_eq!(names[0], "read_file");
        assert_eq!(names[11], "run_command");
    }

    #[test]
    fn test_definitions_are_object_schemas() {
        for tool in default_tools() {
            let definition = tool.definition();
            assert!(!definition.description.is_empty());
            assert_eq!(definition.parameters["type"], "object", "{}", definition.name);
            assert!(definition.parameters["properties"].is_object());
        }
    }

    #[test]
    fn test_find_tool() {
        let tools = default_tools();
        let tool = find_tool(&tools, "list_directory").unwrap();
        assert_eq!(tool.definition().name, "list_directory");
        assert!(find_tool(&tools, "launch_rocket").is_none());
    }

    #[test]
    fn test_parse_args_rejects_wrong_types() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct PathArgs {
            path: String,
        }

        let ok = json!({"path": "a.txt"});
        assert!(parse_args::<PathArgs>(ok.as_object().unwrap()).is_ok());

        let wrong = json!({"path": 5});
        let err = parse_args::<PathArgs>(wrong.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, AgentError::InvalidParameters(_)));

        let err = parse_args::<PathArgs>(&Map::new()).unwrap_err();
        assert!(err.to_string().contains("missing field `path`"));
    }

    #[test]
    fn test_describe_call() {
        let call = ToolCall::new("1", "list_directory", json!({"path": "./docs"}));
        assert_eq!(describe_call(&call), "📁 Listing directory: ./docs");

        let call = ToolCall::new("2", "move_file", json!({"source": "a", "destination": "b"}));
        assert_eq!(describe_call(&call), "📦 Moving a → b");

        let call = ToolCall::new("3", "search_files", json!({"path": "src"}));
        assert_eq!(describe_call(&call), "🔍 Searching in: src");

        let call = ToolCall::new("4", "read_file", json!({}));
        assert_eq!(describe_call(&call), "🔧 Executing: read_file");

        let call = ToolCall::new("5", "get_current_directory", json!({}));
        assert_eq!(describe_call(&call), "📍 Getting current directory");
    }
}
