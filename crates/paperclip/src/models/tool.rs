use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The machine readable description of a tool that is offered to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema of the arguments that the tool accepts
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition with the given name and description
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolDefinition {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A request from the model to execute one of the tools
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Correlation id issued by the provider
    pub id: String,
    /// The name of the tool to execute
    pub name: String,
    /// Untyped arguments, validated by the tool when it runs
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Same tool with the same arguments, ignoring the correlation id
    pub fn same_request(&self, other: &ToolCall) -> bool {
        self.name == other.name && self.arguments == other.arguments
    }
}

/// Two batches of calls are the same request when they match pairwise and in order
pub fn same_tool_calls(previous: &[ToolCall], current: &[ToolCall]) -> bool {
    previous.len() == current.len()
        && previous
            .iter()
            .zip(current)
            .all(|(a, b)| a.same_request(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_arguments_become_empty() {
        let call = ToolCall::new("1", "get_current_directory", json!(null));
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_same_tool_calls_ignores_ids() {
        let first = vec![ToolCall::new("a", "read_file", json!({"path": "x"}))];
        let second = vec![ToolCall::new("b", "read_file", json!({"path": "x"}))];
        assert!(same_tool_calls(&first, &second));
    }

    #[test]
    fn test_same_tool_calls_is_order_sensitive() {
        let a = ToolCall::new("1", "read_file", json!({"path": "x"}));
        let b = ToolCall::new("2", "list_directory", json!({"path": "."}));
        assert!(!same_tool_calls(
            &[a.clone(), b.clone()],
            &[b.clone(), a.clone()]
        ));
        assert!(!same_tool_calls(&[a.clone()], &[a.clone(), b]));
    }

    #[test]
    fn test_same_tool_calls_compares_arguments() {
        let first = vec![ToolCall::new("1", "run_command", json!({"command": "ls"}))];
        let second = vec![ToolCall::new("1", "run_command", json!({"command": "ls -la"}))];
        assert!(!same_tool_calls(&first, &second));
    }
}
