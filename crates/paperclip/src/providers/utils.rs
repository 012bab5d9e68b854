use anyhow::{anyhow, Result};
use serde_json::{json, Map, Value};

use crate::models::message::{Message, Usage};
use crate::models::tool::{ToolCall, ToolDefinition};

/// Convert internal Message format to OpenAI's API message specification
///
/// One wire message per history entry, in order. Tool call arguments travel as
/// a JSON encoded string inside `function.arguments`.
pub fn messages_to_openai_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::with_capacity(messages.len());

    for message in messages {
        let mut converted = json!({
            "role": message.role,
            "content": message.content,
        });

        if message.has_tool_calls() {
            let tool_calls: Vec<Value> = message
                .tool_calls
                .iter()
                .map(|tool_call| {
                    json!({
                        "id": tool_call.id,
                        "type": "function",
                        "function": {
                            "name": tool_call.name,
                            "arguments": Value::Object(tool_call.arguments.clone()).to_string(),
                        }
                    })
                })
                .collect();
            converted["tool_calls"] = json!(tool_calls);
        }

        if let Some(id) = &message.tool_call_id {
            converted["tool_call_id"] = json!(id);
        }

        messages_spec.push(converted);
    }

    messages_spec
}

/// Convert internal tool definitions to OpenAI's API tool specification
pub fn tools_to_openai_spec(tools: &[ToolDefinition]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

/// Convert OpenAI's API response to internal Message format
pub fn openai_response_to_message(response: &Value) -> Result<Message> {
    let reply = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| anyhow!("no response from API"))?;

    let text = reply
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut message = Message::assistant(text);

    if let Some(tool_calls) = reply.get("tool_calls").and_then(Value::as_array) {
        for tool_call in tool_calls {
            let id = tool_call["id"].as_str().unwrap_or_default().to_string();
            let name = tool_call["function"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let raw_arguments = tool_call["function"]["arguments"]
                .as_str()
                .unwrap_or_default();

            message = message.with_tool_call(ToolCall {
                arguments: parse_arguments(&id, raw_arguments),
                id,
                name,
            });
        }
    }

    Ok(message.with_usage(get_openai_usage(response)))
}

// The tool validates its own arguments, so a garbled string degrades to an
// empty object and the model sees the validation error.
fn parse_arguments(id: &str, raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(arguments) => arguments,
        Err(e) => {
            tracing::warn!(tool_call_id = id, "Could not interpret tool call arguments: {}", e);
            Map::new()
        }
    }
}

/// Read the usage block of an OpenAI style response
pub fn get_openai_usage(data: &Value) -> Usage {
    let usage = &data["usage"];

    let prompt_tokens = usage
        .get("prompt_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let completion_tokens = usage
        .get("completion_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let total_tokens = usage
        .get("total_tokens")
        .and_then(Value::as_u64)
        .unwrap_or(prompt_tokens + completion_tokens);

    Usage::new(prompt_tokens, completion_tokens, total_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;

    const OPENAI_TOOL_USE_RESPONSE: &str = r#"{
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "1",
                    "type": "function",
                    "function": {
                        "name": "example_fn",
                        "arguments": "{\"param\": \"value\"}"
                    }
                }]
            }
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 25,
            "total_tokens": 35
        }
    }"#;

    #[test]
    fn test_messages_to_openai_spec() {
        let spec = messages_to_openai_spec(&[Message::system("Be nice"), Message::user("Hello")]);

        assert_eq!(spec.len(), 2);
        assert_eq!(spec[0]["role"], "system");
        assert_eq!(spec[0]["content"], "Be nice");
        assert_eq!(spec[1]["role"], "user");
        assert_eq!(spec[1]["content"], "Hello");
        assert!(spec[1].get("tool_calls").is_none());
        assert!(spec[1].get("tool_call_id").is_none());
    }

    #[test]
    fn test_messages_to_openai_spec_tool_round() {
        let messages = vec![
            Message::user("Do two things"),
            Message::assistant("")
                .with_tool_call(ToolCall::new("call_1", "tool1", json!({"arg": "1"})))
                .with_tool_call(ToolCall::new("call_2", "tool2", json!({"arg": "2"}))),
            Message::tool("call_1", "Result 1"),
            Message::tool("call_2", "Result 2"),
        ];

        let spec = messages_to_openai_spec(&messages);

        // one wire message per result, no merging for this vendor
        assert_eq!(spec.len(), 4);
        assert_eq!(spec[1]["role"], "assistant");
        let tool_calls = spec[1]["tool_calls"].as_array().unwrap();
        assert_eq!(tool_calls.len(), 2);
        assert_eq!(tool_calls[0]["id"], "call_1");
        assert_eq!(tool_calls[0]["type"], "function");
        assert_eq!(tool_calls[0]["function"]["name"], "tool1");
        assert_eq!(tool_calls[0]["function"]["arguments"], "{\"arg\":\"1\"}");

        assert_eq!(spec[2]["role"], "tool");
        assert_eq!(spec[2]["tool_call_id"], "call_1");
        assert_eq!(spec[2]["content"], "Result 1");
        assert_eq!(spec[3]["tool_call_id"], "call_2");
    }

    #[test]
    fn test_tools_to_openai_spec() {
        let tool = ToolDefinition::new(
            "test_tool",
            "A test tool",
            json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Test parameter"
                    }
                },
                "required": ["input"]
            }),
        );

        let spec = tools_to_openai_spec(&[tool]);

        assert_eq!(spec.len(), 1);
        assert_eq!(spec[0]["type"], "function");
        assert_eq!(spec[0]["function"]["name"], "test_tool");
        assert_eq!(spec[0]["function"]["parameters"]["required"][0], "input");
        assert!(tools_to_openai_spec(&[]).is_empty());
    }

    #[test]
    fn test_openai_response_to_message_text() -> Result<()> {
        let response = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "Hello from the mainframe!"
                }
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 25,
                "total_tokens": 35
            }
        });

        let message = openai_response_to_message(&response)?;
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "Hello from the mainframe!");
        assert!(!message.has_tool_calls());
        assert_eq!(message.usage, Some(Usage::new(10, 25, 35)));
        Ok(())
    }

    #[test]
    fn test_openai_response_to_message_valid_tool_call() -> Result<()> {
        let response: Value = serde_json::from_str(OPENAI_TOOL_USE_RESPONSE)?;
        let message = openai_response_to_message(&response)?;

        assert_eq!(message.content, "");
        assert_eq!(message.tool_calls.len(), 1);
        let tool_call = &message.tool_calls[0];
        assert_eq!(tool_call.id, "1");
        assert_eq!(tool_call.name, "example_fn");
        assert_eq!(Value::Object(tool_call.arguments.clone()), json!({"param": "value"}));
        Ok(())
    }

    #[test]
    fn test_openai_response_to_message_bad_arguments() -> Result<()> {
        let mut response: Value = serde_json::from_str(OPENAI_TOOL_USE_RESPONSE)?;
        response["choices"][0]["message"]["tool_calls"][0]["function"]["arguments"] =
            json!("invalid json {");

        let message = openai_response_to_message(&response)?;
        assert_eq!(message.tool_calls[0].name, "example_fn");
        assert!(message.tool_calls[0].arguments.is_empty());
        Ok(())
    }

    #[test]
    fn test_openai_response_without_choices() {
        let err = openai_response_to_message(&json!({"choices": []})).unwrap_err();
        assert_eq!(err.to_string(), "no response from API");
    }

    #[test]
    fn test_get_openai_usage_derives_missing_total() {
        let usage = get_openai_usage(&json!({
            "usage": {"prompt_tokens": 3, "completion_tokens": 4}
        }));
        assert_eq!(usage, Usage::new(3, 4, 7));

        let usage = get_openai_usage(&json!({}));
        assert_eq!(usage, Usage::default());
    }
}
