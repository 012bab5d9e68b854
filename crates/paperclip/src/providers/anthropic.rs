use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::base::Provider;
use crate::config::ProviderConfig;
use crate::models::message::{Message, Usage};
use crate::models::role::Role;
use crate::models::tool::{ToolCall, ToolDefinition};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MAX_TOKENS: u32 = 1024;

pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        let base = if self.config.base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            self.config.base_url.trim_end_matches('/')
        };
        format!("{}/v1/messages", base)
    }

    /// Split out the system prompt and convert the rest of the history
    ///
    /// Tool results go back as `user` turns made of `tool_result` blocks, and a
    /// run of consecutive results is collapsed into a single turn.
    fn messages_to_anthropic_spec(messages: &[Message]) -> (Option<String>, Vec<Value>) {
        let mut system = None;
        let mut anthropic_messages = Vec::new();
        let mut pending_results: Vec<Value> = Vec::new();

        for message in messages {
            if message.role != Role::Tool && !pending_results.is_empty() {
                anthropic_messages.push(json!({
                    "role": "user",
                    "content": std::mem::take(&mut pending_results),
                }));
            }

            match message.role {
                Role::System => system = Some(message.content.clone()),
                Role::Tool => pending_results.push(json!({
                    "type": "tool_result",
                    "tool_use_id": message.tool_call_id.clone().unwrap_or_default(),
                    "content": message.content,
                })),
                Role::Assistant if message.has_tool_calls() => {
                    let mut content = Vec::new();
                    if !message.content.is_empty() {
                        content.push(json!({"type": "text", "text": message.content}));
                    }
                    for tool_call in &message.tool_calls {
                        content.push(json!({
                            "type": "tool_use",
                            "id": tool_call.id,
                            "name": tool_call.name,
                            "input": tool_call.arguments,
                        }));
                    }
                    anthropic_messages.push(json!({"role": "assistant", "content": content}));
                }
                Role::User | Role::Assistant => anthropic_messages.push(json!({
                    "role": message.role,
                    "content": message.content,
                })),
            }
        }

        if !pending_results.is_empty() {
            anthropic_messages.push(json!({"role": "user", "content": pending_results}));
        }

        (system, anthropic_messages)
    }

    fn tools_to_anthropic_spec(tools: &[ToolDefinition]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.parameters,
                })
            })
            .collect()
    }

    fn get_usage(data: &Value) -> Usage {
        let input_tokens = data["usage"]["input_tokens"].as_u64().unwrap_or(0);
        let output_tokens = data["usage"]["output_tokens"].as_u64().unwrap_or(0);
        Usage::new(input_tokens, output_tokens, input_tokens + output_tokens)
    }

    fn response_to_message(response: &Value) -> Result<Message> {
        let blocks = response
            .get("content")
            .and_then(Value::as_array)
            .filter(|blocks| !blocks.is_empty())
            .ok_or_else(|| anyhow!("no response from API"))?;

        let mut message = Message::assistant("");
        for block in blocks {
            match block["type"].as_str() {
                Some("text") => message
                    .content
                    .push_str(block["text"].as_str().unwrap_or_default()),
                Some("tool_use") => {
                    let arguments = match &block["input"] {
                        Value::Object(input) => input.clone(),
                        _ => Map::new(),
                    };
                    message = message.with_tool_call(ToolCall {
                        id: block["id"].as_str().unwrap_or_default().to_string(),
                        name: block["name"].as_str().unwrap_or_default().to_string(),
                        arguments,
                    });
                }
                _ => {}
            }
        }

        Ok(message.with_usage(Self::get_usage(response)))
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow!("API error: {} - {}", status, body))
            }
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn generate(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message> {
        let (system, anthropic_messages) = Self::messages_to_anthropic_spec(messages);

        let mut payload = json!({
            "model": self.config.model,
            "max_tokens": MAX_TOKENS,
            "messages": anthropic_messages,
        });

        if let Some(system) = system.filter(|s| !s.is_empty()) {
            payload["system"] = json!(system);
        }
        let tools_spec = Self::tools_to_anthropic_spec(tools);
        if !tools_spec.is_empty() {
            payload["tools"] = json!(tools_spec);
        }

        tracing::debug!(model = %self.config.model, messages = messages.len(), "anthropic request");
        let response = self.post(payload).await?;

        Self::response_to_message(&response)
    }

    fn config(&self) -> ProviderConfig {
        self.config.clone()
    }

    fn update_config(&mut self, config: ProviderConfig) {
        self.config = config;
    }
}
