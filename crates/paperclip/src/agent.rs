use crate::config::ProviderConfig;
use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, Usage};
use crate::models::tool::{same_tool_calls, ToolCall, ToolDefinition};
use crate::prompt::system_prompt;
use crate::providers::base::Provider;
use crate::tools::{default_tools, find_tool, Tool};

pub const AGENT_NAME: &str = "Clippy";

/// Hard cap on provider round trips within one turn
pub const MAX_ITERATIONS: usize = 50;

pub const NO_PROVIDER_MESSAGE: &str =
    "I have no brain! Please configure the LLM provider in your .env file so I can think.";
pub const LOOP_DETECTED_MESSAGE: &str =
    "It looks like I'm stuck in a loop, calling the same tools with the same arguments. Let's try a different approach!";
pub const OUT_OF_MOVES_MESSAGE: &str =
    "I've run out of moves! That task took more steps than I'm allowed in a single turn.";

/// The outcome of one user turn
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub content: String,
    /// Summed over every provider call of the turn, absent without a provider
    pub usage: Option<Usage>,
    /// Names of the tools the model asked for, in request order
    pub tools_used: Vec<String>,
}

/// Agent integrates a foundational LLM with the tools it needs to pilot
///
/// The history always starts with the system message. A turn appends the user
/// input, every assistant reply and one tool result per requested call.
/// Turns must not run concurrently on the same agent.
pub struct Agent {
    name: String,
    provider: Option<Box<dyn Provider>>,
    tools: Vec<Box<dyn Tool>>,
    history: Vec<Message>,
}

impl Agent {
    /// Create a new Agent with the full tool set
    pub fn new(provider: Option<Box<dyn Provider>>) -> Self {
        Self::with_tools(provider, default_tools())
    }

    /// Create a new Agent offering only the given tools
    pub fn with_tools(provider: Option<Box<dyn Provider>>, tools: Vec<Box<dyn Tool>>) -> Self {
        Self {
            name: AGENT_NAME.to_string(),
            provider,
            tools,
            history: vec![Message::system(system_prompt(AGENT_NAME))],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn set_provider(&mut self, provider: Option<Box<dyn Provider>>) {
        self.provider = provider;
    }

    /// The active provider's configuration, or the empty one when there is none
    pub fn config(&self) -> ProviderConfig {
        self.provider
            .as_ref()
            .map(|provider| provider.config())
            .unwrap_or_default()
    }

    /// Forward a new configuration to the active provider, if any
    pub fn update_config(&mut self, config: ProviderConfig) {
        if let Some(provider) = self.provider.as_mut() {
            provider.update_config(config);
        }
    }

    /// Drop everything but the system message
    pub fn clear_history(&mut self) {
        self.history.truncate(1);
    }

    /// Run one turn: call the provider and execute the tools it asks for until it
    /// answers without tool calls, repeats itself, fails, or runs out of moves.
    pub async fn get_response(&mut self, input: &str) -> Response {
        let Some(provider) = self.provider.as_deref() else {
            return Response {
                content: NO_PROVIDER_MESSAGE.to_string(),
                usage: None,
                tools_used: Vec::new(),
            };
        };

        self.history.push(Message::user(input));

        let definitions: Vec<ToolDefinition> =
            self.tools.iter().map(|tool| tool.definition()).collect();
        let mut usage = Usage::default();
        let mut tools_used = Vec::new();
        let mut previous_calls: Option<Vec<ToolCall>> = None;

        for iteration in 0..MAX_ITERATIONS {
            tracing::debug!(iteration, history = self.history.len(), "requesting completion");

            let message = match provider.generate(&self.history, &definitions).await {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Provider call failed: {:#}", e);
                    return Response {
                        content: format!("Error contacting the mainframe: {}", e),
                        usage: Some(usage),
                        tools_used,
                    };
                }
            };

            if let Some(call_usage) = message.usage {
                usage += call_usage;
            }

            let content = message.content.clone();
            let tool_calls = message.tool_calls.clone();
            self.history.push(message);

            if tool_calls.is_empty() {
                return Response {
                    content,
                    usage: Some(usage),
                    tools_used,
                };
            }

            if previous_calls
                .as_deref()
                .is_some_and(|previous| same_tool_calls(previous, &tool_calls))
            {
                tracing::warn!(iteration, "Model repeated its previous tool calls, stopping");
                return Response {
                    content: LOOP_DETECTED_MESSAGE.to_string(),
                    usage: Some(usage),
                    tools_used,
                };
            }

            for call in &tool_calls {
                tools_used.push(call.name.clone());
                let output = match dispatch_tool_call(&self.tools, call).await {
                    Ok(output) => output,
                    Err(e) => format!("Error: {}", e),
                };
                self.history.push(Message::tool(call.id.as_str(), output));
            }

            previous_calls = Some(tool_calls);
        }

        tracing::warn!(max = MAX_ITERATIONS, "Turn exhausted its iterations");
        Response {
            content: OUT_OF_MOVES_MESSAGE.to_string(),
            usage: Some(usage),
            tools_used,
        }
    }
}

/// Dispatch a single tool call to the first tool with a matching name
async fn dispatch_tool_call(tools: &[Box<dyn Tool>], call: &ToolCall) -> AgentResult<String> {
    let tool = find_tool(tools, &call.name)
        .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

    tracing::info!(tool = %call.name, id = %call.id, "Executing tool");
    let result = tool.execute(&call.arguments).await;
    if let Err(e) = &result {
        tracing::debug!(tool = %call.name, "Tool failed: {}", e);
    }
    result
}
