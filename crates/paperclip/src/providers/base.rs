use anyhow::Result;
use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::models::message::Message;
use crate::models::tool::ToolDefinition;

/// Base trait for AI providers (OpenAI, Anthropic)
///
/// An adapter translates the vendor neutral history into its wire format, makes
/// the network call and translates the reply back. Any failure (transport, non
/// success status, empty reply) is reported as an error carrying a readable cause.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next assistant message for the given history and tools
    async fn generate(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message>;

    /// The configuration the adapter is currently using
    fn config(&self) -> ProviderConfig;

    /// Replace the configuration used by subsequent calls
    fn update_config(&mut self, config: ProviderConfig);
}
