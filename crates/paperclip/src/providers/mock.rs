use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::config::ProviderConfig;
use crate::models::message::Message;
use crate::models::tool::ToolDefinition;
use crate::providers::base::Provider;

/// A mock provider that returns pre-configured responses for testing
///
/// Clones share state, so a test can keep one handle and give another to the agent.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<Message, String>>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    config: ProviderConfig,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    /// Like `new`, but any entry may be a failure with the given cause
    pub fn with_results(responses: Vec<Result<Message, String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Default::default()
        }
    }

    /// Number of generate calls made so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The history passed to each generate call, in order
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(&self, messages: &[Message], _tools: &[ToolDefinition]) -> Result<Message> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty response if no more pre-configured responses
            Ok(Message::assistant(""))
        } else {
            responses.remove(0).map_err(|cause| anyhow!(cause))
        }
    }

    fn config(&self) -> ProviderConfig {
        self.config.clone()
    }

    fn update_config(&mut self, config: ProviderConfig) {
        self.config = config;
    }
}
