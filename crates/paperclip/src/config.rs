use std::path::Path;
use std::str::FromStr;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::providers::factory::ProviderType;

/// Environment variables are read as PAPERCLIP_API_KEY, PAPERCLIP_MODEL, ...
pub const ENV_PREFIX: &str = "PAPERCLIP";

/// Settings shared by every provider adapter
///
/// An empty `base_url` means the vendor's public endpoint, an empty `provider`
/// means no provider is configured at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub provider: String,
}

impl ProviderConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Read an optional TOML file, then layer the environment on top of it
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("_"))
            .build()?;

        let result = config.try_deserialize();
        if let Err(err) = &result {
            tracing::debug!("Configuration error: {:?}", err);
        }
        result
    }

    pub fn is_configured(&self) -> bool {
        !self.provider.is_empty()
    }

    /// The endpoint root requests go to, resolving an empty override
    pub fn effective_base_url(&self) -> String {
        if !self.base_url.is_empty() {
            return self.base_url.clone();
        }
        match ProviderType::from_str(&self.provider) {
            Ok(provider_type) => provider_type.default_base_url().to_string(),
            Err(_) => "default".to_string(),
        }
    }

    /// Show enough of the key to recognise it without leaking it
    pub fn masked_api_key(&self) -> String {
        let key = &self.api_key;
        if key.is_empty() {
            return "not set".to_string();
        }
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 8 {
            return "***configured***".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***configured*** ({}...{})", head, tail)
    }
}
