use std::str::FromStr;

use anyhow::{anyhow, Result};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{anthropic::AnthropicProvider, base::Provider, openai::OpenAiProvider};
use crate::config::ProviderConfig;

#[derive(EnumIter, EnumString, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderType {
    OpenAi,
    Anthropic,
}

impl ProviderType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::OpenAi => super::openai::DEFAULT_BASE_URL,
            ProviderType::Anthropic => super::anthropic::DEFAULT_BASE_URL,
        }
    }

    /// Every supported provider name, e.g. "openai, anthropic"
    pub fn names() -> String {
        ProviderType::iter()
            .map(|provider| provider.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider>> {
    let provider_type = ProviderType::from_str(&config.provider)
        .map_err(|_| anyhow!("unknown provider: {}", config.provider))?;

    match provider_type {
        ProviderType::OpenAi => Ok(Box::new(OpenAiProvider::new(config)?)),
        ProviderType::Anthropic => Ok(Box::new(AnthropicProvider::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(provider: &str) -> ProviderConfig {
        ProviderConfig {
            provider: provider.to_string(),
            model: "some-model".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_provider_known_names() {
        for name in ["openai", "anthropic"] {
            let provider = get_provider(config_for(name)).unwrap();
            assert_eq!(provider.config().provider, name);
        }
    }

    #[test]
    fn test_get_provider_unknown_name() {
        let err = get_provider(config_for("gemini")).err().unwrap();
        assert_eq!(err.to_string(), "unknown provider: gemini");

        let err = get_provider(config_for("")).err().unwrap();
        assert_eq!(err.to_string(), "unknown provider: ");
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(ProviderType::names(), "openai, anthropic");
    }
}
