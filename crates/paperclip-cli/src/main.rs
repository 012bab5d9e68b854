use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use paperclip::agent::Agent;
use paperclip::config::ProviderConfig;
use paperclip::providers::factory::get_provider;

mod commands;
mod session;

use session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Provider to use (openai or anthropic), overrides PAPERCLIP_PROVIDER
    #[arg(short, long)]
    provider: Option<String>,

    /// Model to use, overrides PAPERCLIP_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Endpoint override, overrides PAPERCLIP_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// API key, overrides PAPERCLIP_API_KEY
    #[arg(long)]
    api_key: Option<String>,

    /// TOML file read before the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Send a single message, print the answer and exit
    #[arg(short, long)]
    message: Option<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ProviderConfig) {
        let overrides = [
            (&self.provider, &mut config.provider),
            (&self.model, &mut config.model),
            (&self.base_url, &mut config.base_url),
            (&self.api_key, &mut config.api_key),
        ];
        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ProviderConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let provider = if config.is_configured() {
        match get_provider(config.clone()) {
            Ok(provider) => Some(provider),
            Err(e) => {
                eprintln!("{}", style(format!("Error: {}", e)).red());
                std::process::exit(1);
            }
        }
    } else {
        None
    };
    let mut agent = Agent::new(provider);

    if let Some(message) = &cli.message {
        let response = agent.get_response(message).await;
        println!("{}", response.content);
        return Ok(());
    }

    Session::new(agent, config).start().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_replace_given_values() {
        let cli = Cli::parse_from(["paperclip", "--provider", "anthropic", "--model", "claude-3-5-haiku-latest"]);
        let mut config = ProviderConfig {
            api_key: "sk-from-env".to_string(),
            provider: "openai".to_string(),
            ..Default::default()
        };

        cli.apply_overrides(&mut config);

        assert_eq!(config.provider, "anthropic");
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.api_key, "sk-from-env");
        assert_eq!(config.base_url, "");
    }

    #[test]
    fn test_headless_message_flag() {
        let cli = Cli::parse_from(["paperclip", "-m", "hello there"]);
        assert_eq!(cli.message.as_deref(), Some("hello there"));
        assert!(cli.config.is_none());
    }
}
