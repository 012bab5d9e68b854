use std::io;

use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use console::style;

use paperclip::agent::{Agent, Response};
use paperclip::config::ProviderConfig;
use paperclip::models::message::Usage;
use paperclip::models::role::Role;
use paperclip::providers::catalog::fetch_models;
use paperclip::providers::factory::{get_provider, ProviderType};
use paperclip::tools::describe_call;

use crate::commands::{self, Command, InputType, HELP};

const PROMPT: &str = "Clippy ( 📎)>         [Help: /help]";
const THEME: &str = "zenburn";

/// Interactive loop around one agent
pub struct Session {
    agent: Agent,
    // kept so a provider can be built later even when none is active
    config: ProviderConfig,
    session_usage: Usage,
    last_response: Option<Response>,
}

impl Session {
    pub fn new(agent: Agent, config: ProviderConfig) -> Self {
        Session {
            agent,
            config,
            session_usage: Usage::default(),
            last_response: None,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        cliclack::intro(style(" paperclip ").on_magenta().black())?;
        if !self.agent.has_provider() {
            println!(
                "{}",
                style("No provider configured, set PAPERCLIP_PROVIDER or use /provider").yellow()
            );
        }

        loop {
            let line: String = match input(PROMPT).placeholder("").interact() {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => break,
                Err(e) => return Err(e.into()),
            };

            match commands::parse(&line) {
                InputType::Empty => continue,
                InputType::Command(Command::Exit) => break,
                InputType::Command(command) => self.handle_command(command).await,
                InputType::Message(text) => self.process_message(&text).await,
            }
        }

        cliclack::outro("Bye!")?;
        Ok(())
    }

    async fn process_message(&mut self, text: &str) {
        let start = self.agent.history().len();

        let spin = spinner();
        spin.start("thinking...");
        let response = self.agent.get_response(text).await;
        spin.stop("");

        // tool activity of this turn, in the order it happened
        for message in &self.agent.history()[start..] {
            for call in &message.tool_calls {
                println!("{}", style(describe_call(call)).cyan());
            }
        }

        render_response(&response);
        self.record(response);
    }

    fn record(&mut self, response: Response) {
        if let Some(usage) = response.usage {
            self.session_usage += usage;
        }
        self.last_response = Some(response);
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Exit => {}
            Command::Clear => {
                self.agent.clear_history();
                println!("{}", style("Conversation cleared").dim());
            }
            Command::Provider(None) => {
                println!("Current provider: {}", display_or_none(&self.config.provider));
                println!("Available providers: {}", ProviderType::names());
            }
            Command::Provider(Some(name)) => self.switch_provider(&name),
            Command::Model(None) => self.list_models().await,
            Command::Model(Some(name)) => {
                self.config.model = name;
                self.agent.update_config(self.config.clone());
                println!("Model set to {}", style(&self.config.model).green());
            }
            Command::Status => self.print_status(),
            Command::Tools => {
                for definition in self.agent.tool_definitions() {
                    println!("{} {}", style(&definition.name).bold(), style(&definition.description).dim());
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Unknown(name) => {
                println!("{}", style(format!("Unknown command {}, try /help", name)).red());
            }
        }
    }

    fn switch_provider(&mut self, name: &str) {
        let mut config = self.config.clone();
        config.provider = name.to_lowercase();
        // an endpoint override belongs to the previous vendor
        config.base_url.clear();

        match get_provider(config.clone()) {
            Ok(provider) => {
                self.agent.set_provider(Some(provider));
                self.config = config;
                println!("Provider set to {}", style(&self.config.provider).green());
            }
            Err(e) => {
                println!("{}", style(format!("{} (available: {})", e, ProviderType::names())).red());
            }
        }
    }

    async fn list_models(&self) {
        println!("Current model: {}", display_or_none(&self.config.model));

        let spin = spinner();
        spin.start("fetching models...");
        let result = fetch_models().await;
        spin.stop("");

        match result {
            Ok(models) => {
                for model in models {
                    println!("  {}", model);
                }
                println!("{}", style("Switch with /model <name>").dim());
            }
            Err(e) => println!("{}", style(format!("Could not fetch models: {}", e)).red()),
        }
    }

    fn print_status(&self) {
        println!("{}", self.status_report());
    }

    fn status_report(&self) -> String {
        let config = &self.config;
        let mut lines = vec![
            style("[⚙️] CONFIG STATUS").bold().to_string(),
            format!("  Provider: {}", display_or_none(&config.provider)),
            format!("  Model:    {}", display_or_none(&config.model)),
            format!("  Base URL: {}", config.effective_base_url()),
            format!("  API key:  {}", config.masked_api_key()),
            String::new(),
            style("[📊] MESSAGE BREAKDOWN").bold().to_string(),
        ];

        let history = self.agent.history();
        for role in [Role::System, Role::User, Role::Assistant, Role::Tool] {
            let count = history.iter().filter(|message| message.role == role).count();
            lines.push(format!("  {}: {}", role, count));
        }
        lines.push(format!("  Total: {}", history.len()));

        lines.push(String::new());
        lines.push(style("[📈] SESSION STATS").bold().to_string());
        match self.last_response.as_ref().and_then(|response| response.usage) {
            Some(usage) => lines.push(format!("  Last turn: {}", format_usage(&usage))),
            None => lines.push("  Last turn: none".to_string()),
        }
        lines.push(format!("  Session:   {}", format_usage(&self.session_usage)));
        let tools_used = self
            .last_response
            .as_ref()
            .map(|response| response.tools_used.join(", "))
            .unwrap_or_default();
        lines.push(format!("  Tools used last turn: {}", display_or_none(&tools_used)));
        lines.push(format!("  Tools available: {}", self.agent.tool_definitions().len()));
        let llm_status = if self.agent.has_provider() {
            "Connected"
        } else {
            "Not configured"
        };
        lines.push(format!("  LLM status: {}", llm_status));

        lines.join("\n")
    }
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() {
        "none"
    } else {
        value
    }
}

fn render_response(response: &Response) {
    if let Err(e) = print_markdown(&response.content) {
        tracing::debug!("Falling back to plain output: {}", e);
        println!("{}", response.content);
    }

    if let Some(usage) = response.usage {
        println!("{}", style(format_usage(&usage)).dim());
    }
    println!();
}

fn print_markdown(content: &str) -> Result<()> {
    bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print()?;
    Ok(())
}

fn format_usage(usage: &Usage) -> String {
    format!(
        "tokens: {} prompt, {} completion, {} total",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}
