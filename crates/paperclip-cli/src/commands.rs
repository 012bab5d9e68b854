/// A slash command typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Clear,
    /// Without a name, list the providers
    Provider(Option<String>),
    /// Without a name, list the models from the catalog
    Model(Option<String>),
    Status,
    Tools,
    Help,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    Empty,
    Command(Command),
    Message(String),
}

pub fn parse(line: &str) -> InputType {
    let line = line.trim();
    if line.is_empty() {
        return InputType::Empty;
    }
    if !line.starts_with('/') {
        return InputType::Message(line.to_string());
    }

    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let argument = words.next().map(str::to_string);

    let command = match name.as_str() {
        "/exit" | "/quit" => Command::Exit,
        "/clear" | "/new" | "/reset" => Command::Clear,
        "/provider" => Command::Provider(argument),
        "/model" => Command::Model(argument),
        "/status" => Command::Status,
        "/tools" => Command::Tools,
        "/help" | "/?" => Command::Help,
        _ => Command::Unknown(name),
    };
    InputType::Command(command)
}

pub const HELP: &str = "\
Commands:
  /exit, /quit           Leave the session
  /clear, /new, /reset   Forget the conversation so far
  /provider [name]       Show or switch the provider
  /model [name]          Show the model catalog or switch the model
  /status                Show the current configuration
  /tools                 List the tools the assistant can use
  /help                  Display this help message";
