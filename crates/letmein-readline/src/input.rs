//! Parsing of REPL input lines.

/// Slash commands offered for completion and listed by `/help`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/password", "submit a password for the current level (alias /pw)"),
    ("/level", "switch to an unlocked level, e.g. /level 2"),
    ("/new", "start a new game (asks for confirmation)"),
    ("/status", "show the progress the server has recorded"),
    ("/health", "check the server connection now"),
    ("/help", "show this help"),
    ("/quit", "leave the game"),
];

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text: a chat message for the level AI.
    Message(String),
    /// `/password <pw>`; empty when no argument was given.
    Password(String),
    /// `/level <n>`
    Level(u32),
    NewGame,
    Status,
    Health,
    Help,
    Quit,
    /// A slash command that could not be understood.
    Invalid(String),
}

pub fn parse(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed == "quit" || trimmed == "exit" {
        return Input::Quit;
    }
    if !trimmed.starts_with('/') {
        return Input::Message(line.to_string());
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "/password" | "/pw" => Input::Password(rest.to_string()),
        "/level" => match rest.parse::<u32>() {
            Ok(level) => Input::Level(level),
            Err(_) => Input::Invalid("Usage: /level <number>".to_string()),
        },
        "/new" => Input::NewGame,
        "/status" => Input::Status,
        "/health" => Input::Health,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        other => Input::Invalid(format!("Unknown command: {}", other)),
    }
}

/// Interprets an answer to a yes/no prompt.
pub fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
