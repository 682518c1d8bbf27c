//! Host console input parsing
//!
//! Host commands start with `/`. Anything of the form `<name>: <text>` is
//! spoken by that participant: `/yes`, `/no` and `/votestatus` are ballot
//! commands, everything else is a command submitted for execution.

use ballot_domain::VoteChoice;

/// A parsed host console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// `/join <name> [--op]`
    Join { name: String, privileged: bool },
    /// `/leave <name>`
    Leave { name: String },
    /// `/who`
    Who,
    /// `/status [--json]`
    Status { json: bool },
    /// `/set`, `/set <key>` or `/set <key> <value>`
    Set {
        key: Option<String>,
        value: Option<String>,
    },
    Help,
    Quit,
    /// `<name>: /yes` or `<name>: /no`
    Vote { name: String, choice: VoteChoice },
    /// `<name>: /votestatus`
    VoteStatus { name: String },
    /// `<name>: <command>`
    Submit { name: String, command: String },
}

/// Why a console line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandParseError::Empty => write!(f, "Empty input"),
            CommandParseError::Unknown(cmd) => {
                write!(f, "Unknown command: {}\nType /help for available commands", cmd)
            }
            CommandParseError::Usage(usage) => write!(f, "Usage: {}", usage),
        }
    }
}

impl std::error::Error for CommandParseError {}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandParseError::Empty);
        }

        if line.starts_with('/') {
            return Self::parse_host(line);
        }

        match line.split_once(':') {
            Some((name, text)) if is_name(name.trim()) => {
                Self::parse_spoken(name.trim(), text.trim())
            }
            _ => Err(CommandParseError::Usage("<name>: <command>")),
        }
    }

    fn parse_host(line: &str) -> Result<Self, CommandParseError> {
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match head.to_lowercase().as_str() {
            "/join" => {
                let privileged = args.contains(&"--op");
                let names: Vec<&str> = args.iter().copied().filter(|a| *a != "--op").collect();
                match names.as_slice() {
                    [name] if is_name(name) => Ok(ConsoleCommand::Join {
                        name: name.to_string(),
                        privileged,
                    }),
                    _ => Err(CommandParseError::Usage("/join <name> [--op]")),
                }
            }
            "/leave" => match args.as_slice() {
                [name] => Ok(ConsoleCommand::Leave {
                    name: name.to_string(),
                }),
                _ => Err(CommandParseError::Usage("/leave <name>")),
            },
            "/who" => Ok(ConsoleCommand::Who),
            "/status" => match args.as_slice() {
                [] => Ok(ConsoleCommand::Status { json: false }),
                ["--json"] => Ok(ConsoleCommand::Status { json: true }),
                _ => Err(CommandParseError::Usage("/status [--json]")),
            },
            "/set" => match args.as_slice() {
                [] => Ok(ConsoleCommand::Set {
                    key: None,
                    value: None,
                }),
                [key] => Ok(ConsoleCommand::Set {
                    key: Some(key.to_string()),
                    value: None,
                }),
                [key, rest @ ..] => Ok(ConsoleCommand::Set {
                    key: Some(key.to_string()),
                    value: Some(rest.join(" ")),
                }),
            },
            "/help" | "/h" | "/?" => Ok(ConsoleCommand::Help),
            "/quit" | "/exit" | "/q" => Ok(ConsoleCommand::Quit),
            _ => Err(CommandParseError::Unknown(head.to_string())),
        }
    }

    fn parse_spoken(name: &str, text: &str) -> Result<Self, CommandParseError> {
        let name = name.to_string();
        let mut words = text.split_whitespace();
        let head = words.next().map(str::to_lowercase);

        match (head.as_deref(), words.next(), words.next()) {
            (None, ..) => Err(CommandParseError::Usage("<name>: <command>")),
            (Some("/yes" | "/no"), None, _) => Ok(ConsoleCommand::Vote {
                name,
                choice: text.parse().map_err(|_| CommandParseError::Usage("/yes | /no"))?,
            }),
            (Some("/vote"), Some(choice), None) => match choice.parse() {
                Ok(choice) => Ok(ConsoleCommand::Vote { name, choice }),
                Err(_) => Err(CommandParseError::Usage("/vote <yes|no>")),
            },
            (Some("/vote"), ..) => Err(CommandParseError::Usage("/vote <yes|no>")),
            (Some("/votestatus"), None, _) => Ok(ConsoleCommand::VoteStatus { name }),
            _ => Ok(ConsoleCommand::Submit {
                name,
                command: text.to_string(),
            }),
        }
    }
}

fn is_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace) && !name.starts_with('-')
}
