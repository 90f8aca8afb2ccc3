//! Slash-command parsing for the input line.
//!
//! Lines starting with `/` are commands; anything else is a chat message.

use livechat_app::UserInput;
use livechat_client::{CustomerId, SessionId};
use thiserror::Error;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/open`
    Open,
    /// `/close`
    Close,
    /// `/toggle`
    Toggle,
    /// `/select <session_id>`
    Select {
        /// Conversation to activate.
        session_id: SessionId,
    },
    /// `/new <customer_id>`
    NewChat {
        /// Customer to start a conversation with.
        customer_id: CustomerId,
    },
    /// `/details`
    ShowDetails,
    /// `/hide`
    HideDetails,
    /// `/quit`
    Quit,
    /// Plain text.
    Message {
        /// Text as typed.
        text: String,
    },
}

/// Why an input line is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// No command by that name.
    #[error("Unknown command: {input}")]
    Unknown {
        /// The offending line.
        input: String,
    },

    /// Known command, bad arguments.
    #[error("/{command}: {error}")]
    InvalidArgs {
        /// Command name without the slash.
        command: &'static str,
        /// What was wrong.
        error: String,
    },
}

impl From<Command> for UserInput {
    fn from(command: Command) -> Self {
        match command {
            Command::Open => Self::Open,
            Command::Close => Self::Close,
            Command::Toggle => Self::Toggle,
            Command::Select { session_id } => Self::Select(session_id),
            Command::NewChat { customer_id } => Self::NewChat(customer_id),
            Command::ShowDetails => Self::ShowDetails,
            Command::HideDetails => Self::HideDetails,
            Command::Quit => Self::Quit,
            Command::Message { text } => Self::Submit(text),
        }
    }
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Message { text: line.to_string() });
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();

    match name {
        "open" => Ok(Command::Open),
        "close" => Ok(Command::Close),
        "toggle" => Ok(Command::Toggle),
        "details" => Ok(Command::ShowDetails),
        "hide" => Ok(Command::HideDetails),
        "quit" | "q" => Ok(Command::Quit),
        "select" => parse_id("select", arg).map(|session_id| Command::Select { session_id }),
        "new" => parse_id("new", arg).map(|customer_id| Command::NewChat { customer_id }),
        _ => Err(CommandError::Unknown { input: line.trim().to_string() }),
    }
}

fn parse_id(command: &'static str, arg: Option<&str>) -> Result<u64, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::InvalidArgs {
        command,
        error: "missing id".to_string(),
    })?;
    arg.parse().map_err(|_| CommandError::InvalidArgs {
        command,
        error: format!("'{arg}' is not a valid id"),
    })
}
