//! Special commands parser for interactive chat mode
//!
//! Special commands are handled locally and never sent to the chat service:
//! - Show dataset statistics
//! - Show one customer's record
//! - Show or clear the transcript
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. The argument of
//! `/lookup` keeps its original case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Display dataset statistics
    Stats,

    /// Display the record of one customer
    Lookup(String),

    /// Display the transcript so far
    History,

    /// Discard the transcript and start over
    Clear,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the chat service.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognized `/` command and
/// `CommandError::MissingArgument` for `/lookup` without an identifier.
///
/// # Examples
///
/// ```
/// use scoremate::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/LOOKUP c03pvpphoy").unwrap();
/// assert_eq!(cmd, SpecialCommand::Lookup("c03pvpphoy".to_string()));
///
/// let cmd = parse_special_command("what is my score?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let argument = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match command.as_str() {
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/stats" => Ok(SpecialCommand::Stats),
        "/history" => Ok(SpecialCommand::History),
        "/clear" => Ok(SpecialCommand::Clear),
        "/lookup" => match argument {
            Some(id) => Ok(SpecialCommand::Lookup(id.to_string())),
            None => Err(CommandError::MissingArgument {
                command: "/lookup".to_string(),
                usage: "/lookup <customer_id>".to_string(),
            }),
        },
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the interactive session
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
==========================================

DATASET:
  /stats          - Show dataset statistics
  /lookup <id>    - Show the record for a customer ID

SESSION:
  /history        - Show the conversation so far
  /clear          - Start a new conversation
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit interactive mode
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the assistant
  - Mention a customer ID (e.g. "customer C03PVPPHOY") to include that
    customer's record in the assistant's context
"#
    );
}
