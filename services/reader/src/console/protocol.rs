//! services/reader/src/console/protocol.rs
//!
//! Defines the line-based command protocol between the person at the terminal
//! and the shell.

use std::str::FromStr;

/// The commands a user can type, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Advance one day. Ignored on the last day.
    Next,
    /// Go back one day. Ignored on the first day.
    Prev,
    /// Re-request the current day after a failure.
    Retry,
    /// Jump to a specific day.
    Goto(u32),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Try: next, prev, retry, day <1-30>, quit")]
    Unknown(String),
    #[error("'{0}' is not a day number")]
    NotANumber(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default().to_lowercase();

        let command = match head.as_str() {
            "n" | "next" => Command::Next,
            "p" | "prev" | "previous" => Command::Prev,
            "r" | "retry" => Command::Retry,
            "q" | "quit" | "exit" => Command::Quit,
            "d" | "day" => {
                let arg = words.next().unwrap_or_default();
                Command::Goto(parse_day(arg)?)
            }
            other if !other.is_empty() && other.chars().all(|c| c.is_ascii_digit()) => {
                Command::Goto(parse_day(other)?)
            }
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };

        if words.next().is_some() {
            return Err(CommandError::Unknown(line.trim().to_string()));
        }
        Ok(command)
    }
}

fn parse_day(arg: &str) -> Result<u32, CommandError> {
    arg.parse::<u32>()
        .map_err(|_| CommandError::NotANumber(arg.to_string()))
}
