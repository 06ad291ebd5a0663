//! The command surface of the controller

use crate::algorithms::errors::EngineError;
use crate::algorithms::Algorithm;
use std::str::FromStr;
use thiserror::Error;

/// Every input the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SelectAlgorithm(Algorithm),
    /// `None` clears the target
    SetTarget(Option<i32>),
    Start,
    Stop,
    Reset,
    ToggleStepMode,
    StepForward,
    StepBackward,
    /// Live-mode speed divisor, at least 1
    SetSpeed(u32),
    /// Re-fetch the dataset from the array source
    LoadNewArray,
    /// Hand an array to the array source for later runs
    SubmitArray(Vec<i32>),
}

/// Errors raised while parsing a textual command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument { command: &'static str, value: String },

    #[error(transparent)]
    UnknownAlgorithm(#[from] EngineError),
}

fn parse_int<T: FromStr>(command: &'static str, value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parse one line such as `start`, `select bubble sort` or `target 5`
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "start" | "run" => Command::Start,
            "stop" => Command::Stop,
            "reset" => Command::Reset,
            "toggle" | "mode" => Command::ToggleStepMode,
            "next" | "forward" | "n" => Command::StepForward,
            "prev" | "back" | "p" => Command::StepBackward,
            "load" => Command::LoadNewArray,
            "select" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "select",
                        expected: "an algorithm name",
                    });
                }
                Command::SelectAlgorithm(rest.parse()?)
            }
            "target" => match rest {
                "" => {
                    return Err(CommandError::MissingArgument {
                        command: "target",
                        expected: "an integer or 'none'",
                    })
                }
                "none" | "clear" => Command::SetTarget(None),
                value => Command::SetTarget(Some(parse_int("target", value)?)),
            },
            "speed" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "speed",
                        expected: "a positive integer",
                    });
                }
                Command::SetSpeed(parse_int("speed", rest)?)
            }
            "submit" => {
                let numbers = rest
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(|s| parse_int("submit", s))
                    .collect::<Result<Vec<i32>, _>>()?;
                if numbers.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "submit",
                        expected: "a list of integers",
                    });
                }
                Command::SubmitArray(numbers)
            }
            _ => return Err(CommandError::Unknown(line.to_string())),
        };

        Ok(command)
    }
}
