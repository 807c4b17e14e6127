//! Command parsing for the REPL
//!
//! Anything that is not a built-in command is a question.

use std::path::PathBuf;

/// REPL input types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Load { path: PathBuf },
    Passages,
    Question { text: String },
    Empty,
    Unknown { input: String },
}

/// Parse a line of input into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Command::Empty;
    }

    // Bare exit sentinel
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Command::Exit;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Question {
            text: trimmed.to_string(),
        };
    };

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "passages" | "p" => Command::Passages,
        "load" if !argument.is_empty() => Command::Load {
            path: PathBuf::from(argument),
        },
        _ => Command::Unknown {
            input: trimmed.to_string(),
        },
    }
}

/// Check if input is a built-in command rather than a question
pub fn is_command(input: &str) -> bool {
    !matches!(parse(input), Command::Question { .. } | Command::Empty)
}
