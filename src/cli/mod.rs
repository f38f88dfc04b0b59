// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! CLI module for the webgrab console.
//!
//! Line parsing plus the interactive input layer:
//! - **Tab Completion**: press Tab to complete a partial command word
//! - **Hints**: dim inline suggestion while typing
//! - **History**: arrow keys navigate persisted command history
//!
//! ## Example
//!
//! ```no_run
//! use webgrab::cli::{parse_line, ConsoleCommand, InteractiveInput};
//!
//! let mut input = InteractiveInput::new()?;
//! loop {
//!     match input.read_line("> ")? {
//!         Some(line) => match parse_line(&line) {
//!             ConsoleCommand::Download(url) => println!("queue {}", url),
//!             ConsoleCommand::Quit => break,
//!             _ => println!("Unknown command."),
//!         },
//!         None => break, // EOF
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod completer;
pub mod input;

use colored::Colorize;

pub use completer::{CommandInfo, ConsoleCompleter, COMMANDS};
pub use input::{InteractiveInput, SimpleInput};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `download <url>` - queue a download. The URL is the remainder of
    /// the line, trimmed of surrounding whitespace but otherwise untouched.
    Download(String),
    /// `quit` - drain the queue and exit.
    Quit,
    /// `help` - show the command summary.
    Help,
    /// `status` - show queue depth and counters.
    Status,
    /// Blank line; the console just re-prompts.
    Empty,
    /// Anything else, reported back to the user.
    Unknown(String),
}

/// Parse one console line into a command.
///
/// Command words are exact and lowercase. A `download` with no URL is an
/// unknown command - rejecting blank payloads at the parse boundary beats
/// queuing a job guaranteed to fail.
pub fn parse_line(line: &str) -> ConsoleCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ConsoleCommand::Empty;
    }

    if let Some(rest) = trimmed.strip_prefix("download ") {
        let url = rest.trim();
        if url.is_empty() {
            return ConsoleCommand::Unknown(trimmed.to_string());
        }
        return ConsoleCommand::Download(url.to_string());
    }

    match trimmed {
        "quit" => ConsoleCommand::Quit,
        "help" => ConsoleCommand::Help,
        "status" => ConsoleCommand::Status,
        _ => ConsoleCommand::Unknown(trimmed.to_string()),
    }
}

/// Show all available console commands (for `help`).
pub fn show_help() {
    println!();
    println!("Available commands:");
    println!();
    for cmd in COMMANDS {
        let args = cmd.args.map_or(String::new(), |a| format!(" {}", a));
        println!(
            "  {}{} - {}",
            cmd.name.cyan(),
            args,
            cmd.description
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_download_with_url() {
        assert_eq!(
            parse_line("download http://example.com/file.zip"),
            ConsoleCommand::Download("http://example.com/file.zip".to_string())
        );
    }

    #[test]
    fn download_url_is_taken_verbatim() {
        // Query strings, fragments, whatever - no validation here.
        assert_eq!(
            parse_line("download http://h/p?q=1&x=%20"),
            ConsoleCommand::Download("http://h/p?q=1&x=%20".to_string())
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse_line("  download   http://example.com  "),
            ConsoleCommand::Download("http://example.com".to_string())
        );
        assert_eq!(parse_line("  quit  "), ConsoleCommand::Quit);
    }

    #[test]
    fn parses_control_commands() {
        assert_eq!(parse_line("quit"), ConsoleCommand::Quit);
        assert_eq!(parse_line("help"), ConsoleCommand::Help);
        assert_eq!(parse_line("status"), ConsoleCommand::Status);
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse_line(""), ConsoleCommand::Empty);
        assert_eq!(parse_line("   \t "), ConsoleCommand::Empty);
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(
            parse_line("upload x"),
            ConsoleCommand::Unknown("upload x".to_string())
        );
        // Bare "download" and a blank URL are parse errors, not jobs.
        assert_eq!(
            parse_line("download"),
            ConsoleCommand::Unknown("download".to_string())
        );
        assert_eq!(
            parse_line("download    "),
            ConsoleCommand::Unknown("download".to_string())
        );
        // Command words are case-sensitive, like the shell's.
        assert_eq!(
            parse_line("QUIT"),
            ConsoleCommand::Unknown("QUIT".to_string())
        );
    }
}
