// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tab completion and hints for the webgrab console.
//!
//! Completes the console's command words (`download`, `quit`, `help`,
//! `status`) at the start of the line and shows the remainder of a
//! uniquely-matched command as a dim inline hint.

use std::borrow::Cow;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result};

/// Information about a console command.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    /// Command word (e.g. "download").
    pub name: &'static str,
    /// Short description shown in completion and help.
    pub description: &'static str,
    /// Argument placeholder for display (e.g. "<url>").
    pub args: Option<&'static str>,
}

impl CommandInfo {
    /// Create a command with no arguments.
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            args: None,
        }
    }

    /// Create a command taking an argument (shown as a placeholder).
    pub const fn with_args(
        name: &'static str,
        args: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            args: Some(args),
        }
    }

    /// Check whether this command starts with the given input.
    pub fn matches(&self, input: &str) -> bool {
        self.name.starts_with(&input.to_lowercase())
    }

    /// Display string for completion menus and help.
    pub fn display_string(&self) -> String {
        if let Some(args) = self.args {
            format!("{} {} - {}", self.name, args, self.description)
        } else {
            format!("{} - {}", self.name, self.description)
        }
    }
}

/// All console commands webgrab understands.
pub static COMMANDS: &[CommandInfo] = &[
    CommandInfo::with_args("download", "<url>", "Queue a URL for download"),
    CommandInfo::new("status", "Show queue depth and session counters"),
    CommandInfo::new("help", "Show this command summary"),
    CommandInfo::new("quit", "Drain the queue and exit"),
];

/// Console completer: command-word completion plus inline hints.
#[derive(Debug, Default)]
pub struct ConsoleCompleter;

impl ConsoleCompleter {
    /// Create a new completer.
    pub fn new() -> Self {
        Self
    }

    /// Completions for the first word of the line.
    fn complete_command(&self, input: &str) -> Vec<Pair> {
        COMMANDS
            .iter()
            .filter(|cmd| cmd.matches(input))
            .map(|cmd| Pair {
                display: cmd.display_string(),
                replacement: if cmd.args.is_some() {
                    format!("{} ", cmd.name)
                } else {
                    cmd.name.to_string()
                },
            })
            .collect()
    }

    /// Hint shown after the cursor when exactly one command matches.
    fn get_hint(&self, line: &str) -> Option<CommandHint> {
        if line.is_empty() || line.contains(' ') {
            return None;
        }

        let matches: Vec<_> = COMMANDS.iter().filter(|cmd| cmd.matches(line)).collect();
        if matches.len() != 1 {
            return None;
        }

        let cmd = matches[0];
        let remaining = &cmd.name[line.len()..];
        if remaining.is_empty() {
            return None;
        }
        let hint = if let Some(args) = cmd.args {
            format!("{} {}", remaining, args)
        } else {
            remaining.to_string()
        };
        Some(CommandHint(hint))
    }
}

/// A hint displayed after the cursor in dim text.
#[derive(Debug, Clone)]
pub struct CommandHint(String);

impl Hint for CommandHint {
    fn display(&self) -> &str {
        &self.0
    }

    fn completion(&self) -> Option<&str> {
        Some(&self.0)
    }
}

impl Completer for ConsoleCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        // Only the command word completes; URLs are free-form.
        if input.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        Ok((0, self.complete_command(input)))
    }
}

impl Hinter for ConsoleCompleter {
    type Hint = CommandHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        // Only show hint if cursor is at end of line
        if pos < line.len() {
            return None;
        }
        self.get_hint(line)
    }
}

impl Highlighter for ConsoleCompleter {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Dim gray
        Cow::Owned(format!("\x1b[90m{}\x1b[0m", hint))
    }
}

impl Validator for ConsoleCompleter {}

impl Helper for ConsoleCompleter {}
