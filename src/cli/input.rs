// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interactive input handling for the webgrab console.
//!
//! Wraps rustyline with tab completion, inline hints and persisted
//! history. [`SimpleInput`] is the fallback for piped stdin, where an
//! editor would be wrong.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::history::DefaultHistory;
use rustyline::{ColorMode, CompletionType, Config, EditMode, Editor};

use super::completer::ConsoleCompleter;

/// History file name in the config directory.
const HISTORY_FILE: &str = "history.txt";

/// Maximum history entries to keep.
const MAX_HISTORY_ENTRIES: usize = 1000;

/// Interactive input handler with tab completion and history.
pub struct InteractiveInput {
    editor: Editor<ConsoleCompleter, DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl InteractiveInput {
    /// Create a new interactive input handler.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .history_ignore_dups(true)?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .color_mode(ColorMode::Enabled)
            .auto_add_history(true)
            .max_history_size(MAX_HISTORY_ENTRIES)?
            .build();

        let mut editor =
            Editor::with_config(config).context("failed to create input editor")?;
        editor.set_helper(Some(ConsoleCompleter::new()));

        // Bind Tab to complete
        editor.bind_sequence(
            rustyline::KeyEvent::new('\t', rustyline::Modifiers::NONE),
            rustyline::Cmd::Complete,
        );

        let history_path = Self::history_path();
        if let Some(ref path) = history_path {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Path to the history file.
    fn history_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".webgrab").join(HISTORY_FILE))
    }

    /// Read a line of input with the given prompt.
    ///
    /// Returns `Ok(Some(line))` on input, `Ok(None)` on EOF (Ctrl+D).
    /// Ctrl+C clears the line and is reported as an empty string so the
    /// caller just re-prompts.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                self.save_history();
                Ok(Some(line))
            }
            Err(rustyline::error::ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(rustyline::error::ReadlineError::Eof) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("input error: {}", e)),
        }
    }

    /// Save history to file.
    fn save_history(&mut self) {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }
    }
}

/// Plain buffered input for non-interactive stdin (pipes, redirects).
pub struct SimpleInput {
    reader: std::io::BufReader<std::io::Stdin>,
}

impl SimpleInput {
    /// Create a new simple input handler.
    pub fn new() -> Self {
        Self {
            reader: std::io::BufReader::new(std::io::stdin()),
        }
    }

    /// Read a line without completion or history.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        use std::io::{BufRead, Write};

        print!("{}", prompt);
        std::io::stdout().flush()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None), // EOF
            Ok(_) => Ok(Some(line.trim_end().to_string())),
            Err(e) => Err(anyhow::anyhow!("input error: {}", e)),
        }
    }
}

impl Default for SimpleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_path_is_under_home() {
        if let Some(path) = InteractiveInput::history_path() {
            assert!(path.ends_with(".webgrab/history.txt"));
        }
    }

    #[test]
    fn simple_input_creation() {
        let _input = SimpleInput::new();
    }
}
