// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interactive console: reads lines, parses them, feeds the queue.
//!
//! The console is the only producer. `download` pushes a command and ticks
//! the enqueued counter; `quit` ends the loop - the caller then closes the
//! queue and joins the pool. End-of-input is treated like `quit` so a
//! piped session terminates instead of leaving workers parked.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use crate::cli::{parse_line, show_help, ConsoleCommand, InteractiveInput, SimpleInput};
use crate::queue::{Command, CommandQueue};
use crate::stats::DispatchStats;

/// Console prompt.
const PROMPT: &str = "> ";

/// Line source: rustyline on a TTY, plain buffered stdin otherwise.
enum ConsoleInput {
    Interactive(Box<InteractiveInput>),
    Simple(SimpleInput),
}

impl ConsoleInput {
    fn from_stdin() -> Self {
        if std::io::stdin().is_terminal() {
            match InteractiveInput::new() {
                Ok(input) => return Self::Interactive(Box::new(input)),
                Err(e) => {
                    tracing::warn!(error = %e, "falling back to plain input");
                }
            }
        }
        Self::Simple(SimpleInput::new())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            Self::Interactive(input) => input.read_line(prompt),
            Self::Simple(input) => input.read_line(prompt),
        }
    }
}

/// Run the console loop until `quit` or end-of-input.
///
/// Returns once input stops; the queue is still open at that point -
/// shutdown belongs to the dispatcher's owner.
pub fn run_console(
    queue: &Arc<CommandQueue>,
    stats: &Arc<DispatchStats>,
    workers: usize,
) -> Result<()> {
    let mut input = ConsoleInput::from_stdin();

    loop {
        let line = match input.read_line(PROMPT)? {
            Some(line) => line,
            None => {
                // EOF: treated as quit so the pool can drain and exit.
                println!();
                tracing::info!("end of input, shutting down");
                break;
            }
        };

        match parse_line(&line) {
            ConsoleCommand::Download(url) => {
                tracing::debug!(url = %url, "queueing download");
                queue.push(Command::download(url));
                stats.record_enqueued();
            }
            ConsoleCommand::Quit => {
                tracing::info!("quit requested");
                break;
            }
            ConsoleCommand::Help => show_help(),
            ConsoleCommand::Status => print_status(queue, stats, workers),
            ConsoleCommand::Empty => continue,
            ConsoleCommand::Unknown(_) => println!("Unknown command."),
        }
    }

    Ok(())
}

/// Render the `status` command.
fn print_status(queue: &CommandQueue, stats: &DispatchStats, workers: usize) {
    let snap = stats.snapshot();
    println!();
    println!(
        "  {} since {}",
        "webgrab".bold(),
        snap.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  workers:   {}", workers);
    println!("  queued:    {}", queue.len());
    println!("  enqueued:  {}", snap.enqueued);
    println!("  completed: {}", snap.completed.to_string().green());
    println!("  failed:    {}", snap.failed.to_string().red());
    if queue.dropped() > 0 {
        println!("  dropped:   {}  (pushed after shutdown)", queue.dropped());
    }
    println!();
}
