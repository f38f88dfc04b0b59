// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! webgrab - concurrent download dispatcher library
//!
//! An interactive console feeds a blocking multi-producer/multi-consumer
//! command queue; a fixed pool of worker threads drains it, handing each
//! URL to an injected fetch collaborator. Shutdown is quiescent: the
//! backlog drains, every blocked worker wakes, and the pool joins with no
//! timeout.
//!
//! # Core Modules
//!
//! - [`queue`] - the blocking command queue with its shutdown protocol
//! - [`dispatch`] - worker pool and lifecycle orchestration
//! - [`fetch`] - the `Fetcher` collaborator workers call
//! - [`console`] - the interactive command loop
//! - [`cli`] - line parsing, completion and input handling
//! - [`stats`] - session counters behind the `status` command
//! - [`config`] - defaults, config file and CLI overrides

pub mod cli;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod fetch;
pub mod queue;
pub mod stats;

// Re-export the types most callers wire together
pub use cli::{parse_line, ConsoleCommand};
pub use config::Config;
pub use console::run_console;
pub use dispatch::{DispatchConfig, Dispatcher, DEFAULT_WORKERS};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use queue::{Command, CommandKind, CommandQueue};
pub use stats::{DispatchStats, StatsSnapshot};
