// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use webgrab::config::Config;
use webgrab::console::run_console;
use webgrab::dispatch::{DispatchConfig, Dispatcher};
use webgrab::fetch::HttpFetcher;
use webgrab::stats::DispatchStats;

/// Concurrent download dispatcher with an interactive console.
#[derive(Parser, Debug)]
#[command(name = "webgrab", version, about)]
struct Cli {
    /// Number of parallel download workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Directory downloads are saved into
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Log filter, e.g. "info" or "webgrab=debug" (overrides WEBGRAB_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

/// Initialize the tracing subscriber. Precedence: --log-level flag, then
/// the WEBGRAB_LOG environment variable, then "warn".
fn init_logging(level: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env("WEBGRAB_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });
    config.apply_cli(cli.workers, cli.output_dir);

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let stats = Arc::new(DispatchStats::new());
    let fetcher = Arc::new(HttpFetcher::new(&config.output_dir)?);
    let dispatcher = Dispatcher::start(
        DispatchConfig {
            workers: config.workers,
        },
        fetcher,
        stats.clone(),
    )?;

    let queue = dispatcher.queue();
    let workers = dispatcher.worker_count();
    run_console(&queue, &stats, workers)?;

    // Quiescent shutdown: drain the backlog, wake every parked worker,
    // join them all.
    dispatcher.shutdown();
    println!("Service terminated.");
    Ok(())
}
