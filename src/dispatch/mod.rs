// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Worker pool and lifecycle orchestration.
//!
//! The [`Dispatcher`] owns the command queue and a fixed set of worker
//! threads. Each worker runs [`worker_loop`]: pop a command, hand the URL
//! to the injected [`Fetcher`], report the outcome, repeat - until the
//! queue signals end-of-stream. Shutdown is quiescent: close the queue,
//! let the backlog drain, join every worker with no timeout.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::fetch::Fetcher;
use crate::queue::{CommandKind, CommandQueue};
use crate::stats::DispatchStats;

/// Default number of parallel download workers.
pub const DEFAULT_WORKERS: usize = 3;

/// Worker pool sizing.
#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    /// Number of parallel download workers. Clamped to at least 1.
    pub workers: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Owns the queue and the worker threads bound to it.
pub struct Dispatcher {
    queue: Arc<CommandQueue>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Create the queue and spawn the worker pool.
    pub fn start(
        config: DispatchConfig,
        fetcher: Arc<dyn Fetcher>,
        stats: Arc<DispatchStats>,
    ) -> Result<Self> {
        let queue = Arc::new(CommandQueue::new());
        let count = config.workers.max(1);

        let mut workers = Vec::with_capacity(count);
        for id in 1..=count {
            let queue = queue.clone();
            let fetcher = fetcher.clone();
            let stats = stats.clone();
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, &queue, fetcher.as_ref(), &stats))
                .with_context(|| format!("failed to spawn worker thread {}", id))?;
            workers.push(handle);
        }

        tracing::info!(workers = count, "worker pool started");
        Ok(Self { queue, workers })
    }

    /// The queue producers push into.
    pub fn queue(&self) -> Arc<CommandQueue> {
        self.queue.clone()
    }

    /// Number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Close the queue and wait for every worker to terminate.
    ///
    /// In-flight downloads run to completion and the queued backlog is
    /// drained before workers observe end-of-stream; no timeout is
    /// applied. Consumes the dispatcher - there is no partial-shutdown
    /// state.
    pub fn shutdown(self) {
        self.queue.shutdown();
        for handle in self.workers {
            let name = handle
                .thread()
                .name()
                .unwrap_or("worker-?")
                .to_string();
            if handle.join().is_err() {
                tracing::error!(worker = %name, "worker thread panicked");
            }
        }
        tracing::info!("all workers terminated");
    }
}

/// One worker's lifetime: `Running -> Executing -> Running` until the pop
/// returns end-of-stream, then `Terminated`.
fn worker_loop(id: usize, queue: &CommandQueue, fetcher: &dyn Fetcher, stats: &DispatchStats) {
    tracing::debug!(worker = id, "worker started");
    while let Some(cmd) = queue.pop() {
        match cmd.kind {
            CommandKind::Download => {
                tracing::info!(worker = id, url = %cmd.payload, "downloading");
                match fetcher.fetch(&cmd.payload) {
                    Ok(()) => {
                        stats.record_completed();
                        tracing::info!(worker = id, url = %cmd.payload, "download finished");
                    }
                    // A failed job never terminates the worker or the pool.
                    Err(e) => {
                        stats.record_failed();
                        tracing::error!(worker = id, url = %cmd.payload, error = %e, "download failed");
                    }
                }
            }
        }
    }
    tracing::debug!(worker = id, "worker terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::queue::Command;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    /// Stub fetcher recording every call, optionally failing on a URL.
    struct RecordingFetcher {
        calls: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl RecordingFetcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(url: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(url.to_string()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Fetcher for RecordingFetcher {
        fn fetch(&self, url: &str) -> Result<(), FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            match &self.fail_on {
                Some(bad) if bad == url => Err(FetchError::Request("stub failure".into())),
                _ => Ok(()),
            }
        }
    }

    /// Run `shutdown` off-thread and fail the test if it does not finish
    /// within the bound.
    fn shutdown_within(dispatcher: Dispatcher, bound: Duration) {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            dispatcher.shutdown();
            tx.send(()).unwrap();
        });
        rx.recv_timeout(bound)
            .expect("dispatcher shutdown did not finish in time");
    }

    #[test]
    fn single_worker_executes_in_push_order() {
        let fetcher = Arc::new(RecordingFetcher::new());
        let stats = Arc::new(DispatchStats::new());
        let dispatcher = Dispatcher::start(
            DispatchConfig { workers: 1 },
            fetcher.clone(),
            stats.clone(),
        )
        .unwrap();

        let queue = dispatcher.queue();
        for url in ["a", "b", "c"] {
            queue.push(Command::download(url));
            stats.record_enqueued();
        }

        shutdown_within(dispatcher, Duration::from_secs(5));
        assert_eq!(fetcher.calls(), vec!["a", "b", "c"]);
        assert_eq!(stats.snapshot().completed, 3);
    }

    #[test]
    fn failed_fetch_does_not_stop_the_worker() {
        let fetcher = Arc::new(RecordingFetcher::failing_on("bad"));
        let stats = Arc::new(DispatchStats::new());
        let dispatcher =
            Dispatcher::start(DispatchConfig { workers: 1 }, fetcher.clone(), stats.clone())
                .unwrap();

        let queue = dispatcher.queue();
        for url in ["good-1", "bad", "good-2"] {
            queue.push(Command::download(url));
        }

        shutdown_within(dispatcher, Duration::from_secs(5));
        assert_eq!(fetcher.calls(), vec!["good-1", "bad", "good-2"]);

        let snap = stats.snapshot();
        assert_eq!(snap.completed, 2);
        assert_eq!(snap.failed, 1);
    }

    #[test]
    fn idle_pool_shuts_down_promptly() {
        let fetcher = Arc::new(RecordingFetcher::new());
        let stats = Arc::new(DispatchStats::new());
        let dispatcher =
            Dispatcher::start(DispatchConfig { workers: 3 }, fetcher, stats).unwrap();
        assert_eq!(dispatcher.worker_count(), 3);

        // No jobs at all: every worker is parked in pop and must be woken
        // by the shutdown broadcast.
        shutdown_within(dispatcher, Duration::from_secs(5));
    }

    #[test]
    fn zero_workers_is_clamped_to_one() {
        let fetcher = Arc::new(RecordingFetcher::new());
        let stats = Arc::new(DispatchStats::new());
        let dispatcher =
            Dispatcher::start(DispatchConfig { workers: 0 }, fetcher.clone(), stats).unwrap();
        assert_eq!(dispatcher.worker_count(), 1);

        dispatcher.queue().push(Command::download("x"));
        shutdown_within(dispatcher, Duration::from_secs(5));
        assert_eq!(fetcher.calls(), vec!["x"]);
    }
}
