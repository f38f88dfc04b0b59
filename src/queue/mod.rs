// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command queue shared between the console and the worker pool.
//!
//! This is the coordination core of webgrab: a blocking multi-producer /
//! multi-consumer FIFO with a quiescent shutdown protocol. Consumers block
//! in [`CommandQueue::pop`] on the predicate "queue non-empty OR closed";
//! [`CommandQueue::push`] wakes one of them, [`CommandQueue::shutdown`]
//! wakes all of them. A closed queue keeps delivering its backlog - the
//! end-of-stream signal (`None`) is only ever returned once the queue is
//! both closed and empty.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// What a queued command asks a worker to do.
///
/// Only downloads exist today; shutdown is signaled out-of-band through
/// [`CommandQueue::shutdown`] rather than as a queued sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Fetch the payload URL and store the result.
    Download,
}

/// One unit of work. Immutable once constructed.
///
/// A command is owned by the queue until popped, then exclusively by the
/// popping worker for the duration of execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// What to do.
    pub kind: CommandKind,
    /// The command argument - for downloads, the URL exactly as the user
    /// typed it.
    pub payload: String,
}

impl Command {
    /// Create a download command for a URL.
    pub fn download(url: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::Download,
            payload: url.into(),
        }
    }
}

/// State guarded by the queue mutex. All transitions go through it.
#[derive(Debug, Default)]
struct Inner {
    commands: VecDeque<Command>,
    closed: bool,
    dropped: u64,
}

/// Blocking multi-producer/multi-consumer queue with quiescent shutdown.
///
/// Invariants:
/// - FIFO delivery order across all consumers combined.
/// - Exactly-once dequeue: no command is handed to more than one consumer.
/// - `closed` is monotonic; once set, `push` becomes a silent no-op.
/// - `pop` never returns `None` while commands remain queued.
#[derive(Debug, Default)]
pub struct CommandQueue {
    inner: Mutex<Inner>,
    available: Condvar,
}

impl CommandQueue {
    /// Create an open, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the state lock, recovering from poisoning.
    ///
    /// A producer that panicked mid-push must not strand every worker on a
    /// poisoned mutex; the queue state itself is a plain VecDeque + flags
    /// and stays structurally valid.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::error!("command queue mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Append a command and wake one blocked consumer.
    ///
    /// After [`shutdown`](Self::shutdown) this is a silent no-op: the
    /// command is dropped, fire-and-forget. Callers must not assume
    /// delivery.
    pub fn push(&self, cmd: Command) {
        let mut inner = self.lock();
        if inner.closed {
            inner.dropped += 1;
            tracing::debug!(payload = %cmd.payload, "push after shutdown, command dropped");
            return;
        }
        inner.commands.push_back(cmd);
        drop(inner);
        self.available.notify_one();
    }

    /// Remove and return the oldest command, blocking while the queue is
    /// open and empty.
    ///
    /// Returns `None` exactly when the queue is closed AND drained - the
    /// end-of-stream signal. Draining takes priority over termination, so
    /// a backlog queued before shutdown is always delivered.
    pub fn pop(&self) -> Option<Command> {
        let mut inner = self.lock();
        loop {
            if let Some(cmd) = inner.commands.pop_front() {
                return Some(cmd);
            }
            if inner.closed {
                return None;
            }
            // Condvar waits can wake spuriously; re-check the predicate.
            inner = self
                .available
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Close the queue and wake every blocked consumer.
    ///
    /// A single wake here could strand workers: with an empty queue, the
    /// one woken worker exits and the rest sleep forever. Idempotent.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        drop(inner);
        self.available.notify_all();
    }

    /// Number of commands currently queued.
    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    /// True when no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once [`shutdown`](Self::shutdown) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of commands silently dropped by post-shutdown pushes.
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}
