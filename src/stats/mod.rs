// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session counters shared between the console and the worker pool.
//!
//! Plain atomic counters - the console ticks `enqueued`, workers tick
//! `completed`/`failed`. The `status` console command renders a
//! [`StatsSnapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Live counters for the current session.
#[derive(Debug)]
pub struct DispatchStats {
    started_at: DateTime<Utc>,
    enqueued: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

impl DispatchStats {
    /// Create zeroed counters stamped with the session start time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            enqueued: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Record a command accepted by the queue.
    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a download that finished successfully.
    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a download that failed.
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters at once.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            enqueued: self.enqueued.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the session counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// When this session started.
    pub started_at: DateTime<Utc>,
    /// Commands accepted into the queue.
    pub enqueued: u64,
    /// Downloads that finished successfully.
    pub completed: u64,
    /// Downloads that failed.
    pub failed: u64,
}

impl StatsSnapshot {
    /// Commands accepted but not yet finished either way.
    pub fn pending(&self) -> u64 {
        self.enqueued.saturating_sub(self.completed + self.failed)
    }
}
