//! In-flight request tracking & graceful draining utilities.
//!
//! Every dispatched request holds an [`InflightGuard`] for its whole lifetime.
//! Dropping the guard is the single place where a request is released: it
//! runs exactly once per request whether the request completed normally or its
//! task was cancelled (e.g. because the client went away). During shutdown the
//! tracker waits for in-flight requests to finish, bounded by a timeout.
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use tokio::time::sleep;

#[derive(Debug, Default)]
struct Counters {
    next_id: AtomicU64,
    active: AtomicU64,
    completed: AtomicU64,
    cancelled: AtomicU64,
}

/// Shared counters of requests currently being dispatched
#[derive(Debug, Clone, Default)]
pub struct InflightTracker {
    counters: Arc<Counters>,
}

impl InflightTracker {
    /// Create a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the start of a request.
    pub fn begin(&self) -> InflightGuard {
        let id = self.counters.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.counters.active.fetch_add(1, Ordering::AcqRel);
        InflightGuard {
            tracker: self.clone(),
            id,
            started_at: Instant::now(),
            finished: false,
        }
    }

    /// Requests currently in flight.
    pub fn active_requests(&self) -> u64 {
        self.counters.active.load(Ordering::Acquire)
    }

    pub fn has_active_requests(&self) -> bool {
        self.active_requests() > 0
    }

    /// Aggregate snapshot statistics.
    pub fn stats(&self) -> InflightStats {
        InflightStats {
            active: self.active_requests(),
            completed: self.counters.completed.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
        }
    }

    /// Wait until no request is in flight or the timeout elapses.
    ///
    /// Returns `true` when everything drained in time.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        let mut check_interval = Duration::from_millis(10);

        loop {
            if !self.has_active_requests() {
                tracing::info!("All in-flight requests drained");
                return true;
            }
            if start.elapsed() >= timeout {
                break;
            }

            tracing::debug!(
                active = self.active_requests(),
                elapsed = ?start.elapsed(),
                "Waiting for in-flight requests to drain"
            );

            sleep(check_interval.min(timeout.saturating_sub(start.elapsed()))).await;

            // Exponential backoff up to 1 second
            check_interval = std::cmp::min(check_interval * 2, Duration::from_secs(1));
        }

        tracing::warn!(
            active = self.active_requests(),
            ?timeout,
            "Drain timeout exceeded with requests still in flight"
        );
        false
    }
}

/// Snapshot of the tracker counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflightStats {
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
}

/// Marks one request as in flight until dropped.
#[derive(Debug)]
pub struct InflightGuard {
    tracker: InflightTracker,
    id: u64,
    started_at: Instant,
    finished: bool,
}

impl InflightGuard {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Release the request as completed.
    pub fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        let counters = &self.tracker.counters;
        counters.active.fetch_sub(1, Ordering::AcqRel);
        if self.finished {
            counters.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            counters.cancelled.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(request = self.id, elapsed = ?self.elapsed(), "Request cancelled before completion");
        }
    }
}
