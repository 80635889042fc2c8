//! Batch progress reporting.
//!
//! One writer (the batch worker) updates a `StatusBoard`; any number of
//! readers take point-in-time snapshots. Readers tolerate momentarily
//! stale values, so a plain mutex-guarded clone is all the coordination
//! needed. The stop flag is cooperative: the worker checks it once per
//! club boundary, never mid-fetch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::Serialize;

/// Point-in-time view of a running (or finished) batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressSnapshot {
    pub running: bool,
    /// 1-based index of the club being processed.
    pub current: usize,
    pub total: usize,
    pub current_club: String,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct StatusBoard {
    state: Mutex<ProgressSnapshot>,
    stop_requested: AtomicBool,
}

impl StatusBoard {
    pub fn new() -> Self {
        StatusBoard::default()
    }

    pub fn begin(&self, total: usize) {
        let mut state = self.state.lock().unwrap();
        *state = ProgressSnapshot {
            running: true,
            total,
            ..ProgressSnapshot::default()
        };
    }

    pub fn advance(&self, index: usize, club: &str) {
        let mut state = self.state.lock().unwrap();
        state.current = index;
        state.current_club = club.to_string();
    }

    pub fn record_outcome(&self, success: bool) {
        let mut state = self.state.lock().unwrap();
        if success {
            state.successful += 1;
        } else {
            state.failed += 1;
        }
    }

    pub fn finish(&self) {
        self.state.lock().unwrap().running = false;
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.state.lock().unwrap().clone()
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }
}
