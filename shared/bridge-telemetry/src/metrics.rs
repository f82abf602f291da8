//! Metrics primitives

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Monotonic event count; clones share the same cell
#[derive(Debug, Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Last observed level
#[derive(Debug, Clone, Default)]
pub struct Gauge(Arc<AtomicU64>);

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, level: u64) {
        self.0.store(level, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct LatencyState {
    samples: u64,
    total_ms: f64,
    max_ms: f64,
    last_ms: f64,
}

/// Running round-trip latency summary (no sample retention)
#[derive(Debug, Clone, Default)]
pub struct LatencyTracker {
    state: Arc<Mutex<LatencyState>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySnapshot {
    pub samples: u64,
    pub mean_ms: f64,
    pub max_ms: f64,
    pub last_ms: f64,
}

impl LatencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, elapsed: Duration) {
        let ms = elapsed.as_secs_f64() * 1000.0;
        let mut state = self.state.lock();
        state.samples += 1;
        state.total_ms += ms;
        state.max_ms = state.max_ms.max(ms);
        state.last_ms = ms;
    }

    pub fn snapshot(&self) -> LatencySnapshot {
        let state = self.state.lock();
        let mean_ms = if state.samples == 0 {
            0.0
        } else {
            state.total_ms / state.samples as f64
        };
        LatencySnapshot {
            samples: state.samples,
            mean_ms,
            max_ms: state.max_ms,
            last_ms: state.last_ms,
        }
    }
}
