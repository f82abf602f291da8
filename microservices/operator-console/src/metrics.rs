//! Console metrics

use bridge_telemetry::{Counter, Gauge, LatencySnapshot, LatencyTracker};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ConsoleMetrics {
    pub bridges_submitted: Counter,
    pub bridges_failed: Counter,
    pub triple_calls_submitted: Counter,
    pub triple_calls_failed: Counter,
    pub history_loads: Counter,
    pub history_load_failures: Counter,
    pub history_records: Gauge,
    pub backend_latency: LatencyTracker,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub bridges_submitted: u64,
    pub bridges_failed: u64,
    pub triple_calls_submitted: u64,
    pub triple_calls_failed: u64,
    pub history_loads: u64,
    pub history_load_failures: u64,
    pub history_records: u64,
    pub backend_latency: LatencySnapshot,
}

impl ConsoleMetrics {
    pub fn new() -> Self {
        Self {
            bridges_submitted: Counter::new(),
            bridges_failed: Counter::new(),
            triple_calls_submitted: Counter::new(),
            triple_calls_failed: Counter::new(),
            history_loads: Counter::new(),
            history_load_failures: Counter::new(),
            history_records: Gauge::new(),
            backend_latency: LatencyTracker::new(),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            bridges_submitted: self.bridges_submitted.get(),
            bridges_failed: self.bridges_failed.get(),
            triple_calls_submitted: self.triple_calls_submitted.get(),
            triple_calls_failed: self.triple_calls_failed.get(),
            history_loads: self.history_loads.get(),
            history_load_failures: self.history_load_failures.get(),
            history_records: self.history_records.get(),
            backend_latency: self.backend_latency.snapshot(),
        }
    }
}

impl Default for ConsoleMetrics {
    fn default() -> Self {
        Self::new()
    }
}
