//! Call history synchronization
//!
//! Keeps a read-only snapshot of the backend's call log. A load replaces the
//! snapshot wholesale or not at all; a failed load keeps the previous one.
//! Polling runs on a fixed interval from `start()` until `stop()`, and
//! anything that resolves after `stop()` is dropped on the floor.

use bridge_backend_sdk::CallBackend;
use bridge_core::{CallId, CallRecord};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::i18n::Catalog;
use crate::metrics::ConsoleMetrics;
use crate::status::{Severity, StatusKey};

/// Result of a single `load()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Snapshot replaced
    Applied { records: usize },
    /// A newer load was applied first; this result was discarded
    Stale,
    /// Fetch failed; previous snapshot kept
    Failed,
    /// The synchronizer was stopped before or while loading
    Detached,
}

/// Point-in-time copy of the synchronizer state
#[derive(Debug, Clone)]
pub struct HistoryView {
    /// True until the first load completes
    pub loading: bool,
    pub records: Arc<Vec<CallRecord>>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Snapshot {
    records: Arc<Vec<CallRecord>>,
    loading: bool,
    applied_seq: u64,
    last_synced_at: Option<DateTime<Utc>>,
}

struct Inner {
    backend: Arc<dyn CallBackend>,
    snapshot: RwLock<Snapshot>,
    next_seq: AtomicU64,
    poll_interval: Duration,
    detached: CancellationToken,
    poller: Mutex<Option<JoinHandle<()>>>,
    metrics: ConsoleMetrics,
}

#[derive(Clone)]
pub struct HistorySynchronizer {
    inner: Arc<Inner>,
}

impl HistorySynchronizer {
    pub fn new(backend: Arc<dyn CallBackend>, poll_interval: Duration, metrics: ConsoleMetrics) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                snapshot: RwLock::new(Snapshot {
                    records: Arc::new(Vec::new()),
                    loading: true,
                    applied_seq: 0,
                    last_synced_at: None,
                }),
                next_seq: AtomicU64::new(0),
                poll_interval,
                detached: CancellationToken::new(),
                poller: Mutex::new(None),
                metrics,
            }),
        }
    }

    /// Fetch the full history and replace the snapshot.
    ///
    /// Loads are numbered as they start; a result is applied only if no
    /// later-started load has been applied already.
    pub async fn load(&self) -> LoadOutcome {
        let inner = &self.inner;
        if inner.detached.is_cancelled() {
            return LoadOutcome::Detached;
        }

        let seq = inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        let result = inner.backend.call_history().await;
        inner.metrics.backend_latency.record(started.elapsed());
        inner.metrics.history_loads.inc();

        if inner.detached.is_cancelled() {
            debug!(seq, "Discarding call history that arrived after teardown");
            return LoadOutcome::Detached;
        }

        let mut snapshot = inner.snapshot.write();
        snapshot.loading = false;

        match result {
            Ok(records) if seq > snapshot.applied_seq => {
                let count = records.len();
                snapshot.records = Arc::new(records);
                snapshot.applied_seq = seq;
                snapshot.last_synced_at = Some(Utc::now());
                inner.metrics.history_records.set(count as u64);
                debug!(seq, records = count, "Call history refreshed");
                LoadOutcome::Applied { records: count }
            }
            Ok(_) => {
                debug!(seq, applied = snapshot.applied_seq, "Discarding out-of-order call history");
                LoadOutcome::Stale
            }
            Err(e) => {
                inner.metrics.history_load_failures.inc();
                warn!(seq, error = %e, "Failed to load call history");
                LoadOutcome::Failed
            }
        }
    }

    /// Load now, then every `poll_interval` until [`stop`](Self::stop).
    ///
    /// Returns false without spawning anything if polling is already running
    /// or the synchronizer has been stopped. Must be called inside a Tokio
    /// runtime.
    pub fn start(&self) -> bool {
        if self.inner.detached.is_cancelled() {
            warn!("Call history synchronizer already torn down; not restarting");
            return false;
        }

        let mut poller = self.inner.poller.lock();
        if poller.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Call history polling already running");
            return false;
        }

        let token = self.inner.detached.clone();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let period = self.inner.poll_interval;

        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(inner) = weak.upgrade() else { break };
                        let sync = HistorySynchronizer { inner };
                        tokio::select! {
                            _ = token.cancelled() => break,
                            _ = sync.load() => {}
                        }
                    }
                }
            }
            debug!("Call history polling stopped");
        }));

        info!(interval_secs = period.as_secs(), "Call history polling started");
        true
    }

    /// Cancel polling and detach. Terminal: later loads return `Detached`.
    pub fn stop(&self) {
        self.inner.detached.cancel();
        if let Some(handle) = self.inner.poller.lock().take() {
            handle.abort();
        }
    }

    pub fn is_live(&self) -> bool {
        !self.inner.detached.is_cancelled()
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn view(&self) -> HistoryView {
        let snapshot = self.inner.snapshot.read();
        HistoryView {
            loading: snapshot.loading,
            records: snapshot.records.clone(),
            last_synced_at: snapshot.last_synced_at,
        }
    }

    /// Current snapshot rendered as display rows
    pub fn rows(&self, catalog: &Catalog) -> Vec<CallRow> {
        self.view().rows(catalog)
    }
}

impl HistoryView {
    /// This view's records rendered as display rows
    pub fn rows(&self, catalog: &Catalog) -> Vec<CallRow> {
        self.records
            .iter()
            .map(|record| CallRow::from_record(record, catalog))
            .collect()
    }
}

/// One call as every history surface displays it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRow {
    pub id: CallId,
    pub timestamp: String,
    pub customer_number: String,
    pub agent_number: String,
    pub status: StatusKey,
    pub status_label: String,
    pub severity: Severity,
    pub duration: u64,
    pub duration_text: String,
}

impl CallRow {
    pub fn from_record(record: &CallRecord, catalog: &Catalog) -> Self {
        let status = StatusKey::normalize(&record.status);
        let timestamp = record
            .created_at()
            .map(|ts| ts.format("%b %-d, %Y %-I:%M %p").to_string())
            .unwrap_or_else(|| record.timestamp.clone());
        let duration_text = if record.has_duration() {
            catalog.t_with("table.seconds", &[("count", &record.duration.to_string())])
        } else {
            catalog.t("table.notAvailable")
        };

        Self {
            id: record.id.clone(),
            timestamp,
            customer_number: record.customer_number.clone(),
            agent_number: record.agent_number.clone(),
            status,
            status_label: catalog.t(status.label_key()),
            severity: status.severity(),
            duration: record.duration,
            duration_text,
        }
    }
}
