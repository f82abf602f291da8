//! Operator console composition root
//!
//! Wires the dial pad, dispatcher and history synchronizer to one backend
//! and owns the console lifecycle: `mount()` starts history polling,
//! `teardown()` stops it and detaches every pending completion.

use bridge_backend_sdk::CallBackend;
use bridge_core::{DependencyStatus, HealthStatus, Lead, ReadinessStatus};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::ConsoleConfig;
use crate::dispatcher::{CallDispatcher, TripleCallStatus};
use crate::history::HistorySynchronizer;
use crate::i18n::{Catalog, Language};
use crate::keypad::{DialPad, DialPadHandle};
use crate::leads::LeadRoster;
use crate::metrics::ConsoleMetrics;

/// Everything the rendering layer needs to draw the console
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView {
    pub language: Language,
    pub direction: &'static str,
    pub dial_pad: DialPad,
    pub bridge_in_progress: bool,
    pub triple_call_in_progress: bool,
    pub triple_call_status: TripleCallStatus,
    pub active_leads: Vec<Lead>,
    pub live: bool,
}

pub struct OperatorConsole {
    service_name: String,
    catalog: Catalog,
    dial_pad: DialPadHandle,
    history: HistorySynchronizer,
    dispatcher: CallDispatcher,
    metrics: ConsoleMetrics,
}

impl OperatorConsole {
    pub fn new(config: &ConsoleConfig, backend: Arc<dyn CallBackend>) -> Self {
        Self::with_roster(config, backend, LeadRoster::default_roster())
    }

    pub fn with_roster(config: &ConsoleConfig, backend: Arc<dyn CallBackend>, roster: LeadRoster) -> Self {
        let metrics = ConsoleMetrics::new();
        let catalog = Catalog::new(config.language);
        let dial_pad = DialPadHandle::new(config.customer_slots);
        let history = HistorySynchronizer::new(
            backend.clone(),
            config.history_poll_interval,
            metrics.clone(),
        );
        let dispatcher = CallDispatcher::new(
            backend,
            dial_pad.clone(),
            history.clone(),
            roster,
            catalog,
            config.triple_status_ttl,
            metrics.clone(),
        );

        Self {
            service_name: config.service.service_name.clone(),
            catalog,
            dial_pad,
            history,
            dispatcher,
            metrics,
        }
    }

    /// Start history polling. Returns false if already mounted or torn down.
    pub fn mount(&self) -> bool {
        let started = self.history.start();
        if started {
            info!(service = %self.service_name, "Console mounted");
        }
        started
    }

    /// Stop polling and drop anything still pending. Idempotent.
    pub fn teardown(&self) {
        if self.history.is_live() {
            info!(service = %self.service_name, "Console torn down");
        }
        self.history.stop();
        self.dispatcher.detach();
    }

    pub fn is_live(&self) -> bool {
        self.history.is_live()
    }

    /// Catalog for a per-request language override
    pub fn catalog_for(&self, language: Option<Language>) -> Catalog {
        language.map(Catalog::new).unwrap_or(self.catalog)
    }

    pub fn dial_pad(&self) -> &DialPadHandle {
        &self.dial_pad
    }

    pub fn history(&self) -> &HistorySynchronizer {
        &self.history
    }

    pub fn dispatcher(&self) -> &CallDispatcher {
        &self.dispatcher
    }

    pub fn roster(&self) -> &LeadRoster {
        self.dispatcher.roster()
    }

    pub fn metrics(&self) -> &ConsoleMetrics {
        &self.metrics
    }

    pub fn view(&self) -> ConsoleView {
        let language = self.catalog.language();
        ConsoleView {
            language,
            direction: language.direction(),
            dial_pad: self.dial_pad.snapshot(),
            bridge_in_progress: self.dispatcher.bridge_in_progress(),
            triple_call_in_progress: self.dispatcher.triple_call_in_progress(),
            triple_call_status: self.dispatcher.triple_call_status(),
            active_leads: self.dispatcher.active_leads(),
            live: self.is_live(),
        }
    }

    pub fn health(&self, uptime: Duration) -> HealthStatus {
        HealthStatus {
            healthy: self.is_live(),
            service_id: self.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime.as_secs(),
        }
    }

    /// Ready while mounted; the backend is reported as available once a
    /// history load has succeeded.
    pub fn readiness(&self) -> ReadinessStatus {
        let view = self.history.view();
        let latency = self.metrics.backend_latency.snapshot();
        ReadinessStatus {
            ready: self.is_live(),
            dependencies: vec![DependencyStatus {
                name: "telephony-backend".to_string(),
                available: view.last_synced_at.is_some(),
                latency_ms: (latency.samples > 0).then(|| latency.last_ms.round() as u64),
            }],
        }
    }
}

impl Drop for OperatorConsole {
    fn drop(&mut self) {
        self.teardown();
    }
}
