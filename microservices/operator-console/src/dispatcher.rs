//! Bridge and triple-call dispatch
//!
//! Two request kinds, each with its own at-most-one-in-flight guard. Invalid
//! input is a silent no-op; backend failures come back as a generic
//! operator-facing message and are only distinguished in the logs.

use bridge_backend_sdk::CallBackend;
use bridge_core::Lead;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::history::HistorySynchronizer;
use crate::i18n::Catalog;
use crate::keypad::DialPadHandle;
use crate::leads::LeadRoster;
use crate::metrics::ConsoleMetrics;

/// Why a submission was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    MissingAgent,
    NoCustomerNumbers,
    NoLeads,
    InFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BridgeOutcome {
    Ignored { reason: IgnoreReason },
    Initiated { numbers: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TripleCallOutcome {
    Ignored { reason: IgnoreReason },
    Initiated { leads: usize, populated_first_slot: bool },
    Failed { message: String },
    /// Resolved after the console was torn down; nothing was updated
    Detached,
}

/// Banner for the last triple-call attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TripleCallStatus {
    pub shown: bool,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default)]
struct TripleCallState {
    status: TripleCallStatus,
    active_leads: Vec<Lead>,
    generation: u64,
    hide_task: Option<JoinHandle<()>>,
}

/// Held while a request is outstanding; releases the flag on drop, including
/// when the submitting future is dropped mid-request.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct CallDispatcher {
    backend: Arc<dyn CallBackend>,
    dial_pad: DialPadHandle,
    history: HistorySynchronizer,
    roster: LeadRoster,
    catalog: Catalog,
    status_ttl: Duration,
    bridge_in_flight: Arc<AtomicBool>,
    triple_in_flight: Arc<AtomicBool>,
    triple: Arc<Mutex<TripleCallState>>,
    metrics: ConsoleMetrics,
}

impl CallDispatcher {
    pub fn new(
        backend: Arc<dyn CallBackend>,
        dial_pad: DialPadHandle,
        history: HistorySynchronizer,
        roster: LeadRoster,
        catalog: Catalog,
        status_ttl: Duration,
        metrics: ConsoleMetrics,
    ) -> Self {
        Self {
            backend,
            dial_pad,
            history,
            roster,
            catalog,
            status_ttl,
            bridge_in_flight: Arc::new(AtomicBool::new(false)),
            triple_in_flight: Arc::new(AtomicBool::new(false)),
            triple: Arc::default(),
            metrics,
        }
    }

    /// Bridge `agent` to every non-blank entry of `customers`.
    ///
    /// On success the call history is refreshed before returning.
    pub async fn submit_bridge(&self, agent: &str, customers: &[String]) -> BridgeOutcome {
        let agent = agent.trim();
        if agent.is_empty() {
            debug!("Bridge ignored: agent number is empty");
            return BridgeOutcome::Ignored { reason: IgnoreReason::MissingAgent };
        }
        let numbers: Vec<String> = customers
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if numbers.is_empty() {
            debug!("Bridge ignored: no customer numbers");
            return BridgeOutcome::Ignored { reason: IgnoreReason::NoCustomerNumbers };
        }

        let Some(guard) = InFlightGuard::try_acquire(&self.bridge_in_flight) else {
            debug!("Bridge ignored: another bridge is in flight");
            return BridgeOutcome::Ignored { reason: IgnoreReason::InFlight };
        };

        let request_id = Uuid::new_v4();
        self.metrics.bridges_submitted.inc();
        info!(%request_id, agent = %agent, numbers = ?numbers, "Submitting bridge call");

        let started = Instant::now();
        let result = self.backend.trigger_target_call(agent, &numbers).await;
        self.metrics.backend_latency.record(started.elapsed());
        drop(guard);

        match result {
            Ok(()) => {
                info!(%request_id, numbers = numbers.len(), "Bridge call initiated");
                self.history.load().await;
                BridgeOutcome::Initiated { numbers: numbers.len() }
            }
            Err(e) => {
                self.metrics.bridges_failed.inc();
                error!(
                    %request_id,
                    error = %e,
                    transport = e.is_transport(),
                    "Failed to bridge call"
                );
                BridgeOutcome::Failed {
                    message: self.catalog.t("bridge.failed"),
                }
            }
        }
    }

    /// [`submit_bridge`](Self::submit_bridge) with the dial pad's current values
    pub async fn submit_bridge_from_pad(&self) -> BridgeOutcome {
        let pad = self.dial_pad.snapshot();
        self.submit_bridge(pad.agent(), pad.customers()).await
    }

    /// Dial every lead in the roster for `agent`.
    ///
    /// Success or failure, the outcome is posted as a [`TripleCallStatus`]
    /// that hides itself after the configured delay, and the history is
    /// refreshed.
    pub async fn submit_triple_call(&self, agent: &str) -> TripleCallOutcome {
        let agent = agent.trim();
        if agent.is_empty() {
            debug!("Triple call ignored: agent number is empty");
            return TripleCallOutcome::Ignored { reason: IgnoreReason::MissingAgent };
        }
        if self.roster.is_empty() {
            debug!("Triple call ignored: lead roster is empty");
            return TripleCallOutcome::Ignored { reason: IgnoreReason::NoLeads };
        }

        let Some(guard) = InFlightGuard::try_acquire(&self.triple_in_flight) else {
            debug!("Triple call ignored: another triple call is in flight");
            return TripleCallOutcome::Ignored { reason: IgnoreReason::InFlight };
        };

        let request_id = Uuid::new_v4();
        let numbers = self.roster.phone_numbers();
        let blank_before = self.dial_pad.snapshot().all_customers_blank();
        self.metrics.triple_calls_submitted.inc();
        info!(%request_id, agent = %agent, leads = numbers.len(), "Submitting triple call");

        let started = Instant::now();
        let result = self.backend.trigger_target_call(agent, &numbers).await;
        self.metrics.backend_latency.record(started.elapsed());

        if !self.history.is_live() {
            debug!(%request_id, "Triple call resolved after teardown; discarding");
            return TripleCallOutcome::Detached;
        }

        let outcome = match result {
            Ok(()) => {
                let populated_first_slot = blank_before && self.populate_first_slot();
                let message = self
                    .catalog
                    .t_with("triple.success", &[("count", &numbers.len().to_string())]);
                info!(%request_id, leads = numbers.len(), populated_first_slot, "Triple call initiated");
                self.post_triple_status(
                    TripleCallStatus {
                        shown: true,
                        success: true,
                        message,
                    },
                    self.roster.leads().to_vec(),
                );
                TripleCallOutcome::Initiated {
                    leads: numbers.len(),
                    populated_first_slot,
                }
            }
            Err(e) => {
                self.metrics.triple_calls_failed.inc();
                error!(
                    %request_id,
                    error = %e,
                    transport = e.is_transport(),
                    "Failed to initiate triple call"
                );
                let message = self.catalog.t("triple.failed");
                self.post_triple_status(
                    TripleCallStatus {
                        shown: true,
                        success: false,
                        message: message.clone(),
                    },
                    Vec::new(),
                );
                TripleCallOutcome::Failed { message }
            }
        };

        // The banner and slot 0 are settled; only the refresh remains
        drop(guard);
        self.history.load().await;
        outcome
    }

    /// Triple call for the agent currently on the dial pad
    pub async fn submit_triple_call_from_pad(&self) -> TripleCallOutcome {
        let agent = self.dial_pad.snapshot().agent().to_string();
        self.submit_triple_call(&agent).await
    }

    pub fn bridge_in_progress(&self) -> bool {
        self.bridge_in_flight.load(Ordering::Acquire)
    }

    pub fn triple_call_in_progress(&self) -> bool {
        self.triple_in_flight.load(Ordering::Acquire)
    }

    pub fn triple_call_status(&self) -> TripleCallStatus {
        self.triple.lock().status.clone()
    }

    /// Leads dialed by the last successful triple call
    pub fn active_leads(&self) -> Vec<Lead> {
        self.triple.lock().active_leads.clone()
    }

    pub fn roster(&self) -> &LeadRoster {
        &self.roster
    }

    /// Drop any pending auto-hide timer
    pub fn detach(&self) {
        if let Some(handle) = self.triple.lock().hide_task.take() {
            handle.abort();
        }
    }

    /// Put the first lead's number in slot 0 if every slot is still blank
    fn populate_first_slot(&self) -> bool {
        let Some(first) = self.roster.first() else {
            return false;
        };
        self.dial_pad.update(|pad| {
            pad.all_customers_blank() && pad.set_customer(0, first.phone_number.clone()).is_ok()
        })
    }

    /// Replace the banner and restart its hide timer
    fn post_triple_status(&self, status: TripleCallStatus, active_leads: Vec<Lead>) {
        let mut state = self.triple.lock();
        state.generation += 1;
        state.status = status;
        state.active_leads = active_leads;
        if let Some(previous) = state.hide_task.take() {
            previous.abort();
        }

        let generation = state.generation;
        let ttl = self.status_ttl;
        let triple = Arc::clone(&self.triple);
        state.hide_task = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = triple.lock();
            if state.generation == generation {
                state.status.shown = false;
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::keypad::DialPadHandle;
    use crate::test_support::{call_record, ScriptedBackend};

    struct Fixture {
        backend: Arc<ScriptedBackend>,
        dial_pad: DialPadHandle,
        history: HistorySynchronizer,
        dispatcher: CallDispatcher,
    }

    fn fixture() -> Fixture {
        let backend = ScriptedBackend::new();
        let metrics = ConsoleMetrics::new();
        let dial_pad = DialPadHandle::new(3);
        let history = HistorySynchronizer::new(backend.clone(), Duration::from_secs(10), metrics.clone());
        let dispatcher = CallDispatcher::new(
            backend.clone(),
            dial_pad.clone(),
            history.clone(),
            LeadRoster::default_roster(),
            Catalog::new(Language::En),
            Duration::from_secs(5),
            metrics,
        );
        Fixture {
            backend,
            dial_pad,
            history,
            dispatcher,
        }
    }

    fn numbers(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_bridge_validation_is_a_silent_noop() {
        let fx = fixture();

        assert_eq!(
            fx.dispatcher.submit_bridge("", &numbers(&["+1"])).await,
            BridgeOutcome::Ignored { reason: IgnoreReason::MissingAgent }
        );
        assert_eq!(
            fx.dispatcher.submit_bridge("+1", &numbers(&["", " "])).await,
            BridgeOutcome::Ignored { reason: IgnoreReason::NoCustomerNumbers }
        );
        assert_eq!(
            fx.dispatcher.submit_bridge("   ", &numbers(&["+2"])).await,
            BridgeOutcome::Ignored { reason: IgnoreReason::MissingAgent }
        );

        assert!(fx.backend.triggers().is_empty());
        assert_eq!(fx.backend.history_requests(), 0);
        assert!(!fx.dispatcher.bridge_in_progress());
    }

    #[tokio::test]
    async fn test_bridge_sends_only_non_blank_numbers_and_refreshes() {
        let fx = fixture();
        fx.backend.set_history(vec![call_record("CA1", "queued")]);

        let outcome = fx
            .dispatcher
            .submit_bridge("+15550100", &numbers(&["+15550101", " ", " +15550102 "]))
            .await;

        assert_eq!(outcome, BridgeOutcome::Initiated { numbers: 2 });
        let triggers = fx.backend.triggers();
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].agent, "+15550100");
        assert_eq!(triggers[0].numbers, vec!["+15550101", "+15550102"]);
        assert_eq!(fx.backend.history_requests(), 1);
        assert_eq!(fx.history.view().records.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_bridge_rejected_while_first_outstanding() {
        let fx = fixture();
        fx.backend.push_trigger(Duration::from_secs(2), Ok(()));

        let first = tokio::spawn({
            let dispatcher = fx.dispatcher.clone();
            async move { dispatcher.submit_bridge("+1", &["+2".to_string()]).await }
        });
        while !fx.dispatcher.bridge_in_progress() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            fx.dispatcher.submit_bridge("+1", &numbers(&["+3"])).await,
            BridgeOutcome::Ignored { reason: IgnoreReason::InFlight }
        );
        assert_eq!(fx.backend.triggers().len(), 1);

        assert_eq!(first.await.unwrap(), BridgeOutcome::Initiated { numbers: 1 });
        assert!(!fx.dispatcher.bridge_in_progress());

        assert_eq!(
            fx.dispatcher.submit_bridge("+1", &numbers(&["+3"])).await,
            BridgeOutcome::Initiated { numbers: 1 }
        );
        assert_eq!(fx.backend.triggers().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_bridge_releases_guard_without_refresh() {
        let fx = fixture();
        fx.backend.fail_next_trigger(500);

        let outcome = fx.dispatcher.submit_bridge("+1", &numbers(&["+2"])).await;
        assert_eq!(
            outcome,
            BridgeOutcome::Failed {
                message: "Failed to initiate call".to_string()
            }
        );
        assert!(!fx.dispatcher.bridge_in_progress());
        assert_eq!(fx.backend.history_requests(), 0);

        assert_eq!(
            fx.dispatcher.submit_bridge("+1", &numbers(&["+2"])).await,
            BridgeOutcome::Initiated { numbers: 1 }
        );
    }

    #[tokio::test]
    async fn test_bridge_from_pad_uses_current_fields() {
        let fx = fixture();
        fx.dial_pad.set_agent("+15550100");
        fx.dial_pad.set_customer(1, "+15550109").unwrap();

        let outcome = fx.dispatcher.submit_bridge_from_pad().await;
        assert_eq!(outcome, BridgeOutcome::Initiated { numbers: 1 });
        assert_eq!(fx.backend.triggers()[0].numbers, vec!["+15550109"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_and_triple_call_do_not_block_each_other() {
        let fx = fixture();
        fx.backend.push_trigger(Duration::from_secs(2), Ok(()));

        let bridge = tokio::spawn({
            let dispatcher = fx.dispatcher.clone();
            async move { dispatcher.submit_bridge("+1", &["+2".to_string()]).await }
        });
        while !fx.dispatcher.bridge_in_progress() {
            tokio::task::yield_now().await;
        }

        let triple = fx.dispatcher.submit_triple_call("+1").await;
        assert!(matches!(triple, TripleCallOutcome::Initiated { leads: 3, .. }));
        assert!(fx.dispatcher.bridge_in_progress());

        assert_eq!(bridge.await.unwrap(), BridgeOutcome::Initiated { numbers: 1 });
    }

    #[tokio::test]
    async fn test_triple_call_populates_first_slot_when_all_blank() {
        let fx = fixture();

        let outcome = fx.dispatcher.submit_triple_call("+15550100").await;
        assert_eq!(
            outcome,
            TripleCallOutcome::Initiated {
                leads: 3,
                populated_first_slot: true
            }
        );

        let triggers = fx.backend.triggers();
        assert_eq!(triggers[0].numbers, LeadRoster::default_roster().phone_numbers());
        assert_eq!(fx.dial_pad.snapshot().customers(), &["+972500000001", "", ""]);

        let status = fx.dispatcher.triple_call_status();
        assert!(status.shown);
        assert!(status.success);
        assert_eq!(status.message, "Successfully initiated calls to 3 leads");
        assert_eq!(fx.dispatcher.active_leads().len(), 3);
        assert_eq!(fx.backend.history_requests(), 1);
        assert!(!fx.dispatcher.triple_call_in_progress());
    }

    #[tokio::test]
    async fn test_triple_call_never_overwrites_operator_input() {
        let fx = fixture();
        fx.dial_pad.set_customer(2, "+15550177").unwrap();

        let outcome = fx.dispatcher.submit_triple_call("+15550100").await;
        assert_eq!(
            outcome,
            TripleCallOutcome::Initiated {
                leads: 3,
                populated_first_slot: false
            }
        );
        assert_eq!(fx.dial_pad.snapshot().customers(), &["", "", "+15550177"]);
    }

    #[tokio::test]
    async fn test_triple_call_failure_posts_generic_message() {
        let fx = fixture();
        fx.backend.fail_next_trigger(503);

        let outcome = fx.dispatcher.submit_triple_call("+15550100").await;
        assert_eq!(
            outcome,
            TripleCallOutcome::Failed {
                message: "Failed to initiate calls".to_string()
            }
        );

        let status = fx.dispatcher.triple_call_status();
        assert!(status.shown);
        assert!(!status.success);
        assert!(fx.dispatcher.active_leads().is_empty());
        assert!(fx.dial_pad.snapshot().all_customers_blank());
        assert_eq!(fx.backend.history_requests(), 1);
        assert!(!fx.dispatcher.triple_call_in_progress());
    }

    #[tokio::test]
    async fn test_triple_call_requires_agent() {
        let fx = fixture();
        assert_eq!(
            fx.dispatcher.submit_triple_call(" ").await,
            TripleCallOutcome::Ignored { reason: IgnoreReason::MissingAgent }
        );
        assert!(fx.backend.triggers().is_empty());
        assert!(!fx.dispatcher.triple_call_status().shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_triple_status_hides_after_five_seconds() {
        let fx = fixture();
        fx.dispatcher.submit_triple_call("+1").await;

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert!(fx.dispatcher.triple_call_status().shown);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let status = fx.dispatcher.triple_call_status();
        assert!(!status.shown);
        assert_eq!(status.message, "Successfully initiated calls to 3 leads");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_triple_call_resets_hide_timer() {
        let fx = fixture();
        fx.dispatcher.submit_triple_call("+1").await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        fx.backend.fail_next_trigger(500);
        fx.dispatcher.submit_triple_call("+1").await;

        // 6s after the first status, 3s after the second
        tokio::time::sleep(Duration::from_secs(3)).await;
        let status = fx.dispatcher.triple_call_status();
        assert!(status.shown);
        assert!(!status.success);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(!fx.dispatcher.triple_call_status().shown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_triple_call_rejected_while_first_outstanding() {
        let fx = fixture();
        fx.backend.push_trigger(Duration::from_secs(1), Ok(()));

        let first = tokio::spawn({
            let dispatcher = fx.dispatcher.clone();
            async move { dispatcher.submit_triple_call("+1").await }
        });
        while !fx.dispatcher.triple_call_in_progress() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            fx.dispatcher.submit_triple_call("+1").await,
            TripleCallOutcome::Ignored { reason: IgnoreReason::InFlight }
        );
        assert!(matches!(first.await.unwrap(), TripleCallOutcome::Initiated { .. }));
        assert_eq!(fx.backend.triggers().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_triple_call_resolving_after_teardown_updates_nothing() {
        let fx = fixture();
        fx.backend.push_trigger(Duration::from_secs(2), Ok(()));

        let pending = tokio::spawn({
            let dispatcher = fx.dispatcher.clone();
            async move { dispatcher.submit_triple_call("+1").await }
        });
        while !fx.dispatcher.triple_call_in_progress() {
            tokio::task::yield_now().await;
        }
        fx.history.stop();
        fx.dispatcher.detach();

        assert_eq!(pending.await.unwrap(), TripleCallOutcome::Detached);
        assert_eq!(fx.dispatcher.triple_call_status(), TripleCallStatus::default());
        assert!(fx.dial_pad.snapshot().all_customers_blank());
        assert!(!fx.dispatcher.triple_call_in_progress());
        assert_eq!(fx.backend.history_requests(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_during_triple_call_wins_over_populate() {
        let fx = fixture();
        fx.backend.push_trigger(Duration::from_secs(2), Ok(()));

        let pending = tokio::spawn({
            let dispatcher = fx.dispatcher.clone();
            async move { dispatcher.submit_triple_call("+15550100").await }
        });
        while !fx.dispatcher.triple_call_in_progress() {
            tokio::task::yield_now().await;
        }
        fx.dial_pad.set_customer(2, "999").unwrap();

        assert_eq!(
            pending.await.unwrap(),
            TripleCallOutcome::Initiated {
                leads: 3,
                populated_first_slot: false
            }
        );
        assert_eq!(fx.dial_pad.snapshot().customers(), &["", "", "999"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_triple_call_guard_held_until_banner_posted() {
        let fx = fixture();
        fx.backend.push_history(Duration::from_secs(1), Ok(vec![call_record("CA9", "ringing")]));

        let pending = tokio::spawn({
            let dispatcher = fx.dispatcher.clone();
            async move { dispatcher.submit_triple_call("+15550100").await }
        });
        while fx.backend.history_requests() == 0 {
            tokio::task::yield_now().await;
        }

        // refresh outstanding: banner and slot 0 already settled, guard released
        assert!(fx.dispatcher.triple_call_status().shown);
        assert_eq!(fx.dial_pad.snapshot().customers()[0], "+972500000001");
        assert!(!fx.dispatcher.triple_call_in_progress());

        assert!(matches!(pending.await.unwrap(), TripleCallOutcome::Initiated { .. }));
        assert_eq!(fx.history.view().records[0].id.as_str(), "CA9");
    }
}
