//! Scripted in-memory backend for unit tests

use async_trait::async_trait;
use bridge_backend_sdk::{BackendError, CallBackend, TriggerCallRequest};
use bridge_core::{CallId, CallRecord};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Reply the backend gives after `delay`; `Err` carries an HTTP status
type Scripted<T> = (Duration, Result<T, u16>);

#[derive(Default)]
pub struct ScriptedBackend {
    triggers: Mutex<Vec<TriggerCallRequest>>,
    trigger_script: Mutex<VecDeque<Scripted<()>>>,
    history: Mutex<Vec<CallRecord>>,
    history_script: Mutex<VecDeque<Scripted<Vec<CallRecord>>>>,
    history_requests: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Default history returned when nothing is scripted
    pub fn set_history(&self, records: Vec<CallRecord>) {
        *self.history.lock() = records;
    }

    pub fn push_history(&self, delay: Duration, reply: Result<Vec<CallRecord>, u16>) {
        self.history_script.lock().push_back((delay, reply));
    }

    pub fn fail_next_history(&self, status: u16) {
        self.push_history(Duration::ZERO, Err(status));
    }

    pub fn push_trigger(&self, delay: Duration, reply: Result<(), u16>) {
        self.trigger_script.lock().push_back((delay, reply));
    }

    pub fn fail_next_trigger(&self, status: u16) {
        self.push_trigger(Duration::ZERO, Err(status));
    }

    pub fn triggers(&self) -> Vec<TriggerCallRequest> {
        self.triggers.lock().clone()
    }

    pub fn history_requests(&self) -> usize {
        self.history_requests.load(Ordering::SeqCst)
    }

    fn api_error(status: u16) -> BackendError {
        BackendError::Api {
            status,
            body: format!("scripted failure {}", status),
        }
    }
}

#[async_trait]
impl CallBackend for ScriptedBackend {
    async fn trigger_target_call(&self, agent: &str, numbers: &[String]) -> bridge_backend_sdk::Result<()> {
        self.triggers.lock().push(TriggerCallRequest::new(agent, numbers));
        let scripted = self.trigger_script.lock().pop_front();
        let (delay, reply) = scripted.unwrap_or((Duration::ZERO, Ok(())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.map_err(Self::api_error)
    }

    async fn call_history(&self) -> bridge_backend_sdk::Result<Vec<CallRecord>> {
        self.history_requests.fetch_add(1, Ordering::SeqCst);
        let scripted = self.history_script.lock().pop_front();
        let (delay, reply) = scripted.unwrap_or_else(|| (Duration::ZERO, Ok(self.history.lock().clone())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.map_err(Self::api_error)
    }
}

pub fn call_record(id: &str, status: &str) -> CallRecord {
    CallRecord {
        id: CallId::new(id),
        timestamp: "2024-05-01T10:15:00Z".to_string(),
        agent_number: "+15550100".to_string(),
        customer_number: "+15550101".to_string(),
        status: status.to_string(),
        duration: 30,
    }
}
