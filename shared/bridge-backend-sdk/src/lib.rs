//! Telephony Backend SDK
//!
//! The console's only I/O boundary: `POST /trigger_target_call` to bridge an
//! agent to one or more numbers, and `GET /call_history` for the call log.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use bridge_core::CallRecord;

pub use client::{BackendConfig, HttpCallBackend};
pub use error::{BackendError, Result};
pub use types::TriggerCallRequest;

/// Operations the console needs from the telephony backend
#[async_trait]
pub trait CallBackend: Send + Sync + 'static {
    /// Ask the backend to bridge `agent` to every entry of `numbers`.
    /// Any 2xx is success; the response body is not interpreted.
    async fn trigger_target_call(&self, agent: &str, numbers: &[String]) -> Result<()>;

    /// Full current call history, as the backend orders it
    async fn call_history(&self) -> Result<Vec<CallRecord>>;
}
