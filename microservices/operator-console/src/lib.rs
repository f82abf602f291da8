//! Operator Console
//!
//! Bridges an agent's phone to customer numbers through a remote telephony
//! backend:
//! - Shared keypad routing across the agent and customer fields
//! - Single bridge and fixed-roster triple call, each guarded against
//!   duplicate submission
//! - Call history snapshot with periodic polling
//! - HTTP control surface for the rendering layer

pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod history;
pub mod i18n;
pub mod keypad;
pub mod leads;
pub mod metrics;
pub mod routes;
pub mod service;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;
use std::time::Instant;

pub use config::ConsoleConfig;
pub use console::{ConsoleView, OperatorConsole};
pub use dispatcher::{BridgeOutcome, CallDispatcher, IgnoreReason, TripleCallOutcome, TripleCallStatus};
pub use error::{ConsoleError, Result};
pub use history::{CallRow, HistorySynchronizer, HistoryView, LoadOutcome};
pub use i18n::{Catalog, Language};
pub use keypad::{DialPad, DialPadHandle, DialTarget, KeypadError};
pub use leads::LeadRoster;
pub use routes::create_router;
pub use service::OperatorConsoleService;
pub use status::{Severity, StatusKey};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub console: Arc<OperatorConsole>,
    pub started_at: Instant,
}
