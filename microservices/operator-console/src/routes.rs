//! Router configuration for the operator console API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Metrics
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/stats", get(handlers::stats))
        // Dial pad
        .route("/api/v1/console", get(handlers::get_console))
        .route("/api/v1/console/focus", put(handlers::set_focus))
        .route("/api/v1/console/keypad/digit", post(handlers::press_digit))
        .route("/api/v1/console/keypad/backspace", post(handlers::press_backspace))
        .route("/api/v1/console/agent", put(handlers::set_agent))
        .route("/api/v1/console/customers/{index}", put(handlers::set_customer))
        // Calls
        .route("/api/v1/calls/bridge", post(handlers::bridge_call))
        .route("/api/v1/calls/triple", post(handlers::triple_call))
        .route("/api/v1/calls/history", get(handlers::call_history))
        // Leads
        .route("/api/v1/leads", get(handlers::list_leads))
        .with_state(state)
}
