//! HTTP handlers for the operator console control surface

use axum::{
    extract::{Path, Query, State},
    Json,
};
use bridge_core::{HealthStatus, Lead, ReadinessStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::console::ConsoleView;
use crate::dispatcher::{BridgeOutcome, TripleCallOutcome};
use crate::error::{ConsoleError, Result};
use crate::history::CallRow;
use crate::i18n::Language;
use crate::keypad::{DialPad, DialTarget};
use crate::metrics::MetricsSnapshot;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FocusRequest {
    pub target: Option<DialTarget>,
}

#[derive(Debug, Deserialize)]
pub struct DigitRequest {
    pub digit: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub lang: Option<Language>,
}

/// Field a keypad press landed in, plus the resulting dial pad
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeypadResponse {
    pub target: Option<DialTarget>,
    pub dial_pad: DialPad,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub loading: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub rows: Vec<CallRow>,
}

// ============================================
// Health & Metrics Handlers
// ============================================

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.console.health(state.started_at.elapsed()))
}

pub async fn ready(State(state): State<AppState>) -> Json<ReadinessStatus> {
    Json(state.console.readiness())
}

pub async fn stats(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.console.metrics().snapshot())
}

// ============================================
// Dial Pad Handlers
// ============================================

pub async fn get_console(State(state): State<AppState>) -> Json<ConsoleView> {
    Json(state.console.view())
}

pub async fn set_focus(
    State(state): State<AppState>,
    Json(req): Json<FocusRequest>,
) -> Result<Json<ConsoleView>> {
    state.console.dial_pad().set_focus(req.target)?;
    Ok(Json(state.console.view()))
}

pub async fn press_digit(
    State(state): State<AppState>,
    Json(req): Json<DigitRequest>,
) -> Result<Json<KeypadResponse>> {
    let mut chars = req.digit.chars();
    let (Some(key), None) = (chars.next(), chars.next()) else {
        return Err(ConsoleError::InvalidRequest(format!(
            "expected a single keypad key, got {:?}",
            req.digit
        )));
    };

    let dial_pad = state.console.dial_pad();
    let target = dial_pad.press_digit(key)?;
    Ok(Json(KeypadResponse {
        target: Some(target),
        dial_pad: dial_pad.snapshot(),
    }))
}

pub async fn press_backspace(State(state): State<AppState>) -> Json<KeypadResponse> {
    let dial_pad = state.console.dial_pad();
    let target = dial_pad.press_backspace();
    Json(KeypadResponse {
        target,
        dial_pad: dial_pad.snapshot(),
    })
}

pub async fn set_agent(
    State(state): State<AppState>,
    Json(req): Json<FieldRequest>,
) -> Json<ConsoleView> {
    state.console.dial_pad().set_agent(req.value);
    Json(state.console.view())
}

pub async fn set_customer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<FieldRequest>,
) -> Result<Json<ConsoleView>> {
    state.console.dial_pad().set_customer(index, req.value)?;
    Ok(Json(state.console.view()))
}

// ============================================
// Call Handlers
// ============================================

pub async fn bridge_call(State(state): State<AppState>) -> Result<Json<BridgeOutcome>> {
    if !state.console.is_live() {
        return Err(ConsoleError::Detached);
    }
    Ok(Json(state.console.dispatcher().submit_bridge_from_pad().await))
}

pub async fn triple_call(State(state): State<AppState>) -> Result<Json<TripleCallOutcome>> {
    if !state.console.is_live() {
        return Err(ConsoleError::Detached);
    }
    Ok(Json(state.console.dispatcher().submit_triple_call_from_pad().await))
}

pub async fn call_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let catalog = state.console.catalog_for(query.lang);
    let view = state.console.history().view();
    Json(HistoryResponse {
        loading: view.loading,
        last_synced_at: view.last_synced_at,
        rows: view.rows(&catalog),
    })
}

pub async fn list_leads(State(state): State<AppState>) -> Json<Vec<Lead>> {
    Json(state.console.roster().leads().to_vec())
}
