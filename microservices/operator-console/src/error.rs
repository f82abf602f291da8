//! Error types for the console control surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::keypad::KeypadError;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Keypad(#[from] KeypadError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Console is shut down")]
    Detached,
}

impl ConsoleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Keypad(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Detached => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Rejected console request");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}
