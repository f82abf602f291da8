//! Backend client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;

impl BackendError {
    /// Network-level failure, as opposed to a response the backend chose to send
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
