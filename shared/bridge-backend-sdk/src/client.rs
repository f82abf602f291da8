//! reqwest implementation of [`CallBackend`]

use async_trait::async_trait;
use bridge_core::CallRecord;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{BackendError, Result};
use crate::types::TriggerCallRequest;
use crate::CallBackend;

/// Connection settings for the telephony backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the telephony backend
#[derive(Debug, Clone)]
pub struct HttpCallBackend {
    client: Client,
    base_url: String,
}

impl HttpCallBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-2xx response into [`BackendError::Api`], keeping the body
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Backend returned error status");
        Err(BackendError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl CallBackend for HttpCallBackend {
    async fn trigger_target_call(&self, agent: &str, numbers: &[String]) -> Result<()> {
        let url = format!("{}/trigger_target_call", self.base_url);
        let request = TriggerCallRequest::new(agent, numbers);

        info!(agent = %agent, numbers = numbers.len(), "Triggering bridge call");

        let response = self.client.post(&url).json(&request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn call_history(&self) -> Result<Vec<CallRecord>> {
        let url = format!("{}/call_history", self.base_url);

        debug!("Fetching call history");

        let response = self.client.get(&url).send().await?;
        let body = Self::check_status(response).await?.text().await?;
        let records: Vec<CallRecord> =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))?;

        debug!(records = records.len(), "Call history fetched");
        Ok(records)
    }
}
