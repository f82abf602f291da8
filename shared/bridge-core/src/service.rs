//! Service lifecycle shared by every bridge binary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tracing::{error, info, warn};

use crate::error::{BridgeError, Result};

/// Health status for liveness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub service_id: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Readiness status for readiness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub ready: bool,
    pub dependencies: Vec<DependencyStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub latency_ms: Option<u64>,
}

/// Standard trait every bridge service implements
#[async_trait]
pub trait BridgeService: Send + Sync + 'static {
    /// Service identifier (e.g., "operator-console")
    fn service_id(&self) -> &'static str;

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Is the service alive?
    async fn health(&self) -> HealthStatus;

    /// Are all dependencies available?
    async fn ready(&self) -> ReadinessStatus;

    /// Graceful shutdown
    async fn shutdown(&self) -> Result<()>;

    /// Start the service (HTTP servers, background pollers, ...)
    async fn start(&self) -> Result<()>;
}

/// Time `start` gets to wind down after `shutdown` before it is aborted
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Runs a service until a shutdown signal arrives or `start` returns
pub struct ServiceRuntime;

impl ServiceRuntime {
    /// Run until SIGINT/SIGTERM
    pub async fn run<S: BridgeService>(service: Arc<S>) -> Result<()> {
        Self::run_until(service, Self::wait_for_shutdown()).await
    }

    /// Run until `trigger` completes or `start` returns, then shut down.
    ///
    /// After `shutdown()` the start task gets [`SHUTDOWN_GRACE`] to drain.
    /// An error from `start` is returned once shutdown has run.
    pub async fn run_until<S, F>(service: Arc<S>, trigger: F) -> Result<()>
    where
        S: BridgeService,
        F: Future<Output = ()>,
    {
        let started = Instant::now();
        info!(
            service_id = service.service_id(),
            version = service.version(),
            "Starting service"
        );

        let runner = service.clone();
        let mut task = tokio::spawn(async move { runner.start().await });

        let exited = tokio::select! {
            _ = trigger => {
                info!("Shutdown signal received, draining");
                None
            }
            joined = &mut task => Some(joined),
        };

        if let Err(e) = service.shutdown().await {
            warn!(error = %e, "Error during shutdown");
        }

        let joined = match exited {
            Some(joined) => joined,
            None => match tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(
                        grace_secs = SHUTDOWN_GRACE.as_secs(),
                        "Service did not stop in time; aborting"
                    );
                    task.abort();
                    Ok(Ok(()))
                }
            },
        };

        info!(
            uptime_seconds = started.elapsed().as_secs(),
            "Service stopped"
        );

        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!(error = %e, "Service exited with error");
                Err(e)
            }
            Err(e) => Err(BridgeError::Internal(format!("service task failed: {}", e))),
        }
    }

    async fn wait_for_shutdown() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
