//! `BridgeService` implementation for the operator console

use async_trait::async_trait;
use bridge_backend_sdk::CallBackend;
use bridge_core::{BridgeService, HealthStatus, ReadinessStatus, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ConsoleConfig;
use crate::console::OperatorConsole;
use crate::routes::create_router;
use crate::AppState;

pub struct OperatorConsoleService {
    config: ConsoleConfig,
    console: Arc<OperatorConsole>,
    started_at: Instant,
    shutdown: CancellationToken,
}

impl OperatorConsoleService {
    pub fn new(config: ConsoleConfig, backend: Arc<dyn CallBackend>) -> Self {
        let console = Arc::new(OperatorConsole::new(&config, backend));
        Self {
            config,
            console,
            started_at: Instant::now(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn console(&self) -> &Arc<OperatorConsole> {
        &self.console
    }

    pub fn state(&self) -> AppState {
        AppState {
            console: self.console.clone(),
            started_at: self.started_at,
        }
    }
}

#[async_trait]
impl BridgeService for OperatorConsoleService {
    fn service_id(&self) -> &'static str {
        "operator-console"
    }

    async fn health(&self) -> HealthStatus {
        self.console.health(self.started_at.elapsed())
    }

    async fn ready(&self) -> ReadinessStatus {
        self.console.readiness()
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();
        self.console.teardown();
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        let bind_addr = self.config.bind_address()?;
        let listener = TcpListener::bind(bind_addr).await?;
        info!(
            addr = %bind_addr,
            backend = %self.config.backend_url,
            "Operator console listening"
        );

        self.console.mount();

        let token = self.shutdown.clone();
        axum::serve(listener, create_router(self.state()))
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await?;

        Ok(())
    }
}
