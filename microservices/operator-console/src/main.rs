//! Operator Console service binary

use bridge_backend_sdk::HttpCallBackend;
use bridge_core::ServiceRuntime;
use operator_console::{ConsoleConfig, OperatorConsoleService};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env()?;
    bridge_telemetry::init(&config.service.service_name)?;

    info!(
        service = %config.service.service_name,
        backend = %config.backend_url,
        slots = config.customer_slots,
        language = %config.language,
        "Starting operator console"
    );

    let backend = Arc::new(HttpCallBackend::new(&config.backend())?);
    let service = Arc::new(OperatorConsoleService::new(config, backend));

    ServiceRuntime::run(service).await?;

    Ok(())
}
