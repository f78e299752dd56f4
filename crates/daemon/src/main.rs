//! Queueboard - Main Entry Point
//!
//! Wires the SQLite state store, the printer adapter and the JSON-RPC server.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// Import workspace crates
use queueboard_api_rpc::{RpcHandler, RpcServer, RpcServerConfig};
use queueboard_core::application::{
    DisplayBoard, PrintStation, PrinterSettings, QueueConsole, StationConfig, TicketService,
};
use queueboard_core::port::{PrintDevice, SettingsStore, StateStore, SystemTimeProvider, TimeProvider};
use queueboard_infra_printer::{EposConfig, EposPrintDevice};
use queueboard_infra_sqlite::{create_pool, run_migrations, SqliteSettingsStore, SqliteStateStore};

use config::DaemonConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let config = DaemonConfig::from_env()?;
    let _log_guard = telemetry::init_logging(&config)?;

    info!("Queueboard v{} starting...", VERSION);

    // 2. Initialize database
    info!(db_path = %config.db_path, "Initializing database...");
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let pool = create_pool(&config.db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let state_store: Arc<dyn StateStore> =
        Arc::new(SqliteStateStore::new(pool.clone(), time_provider.clone()));
    let settings_store: Arc<dyn SettingsStore> =
        Arc::new(SqliteSettingsStore::new(pool.clone(), time_provider.clone()));

    let console = Arc::new(QueueConsole::new(state_store.clone()));
    console
        .attach()
        .await
        .map_err(|e| anyhow::anyhow!("Queue console attach failed: {}", e))?;

    let board = Arc::new(
        DisplayBoard::attach(state_store.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("Display board attach failed: {}", e))?,
    );

    let tickets = Arc::new(TicketService::new(state_store.clone()));
    let printer_settings = Arc::new(PrinterSettings::load(settings_store).await);

    // 4. Printer driver (absent when disabled or unbuildable)
    let device: Option<Arc<dyn PrintDevice>> = if config.printer_enabled {
        let epos_config = EposConfig {
            artwork_dir: config.artwork_dir.clone(),
            accept_invalid_certs: config.printer_accept_invalid_certs,
            ..Default::default()
        };
        match EposPrintDevice::new(epos_config) {
            Ok(device) => Some(Arc::new(device)),
            Err(e) => {
                warn!(error = %e, "Printer driver unavailable, tickets will not print");
                None
            }
        }
    } else {
        info!("Printer disabled by configuration");
        None
    };

    let mut station_config = StationConfig::default();
    if let Some(ms) = config.cooldown_ms {
        station_config.cooldown_ms = ms;
    }
    if let Some(url) = &config.qr_base_url {
        station_config.qr_base_url = url.clone();
    }
    let station = Arc::new(PrintStation::new(
        tickets.clone(),
        device,
        printer_settings.clone(),
        time_provider.clone(),
        station_config,
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let handler = Arc::new(RpcHandler::new(
        state_store,
        console.clone(),
        tickets,
        station,
        board,
        printer_settings,
    ));
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, handler)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "✅ System ready");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), rpc_handle.stopped()).await;
    console.detach();
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
