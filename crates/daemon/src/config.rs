//! Daemon configuration from `QUEUEBOARD_*` environment variables

use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "~/.queueboard/state.db";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;
const DEFAULT_ARTWORK_DIR: &str = "./public";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub log_format: LogFormat,
    /// Daily-rolling JSON log files go here when set
    pub log_dir: Option<PathBuf>,
    /// When false the station runs without a printer driver
    pub printer_enabled: bool,
    pub artwork_dir: PathBuf,
    pub printer_accept_invalid_certs: bool,
    pub qr_base_url: Option<String>,
    pub cooldown_ms: Option<i64>,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("QUEUEBOARD_{}", name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = var("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let rpc_port = match var("RPC_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("QUEUEBOARD_RPC_PORT is not a port: {}", raw))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let cooldown_ms = var("PRINT_COOLDOWN_MS")
            .map(|raw| {
                raw.parse::<i64>()
                    .ok()
                    .filter(|ms| *ms >= 0)
                    .with_context(|| format!("QUEUEBOARD_PRINT_COOLDOWN_MS is invalid: {}", raw))
            })
            .transpose()?;

        Ok(Self {
            db_path,
            rpc_host: var("RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            rpc_port,
            log_format,
            log_dir: var("LOG_DIR").map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned())),
            printer_enabled: flag(var("PRINTER_ENABLED"), true)?,
            artwork_dir: PathBuf::from(
                var("ARTWORK_DIR").unwrap_or_else(|| DEFAULT_ARTWORK_DIR.to_string()),
            ),
            printer_accept_invalid_certs: flag(var("PRINTER_ACCEPT_INVALID_CERTS"), true)?,
            qr_base_url: var("QR_BASE_URL"),
            cooldown_ms,
        })
    }
}

fn flag(raw: Option<String>, default: bool) -> Result<bool> {
    match raw.map(|v| v.to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => anyhow::bail!("expected a boolean, got {}", other),
    }
}
