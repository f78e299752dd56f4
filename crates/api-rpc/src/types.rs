//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use queueboard_core::domain::{CompanyId, CounterKind, CounterPath};
use queueboard_core::error::{AppError, Result};
use serde::{Deserialize, Serialize};

pub use queueboard_core::application::{BoardEntry, BoardSnapshot, PressOutcome, StationStatus};

/// queue.increment.v1 / queue.decrement.v1 / ticket.issue.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRequest {
    /// Company letter, case-insensitive
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueResponse {
    pub company: CompanyId,
    pub current: i64,
    pub label: String,
}

/// queue.reset_all.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetAllResponse {
    pub reset: bool,
}

/// ticket.issue.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketResponse {
    pub company: CompanyId,
    pub ticket: i64,
    pub label: String,
}

/// station.press.v1 - result is a `PressOutcome`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressRequest {
    /// Single key, '1'..'4' are bound
    pub key: String,
}

/// printer.address.set.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPrinterAddressRequest {
    pub address: String,
}

/// printer.address.get.v1 / printer.address.set.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterAddressResponse {
    pub address: String,
    pub service_url: String,
}

/// display.subscribe.v1 - both filters optional; omitted means all
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySubscribeRequest {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

impl DisplaySubscribeRequest {
    /// Paths selected by the filters
    pub fn paths(&self) -> Result<Vec<CounterPath>> {
        let kind: Option<CounterKind> = self
            .kind
            .as_deref()
            .map(|k| k.trim().to_ascii_lowercase().parse::<CounterKind>())
            .transpose()
            .map_err(AppError::from)?;
        let company: Option<CompanyId> = self
            .company
            .as_deref()
            .map(str::parse::<CompanyId>)
            .transpose()
            .map_err(AppError::from)?;

        Ok(CounterPath::all()
            .filter(|p| kind.map_or(true, |k| p.kind == k))
            .filter(|p| company.map_or(true, |c| p.company == c))
            .collect())
    }
}
