//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompanyRequest {
    pub company: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PressRequest {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SetPrinterAddressRequest {
    pub address: String,
}

/// Result of queue.increment.v1 / queue.decrement.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueResponse {
    pub company: String,
    pub current: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetAllResponse {
    pub reset: bool,
}

/// Result of ticket.issue.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TicketResponse {
    pub company: String,
    pub ticket: i64,
    pub label: String,
}

/// Result of station.press.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PressOutcome {
    Issued {
        company: String,
        ticket: i64,
        label: String,
    },
    CoolingDown {
        remaining_ms: i64,
    },
    Unbound,
}

/// Result of station.status.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationStatus {
    /// idle | printing | printed | print_failed | driver_unavailable |
    /// cooling_down | issue_failed
    pub state: String,
    pub message: String,
}

/// One counter as shown on a display
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardEntry {
    pub company: String,
    /// "queue" or "ticket"
    pub kind: String,
    pub current: i64,
    pub label: String,
}

/// Result of display.snapshot.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoardSnapshot {
    pub entries: Vec<BoardEntry>,
}

impl BoardSnapshot {
    pub fn get(&self, kind: &str, company: &str) -> Option<&BoardEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == kind && e.company.eq_ignore_ascii_case(company))
    }
}

/// Result of printer.address.get.v1 / printer.address.set.v1
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrinterAddressResponse {
    pub address: String,
    pub service_url: String,
}
