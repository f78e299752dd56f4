// Operator-facing station status

use crate::domain::{CompanyId, DisplayLabel};
use crate::error::AppError;
use crate::port::{PrintError, PrintOutcome};
use serde::{Deserialize, Serialize};

use super::cooldown::CoolingDown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationState {
    Idle,
    Printing,
    Printed,
    PrintFailed,
    DriverUnavailable,
    CoolingDown,
    IssueFailed,
}

impl StationState {
    /// Whether a print attempt has finished in this state
    pub fn is_settled(self) -> bool {
        !matches!(self, StationState::Printing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationStatus {
    pub state: StationState,
    pub message: String,
}

impl StationStatus {
    fn new(state: StationState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
        }
    }

    pub fn idle() -> Self {
        Self::new(StationState::Idle, "Ready")
    }

    pub fn printing(company: CompanyId) -> Self {
        Self::new(
            StationState::Printing,
            format!("Loading images for ID {} and printing...", company),
        )
    }

    pub fn printed(company: CompanyId, label: &DisplayLabel, outcome: &PrintOutcome) -> Self {
        Self::new(
            StationState::Printed,
            format!(
                "Print successful! ID: {}, Ticket: {}, Code: {}",
                company, label, outcome.code
            ),
        )
    }

    pub fn print_failed(error: &PrintError) -> Self {
        let state = match error {
            PrintError::DriverUnavailable => StationState::DriverUnavailable,
            _ => StationState::PrintFailed,
        };
        Self::new(state, error.to_string())
    }

    pub fn cooling_down(rejection: CoolingDown) -> Self {
        Self::new(
            StationState::CoolingDown,
            format!(
                "Cooldown active - please wait {} second(s)",
                rejection.remaining_secs()
            ),
        )
    }

    pub fn issue_failed(error: &AppError) -> Self {
        Self::new(
            StationState::IssueFailed,
            format!("Error incrementing ticket number: {}", error),
        )
    }
}

impl Default for StationStatus {
    fn default() -> Self {
        Self::idle()
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
