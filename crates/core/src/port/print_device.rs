// Print Device Port (Interface)
// Submits a rendered ticket to a receipt printer on the local network

use crate::domain::{PrinterAddress, TicketReceipt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Successful device response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOutcome {
    pub code: String,
    pub status: Option<String>,
    pub battery: Option<String>,
}

/// Print failures, rendered as the operator-facing status text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    /// No printer driver is available in this process
    #[error("SDK not loaded")]
    DriverUnavailable,

    /// The printer answered but reported failure
    #[error("Print failed: {code} - {}", .status.as_deref().unwrap_or("Unknown error"))]
    DeviceFailure {
        code: String,
        status: Option<String>,
    },

    /// Transport error or unreadable response
    #[error("Print Error: {0}")]
    Transport(String),

    /// Ticket artwork could not be loaded
    #[error("Error loading images: {0}")]
    Artwork(String),
}

#[async_trait]
pub trait PrintDevice: Send + Sync {
    /// Render and send one ticket. Resolves when the device answers.
    async fn submit(
        &self,
        receipt: &TicketReceipt,
        address: &PrinterAddress,
    ) -> Result<PrintOutcome, PrintError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock device behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Answer success with this code
        Success(String),
        /// Fail with this error
        Fail(PrintError),
    }

    /// Mock PrintDevice recording every submission
    pub struct MockPrintDevice {
        behavior: Arc<Mutex<MockBehavior>>,
        submitted: Arc<Mutex<Vec<(TicketReceipt, PrinterAddress)>>>,
    }

    impl MockPrintDevice {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                submitted: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success("0".to_string()))
        }

        pub fn new_fail(error: PrintError) -> Self {
            Self::new(MockBehavior::Fail(error))
        }

        pub fn set_behavior(&self, behavior: MockBehavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn submitted(&self) -> Vec<(TicketReceipt, PrinterAddress)> {
            self.submitted.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PrintDevice for MockPrintDevice {
        async fn submit(
            &self,
            receipt: &TicketReceipt,
            address: &PrinterAddress,
        ) -> Result<PrintOutcome, PrintError> {
            self.submitted
                .lock()
                .unwrap()
                .push((receipt.clone(), address.clone()));

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Success(code) => Ok(PrintOutcome {
                    code,
                    status: None,
                    battery: None,
                }),
                MockBehavior::Fail(err) => Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_matches_status_messages() {
        assert_eq!(PrintError::DriverUnavailable.to_string(), "SDK not loaded");
        assert_eq!(
            PrintError::DeviceFailure {
                code: "EPTR_COVER_OPEN".into(),
                status: None
            }
            .to_string(),
            "Print failed: EPTR_COVER_OPEN - Unknown error"
        );
        assert_eq!(
            PrintError::DeviceFailure {
                code: "ERROR_TIMEOUT".into(),
                status: Some("251658262".into())
            }
            .to_string(),
            "Print failed: ERROR_TIMEOUT - 251658262"
        );
        assert_eq!(
            PrintError::Transport("connection refused".into()).to_string(),
            "Print Error: connection refused"
        );
    }
}
