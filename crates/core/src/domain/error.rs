// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown company: {0} (expected one of A, B, C, D)")]
    UnknownCompany(String),

    #[error("Unknown counter kind: {0} (expected queue or ticket)")]
    UnknownCounterKind(String),

    #[error("Invalid counter path: {0}")]
    InvalidPath(String),

    #[error("Invalid IP address format: {0}")]
    InvalidPrinterAddress(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
