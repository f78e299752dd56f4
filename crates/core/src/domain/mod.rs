// Domain Layer - Pure business logic and entities

pub mod company;
pub mod counter;
pub mod error;
pub mod label;
pub mod printer;
pub mod receipt;

// Re-exports
pub use company::CompanyId;
pub use counter::{CounterKind, CounterPath, CounterValue, QUEUE_CEILING, QUEUE_FLOOR};
pub use error::DomainError;
pub use label::{project, DisplayLabel};
pub use printer::PrinterAddress;
pub use receipt::TicketReceipt;
