// Application Layer - Use Cases and Business Logic

pub mod display;
pub mod queue;
pub mod settings;
pub mod station;
pub mod ticket;

// Re-exports
pub use display::{BoardEntry, BoardSnapshot, DisplayBoard};
pub use queue::QueueConsole;
pub use settings::{PrinterSettings, PRINTER_ADDRESS_KEY};
pub use station::{PressOutcome, PrintStation, StationConfig, StationState, StationStatus};
pub use ticket::TicketService;
