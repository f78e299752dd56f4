//! Queueboard SDK - Rust Client Library
//!
//! Provides a client for the Queueboard daemon and a live display feed.
//!
//! # Example
//!
//! ```no_run
//! use queueboard_sdk::{DisplayFeed, DisplayFilter, QueueboardClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QueueboardClient::connect("http://127.0.0.1:9630").await?;
//!
//!     let issued = client.issue_ticket("A").await?;
//!     println!("Issued {}", issued.label);
//!
//!     let mut feed = DisplayFeed::connect("ws://127.0.0.1:9630", DisplayFilter::default()).await?;
//!     while let Some(entry) = feed.next().await {
//!         let entry = entry?;
//!         println!("{} {} -> {}", entry.kind, entry.company, entry.label);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod feed;
mod types;

pub use client::QueueboardClient;
pub use error::{Result, SdkError};
pub use feed::{DisplayFeed, DisplayFilter};
pub use types::{
    BoardEntry, BoardSnapshot, PressOutcome, PrinterAddressResponse, QueueResponse,
    ResetAllResponse, StationStatus, TicketResponse,
};
