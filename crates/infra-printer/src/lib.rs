// Queueboard Infrastructure - Epson ePOS-Print Adapter
// Implements: PrintDevice

pub mod artwork;
mod device;
pub mod epos;
pub mod layout;
pub mod raster;

pub use artwork::{ArtworkStore, TicketArtwork};
pub use device::{EposConfig, EposPrintDevice};
pub use raster::MonoImage;
