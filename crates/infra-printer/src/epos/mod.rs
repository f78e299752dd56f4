// ePOS-Print document model and SOAP transport framing

mod builder;
mod envelope;

pub use builder::{Align, Color, Cut, EposBuilder, Font, QrLevel};
pub use envelope::{parse_response, wrap_soap, EposResponse};
