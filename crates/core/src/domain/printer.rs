// Printer Address Domain Model

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Address used when nothing valid has been configured on this device
pub const DEFAULT_PRINTER_ADDRESS: &str = "192.168.1.102";

/// HTTPS port of the printer's ePOS service
pub const EPOS_SERVICE_PORT: u16 = 8043;

/// Device id of the locally attached printer on the ePOS service
pub const EPOS_DEVICE_ID: &str = "local_printer";

/// Print timeout passed to the device (60s)
pub const DEFAULT_PRINT_TIMEOUT_MS: u64 = 60_000;

/// Validated printer network address: four dot-separated octets of 1-3
/// digits, each in [0, 255]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PrinterAddress(String);

impl PrinterAddress {
    /// Validate and wrap a raw address
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let octets: Vec<&str> = raw.split('.').collect();
        if octets.len() != 4 {
            return Err(DomainError::InvalidPrinterAddress(raw.to_string()));
        }
        for octet in octets {
            let well_formed = (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().map(|n| n <= 255).unwrap_or(false);
            if !well_formed {
                return Err(DomainError::InvalidPrinterAddress(raw.to_string()));
            }
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full ePOS service endpoint for this printer
    pub fn service_url(&self, timeout_ms: u64) -> String {
        format!(
            "https://{}:{}/cgi-bin/epos/service.cgi?devid={}&timeout={}",
            self.0, EPOS_SERVICE_PORT, EPOS_DEVICE_ID, timeout_ms
        )
    }
}

impl Default for PrinterAddress {
    fn default() -> Self {
        Self(DEFAULT_PRINTER_ADDRESS.to_string())
    }
}

impl std::fmt::Display for PrinterAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PrinterAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for PrinterAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
