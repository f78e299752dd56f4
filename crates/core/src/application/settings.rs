// Printer Settings - device-local printer address

use crate::domain::PrinterAddress;
use crate::error::Result;
use crate::port::SettingsStore;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Settings key holding the printer address
pub const PRINTER_ADDRESS_KEY: &str = "printerIpAddress";

/// Cached, validated printer address backed by a `SettingsStore`
pub struct PrinterSettings {
    store: Arc<dyn SettingsStore>,
    cached: RwLock<PrinterAddress>,
}

impl PrinterSettings {
    /// Load the stored address. Absent, unreadable or invalid values fall
    /// back to the default address.
    pub async fn load(store: Arc<dyn SettingsStore>) -> Self {
        let address = match store.get(PRINTER_ADDRESS_KEY).await {
            Ok(Some(raw)) => PrinterAddress::parse(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored printer address is invalid, using default");
                PrinterAddress::default()
            }),
            Ok(None) => PrinterAddress::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read printer address, using default");
                PrinterAddress::default()
            }
        };
        info!(address = %address, "Printer address loaded");

        Self {
            store,
            cached: RwLock::new(address),
        }
    }

    /// Address currently in effect
    pub fn address(&self) -> PrinterAddress {
        self.cached
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Validate, persist, then cache a new address.
    ///
    /// # Errors
    ///
    /// Invalid input or a failed write leaves both the stored and the cached
    /// address unchanged.
    pub async fn update(&self, raw: &str) -> Result<PrinterAddress> {
        let address = PrinterAddress::parse(raw.trim())?;
        self.store.set(PRINTER_ADDRESS_KEY, address.as_str()).await?;

        match self.cached.write() {
            Ok(mut guard) => *guard = address.clone(),
            Err(poisoned) => *poisoned.into_inner() = address.clone(),
        }
        info!(address = %address, "Printer address updated");
        Ok(address)
    }
}
