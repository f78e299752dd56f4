// Epson ePOS-Print PrintDevice Implementation

use crate::artwork::ArtworkStore;
use crate::epos::{parse_response, wrap_soap};
use crate::layout::ticket_document;
use async_trait::async_trait;
use queueboard_core::domain::printer::{DEFAULT_PRINT_TIMEOUT_MS, EPOS_DEVICE_ID};
use queueboard_core::domain::{PrinterAddress, TicketReceipt};
use queueboard_core::error::{AppError, Result};
use queueboard_core::port::{PrintDevice, PrintError, PrintOutcome};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

// Extra time the HTTP client waits beyond the device-side print timeout
const TRANSPORT_GRACE_MS: u64 = 5_000;

/// Printer adapter configuration
#[derive(Debug, Clone)]
pub struct EposConfig {
    /// Directory holding `ticket_{c}_0{1,2}.png`
    pub artwork_dir: PathBuf,
    /// Device-side print timeout
    pub timeout_ms: u64,
    /// Printers ship with self-signed certificates
    pub accept_invalid_certs: bool,
    /// Fixed service base URL (scheme://host:port). When set, the configured
    /// printer address is ignored.
    pub endpoint: Option<String>,
}

impl Default for EposConfig {
    fn default() -> Self {
        Self {
            artwork_dir: PathBuf::from("./public"),
            timeout_ms: DEFAULT_PRINT_TIMEOUT_MS,
            accept_invalid_certs: true,
            endpoint: None,
        }
    }
}

pub struct EposPrintDevice {
    client: reqwest::Client,
    artwork: ArtworkStore,
    config: EposConfig,
}

impl EposPrintDevice {
    pub fn new(config: EposConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_millis(
                config.timeout_ms.saturating_add(TRANSPORT_GRACE_MS),
            ))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build printer HTTP client: {}", e)))?;

        Ok(Self {
            client,
            artwork: ArtworkStore::new(config.artwork_dir.clone()),
            config,
        })
    }

    /// Service URL for `address`, honoring a fixed endpoint
    pub fn service_url(&self, address: &PrinterAddress) -> String {
        match &self.config.endpoint {
            Some(base) => format!(
                "{}/cgi-bin/epos/service.cgi?devid={}&timeout={}",
                base.trim_end_matches('/'),
                EPOS_DEVICE_ID,
                self.config.timeout_ms
            ),
            None => address.service_url(self.config.timeout_ms),
        }
    }
}

#[async_trait]
impl PrintDevice for EposPrintDevice {
    async fn submit(
        &self,
        receipt: &TicketReceipt,
        address: &PrinterAddress,
    ) -> std::result::Result<PrintOutcome, PrintError> {
        let artwork = self.artwork.get(receipt.company).await?;
        let document = ticket_document(receipt, &artwork);
        let url = self.service_url(address);
        debug!(url = %url, label = %receipt.label, bytes = document.len(), "Submitting ticket");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .header(reqwest::header::IF_MODIFIED_SINCE, "Thu, 01 Jan 1970 00:00:00 GMT")
            .body(wrap_soap(&document))
            .send()
            .await
            .map_err(|e| PrintError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PrintError::Transport(e.to_string()))?;

        let parsed = match parse_response(&body) {
            Some(parsed) => parsed,
            None if !status.is_success() => {
                return Err(PrintError::Transport(format!("HTTP {}", status.as_u16())))
            }
            None => {
                return Err(PrintError::Transport(
                    "no response element in printer reply".to_string(),
                ))
            }
        };

        if parsed.success {
            info!(label = %receipt.label, code = %parsed.code, "Printer accepted ticket");
            Ok(PrintOutcome {
                code: parsed.code,
                status: parsed.status,
                battery: parsed.battery,
            })
        } else {
            Err(PrintError::DeviceFailure {
                code: parsed.code,
                status: parsed.status,
            })
        }
    }
}
