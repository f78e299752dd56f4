//! Queueboard Client Implementation

use crate::error::{Result, SdkError};
use crate::types::*;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::Serialize;
use std::time::Duration;

/// Queueboard Client
///
/// Connects to the daemon via HTTP JSON-RPC.
pub struct QueueboardClient {
    client: HttpClient,
}

impl QueueboardClient {
    /// Connect to the Queueboard daemon
    ///
    /// # Arguments
    ///
    /// * `url` - Server URL (e.g., "http://127.0.0.1:9630")
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use queueboard_sdk::QueueboardClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = QueueboardClient::connect("http://127.0.0.1:9630").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(e.to_string()))?;

        Ok(Self { client })
    }

    /// Advance the queue counter of a company and return the new label
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use queueboard_sdk::QueueboardClient;
    /// # async fn example(client: QueueboardClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let queue = client.increment("B").await?;
    /// println!("Now serving {}", queue.label);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn increment(&self, company: &str) -> Result<QueueResponse> {
        self.call("queue.increment.v1", &company_request(company)).await
    }

    /// Step the queue counter back. Stays at 0 when already there.
    pub async fn decrement(&self, company: &str) -> Result<QueueResponse> {
        self.call("queue.decrement.v1", &company_request(company)).await
    }

    /// Zero all eight counters
    pub async fn reset_all(&self) -> Result<ResetAllResponse> {
        Ok(self
            .client
            .request("queue.reset_all.v1", rpc_params![])
            .await?)
    }

    /// Issue the next ticket number without printing
    pub async fn issue_ticket(&self, company: &str) -> Result<TicketResponse> {
        self.call("ticket.issue.v1", &company_request(company)).await
    }

    /// Simulate a key press on the printing station
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use queueboard_sdk::{PressOutcome, QueueboardClient};
    /// # async fn example(client: QueueboardClient) -> Result<(), Box<dyn std::error::Error>> {
    /// match client.press("1").await? {
    ///     PressOutcome::Issued { label, .. } => println!("Printing {}", label),
    ///     PressOutcome::CoolingDown { remaining_ms } => println!("Wait {}ms", remaining_ms),
    ///     PressOutcome::Unbound => {}
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn press(&self, key: &str) -> Result<PressOutcome> {
        let request = PressRequest {
            key: key.to_string(),
        };
        self.call("station.press.v1", &request).await
    }

    /// Current print station status line
    pub async fn station_status(&self) -> Result<StationStatus> {
        Ok(self
            .client
            .request("station.status.v1", rpc_params![])
            .await?)
    }

    /// All eight counters with their display labels
    pub async fn display_snapshot(&self) -> Result<BoardSnapshot> {
        Ok(self
            .client
            .request("display.snapshot.v1", rpc_params![])
            .await?)
    }

    /// Configured printer address
    pub async fn printer_address(&self) -> Result<PrinterAddressResponse> {
        Ok(self
            .client
            .request("printer.address.get.v1", rpc_params![])
            .await?)
    }

    /// Replace the printer address. Rejected addresses leave the old one in place.
    pub async fn set_printer_address(&self, address: &str) -> Result<PrinterAddressResponse> {
        let request = SetPrinterAddressRequest {
            address: address.to_string(),
        };
        self.call("printer.address.set.v1", &request).await
    }

    async fn call<T, R>(&self, method: &str, request: &T) -> Result<R>
    where
        T: Serialize,
        R: serde::de::DeserializeOwned,
    {
        let params = object_params(request)?;
        Ok(self.client.request(method, params).await?)
    }
}

fn company_request(company: &str) -> CompanyRequest {
    CompanyRequest {
        company: company.to_string(),
    }
}

/// Send a request struct as named parameters
pub(crate) fn object_params<T: Serialize>(value: &T) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => {
            for (name, field) in map {
                params.insert(&name, field)?;
            }
        }
        serde_json::Value::Null => {}
        other => {
            return Err(SdkError::Other(format!(
                "request must serialize to an object, got {}",
                other
            )))
        }
    }
    Ok(params)
}
