//! RPC Method Handlers
//!
//! Implements the business logic for each JSON-RPC method.

use crate::error::{to_rpc_error, validation};
use crate::types::{
    BoardSnapshot, CompanyRequest, PressOutcome, PressRequest, PrinterAddressResponse,
    QueueResponse, ResetAllResponse, SetPrinterAddressRequest, StationStatus, TicketResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use queueboard_core::application::{
    DisplayBoard, PrintStation, PrinterSettings, QueueConsole, TicketService,
};
use queueboard_core::domain::printer::DEFAULT_PRINT_TIMEOUT_MS;
use queueboard_core::domain::{project, CompanyId, PrinterAddress};
use queueboard_core::port::StateStore;
use std::sync::Arc;
use tracing::info;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    store: Arc<dyn StateStore>,
    console: Arc<QueueConsole>,
    tickets: Arc<TicketService>,
    station: Arc<PrintStation>,
    board: Arc<DisplayBoard>,
    printer_settings: Arc<PrinterSettings>,
}

impl RpcHandler {
    pub fn new(
        store: Arc<dyn StateStore>,
        console: Arc<QueueConsole>,
        tickets: Arc<TicketService>,
        station: Arc<PrintStation>,
        board: Arc<DisplayBoard>,
        printer_settings: Arc<PrinterSettings>,
    ) -> Self {
        Self {
            store,
            console,
            tickets,
            station,
            board,
            printer_settings,
        }
    }

    /// Store backing the display feed
    pub fn store(&self) -> Arc<dyn StateStore> {
        Arc::clone(&self.store)
    }

    /// queue.increment.v1
    pub async fn queue_increment(
        &self,
        params: CompanyRequest,
    ) -> Result<QueueResponse, ErrorObjectOwned> {
        let company = parse_company(&params.company)?;
        let current = self
            .console
            .increment(company)
            .await
            .map_err(to_rpc_error)?;
        Ok(queue_response(company, current))
    }

    /// queue.decrement.v1
    pub async fn queue_decrement(
        &self,
        params: CompanyRequest,
    ) -> Result<QueueResponse, ErrorObjectOwned> {
        let company = parse_company(&params.company)?;
        let current = self
            .console
            .decrement(company)
            .await
            .map_err(to_rpc_error)?;
        Ok(queue_response(company, current))
    }

    /// queue.reset_all.v1
    pub async fn queue_reset_all(&self) -> Result<ResetAllResponse, ErrorObjectOwned> {
        self.console.reset_all().await.map_err(to_rpc_error)?;
        info!("Reset requested over RPC");
        Ok(ResetAllResponse { reset: true })
    }

    /// ticket.issue.v1 (issuance only, nothing is printed)
    pub async fn ticket_issue(
        &self,
        params: CompanyRequest,
    ) -> Result<TicketResponse, ErrorObjectOwned> {
        let company = parse_company(&params.company)?;
        let ticket = self
            .tickets
            .issue_ticket(company)
            .await
            .map_err(to_rpc_error)?;
        Ok(TicketResponse {
            company,
            ticket,
            label: project(company, Some(ticket)).into_string(),
        })
    }

    /// station.press.v1
    pub async fn station_press(
        &self,
        params: PressRequest,
    ) -> Result<PressOutcome, ErrorObjectOwned> {
        let mut chars = params.key.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(key), None) => key,
            _ => return Err(validation(format!("key must be a single character, got {:?}", params.key))),
        };
        self.station.press_key(key).await.map_err(to_rpc_error)
    }

    /// station.status.v1
    pub fn station_status(&self) -> StationStatus {
        self.station.status()
    }

    /// display.snapshot.v1
    pub fn display_snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// printer.address.get.v1
    pub fn printer_address(&self) -> PrinterAddressResponse {
        address_response(&self.printer_settings.address())
    }

    /// printer.address.set.v1
    pub async fn set_printer_address(
        &self,
        params: SetPrinterAddressRequest,
    ) -> Result<PrinterAddressResponse, ErrorObjectOwned> {
        let address = self
            .printer_settings
            .update(&params.address)
            .await
            .map_err(to_rpc_error)?;
        Ok(address_response(&address))
    }
}

fn parse_company(raw: &str) -> Result<CompanyId, ErrorObjectOwned> {
    raw.parse::<CompanyId>()
        .map_err(|e| to_rpc_error(e.into()))
}

fn queue_response(company: CompanyId, current: i64) -> QueueResponse {
    QueueResponse {
        company,
        current,
        label: project(company, Some(current)).into_string(),
    }
}

fn address_response(address: &PrinterAddress) -> PrinterAddressResponse {
    PrinterAddressResponse {
        address: address.to_string(),
        service_url: address.service_url(DEFAULT_PRINT_TIMEOUT_MS),
    }
}
