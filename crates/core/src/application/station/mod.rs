// Print Station - key-triggered ticket issuance and printing

pub mod cooldown;
pub mod status;

pub use cooldown::{Cooldown, CoolingDown, DEFAULT_COOLDOWN_MS};
pub use status::{StationState, StationStatus};

use crate::application::settings::PrinterSettings;
use crate::application::ticket::TicketService;
use crate::domain::receipt::DEFAULT_QR_BASE_URL;
use crate::domain::{CompanyId, DisplayLabel, TicketReceipt};
use crate::error::Result;
use crate::port::{PrintDevice, PrintError, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Station configuration
#[derive(Debug, Clone)]
pub struct StationConfig {
    pub cooldown_ms: i64,
    pub qr_base_url: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            qr_base_url: DEFAULT_QR_BASE_URL.to_string(),
        }
    }
}

/// Result of a trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PressOutcome {
    /// Ticket issued; printing continues in the background
    Issued {
        company: CompanyId,
        ticket: i64,
        label: DisplayLabel,
    },
    /// Rejected by the cooldown, nothing issued
    CoolingDown { remaining_ms: i64 },
    /// Key is not bound to a company
    Unbound,
}

/// A ticket-printing station.
///
/// Each accepted trigger issues a ticket, then submits it to the printer
/// without waiting. Print failures only change the status; the issued
/// number is never rolled back and nothing is retried.
pub struct PrintStation {
    tickets: Arc<TicketService>,
    device: Option<Arc<dyn PrintDevice>>,
    settings: Arc<PrinterSettings>,
    clock: Arc<dyn TimeProvider>,
    cooldown: Cooldown,
    qr_base_url: String,
    status: Arc<watch::Sender<StationStatus>>,
    // Sequence of the most recently started print
    latest_print: Arc<AtomicU64>,
}

impl PrintStation {
    /// `device` is `None` when no printer driver is available
    pub fn new(
        tickets: Arc<TicketService>,
        device: Option<Arc<dyn PrintDevice>>,
        settings: Arc<PrinterSettings>,
        clock: Arc<dyn TimeProvider>,
        config: StationConfig,
    ) -> Self {
        let (status, _rx) = watch::channel(StationStatus::idle());
        Self {
            tickets,
            device,
            settings,
            clock,
            cooldown: Cooldown::new(config.cooldown_ms),
            qr_base_url: config.qr_base_url,
            status: Arc::new(status),
            latest_print: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle a key press ('1'..'4'); other keys are ignored
    pub async fn press_key(&self, key: char) -> Result<PressOutcome> {
        match CompanyId::from_hotkey(key) {
            Some(company) => self.press(company).await,
            None => Ok(PressOutcome::Unbound),
        }
    }

    /// Issue and print a ticket for `company`, subject to the cooldown.
    ///
    /// # Errors
    ///
    /// Fails when issuance fails; nothing is printed in that case.
    pub async fn press(&self, company: CompanyId) -> Result<PressOutcome> {
        if let Err(rejection) = self.cooldown.try_enter(self.clock.now_millis()) {
            info!(company = %company, remaining_ms = rejection.remaining_ms, "Trigger ignored during cooldown");
            self.set_status(StationStatus::cooling_down(rejection));
            return Ok(PressOutcome::CoolingDown {
                remaining_ms: rejection.remaining_ms,
            });
        }

        let ticket = match self.tickets.issue_ticket(company).await {
            Ok(ticket) => ticket,
            Err(e) => {
                error!(company = %company, error = %e, "Ticket issuance failed");
                self.set_status(StationStatus::issue_failed(&e));
                return Err(e);
            }
        };

        let receipt = TicketReceipt::new(company, ticket, &self.qr_base_url);
        let label = receipt.label.clone();
        self.print(receipt);

        Ok(PressOutcome::Issued {
            company,
            ticket,
            label,
        })
    }

    /// Prints in the background. The most recently started print owns the final status.
    fn print(&self, receipt: TicketReceipt) {
        let Some(device) = self.device.clone() else {
            warn!(label = %receipt.label, "No printer driver, ticket not printed");
            self.set_status(StationStatus::print_failed(&PrintError::DriverUnavailable));
            return;
        };

        let address = self.settings.address();
        let status = Arc::clone(&self.status);
        let latest = Arc::clone(&self.latest_print);
        let mut seq = 0;
        status.send_modify(|current| {
            seq = latest.fetch_add(1, Ordering::SeqCst) + 1;
            *current = StationStatus::printing(receipt.company);
        });

        tokio::spawn(async move {
            let next = match device.submit(&receipt, &address).await {
                Ok(outcome) => {
                    info!(label = %receipt.label, code = %outcome.code, printer = %address, "Ticket printed");
                    StationStatus::printed(receipt.company, &receipt.label, &outcome)
                }
                Err(e) => {
                    warn!(label = %receipt.label, error = %e, printer = %address, "Ticket print failed");
                    StationStatus::print_failed(&e)
                }
            };
            // Only the most recently started print reports its result
            status.send_if_modified(|current| {
                if latest.load(Ordering::SeqCst) != seq {
                    debug!(label = %receipt.label, "Superseded print finished, status kept");
                    return false;
                }
                *current = next;
                true
            });
        });
    }

    fn set_status(&self, status: StationStatus) {
        self.status.send_replace(status);
    }

    /// Latest status
    pub fn status(&self) -> StationStatus {
        self.status.borrow().clone()
    }

    /// Receiver notified on every status change
    pub fn watch_status(&self) -> watch::Receiver<StationStatus> {
        self.status.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CounterPath, CounterValue, PrinterAddress};
    use crate::port::print_device::mocks::MockPrintDevice;
    use crate::port::settings_store::mocks::MockSettingsStore;
    use crate::port::state_store::mocks::MockStateStore;
    use crate::port::time_provider::mocks::ManualClock;
    use crate::port::PrintOutcome;
    use async_trait::async_trait;
    use std::time::Duration;

    /// First ticket answers slowly with a failure, later tickets succeed at once
    struct SlowFirstTicket;

    #[async_trait]
    impl PrintDevice for SlowFirstTicket {
        async fn submit(
            &self,
            receipt: &TicketReceipt,
            _address: &PrinterAddress,
        ) -> std::result::Result<PrintOutcome, PrintError> {
            if receipt.ticket_number == 1 {
                tokio::time::sleep(Duration::from_millis(150)).await;
                return Err(PrintError::Transport("timed out".into()));
            }
            Ok(PrintOutcome {
                code: "0".into(),
                status: None,
                battery: None,
            })
        }
    }

    struct Fixture {
        store: Arc<MockStateStore>,
        device: Arc<MockPrintDevice>,
        clock: Arc<ManualClock>,
        station: PrintStation,
    }

    async fn fixture_with(device: Option<MockPrintDevice>) -> Fixture {
        let store = Arc::new(MockStateStore::new());
        let device = Arc::new(device.unwrap_or_else(MockPrintDevice::new_success));
        let clock = Arc::new(ManualClock::new(1_000_000));
        let settings = Arc::new(PrinterSettings::load(Arc::new(MockSettingsStore::new())).await);
        let station = PrintStation::new(
            Arc::new(TicketService::new(store.clone())),
            Some(device.clone() as Arc<dyn PrintDevice>),
            settings,
            clock.clone(),
            StationConfig::default(),
        );
        Fixture {
            store,
            device,
            clock,
            station,
        }
    }

    async fn settled(station: &PrintStation) -> StationStatus {
        let mut rx = station.watch_status();
        let status = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| s.state.is_settled()))
            .await
            .expect("print did not settle")
            .expect("status channel closed")
            .clone();
        status
    }

    #[tokio::test]
    async fn test_press_issues_and_prints() {
        let fx = fixture_with(None).await;

        let outcome = fx.station.press_key('1').await.unwrap();

        assert_eq!(
            outcome,
            PressOutcome::Issued {
                company: CompanyId::A,
                ticket: 1,
                label: crate::domain::project(CompanyId::A, Some(1)),
            }
        );
        let status = settled(&fx.station).await;
        assert_eq!(status.state, StationState::Printed);
        assert_eq!(status.message, "Print successful! ID: A, Ticket: A001, Code: 0");

        let submitted = fx.device.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].0.label, "A001");
        assert_eq!(submitted[0].1, PrinterAddress::default());
    }

    #[tokio::test]
    async fn test_unbound_key_does_nothing() {
        let fx = fixture_with(None).await;

        assert_eq!(fx.station.press_key('x').await.unwrap(), PressOutcome::Unbound);
        assert_eq!(fx.store.write_count(), 0);
        // An unbound key must not start a cooldown
        assert!(matches!(
            fx.station.press_key('2').await.unwrap(),
            PressOutcome::Issued { .. }
        ));
    }

    #[tokio::test]
    async fn test_cooldown_rejects_rapid_presses() {
        let fx = fixture_with(None).await;

        assert!(matches!(
            fx.station.press(CompanyId::B).await.unwrap(),
            PressOutcome::Issued { ticket: 1, .. }
        ));

        fx.clock.advance(300);
        assert_eq!(
            fx.station.press(CompanyId::B).await.unwrap(),
            PressOutcome::CoolingDown { remaining_ms: 700 }
        );
        assert_eq!(
            fx.station.status().message,
            "Cooldown active - please wait 1 second(s)"
        );

        fx.clock.advance(700);
        assert!(matches!(
            fx.station.press(CompanyId::B).await.unwrap(),
            PressOutcome::Issued { ticket: 2, .. }
        ));
        assert_eq!(
            fx.store.get(&CounterPath::ticket(CompanyId::B)),
            Some(CounterValue::new(2))
        );
    }

    #[tokio::test]
    async fn test_print_failure_keeps_issued_ticket() {
        let fx = fixture_with(Some(MockPrintDevice::new_fail(PrintError::DeviceFailure {
            code: "EPTR_COVER_OPEN".into(),
            status: None,
        })))
        .await;

        fx.station.press(CompanyId::C).await.unwrap();

        let status = settled(&fx.station).await;
        assert_eq!(status.state, StationState::PrintFailed);
        assert_eq!(status.message, "Print failed: EPTR_COVER_OPEN - Unknown error");
        assert_eq!(
            fx.store.get(&CounterPath::ticket(CompanyId::C)),
            Some(CounterValue::new(1))
        );
        assert_eq!(fx.device.call_count(), 1);
    }

    #[tokio::test]
    async fn test_issue_failure_prints_nothing() {
        let fx = fixture_with(None).await;
        fx.store.set_fail_writes(true);

        assert!(fx.station.press(CompanyId::D).await.is_err());

        assert_eq!(fx.station.status().state, StationState::IssueFailed);
        assert!(fx
            .station
            .status()
            .message
            .starts_with("Error incrementing ticket number:"));
        assert_eq!(fx.device.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_driver_still_issues() {
        let store = Arc::new(MockStateStore::new());
        let settings = Arc::new(PrinterSettings::load(Arc::new(MockSettingsStore::new())).await);
        let station = PrintStation::new(
            Arc::new(TicketService::new(store.clone())),
            None,
            settings,
            Arc::new(ManualClock::new(0)),
            StationConfig::default(),
        );

        assert!(matches!(
            station.press(CompanyId::A).await.unwrap(),
            PressOutcome::Issued { ticket: 1, .. }
        ));
        assert_eq!(station.status().message, "SDK not loaded");
        assert_eq!(station.status().state, StationState::DriverUnavailable);
    }

    #[tokio::test]
    async fn test_slow_earlier_print_does_not_overwrite_later_status() {
        let store = Arc::new(MockStateStore::new());
        let clock = Arc::new(ManualClock::new(0));
        let settings = Arc::new(PrinterSettings::load(Arc::new(MockSettingsStore::new())).await);
        let station = PrintStation::new(
            Arc::new(TicketService::new(store)),
            Some(Arc::new(SlowFirstTicket) as Arc<dyn PrintDevice>),
            settings,
            clock.clone(),
            StationConfig::default(),
        );

        station.press(CompanyId::A).await.unwrap();
        clock.advance(1_000);
        station.press(CompanyId::A).await.unwrap();

        let status = settled(&station).await;
        assert_eq!(status.message, "Print successful! ID: A, Ticket: A002, Code: 0");

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(station.status(), status);
    }
}
