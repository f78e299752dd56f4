// Ticket Service - issuance of monotonically increasing ticket numbers

pub mod issue;

use crate::domain::CompanyId;
use crate::error::Result;
use crate::port::StateStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Issues tickets against the shared store.
///
/// Issuance for one company runs one at a time inside this process, so two
/// presses on the same station can never both observe the same number. Other
/// stations writing the same path are not coordinated with.
pub struct TicketService {
    store: Arc<dyn StateStore>,
    lanes: [Mutex<()>; 4],
}

impl TicketService {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            lanes: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Issue the next ticket for `company` and return its number
    pub async fn issue_ticket(&self, company: CompanyId) -> Result<i64> {
        let _lane = self.lanes[company.index()].lock().await;
        issue::execute(self.store.as_ref(), company).await
    }
}
