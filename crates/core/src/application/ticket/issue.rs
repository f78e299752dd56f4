// Issue Ticket Use Case

use crate::domain::counter::ticket_after;
use crate::domain::{CompanyId, CounterPath, CounterValue};
use crate::error::Result;
use crate::port::{read_once, StateStore};
use tracing::{debug, info};

/// Read-increment-write of `ticket/{company}`.
///
/// Not atomic against other writers. Callers that can race within one process
/// must serialize per company (see `TicketService`).
///
/// # Errors
///
/// Propagates read or write failures. A failed write means no ticket was
/// issued and nothing should be printed.
pub async fn execute(store: &dyn StateStore, company: CompanyId) -> Result<i64> {
    let path = CounterPath::ticket(company);

    let current = CounterValue::or_zero(read_once(store, &path).await?);
    let next = ticket_after(current);
    debug!(company = %company, current, next, "Issuing ticket");

    store.write(&path, CounterValue::new(next)).await?;

    info!(company = %company, ticket = next, "Ticket issued");
    Ok(next)
}
