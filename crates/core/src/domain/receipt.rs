// Ticket Receipt Description
//
// What the core hands to the print device. Rendering it into the vendor's
// markup is the printer adapter's job.

use crate::domain::company::CompanyId;
use crate::domain::label::{project, DisplayLabel};
use serde::{Deserialize, Serialize};

/// Base URL encoded into ticket QR codes when none is configured
pub const DEFAULT_QR_BASE_URL: &str = "https://travelexpo-iota.vercel.app";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    pub company: CompanyId,
    pub ticket_number: i64,
    pub label: DisplayLabel,
    /// QR payload: the company's public display page
    pub qr_payload: String,
}

impl TicketReceipt {
    /// Build the receipt for a freshly issued ticket
    pub fn new(company: CompanyId, ticket_number: i64, qr_base_url: &str) -> Self {
        Self {
            company,
            ticket_number,
            label: project(company, Some(ticket_number)),
            qr_payload: display_page_url(qr_base_url, company),
        }
    }
}

/// Public display page of a company, e.g. `https://host/a-page`
pub fn display_page_url(base_url: &str, company: CompanyId) -> String {
    format!(
        "{}/{}-page",
        base_url.trim_end_matches('/'),
        company.letter().to_ascii_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_embeds_label_and_company_page() {
        let receipt = TicketReceipt::new(CompanyId::C, 12, "https://expo.example/");
        assert_eq!(receipt.label, "C012");
        assert_eq!(receipt.qr_payload, "https://expo.example/c-page");
    }

    #[test]
    fn test_qr_does_not_depend_on_ticket_number() {
        let first = TicketReceipt::new(CompanyId::A, 1, DEFAULT_QR_BASE_URL);
        let second = TicketReceipt::new(CompanyId::A, 2, DEFAULT_QR_BASE_URL);
        assert_eq!(first.qr_payload, second.qr_payload);
        assert_eq!(first.qr_payload, "https://travelexpo-iota.vercel.app/a-page");
    }
}
