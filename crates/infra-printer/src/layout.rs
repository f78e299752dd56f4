// Ticket layout

use crate::artwork::TicketArtwork;
use crate::epos::{Align, Color, Cut, EposBuilder, Font, QrLevel};
use queueboard_core::domain::TicketReceipt;

/// Render a ticket: header art, big bold label, QR to the company page,
/// footer art, then feed and cut.
pub fn ticket_document(receipt: &TicketReceipt, artwork: &TicketArtwork) -> String {
    let mut builder = EposBuilder::new();

    if let Some(header) = &artwork.header {
        builder.add_image(header);
    }
    builder.add_text("\n");

    builder
        .add_text_align(Align::Center)
        .add_text_font(Font::A)
        .add_text_size(3, 3)
        .add_text_style(false, false, true, Color::Color1)
        .add_text(&format!("{}\n\n", receipt.label));

    builder
        .add_qr_code(&receipt.qr_payload, QrLevel::M, 6, 6, 0)
        .add_text("\n");

    if let Some(footer) = &artwork.footer {
        builder.add_image(footer);
    }

    builder.add_feed_line(3).add_cut(Cut::Feed);
    builder.to_xml()
}
