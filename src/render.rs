// src/render.rs

use crate::api::ImportReceipt;
use crate::confidence::ConfidenceTier;
use crate::display::DisplayState;
use crate::error::SubmitError;
use crate::form::{EditorView, editor_view};
use crate::model::ClassificationRecord;
use crate::projector::project;
use crate::session::{PaneState, Taskpane};
use std::io::{self, Write};

fn tier_mark(tier: ConfidenceTier) -> String {
    format!("{} {tier}", tier.symbol())
}

/// Write the whole pane: loading line, error text, or header plus the active section.
pub fn render_pane(pane: &Taskpane, out: &mut impl Write) -> io::Result<()> {
    match pane.state() {
        PaneState::Loading => writeln!(out, "Loading email data..."),
        PaneState::Failed(message) => writeln!(out, "Error: {message}"),
        PaneState::Ready(record) => {
            render_header(record, out)?;
            match pane.view() {
                Some(DisplayState::ImportEditor(extracted)) => match pane.form() {
                    Some(form) => render_editor(&editor_view(extracted, form), out),
                    None => Ok(()),
                },
                Some(state) => render_section(state, out),
                None => Ok(()),
            }
        }
    }
}

fn render_header(record: &ClassificationRecord, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "[{}]", record.category.badge_label())?;
    if !record.reason.is_empty() {
        writeln!(out, "{}", record.reason)?;
    }
    if let Some(subject) = record.subject.as_deref() {
        writeln!(out, "Subject: {subject}")?;
    }
    match (record.sender_name.as_deref(), record.sender_email.as_deref()) {
        (Some(name), Some(email)) => writeln!(out, "From: {name} <{email}>")?,
        (Some(name), None) => writeln!(out, "From: {name}")?,
        (None, Some(email)) => writeln!(out, "From: {email}")?,
        (None, None) => {}
    }
    writeln!(out)
}

/// Matched-invoice list or the no-invoice placeholder.
pub fn render_section(state: DisplayState<'_>, out: &mut impl Write) -> io::Result<()> {
    match state {
        DisplayState::MatchedInvoices(invoices) => {
            writeln!(out, "Invoices")?;
            for invoice in invoices {
                let view = project(invoice);
                writeln!(out, "  Invoice: {} ({})", view.invoice_number, view.status.label())?;
                for line in &view.details {
                    writeln!(out, "    {line}")?;
                }
                if let Some(link) = &view.action_link {
                    writeln!(out, "    Open in Epicor: {link}")?;
                }
            }
            Ok(())
        }
        DisplayState::NoInvoiceFound => writeln!(out, "No invoice numbers found in this email."),
        DisplayState::ImportEditor(_) => writeln!(out, "New invoice ready to import."),
    }
}

pub fn render_editor(view: &EditorView<'_>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Import new invoice")?;

    match view.extracted_vendor_name {
        Some(name) => writeln!(out, "  Vendor (extracted): {name}  {}", tier_mark(view.vendor_tier))?,
        None => writeln!(out, "  Vendor  {}", tier_mark(view.vendor_tier))?,
    }
    if view.vendors.is_empty() {
        writeln!(out, "    (no vendor matches)")?;
    }
    for vendor in &view.vendors {
        let marker = if vendor.selected { "*" } else { " " };
        let pct = vendor
            .confidence
            .map(|c| format!("{c:.0}%"))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "   {marker} {} ({}) {pct}  {}",
            vendor.vendor_name,
            vendor.vendor_id,
            tier_mark(vendor.tier)
        )?;
    }

    let form = view.form;
    writeln!(out, "  Invoice #: {}  {}", form.invoice_num, tier_mark(view.invoice_num_tier))?;
    writeln!(out, "  Date: {}  {}", form.invoice_date, tier_mark(view.invoice_date_tier))?;
    writeln!(out, "  Total: {}  {}", form.invoice_total, tier_mark(view.invoice_total_tier))?;

    if !form.line_items.is_empty() {
        writeln!(out, "  Line items")?;
    }
    for (i, line) in form.line_items.iter().enumerate() {
        let part = if line.part_number.trim().is_empty() {
            String::new()
        } else {
            format!("[{}] ", line.part_number.trim())
        };
        writeln!(
            out,
            "    {}. {part}{}  qty {}  @ {}  = ${:.2}",
            i + 1,
            line.description,
            line.quantity,
            line.unit_price,
            line.effective_total()
        )?;
    }

    if let Some(notes) = view.notes {
        writeln!(out, "  Notes: {notes}")?;
    }
    Ok(())
}

pub fn render_outcome(result: &Result<ImportReceipt, SubmitError>, out: &mut impl Write) -> io::Result<()> {
    match result {
        Ok(receipt) => {
            writeln!(out, "Invoice imported successfully.")?;
            if let Some(url) = &receipt.epicor_url {
                writeln!(out, "Open in Epicor: {url}")?;
            }
            Ok(())
        }
        Err(e) => writeln!(out, "{}", e.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(pane: &Taskpane) -> String {
        let mut buf = Vec::new();
        render_pane(pane, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_loading_state() {
        assert_eq!(rendered(&Taskpane::new()), "Loading email data...\n");
    }

    #[test]
    fn test_matched_list_output() {
        let mut pane = Taskpane::new();
        pane.accept(
            serde_json::from_str(
                r#"{
                    "category": "request_for_status",
                    "reason": "Vendor asks about payment",
                    "has_invoice": true,
                    "sender_name": "Acme AR",
                    "epicor_results": [
                        {"invoice_number": "053160", "found_in_epicor": true,
                         "epicor_url": "https://erp.example/053160",
                         "invoice_data": {"VendorName": "Acme", "DocInvoiceAmt": 99.5, "PaymentStatus": "Open"}},
                        {"invoice_number": "053161", "found_in_epicor": false}
                    ]
                }"#,
            )
            .unwrap(),
        );

        let text = rendered(&pane);
        assert!(text.starts_with("[request for_status]\nVendor asks about payment\nFrom: Acme AR\n"));
        assert!(text.contains("  Invoice: 053160 (Found)\n    Vendor: Acme\n    Amount: $99.50\n    Status: Open\n"));
        assert!(text.contains("    Open in Epicor: https://erp.example/053160\n"));
        assert!(text.contains("  Invoice: 053161 (Not Found)\n"));
        assert!(!text.contains("Balance"));
    }

    #[test]
    fn test_editor_output() {
        let mut pane = Taskpane::new();
        pane.accept(
            serde_json::from_str(
                r#"{
                    "category": "new_invoice",
                    "extracted_invoice_data": {
                        "vendor_name": "ACME SUPPLY CO",
                        "vendor_name_confidence": 88,
                        "vendor_matches": [{"vendor_id": "ACME01", "vendor_name": "Acme Supply", "confidence": 91}],
                        "invoice_number": "INV-1",
                        "invoice_number_confidence": 99,
                        "invoice_total": 20,
                        "line_items": [{"part_number": "B-1", "description": "Bolts", "quantity": 4, "unit_price": 5}]
                    }
                }"#,
            )
            .unwrap(),
        );

        let text = rendered(&pane);
        assert!(text.contains("  Vendor (extracted): ACME SUPPLY CO  ● medium\n"));
        assert!(text.contains("   * Acme Supply (ACME01) 91%  ● high\n"));
        assert!(text.contains("  Invoice #: INV-1  ● high\n"));
        assert!(text.contains("  Date:   ● low\n"));
        assert!(text.contains("    1. [B-1] Bolts  qty 4  @ 5  = $20.00\n"));
    }

    #[test]
    fn test_no_invoice_output() {
        let mut pane = Taskpane::new();
        pane.accept(serde_json::from_str(r#"{"category": "misc_spam", "reason": "Newsletter"}"#).unwrap());
        assert_eq!(
            rendered(&pane),
            "[misc spam]\nNewsletter\n\nNo invoice numbers found in this email.\n"
        );
    }

    #[test]
    fn test_outcome_output() {
        let mut buf = Vec::new();
        let ok = Ok(ImportReceipt {
            epicor_url: Some("https://erp.example/1".to_string()),
        });
        render_outcome(&ok, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Invoice imported successfully.\nOpen in Epicor: https://erp.example/1\n"
        );

        let mut buf = Vec::new();
        render_outcome(&Err(SubmitError::InFlight), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "An import is already in progress\n");
    }
}
