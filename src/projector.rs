// src/projector.rs

use crate::model::MatchedInvoice;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Found,
    NotFound,
}

impl MatchStatus {
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Found => "Found",
            MatchStatus::NotFound => "Not Found",
        }
    }
}

/// One renderable detail row under a found invoice.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailLine {
    Vendor(String),
    Amount(f64),
    Balance(f64),
    Status(String),
}

impl fmt::Display for DetailLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailLine::Vendor(name) => write!(f, "Vendor: {name}"),
            DetailLine::Amount(amt) => write!(f, "Amount: ${}", currency(*amt)),
            DetailLine::Balance(bal) => write!(f, "Balance: ${}", currency(*bal)),
            DetailLine::Status(status) => write!(f, "Status: {status}"),
        }
    }
}

/// Two-decimal currency text. Exact half-cent ties round away from zero
/// (10.125 -> "10.13"); `{:.2}` alone would round them to even.
fn currency(v: f64) -> String {
    // A double can only sit exactly on a half cent at an odd multiple of 1/8.
    let eighths = v.abs() * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        format!("{:.2}", (v * 100.0).round() / 100.0)
    } else {
        format!("{v:.2}")
    }
}

/// Render descriptor for one matched invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceView {
    pub invoice_number: String,
    pub status: MatchStatus,
    /// Empty unless the invoice was found and Epicor returned its details.
    pub details: Vec<DetailLine>,
    /// "Open in Epicor" target; gated the same way as `details`.
    pub action_link: Option<String>,
}

pub fn project(invoice: &MatchedInvoice) -> InvoiceView {
    let status = if invoice.found_in_epicor {
        MatchStatus::Found
    } else {
        MatchStatus::NotFound
    };

    let mut view = InvoiceView {
        invoice_number: invoice.invoice_number.clone(),
        status,
        details: Vec::new(),
        action_link: None,
    };

    let Some(data) = invoice.invoice_data.as_ref().filter(|_| invoice.found_in_epicor) else {
        return view;
    };

    if let Some(name) = non_empty(&data.vendor_name) {
        view.details.push(DetailLine::Vendor(name.to_string()));
    }
    if let Some(amt) = data.doc_invoice_amt {
        view.details.push(DetailLine::Amount(amt));
    }
    if let Some(bal) = data.doc_invoice_bal {
        view.details.push(DetailLine::Balance(bal));
    }
    if let Some(status) = non_empty(&data.payment_status) {
        view.details.push(DetailLine::Status(status.to_string()));
    }
    view.action_link = non_empty(&invoice.epicor_url).map(str::to_string);

    view
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
