// src/payload.rs

use crate::error::ValidationError;
use crate::form::{InvoiceForm, LineItemRow};
use crate::model::{ImportLineItem, ImportPayload};
use regex::Regex;

/// Parse the leading number of a form value the way a browser's `parseFloat` does.
///
/// Leading whitespace is skipped and trailing garbage is ignored ("12.5 USD" is 12.5).
/// Returns `None` when no number starts the text.
pub fn parse_float(text: &str) -> Option<f64> {
    let re = Regex::new(r"^\s*([+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?))").ok()?;
    let cap = re.captures(text)?;
    cap[1].parse::<f64>().ok()
}

pub fn parse_float_or(text: &str, default: f64) -> f64 {
    parse_float(text).unwrap_or(default)
}

fn blank_to_none(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Normalize one editor row into an import line.
pub fn normalize_line(row: &LineItemRow) -> ImportLineItem {
    ImportLineItem {
        part_number: blank_to_none(&row.part_number),
        description: row.description.clone(),
        quantity: parse_float_or(&row.quantity, 1.0),
        unit_price: parse_float_or(&row.unit_price, 0.0),
        line_total: parse_float(&row.line_total),
    }
}

/// Check the form before anything is sent. Vendor is checked first.
pub fn validate(form: &InvoiceForm) -> Result<(), ValidationError> {
    if form.vendor_id.trim().is_empty() {
        return Err(ValidationError::MissingVendor);
    }

    let mut missing = Vec::new();
    if form.invoice_num.trim().is_empty() {
        missing.push("invoice_num");
    }
    if form.invoice_date.trim().is_empty() {
        missing.push("invoice_date");
    }
    if parse_float(&form.invoice_total).is_none() {
        missing.push("invoice_total");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredFields(missing))
    }
}

/// Validate the current form values and assemble a fresh payload from them.
pub fn build_payload(form: &InvoiceForm) -> Result<ImportPayload, ValidationError> {
    validate(form)?;

    let invoice_total = parse_float(&form.invoice_total)
        .ok_or_else(|| ValidationError::MissingRequiredFields(vec!["invoice_total"]))?;

    Ok(ImportPayload {
        vendor_id: form.vendor_id.trim().to_string(),
        invoice_num: form.invoice_num.trim().to_string(),
        invoice_date: form.invoice_date.trim().to_string(),
        invoice_total,
        line_items: form.line_items.iter().map(normalize_line).collect(),
    })
}
