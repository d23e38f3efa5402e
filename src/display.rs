// src/display.rs

use crate::model::{Category, ClassificationRecord, ExtractedInvoice, MatchedInvoice};

/// The one taskpane section that is visible for a record.
#[derive(Debug, Clone, Copy)]
pub enum DisplayState<'a> {
    /// Stage a new invoice from the extracted fields.
    ImportEditor(&'a ExtractedInvoice),
    /// List every Epicor lookup result, in the order received.
    MatchedInvoices(&'a [MatchedInvoice]),
    NoInvoiceFound,
}

impl DisplayState<'_> {
    pub fn section_name(&self) -> &'static str {
        match self {
            DisplayState::ImportEditor(_) => "import_editor",
            DisplayState::MatchedInvoices(_) => "matched_invoices",
            DisplayState::NoInvoiceFound => "no_invoice",
        }
    }
}

/// Pick the section to show. First matching rule wins.
///
/// A `new_invoice` with extracted data gets the editor whenever no existing
/// Epicor match fully covers it, even if some lookups did succeed. In that case
/// the matched list is not shown.
pub fn resolve(record: &ClassificationRecord) -> DisplayState<'_> {
    if let Some(extracted) = editor_candidate(record) {
        return DisplayState::ImportEditor(extracted);
    }

    if record.has_invoice && !record.epicor_results.is_empty() {
        return DisplayState::MatchedInvoices(&record.epicor_results);
    }

    DisplayState::NoInvoiceFound
}

fn editor_candidate(record: &ClassificationRecord) -> Option<&ExtractedInvoice> {
    if record.category != Category::NewInvoice {
        return None;
    }
    let extracted = record.extracted_invoice_data.as_ref()?;

    let uncovered = !record.has_invoice
        || record.epicor_results.is_empty()
        || record.epicor_results.iter().any(|r| !r.found_in_epicor);

    uncovered.then_some(extracted)
}
