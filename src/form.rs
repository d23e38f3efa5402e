// src/form.rs

use crate::confidence::{ConfidenceTier, classify_opt};
use crate::model::{ExtractedInvoice, ExtractedLineItem};
use crate::payload::parse_float;
use serde::{Deserialize, Serialize};

/// Editable copy of the extracted invoice. All values are kept as the text the
/// user sees; numbers are only parsed when the payload is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceForm {
    #[serde(default)]
    pub vendor_id: String,
    #[serde(default)]
    pub invoice_num: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub invoice_total: String,
    #[serde(default)]
    pub line_items: Vec<LineItemRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemRow {
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub line_total: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    InvoiceNum,
    InvoiceDate,
    InvoiceTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    PartNumber,
    Description,
    Quantity,
    UnitPrice,
    LineTotal,
}

fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl From<&ExtractedLineItem> for LineItemRow {
    fn from(item: &ExtractedLineItem) -> Self {
        LineItemRow {
            part_number: item.part_number.clone().unwrap_or_default(),
            description: item.description.clone(),
            quantity: number_text(item.quantity),
            unit_price: number_text(item.unit_price),
            line_total: number_text(item.line_total),
        }
    }
}

impl LineItemRow {
    /// The row's total, or `quantity * unit_price` when none was entered.
    pub fn effective_total(&self) -> f64 {
        parse_float(&self.line_total).unwrap_or_else(|| {
            parse_float(&self.quantity).unwrap_or(1.0) * parse_float(&self.unit_price).unwrap_or(0.0)
        })
    }

    fn field_mut(&mut self, field: LineField) -> &mut String {
        match field {
            LineField::PartNumber => &mut self.part_number,
            LineField::Description => &mut self.description,
            LineField::Quantity => &mut self.quantity,
            LineField::UnitPrice => &mut self.unit_price,
            LineField::LineTotal => &mut self.line_total,
        }
    }
}

impl InvoiceForm {
    /// Populate the editor. The first vendor match is preselected.
    pub fn from_extracted(extracted: &ExtractedInvoice) -> Self {
        InvoiceForm {
            vendor_id: extracted
                .vendor_matches
                .first()
                .map(|m| m.vendor_id.clone())
                .unwrap_or_default(),
            invoice_num: extracted.invoice_number.clone().unwrap_or_default(),
            invoice_date: extracted.invoice_date.clone().unwrap_or_default(),
            invoice_total: number_text(extracted.invoice_total),
            line_items: extracted.line_items.iter().map(LineItemRow::from).collect(),
        }
    }

    pub fn select_vendor(&mut self, vendor_id: impl Into<String>) {
        self.vendor_id = vendor_id.into();
    }

    pub fn set_field(&mut self, field: HeaderField, value: impl Into<String>) {
        let slot = match field {
            HeaderField::InvoiceNum => &mut self.invoice_num,
            HeaderField::InvoiceDate => &mut self.invoice_date,
            HeaderField::InvoiceTotal => &mut self.invoice_total,
        };
        *slot = value.into();
    }

    /// Returns false when `row` is out of range.
    pub fn set_line_field(&mut self, row: usize, field: LineField, value: impl Into<String>) -> bool {
        match self.line_items.get_mut(row) {
            Some(line) => {
                *line.field_mut(field) = value.into();
                true
            }
            None => false,
        }
    }

    pub fn add_line(&mut self) -> usize {
        self.line_items.push(LineItemRow::default());
        self.line_items.len() - 1
    }

    pub fn remove_line(&mut self, row: usize) -> Option<LineItemRow> {
        (row < self.line_items.len()).then(|| self.line_items.remove(row))
    }
}

/// One selectable vendor in the editor's dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorOption {
    pub vendor_id: String,
    pub vendor_name: String,
    pub confidence: Option<f64>,
    pub tier: ConfidenceTier,
    pub selected: bool,
}

/// What the import editor shows: the form plus confidence hints from extraction.
#[derive(Debug, Clone)]
pub struct EditorView<'a> {
    pub extracted_vendor_name: Option<&'a str>,
    pub vendor_tier: ConfidenceTier,
    pub vendors: Vec<VendorOption>,
    pub invoice_num_tier: ConfidenceTier,
    pub invoice_date_tier: ConfidenceTier,
    pub invoice_total_tier: ConfidenceTier,
    pub form: &'a InvoiceForm,
    pub notes: Option<&'a str>,
}

pub fn editor_view<'a>(extracted: &'a ExtractedInvoice, form: &'a InvoiceForm) -> EditorView<'a> {
    let vendors = extracted
        .vendor_matches
        .iter()
        .map(|m| VendorOption {
            vendor_id: m.vendor_id.clone(),
            vendor_name: m.vendor_name.clone(),
            confidence: m.confidence,
            tier: classify_opt(m.confidence),
            selected: m.vendor_id == form.vendor_id,
        })
        .collect();

    EditorView {
        extracted_vendor_name: extracted.vendor_name.as_deref(),
        vendor_tier: classify_opt(extracted.vendor_name_confidence),
        vendors,
        invoice_num_tier: classify_opt(extracted.invoice_number_confidence),
        invoice_date_tier: classify_opt(extracted.invoice_date_confidence),
        invoice_total_tier: classify_opt(extracted.invoice_total_confidence),
        form,
        notes: extracted.extraction_notes.as_deref().filter(|n| !n.is_empty()),
    }
}
