// src/model.rs

use serde::{Deserialize, Serialize};

/// Email category assigned by the backend classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    NewInvoice,
    SupplierStatement,
    RequestForStatus,
    AccountUpdate,
    MiscSpam,
    Other,
    /// A tag this build does not know about, kept verbatim.
    Unrecognized(String),
}

impl Category {
    pub fn as_tag(&self) -> &str {
        match self {
            Category::NewInvoice => "new_invoice",
            Category::SupplierStatement => "supplier_statement",
            Category::RequestForStatus => "request_for_status",
            Category::AccountUpdate => "account_update",
            Category::MiscSpam => "misc_spam",
            Category::Other => "other",
            Category::Unrecognized(tag) => tag,
        }
    }

    /// Badge text: the tag with its first underscore turned into a space.
    pub fn badge_label(&self) -> String {
        self.as_tag().replacen('_', " ", 1)
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "new_invoice" => Category::NewInvoice,
            "supplier_statement" => Category::SupplierStatement,
            "request_for_status" => Category::RequestForStatus,
            "account_update" => Category::AccountUpdate,
            "misc_spam" => Category::MiscSpam,
            "other" => Category::Other,
            _ => Category::Unrecognized(tag),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_tag().to_string()
    }
}

/// Everything the backend computed for one email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub category: Category,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub has_invoice: bool,
    #[serde(default)]
    pub epicor_results: Vec<MatchedInvoice>,
    #[serde(default)]
    pub extracted_invoice_data: Option<ExtractedInvoice>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub invoice_numbers: Vec<String>,
}

/// An invoice number found in the email, checked against Epicor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedInvoice {
    pub invoice_number: String,
    #[serde(default)]
    pub found_in_epicor: bool,
    #[serde(default)]
    pub invoice_data: Option<EpicorInvoiceDetails>,
    #[serde(default)]
    pub epicor_url: Option<String>,
}

/// Invoice header fields as Epicor reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpicorInvoiceDetails {
    #[serde(rename = "VendorName", default)]
    pub vendor_name: Option<String>,
    #[serde(rename = "DocInvoiceAmt", default)]
    pub doc_invoice_amt: Option<f64>,
    #[serde(rename = "DocInvoiceBal", default)]
    pub doc_invoice_bal: Option<f64>,
    #[serde(rename = "PaymentStatus", default)]
    pub payment_status: Option<String>,
}

/// A candidate vendor from fuzzy matching the extracted vendor name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorMatch {
    pub vendor_id: String,
    pub vendor_name: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A line item pulled out of the invoice document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedLineItem {
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub line_total: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Structured invoice data the backend extracted from a `new_invoice` email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub vendor_matches: Vec<VendorMatch>,
    #[serde(default)]
    pub vendor_name_confidence: Option<f64>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_number_confidence: Option<f64>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub invoice_date_confidence: Option<f64>,
    #[serde(default)]
    pub invoice_total: Option<f64>,
    #[serde(default)]
    pub invoice_total_confidence: Option<f64>,
    #[serde(default)]
    pub line_items: Vec<ExtractedLineItem>,
    #[serde(default)]
    pub extraction_notes: Option<String>,
}

/// Request body for the import service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPayload {
    pub vendor_id: String,
    pub invoice_num: String,
    pub invoice_date: String,
    pub invoice_total: f64,
    pub line_items: Vec<ImportLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportLineItem {
    pub part_number: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: Option<f64>,
}

/// Response body from the import service.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    #[serde(default)]
    pub epicor_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags() {
        let parsed: Category = serde_json::from_str("\"new_invoice\"").unwrap();
        assert_eq!(parsed, Category::NewInvoice);

        let unknown: Category = serde_json::from_str("\"purchase_order_ack\"").unwrap();
        assert_eq!(unknown, Category::Unrecognized("purchase_order_ack".to_string()));
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"purchase_order_ack\"");
    }

    #[test]
    fn test_badge_label_replaces_first_underscore_only() {
        assert_eq!(Category::NewInvoice.badge_label(), "new invoice");
        assert_eq!(Category::RequestForStatus.badge_label(), "request for_status");
        assert_eq!(Category::Other.badge_label(), "other");
    }

    #[test]
    fn test_record_defaults() {
        let record: ClassificationRecord =
            serde_json::from_str(r#"{"category": "misc_spam"}"#).unwrap();
        assert_eq!(record.category, Category::MiscSpam);
        assert!(!record.has_invoice);
        assert!(record.epicor_results.is_empty());
        assert!(record.extracted_invoice_data.is_none());
        assert_eq!(record.reason, "");
    }

    #[test]
    fn test_epicor_details_field_names() {
        let matched: MatchedInvoice = serde_json::from_str(
            r#"{
                "invoice_number": "C629958",
                "found_in_epicor": true,
                "epicor_url": "https://erp.example/inv",
                "invoice_data": {
                    "VendorName": "Acme Supply",
                    "DocInvoiceAmt": 120.5,
                    "DocInvoiceBal": null,
                    "PaymentStatus": "Open",
                    "OpenPayable": true
                }
            }"#,
        )
        .unwrap();
        let details = matched.invoice_data.unwrap();
        assert_eq!(details.vendor_name.as_deref(), Some("Acme Supply"));
        assert_eq!(details.doc_invoice_amt, Some(120.5));
        assert_eq!(details.doc_invoice_bal, None);
    }

    #[test]
    fn test_payload_serializes_nulls() {
        let payload = ImportPayload {
            vendor_id: "ACME".to_string(),
            invoice_num: "INV-1".to_string(),
            invoice_date: "2025-03-01".to_string(),
            invoice_total: 10.0,
            line_items: vec![ImportLineItem {
                part_number: None,
                description: "Widget".to_string(),
                quantity: 1.0,
                unit_price: 0.0,
                line_total: None,
            }],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["line_items"][0]["part_number"].is_null());
        assert!(value["line_items"][0]["line_total"].is_null());
    }
}
