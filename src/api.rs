// src/api.rs

use crate::config::ApiConfig;
use crate::error::{FetchError, ImportError};
use crate::model::{ClassificationRecord, ImportOutcome, ImportPayload};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{Instrument, error, info, warn};
use urlencoding::encode;

/// Where classification records come from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_record(&self, email_id: &str) -> Result<ClassificationRecord, FetchError>;
}

/// Where staged invoices are sent.
#[async_trait]
pub trait InvoiceImporter: Send + Sync {
    async fn import_invoice(&self, payload: &ImportPayload) -> Result<ImportReceipt, ImportError>;
}

/// A successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReceipt {
    pub epicor_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP client for the add-in backend.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .build()?;
        Ok(ApiClient {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn record_url(&self, email_id: &str) -> String {
        format!("{}/api/email/{}", self.base_url, encode(email_id))
    }

    pub fn import_url(&self) -> String {
        format!("{}/api/invoice/import", self.base_url)
    }

    /// Check whether the backend is up.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<HealthResponse>().await {
                Ok(body) if body.status == "ok" => {
                    info!(url = %url, "Backend is reachable");
                    true
                }
                Ok(body) => {
                    warn!(status = %body.status, "Backend reported unhealthy status");
                    false
                }
                Err(e) => {
                    warn!(error = %e, "Backend health response was not understood");
                    false
                }
            },
            Ok(resp) => {
                warn!(status = %resp.status(), "Backend returned non-OK status");
                false
            }
            Err(e) => {
                warn!(error = %e, "Backend not reachable");
                false
            }
        }
    }
}

/// Map a record-fetch status to the error taxonomy. Only 2xx passes.
pub fn check_record_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::NOT_FOUND {
        Err(FetchError::NotProcessed)
    } else if !status.is_success() {
        Err(FetchError::Status(status.as_u16()))
    } else {
        Ok(())
    }
}

/// Turn the import service's answer into a receipt or a rejection.
pub fn interpret_import(status: StatusCode, body: &str) -> Result<ImportReceipt, ImportError> {
    let outcome: ImportOutcome = match serde_json::from_str(body) {
        Ok(outcome) => outcome,
        Err(_) if !status.is_success() => return Err(ImportError::Status(status.as_u16())),
        Err(e) => return Err(ImportError::Decode(e.to_string())),
    };

    if outcome.success {
        Ok(ImportReceipt {
            epicor_url: outcome.epicor_url,
        })
    } else {
        Err(ImportError::Rejected(
            outcome.error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

impl ApiClient {
    async fn get_record(&self, email_id: &str) -> Result<ClassificationRecord, FetchError> {
        let url = self.record_url(email_id);
        info!(url = %url, "Fetching classification record");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "Classification request failed");
            FetchError::Transport(e)
        })?;

        if let Err(e) = check_record_status(response.status()) {
            warn!(status = %response.status(), "Classification record unavailable");
            return Err(e);
        }

        let body = response.text().await?;
        let record: ClassificationRecord =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        info!(
            category = record.category.as_tag(),
            has_invoice = record.has_invoice,
            results = record.epicor_results.len(),
            extracted = record.extracted_invoice_data.is_some(),
            "Classification record loaded"
        );
        Ok(record)
    }

    async fn post_import(&self, payload: &ImportPayload) -> Result<ImportReceipt, ImportError> {
        info!(
            vendor_id = %payload.vendor_id,
            total = payload.invoice_total,
            lines = payload.line_items.len(),
            "Submitting invoice import"
        );

        let response = self
            .client
            .post(self.import_url())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Import request failed");
                ImportError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        let result = interpret_import(status, &body);
        match &result {
            Ok(receipt) => info!(epicor_url = ?receipt.epicor_url, "Invoice imported"),
            Err(e) => warn!(status = %status, error = %e, "Invoice import not accepted"),
        }
        result
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_record(&self, email_id: &str) -> Result<ClassificationRecord, FetchError> {
        let span = tracing::info_span!("fetch_record", email_id = %email_id);
        self.get_record(email_id).instrument(span).await
    }
}

#[async_trait]
impl InvoiceImporter for ApiClient {
    async fn import_invoice(&self, payload: &ImportPayload) -> Result<ImportReceipt, ImportError> {
        let span = tracing::info_span!("import_invoice", invoice_num = %payload.invoice_num);
        self.post_import(payload).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "https://localhost:5000/".to_string(),
            accept_invalid_certs: true,
        })
        .unwrap()
    }

    #[test]
    fn test_record_url_encodes_id() {
        assert_eq!(
            client().record_url("CAF+x/y@mail.example.com"),
            "https://localhost:5000/api/email/CAF%2Bx%2Fy%40mail.example.com"
        );
        assert_eq!(client().import_url(), "https://localhost:5000/api/invoice/import");
    }

    #[test]
    fn test_record_status_mapping() {
        assert!(check_record_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_record_status(StatusCode::NOT_FOUND),
            Err(FetchError::NotProcessed)
        ));
        assert!(matches!(
            check_record_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(FetchError::Status(500))
        ));
        assert!(matches!(
            check_record_status(StatusCode::FORBIDDEN),
            Err(FetchError::Status(403))
        ));
    }

    #[test]
    fn test_interpret_import_success() {
        let receipt = interpret_import(
            StatusCode::OK,
            r#"{"success": true, "epicor_url": "https://erp.example/inv/1", "invoice_num": "1"}"#,
        )
        .unwrap();
        assert_eq!(receipt.epicor_url.as_deref(), Some("https://erp.example/inv/1"));
    }

    #[test]
    fn test_interpret_import_rejected() {
        let err = interpret_import(
            StatusCode::OK,
            r#"{"success": false, "error": "Failed to create invoice group"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Rejected(ref m) if m == "Failed to create invoice group"));

        let err = interpret_import(StatusCode::OK, r#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, ImportError::Rejected(ref m) if m == "Unknown error"));
    }

    #[test]
    fn test_interpret_import_error_status() {
        let err = interpret_import(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ImportError::Status(502)));

        let err = interpret_import(
            StatusCode::BAD_REQUEST,
            r#"{"success": false, "error": "Missing required fields"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::Rejected(_)));
    }

    #[test]
    fn test_interpret_import_unreadable_success_body() {
        let err = interpret_import(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ImportError::Decode(_)));
        assert!(err.to_string().starts_with("Unreadable import response: "));
    }
}
