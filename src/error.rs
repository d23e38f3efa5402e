// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// No usable message identifier from the host. Terminal for the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Unable to access email item")]
    NoItem,

    #[error("Email ID not available")]
    NoMessageId,
}

#[derive(Error, Debug)]
pub enum FetchError {
    /// The backend has not classified this email yet (HTTP 404).
    #[error("Email not processed yet. Please wait up to 1 minute and refresh.")]
    NotProcessed,

    #[error("Classification service returned status {0}")]
    Status(u16),

    #[error("Request to classification service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed classification record: {0}")]
    Decode(String),
}

impl FetchError {
    /// Text shown in the pane's error area.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::NotProcessed => self.to_string(),
            _ => "Unable to load email data".to_string(),
        }
    }
}

/// Client-side checks that run before any import request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a vendor")]
    MissingVendor,

    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),
}

#[derive(Error, Debug)]
pub enum ImportError {
    /// The import service answered but refused the invoice.
    #[error("Import failed: {0}")]
    Rejected(String),

    #[error("Import request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Import service returned status {0}")]
    Status(u16),

    /// A 2xx answer whose body is not an import outcome.
    #[error("Unreadable import response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("An import is already in progress")]
    InFlight,

    #[error("No invoice is staged for import")]
    NoForm,
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Import(ImportError::Transport(e)) => format!("Error importing invoice: {e}"),
            SubmitError::Import(ImportError::Status(code)) => {
                format!("Error importing invoice: service returned status {code}")
            }
            SubmitError::Import(ImportError::Decode(_)) => {
                "Error importing invoice: unreadable response from service".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to edit config TOML: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("'{key}' in config file '{path}' is not a table")]
    NotATable { key: String, path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_user_messages() {
        assert_eq!(
            FetchError::NotProcessed.user_message(),
            "Email not processed yet. Please wait up to 1 minute and refresh."
        );
        assert_eq!(FetchError::Status(500).user_message(), "Unable to load email data");
        assert_eq!(
            FetchError::Decode("missing field".into()).user_message(),
            "Unable to load email data"
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationError::MissingVendor.to_string(), "Please select a vendor");
        let missing = ValidationError::MissingRequiredFields(vec!["invoice_num", "invoice_total"]);
        assert_eq!(
            missing.to_string(),
            "Please fill in all required fields: invoice_num, invoice_total"
        );
    }

    #[test]
    fn test_rejected_import_keeps_server_reason() {
        let err = SubmitError::from(ImportError::Rejected("Vendor 'ACME' not found in Epicor".into()));
        assert_eq!(err.user_message(), "Import failed: Vendor 'ACME' not found in Epicor");
    }

    #[test]
    fn test_import_failure_messages() {
        assert_eq!(
            SubmitError::from(ImportError::Status(502)).user_message(),
            "Error importing invoice: service returned status 502"
        );
        assert_eq!(
            SubmitError::from(ImportError::Decode("expected value".into())).user_message(),
            "Error importing invoice: unreadable response from service"
        );
        assert_eq!(
            SubmitError::from(ValidationError::MissingVendor).user_message(),
            "Please select a vendor"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_message() {
        // Nothing listens on port 9 of the loopback interface.
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/health")
            .send()
            .await
            .unwrap_err();
        let detail = err.to_string();

        let msg = SubmitError::from(ImportError::from(err)).user_message();
        assert_eq!(msg, format!("Error importing invoice: {detail}"));
    }
}
