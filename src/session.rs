// src/session.rs

use crate::api::{ImportReceipt, InvoiceImporter, RecordSource};
use crate::display::{self, DisplayState};
use crate::error::SubmitError;
use crate::form::InvoiceForm;
use crate::host::{self, MailboxHost};
use crate::model::ClassificationRecord;
use crate::payload;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum PaneState {
    Loading,
    Ready(ClassificationRecord),
    /// User-visible failure text.
    Failed(String),
}

/// Taskpane state for one activation: the fetched record and the editor form.
pub struct Taskpane {
    state: PaneState,
    form: Option<InvoiceForm>,
    submitting: AtomicBool,
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Taskpane {
    fn default() -> Self {
        Self::new()
    }
}

impl Taskpane {
    pub fn new() -> Self {
        Taskpane {
            state: PaneState::Loading,
            form: None,
            submitting: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> &PaneState {
        &self.state
    }

    pub fn record(&self) -> Option<&ClassificationRecord> {
        match &self.state {
            PaneState::Ready(record) => Some(record),
            _ => None,
        }
    }

    /// Read the host's current message, fetch its record, and prepare the editor.
    pub async fn load(&mut self, host: &dyn MailboxHost, source: &dyn RecordSource) {
        self.begin_load();

        let email_id = match host::resolve_message_id(host) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Host did not provide a message id");
                self.state = PaneState::Failed(e.to_string());
                return;
            }
        };

        match source.fetch_record(&email_id).await {
            Ok(record) => {
                self.accept(record);
            }
            Err(e) => {
                warn!(email_id = %email_id, error = %e, "Could not load classification record");
                self.state = PaneState::Failed(e.user_message());
            }
        }
    }

    /// Drop the previous record and form so a reload shows the loading line.
    fn begin_load(&mut self) {
        self.state = PaneState::Loading;
        self.form = None;
    }

    /// Install an already-fetched record.
    pub fn accept(&mut self, record: ClassificationRecord) {
        let view = display::resolve(&record);
        info!(section = view.section_name(), "Taskpane ready");
        self.form = match view {
            DisplayState::ImportEditor(extracted) => Some(InvoiceForm::from_extracted(extracted)),
            _ => None,
        };
        self.state = PaneState::Ready(record);
    }

    /// Section to show for the loaded record; `None` while loading or after a failure.
    pub fn view(&self) -> Option<DisplayState<'_>> {
        self.record().map(display::resolve)
    }

    pub fn form(&self) -> Option<&InvoiceForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut InvoiceForm> {
        self.form.as_mut()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validate the current form and send it. A second call while one is pending is refused.
    pub async fn submit(&self, importer: &dyn InvoiceImporter) -> Result<ImportReceipt, SubmitError> {
        let form = self.form.as_ref().ok_or(SubmitError::NoForm)?;
        let payload = payload::build_payload(form)?;

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }
        let _guard = SubmitGuard(&self.submitting);

        Ok(importer.import_invoice(&payload).await?)
    }
}
