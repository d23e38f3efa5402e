// src/host.rs

use crate::error::HostError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The message the user has open in the mail client.
#[derive(Debug, Clone, Default)]
pub struct MailItem {
    pub internet_message_id: Option<String>,
}

/// Access to the host mail client's current item.
pub trait MailboxHost {
    fn current_item(&self) -> Option<MailItem>;
}

/// Read the current item's internet message id, without its angle brackets.
pub fn resolve_message_id(host: &dyn MailboxHost) -> Result<String, HostError> {
    let item = host.current_item().ok_or(HostError::NoItem)?;
    let raw = item
        .internet_message_id
        .filter(|id| !id.is_empty())
        .ok_or(HostError::NoMessageId)?;
    Ok(clean_message_id(&raw))
}

pub fn clean_message_id(raw: &str) -> String {
    raw.chars().filter(|c| *c != '<' && *c != '>').collect()
}

/// A host whose current item carries a fixed id, e.g. from the command line.
pub struct StaticHost {
    message_id: Option<String>,
}

impl StaticHost {
    pub fn new(message_id: impl Into<String>) -> Self {
        StaticHost {
            message_id: Some(message_id.into()),
        }
    }

    /// A host with no open item.
    pub fn empty() -> Self {
        StaticHost { message_id: None }
    }
}

impl MailboxHost for StaticHost {
    fn current_item(&self) -> Option<MailItem> {
        self.message_id.as_ref().map(|id| MailItem {
            internet_message_id: Some(id.clone()),
        })
    }
}

/// A host backed by a saved RFC 822 message (`.eml`).
pub struct EmlHost {
    path: PathBuf,
}

impl EmlHost {
    pub fn new(path: impl AsRef<Path>) -> Self {
        EmlHost {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MailboxHost for EmlHost {
    fn current_item(&self) -> Option<MailItem> {
        let content = match fs::read(&self.path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Could not read message file");
                return None;
            }
        };
        Some(MailItem {
            internet_message_id: find_header(&content, "Message-ID"),
        })
    }
}

/// Find a header value in the header block, unfolding continuation lines.
fn find_header(message: &str, name: &str) -> Option<String> {
    let mut current: Option<(String, String)> = None;

    for line in message.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some((_, value)) = current.as_mut() {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((key, value)) = current.take() {
            if key.eq_ignore_ascii_case(name) {
                return Some(value);
            }
        }

        current = line
            .split_once(':')
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()));
    }

    current
        .filter(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}
