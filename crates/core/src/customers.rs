//! Customer field normalisation and bulk-import row validation.

use std::collections::HashSet;

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum rows accepted in one import request.
pub const MAX_IMPORT_ROWS: usize = 5_000;

/// Trim a social handle and ensure it starts with `@`.
///
/// Blank input becomes `None` so that "no handle" is always stored as NULL.
pub fn normalize_handle(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == "@" {
        return None;
    }
    if trimmed.starts_with('@') {
        Some(trimmed.to_string())
    } else {
        Some(format!("@{trimmed}"))
    }
}

/// Lower-cased, trimmed email used for duplicate detection.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split a free-form preference string (`"glazed, jelly"`) into entries.
pub fn split_preferences(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate the fields every stored customer must have.
pub fn validate_required(first_name: &str, email: &str) -> Result<(), CoreError> {
    if first_name.trim().is_empty() {
        return Err(CoreError::Validation("First name is required".into()));
    }
    let email = email.trim();
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!("Invalid email address: {email}")));
    }
    Ok(())
}

/// Outcome of checking one import row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRowDecision {
    /// Row is valid and new.
    Add,
    /// Row duplicates an existing or earlier email.
    Skip,
    /// Row is invalid; the message is reported back per row.
    Reject(String),
}

/// Tracks emails seen during an import so duplicates inside the upload and
/// against existing customers are both skipped.
#[derive(Debug, Default)]
pub struct ImportDeduper {
    seen: HashSet<String>,
}

impl ImportDeduper {
    /// Seed with the organization's existing customer emails.
    pub fn with_existing<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            seen: existing
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .collect(),
        }
    }

    /// Decide what to do with a row and remember its email if it is added.
    pub fn check(&mut self, first_name: &str, email: &str) -> ImportRowDecision {
        if let Err(e) = validate_required(first_name, email) {
            let message = match e {
                CoreError::Validation(msg) => msg,
                other => other.to_string(),
            };
            return ImportRowDecision::Reject(message);
        }
        if self.seen.insert(normalize_email(email)) {
            ImportRowDecision::Add
        } else {
            ImportRowDecision::Skip
        }
    }
}
