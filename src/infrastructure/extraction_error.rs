//! Error types for page extraction
//!
//! Only hard failures live here. A missing section, table or column is not an
//! error: the affected rule simply yields nothing.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ExtractionError {
    #[error("API envelope is not valid JSON: {reason}")]
    EnvelopeMalformed { reason: String },

    #[error("API envelope has no '{field}' field")]
    EnvelopeFieldMissing { field: String },

    #[error("Document is empty or unusable: {reason}")]
    EmptyDocument { reason: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Failed to build extraction worker pool: {reason}")]
    WorkerPoolFailed { reason: String },

    #[error("Extraction cancelled for '{item}'")]
    Cancelled { item: String },

    #[error("Extraction task failed: {reason}")]
    TaskFailed { reason: String },
}

impl ExtractionError {
    pub fn envelope_malformed(reason: impl ToString) -> Self {
        Self::EnvelopeMalformed {
            reason: reason.to_string(),
        }
    }

    pub fn envelope_field_missing(field: &str) -> Self {
        Self::EnvelopeFieldMissing {
            field: field.to_string(),
        }
    }

    pub fn empty_document(reason: &str) -> Self {
        Self::EmptyDocument {
            reason: reason.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the same call may succeed if attempted again
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::EnvelopeMalformed { .. } => false,
            Self::EnvelopeFieldMissing { .. } => false,
            Self::EmptyDocument { .. } => false,
            Self::InvalidSelector { .. } => false,
            Self::WorkerPoolFailed { .. } => true,
            Self::Cancelled { .. } => true,
            Self::TaskFailed { .. } => true,
        }
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExtractionError::envelope_field_missing("parse.text.*");
        assert_eq!(err.to_string(), "API envelope has no 'parse.text.*' field");

        let err = ExtractionError::invalid_selector("div[", "unexpected end");
        assert!(err.to_string().contains("div["));
    }

    #[test]
    fn test_recoverability() {
        assert!(!ExtractionError::envelope_malformed("eof").is_recoverable());
        assert!(!ExtractionError::empty_document("blank").is_recoverable());
        assert!(ExtractionError::Cancelled { item: "Morel".into() }.is_recoverable());
    }
}
