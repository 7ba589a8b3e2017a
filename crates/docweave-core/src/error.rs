//! Error types for Docweave

use thiserror::Error;

/// Result type alias using Docweave's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Docweave error types with helpful messages and suggestions
///
/// Only problems with the document set as a whole surface here. Bad
/// individual records (a relationship pointing at an unknown document,
/// an edge with a dangling endpoint) are dropped where they are found.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E100-E199)
    #[error("Invalid document set: {0}. Expected a JSON array of document records.")]
    InvalidDocumentSet(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Collaborator errors (E200-E299)
    #[error("Document source failed: {0}")]
    DocumentSource(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Serialization errors (E700-E799)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDocumentSet(_) => "E100",
            Self::InvalidInput(_) => "E101",
            Self::DocumentSource(_) => "E200",
            Self::ConfigError(_) => "E600",
            Self::Json(_) => "E700",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidDocumentSet(_) => {
                Some("Provide a JSON array such as [{\"id\": 1, \"name\": \"...\", \"category\": \"...\"}]".to_string())
            }
            Self::ConfigError(_) => Some("docweave config list".to_string()),
            Self::DocumentSource(_) => Some("Check that the document file exists and is readable".to_string()),
            _ => None,
        }
    }

    /// Shorthand for an invalid document set error
    pub fn invalid_documents(reason: impl Into<String>) -> Self {
        Self::InvalidDocumentSet(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::invalid_documents("null").code(), "E100");
        assert_eq!(Error::DocumentSource("gone".into()).code(), "E200");
        assert_eq!(Error::Other("x".into()).code(), "E9999");
    }

    #[test]
    fn test_invalid_document_set_message() {
        let err = Error::invalid_documents("document set is missing");
        assert!(err.to_string().contains("document set is missing"));
        assert!(err.suggestion().is_some());
    }
}
