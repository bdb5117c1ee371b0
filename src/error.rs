use thiserror::Error;

/// Main error type for Cuttle operations
#[derive(Error, Debug)]
pub enum CuttleError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Cuttle operations
pub type Result<T> = std::result::Result<T, CuttleError>;

impl CuttleError {
    /// Check if this error means the referenced document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, CuttleError::DocumentNotFound(_))
    }

    /// Check if this error is caused by a bad request rather than the engine
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CuttleError::DocumentNotFound(_)
                | CuttleError::InvalidQuery(_)
                | CuttleError::InvalidDocument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CuttleError::DocumentNotFound("doc-42".to_string());
        assert_eq!(err.to_string(), "Document not found: doc-42");
    }

    #[test]
    fn test_error_classification() {
        assert!(CuttleError::DocumentNotFound("x".to_string()).is_not_found());
        assert!(CuttleError::InvalidQuery("empty".to_string()).is_client_error());
        assert!(!CuttleError::Storage("disk on fire".to_string()).is_client_error());
    }
}
