use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}

/// Why a call to the extraction service produced no usable answer.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Extraction service is not configured")]
    NotConfigured,
    #[error("Extraction request timed out")]
    Timeout,
    #[error("Extraction transport error: {0}")]
    Transport(String),
    #[error("Extraction service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed extraction response: {0}")]
    Malformed(String),
}
