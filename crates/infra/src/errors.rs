//! Infrastructure error types and conversions into the domain error

use tessera_domain::TesseraError;
use thiserror::Error;

/// Errors raised by infrastructure adapters before conversion to the
/// domain error type.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<InfraError> for TesseraError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Http(inner) => {
                if inner.is_timeout() || inner.is_connect() || inner.is_request() {
                    TesseraError::Network(format!("http: {inner}"))
                } else {
                    TesseraError::Internal(format!("http: {inner}"))
                }
            }
            InfraError::Serialization(inner) => {
                TesseraError::Internal(format!("serialization: {inner}"))
            }
            InfraError::Status { status, message } => match status {
                401 | 403 => TesseraError::Auth(format!("status {status}: {message}")),
                404 => TesseraError::NotFound(message),
                _ => TesseraError::Network(format!("status {status}: {message}")),
            },
            InfraError::Config(message) => TesseraError::Config(message),
        }
    }
}
