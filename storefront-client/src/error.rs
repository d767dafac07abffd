//! Client error types

use shared::error::{AppError, ErrorCode};
use std::time::Duration;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Catalog service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::InvalidResponse(err.message)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::Http(_) => AppError::network(err.to_string()),
            ClientError::Status { status, .. } => {
                AppError::network(err.to_string()).with_detail("status", *status)
            }
            ClientError::Timeout(_) => AppError::timeout(err.to_string()),
            ClientError::InvalidResponse(_) => {
                AppError::with_message(ErrorCode::CatalogResponseInvalid, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error() {
        let err: AppError = ClientError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(err.code, ErrorCode::TimeoutError);

        let err: AppError = ClientError::Status {
            status: 503,
            body: "down".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(err.message.contains("503"));

        let err: AppError = ClientError::InvalidResponse("no list".into()).into();
        assert_eq!(err.code, ErrorCode::CatalogResponseInvalid);
    }
}
