//! HTTP Error Types
//!
//! Maps application errors to HTTP status codes and `{"error": ...}` bodies.

use crate::response::ApiResponse;
use fortress_core::error::AppError;
use hyper::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;

/// Server lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),

    #[error("Server task for {0} failed")]
    Join(SocketAddr),
}

/// HTTP status for an application error
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) | AppError::Domain(_) | AppError::Serialization(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::Probe(_) => StatusCode::BAD_GATEWAY,
        AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert AppError to an error response
pub fn to_http_error(err: AppError) -> ApiResponse {
    ApiResponse::error(status_for(&err), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fortress_core::domain::DomainError;
    use fortress_core::port::ProbeError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AppError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Domain(DomainError::MalformedLine("x".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Io(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&AppError::Probe(ProbeError::Timeout)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_body() {
        let response = to_http_error(AppError::Internal("boom".into()));
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            Some(serde_json::json!({"error": "Internal error: boom"}))
        );
    }
}
