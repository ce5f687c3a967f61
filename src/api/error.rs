//! Unified error responses for the admin gateway.
//!
//! Failures of the gateway itself (a malformed form body, an unknown section, a
//! store API that cannot be reached) are returned in one JSON envelope with an
//! appropriate status code. Field-level problems of a form are not errors in
//! this sense: they travel back inside the form screen.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::forms::ModalError;
use crate::remote::RemoteError;
use crate::resources::UnknownResource;

/// Error codes for API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    InternalError,
    UpstreamError,
    UpstreamUnavailable,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::UpstreamError => StatusCode::BAD_GATEWAY,
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::NotFound => "not_found",
            ErrorCode::InternalError => "internal_error",
            ErrorCode::UpstreamError => "upstream_error",
            ErrorCode::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Field-level messages, when the store API sent any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    status: StatusCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: code.status_code(),
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_details(mut self, details: HashMap<String, Vec<String>>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = ErrorResponse {
            error: ErrorBody {
                code: self.code.as_str().to_string(),
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Status { status, envelope } => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| format!("Store API responded with {}", status));
                let error = if status == StatusCode::UNAUTHORIZED {
                    ApiError::new(ErrorCode::Unauthorized, message)
                } else {
                    ApiError::new(ErrorCode::UpstreamError, message).with_status(status)
                };
                match envelope.errors {
                    Some(details) => error.with_details(details),
                    None => error,
                }
            }
            RemoteError::Transport(e) => {
                tracing::error!("Store API unreachable: {}", e);
                ApiError::new(ErrorCode::UpstreamUnavailable, e.to_string())
            }
            RemoteError::Decode(msg) => ApiError::new(ErrorCode::UpstreamError, msg),
        }
    }
}

impl From<ModalError> for ApiError {
    fn from(err: ModalError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<UnknownResource> for ApiError {
    fn from(err: UnknownResource) -> Self {
        ApiError::not_found(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Envelope;

    #[test]
    fn test_error_code_status_codes() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::UpstreamUnavailable.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_status_is_kept() {
        let mut details = HashMap::new();
        details.insert("code".to_string(), vec!["taken".to_string()]);
        let err = ApiError::from(RemoteError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            envelope: Envelope {
                message: Some("The given data was invalid.".to_string()),
                errors: Some(details),
                ..Default::default()
            },
        });

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), ErrorCode::UpstreamError);
        assert_eq!(err.message(), "The given data was invalid.");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_upstream_without_message() {
        let err = ApiError::from(RemoteError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            envelope: Envelope::default(),
        });
        assert!(err.message().contains("500"));
    }

    #[test]
    fn test_unknown_resource_is_not_found() {
        let err = ApiError::from(UnknownResource("orders".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
