//! Error types and HTTP response conversion

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the API
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// JWT encoding or key error
    #[error("JWT error: {0}")]
    Jwt(Box<jsonwebtoken::errors::Error>),

    /// Authentication subsystem error (password hashing)
    #[error("Auth error: {0}")]
    Auth(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid credentials
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Duplicate key (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Payload failed field validation (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

fn internal(code: &str) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (
        status,
        Json(ErrorResponse::with_code(status, code, "Internal server error")),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            // 404 and 401 carry no body.
            Error::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                StatusCode::NOT_FOUND.into_response()
            }

            Error::Unauthorized(msg) => {
                tracing::debug!("Unauthorized: {}", msg);
                let mut response = StatusCode::UNAUTHORIZED.into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }

            // The conflict message is plain text for clients.
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),

            Error::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_code(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg,
                )),
            )
                .into_response(),

            Error::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_code(
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    msg,
                )),
            )
                .into_response(),

            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                internal("CONFIG_ERROR")
            }

            Error::Jwt(e) => {
                tracing::error!("JWT error: {}", e);
                internal("TOKEN_ERROR")
            }

            Error::Auth(msg) => {
                tracing::error!("Auth error: {}", msg);
                internal("AUTH_ERROR")
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                internal("IO_ERROR")
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                internal("INTERNAL_ERROR")
            }
        }
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error::Jwt(Box::new(err))
    }
}

/// Field messages joined in field order, nested structs included
impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_validation_messages(&errors, &mut messages);
        messages.sort();
        Error::ValidationError(messages.join("; "))
    }
}

fn collect_validation_messages(errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid ({})", field, e.code),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_validation_messages(nested, out);
                }
            }
        }
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Internal(format!("Database error: {}", err))
    }
}
