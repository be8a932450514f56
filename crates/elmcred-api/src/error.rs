//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Failures render in one of two JSON shapes, which existing clients of
//! the credential builder read directly:
//!
//! ```text
//! {"field_errors": {"course_id": "The course with ... is not found."}}
//! {"error": ["The user does not have access to generate credentials."]}
//! ```
//!
//! Rejected named inputs use the first shape; everything else uses the
//! second. Internal error details never reach the client.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Body of a general error: a list holding the message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: Vec<String>,
}

/// Body of an input error: one message per rejected field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorsBody {
    pub field_errors: FieldErrors,
}

/// Field name → message.
pub type FieldErrors = BTreeMap<String, String>;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request could not be accepted as sent (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// One or more named inputs were rejected. Carries its own status so
    /// that a missing course or user (404) and a malformed value (400)
    /// share the same body shape.
    #[error("invalid fields: {errors:?}")]
    Fields {
        status: StatusCode,
        errors: FieldErrors,
    },

    /// Authentication failure: missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure: insufficient permissions (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A single rejected field.
    pub fn field(status: StatusCode, field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.into());
        Self::Fields { status, errors }
    }

    /// Several rejected query or path inputs (400).
    pub fn invalid_fields(errors: FieldErrors) -> Self {
        Self::Fields {
            status: StatusCode::BAD_REQUEST,
            errors,
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Fields { status, .. } => *status,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let message = match self {
            Self::Fields { errors, .. } => {
                return (status, Json(FieldErrorsBody { field_errors: errors })).into_response();
            }
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg,
        };

        (status, Json(ErrorBody { error: vec![message] })).into_response()
    }
}

impl From<elmcred_vc::VcError> for AppError {
    fn from(err: elmcred_vc::VcError) -> Self {
        Self::Internal(err.to_string())
    }
}
