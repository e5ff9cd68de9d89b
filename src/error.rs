//! Error taxonomy and its HTTP mapping.
//!
//! NotFound and Validation are expected, user-facing outcomes (404/400),
//! Forbidden is 403, everything else collapses into Internal (500) without
//! leaking detail to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Key used for cross-field validation failures in error payloads.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{message}")]
    Validation {
        field: &'static str,
        kind: ValidationKind,
        message: String,
    },

    #[error("authentication required")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationKind {
    OutOfRange,
    DuplicateRating,
    MissingField,
}

impl Error {
    pub fn out_of_range(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            kind: ValidationKind::OutOfRange,
            message: message.into(),
        }
    }

    pub fn duplicate_rating() -> Self {
        Self::Validation {
            field: NON_FIELD_ERRORS,
            kind: ValidationKind::DuplicateRating,
            message: "Product already has been rated!".into(),
        }
    }

    pub fn missing_field(field: &'static str) -> Self {
        Self::Validation {
            field,
            kind: ValidationKind::MissingField,
            message: "This field is required.".into(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            Self::Validation { field, message, .. } => {
                let mut body = serde_json::Map::new();
                body.insert(field.to_string(), json!([message]));
                (StatusCode::BAD_REQUEST, Json(serde_json::Value::Object(body))).into_response()
            }
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": "Authentication credentials were not provided." })),
            )
                .into_response(),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
