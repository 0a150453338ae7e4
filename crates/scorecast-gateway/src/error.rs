//! Error types for the gateway's HTTP API.
//!
//! [`GatewayError`] can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation, which
//! renders a `{"error", "status"}` JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scorecast_core::{RelayError, StoreError};
use scorecast_types::RejectionReason;

/// Errors that can occur in the HTTP API layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The requested match was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A match with the same id already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A score update failed validation.
    #[error("{message}")]
    Rejected {
        /// Which check failed.
        reason: RejectionReason,
        /// Description of the failure.
        message: String,
    },

    /// A match setup was invalid.
    #[error("invalid match setup: {0}")]
    InvalidSetup(String),

    /// Listing parameters were out of range.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl From<RelayError> for GatewayError {
    fn from(error: RelayError) -> Self {
        match error {
            RelayError::Store(StoreError::NotFound(id)) => Self::NotFound(format!("match {id}")),
            RelayError::Store(StoreError::AlreadyExists(id)) => {
                Self::Conflict(format!("match {id} already exists"))
            }
            RelayError::Rejected(e) => Self::Rejected {
                reason: e.reason,
                message: e.to_string(),
            },
            RelayError::Setup(e) => Self::InvalidSetup(e.to_string()),
            RelayError::InvalidQuery(e) => Self::InvalidQuery(e.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidSetup(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        };

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        if let (Self::Rejected { reason, .. }, Some(map)) = (&self, body.as_object_mut()) {
            map.insert("reason".to_owned(), serde_json::json!(reason));
        }

        (status, axum::Json(body)).into_response()
    }
}
