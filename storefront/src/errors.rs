//! Service error type and its HTTP mapping.
//!
//! Authentication failures deliberately collapse into a single
//! [`Error::Unauthenticated`] response regardless of the underlying cause
//! (malformed token, bad signature, expiry, unknown subject), so clients
//! cannot enumerate accounts or probe token internals. Authorization
//! denials surface separately as [`Error::Forbidden`]. None of these are
//! retried; every error here is terminal for its request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

use crate::store::errors::StoreError;
use crate::types::Action;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided or not valid
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Authenticated, but the principal may not perform this operation
    #[error("Not allowed to {action} {resource}")]
    Forbidden { action: Action, resource: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// State conflict, e.g. an already-registered email
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Store operation error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => StatusCode::NOT_FOUND,
                StoreError::UniqueViolation { .. } => StatusCode::CONFLICT,
                StoreError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::Forbidden { action, resource } => format!("Not allowed to {action} {resource}"),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Conflict { message } => message.clone(),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Store(store_err) => match store_err {
                StoreError::NotFound => "Resource not found".to_string(),
                StoreError::UniqueViolation { field } if *field == "email" => {
                    "An account with this email address already exists".to_string()
                }
                StoreError::UniqueViolation { .. } => "Resource already exists".to_string(),
                StoreError::Other(_) => "Internal server error".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details server-side - different log levels based on severity
        match &self {
            Error::Internal { .. } | Error::Other(_) | Error::Store(StoreError::Other(_)) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Store(_) | Error::Conflict { .. } => {
                tracing::warn!("Constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::Forbidden { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_share_one_status() {
        for error in [
            Error::Unauthenticated { message: None },
            Error::Unauthenticated {
                message: Some("Invalid email or password".to_string()),
            },
        ] {
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn forbidden_is_distinct_from_unauthenticated() {
        let error = Error::Forbidden {
            action: Action::Read,
            resource: "order 7".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(error.user_message(), "Not allowed to read order 7");
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let error = Error::Internal {
            operation: "sign token with misconfigured key".to_string(),
        };
        assert_eq!(error.user_message(), "Internal server error");
    }

    #[test]
    fn store_errors_map_to_client_statuses() {
        assert_eq!(Error::Store(StoreError::NotFound).status_code(), StatusCode::NOT_FOUND);
        let conflict = Error::Store(StoreError::UniqueViolation { field: "email" });
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.user_message(), "An account with this email address already exists");
    }
}
