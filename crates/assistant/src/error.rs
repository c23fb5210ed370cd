//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Conversation-level failures never reach this type: the engine turns them
//! into chat replies. `AppError` covers the HTTP surface itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::clients::ViaCepError;
use crate::ports::{ProfileError, RestaurantError};

/// Application-level error type for the assistant service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Customer-profile store operation failed.
    #[error("Profile store error: {0}")]
    Profile(#[from] ProfileError),

    /// Restaurant backend could not be reached or answered badly.
    #[error("Restaurant backend error: {0}")]
    Restaurant(#[from] RestaurantError),

    /// ViaCEP address lookup failed.
    #[error("Address lookup error: {0}")]
    AddressLookup(#[from] ViaCepError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(
            self,
            Self::Profile(_) | Self::Internal(_) | Self::Restaurant(_) | Self::AddressLookup(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Profile(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Restaurant(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::AddressLookup(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Profile(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Restaurant(_) => "Restaurant backend unavailable".to_string(),
            Self::AddressLookup(_) => "Address lookup failed".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
