//! Service error types and their HTTP status mapping.

use std::path::PathBuf;

use layer_auth::AuthError;
use layer_model::ModelError;
use layer_store::StoreError;
use layer_style::StyleError;
use thiserror::Error;

/// Anything that stops a request from succeeding.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("token secret is not configured (set [auth] secret or JWT_SECRET)")]
    MissingSecret,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Style(#[from] StyleError),

    /// Body missing or not the expected JSON shape.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("no route for {method} {path}")]
    NoRoute { method: String, path: String },

    #[error("{method} is not supported on {path}")]
    MethodNotAllowed { method: String, path: String },
}

impl ServiceError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::Auth(err) if err.is_unauthorized() => 401,
            Self::Model(_) | Self::Style(_) | Self::BadRequest(_) => 400,
            Self::Store(StoreError::Validation(_)) => 400,
            Self::Store(StoreError::NotFound { .. }) | Self::NoRoute { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::Store(StoreError::Conflict { .. }) => 409,
            Self::Auth(_) | Self::Store(_) | Self::Config { .. } | Self::MissingSecret => 500,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { path, .. } => {
                format!("The configuration file at {} is invalid.", path.display())
            }
            Self::MissingSecret => "Authentication is not configured.".to_string(),
            Self::Auth(err) => err.user_message().to_string(),
            Self::Store(err) => err.user_message(),
            Self::Model(err) => err.user_message(),
            Self::Style(err) => err.user_message(),
            Self::BadRequest(reason) => format!("The request could not be read: {reason}"),
            Self::NoRoute { .. } => "Nothing exists at this address.".to_string(),
            Self::MethodNotAllowed { method, .. } => {
                format!("{method} is not allowed here.")
            }
        }
    }
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
