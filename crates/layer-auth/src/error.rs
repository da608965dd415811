//! Error types for token verification.

use thiserror::Error;

/// Why a request was not authorized, or why a token could not be minted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// No `authorization` header, or only whitespace.
    #[error("missing bearer token")]
    MissingToken,

    /// Token is not three base64url segments with JSON header and claims.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Header names an algorithm other than HS256.
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature does not match the shared secret.
    #[error("token signature mismatch")]
    BadSignature,

    /// Token `exp` is in the past.
    #[error("token expired at {expired_at}")]
    Expired {
        /// Expiry as a unix timestamp.
        expired_at: i64,
    },

    /// Token subject is in the revocation store.
    #[error("token subject {subject} has been revoked")]
    Revoked {
        /// Revoked subject id.
        subject: String,
    },

    /// The shared secret is empty.
    #[error("token secret must not be empty")]
    EmptySecret,

    /// Claims could not be encoded while issuing a token.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Returns a user-friendly error message suitable for an API response.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::MissingToken => "Sign in to make changes.",
            Self::Expired { .. } => "Your session has expired. Please sign in again.",
            Self::Revoked { .. } => "Your session has ended. Please sign in again.",
            Self::Malformed(_) | Self::UnsupportedAlgorithm(_) | Self::BadSignature => {
                "Your session is not valid. Please sign in again."
            }
            Self::EmptySecret | Self::Signing(_) => "Authentication is not configured.",
        }
    }

    /// Whether the error describes a rejected request rather than a setup problem.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, Self::EmptySecret | Self::Signing(_))
    }
}

/// Result type alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
