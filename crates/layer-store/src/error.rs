//! Store error types.

use std::path::PathBuf;

use layer_model::{GroupId, ModelError};
use thiserror::Error;

/// Hierarchy store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Submitted fields failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ModelError),

    /// A rearrange was based on a stale view of the group.
    #[error("group {group} changed: expected revision {expected}, found {actual}")]
    Conflict {
        group: GroupId,
        expected: u64,
        actual: u64,
    },

    /// Shared state is unusable (a writer panicked while holding the lock).
    #[error("store unavailable: {0}")]
    Storage(String),

    /// Snapshot file I/O error.
    #[error("Failed to {operation} snapshot: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot content could not be encoded or decoded.
    #[error("Invalid snapshot {path}: {reason}")]
    Snapshot { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { kind, .. } => format!("The {kind} no longer exists."),
            Self::Validation(err) => err.user_message(),
            Self::Conflict { .. } => {
                "The layer order was changed by someone else. Reload and try again.".to_string()
            }
            Self::Storage(_) => "The layer store is unavailable.".to_string(),
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the snapshot at {}", operation, path.display()),
            Self::Snapshot { path, .. } => format!(
                "The file at {} is not a valid layer snapshot.",
                path.display()
            ),
        }
    }

    /// Whether the error is the server's fault rather than the caller's.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io { .. } | Self::Snapshot { .. }
        )
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
