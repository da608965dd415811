//! Style validation errors.

use thiserror::Error;

/// A breakpoint set that cannot be compiled.
///
/// Raised by validation before compilation; the compiler itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("{set} breakpoint {index}: zoom {zoom} is outside 0..=22")]
    ZoomOutOfRange {
        set: &'static str,
        index: usize,
        zoom: f64,
    },
    #[error("{set} breakpoint {index}: value is not a finite number")]
    NonFiniteValue { set: &'static str, index: usize },
}

impl StyleError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::ZoomOutOfRange { set, index, .. } => format!(
                "Zoom level #{} in the {} list must be between 0 and 22.",
                index + 1,
                set
            ),
            Self::NonFiniteValue { set, index } => {
                format!("Value #{} in the {} list must be a number.", index + 1, set)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleError>;
