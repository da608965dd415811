use thiserror::Error;

/// Validation failures for submitted section, group and layer fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{entity} {field} must not be empty")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("unknown visual type: {0}")]
    UnknownVisualType(String),
    #[error("invalid {kind} id: {value}")]
    InvalidId { kind: &'static str, value: String },
    #[error("{0}")]
    Message(String),
}

impl ModelError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField { entity, field } => {
                format!("The {entity} needs a {field} before it can be saved.")
            }
            Self::UnknownVisualType(value) => {
                format!("'{value}' is not a supported layer type.")
            }
            Self::InvalidId { kind, value } => format!("'{value}' is not a valid {kind} id."),
            Self::Message(message) => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
