use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendingError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Unsupported repayment method code: {0}")]
    UnsupportedMethod(u8),

    #[error("Unknown {kind} code: {code}")]
    UnknownCode { kind: String, code: u8 },

    #[error("Invalid placement: {reason}")]
    InvalidPlacement { reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LendingError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LendingError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LendingError {
    fn from(e: serde_json::Error) -> Self {
        LendingError::SerializationError(e.to_string())
    }
}
