/// Core domain errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("integrity error: {0}")]
    IntegrityError(String),
}
