/// Storage collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("uniqueness violation: {0}")]
    UniqueViolation(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
