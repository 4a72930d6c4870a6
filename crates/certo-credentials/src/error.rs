use certo_store::StoreError;

/// Credential system errors. Every variant carries a stable kind plus a
/// human-readable reason; the HTTP layer maps kinds to status codes
/// (Validation → 400, NotFound → 404, Unauthorized → 403, Conflict → 409,
/// Storage → 500).
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::PreconditionFailed(reason) => Self::Conflict(reason),
            // A uniqueness violation reaching this conversion was not
            // compensated (skill races are handled in the catalog), so it
            // is an unexpected condition.
            StoreError::UniqueViolation(what) => Self::Storage(what),
            StoreError::Unavailable(reason) => Self::Storage(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let e: CredentialError = StoreError::NotFound("request x".into()).into();
        assert!(matches!(e, CredentialError::NotFound(_)));

        let e: CredentialError = StoreError::PreconditionFailed("already approved".into()).into();
        assert!(matches!(e, CredentialError::Conflict(_)));

        let e: CredentialError = StoreError::UniqueViolation("hash".into()).into();
        assert!(matches!(e, CredentialError::Storage(_)));

        let e: CredentialError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(e, CredentialError::Storage(_)));
    }

    #[test]
    fn test_display_carries_reason() {
        let e = CredentialError::Validation("invalid certificate id format".into());
        assert_eq!(
            e.to_string(),
            "validation error: invalid certificate id format"
        );
    }
}
