use std::fmt;

use crate::error::CoreError;

/// Lifecycle status of an issued certificate.
///
/// Valid transitions:
/// - Active → Expired (automatic, expiry date passed)
/// - Active → Revoked (issuer-initiated)
///
/// Expired and Revoked are terminal; nothing leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CertificateStatus {
    /// Certificate is valid and presentable.
    Active,
    /// Certificate's expiry date has passed. Final state.
    Expired,
    /// Certificate was revoked by its issuer. Final state.
    Revoked,
}

impl CertificateStatus {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Expired | Self::Revoked)
    }

    /// Validate a transition to `target`. Returns the new status on success.
    pub fn transition(self, target: CertificateStatus) -> Result<CertificateStatus, CoreError> {
        match (self, target) {
            (Self::Active, Self::Expired) | (Self::Active, Self::Revoked) => {
                tracing::debug!(from = %self, to = %target, "certificate status transition");
                Ok(target)
            }
            _ => Err(CoreError::InvalidStateTransition {
                from: self.to_string(),
                to: target.to_string(),
            }),
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Lifecycle status of a certificate request.
///
/// A request starts Pending and moves exactly once to Approved or Rejected;
/// both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RequestStatus {
    /// Awaiting an issuer response.
    Pending,
    /// Approved; a certificate was issued. Final state.
    Approved,
    /// Rejected with a reason. Final state.
    Rejected,
}

impl RequestStatus {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}
