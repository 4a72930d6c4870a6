use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::status::{CertificateStatus, RequestStatus};
use crate::types::{CertificateId, PrincipalId, RequestId};

/// An issued certificate record.
///
/// Entities reference each other by identifier only; "certificates held by X"
/// is answered by the store, not by back-pointer collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate identifier.
    pub id: CertificateId,
    /// Display name (e.g. "Backend Cert").
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Date the certificate takes effect.
    pub issued_date: NaiveDate,
    /// Optional expiry date. `None` means the certificate never expires.
    pub expiry_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: CertificateStatus,
    /// Integrity digest (`0x` + 64 lowercase hex). Immutable once set,
    /// unique across all certificates.
    pub integrity_hash: Option<String>,
    /// Best-effort verification artifact (encoded URL token). Its absence
    /// never invalidates the certificate.
    pub verification_artifact: Option<String>,
    /// Resolve-by-id counter. Monotonic telemetry, not a security check.
    pub views: u64,
    /// Holder principal.
    pub holder: PrincipalId,
    /// Issuing principal.
    pub issuer: PrincipalId,
    /// Normalized skill names covered by this certificate.
    pub skills: BTreeSet<String>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Certificate {
    /// Whether the certificate is past its expiry date as of `on`.
    pub fn is_expired(&self, on: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| on > expiry)
    }

    /// Whether the certificate expires within the next `days` days as of
    /// `on`, and is not already expired.
    pub fn is_expiring_soon(&self, on: NaiveDate, days: i64) -> bool {
        self.expiry_date
            .is_some_and(|expiry| on + Duration::days(days) > expiry)
            && !self.is_expired(on)
    }
}

/// Response an issuer records on a pending request. Applied through the
/// store's conditional commit gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestResponse {
    Approved {
        responded_at: DateTime<Utc>,
    },
    Rejected {
        reason: String,
        responded_at: DateTime<Utc>,
    },
}

/// A holder's ask for a credential, awaiting issuer approval or rejection.
///
/// Invariants: `responded_at` is set iff the status is not Pending;
/// `rejection_reason` is set iff the status is Rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateRequest {
    /// Request identifier.
    pub id: RequestId,
    /// Requesting principal (the future holder).
    pub requester: PrincipalId,
    /// Target issuing principal. Only this issuer may respond.
    pub issuer: PrincipalId,
    /// Free-text message to the issuer.
    pub message: String,
    /// Normalized skill names being requested.
    pub skills: BTreeSet<String>,
    /// Lifecycle status. Terminal once non-Pending.
    pub status: RequestStatus,
    /// Set at creation, immutable.
    pub requested_at: DateTime<Utc>,
    /// Set exactly once, on leaving Pending.
    pub responded_at: Option<DateTime<Utc>>,
    /// Set only on rejection.
    pub rejection_reason: Option<String>,
    /// Certificate minted by the approval, recorded for auditability.
    pub certificate_id: Option<CertificateId>,
    /// Fixed request fee in minor currency units.
    pub payment_amount: u64,
    /// Whether the fee has been paid. Settlement is external; the core only
    /// records the outcome.
    pub paid: bool,
    /// External payment reference.
    pub payment_reference: Option<String>,
    /// When the fee was paid.
    pub paid_at: Option<DateTime<Utc>>,
}

impl CertificateRequest {
    /// Apply an issuer response. The caller (the store's commit gate) is
    /// responsible for ensuring the request is still Pending.
    pub fn apply_response(&mut self, response: RequestResponse) {
        match response {
            RequestResponse::Approved { responded_at } => {
                self.status = RequestStatus::Approved;
                self.responded_at = Some(responded_at);
            }
            RequestResponse::Rejected {
                reason,
                responded_at,
            } => {
                self.status = RequestStatus::Rejected;
                self.rejection_reason = Some(reason);
                self.responded_at = Some(responded_at);
            }
        }
    }

    /// Roll a response back to Pending. Compensation path for a failed
    /// approve-and-issue unit only.
    pub fn reopen(&mut self) {
        self.status = RequestStatus::Pending;
        self.responded_at = None;
        self.rejection_reason = None;
        self.certificate_id = None;
    }

    /// Check the responded/rejection field invariants.
    pub fn invariants_hold(&self) -> bool {
        let responded = self.responded_at.is_some() == (self.status != RequestStatus::Pending);
        let rejected = self.rejection_reason.is_some() == (self.status == RequestStatus::Rejected);
        responded && rejected
    }
}
