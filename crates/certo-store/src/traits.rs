use chrono::{DateTime, Utc};

use certo_core::records::{Certificate, CertificateRequest, RequestResponse};
use certo_core::status::{CertificateStatus, RequestStatus};
use certo_core::types::{CertificateId, PrincipalId, RequestId, Skill};

use crate::error::StoreError;

/// Skill tag store. Names are normalized before they reach the store; the
/// store enforces global uniqueness on the name.
pub trait SkillStore: Send + Sync {
    /// Look up a skill by its normalized name.
    fn get(&self, name: &str) -> Result<Option<Skill>, StoreError>;

    /// Insert a new skill. Fails with `UniqueViolation` if the name is
    /// already taken — callers racing on the same new name must treat that
    /// as "someone else created it" and re-fetch.
    fn insert(&self, skill: Skill) -> Result<Skill, StoreError>;

    /// Increment a skill's endorsement counter.
    fn endorse(&self, name: &str) -> Result<Skill, StoreError>;
}

/// Certificate request store.
pub trait RequestStore: Send + Sync {
    /// Persist a new request.
    fn insert(&self, request: CertificateRequest) -> Result<(), StoreError>;

    /// Fetch a request by id.
    fn get(&self, id: RequestId) -> Result<Option<CertificateRequest>, StoreError>;

    /// Requests created by `requester`, newest first.
    fn list_by_requester(
        &self,
        requester: &PrincipalId,
    ) -> Result<Vec<CertificateRequest>, StoreError>;

    /// Requests addressed to `issuer`, optionally filtered by status,
    /// newest first.
    fn list_by_issuer(
        &self,
        issuer: &PrincipalId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<CertificateRequest>, StoreError>;

    /// Conditional commit gate: apply `response` only if the stored request
    /// is still Pending. A caller that lost the race gets
    /// `PreconditionFailed` carrying the observed status.
    fn respond_if_pending(
        &self,
        id: RequestId,
        response: RequestResponse,
    ) -> Result<CertificateRequest, StoreError>;

    /// Roll a request back to Pending. Compensation path for a failed
    /// approve-and-issue unit only.
    fn reopen(&self, id: RequestId) -> Result<(), StoreError>;

    /// Record the certificate minted by an approval.
    fn record_certificate(
        &self,
        id: RequestId,
        certificate: CertificateId,
    ) -> Result<CertificateRequest, StoreError>;

    /// Record an external payment. Fails with `PreconditionFailed` if the
    /// request is already paid.
    fn record_payment(
        &self,
        id: RequestId,
        reference: String,
        paid_at: DateTime<Utc>,
    ) -> Result<CertificateRequest, StoreError>;
}

/// Issued certificate store.
pub trait CertificateStore: Send + Sync {
    /// Persist a new certificate.
    fn insert(&self, certificate: Certificate) -> Result<(), StoreError>;

    /// Fetch a certificate by id.
    fn get(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError>;

    /// Certificates held by `holder`.
    fn list_by_holder(&self, holder: &PrincipalId) -> Result<Vec<Certificate>, StoreError>;

    /// Certificates issued by `issuer`.
    fn list_by_issuer(&self, issuer: &PrincipalId) -> Result<Vec<Certificate>, StoreError>;

    /// Set the integrity hash, exactly once. `PreconditionFailed` if already
    /// set; `UniqueViolation` if another certificate carries the same hash —
    /// a fatal condition, never a retry path.
    fn set_integrity_hash(
        &self,
        id: CertificateId,
        hash: String,
    ) -> Result<Certificate, StoreError>;

    /// Attach the best-effort verification artifact.
    fn set_artifact(&self, id: CertificateId, artifact: String) -> Result<(), StoreError>;

    /// Transition the certificate status. Terminal states are immutable;
    /// an invalid transition fails with `PreconditionFailed`.
    fn set_status(
        &self,
        id: CertificateId,
        status: CertificateStatus,
    ) -> Result<Certificate, StoreError>;

    /// Increment the view counter and return the updated record.
    fn increment_views(&self, id: CertificateId) -> Result<Certificate, StoreError>;
}
