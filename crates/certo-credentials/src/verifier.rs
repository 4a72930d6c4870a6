use chrono::Utc;
use std::sync::Arc;

use certo_core::integrity;
use certo_core::records::Certificate;
use certo_core::status::CertificateStatus;
use certo_core::types::{CertificateId, Principal};
use certo_store::CertificateStore;

use crate::error::CredentialError;

/// Resolves certificates, checks integrity-hash shape, evaluates expiry,
/// and handles revocation.
pub struct VerificationService {
    certificates: Arc<dyn CertificateStore>,
}

impl VerificationService {
    /// Create a verification service.
    pub fn new(certificates: Arc<dyn CertificateStore>) -> Self {
        Self { certificates }
    }

    /// Resolve a certificate by id. Every resolution counts as a view,
    /// including calls made internally by other flows.
    pub fn resolve_by_id(&self, id: CertificateId) -> Result<Certificate, CredentialError> {
        match self.certificates.get(id)? {
            Some(_) => Ok(self.certificates.increment_views(id)?),
            None => Err(CredentialError::NotFound(format!("certificate {}", id))),
        }
    }

    /// Verify a certificate by its rendered identifier.
    ///
    /// Checks the identifier shape and the integrity-hash format, then
    /// evaluates expiry: an Active certificate past its expiry date is
    /// transitioned to Expired and persisted. Revoked takes precedence and
    /// is never overwritten.
    pub fn verify(&self, id_str: &str) -> Result<Certificate, CredentialError> {
        let id = CertificateId::parse(id_str)
            .map_err(|_| CredentialError::Validation("invalid certificate id format".into()))?;

        let certificate = self.resolve_by_id(id)?;

        let hash_ok = certificate
            .integrity_hash
            .as_deref()
            .map(integrity::is_well_formed)
            .unwrap_or(false);
        if !hash_ok {
            return Err(CredentialError::Validation(
                "certificate verification failed: invalid integrity hash".into(),
            ));
        }

        let today = Utc::now().date_naive();
        if certificate.status == CertificateStatus::Active && certificate.is_expired(today) {
            let expired = self
                .certificates
                .set_status(id, CertificateStatus::Expired)?;
            tracing::info!(certificate_id = %id, "certificate expired on verification");
            return Ok(expired);
        }

        Ok(certificate)
    }

    /// Revoke a certificate. Only its issuer may revoke. Idempotent:
    /// revoking an already-revoked certificate is a no-op success.
    pub fn revoke(
        &self,
        id: CertificateId,
        issuer: &Principal,
    ) -> Result<Certificate, CredentialError> {
        let certificate = self
            .certificates
            .get(id)?
            .ok_or_else(|| CredentialError::NotFound(format!("certificate {}", id)))?;

        if certificate.issuer != issuer.id {
            return Err(CredentialError::Unauthorized(
                "only the issuer can revoke this certificate".into(),
            ));
        }

        if certificate.status == CertificateStatus::Revoked {
            return Ok(certificate);
        }

        let revoked = self
            .certificates
            .set_status(id, CertificateStatus::Revoked)?;
        tracing::info!(certificate_id = %id, issuer = %issuer.id, "certificate revoked");
        Ok(revoked)
    }
}
