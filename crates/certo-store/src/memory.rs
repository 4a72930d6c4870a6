use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use certo_core::records::{Certificate, CertificateRequest, RequestResponse};
use certo_core::status::{CertificateStatus, RequestStatus};
use certo_core::types::{CertificateId, PrincipalId, RequestId, Skill};

use crate::error::StoreError;
use crate::traits::{CertificateStore, RequestStore, SkillStore};

/// In-memory reference store. DashMap entry locking provides the per-record
/// mutual exclusion the conditional updates rely on.
#[derive(Default)]
pub struct MemoryStore {
    /// Normalized name → Skill. The map key is the uniqueness constraint.
    skills: DashMap<String, Skill>,
    requests: DashMap<RequestId, CertificateRequest>,
    certificates: DashMap<CertificateId, Certificate>,
    /// Integrity hash → certificate id. Uniqueness constraint on the hash.
    hash_index: DashMap<String, CertificateId>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SkillStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<Skill>, StoreError> {
        Ok(self.skills.get(name).map(|e| e.value().clone()))
    }

    fn insert(&self, skill: Skill) -> Result<Skill, StoreError> {
        match self.skills.entry(skill.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(format!(
                "skill name '{}' already exists",
                skill.name
            ))),
            Entry::Vacant(entry) => {
                entry.insert(skill.clone());
                Ok(skill)
            }
        }
    }

    fn endorse(&self, name: &str) -> Result<Skill, StoreError> {
        let mut entry = self
            .skills
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(format!("skill '{}'", name)))?;
        entry.endorsements += 1;
        Ok(entry.value().clone())
    }
}

impl RequestStore for MemoryStore {
    fn insert(&self, request: CertificateRequest) -> Result<(), StoreError> {
        match self.requests.entry(request.id) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(format!(
                "request {} already exists",
                request.id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(request);
                Ok(())
            }
        }
    }

    fn get(&self, id: RequestId) -> Result<Option<CertificateRequest>, StoreError> {
        Ok(self.requests.get(&id).map(|e| e.value().clone()))
    }

    fn list_by_requester(
        &self,
        requester: &PrincipalId,
    ) -> Result<Vec<CertificateRequest>, StoreError> {
        let mut matches: Vec<CertificateRequest> = self
            .requests
            .iter()
            .filter(|e| &e.requester == requester)
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(matches)
    }

    fn list_by_issuer(
        &self,
        issuer: &PrincipalId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<CertificateRequest>, StoreError> {
        let mut matches: Vec<CertificateRequest> = self
            .requests
            .iter()
            .filter(|e| &e.issuer == issuer && status.map_or(true, |s| e.status == s))
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(matches)
    }

    fn respond_if_pending(
        &self,
        id: RequestId,
        response: RequestResponse,
    ) -> Result<CertificateRequest, StoreError> {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("request {}", id)))?;
        if entry.status != RequestStatus::Pending {
            return Err(StoreError::PreconditionFailed(format!(
                "request has already been {}",
                entry.status.to_string().to_lowercase()
            )));
        }
        entry.apply_response(response);
        Ok(entry.value().clone())
    }

    fn reopen(&self, id: RequestId) -> Result<(), StoreError> {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("request {}", id)))?;
        entry.reopen();
        Ok(())
    }

    fn record_certificate(
        &self,
        id: RequestId,
        certificate: CertificateId,
    ) -> Result<CertificateRequest, StoreError> {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("request {}", id)))?;
        entry.certificate_id = Some(certificate);
        Ok(entry.value().clone())
    }

    fn record_payment(
        &self,
        id: RequestId,
        reference: String,
        paid_at: DateTime<Utc>,
    ) -> Result<CertificateRequest, StoreError> {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("request {}", id)))?;
        if entry.paid {
            return Err(StoreError::PreconditionFailed(
                "request is already paid".into(),
            ));
        }
        entry.paid = true;
        entry.payment_reference = Some(reference);
        entry.paid_at = Some(paid_at);
        Ok(entry.value().clone())
    }
}

impl CertificateStore for MemoryStore {
    fn insert(&self, certificate: Certificate) -> Result<(), StoreError> {
        match self.certificates.entry(certificate.id) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(format!(
                "certificate {} already exists",
                certificate.id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(certificate);
                Ok(())
            }
        }
    }

    fn get(&self, id: CertificateId) -> Result<Option<Certificate>, StoreError> {
        Ok(self.certificates.get(&id).map(|e| e.value().clone()))
    }

    fn list_by_holder(&self, holder: &PrincipalId) -> Result<Vec<Certificate>, StoreError> {
        let mut matches: Vec<Certificate> = self
            .certificates
            .iter()
            .filter(|e| &e.holder == holder)
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    fn list_by_issuer(&self, issuer: &PrincipalId) -> Result<Vec<Certificate>, StoreError> {
        let mut matches: Vec<Certificate> = self
            .certificates
            .iter()
            .filter(|e| &e.issuer == issuer)
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    fn set_integrity_hash(
        &self,
        id: CertificateId,
        hash: String,
    ) -> Result<Certificate, StoreError> {
        // Claim the hash in the index first; holding the index entry keeps
        // a concurrent identical hash from slipping in.
        match self.hash_index.entry(hash.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::UniqueViolation(format!(
                    "integrity hash {} already recorded",
                    hash
                )))
            }
            Entry::Vacant(index_entry) => {
                let mut entry = match self.certificates.get_mut(&id) {
                    Some(entry) => entry,
                    None => return Err(StoreError::NotFound(format!("certificate {}", id))),
                };
                if entry.integrity_hash.is_some() {
                    return Err(StoreError::PreconditionFailed(format!(
                        "certificate {} already has an integrity hash",
                        id
                    )));
                }
                entry.integrity_hash = Some(hash);
                index_entry.insert(id);
                Ok(entry.value().clone())
            }
        }
    }

    fn set_artifact(&self, id: CertificateId, artifact: String) -> Result<(), StoreError> {
        let mut entry = self
            .certificates
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("certificate {}", id)))?;
        entry.verification_artifact = Some(artifact);
        Ok(())
    }

    fn set_status(
        &self,
        id: CertificateId,
        status: CertificateStatus,
    ) -> Result<Certificate, StoreError> {
        let mut entry = self
            .certificates
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("certificate {}", id)))?;
        let new_status = entry
            .status
            .transition(status)
            .map_err(|e| StoreError::PreconditionFailed(e.to_string()))?;
        entry.status = new_status;
        tracing::debug!(certificate_id = %id, status = %new_status, "certificate status updated");
        Ok(entry.value().clone())
    }

    fn increment_views(&self, id: CertificateId) -> Result<Certificate, StoreError> {
        let mut entry = self
            .certificates
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("certificate {}", id)))?;
        entry.views += 1;
        Ok(entry.value().clone())
    }
}
