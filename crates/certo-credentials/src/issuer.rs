use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

use certo_core::integrity;
use certo_core::records::Certificate;
use certo_core::status::CertificateStatus;
use certo_core::types::{CertificateId, Principal, PrincipalId};
use certo_core::ServiceConfig;
use certo_store::CertificateStore;

use crate::artifact::ArtifactGenerator;
use crate::catalog::SkillCatalog;
use crate::error::CredentialError;
use crate::identity::IdentityResolver;

/// What an issuer puts on a certificate at issuance time.
#[derive(Debug, Clone)]
pub struct IssueDetails {
    /// Certificate display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Date the certificate takes effect.
    pub issued_date: NaiveDate,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
}

/// Mints certificates: persists the record, binds the integrity hash, and
/// attaches the best-effort verification artifact.
pub struct CertificateIssuer {
    certificates: Arc<dyn CertificateStore>,
    catalog: Arc<SkillCatalog>,
    identity: Arc<dyn IdentityResolver>,
    artifacts: Arc<dyn ArtifactGenerator>,
    config: ServiceConfig,
}

impl CertificateIssuer {
    /// Create a certificate issuer.
    pub fn new(
        certificates: Arc<dyn CertificateStore>,
        catalog: Arc<SkillCatalog>,
        identity: Arc<dyn IdentityResolver>,
        artifacts: Arc<dyn ArtifactGenerator>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            certificates,
            catalog,
            identity,
            artifacts,
            config,
        }
    }

    /// Issue a certificate from `issuer` to the holder identified by
    /// `holder_id`.
    ///
    /// The holder must already be registered — this component never creates
    /// accounts. The integrity hash is computed and persisted exactly once.
    /// Artifact generation is best-effort: a failure is logged and the
    /// issuance still succeeds.
    pub fn issue(
        &self,
        issuer: &Principal,
        holder_id: &PrincipalId,
        details: IssueDetails,
        skill_names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Certificate, CredentialError> {
        let holder = self.identity.by_id(holder_id).ok_or_else(|| {
            CredentialError::NotFound("recipient not found; recipient must register first".into())
        })?;

        let skills: BTreeSet<String> = self
            .catalog
            .resolve(skill_names)?
            .into_iter()
            .map(|s| s.name)
            .collect();

        let name = details.name.clone();
        let certificate = Certificate {
            id: CertificateId::new(),
            name: details.name,
            description: details.description,
            issued_date: details.issued_date,
            expiry_date: details.expiry_date,
            status: CertificateStatus::Active,
            integrity_hash: None,
            verification_artifact: None,
            views: 0,
            holder: holder.id.clone(),
            issuer: issuer.id.clone(),
            skills,
            created_at: Utc::now(),
        };
        let id = certificate.id;
        self.certificates.insert(certificate)?;

        let hash = integrity::compute_hash(&id, &holder.id, &issuer.id, &name);
        let mut certificate = self.certificates.set_integrity_hash(id, hash)?;

        let url = self.config.verification_url(id);
        match self.artifacts.for_verification_url(&url) {
            Ok(artifact) => {
                self.certificates.set_artifact(id, artifact.clone())?;
                certificate.verification_artifact = Some(artifact);
            }
            Err(e) => {
                tracing::warn!(certificate_id = %id, error = %e, "verification artifact generation failed");
            }
        }

        tracing::info!(
            issuer = %issuer.id,
            holder = %holder.id,
            certificate_id = %id,
            "certificate issued"
        );

        Ok(certificate)
    }

    /// Certificates held by a principal, newest first. Read-only; does not
    /// count as a view.
    pub fn certificates_for_holder(
        &self,
        holder: &PrincipalId,
    ) -> Result<Vec<Certificate>, CredentialError> {
        Ok(self.certificates.list_by_holder(holder)?)
    }

    /// Certificates issued by a principal, newest first. Read-only.
    pub fn certificates_by_issuer(
        &self,
        issuer: &PrincipalId,
    ) -> Result<Vec<Certificate>, CredentialError> {
        Ok(self.certificates.list_by_issuer(issuer)?)
    }
}
