use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

use certo_core::records::{CertificateRequest, RequestResponse};
use certo_core::status::RequestStatus;
use certo_core::types::{Principal, RequestId, Role};
use certo_core::ServiceConfig;
use certo_store::RequestStore;

use crate::catalog::SkillCatalog;
use crate::error::CredentialError;
use crate::identity::IdentityResolver;
use crate::issuer::{CertificateIssuer, IssueDetails};

/// What an issuer puts on the certificate when approving a request.
#[derive(Debug, Clone)]
pub struct ApprovalDetails {
    /// Certificate display name.
    pub certificate_name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Date the certificate takes effect.
    pub issued_date: NaiveDate,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
}

/// Manages the certificate-request lifecycle: create, list, approve, reject,
/// and payment recording.
pub struct RequestWorkflow {
    requests: Arc<dyn RequestStore>,
    catalog: Arc<SkillCatalog>,
    identity: Arc<dyn IdentityResolver>,
    issuer: Arc<CertificateIssuer>,
    config: ServiceConfig,
}

impl RequestWorkflow {
    /// Create a request workflow.
    pub fn new(
        requests: Arc<dyn RequestStore>,
        catalog: Arc<SkillCatalog>,
        identity: Arc<dyn IdentityResolver>,
        issuer: Arc<CertificateIssuer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            requests,
            catalog,
            identity,
            issuer,
            config,
        }
    }

    /// Submit a request for a credential covering `skill_names`, addressed
    /// to the issuer identified by `issuer_username`. No payment is
    /// collected at creation; the fixed fee is recorded unpaid.
    pub fn create_request(
        &self,
        requester: &Principal,
        issuer_username: &str,
        message: impl Into<String>,
        skill_names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<CertificateRequest, CredentialError> {
        if !requester.role.can_request() {
            return Err(CredentialError::Unauthorized(format!(
                "role {} cannot submit certificate requests",
                requester.role
            )));
        }

        let issuer = self.identity.by_username(issuer_username).ok_or_else(|| {
            CredentialError::NotFound(format!("issuer not found: {}", issuer_username))
        })?;
        if issuer.role != Role::Issuer {
            return Err(CredentialError::Validation(format!(
                "{} is not an issuer",
                issuer_username
            )));
        }

        let skills: BTreeSet<String> = self
            .catalog
            .resolve(skill_names)?
            .into_iter()
            .map(|s| s.name)
            .collect();

        let request = CertificateRequest {
            id: RequestId::new(),
            requester: requester.id.clone(),
            issuer: issuer.id.clone(),
            message: message.into(),
            skills,
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
            responded_at: None,
            rejection_reason: None,
            certificate_id: None,
            payment_amount: self.config.request_fee_minor,
            paid: false,
            payment_reference: None,
            paid_at: None,
        };
        self.requests.insert(request.clone())?;

        tracing::info!(
            request_id = %request.id,
            requester = %requester.id,
            issuer = %issuer.id,
            "certificate request created"
        );

        Ok(request)
    }

    /// Requests created by `requester`, newest first.
    pub fn list_by_requester(
        &self,
        requester: &Principal,
    ) -> Result<Vec<CertificateRequest>, CredentialError> {
        Ok(self.requests.list_by_requester(&requester.id)?)
    }

    /// Requests addressed to `issuer`, optionally filtered by status,
    /// newest first.
    pub fn list_by_issuer(
        &self,
        issuer: &Principal,
        status: Option<RequestStatus>,
    ) -> Result<Vec<CertificateRequest>, CredentialError> {
        Ok(self.requests.list_by_issuer(&issuer.id, status)?)
    }

    /// Approve a pending request and issue the certificate.
    ///
    /// The Pending→Approved transition is the commit gate: of two concurrent
    /// approvals exactly one passes, the other observes `Conflict`. If
    /// issuance fails after the gate, the request is reopened to Pending so
    /// no partial state stays visible.
    pub fn approve(
        &self,
        request_id: RequestId,
        issuer: &Principal,
        details: ApprovalDetails,
    ) -> Result<CertificateRequest, CredentialError> {
        let request = self.owned_request(request_id, issuer)?;
        if request.status != RequestStatus::Pending {
            return Err(CredentialError::Conflict(format!(
                "request has already been {}",
                request.status.to_string().to_lowercase()
            )));
        }

        self.requests.respond_if_pending(
            request_id,
            RequestResponse::Approved {
                responded_at: Utc::now(),
            },
        )?;

        let issued = self.issuer.issue(
            issuer,
            &request.requester,
            IssueDetails {
                name: details.certificate_name,
                description: details.description,
                issued_date: details.issued_date,
                expiry_date: details.expiry_date,
            },
            request.skills.iter(),
        );

        match issued {
            Ok(certificate) => {
                let approved = self
                    .requests
                    .record_certificate(request_id, certificate.id)?;
                tracing::info!(
                    request_id = %request_id,
                    certificate_id = %certificate.id,
                    "certificate request approved"
                );
                Ok(approved)
            }
            Err(e) => {
                self.requests.reopen(request_id)?;
                tracing::warn!(
                    request_id = %request_id,
                    error = %e,
                    "issuance failed, request reopened"
                );
                Err(e)
            }
        }
    }

    /// Reject a pending request with a non-empty reason.
    pub fn reject(
        &self,
        request_id: RequestId,
        issuer: &Principal,
        reason: impl Into<String>,
    ) -> Result<CertificateRequest, CredentialError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(CredentialError::Validation(
                "rejection reason must not be empty".into(),
            ));
        }

        let request = self.owned_request(request_id, issuer)?;
        if request.status != RequestStatus::Pending {
            return Err(CredentialError::Conflict(format!(
                "request has already been {}",
                request.status.to_string().to_lowercase()
            )));
        }

        let rejected = self.requests.respond_if_pending(
            request_id,
            RequestResponse::Rejected {
                reason,
                responded_at: Utc::now(),
            },
        )?;

        tracing::info!(request_id = %request_id, "certificate request rejected");
        Ok(rejected)
    }

    /// Record an external payment against a request. Settlement happens
    /// outside the core; only the outcome is stored.
    pub fn record_payment(
        &self,
        request_id: RequestId,
        requester: &Principal,
        reference: impl Into<String>,
    ) -> Result<CertificateRequest, CredentialError> {
        let request = self
            .requests
            .get(request_id)?
            .filter(|r| r.requester == requester.id)
            .ok_or_else(|| {
                CredentialError::NotFound(format!("certificate request {}", request_id))
            })?;

        Ok(self
            .requests
            .record_payment(request.id, reference.into(), Utc::now())?)
    }

    /// Fetch a request that exists and belongs to `issuer`. Requests
    /// addressed to someone else are indistinguishable from absent ones.
    fn owned_request(
        &self,
        request_id: RequestId,
        issuer: &Principal,
    ) -> Result<CertificateRequest, CredentialError> {
        self.requests
            .get(request_id)?
            .filter(|r| r.issuer == issuer.id)
            .ok_or_else(|| {
                CredentialError::NotFound(format!("certificate request {}", request_id))
            })
    }
}
