//! Integration test: Full request → approval → verification lifecycle
//! across crates.
//!
//! Exercises certo-credentials, certo-store, and certo-core together
//! through the same store a real deployment would share.

use std::sync::Arc;

use chrono::{Duration, Utc};

use certo_core::status::{CertificateStatus, RequestStatus};
use certo_core::types::{Principal, Role};
use certo_core::ServiceConfig;
use certo_credentials::{
    ApprovalDetails, CertificateIssuer, CredentialError, MemoryDirectory, RequestWorkflow,
    SkillCatalog, UrlTokenGenerator, VerificationService,
};
use certo_store::MemoryStore;

struct System {
    workflow: RequestWorkflow,
    issuer_svc: Arc<CertificateIssuer>,
    verification: VerificationService,
    alice: Principal,
    bob: Principal,
}

/// Helper: wire the full component graph over one shared in-memory store,
/// with alice (individual) and bob (issuer) registered.
fn system() -> System {
    let store = Arc::new(MemoryStore::new());
    let directory = Arc::new(MemoryDirectory::new());

    let alice = Principal::new("u-alice", "alice", "alice@example.com", Role::Individual);
    let bob = Principal::new("u-bob", "bob", "bob@example.com", Role::Issuer)
        .with_organization("Acme Certification");
    directory.register(alice.clone());
    directory.register(bob.clone());

    let config = ServiceConfig::default();
    let catalog = Arc::new(SkillCatalog::new(Arc::clone(&store) as _));
    let issuer_svc = Arc::new(CertificateIssuer::new(
        Arc::clone(&store) as _,
        Arc::clone(&catalog),
        Arc::clone(&directory) as _,
        Arc::new(UrlTokenGenerator),
        config.clone(),
    ));
    let workflow = RequestWorkflow::new(
        Arc::clone(&store) as _,
        catalog,
        directory,
        Arc::clone(&issuer_svc),
        config,
    );
    let verification = VerificationService::new(store);

    System {
        workflow,
        issuer_svc,
        verification,
        alice,
        bob,
    }
}

fn approval(name: &str) -> ApprovalDetails {
    ApprovalDetails {
        certificate_name: name.into(),
        description: None,
        issued_date: Utc::now().date_naive(),
        expiry_date: None,
    }
}

// =========================================================================
// Happy path: request → approve → verify
// =========================================================================

#[test]
fn test_request_approve_verify_end_to_end() {
    let s = system();

    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please certify my backend work", ["Go", "SQL"])
        .expect("request creation should succeed");
    assert_eq!(request.status, RequestStatus::Pending);

    let approved = s
        .workflow
        .approve(request.id, &s.bob, approval("Backend Cert"))
        .expect("approval should succeed");
    assert_eq!(approved.status, RequestStatus::Approved);
    assert!(approved.responded_at.is_some());
    let certificate_id = approved.certificate_id.expect("certificate recorded");

    let certificate = s.verification.resolve_by_id(certificate_id).unwrap();
    assert_eq!(certificate.status, CertificateStatus::Active);
    assert_eq!(certificate.holder, s.alice.id);
    assert_eq!(certificate.issuer, s.bob.id);
    assert_eq!(certificate.name, "Backend Cert");
    assert!(certificate.skills.contains("go"));
    assert!(certificate.skills.contains("sql"));
    assert_eq!(certificate.integrity_hash.as_deref().unwrap().len(), 66);

    let verified = s.verification.verify(&certificate_id.to_string()).unwrap();
    assert_eq!(verified.status, CertificateStatus::Active);

    // One view from resolve_by_id, one from verify's internal resolution.
    assert_eq!(verified.views, 2);
}

#[test]
fn test_holder_sees_certificate_in_listing() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["rust"])
        .unwrap();
    s.workflow
        .approve(request.id, &s.bob, approval("Rust Cert"))
        .unwrap();

    let held = s.issuer_svc.certificates_for_holder(&s.alice.id).unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].name, "Rust Cert");

    let issued = s.issuer_svc.certificates_by_issuer(&s.bob.id).unwrap();
    assert_eq!(issued.len(), 1);
}

// =========================================================================
// Rejection path
// =========================================================================

#[test]
fn test_rejection_leaves_no_certificate() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["go"])
        .unwrap();

    let rejected = s
        .workflow
        .reject(request.id, &s.bob, "insufficient evidence")
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("insufficient evidence")
    );
    assert!(rejected.responded_at.is_some());
    assert!(rejected.certificate_id.is_none());

    assert!(s
        .issuer_svc
        .certificates_for_holder(&s.alice.id)
        .unwrap()
        .is_empty());
}

// =========================================================================
// Double approval: exactly one certificate
// =========================================================================

#[test]
fn test_double_approval_yields_one_certificate() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["go"])
        .unwrap();

    s.workflow
        .approve(request.id, &s.bob, approval("Backend Cert"))
        .unwrap();
    let second = s
        .workflow
        .approve(request.id, &s.bob, approval("Backend Cert"));
    assert!(matches!(second, Err(CredentialError::Conflict(_))));

    let held = s.issuer_svc.certificates_for_holder(&s.alice.id).unwrap();
    assert_eq!(held.len(), 1);
}

// =========================================================================
// Expiry and revocation through verify
// =========================================================================

#[test]
fn test_verify_transitions_expired_certificate() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["go"])
        .unwrap();
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let approved = s
        .workflow
        .approve(
            request.id,
            &s.bob,
            ApprovalDetails {
                certificate_name: "Short-lived Cert".into(),
                description: None,
                issued_date: yesterday - Duration::days(30),
                expiry_date: Some(yesterday),
            },
        )
        .unwrap();
    let certificate_id = approved.certificate_id.unwrap();

    let verified = s.verification.verify(&certificate_id.to_string()).unwrap();
    assert_eq!(verified.status, CertificateStatus::Expired);

    // Terminal: verifying again keeps it Expired.
    let again = s.verification.verify(&certificate_id.to_string()).unwrap();
    assert_eq!(again.status, CertificateStatus::Expired);
}

#[test]
fn test_revoked_is_not_overwritten_by_expiry() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["go"])
        .unwrap();
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let approved = s
        .workflow
        .approve(
            request.id,
            &s.bob,
            ApprovalDetails {
                certificate_name: "Revoked Cert".into(),
                description: None,
                issued_date: yesterday - Duration::days(30),
                expiry_date: Some(yesterday),
            },
        )
        .unwrap();
    let certificate_id = approved.certificate_id.unwrap();

    s.verification.revoke(certificate_id, &s.bob).unwrap();
    // Idempotent second revoke.
    s.verification.revoke(certificate_id, &s.bob).unwrap();

    let verified = s.verification.verify(&certificate_id.to_string()).unwrap();
    assert_eq!(verified.status, CertificateStatus::Revoked);
}

// =========================================================================
// Identifier and skill edge cases
// =========================================================================

#[test]
fn test_verify_rejects_non_uuid_identifier() {
    let s = system();
    let result = s.verification.verify("0xnot-a-certificate");
    assert!(matches!(result, Err(CredentialError::Validation(_))));
}

#[test]
fn test_skills_deduplicate_across_request_and_certificate() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["Go", "go", " GO "])
        .unwrap();
    assert_eq!(request.skills.len(), 1);

    let approved = s
        .workflow
        .approve(request.id, &s.bob, approval("Go Cert"))
        .unwrap();
    let certificate = s
        .verification
        .resolve_by_id(approved.certificate_id.unwrap())
        .unwrap();
    assert_eq!(certificate.skills.len(), 1);
    assert!(certificate.skills.contains("go"));
}

#[test]
fn test_payment_recording_survives_approval() {
    let s = system();
    let request = s
        .workflow
        .create_request(&s.alice, "bob", "please", ["go"])
        .unwrap();
    assert_eq!(request.payment_amount, 1000);

    let paid = s
        .workflow
        .record_payment(request.id, &s.alice, "txn-789")
        .unwrap();
    assert!(paid.paid);

    let approved = s
        .workflow
        .approve(request.id, &s.bob, approval("Backend Cert"))
        .unwrap();
    assert!(approved.paid);
    assert_eq!(approved.payment_reference.as_deref(), Some("txn-789"));
}
