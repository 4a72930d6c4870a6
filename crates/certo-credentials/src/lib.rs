//! Certo Credentials — skill catalog, request workflow, certificate issuer,
//! and verification service.

pub mod artifact;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod issuer;
pub mod verifier;
pub mod workflow;

pub use artifact::{ArtifactError, ArtifactGenerator, UrlTokenGenerator};
pub use catalog::SkillCatalog;
pub use error::CredentialError;
pub use identity::{IdentityResolver, MemoryDirectory};
pub use issuer::{CertificateIssuer, IssueDetails};
pub use verifier::VerificationService;
pub use workflow::{ApprovalDetails, RequestWorkflow};
