//! Certo Core — Fundamental types, status machines, integrity digest, and
//! configuration for the Certo credential system.

pub mod config;
pub mod error;
pub mod integrity;
pub mod records;
pub mod status;
pub mod types;

pub use config::ServiceConfig;
pub use error::CoreError;
pub use records::{Certificate, CertificateRequest, RequestResponse};
pub use status::{CertificateStatus, RequestStatus};
pub use types::{CertificateId, Principal, PrincipalId, RequestId, Role, Skill};
