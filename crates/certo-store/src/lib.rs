//! Certo Store — storage collaborator traits consumed by the workflow
//! components, plus the DashMap-backed in-memory reference implementation.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::{CertificateStore, RequestStore, SkillStore};
