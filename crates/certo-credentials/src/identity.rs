use dashmap::DashMap;

use certo_core::types::{Principal, PrincipalId};

/// Read-only view into the external identity subsystem. The core never
/// creates or mutates principals through this seam.
pub trait IdentityResolver: Send + Sync {
    /// Resolve a principal by stable identifier.
    fn by_id(&self, id: &PrincipalId) -> Option<Principal>;

    /// Resolve a principal by username.
    fn by_username(&self, username: &str) -> Option<Principal>;

    /// Resolve a principal by email address.
    fn by_email(&self, email: &str) -> Option<Principal>;
}

/// In-memory principal directory for deployments without an external
/// identity subsystem, and for tests.
#[derive(Default)]
pub struct MemoryDirectory {
    principals: DashMap<PrincipalId, Principal>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal. Last write wins on duplicate ids.
    pub fn register(&self, principal: Principal) {
        self.principals.insert(principal.id.clone(), principal);
    }

    /// Number of registered principals.
    pub fn count(&self) -> usize {
        self.principals.len()
    }
}

impl IdentityResolver for MemoryDirectory {
    fn by_id(&self, id: &PrincipalId) -> Option<Principal> {
        self.principals.get(id).map(|e| e.value().clone())
    }

    fn by_username(&self, username: &str) -> Option<Principal> {
        self.principals
            .iter()
            .find(|e| e.username == username)
            .map(|e| e.value().clone())
    }

    fn by_email(&self, email: &str) -> Option<Principal> {
        self.principals
            .iter()
            .find(|e| e.email == email)
            .map(|e| e.value().clone())
    }
}
