use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Unique identifier for an issued certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub Uuid);

impl CertificateId {
    /// Create a new random certificate ID (UUID v7 — time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from a canonical UUID string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CertificateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a certificate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Create a new random request ID (UUID v7 — time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a principal, owned by the external identity
/// subsystem. Opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

impl PrincipalId {
    /// Create a new principal identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Issuing organization account.
    Issuer,
    /// Individual credential holder.
    Individual,
    /// Employer account (can also hold credentials).
    Employer,
}

impl Role {
    /// Whether this role may submit certificate requests.
    pub fn can_request(&self) -> bool {
        matches!(self, Self::Individual | Self::Employer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "Admin"),
            Self::Issuer => write!(f, "Issuer"),
            Self::Individual => write!(f, "Individual"),
            Self::Employer => write!(f, "Employer"),
        }
    }
}

/// Minimal read-only view of a principal, produced by the external identity
/// subsystem. The core never creates or mutates principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identifier.
    pub id: PrincipalId,
    /// Login name, unique across principals.
    pub username: String,
    /// Email address, unique across principals.
    pub email: String,
    /// Role of this principal.
    pub role: Role,
    /// Organization label (issuers and employers).
    pub organization: Option<String>,
}

impl Principal {
    /// Create a principal view.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: PrincipalId::new(id),
            username: username.into(),
            email: email.into(),
            role,
            organization: None,
        }
    }

    /// Attach an organization label.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

/// A deduplicated skill tag. Identity is the lowercase-normalized name;
/// equality and hashing ignore the endorsement counter so two records with
/// the same name are the same entity for set membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Normalized (trimmed, lowercase) name. Unique across all skills.
    pub name: String,
    /// Endorsement counter. Monotonic, non-negative.
    pub endorsements: u64,
}

impl Skill {
    /// Create a skill with zero endorsements. The name is assumed to already
    /// be normalized.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endorsements: 0,
        }
    }

    /// Normalize a raw skill name: trim surrounding whitespace and lowercase.
    /// Returns `None` if nothing remains.
    pub fn normalize(raw: &str) -> Option<String> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        }
    }
}

impl PartialEq for Skill {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Skill {}

impl Hash for Skill {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Skill {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Skill {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_certificate_id_display_is_canonical_uuid() {
        let id = CertificateId::new();
        let rendered = format!("{}", id);
        assert_eq!(rendered.len(), 36);
        assert_eq!(CertificateId::parse(&rendered).unwrap(), id);
    }

    #[test]
    fn test_certificate_id_parse_rejects_garbage() {
        assert!(CertificateId::parse("not-a-uuid").is_err());
        assert!(CertificateId::parse("").is_err());
    }

    #[test]
    fn test_skill_normalize() {
        assert_eq!(Skill::normalize("  Rust  "), Some("rust".into()));
        assert_eq!(Skill::normalize("SQL"), Some("sql".into()));
        assert_eq!(Skill::normalize("   "), None);
        assert_eq!(Skill::normalize(""), None);
    }

    #[test]
    fn test_skill_equality_by_name_only() {
        let a = Skill {
            name: "rust".into(),
            endorsements: 0,
        };
        let b = Skill {
            name: "rust".into(),
            endorsements: 42,
        };
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_role_can_request() {
        assert!(Role::Individual.can_request());
        assert!(Role::Employer.can_request());
        assert!(!Role::Issuer.can_request());
        assert!(!Role::Admin.can_request());
    }

    #[test]
    fn test_principal_builder() {
        let p = Principal::new("u-1", "bob", "bob@example.com", Role::Issuer)
            .with_organization("Acme Certification");
        assert_eq!(p.id.as_str(), "u-1");
        assert_eq!(p.organization.as_deref(), Some("Acme Certification"));
    }
}
