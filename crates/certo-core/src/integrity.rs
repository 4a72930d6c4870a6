//! Integrity digest binding a certificate's identity, parties, and name.
//!
//! The digest is a locally computed tamper-evidence token, not a ledger
//! entry. Rendered as `0x` followed by 64 lowercase hex digits.

use sha2::{Digest, Sha256};

use crate::types::{CertificateId, PrincipalId};

/// Total rendered length: 2-char prefix + 64 hex digits.
pub const HASH_LENGTH: usize = 66;

/// Prefix on every rendered digest.
pub const HASH_PREFIX: &str = "0x";

/// Compute the integrity digest for a certificate.
///
/// Input is the certificate id, both party identifiers, the certificate
/// name, and an issuance nonce (millisecond timestamp plus random 64-bit
/// value), so two issuances of otherwise identical certificates never
/// collide.
pub fn compute_hash(
    certificate_id: &CertificateId,
    holder: &PrincipalId,
    issuer: &PrincipalId,
    certificate_name: &str,
) -> String {
    let nonce = issuance_nonce();
    let mut hasher = Sha256::new();
    hasher.update(certificate_id.to_string().as_bytes());
    hasher.update(holder.as_str().as_bytes());
    hasher.update(issuer.as_str().as_bytes());
    hasher.update(certificate_name.as_bytes());
    hasher.update(nonce.as_bytes());
    format!("{}{}", HASH_PREFIX, hex::encode(hasher.finalize()))
}

/// Check the rendered digest format: present, `0x`-prefixed, 66 chars of
/// lowercase hex.
pub fn is_well_formed(hash: &str) -> bool {
    hash.len() == HASH_LENGTH
        && hash.starts_with(HASH_PREFIX)
        && hash[HASH_PREFIX.len()..]
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Issuance nonce: current time in milliseconds plus a random 64-bit value.
/// Clock resolution alone is not trusted for uniqueness.
fn issuance_nonce() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let entropy: u64 = rand::random();
    format!("{}:{:016x}", millis, entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> (CertificateId, PrincipalId, PrincipalId) {
        (
            CertificateId::new(),
            PrincipalId::new("alice@example.com"),
            PrincipalId::new("bob@example.com"),
        )
    }

    #[test]
    fn test_hash_format() {
        let (id, holder, issuer) = parties();
        let hash = compute_hash(&id, &holder, &issuer, "Backend Cert");
        assert_eq!(hash.len(), HASH_LENGTH);
        assert!(hash.starts_with(HASH_PREFIX));
        assert!(is_well_formed(&hash));
    }

    #[test]
    fn test_hash_is_lowercase_hex() {
        let (id, holder, issuer) = parties();
        let hash = compute_hash(&id, &holder, &issuer, "Backend Cert");
        assert!(hash[2..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_same_inputs_different_nonce_never_collide() {
        let (id, holder, issuer) = parties();
        let a = compute_hash(&id, &holder, &issuer, "Backend Cert");
        let b = compute_hash(&id, &holder, &issuer, "Backend Cert");
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_well_formed_rejects_bad_shapes() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("0x"));
        assert!(!is_well_formed(&format!("0x{}", "a".repeat(63))));
        assert!(!is_well_formed(&format!("0x{}", "a".repeat(65))));
        assert!(!is_well_formed(&format!("0X{}", "a".repeat(64))));
        assert!(!is_well_formed(&format!("0x{}", "A".repeat(64))));
        assert!(!is_well_formed(&format!("0x{}", "g".repeat(64))));
        assert!(!is_well_formed(&"a".repeat(66)));
    }

    #[test]
    fn test_is_well_formed_accepts_valid() {
        assert!(is_well_formed(&format!("0x{}", "0".repeat(64))));
        assert!(is_well_formed(&format!("0x{}", "f".repeat(64))));
        assert!(is_well_formed(&format!(
            "0x{}{}",
            "deadbeef".repeat(4),
            "0123456789abcdef".repeat(2)
        )));
    }
}
