use serde::{Deserialize, Serialize};

/// Configuration passed into the workflow and issuer at construction.
/// Nothing in the core reads ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the verification frontend. Verification artifacts point
    /// at `<frontend_base_url>/verify/<certificate-id>`.
    pub frontend_base_url: String,
    /// Fixed fee recorded on every created request, in minor currency units.
    pub request_fee_minor: u64,
    /// ISO 4217 code of the fee currency.
    pub fee_currency: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            frontend_base_url: "http://localhost:5173".into(),
            request_fee_minor: 1000,
            fee_currency: "INR".into(),
        }
    }
}

impl ServiceConfig {
    /// Verification URL for a certificate.
    pub fn verification_url(&self, certificate_id: impl std::fmt::Display) -> String {
        format!(
            "{}/verify/{}",
            self.frontend_base_url.trim_end_matches('/'),
            certificate_id
        )
    }
}
