use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Artifact generation failure. Tolerated by the issuer: the certificate is
/// valid without its artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact encoding failed: {0}")]
    Encoding(String),
}

/// Produces an opaque verification artifact (e.g. an encoded image or URL
/// token) for a verification URL. Rendering an actual QR image is an
/// external collaborator's job.
pub trait ArtifactGenerator: Send + Sync {
    fn for_verification_url(&self, url: &str) -> Result<String, ArtifactError>;
}

/// Default generator: a base64 data-URL token wrapping the verification URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlTokenGenerator;

impl ArtifactGenerator for UrlTokenGenerator {
    fn for_verification_url(&self, url: &str) -> Result<String, ArtifactError> {
        if url.is_empty() {
            return Err(ArtifactError::Encoding("empty verification url".into()));
        }
        Ok(format!(
            "data:text/plain;base64,{}",
            STANDARD.encode(url.as_bytes())
        ))
    }
}
