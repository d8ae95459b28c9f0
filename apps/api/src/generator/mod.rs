//! Copy generation: the single seam through which campaign copy is produced.
//!
//! `HttpCopyGenerator` delegates to the external generation service.
//! `TemplateCopyGenerator` is the built-in stand-in used when no service URL
//! is configured.

use async_trait::async_trait;
use thiserror::Error;

use crate::campaign::models::CampaignRequest;
use crate::models::campaign::NewVersion;

pub mod http;
pub mod template;

pub use http::HttpCopyGenerator;
pub use template::TemplateCopyGenerator;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generator error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The A/B pair returned by a generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCopy {
    pub version_a: NewVersion,
    pub version_b: NewVersion,
}

#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn generate(&self, request: &CampaignRequest) -> Result<GeneratedCopy, GeneratorError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
