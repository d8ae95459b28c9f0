use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::campaign::models::CampaignRequest;
use crate::generator::{CopyGenerator, GeneratedCopy, GeneratorError};
use crate::models::campaign::{Metrics, NewVersion};

const GENERATE_PATH: &str = "/api/generate";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    version_a: UpstreamVersion,
    version_b: UpstreamVersion,
}

#[derive(Debug, Deserialize)]
struct UpstreamVersion {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    metrics: Option<UpstreamMetrics>,
}

/// Upstream estimates may be fractional or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamMetrics {
    open_rate: Option<f64>,
    click_through_rate: Option<f64>,
    conversion_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

fn whole_percent(value: Option<f64>) -> i32 {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i32)
        .unwrap_or(0)
}

impl From<UpstreamVersion> for NewVersion {
    fn from(v: UpstreamVersion) -> Self {
        let m = v.metrics.unwrap_or_default();
        NewVersion {
            title: v.title,
            content: v.content,
            metrics: Metrics {
                open_rate: whole_percent(m.open_rate),
                click_through_rate: whole_percent(m.click_through_rate),
                conversion_rate: whole_percent(m.conversion_rate),
            },
        }
    }
}

/// Client for the external copy generation service.
/// One attempt per request; failures surface to the caller.
#[derive(Clone)]
pub struct HttpCopyGenerator {
    client: Client,
    endpoint: String,
}

impl HttpCopyGenerator {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CopyGenerator for HttpCopyGenerator {
    async fn generate(&self, request: &CampaignRequest) -> Result<GeneratedCopy, GeneratorError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Generator returned {status}");
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let copy = parse_generated(&body)?;
        debug!(
            "Generator produced variants of {} and {} chars",
            copy.version_a.content.len(),
            copy.version_b.content.len()
        );
        Ok(copy)
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

fn parse_generated(body: &str) -> Result<GeneratedCopy, GeneratorError> {
    let parsed: GenerateResponse = serde_json::from_str(body)?;
    Ok(GeneratedCopy {
        version_a: parsed.version_a.into(),
        version_b: parsed.version_b.into(),
    })
}

fn upstream_message(body: &str) -> String {
    serde_json::from_str::<UpstreamError>(body)
        .map(|e| match e.details {
            Some(details) => format!("{}: {details}", e.error),
            None => e.error,
        })
        .unwrap_or_else(|_| body.to_string())
}
