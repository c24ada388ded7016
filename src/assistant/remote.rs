//! Client for a pinpoint server's `/api/georesponse` route

use crate::assistant::{AiAnswer, ApiEnvelope, EnvelopeStatus, GeoAssistant};
use crate::config::AssistantConfig;
use crate::constants::api::GEORESPONSE_PATH;
use crate::error::AiError;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("pinpoint/", env!("CARGO_PKG_VERSION"));

/// Remote assistant backend
#[derive(Debug, Clone)]
pub struct RemoteAssistant {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct PromptBody<'a> {
    prompt: &'a str,
}

impl RemoteAssistant {
    /// Create a client for the server at `endpoint` (base URL)
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), GEORESPONSE_PATH)
    }
}

/// Turn an envelope body into an answer or the error it carries
fn parse_envelope(status: u16, body: &str) -> Result<AiAnswer, AiError> {
    let envelope = serde_json::from_str::<ApiEnvelope<Value>>(body);

    if !(200..300).contains(&status) {
        let envelope = envelope.ok();
        let code = envelope.as_ref().and_then(|e| e.code.clone());
        let message = envelope
            .and_then(|e| e.error)
            .unwrap_or_else(|| format!("Request failed with status: {}", status));
        return Err(AiError::from_code(code.as_deref(), message));
    }

    let envelope = envelope.map_err(|e| AiError::InvalidFormat(e.to_string()))?;
    match envelope.status {
        EnvelopeStatus::Error => Err(AiError::from_code(
            envelope.code.as_deref(),
            envelope
                .error
                .unwrap_or_else(|| "Unknown error from geo response API".to_string()),
        )),
        EnvelopeStatus::Success => match envelope.data {
            Some(data) => AiAnswer::from_json(data),
            None => Err(AiError::InvalidFormat("No data received".to_string())),
        },
    }
}

impl GeoAssistant for RemoteAssistant {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }

    async fn ask(&self, prompt: &str) -> Result<AiAnswer, AiError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        if !self.is_configured() {
            return Err(AiError::NotConfigured);
        }

        let url = self.url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&PromptBody { prompt })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::BackendFailure("request timed out".to_string())
                } else {
                    AiError::BackendFailure(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::BackendFailure(e.to_string()))?;

        let result = parse_envelope(status, &body);
        if let Err(err) = &result {
            warn!("Geo response failed: {}", err);
        }
        result
    }
}
