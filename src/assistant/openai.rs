//! OpenAI Responses API backend
//!
//! Sends the geography prompt with a strict JSON schema and parses the first
//! `output_text` content item back into an `AiAnswer`.

use crate::assistant::prompt::{answer_schema, system_instructions, SCHEMA_NAME};
use crate::assistant::{AiAnswer, GeoAssistant};
use crate::config::AssistantConfig;
use crate::error::AiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("pinpoint/", env!("CARGO_PKG_VERSION"));

/// Direct OpenAI backend
#[derive(Debug, Clone)]
pub struct OpenAiAssistant {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: String,
    input: &'a str,
    temperature: f64,
    text: Value,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    model: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl OpenAiAssistant {
    pub fn new(
        api_key: impl Into<String>,
        url: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Create a backend from the `[assistant]` config section
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_url.clone(),
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: &self.model,
            instructions: system_instructions(),
            input: prompt,
            temperature: self.temperature,
            text: json!({
                "format": {
                    "type": "json_schema",
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": answer_schema(),
                }
            }),
        }
    }
}

/// Pull the structured answer out of a Responses API body
pub fn parse_response(body: &str, request_id: Option<String>) -> Result<AiAnswer, AiError> {
    let reply: ResponsesReply =
        serde_json::from_str(body).map_err(|e| AiError::InvalidFormat(e.to_string()))?;

    let contents = reply.output.iter().flat_map(|item| item.content.iter());
    let mut text = None;
    for content in contents {
        if let Some(refusal) = &content.refusal {
            return Err(AiError::BackendFailure(format!("Assistant refused: {}", refusal)));
        }
        if content.kind == "output_text" {
            text = content.text.as_deref();
            break;
        }
    }

    let text =
        text.ok_or_else(|| AiError::InvalidFormat("response has no output text".to_string()))?;
    let value: Value =
        serde_json::from_str(text).map_err(|e| AiError::InvalidFormat(e.to_string()))?;

    let mut answer = AiAnswer::from_json(value)?;
    answer.model = reply.model;
    answer.request_id = request_id;
    Ok(answer)
}

impl GeoAssistant for OpenAiAssistant {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn ask(&self, prompt: &str) -> Result<AiAnswer, AiError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        if !self.is_configured() {
            return Err(AiError::NotConfigured);
        }

        debug!("Asking {} ({} chars)", self.model, prompt.len());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::BackendFailure("request timed out".to_string())
                } else {
                    AiError::BackendFailure(e.to_string())
                }
            })?;

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| AiError::BackendFailure(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorReply>(&body)
                .ok()
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("Request failed with status: {}", status.as_u16()));
            warn!("OpenAI returned {}: {}", status, message);
            return Err(AiError::BackendFailure(message));
        }

        parse_response(&body, request_id)
    }
}
