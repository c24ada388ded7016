//! AI navigation service
//!
//! Natural-language geography questions go to a structured-completion backend
//! and come back as an `AiAnswer`, optionally naming a place to navigate to.
//!
//! Backends:
//! - `openai`: talks to the OpenAI Responses API directly
//! - `remote`: talks to a pinpoint server's `/api/georesponse` route

pub mod openai;
pub mod prompt;
pub mod remote;

use crate::config::Config;
use crate::constants::assistant::MAX_TOPICS;
use crate::error::AiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use uuid::Uuid;

/// A reference source mentioned in an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
}

/// Structured answer to a geography question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnswer {
    pub reply: String,
    pub topics: Vec<String>,
    pub suggested_follow_ups: Vec<String>,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
    /// Place to fly to, geocoded by the coordinator
    #[serde(default)]
    pub navigate_to: Option<String>,
    /// Model that produced the answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Backend request id, for support
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AiAnswer {
    /// Enforce answer limits and drop empty optional values
    pub fn normalized(mut self) -> Self {
        self.topics.truncate(MAX_TOPICS);
        self.navigate_to = self
            .navigate_to
            .map(|place| place.trim().to_string())
            .filter(|place| !place.is_empty());
        self
    }

    /// Parse and normalize an answer from backend JSON
    pub fn from_json(value: serde_json::Value) -> Result<Self, AiError> {
        serde_json::from_value::<AiAnswer>(value)
            .map(AiAnswer::normalized)
            .map_err(|e| AiError::InvalidFormat(e.to_string()))
    }
}

/// Envelope status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Uniform API response envelope: `{status, data?, error?, code?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: EnvelopeStatus,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    /// Error envelope with a plain message
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            error: Some(error.into()),
            code: None,
        }
    }

    /// Error envelope carrying the error's code
    pub fn failure(err: &AiError) -> Self {
        let message = match err {
            AiError::InvalidFormat(m) | AiError::BackendFailure(m) => m.clone(),
            other => other.to_string(),
        };
        Self {
            status: EnvelopeStatus::Error,
            data: None,
            error: Some(message),
            code: Some(err.code().to_string()),
        }
    }
}

impl<T> From<Result<T, AiError>> for ApiEnvelope<T> {
    fn from(result: Result<T, AiError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Trait for assistant backends
pub trait GeoAssistant: Send + Sync {
    /// Backend name (e.g. "openai", "remote")
    fn name(&self) -> &'static str;

    /// Whether `ask` can reach a backend at all
    fn is_configured(&self) -> bool;

    /// Ask a geography question
    ///
    /// Blank prompts fail with `AiError::EmptyPrompt` before any request.
    fn ask(&self, prompt: &str) -> impl Future<Output = Result<AiAnswer, AiError>> + Send;
}

/// Backend chosen from config
#[derive(Debug, Clone)]
pub enum AssistantBackend {
    OpenAi(openai::OpenAiAssistant),
    Remote(remote::RemoteAssistant),
}

impl GeoAssistant for AssistantBackend {
    fn name(&self) -> &'static str {
        match self {
            AssistantBackend::OpenAi(a) => a.name(),
            AssistantBackend::Remote(a) => a.name(),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            AssistantBackend::OpenAi(a) => a.is_configured(),
            AssistantBackend::Remote(a) => a.is_configured(),
        }
    }

    async fn ask(&self, prompt: &str) -> Result<AiAnswer, AiError> {
        match self {
            AssistantBackend::OpenAi(a) => a.ask(prompt).await,
            AssistantBackend::Remote(a) => a.ask(prompt).await,
        }
    }
}

/// Get the assistant backend for this config
///
/// A configured `assistant.endpoint` routes through a pinpoint server;
/// otherwise OpenAI is called directly.
pub fn get_assistant(config: &Config) -> AssistantBackend {
    if config.assistant.endpoint.trim().is_empty() {
        AssistantBackend::OpenAi(openai::OpenAiAssistant::from_config(&config.assistant))
    } else {
        AssistantBackend::Remote(remote::RemoteAssistant::from_config(&config.assistant))
    }
}

/// One question and its answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    id: Uuid,
    prompt: String,
    reply: String,
    asked_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn asked_at(&self) -> DateTime<Utc> {
        self.asked_at
    }
}

/// Ordered, append-only session history
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn; oldest first
    pub fn push(
        &mut self,
        prompt: impl Into<String>,
        reply: impl Into<String>,
    ) -> &ConversationTurn {
        self.turns.push(ConversationTurn {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            reply: reply.into(),
            asked_at: Utc::now(),
        });
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
