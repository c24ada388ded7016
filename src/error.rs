//! Error types for pinpoint

use thiserror::Error;

/// Broad classification used by the UI layer to decide how to present a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or empty input, rejected before any network call
    Validation,
    /// Non-2xx response, transport failure or timeout
    Network,
    /// Response did not match the expected shape
    Format,
    /// Missing credential or other configuration problem
    Config,
}

/// Errors from the location search service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Search credential is missing")]
    MissingCredential,

    #[error("Search failed with status: {0}")]
    RequestFailed(u16),

    #[error("Search request timed out")]
    Timeout,

    #[error("Search request failed: {0}")]
    Transport(String),

    #[error("Invalid search response format")]
    InvalidFormat,
}

impl SearchError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::EmptyQuery => ErrorCategory::Validation,
            SearchError::MissingCredential => ErrorCategory::Config,
            SearchError::RequestFailed(_) | SearchError::Timeout | SearchError::Transport(_) => {
                ErrorCategory::Network
            }
            SearchError::InvalidFormat => ErrorCategory::Format,
        }
    }

    /// True when the failure is a configuration problem rather than "no results"
    pub fn is_config(&self) -> bool {
        self.category() == ErrorCategory::Config
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if let Some(status) = err.status() {
            SearchError::RequestFailed(status.as_u16())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

/// Errors from the AI navigation service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    #[error("Prompt is required and must not be empty")]
    EmptyPrompt,

    #[error("Assistant backend is not configured")]
    NotConfigured,

    #[error("Invalid response format from assistant: {0}")]
    InvalidFormat(String),

    #[error("Assistant request failed: {0}")]
    BackendFailure(String),
}

impl AiError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            AiError::EmptyPrompt => ErrorCategory::Validation,
            AiError::NotConfigured => ErrorCategory::Config,
            AiError::InvalidFormat(_) => ErrorCategory::Format,
            AiError::BackendFailure(_) => ErrorCategory::Network,
        }
    }

    /// True when the failure is a configuration problem
    pub fn is_config(&self) -> bool {
        self.category() == ErrorCategory::Config
    }

    /// Stable machine-readable code used in the API envelope
    pub fn code(&self) -> &'static str {
        match self {
            AiError::EmptyPrompt => "EMPTY_PROMPT",
            AiError::NotConfigured => "NOT_CONFIGURED",
            AiError::InvalidFormat(_) => "INVALID_FORMAT",
            AiError::BackendFailure(_) => "BACKEND_FAILURE",
        }
    }

    /// Rebuild an error from an envelope code and message
    pub fn from_code(code: Option<&str>, message: String) -> Self {
        match code {
            Some("EMPTY_PROMPT") => AiError::EmptyPrompt,
            Some("NOT_CONFIGURED") => AiError::NotConfigured,
            Some("INVALID_FORMAT") => AiError::InvalidFormat(message),
            _ => AiError::BackendFailure(message),
        }
    }
}

/// Main error type for pinpoint operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Assistant(#[from] AiError),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Result type alias for pinpoint operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_categories() {
        assert_eq!(SearchError::EmptyQuery.category(), ErrorCategory::Validation);
        assert_eq!(SearchError::RequestFailed(500).category(), ErrorCategory::Network);
        assert_eq!(SearchError::Timeout.category(), ErrorCategory::Network);
        assert_eq!(SearchError::InvalidFormat.category(), ErrorCategory::Format);
        assert!(SearchError::MissingCredential.is_config());
        assert!(!SearchError::Timeout.is_config());
    }

    #[test]
    fn test_ai_error_code_roundtrip() {
        let errors = [
            AiError::EmptyPrompt,
            AiError::NotConfigured,
            AiError::InvalidFormat("bad".to_string()),
            AiError::BackendFailure("rate limited".to_string()),
        ];
        for err in errors {
            let message = match &err {
                AiError::InvalidFormat(m) | AiError::BackendFailure(m) => m.clone(),
                _ => String::new(),
            };
            assert_eq!(AiError::from_code(Some(err.code()), message), err);
        }
    }

    #[test]
    fn test_unknown_code_is_backend_failure() {
        let err = AiError::from_code(None, "boom".to_string());
        assert_eq!(err, AiError::BackendFailure("boom".to_string()));
        assert!(AiError::NotConfigured.is_config());
    }

    #[test]
    fn test_error_display() {
        let err: Error = SearchError::RequestFailed(404).into();
        assert_eq!(err.to_string(), "Search failed with status: 404");
    }
}
