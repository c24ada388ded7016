//! Server shared state
//!
//! Holds configuration and the assistant backend for the HTTP server.

use crate::assistant::GeoAssistant;
use crate::config::Config;

/// Shared state for the HTTP server
pub struct AppState<A> {
    /// Configuration
    pub config: Config,

    /// Backend answering `/api/georesponse`
    assistant: A,
}

impl<A: GeoAssistant> AppState<A> {
    /// Create new application state
    pub fn new(config: Config, assistant: A) -> Self {
        Self { config, assistant }
    }

    /// Get the assistant backend
    pub fn assistant(&self) -> &A {
        &self.assistant
    }
}
