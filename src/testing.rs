//! Test doubles shared across modules

use crate::assistant::{AiAnswer, GeoAssistant};
use crate::error::{AiError, SearchError};
use crate::geo::{BoundingBox, LngLat, LocationSearch, SearchRequest, SearchResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Build a search result
pub fn result(name: &str, lng: f64, lat: f64, bbox: Option<BoundingBox>) -> SearchResult {
    SearchResult {
        id: format!("{}@{:.5},{:.5}", name, lng, lat),
        name: name.to_string(),
        coordinates: LngLat::new(lng, lat),
        place_label: None,
        full_address: None,
        bbox,
        feature_type: None,
    }
}

/// Canned search backend that records every request
#[derive(Debug, Clone, Default)]
pub struct StubSearch {
    places: HashMap<String, Vec<SearchResult>>,
    failure: Option<SearchError>,
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl StubSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `results`
    pub fn with(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.places.insert(query.to_string(), results);
        self
    }

    /// Fail every request
    pub fn failing(error: SearchError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LocationSearch for StubSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let mut results = self.places.get(&request.query).cloned().unwrap_or_default();
        results.truncate(request.limit);
        Ok(results)
    }
}

/// Canned assistant that echoes the prompt
#[derive(Debug, Clone)]
pub struct StubAssistant {
    navigate_to: Option<String>,
    failure: Option<AiError>,
    calls: Arc<AtomicUsize>,
}

impl StubAssistant {
    /// Answer every question and point at `place`
    pub fn answering(place: &str) -> Self {
        Self {
            navigate_to: Some(place.to_string()),
            failure: None,
            calls: Arc::default(),
        }
    }

    /// Answer without a navigation target
    pub fn silent() -> Self {
        Self {
            navigate_to: None,
            failure: None,
            calls: Arc::default(),
        }
    }

    pub fn failing(error: AiError) -> Self {
        Self {
            navigate_to: None,
            failure: Some(error),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeoAssistant for StubAssistant {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        self.failure != Some(AiError::NotConfigured)
    }

    async fn ask(&self, prompt: &str) -> Result<AiAnswer, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(AiAnswer {
            reply: format!("You asked: {}", prompt),
            topics: vec!["geography".to_string()],
            suggested_follow_ups: Vec::new(),
            citations: None,
            navigate_to: self.navigate_to.clone(),
            model: Some("stub".to_string()),
            request_id: None,
        })
    }
}
