//! Mapbox geocoding backend
//!
//! Uses the Geocoding v6 forward endpoint. Feature payloads vary by feature
//! type, so every field is optional and normalized into `SearchResult`.

use crate::config::MapboxConfig;
use crate::error::SearchError;
use crate::geo::{BoundingBox, LngLat, LocationSearch, SearchRequest, SearchResult};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("pinpoint/", env!("CARGO_PKG_VERSION"));

/// Name used when a feature has none
pub const UNNAMED: &str = "Unnamed";

/// Mapbox forward-geocoding backend
#[derive(Debug, Clone)]
pub struct MapboxSearch {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// Geocoding response (a GeoJSON feature collection)
///
/// Features stay untyped so one oddly shaped feature cannot fail the batch.
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<Value>,
}

impl MapboxSearch {
    /// Create a new backend
    pub fn new(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Create a backend from the `[mapbox]` config section
    pub fn from_config(config: &MapboxConfig) -> Self {
        Self::new(
            config.access_token.clone(),
            config.geocoding_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Build the request URL (includes the access token)
    fn build_url(&self, query: &str, request: &SearchRequest) -> String {
        format!(
            "{}?q={}&access_token={}&limit={}&autocomplete=false&proximity={}&types={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.access_token),
            request.limit,
            urlencoding::encode(&request.proximity.to_string()),
            urlencoding::encode(&request.types),
        )
    }

    /// Normalize a raw response body into search results
    pub fn parse_response(body: &str) -> Result<Vec<SearchResult>, SearchError> {
        let response: GeocodingResponse =
            serde_json::from_str(body).map_err(|_| SearchError::InvalidFormat)?;

        Ok(response.features.into_iter().map(normalize_feature).collect())
    }
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Geometry coordinates first, then `properties.coordinates`, then (0, 0)
fn extract_coordinates(feature: &Value, properties: &Value) -> LngLat {
    let point = feature
        .pointer("/geometry/coordinates")
        .and_then(Value::as_array)
        .map(Vec::as_slice);
    if let Some([lng, lat, ..]) = point {
        if let (Some(lng), Some(lat)) = (lng.as_f64(), lat.as_f64()) {
            return LngLat::new(lng, lat);
        }
    }

    match properties.get("coordinates").filter(|c| c.is_object()) {
        Some(c) => LngLat::new(
            c.get("longitude").and_then(Value::as_f64).unwrap_or(0.0),
            c.get("latitude").and_then(Value::as_f64).unwrap_or(0.0),
        ),
        None => LngLat::new(0.0, 0.0),
    }
}

/// `[minLng, minLat, maxLng, maxLat]`; anything else counts as no bbox
fn extract_bbox(properties: &Value) -> Option<BoundingBox> {
    let values = properties
        .get("bbox")?
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()?;

    match values.as_slice() {
        [min_lng, min_lat, max_lng, max_lat] => {
            Some(BoundingBox::new(*min_lng, *min_lat, *max_lng, *max_lat))
        }
        _ => None,
    }
}

fn normalize_feature(feature: Value) -> SearchResult {
    let properties = feature.get("properties").cloned().unwrap_or(Value::Null);
    let coordinates = extract_coordinates(&feature, &properties);
    let name = text(&properties, "name")
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNNAMED.to_string());

    let id = text(&feature, "id")
        .filter(|id| !id.is_empty())
        .or_else(|| text(&properties, "mapbox_id").filter(|id| !id.is_empty()))
        .unwrap_or_else(|| format!("{}@{:.5},{:.5}", name, coordinates.lng, coordinates.lat));

    SearchResult {
        id,
        name,
        coordinates,
        place_label: text(&properties, "place_formatted"),
        full_address: text(&properties, "full_address"),
        bbox: extract_bbox(&properties),
        feature_type: text(&properties, "feature_type"),
    }
}

impl LocationSearch for MapboxSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if self.access_token.trim().is_empty() {
            warn!("Mapbox access token is not configured; cannot perform search");
            return Err(SearchError::MissingCredential);
        }

        debug!("Searching Mapbox for {:?} near {}", query, request.proximity);

        let response = self
            .client
            .get(self.build_url(query, request))
            .send()
            .await
            .map_err(SearchError::from_reqwest)?;

        if !response.status().is_success() {
            warn!("Mapbox returned status: {}", response.status());
            return Err(SearchError::RequestFailed(response.status().as_u16()));
        }

        let body = response.text().await.map_err(SearchError::from_reqwest)?;
        let results = Self::parse_response(&body)?;

        debug!("Mapbox returned {} results for {:?}", results.len(), query);
        Ok(results)
    }
}
