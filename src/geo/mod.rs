//! Geocoding module
//!
//! Geographic primitives plus the location search service: a `LocationSearch`
//! trait, the Mapbox forward-geocoding backend and the search gate.

pub mod gate;
pub mod mapbox;

use crate::config::Config;
use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A geographic position, longitude first
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    /// Create a new position
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Same position with longitude wrapped into [-180, 180)
    pub fn wrapped(self) -> Self {
        let lng = (self.lng + 180.0).rem_euclid(360.0) - 180.0;
        Self { lng, lat: self.lat }
    }

    /// Parse "lng,lat"
    pub fn parse(s: &str) -> Option<Self> {
        let (lng, lat) = s.split_once(',')?;
        Some(Self::new(lng.trim().parse().ok()?, lat.trim().parse().ok()?))
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// Axis-aligned rectangle in longitude/latitude
///
/// Serialized as `[minLng, minLat, maxLng, maxLat]`, matching the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    pub fn south_west(&self) -> LngLat {
        LngLat::new(self.min_lng, self.min_lat)
    }

    pub fn north_east(&self) -> LngLat {
        LngLat::new(self.max_lng, self.max_lat)
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Closed ring of the four corners, counter-clockwise from south-west
    pub fn ring(&self) -> [LngLat; 5] {
        let sw = self.south_west();
        [
            sw,
            LngLat::new(self.max_lng, self.min_lat),
            self.north_east(),
            LngLat::new(self.min_lng, self.max_lat),
            sw,
        ]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_lng, b.min_lat, b.max_lng, b.max_lat]
    }
}

/// A normalized geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider id, or a synthesized stable id
    pub id: String,
    pub name: String,
    pub coordinates: LngLat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
}

impl SearchResult {
    /// Best single-line description for display
    pub fn label(&self) -> &str {
        self.full_address
            .as_deref()
            .or(self.place_label.as_deref())
            .unwrap_or(&self.name)
    }
}

/// Parameters for one search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    /// Results near this point rank higher
    pub proximity: LngLat,
    pub limit: usize,
    /// Comma-separated feature types
    pub types: String,
}

impl SearchRequest {
    /// Create a request with the default limit and type filter
    pub fn new(query: impl Into<String>, proximity: LngLat) -> Self {
        Self {
            query: query.into(),
            proximity,
            limit: crate::config::defaults::DEFAULT_SEARCH_LIMIT,
            types: crate::config::defaults::DEFAULT_SEARCH_TYPES.to_string(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = types.into();
        self
    }
}

/// Trait for location search backends
pub trait LocationSearch: Send + Sync {
    /// Search for places matching the request
    ///
    /// Results are in provider ranking order.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

/// Build the default search backend from config
pub fn get_searcher(config: &Config) -> mapbox::MapboxSearch {
    mapbox::MapboxSearch::from_config(&config.mapbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_ring_is_closed() {
        let bbox = BoundingBox::new(2.2, 48.8, 2.5, 48.9);
        let ring = bbox.ring();

        assert_eq!(ring[0], ring[4]);
        assert_eq!(
            ring,
            [
                LngLat::new(2.2, 48.8),
                LngLat::new(2.5, 48.8),
                LngLat::new(2.5, 48.9),
                LngLat::new(2.2, 48.9),
                LngLat::new(2.2, 48.8),
            ]
        );
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let bbox = BoundingBox::new(-1.0, -2.0, 3.0, 4.0);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[-1.0,-2.0,3.0,4.0]");

        let parsed: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bbox);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(LngLat::new(-181.0, 5.0).wrapped().lng, 179.0);
        assert_eq!(LngLat::new(180.0, 0.0).wrapped().lng, -180.0);
        assert_eq!(LngLat::new(-3.0, 0.0).wrapped().lng, -3.0);
    }

    #[test]
    fn test_parse_lnglat() {
        assert_eq!(LngLat::parse("2.35, 48.85"), Some(LngLat::new(2.35, 48.85)));
        assert_eq!(LngLat::parse("nope"), None);
        assert_eq!(LngLat::new(1.5, -2.0).to_string(), "1.5,-2");
    }

    #[test]
    fn test_search_request_builder() {
        let req = SearchRequest::new("Paris", LngLat::default())
            .with_limit(1)
            .with_types("place");
        assert_eq!(req.limit, 1);
        assert_eq!(req.types, "place");
    }

    #[test]
    fn test_result_label_prefers_full_address() {
        let mut result = SearchResult {
            id: "x".to_string(),
            name: "Paris".to_string(),
            coordinates: LngLat::new(2.35, 48.85),
            place_label: Some("Île-de-France, France".to_string()),
            full_address: None,
            bbox: None,
            feature_type: Some("place".to_string()),
        };
        assert_eq!(result.label(), "Île-de-France, France");

        result.full_address = Some("Paris, Île-de-France, France".to_string());
        assert_eq!(result.label(), "Paris, Île-de-France, France");
    }
}
