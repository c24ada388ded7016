//! Centralized constants for the pinpoint crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// External API endpoints
pub mod api {
    /// Mapbox Geocoding v6 forward endpoint
    pub const MAPBOX_GEOCODING_URL: &str = "https://api.mapbox.com/search/geocode/v6/forward";

    /// OpenAI Responses API
    pub const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

    /// Path of the local assistant route
    pub const GEORESPONSE_PATH: &str = "/api/georesponse";
}

/// Environment variables that override the config file
pub mod env {
    pub const MAPBOX_TOKEN: &str = "MAPBOX_TOKEN";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
}

/// Bounding overlay drawing
pub mod overlay {
    /// Draw layer id; only one overlay exists at a time
    pub const BBOX_LAYER_ID: &str = "bbox-layer";

    /// Prefix for generated geometry source ids
    pub const BBOX_SOURCE_PREFIX: &str = "bbox-source";

    pub const LINE_COLOR: &str = "#0080ff";

    pub const LINE_WIDTH: f64 = 2.0;
}

/// Assistant answer limits
pub mod assistant {
    /// Maximum number of topics kept on an answer
    pub const MAX_TOPICS: usize = 5;
}
