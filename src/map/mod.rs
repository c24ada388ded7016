//! Viewport-side components
//!
//! - `bridge`: authoritative viewport state and the single camera path
//! - `overlay`: the one highlighted bounding-box outline
//! - `spin`: idle globe rotation

pub mod bridge;
pub mod overlay;
pub mod spin;

use crate::engine::{Camera, LightPreset};
use crate::geo::LngLat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Application mirror of the engine camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub center: LngLat,
    pub zoom: f64,
}

impl From<Camera> for ViewportState {
    fn from(camera: Camera) -> Self {
        Self { center: camera.center, zoom: camera.zoom }
    }
}

/// Externally-owned color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Basemap lighting that matches this theme
    pub fn light_preset(self) -> LightPreset {
        match self {
            Theme::Light => LightPreset::Day,
            Theme::Dark => LightPreset::Night,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {} (expected light or dark)", s)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}
