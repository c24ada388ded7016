//! Map engine capability interface
//!
//! The renderer is an external collaborator. Everything the coordinator needs
//! from it is expressed by the `MapEngine` trait; camera changes flow back as
//! `EngineEvent`s that the host feeds to `Coordinator::handle_event`.
//!
//! ## Flex Point
//! Supporting a new renderer requires:
//! 1. Implement `MapEngine` for a handle to it
//! 2. Forward its move/interaction callbacks as `EngineEvent`s

pub mod recording;

use crate::geo::{BoundingBox, LngLat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Camera pose: center plus zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
}

impl Camera {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// Easing curve for eased camera moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed, so chained steps join without a visible stop
    Linear,
    /// Engine default ease-in-out
    Smooth,
}

/// How the engine should animate to a camera target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Engine-chosen zoom-out/zoom-in flight
    Fly,
    /// Eased move with fixed duration
    Ease { duration: Duration, easing: Easing },
}

/// A camera move request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub target: Camera,
    pub transition: Transition,
}

/// User gesture kinds the idle rotation yields to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Press,
    Drag,
    Rotate,
    Pitch,
}

/// Notifications from the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Camera changed (fired continuously during animations and gestures)
    Move { center: LngLat, zoom: f64 },
    /// A camera animation or gesture finished
    MoveEnd,
    InteractionStart(Interaction),
    InteractionEnd(Interaction),
}

/// Basemap lighting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightPreset {
    Day,
    Night,
}

impl fmt::Display for LightPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightPreset::Day => write!(f, "day"),
            LightPreset::Night => write!(f, "night"),
        }
    }
}

/// A line-style draw layer bound to a geometry source
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub id: String,
    pub source: String,
    pub color: String,
    pub width: f64,
}

/// Operations the coordinator needs from a map renderer
pub trait MapEngine {
    /// Current camera pose as rendered
    fn camera(&self) -> Camera;

    /// Start a camera animation; a newer command supersedes an older one
    fn set_camera(&mut self, command: CameraCommand);

    /// Animate so that `bbox` fills the viewport minus `padding`
    fn fit_bounds(&mut self, bbox: BoundingBox, padding: f64);

    /// Register a GeoJSON geometry source
    fn add_overlay_source(&mut self, id: &str, data: serde_json::Value);

    /// Register a draw layer for a source
    fn add_overlay_layer(&mut self, layer: LineLayer);

    fn has_overlay_source(&self, id: &str) -> bool;

    fn has_overlay_layer(&self, id: &str) -> bool;

    fn remove_overlay_layer(&mut self, id: &str);

    fn remove_overlay_source(&mut self, id: &str);

    /// Change only the basemap lighting, without a full re-render
    fn set_light_preset(&mut self, preset: LightPreset);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_preset_display() {
        assert_eq!(LightPreset::Day.to_string(), "day");
        assert_eq!(LightPreset::Night.to_string(), "night");
        assert_eq!(serde_json::to_string(&LightPreset::Night).unwrap(), "\"night\"");
    }
}
