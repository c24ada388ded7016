//! Headless engine that records every command
//!
//! Animations never progress on their own: `complete_animation` jumps to the
//! pending target and returns the events a real renderer would emit. Used by
//! the tests and by `pinpoint explore`.

use crate::engine::{
    Camera, CameraCommand, EngineEvent, Interaction, LightPreset, LineLayer, MapEngine,
};
use crate::geo::{BoundingBox, LngLat};
use std::collections::BTreeMap;

/// Zoom bounds of the simulated renderer
const MIN_ZOOM: f64 = 0.0;
const MAX_ZOOM: f64 = 22.0;

/// A command received by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    SetCamera(CameraCommand),
    FitBounds { bbox: BoundingBox, padding: f64 },
    AddSource(String),
    AddLayer(LineLayer),
    RemoveLayer(String),
    RemoveSource(String),
    SetLightPreset(LightPreset),
}

/// Recording map engine
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    camera: Camera,
    pending: Option<Camera>,
    sources: BTreeMap<String, serde_json::Value>,
    layers: BTreeMap<String, LineLayer>,
    light_preset: LightPreset,
    commands: Vec<EngineCommand>,
}

impl RecordingEngine {
    /// Create an engine resting at `camera`
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            pending: None,
            sources: BTreeMap::new(),
            layers: BTreeMap::new(),
            light_preset: LightPreset::Day,
            commands: Vec::new(),
        }
    }

    /// Every command received so far, oldest first
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// Drain the command log
    pub fn take_commands(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Camera commands received so far
    pub fn camera_commands(&self) -> Vec<CameraCommand> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                EngineCommand::SetCamera(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Target of the animation in flight, if any
    pub fn pending_target(&self) -> Option<Camera> {
        self.pending
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    /// Finish the animation in flight
    ///
    /// Returns the `Move` and `MoveEnd` events to forward, or nothing when idle.
    pub fn complete_animation(&mut self) -> Vec<EngineEvent> {
        match self.pending.take() {
            Some(target) => {
                self.camera = target;
                vec![
                    EngineEvent::Move { center: target.center, zoom: target.zoom },
                    EngineEvent::MoveEnd,
                ]
            }
            None => Vec::new(),
        }
    }

    /// Simulate the user dragging the map to `center`
    ///
    /// Any animation in flight is cancelled, as a real renderer does.
    pub fn drag_to(&mut self, center: LngLat) -> Vec<EngineEvent> {
        self.pending = None;
        self.camera.center = center;
        vec![
            EngineEvent::InteractionStart(Interaction::Press),
            EngineEvent::InteractionStart(Interaction::Drag),
            EngineEvent::Move { center, zoom: self.camera.zoom },
            EngineEvent::InteractionEnd(Interaction::Drag),
            EngineEvent::MoveEnd,
            EngineEvent::InteractionEnd(Interaction::Press),
        ]
    }

    pub fn source(&self, id: &str) -> Option<&serde_json::Value> {
        self.sources.get(id)
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    pub fn layer(&self, id: &str) -> Option<&LineLayer> {
        self.layers.get(id)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn light_preset(&self) -> LightPreset {
        self.light_preset
    }

    /// Drop every overlay without telling anyone, as when a style reloads
    pub fn reset_style(&mut self) {
        self.sources.clear();
        self.layers.clear();
    }

    /// Approximate camera that shows `bbox` (the recorder has no viewport size)
    fn fitted_camera(bbox: BoundingBox) -> Camera {
        let span = (bbox.max_lng - bbox.min_lng)
            .abs()
            .max((bbox.max_lat - bbox.min_lat).abs() * 2.0)
            .max(f64::EPSILON);
        let zoom = (360.0 / span).log2().clamp(MIN_ZOOM, MAX_ZOOM);
        Camera::new(bbox.center(), zoom)
    }
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new(Camera::new(LngLat::default(), MIN_ZOOM))
    }
}

impl MapEngine for RecordingEngine {
    fn camera(&self) -> Camera {
        self.camera
    }

    fn set_camera(&mut self, command: CameraCommand) {
        let mut target = command.target;
        target.zoom = target.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.pending = Some(target);
        self.commands.push(EngineCommand::SetCamera(command));
    }

    fn fit_bounds(&mut self, bbox: BoundingBox, padding: f64) {
        self.pending = Some(Self::fitted_camera(bbox));
        self.commands.push(EngineCommand::FitBounds { bbox, padding });
    }

    fn add_overlay_source(&mut self, id: &str, data: serde_json::Value) {
        self.sources.insert(id.to_string(), data);
        self.commands.push(EngineCommand::AddSource(id.to_string()));
    }

    fn add_overlay_layer(&mut self, layer: LineLayer) {
        self.layers.insert(layer.id.clone(), layer.clone());
        self.commands.push(EngineCommand::AddLayer(layer));
    }

    fn has_overlay_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn has_overlay_layer(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    fn remove_overlay_layer(&mut self, id: &str) {
        self.layers.remove(id);
        self.commands.push(EngineCommand::RemoveLayer(id.to_string()));
    }

    fn remove_overlay_source(&mut self, id: &str) {
        self.sources.remove(id);
        self.commands.push(EngineCommand::RemoveSource(id.to_string()));
    }

    fn set_light_preset(&mut self, preset: LightPreset) {
        self.light_preset = preset;
        self.commands.push(EngineCommand::SetLightPreset(preset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Transition;

    fn fly(lng: f64, lat: f64, zoom: f64) -> CameraCommand {
        CameraCommand {
            target: Camera::new(LngLat::new(lng, lat), zoom),
            transition: Transition::Fly,
        }
    }

    #[test]
    fn test_camera_changes_only_on_completion() {
        let mut engine = RecordingEngine::default();
        engine.set_camera(fly(10.0, 20.0, 5.0));

        assert_eq!(engine.camera().center, LngLat::new(0.0, 0.0));
        assert!(engine.is_animating());

        let events = engine.complete_animation();
        assert_eq!(
            events,
            vec![
                EngineEvent::Move { center: LngLat::new(10.0, 20.0), zoom: 5.0 },
                EngineEvent::MoveEnd,
            ]
        );
        assert_eq!(engine.camera().zoom, 5.0);
        assert!(engine.complete_animation().is_empty());
    }

    #[test]
    fn test_last_command_wins() {
        let mut engine = RecordingEngine::default();
        engine.set_camera(fly(10.0, 20.0, 5.0));
        engine.set_camera(fly(-70.0, 40.0, 8.0));
        engine.complete_animation();

        assert_eq!(engine.camera(), Camera::new(LngLat::new(-70.0, 40.0), 8.0));
        assert_eq!(engine.camera_commands().len(), 2);
    }

    #[test]
    fn test_fit_bounds_targets_bbox_center() {
        let mut engine = RecordingEngine::default();
        engine.fit_bounds(BoundingBox::new(2.2, 48.8, 2.5, 48.9), 50.0);

        let target = engine.pending_target().unwrap();
        assert!((target.center.lng - 2.35).abs() < 1e-9);
        assert!((target.center.lat - 48.85).abs() < 1e-9);
        assert!(target.zoom > 5.0);
    }

    #[test]
    fn test_drag_cancels_animation() {
        let mut engine = RecordingEngine::default();
        engine.set_camera(fly(10.0, 20.0, 5.0));

        let events = engine.drag_to(LngLat::new(1.0, 1.0));
        assert_eq!(events.first(), Some(&EngineEvent::InteractionStart(Interaction::Press)));
        assert!(!engine.is_animating());
        assert_eq!(engine.camera().center, LngLat::new(1.0, 1.0));
    }

    #[test]
    fn test_overlay_bookkeeping() {
        let mut engine = RecordingEngine::default();
        engine.add_overlay_source("s", serde_json::json!({}));
        engine.add_overlay_layer(LineLayer {
            id: "l".to_string(),
            source: "s".to_string(),
            color: "#000".to_string(),
            width: 1.0,
        });
        assert!(engine.has_overlay_source("s"));
        assert!(engine.has_overlay_layer("l"));

        engine.reset_style();
        assert!(!engine.has_overlay_layer("l"));
        assert_eq!(engine.layer_count(), 0);
    }
}
