//! Viewport sync bridge
//!
//! Holds the engine handle and the `ViewportState` mirror. State is written
//! only from engine move reports; camera commands never touch it, so the
//! mirror cannot drift from what is rendered. Without an attached engine
//! every command is a silent no-op.

use crate::engine::{Camera, CameraCommand, Easing, MapEngine, Transition};
use crate::geo::{BoundingBox, LngLat};
use crate::map::{Theme, ViewportState};
use std::time::Duration;
use tracing::debug;

/// Authoritative viewport state holder
#[derive(Debug)]
pub struct ViewportBridge<E> {
    engine: Option<E>,
    state: ViewportState,
}

impl<E: MapEngine> ViewportBridge<E> {
    /// Create a bridge with no engine yet
    pub fn detached(initial: ViewportState) -> Self {
        Self { engine: None, state: initial }
    }

    /// Create a bridge mirroring `engine`'s current pose
    pub fn new(engine: E) -> Self {
        let state = engine.camera().into();
        Self { engine: Some(engine), state }
    }

    /// Attach an engine and adopt its reported pose
    pub fn attach(&mut self, engine: E) {
        self.state = engine.camera().into();
        self.engine = Some(engine);
    }

    /// Detach and return the engine
    pub fn detach(&mut self) -> Option<E> {
        self.engine.take()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    /// Last reported camera pose
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Engine reported a camera change
    pub fn on_engine_move(&mut self, center: LngLat, zoom: f64) {
        self.state = ViewportState { center, zoom };
    }

    /// Fly to `coordinates`, keeping the current zoom when none is given
    ///
    /// Returns false when no engine is attached.
    pub fn fly_to(&mut self, coordinates: LngLat, zoom: Option<f64>) -> bool {
        let zoom = zoom.unwrap_or(self.state.zoom);
        self.command(CameraCommand {
            target: Camera::new(coordinates, zoom),
            transition: Transition::Fly,
        })
    }

    /// Eased move of the center at the current zoom
    pub fn ease_to(&mut self, center: LngLat, duration: Duration, easing: Easing) -> bool {
        let zoom = self.state.zoom;
        self.command(CameraCommand {
            target: Camera::new(center, zoom),
            transition: Transition::Ease { duration, easing },
        })
    }

    /// Fit the camera to `bbox` with an inset padding
    pub fn fit_bounds(&mut self, bbox: BoundingBox, padding: f64) -> bool {
        match self.engine.as_mut() {
            Some(engine) => {
                engine.fit_bounds(bbox, padding);
                true
            }
            None => false,
        }
    }

    /// Theme side channel: only the basemap light preset changes
    pub fn apply_theme(&mut self, theme: Theme) -> bool {
        match self.engine.as_mut() {
            Some(engine) => {
                engine.set_light_preset(theme.light_preset());
                true
            }
            None => false,
        }
    }

    fn command(&mut self, command: CameraCommand) -> bool {
        match self.engine.as_mut() {
            Some(engine) => {
                debug!(
                    "Camera -> {} @ z{:.2} ({:?})",
                    command.target.center, command.target.zoom, command.transition
                );
                engine.set_camera(command);
                true
            }
            None => false,
        }
    }
}
