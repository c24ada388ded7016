//! Idle globe rotation
//!
//! A two-state machine (`Spinning`, `Paused`). While spinning, each step
//! eases the camera west by one step's worth of rotation; the next step is
//! only requested when the engine reports that the previous move ended, so
//! there is never more than one rotation animation in flight.
//!
//! Speed is `360 / seconds_per_revolution` degrees per second while zoomed
//! out, falls linearly to zero between `slow_spin_zoom` and `max_spin_zoom`,
//! and is zero at or above `max_spin_zoom`.

use crate::config::defaults::{
    DEFAULT_MAX_SPIN_ZOOM, DEFAULT_SECONDS_PER_REVOLUTION, DEFAULT_SLOW_SPIN_ZOOM,
    DEFAULT_SPIN_STEP_MS,
};
use crate::engine::Easing;
use crate::geo::LngLat;
use crate::map::ViewportState;
use std::time::Duration;

/// Rotation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSettings {
    /// Time for one full revolution while fully zoomed out
    pub seconds_per_revolution: f64,
    /// No rotation at or above this zoom
    pub max_spin_zoom: f64,
    /// Rotation slows down above this zoom
    pub slow_spin_zoom: f64,
    /// Duration of one eased step
    pub step: Duration,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            seconds_per_revolution: DEFAULT_SECONDS_PER_REVOLUTION,
            max_spin_zoom: DEFAULT_MAX_SPIN_ZOOM,
            slow_spin_zoom: DEFAULT_SLOW_SPIN_ZOOM,
            step: Duration::from_millis(DEFAULT_SPIN_STEP_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Spinning,
    Paused,
}

/// One eased rotation step to hand to the bridge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinStep {
    pub center: LngLat,
    pub duration: Duration,
    pub easing: Easing,
}

/// Idle rotation controller
#[derive(Debug, Clone)]
pub struct IdleRotation {
    settings: SpinSettings,
    enabled: bool,
    user_interacting: bool,
}

impl IdleRotation {
    pub fn new(settings: SpinSettings) -> Self {
        Self {
            settings,
            enabled: true,
            user_interacting: false,
        }
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    pub fn phase(&self) -> SpinPhase {
        if self.enabled && !self.user_interacting {
            SpinPhase::Spinning
        } else {
            SpinPhase::Paused
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn rotation on or off entirely
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Press, drag, rotate or pitch began
    pub fn on_interaction_start(&mut self) {
        self.user_interacting = true;
    }

    /// The gesture ended; resume if still zoomed out
    pub fn on_interaction_end(&mut self, viewport: ViewportState) -> Option<SpinStep> {
        self.user_interacting = false;
        self.tick(viewport)
    }

    /// A camera animation finished; chain the next step
    pub fn on_animation_end(&self, viewport: ViewportState) -> Option<SpinStep> {
        self.tick(viewport)
    }

    /// Rotation speed in degrees per second at `zoom`
    pub fn degrees_per_second(&self, zoom: f64) -> f64 {
        let s = &self.settings;
        if zoom >= s.max_spin_zoom || s.seconds_per_revolution <= 0.0 {
            return 0.0;
        }

        let mut speed = 360.0 / s.seconds_per_revolution;
        if zoom > s.slow_spin_zoom {
            let falloff = (s.max_spin_zoom - zoom) / (s.max_spin_zoom - s.slow_spin_zoom);
            speed *= falloff.max(0.0);
        }
        speed
    }

    /// Next step from `viewport`, or None when paused or zoomed in
    pub fn tick(&self, viewport: ViewportState) -> Option<SpinStep> {
        if self.phase() != SpinPhase::Spinning {
            return None;
        }

        let degrees = self.degrees_per_second(viewport.zoom) * self.settings.step.as_secs_f64();
        if degrees <= 0.0 {
            return None;
        }

        let center = LngLat::new(viewport.center.lng - degrees, viewport.center.lat).wrapped();
        Some(SpinStep {
            center,
            duration: self.settings.step,
            easing: Easing::Linear,
        })
    }
}

impl Default for IdleRotation {
    fn default() -> Self {
        Self::new(SpinSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn viewport(lng: f64, zoom: f64) -> ViewportState {
        ViewportState { center: LngLat::new(lng, 10.0), zoom }
    }

    #[test]
    fn test_full_speed_when_zoomed_out() {
        let spin = IdleRotation::default();
        assert_relative_eq!(spin.degrees_per_second(1.5), 3.0);

        let step = spin.tick(viewport(0.0, 1.5)).unwrap();
        assert_relative_eq!(step.center.lng, -3.0);
        assert_relative_eq!(step.center.lat, 10.0);
        assert_eq!(step.duration, Duration::from_millis(1000));
        assert_eq!(step.easing, Easing::Linear);
    }

    #[test]
    fn test_linear_slowdown() {
        let spin = IdleRotation::default();
        assert_relative_eq!(spin.degrees_per_second(3.0), 3.0);
        assert_relative_eq!(spin.degrees_per_second(3.5), 1.5);
        assert_relative_eq!(spin.degrees_per_second(3.75), 0.75);
    }

    #[test]
    fn test_no_spin_at_max_zoom() {
        let spin = IdleRotation::default();
        assert_eq!(spin.degrees_per_second(4.0), 0.0);
        assert!(spin.tick(viewport(0.0, 4.0)).is_none());
        assert!(spin.tick(viewport(0.0, 12.0)).is_none());
    }

    #[test]
    fn test_successive_ticks_are_monotonic() {
        let spin = IdleRotation::default();
        let mut state = viewport(30.0, 2.0);
        let mut previous = state.center.lng;

        for _ in 0..5 {
            let step = spin.tick(state).unwrap();
            assert_relative_eq!(previous - step.center.lng, 3.0, epsilon = 1e-9);
            previous = step.center.lng;
            state.center = step.center;
        }
    }

    #[test]
    fn test_wraps_across_antimeridian() {
        let spin = IdleRotation::default();
        let step = spin.tick(viewport(-179.0, 1.0)).unwrap();
        assert_relative_eq!(step.center.lng, 178.0);
    }

    #[test]
    fn test_interaction_pauses_and_resumes() {
        let mut spin = IdleRotation::default();
        assert_eq!(spin.phase(), SpinPhase::Spinning);

        spin.on_interaction_start();
        assert_eq!(spin.phase(), SpinPhase::Paused);
        assert!(spin.tick(viewport(0.0, 1.0)).is_none());
        assert!(spin.on_animation_end(viewport(0.0, 1.0)).is_none());

        let step = spin.on_interaction_end(viewport(0.0, 1.0));
        assert_eq!(spin.phase(), SpinPhase::Spinning);
        assert!(step.is_some());
    }

    #[test]
    fn test_interaction_end_while_zoomed_in() {
        let mut spin = IdleRotation::default();
        spin.on_interaction_start();
        assert!(spin.on_interaction_end(viewport(0.0, 8.0)).is_none());
        assert_eq!(spin.phase(), SpinPhase::Spinning);
    }

    #[test]
    fn test_disabled() {
        let mut spin = IdleRotation::default();
        spin.set_enabled(false);
        assert_eq!(spin.phase(), SpinPhase::Paused);
        assert!(spin.tick(viewport(0.0, 1.0)).is_none());
        assert!(!spin.is_enabled());
    }

    #[test]
    fn test_custom_step_duration() {
        let spin = IdleRotation::new(SpinSettings {
            step: Duration::from_millis(500),
            ..SpinSettings::default()
        });
        let step = spin.tick(viewport(0.0, 1.0)).unwrap();
        assert_relative_eq!(step.center.lng, -1.5);
    }
}
