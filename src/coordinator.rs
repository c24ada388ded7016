//! Map viewport coordinator
//!
//! Wires the search service, the assistant, the viewport bridge, the overlay
//! manager and the idle rotation controller together. All camera movement
//! goes through the bridge; the host forwards engine events to
//! `handle_event` so the bridge state and the rotation chain stay current.

use crate::assistant::{AiAnswer, Conversation, GeoAssistant};
use crate::config::Config;
use crate::config::defaults::{
    DEFAULT_FIT_PADDING, DEFAULT_POINT_ZOOM, DEFAULT_REGION_ZOOM, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SEARCH_TYPES,
};
use crate::engine::{EngineEvent, MapEngine};
use crate::error::{AiError, Result, SearchError};
use crate::geo::gate::{SearchGate, SearchTrigger};
use crate::geo::{LocationSearch, SearchRequest, SearchResult};
use crate::map::bridge::ViewportBridge;
use crate::map::overlay::{BoundingOverlay, OverlayManager};
use crate::map::spin::{IdleRotation, SpinStep};
use crate::map::{Theme, ViewportState};
use tracing::{debug, info, warn};

/// Zoom levels used when navigating to a selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPolicy {
    /// Results with a bounding box
    pub region_zoom: f64,
    /// Results without one, and AI-resolved places
    pub point_zoom: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            region_zoom: DEFAULT_REGION_ZOOM,
            point_zoom: DEFAULT_POINT_ZOOM,
        }
    }
}

/// What a search attempt produced
///
/// Failures come back as an empty list plus the error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub error: Option<SearchError>,
}

/// What a question produced
#[derive(Debug, Clone, PartialEq)]
pub struct AskOutcome {
    pub answer: AiAnswer,
    /// The place the camera was sent to, when `navigateTo` resolved
    pub navigated_to: Option<SearchResult>,
}

/// Root coordinator
pub struct Coordinator<S, A, E> {
    search: S,
    assistant: A,
    bridge: ViewportBridge<E>,
    overlay: OverlayManager,
    rotation: IdleRotation,
    gate: SearchGate,
    zoom: ZoomPolicy,
    search_limit: usize,
    search_types: String,
    results: Vec<SearchResult>,
    history: Conversation,
    theme: Theme,
}

impl<S, A, E> Coordinator<S, A, E>
where
    S: LocationSearch,
    A: GeoAssistant,
    E: MapEngine,
{
    /// Create a coordinator with default policies
    pub fn new(search: S, assistant: A, bridge: ViewportBridge<E>) -> Self {
        Self {
            search,
            assistant,
            bridge,
            overlay: OverlayManager::new(DEFAULT_FIT_PADDING),
            rotation: IdleRotation::default(),
            gate: SearchGate::default(),
            zoom: ZoomPolicy::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            search_types: DEFAULT_SEARCH_TYPES.to_string(),
            results: Vec::new(),
            history: Conversation::new(),
            theme: Theme::default(),
        }
    }

    /// Create a coordinator from the config file settings
    pub fn from_config(config: &Config, search: S, assistant: A, engine: E) -> Result<Self> {
        let mut rotation = IdleRotation::new(config.spin_settings());
        rotation.set_enabled(config.spin.enabled);

        let mut coordinator = Self::new(search, assistant, ViewportBridge::new(engine))
            .with_gate(config.search_gate()?)
            .with_rotation(rotation)
            .with_zoom_policy(ZoomPolicy {
                region_zoom: config.map.region_zoom,
                point_zoom: config.map.point_zoom,
            })
            .with_fit_padding(config.map.fit_padding);
        coordinator.search_limit = config.mapbox.limit;
        coordinator.search_types = config.mapbox.types.clone();
        coordinator.set_theme(config.theme()?);
        Ok(coordinator)
    }

    pub fn with_gate(mut self, gate: SearchGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_rotation(mut self, rotation: IdleRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_zoom_policy(mut self, zoom: ZoomPolicy) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_fit_padding(mut self, padding: f64) -> Self {
        self.overlay = OverlayManager::new(padding);
        self
    }

    /// Current viewport as last reported by the engine
    pub fn viewport(&self) -> ViewportState {
        self.bridge.state()
    }

    pub fn overlay(&self) -> Option<&BoundingOverlay> {
        self.overlay.current()
    }

    /// Results of the last search, cleared on selection
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn history(&self) -> &Conversation {
        &self.history
    }

    pub fn rotation(&self) -> &IdleRotation {
        &self.rotation
    }

    pub fn gate(&self) -> SearchGate {
        self.gate
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn bridge(&self) -> &ViewportBridge<E> {
        &self.bridge
    }

    pub fn engine(&self) -> Option<&E> {
        self.bridge.engine()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.bridge.engine_mut()
    }

    /// Kick off idle rotation; true if a step was issued
    pub fn start(&mut self) -> bool {
        let step = self.rotation.tick(self.bridge.state());
        self.ease(step)
    }

    /// Turn idle rotation on or off
    pub fn set_spin_enabled(&mut self, enabled: bool) {
        self.rotation.set_enabled(enabled);
        if enabled {
            self.start();
        }
    }

    /// Route one engine event
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Move { center, zoom } => self.bridge.on_engine_move(center, zoom),
            EngineEvent::MoveEnd => {
                let step = self.rotation.on_animation_end(self.bridge.state());
                self.ease(step);
            }
            EngineEvent::InteractionStart(kind) => {
                debug!("Interaction started: {:?}", kind);
                self.rotation.on_interaction_start();
            }
            EngineEvent::InteractionEnd(kind) => {
                debug!("Interaction ended: {:?}", kind);
                let step = self.rotation.on_interaction_end(self.bridge.state());
                self.ease(step);
            }
        }
    }

    /// Route a batch of engine events in order
    pub fn handle_events(&mut self, events: impl IntoIterator<Item = EngineEvent>) {
        for event in events {
            self.handle_event(event);
        }
    }

    /// Search input changed
    ///
    /// Short input clears the result list. Keystroke-triggered gates search
    /// right away; submit-triggered gates wait for `submit_search`.
    pub async fn on_query_input(&mut self, input: &str) -> Option<SearchOutcome> {
        if !self.gate.long_enough(input) {
            self.results.clear();
            return None;
        }
        if self.gate.admit(input, SearchTrigger::Keystroke).is_none() {
            return None;
        }
        Some(self.run_search(input).await)
    }

    /// Explicit search submission
    pub async fn submit_search(&mut self, query: &str) -> SearchOutcome {
        if self.gate.admit(query, SearchTrigger::Submit).is_none() {
            debug!("Query below {} characters, not searching", self.gate.min_chars());
            self.results.clear();
            return SearchOutcome::default();
        }
        self.run_search(query).await
    }

    async fn run_search(&mut self, query: &str) -> SearchOutcome {
        let request = self.request(query.trim(), self.search_limit);
        match self.search.search(&request).await {
            Ok(results) => {
                debug!("{} results for {:?}", results.len(), request.query);
                self.results = results.clone();
                SearchOutcome { results, error: None }
            }
            Err(err) => {
                warn!("Search for {:?} failed: {}", request.query, err);
                self.results.clear();
                SearchOutcome { results: Vec::new(), error: Some(err) }
            }
        }
    }

    fn request(&self, query: &str, limit: usize) -> SearchRequest {
        SearchRequest::new(query, self.bridge.state().center)
            .with_limit(limit)
            .with_types(self.search_types.clone())
    }

    /// Navigate to a result
    ///
    /// With a bounding box the region is outlined and the camera flies in at
    /// the region zoom; without one any outline is cleared and the camera
    /// flies in at the point zoom.
    pub fn select(&mut self, result: &SearchResult) {
        self.results.clear();
        info!("Selected {} at {}", result.label(), result.coordinates);

        match result.bbox {
            Some(bbox) => {
                self.overlay.display(&mut self.bridge, Some(bbox));
                self.bridge.fly_to(result.coordinates, Some(self.zoom.region_zoom));
            }
            None => {
                self.overlay.display(&mut self.bridge, None);
                self.bridge.fly_to(result.coordinates, Some(self.zoom.point_zoom));
            }
        }
    }

    /// Select the `index`th result of the last search
    pub fn select_index(&mut self, index: usize) -> Option<SearchResult> {
        let result = self.results.get(index).cloned()?;
        self.select(&result);
        Some(result)
    }

    /// Remove the outline without moving the camera
    pub fn clear_overlay(&mut self) {
        self.overlay.clear(&mut self.bridge);
    }

    /// Ask the assistant and follow its `navigateTo`, if any
    ///
    /// The turn is recorded before navigation is attempted. Resolution is a
    /// single best-effort lookup; when it fails the viewport stays put.
    pub async fn ask(&mut self, prompt: &str) -> std::result::Result<AskOutcome, AiError> {
        let answer = self.assistant.ask(prompt).await?;
        self.history.push(prompt.trim(), answer.reply.clone());

        let navigated_to = match answer.navigate_to.as_deref() {
            Some(place) => self.resolve(place).await,
            None => None,
        };
        if let Some(place) = &navigated_to {
            let mut point = place.clone();
            point.bbox = None;
            self.select(&point);
        }

        Ok(AskOutcome { answer, navigated_to })
    }

    async fn resolve(&self, place: &str) -> Option<SearchResult> {
        let request = self.request(place, 1);
        match self.search.search(&request).await {
            Ok(results) => {
                if results.is_empty() {
                    debug!("No match for {:?}", place);
                }
                results.into_iter().next()
            }
            Err(err) => {
                debug!("Could not resolve {:?}: {}", place, err);
                None
            }
        }
    }

    /// Theme side channel; only the basemap lighting changes
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.bridge.apply_theme(theme);
    }

    fn ease(&mut self, step: Option<SpinStep>) -> bool {
        match step {
            Some(step) => self.bridge.ease_to(step.center, step.duration, step.easing),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::recording::{EngineCommand, RecordingEngine};
    use crate::engine::{Camera, Interaction, Transition};
    use crate::geo::{BoundingBox, LngLat};
    use crate::testing::{result, StubAssistant, StubSearch};
    use approx::assert_relative_eq;

    type TestCoordinator = Coordinator<StubSearch, StubAssistant, RecordingEngine>;

    fn coordinator(search: StubSearch, assistant: StubAssistant, zoom: f64) -> TestCoordinator {
        let engine = RecordingEngine::new(Camera::new(LngLat::new(0.0, 0.0), zoom));
        Coordinator::new(search, assistant, ViewportBridge::new(engine))
    }

    /// Let the engine finish its animation and forward the events
    fn pump(coordinator: &mut TestCoordinator) {
        let events = coordinator.engine_mut().unwrap().complete_animation();
        coordinator.handle_events(events);
    }

    fn paris() -> SearchResult {
        result("Paris", 2.35, 48.85, Some(BoundingBox::new(2.2, 48.8, 2.5, 48.9)))
    }

    #[tokio::test]
    async fn test_select_with_bbox() {
        let search = StubSearch::new().with("Paris", vec![paris()]);
        let mut c = coordinator(search, StubAssistant::silent(), 1.5);

        let outcome = c.submit_search("Paris").await;
        assert_eq!(outcome.results.len(), 1);
        assert!(c.select_index(0).is_some());
        assert!(c.results().is_empty());

        let ring = c.overlay().unwrap().ring();
        let expected = [(2.2, 48.8), (2.5, 48.8), (2.5, 48.9), (2.2, 48.9), (2.2, 48.8)];
        for (point, (lng, lat)) in ring.iter().zip(expected) {
            assert_eq!(*point, LngLat::new(lng, lat));
        }

        let target = c.engine().unwrap().pending_target().unwrap();
        assert_eq!(target.center, LngLat::new(2.35, 48.85));
        assert_relative_eq!(target.zoom, 15.0);

        // Nothing changes until the engine reports the move
        assert_eq!(c.viewport().center, LngLat::new(0.0, 0.0));
        pump(&mut c);
        assert_eq!(c.viewport().center, LngLat::new(2.35, 48.85));
        assert_relative_eq!(c.viewport().zoom, 15.0);
    }

    #[tokio::test]
    async fn test_select_without_bbox_clears_overlay() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 1.5);
        c.select(&paris());
        assert!(c.overlay().is_some());

        c.select(&result("Trailhead", 7.5, 46.0, None));
        assert!(c.overlay().is_none());
        assert_eq!(c.engine().unwrap().layer_count(), 0);

        pump(&mut c);
        assert_eq!(c.viewport().center, LngLat::new(7.5, 46.0));
        assert_relative_eq!(c.viewport().zoom, 14.0);
    }

    #[tokio::test]
    async fn test_fly_to_follows_fit_bounds() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 1.5);
        c.select(&paris());

        let commands = c.engine().unwrap().commands();
        let fit = commands
            .iter()
            .position(|cmd| matches!(cmd, EngineCommand::FitBounds { .. }))
            .unwrap();
        let fly = commands
            .iter()
            .position(|cmd| {
                matches!(
                    cmd,
                    EngineCommand::SetCamera(camera) if camera.transition == Transition::Fly
                )
            })
            .unwrap();
        assert!(fit < fly);
    }

    #[tokio::test]
    async fn test_short_input_is_never_searched() {
        let search = StubSearch::new().with("Paris", vec![paris()]);
        let mut c = coordinator(search.clone(), StubAssistant::silent(), 1.5)
            .with_gate(SearchGate::new(3, SearchTrigger::Keystroke));

        assert!(c.on_query_input("Pa").await.is_none());
        assert_eq!(c.submit_search("Pa").await, SearchOutcome::default());
        assert_eq!(c.submit_search(" P ").await, SearchOutcome::default());
        assert_eq!(search.calls(), 0);

        let outcome = c.on_query_input("Par").await.unwrap();
        assert!(outcome.error.is_none());
        assert_eq!(search.calls(), 1);
    }

    #[tokio::test]
    async fn test_submit_gate_ignores_keystrokes() {
        let search = StubSearch::new().with("Paris", vec![paris()]);
        let mut c = coordinator(search.clone(), StubAssistant::silent(), 1.5);

        assert!(c.on_query_input("Paris").await.is_none());
        assert_eq!(search.calls(), 0);

        c.submit_search("  Paris ").await;
        assert_eq!(c.results().len(), 1);

        // Dropping below the gate clears the list
        c.on_query_input("Pa").await;
        assert!(c.results().is_empty());
    }

    #[tokio::test]
    async fn test_search_is_biased_to_viewport() {
        let search = StubSearch::new();
        let mut c = coordinator(search.clone(), StubAssistant::silent(), 1.5);
        c.handle_event(EngineEvent::Move { center: LngLat::new(13.4, 52.5), zoom: 5.0 });

        c.submit_search("Mitte").await;
        let request = &search.requests()[0];
        assert_eq!(request.query, "Mitte");
        assert_eq!(request.proximity, LngLat::new(13.4, 52.5));
        assert_eq!(request.limit, 8);
    }

    #[tokio::test]
    async fn test_search_failure_is_empty_list() {
        let search = StubSearch::failing(SearchError::RequestFailed(503));
        let mut c = coordinator(search, StubAssistant::silent(), 1.5);

        let outcome = c.submit_search("Paris").await;
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.error, Some(SearchError::RequestFailed(503)));
        assert!(c.results().is_empty());
    }

    #[tokio::test]
    async fn test_ask_navigates_at_point_zoom() {
        let search = StubSearch::new().with("Paris", vec![paris()]);
        let mut c = coordinator(search.clone(), StubAssistant::answering("Paris"), 1.5);

        let outcome = c.ask("What is the capital of France?").await.unwrap();
        assert_eq!(outcome.navigated_to.unwrap().name, "Paris");
        assert_eq!(search.requests()[0].limit, 1);
        assert!(c.overlay().is_none());

        pump(&mut c);
        assert_eq!(c.viewport().center, LngLat::new(2.35, 48.85));
        assert_relative_eq!(c.viewport().zoom, 14.0);
        assert_eq!(c.history().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_resolution_keeps_viewport() {
        let search = StubSearch::failing(SearchError::Timeout);
        let mut c = coordinator(search.clone(), StubAssistant::answering("Mount Fuji"), 5.0);
        let before = c.viewport();

        let outcome = c.ask("How tall is Mount Fuji?").await.unwrap();
        assert!(outcome.navigated_to.is_none());
        assert_eq!(outcome.answer.navigate_to.as_deref(), Some("Mount Fuji"));
        assert_eq!(search.calls(), 1);

        let turn = c.history().last().unwrap();
        assert_eq!(turn.prompt(), "How tall is Mount Fuji?");
        assert_eq!(turn.reply(), "You asked: How tall is Mount Fuji?");

        assert!(!c.engine().unwrap().is_animating());
        assert_eq!(c.viewport(), before);
    }

    #[tokio::test]
    async fn test_unknown_place_keeps_viewport() {
        let search = StubSearch::new();
        let mut c = coordinator(search.clone(), StubAssistant::answering("Mount Fuji"), 5.0);
        let before = c.viewport();

        let outcome = c.ask("How tall is Mount Fuji?").await.unwrap();
        assert!(outcome.navigated_to.is_none());
        assert_eq!(search.requests()[0].query, "Mount Fuji");
        assert_eq!(search.requests()[0].limit, 1);

        assert_eq!(c.history().len(), 1);
        assert_eq!(c.history().last().unwrap().reply(), "You asked: How tall is Mount Fuji?");
        assert!(c.engine().unwrap().camera_commands().is_empty());
        assert!(c.overlay().is_none());
        assert_eq!(c.viewport(), before);
    }

    #[tokio::test]
    async fn test_ai_failure_records_nothing() {
        let assistant = StubAssistant::failing(AiError::NotConfigured);
        let mut c = coordinator(StubSearch::new(), assistant, 5.0);

        assert_eq!(c.ask("Where is Lima?").await.unwrap_err(), AiError::NotConfigured);
        assert!(c.history().is_empty());
        assert!(c.engine().unwrap().commands().is_empty());
    }

    #[test]
    fn test_rotation_chain() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 1.5);
        assert!(c.start());

        let mut previous = c.viewport().center.lng;
        for _ in 0..4 {
            pump(&mut c);
            let lng = c.viewport().center.lng;
            assert_relative_eq!(previous - lng, 3.0, epsilon = 1e-9);
            previous = lng;
            assert!(c.engine().unwrap().is_animating());
        }
    }

    #[test]
    fn test_no_rotation_when_zoomed_in() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 4.0);
        assert!(!c.start());
        assert!(c.engine().unwrap().commands().is_empty());
        assert_eq!(c.viewport().center, LngLat::new(0.0, 0.0));
    }

    #[test]
    fn test_interaction_pauses_rotation() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 1.5);
        c.start();

        c.handle_event(EngineEvent::InteractionStart(Interaction::Press));
        let events = c.engine_mut().unwrap().complete_animation();
        c.handle_events(events);
        assert!(!c.engine().unwrap().is_animating());

        c.handle_event(EngineEvent::InteractionEnd(Interaction::Press));
        assert!(c.engine().unwrap().is_animating());
    }

    #[test]
    fn test_drag_updates_viewport() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 6.0);
        let events = c.engine_mut().unwrap().drag_to(LngLat::new(-70.0, -15.0));
        c.handle_events(events);

        assert_eq!(c.viewport().center, LngLat::new(-70.0, -15.0));
        assert!(!c.engine().unwrap().is_animating());
    }

    #[test]
    fn test_theme_only_changes_lighting() {
        let mut c = coordinator(StubSearch::new(), StubAssistant::silent(), 1.5);
        let before = c.viewport();
        c.set_theme(Theme::Dark);

        assert_eq!(c.theme(), Theme::Dark);
        assert_eq!(c.engine().unwrap().light_preset(), crate::engine::LightPreset::Night);
        assert!(!c.engine().unwrap().is_animating());
        assert_eq!(c.viewport(), before);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.spin.enabled = false;
        config.map.theme = "dark".to_string();
        config.mapbox.limit = 3;

        let engine = RecordingEngine::new(Camera::new(LngLat::new(0.0, 0.0), 1.0));
        let mut c =
            Coordinator::from_config(&config, StubSearch::new(), StubAssistant::silent(), engine)
                .unwrap();

        assert!(!c.start());
        assert_eq!(c.theme(), Theme::Dark);
        assert_eq!(c.search_limit, 3);
    }
}
