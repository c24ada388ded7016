//! pinpoint: Map Viewport Coordinator
//!
//! A library and CLI tool for exploring a world map by free-text search and
//! AI-assisted geography questions, while keeping the viewport, a single
//! highlighted bounding region and an idle globe rotation in sync with a
//! map engine.
//!
//! ## Features
//!
//! - Mapbox forward geocoding with normalized results
//! - Geography assistant (OpenAI structured output, or a pinpoint server)
//! - Viewport bridge: the engine's move events are the only source of truth
//! - Single bounding-box overlay with fit-to-bounds
//! - Idle rotation that yields to user interaction
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use pinpoint::engine::recording::RecordingEngine;
//! use pinpoint::engine::Camera;
//! use pinpoint::geo::{BoundingBox, LngLat};
//! use pinpoint::map::bridge::ViewportBridge;
//! use pinpoint::map::overlay::OverlayManager;
//!
//! let engine = RecordingEngine::new(Camera::new(LngLat::new(0.0, 0.0), 1.5));
//! let mut bridge = ViewportBridge::new(engine);
//! let mut overlay = OverlayManager::new(50.0);
//!
//! let paris = BoundingBox::new(2.2, 48.8, 2.5, 48.9);
//! overlay.display(&mut bridge, Some(paris));
//! bridge.fly_to(LngLat::new(2.35, 48.85), Some(15.0));
//!
//! // The viewport only moves once the engine reports it
//! let events = bridge.engine_mut().unwrap().complete_animation();
//! for event in events {
//!     if let pinpoint::engine::EngineEvent::Move { center, zoom } = event {
//!         bridge.on_engine_move(center, zoom);
//!     }
//! }
//! assert_eq!(bridge.state().zoom, 15.0);
//! assert_eq!(overlay.current().unwrap().ring()[0], LngLat::new(2.2, 48.8));
//! ```

pub mod assistant;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod geo;
pub mod map;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use assistant::{AiAnswer, GeoAssistant};
pub use config::Config;
pub use coordinator::Coordinator;
pub use error::{Error, Result};
pub use geo::{BoundingBox, LngLat, LocationSearch, SearchResult};
pub use map::ViewportState;
