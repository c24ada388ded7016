//! Bounding-box overlay manager
//!
//! Owns the single highlighted region outline. Every `display` call tears
//! down the previous overlay (layer first, then its source) before anything
//! else, so at most one overlay ever exists on the engine.

use crate::constants::overlay::{BBOX_LAYER_ID, BBOX_SOURCE_PREFIX, LINE_COLOR, LINE_WIDTH};
use crate::engine::{LineLayer, MapEngine};
use crate::geo::{BoundingBox, LngLat};
use crate::map::bridge::ViewportBridge;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

/// One highlighted region
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingOverlay {
    source_id: String,
    bbox: BoundingBox,
}

impl BoundingOverlay {
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Closed 5-point outline
    pub fn ring(&self) -> [LngLat; 5] {
        self.bbox.ring()
    }

    /// GeoJSON feature for the geometry source
    pub fn geojson(&self) -> Value {
        let ring: Vec<[f64; 2]> = self.ring().iter().map(|p| [p.lng, p.lat]).collect();
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [ring],
            },
            "properties": {},
        })
    }

    /// Line layer drawing this overlay
    pub fn layer(&self) -> LineLayer {
        LineLayer {
            id: BBOX_LAYER_ID.to_string(),
            source: self.source_id.clone(),
            color: LINE_COLOR.to_string(),
            width: LINE_WIDTH,
        }
    }
}

/// Manages the single bounding overlay
#[derive(Debug)]
pub struct OverlayManager {
    current: Option<BoundingOverlay>,
    padding: f64,
    last_millis: i64,
    same_millis_count: u32,
}

impl OverlayManager {
    /// Create a manager that fits the camera with `padding`
    pub fn new(padding: f64) -> Self {
        Self {
            current: None,
            padding,
            last_millis: i64::MIN,
            same_millis_count: 0,
        }
    }

    /// Overlay currently shown, if any
    pub fn current(&self) -> Option<&BoundingOverlay> {
        self.current.as_ref()
    }

    /// Replace the overlay with `bbox`, or just clear it when `None`
    pub fn display<E: MapEngine>(
        &mut self,
        bridge: &mut ViewportBridge<E>,
        bbox: Option<BoundingBox>,
    ) {
        self.remove_current(bridge);

        let Some(bbox) = bbox else {
            return;
        };
        let Some(engine) = bridge.engine_mut() else {
            return;
        };

        let overlay = BoundingOverlay {
            source_id: self.next_source_id(),
            bbox,
        };

        engine.add_overlay_source(&overlay.source_id, overlay.geojson());
        engine.add_overlay_layer(overlay.layer());
        debug!("Displaying overlay {} for {:?}", overlay.source_id, bbox);

        self.current = Some(overlay);
        bridge.fit_bounds(bbox, self.padding);
    }

    /// Remove the overlay, if any
    pub fn clear<E: MapEngine>(&mut self, bridge: &mut ViewportBridge<E>) {
        self.display(bridge, None);
    }

    /// Tear down the current overlay; tolerant of already-disposed pieces
    fn remove_current<E: MapEngine>(&mut self, bridge: &mut ViewportBridge<E>) {
        let Some(overlay) = self.current.take() else {
            return;
        };
        let Some(engine) = bridge.engine_mut() else {
            return;
        };

        if engine.has_overlay_layer(BBOX_LAYER_ID) {
            engine.remove_overlay_layer(BBOX_LAYER_ID);
        }
        if engine.has_overlay_source(&overlay.source_id) {
            engine.remove_overlay_source(&overlay.source_id);
        }
        debug!("Removed overlay {}", overlay.source_id);
    }

    /// Time-based source id, suffixed when several are created in one millisecond
    fn next_source_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        if now == self.last_millis {
            self.same_millis_count += 1;
            format!("{}-{}-{}", BBOX_SOURCE_PREFIX, now, self.same_millis_count)
        } else {
            self.last_millis = now;
            self.same_millis_count = 0;
            format!("{}-{}", BBOX_SOURCE_PREFIX, now)
        }
    }
}
