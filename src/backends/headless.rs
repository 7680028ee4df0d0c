//! Recording implementations of the map library APIs
//!
//! The headless binary and the tests drive the real adapters against these.
//! Clones share state, so a clone kept aside can inspect what the adapter
//! built after the original moved into a provider.

use super::api::{
    DrawingToolsOptions, ImageOverlayOptions, MapObjectId, MarkerOptions, TileLayerOptions,
    TileMapApi, TileMapOptions, VectorMapApi, VectorMapOptions,
};
use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::vector::PolygonStyle,
    MapError, Result,
};
use std::ops::Deref;
use std::sync::{Arc, Mutex, MutexGuard};

/// A map object the library was asked to construct
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedObject {
    TileLayer {
        url_template: String,
        attribution: String,
        max_zoom: u8,
    },
    Polygon {
        id: MapObjectId,
        vertices: usize,
        fill_color: String,
    },
    GroundOverlay {
        id: MapObjectId,
        url: String,
        bounds: LatLngBounds,
        opacity: f32,
        interactive: bool,
    },
    Marker {
        id: MapObjectId,
        title: String,
        position: LatLng,
    },
    DrawingManager {
        id: MapObjectId,
        modes: usize,
    },
}

#[derive(Debug, Default)]
struct RecorderState {
    available: bool,
    construction_error: Option<String>,
    container_id: Option<String>,
    vector_options: Option<VectorMapOptions>,
    view: Option<(LatLng, u8)>,
    objects: Vec<RecordedObject>,
    popups: Vec<(MapObjectId, String)>,
    next_id: MapObjectId,
}

/// Shared record of everything a headless library was asked to do
#[derive(Debug, Clone, Default)]
pub struct HeadlessRecorder {
    state: Arc<Mutex<RecorderState>>,
}

impl HeadlessRecorder {
    fn with(available: bool, construction_error: Option<String>) -> Self {
        let recorder = Self::default();
        if let Ok(mut state) = recorder.state.lock() {
            state.available = available;
            state.construction_error = construction_error;
        }
        recorder
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecorderState>> {
        self.state
            .lock()
            .map_err(|_| MapError::InvalidState("headless map state lock poisoned".to_string()))
    }

    /// Simulates the library's script tag finishing (or failing) to load
    pub fn set_available(&self, available: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.available = available;
        }
    }

    fn available(&self) -> bool {
        self.state.lock().map(|s| s.available).unwrap_or(false)
    }

    /// Whether a map was constructed
    pub fn is_created(&self) -> bool {
        self.container_id().is_some()
    }

    pub fn container_id(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.container_id.clone())
    }

    pub fn map_view(&self) -> Option<(LatLng, u8)> {
        self.state.lock().ok().and_then(|s| s.view)
    }

    pub fn created_options(&self) -> Option<VectorMapOptions> {
        self.state.lock().ok().and_then(|s| s.vector_options.clone())
    }

    pub fn objects(&self) -> Vec<RecordedObject> {
        self.state
            .lock()
            .map(|s| s.objects.clone())
            .unwrap_or_default()
    }

    pub fn popups(&self) -> Vec<(MapObjectId, String)> {
        self.state
            .lock()
            .map(|s| s.popups.clone())
            .unwrap_or_default()
    }

    pub fn polygon_count(&self) -> usize {
        self.objects()
            .iter()
            .filter(|o| matches!(o, RecordedObject::Polygon { .. }))
            .count()
    }

    fn create(&self, container_id: &str, view: (LatLng, u8)) -> Result<()> {
        let mut state = self.lock()?;
        if let Some(error) = &state.construction_error {
            return Err(MapError::BackendConstruction(error.clone()));
        }
        state.container_id = Some(container_id.to_string());
        state.view = Some(view);
        Ok(())
    }

    fn ensure_created(state: &RecorderState) -> Result<()> {
        if state.container_id.is_none() {
            return Err(MapError::InvalidState("map has not been created".to_string()));
        }
        Ok(())
    }

    fn record<F>(&self, build: F) -> Result<MapObjectId>
    where
        F: FnOnce(MapObjectId) -> RecordedObject,
    {
        let mut state = self.lock()?;
        Self::ensure_created(&state)?;
        state.next_id += 1;
        let id = state.next_id;
        state.objects.push(build(id));
        Ok(id)
    }

    fn set_view(&self, view: (LatLng, u8)) -> Result<()> {
        let mut state = self.lock()?;
        Self::ensure_created(&state)?;
        state.view = Some(view);
        Ok(())
    }

    fn bind(&self, object: MapObjectId, html: &str) -> Result<()> {
        let mut state = self.lock()?;
        Self::ensure_created(&state)?;
        state.popups.push((object, html.to_string()));
        Ok(())
    }
}

/// Headless stand-in for the vector map library
#[derive(Debug, Clone, Default)]
pub struct HeadlessVectorMap(HeadlessRecorder);

impl HeadlessVectorMap {
    pub fn available() -> Self {
        Self(HeadlessRecorder::with(true, None))
    }

    pub fn unavailable() -> Self {
        Self(HeadlessRecorder::with(false, None))
    }

    /// Loaded, but every map construction fails with `message`
    pub fn failing(message: &str) -> Self {
        Self(HeadlessRecorder::with(true, Some(message.to_string())))
    }
}

impl Deref for HeadlessVectorMap {
    type Target = HeadlessRecorder;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl VectorMapApi for HeadlessVectorMap {
    fn is_available(&self) -> bool {
        self.0.available()
    }

    fn create_map(&mut self, container_id: &str, options: &VectorMapOptions) -> Result<()> {
        self.0.create(container_id, (options.center, options.zoom))?;
        self.0.lock()?.vector_options = Some(options.clone());
        Ok(())
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<()> {
        self.0.set_view((center, zoom))
    }

    fn add_polygon(&mut self, paths: &[LatLng], style: &PolygonStyle) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::Polygon {
            id,
            vertices: paths.len(),
            fill_color: style.fill_color.to_hex(),
        })
    }

    fn add_ground_overlay(
        &mut self,
        url: &str,
        bounds: &LatLngBounds,
        options: &ImageOverlayOptions,
    ) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::GroundOverlay {
            id,
            url: url.to_string(),
            bounds: bounds.clone(),
            opacity: options.opacity,
            interactive: options.interactive,
        })
    }

    fn add_marker(&mut self, position: LatLng, options: &MarkerOptions) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::Marker {
            id,
            title: options.title.clone(),
            position,
        })
    }

    fn bind_info_window(&mut self, object: MapObjectId, html: &str) -> Result<()> {
        self.0.bind(object, html)
    }

    fn add_drawing_manager(&mut self, options: &DrawingToolsOptions) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::DrawingManager {
            id,
            modes: options.modes.len(),
        })
    }
}

/// Headless stand-in for the tile-layer map library
#[derive(Debug, Clone, Default)]
pub struct HeadlessTileMap(HeadlessRecorder);

impl HeadlessTileMap {
    pub fn available() -> Self {
        Self(HeadlessRecorder::with(true, None))
    }

    pub fn unavailable() -> Self {
        Self(HeadlessRecorder::with(false, None))
    }
}

impl Deref for HeadlessTileMap {
    type Target = HeadlessRecorder;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TileMapApi for HeadlessTileMap {
    fn is_available(&self) -> bool {
        self.0.available()
    }

    fn create_map(&mut self, container_id: &str, options: &TileMapOptions) -> Result<()> {
        self.0
            .create(container_id, (LatLng::from_pair(options.center), options.zoom))
    }

    fn set_view(&mut self, center: [f64; 2], zoom: u8) -> Result<()> {
        self.0.set_view((LatLng::from_pair(center), zoom))
    }

    fn add_tile_layer(&mut self, options: &TileLayerOptions) -> Result<MapObjectId> {
        self.0.record(|_| RecordedObject::TileLayer {
            url_template: options.url_template.clone(),
            attribution: options.attribution.clone(),
            max_zoom: options.max_zoom,
        })
    }

    fn add_polygon(&mut self, latlngs: &[[f64; 2]], style: &PolygonStyle) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::Polygon {
            id,
            vertices: latlngs.len(),
            fill_color: style.fill_color.to_hex(),
        })
    }

    fn add_image_overlay(
        &mut self,
        url: &str,
        bounds: [[f64; 2]; 2],
        options: &ImageOverlayOptions,
    ) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::GroundOverlay {
            id,
            url: url.to_string(),
            bounds: LatLngBounds::new(LatLng::from_pair(bounds[0]), LatLng::from_pair(bounds[1])),
            opacity: options.opacity,
            interactive: options.interactive,
        })
    }

    fn add_marker(&mut self, latlng: [f64; 2], options: &MarkerOptions) -> Result<MapObjectId> {
        self.0.record(|id| RecordedObject::Marker {
            id,
            title: options.title.clone(),
            position: LatLng::from_pair(latlng),
        })
    }

    fn bind_popup(&mut self, object: MapObjectId, html: &str) -> Result<()> {
        self.0.bind(object, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let mut api = HeadlessTileMap::available();
        let probe = api.clone();
        api.create_map("map", &TileMapOptions { center: [26.0, 92.0], zoom: 7 })
            .unwrap();

        assert!(probe.is_created());
        assert_eq!(probe.map_view(), Some((LatLng::new(26.0, 92.0), 7)));
    }

    #[test]
    fn test_objects_require_a_map() {
        let mut api = HeadlessVectorMap::available();
        let result = api.add_polygon(&[LatLng::new(1.0, 2.0)], &PolygonStyle::flood());
        assert!(matches!(result, Err(MapError::InvalidState(_))));
    }

    #[test]
    fn test_availability_can_change() {
        let api = HeadlessVectorMap::unavailable();
        assert!(!api.is_available());
        api.set_available(true);
        assert!(api.is_available());
    }
}
