//! Primary backend: the interactive vector map

use super::{
    api::{
        DrawingToolsOptions, ImageOverlayOptions, MapControls, MapStyleRule, MarkerOptions,
        VectorMapApi, VectorMapOptions,
    },
    BackendKind, MapBackend, OverlayGeometry,
};
use crate::{
    constants::{PRIMARY_MAP_HEADING, PRIMARY_MAP_TILT},
    core::{config::MapConfiguration, geo::LatLng},
    layers::{
        base::{BaseLayer, LayerProperties, LayerType},
        image::GroundImageLayer,
        manager::LayerManager,
        marker::Marker,
        vector::PolygonLayer,
    },
    traits::LayerOperations,
    MapError, Result,
};

/// Vector map adapter. Coordinates are handed to the library as `LatLng` objects.
pub struct VectorMap<A: VectorMapApi> {
    api: A,
    container_id: String,
    center: LatLng,
    zoom: u8,
    layers: LayerManager,
}

impl<A: VectorMapApi> VectorMap<A> {
    /// Library options for a resolved configuration: tilted 45°, north up,
    /// dashboard theme and the standard control set.
    pub fn options_for(config: &MapConfiguration) -> VectorMapOptions {
        VectorMapOptions {
            center: config.center(),
            zoom: config.zoom(),
            map_type_id: config.map_style_id().to_string(),
            tilt: PRIMARY_MAP_TILT,
            heading: PRIMARY_MAP_HEADING,
            styles: MapStyleRule::dashboard_theme(),
            controls: MapControls::default(),
        }
    }

    /// Constructs the map. Any library failure comes back as
    /// [`MapError::BackendConstruction`].
    pub fn create(mut api: A, container_id: &str, config: &MapConfiguration) -> Result<Self> {
        if !api.is_available() {
            return Err(MapError::LibraryUnavailable {
                library: "vector map".to_string(),
                attempts: 1,
            });
        }
        let options = Self::options_for(config);
        api.create_map(container_id, &options).map_err(|e| match e {
            MapError::BackendConstruction(_) => e,
            other => MapError::BackendConstruction(other.to_string()),
        })?;
        log::debug!(
            "vector map created in #{} at {:?} zoom {}",
            container_id,
            options.center,
            options.zoom
        );

        Ok(Self {
            api,
            container_id: container_id.to_string(),
            center: options.center,
            zoom: options.zoom,
            layers: LayerManager::new(),
        })
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn viewport(&self) -> (LatLng, u8) {
        (self.center, self.zoom)
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: VectorMapApi> MapBackend for VectorMap<A> {
    fn kind(&self) -> BackendKind {
        BackendKind::Primary
    }

    fn set_viewport(&mut self, center: LatLng, zoom: u8) -> Result<()> {
        self.api.set_view(center, zoom)?;
        self.center = center;
        self.zoom = zoom;
        Ok(())
    }

    fn add_polygon(&mut self, layer: PolygonLayer) -> Result<OverlayGeometry> {
        let object = self.api.add_polygon(layer.ring(), layer.style())?;
        if let Some(popup) = layer.popup() {
            self.api.bind_info_window(object, popup)?;
        }
        let geometry = OverlayGeometry::LatLngObjects(layer.ring().to_vec());
        self.layers.add_layer(Box::new(layer))?;
        Ok(geometry)
    }

    fn add_ground_overlay(&mut self, layer: GroundImageLayer) -> Result<OverlayGeometry> {
        let bounds = layer
            .bounds()
            .ok_or_else(|| MapError::InvalidCoordinates("ground image without bounds".into()))?;
        let options = ImageOverlayOptions {
            opacity: layer.opacity(),
            interactive: layer.is_interactive(),
        };
        self.api.add_ground_overlay(layer.url(), &bounds, &options)?;
        self.layers.add_layer(Box::new(layer))?;
        Ok(OverlayGeometry::Bounds(bounds))
    }

    fn add_marker(&mut self, marker: Marker) -> Result<OverlayGeometry> {
        let options = MarkerOptions {
            title: marker.title().to_string(),
            icon: marker.icon().clone(),
        };
        let position = marker.position();
        let object = self.api.add_marker(position, &options)?;
        if let Some(popup) = marker.popup() {
            self.api.bind_info_window(object, popup)?;
        }
        self.layers.add_layer(Box::new(marker))?;
        Ok(OverlayGeometry::Point(position))
    }

    fn add_drawing_tools(&mut self, options: &DrawingToolsOptions) -> Result<bool> {
        self.api.add_drawing_manager(options)?;
        let properties = LayerProperties::new(
            "drawing-tools".to_string(),
            "Drawing Tools".to_string(),
            LayerType::DrawingTools,
        );
        let control = BaseLayer::new(properties).with_options(serde_json::to_value(options)?);
        self.layers.add_layer(Box::new(control))?;
        Ok(true)
    }

    fn layers(&self) -> &LayerManager {
        &self.layers
    }
}
