//! Fallback backend: the tile-layer map over OpenStreetMap tiles

use super::{
    api::{ImageOverlayOptions, MarkerOptions, TileLayerOptions, TileMapApi, TileMapOptions},
    BackendKind, MapBackend, OverlayGeometry,
};
use crate::{
    core::{config::MapConfiguration, geo::LatLng},
    layers::{
        image::GroundImageLayer, manager::LayerManager, marker::Marker, tile::TileLayer,
        vector::PolygonLayer,
    },
    traits::LayerOperations,
    MapError, Result,
};

/// Tile-layer adapter. Coordinates are handed to the library as `[lat, lng]` arrays.
pub struct TileMap<A: TileMapApi> {
    api: A,
    container_id: String,
    center: LatLng,
    zoom: u8,
    layers: LayerManager,
}

impl<A: TileMapApi> TileMap<A> {
    /// Creates the map at the configured view and adds the base tile layer
    pub fn create(mut api: A, container_id: &str, config: &MapConfiguration) -> Result<Self> {
        if !api.is_available() {
            return Err(MapError::LibraryUnavailable {
                library: "tile map".to_string(),
                attempts: 1,
            });
        }

        let options = TileMapOptions {
            center: config.center().to_pair(),
            zoom: config.zoom(),
        };
        api.create_map(container_id, &options)
            .map_err(|e| MapError::BackendConstruction(e.to_string()))?;

        let base = TileLayer::openstreetmap("base-tiles".to_string(), "OpenStreetMap".to_string());
        let source = base.source();
        api.add_tile_layer(&TileLayerOptions {
            url_template: source.url_template().to_string(),
            attribution: source.attribution().to_string(),
            max_zoom: source.max_zoom(),
        })?;
        log::debug!("tile map created in #{}", container_id);

        let mut layers = LayerManager::new();
        layers.add_layer(Box::new(base))?;

        Ok(Self {
            api,
            container_id: container_id.to_string(),
            center: config.center(),
            zoom: config.zoom(),
            layers,
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

impl<A: TileMapApi> MapBackend for TileMap<A> {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn set_viewport(&mut self, center: LatLng, zoom: u8) -> Result<()> {
        self.api.set_view(center.to_pair(), zoom)?;
        self.center = center;
        self.zoom = zoom;
        Ok(())
    }

    fn add_polygon(&mut self, layer: PolygonLayer) -> Result<OverlayGeometry> {
        let pairs: Vec<[f64; 2]> = layer.ring().iter().map(LatLng::to_pair).collect();
        let object = self.api.add_polygon(&pairs, layer.style())?;
        if let Some(popup) = layer.popup() {
            self.api.bind_popup(object, popup)?;
        }
        self.layers.add_layer(Box::new(layer))?;
        Ok(OverlayGeometry::LatLngPairs(pairs))
    }

    fn add_ground_overlay(&mut self, layer: GroundImageLayer) -> Result<OverlayGeometry> {
        let bounds = layer
            .bounds()
            .ok_or_else(|| MapError::InvalidCoordinates("ground image without bounds".into()))?;
        let options = ImageOverlayOptions {
            opacity: layer.opacity(),
            interactive: layer.is_interactive(),
        };
        self.api
            .add_image_overlay(layer.url(), bounds.to_pairs(), &options)?;
        self.layers.add_layer(Box::new(layer))?;
        Ok(OverlayGeometry::Bounds(bounds))
    }

    fn add_marker(&mut self, marker: Marker) -> Result<OverlayGeometry> {
        let position = marker.position();
        let options = MarkerOptions {
            title: marker.title().to_string(),
            icon: marker.icon().clone(),
        };
        let object = self.api.add_marker(position.to_pair(), &options)?;
        if let Some(popup) = marker.popup() {
            self.api.bind_popup(object, popup)?;
        }
        self.layers.add_layer(Box::new(marker))?;
        Ok(OverlayGeometry::Point(position))
    }

    fn layers(&self) -> &LayerManager {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::api::DrawingToolsOptions;
    use crate::backends::headless::{HeadlessTileMap, RecordedObject};
    use crate::layers::{base::LayerType, vector::PolygonStyle};

    #[test]
    fn test_create_adds_attributed_base_tiles() {
        let api = HeadlessTileMap::available();
        let probe = api.clone();
        let map = TileMap::create(api, "earth-engine-map", &MapConfiguration::default()).unwrap();

        assert_eq!(map.layers().count_of(LayerType::Tile), 1);
        assert!(probe.objects().iter().any(|o| matches!(
            o,
            RecordedObject::TileLayer { attribution, max_zoom: 19, .. }
                if attribution == "© OpenStreetMap contributors"
        )));
        assert_eq!(probe.map_view(), Some((LatLng::new(26.2006, 92.9376), 8)));
    }

    #[test]
    fn test_polygon_uses_pairs() {
        let api = HeadlessTileMap::available();
        let mut map = TileMap::create(api, "map", &MapConfiguration::default()).unwrap();
        let ring = vec![LatLng::new(26.0, 92.0), LatLng::new(26.3, 92.4)];
        let geometry = map
            .add_polygon(PolygonLayer::new("flood".into(), ring, PolygonStyle::flood()))
            .unwrap();

        assert_eq!(
            geometry,
            OverlayGeometry::LatLngPairs(vec![[26.0, 92.0], [26.3, 92.4]])
        );
    }

    #[test]
    fn test_no_drawing_tools() {
        let api = HeadlessTileMap::available();
        let mut map = TileMap::create(api, "map", &MapConfiguration::default()).unwrap();
        assert!(!map.add_drawing_tools(&DrawingToolsOptions::default()).unwrap());
    }

    #[test]
    fn test_unavailable_library() {
        let result = TileMap::create(
            HeadlessTileMap::unavailable(),
            "map",
            &MapConfiguration::default(),
        );
        assert!(matches!(result, Err(MapError::LibraryUnavailable { .. })));
    }
}
