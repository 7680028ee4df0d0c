//! Static raster backend: a single image in the map container

use super::{BackendKind, MapBackend, OverlayGeometry};
use crate::{
    core::geo::LatLng,
    dom::{DomHost, ImageNode},
    layers::{image::GroundImageLayer, manager::LayerManager, marker::Marker, vector::PolygonLayer},
    MapError, Result,
};

pub const STATIC_IMAGE_ALT: &str = "Flood Analysis Map";
pub const STATIC_IMAGE_STYLE: &str =
    "width: 100%; height: 100%; object-fit: contain; border-radius: 8px;";
pub const STATIC_IMAGE_UNAVAILABLE: &str = "Map image not available";

/// Pre-rendered flood-analysis image. Has no coordinate system, so overlays are rejected.
pub struct StaticImageBackend {
    container_id: String,
    url: String,
    layers: LayerManager,
}

impl StaticImageBackend {
    /// Replaces the container content with the image node
    pub fn mount(host: &dyn DomHost, container_id: &str, url: &str) -> Result<Self> {
        let node = ImageNode::new(url, STATIC_IMAGE_ALT).with_style(STATIC_IMAGE_STYLE);
        host.mount_image(container_id, &node)?;
        log::info!("static map image mounted in #{} from {}", container_id, url);
        Ok(Self {
            container_id: container_id.to_string(),
            url: url.to_string(),
            layers: LayerManager::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Markup shown in place of an image that failed to load
    pub fn unavailable_markup() -> String {
        format!(
            "<div style=\"padding: 40px; text-align: center; color: white;\">{}</div>",
            STATIC_IMAGE_UNAVAILABLE
        )
    }

    fn reject(&self, what: &str) -> MapError {
        MapError::Unsupported(format!("{} overlays need an interactive map", what))
    }
}

impl MapBackend for StaticImageBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::StaticImage
    }

    fn set_viewport(&mut self, _center: LatLng, _zoom: u8) -> Result<()> {
        Err(MapError::Unsupported(
            "a static image has a fixed viewport".to_string(),
        ))
    }

    fn add_polygon(&mut self, _layer: PolygonLayer) -> Result<OverlayGeometry> {
        Err(self.reject("polygon"))
    }

    fn add_ground_overlay(&mut self, _layer: GroundImageLayer) -> Result<OverlayGeometry> {
        Err(self.reject("ground image"))
    }

    fn add_marker(&mut self, _marker: Marker) -> Result<OverlayGeometry> {
        Err(self.reject("marker"))
    }

    fn layers(&self) -> &LayerManager {
        &self.layers
    }
}
