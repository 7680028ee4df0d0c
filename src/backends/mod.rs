//! Renderable map backends behind one capability interface
//!
//! The primary vector map and the tile-layer fallback are interchangeable
//! adapters over their library APIs ([`api`]). The static image backend only
//! displays a raster and rejects overlays.

pub mod api;
pub mod headless;
pub mod static_image;
pub mod tile;
pub mod vector;

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{image::GroundImageLayer, manager::LayerManager, marker::Marker, vector::PolygonLayer},
    Result,
};
use api::DrawingToolsOptions;
use serde::{Deserialize, Serialize};

pub use static_image::StaticImageBackend;
pub use tile::TileMap;
pub use vector::VectorMap;

/// Which rendering path a provider ended up on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    Primary,
    Fallback,
    StaticImage,
    /// Nothing could render; the container shows a text notice
    Placeholder,
}

impl BackendKind {
    pub fn is_interactive(&self) -> bool {
        matches!(self, BackendKind::Primary | BackendKind::Fallback)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Primary => write!(f, "primary vector map"),
            BackendKind::Fallback => write!(f, "tile-layer fallback map"),
            BackendKind::StaticImage => write!(f, "static image"),
            BackendKind::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Geometry in the representation the owning backend was given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OverlayGeometry {
    /// `{lat, lng}` objects, as the primary backend takes them
    LatLngObjects(Vec<LatLng>),
    /// `[lat, lng]` arrays, as the tile-layer fallback takes them
    LatLngPairs(Vec<[f64; 2]>),
    Bounds(LatLngBounds),
    Point(LatLng),
}

impl OverlayGeometry {
    /// Number of coordinates the geometry carries
    pub fn vertex_count(&self) -> usize {
        match self {
            OverlayGeometry::LatLngObjects(points) => points.len(),
            OverlayGeometry::LatLngPairs(points) => points.len(),
            OverlayGeometry::Bounds(_) => 2,
            OverlayGeometry::Point(_) => 1,
        }
    }

    /// Coordinates normalized to `LatLng`, whatever the representation
    pub fn coordinates(&self) -> Vec<LatLng> {
        match self {
            OverlayGeometry::LatLngObjects(points) => points.clone(),
            OverlayGeometry::LatLngPairs(points) => {
                points.iter().map(|p| LatLng::from_pair(*p)).collect()
            }
            OverlayGeometry::Bounds(bounds) => vec![bounds.south_west, bounds.north_east],
            OverlayGeometry::Point(point) => vec![*point],
        }
    }
}

/// What every live map backend can do
pub trait MapBackend {
    fn kind(&self) -> BackendKind;

    fn set_viewport(&mut self, center: LatLng, zoom: u8) -> Result<()>;

    fn add_polygon(&mut self, layer: PolygonLayer) -> Result<OverlayGeometry>;

    fn add_ground_overlay(&mut self, layer: GroundImageLayer) -> Result<OverlayGeometry>;

    fn add_marker(&mut self, marker: Marker) -> Result<OverlayGeometry>;

    /// Installs the shape drawing control. Returns false where unsupported.
    fn add_drawing_tools(&mut self, _options: &DrawingToolsOptions) -> Result<bool> {
        Ok(false)
    }

    /// Layers registered on this backend, in render order
    fn layers(&self) -> &LayerManager;
}

/// The backend a provider selected, as seen by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapBackendHandle {
    Primary { container_id: String },
    Fallback { container_id: String },
    StaticImage { container_id: String, url: String },
    Placeholder { container_id: String },
}

impl MapBackendHandle {
    pub fn kind(&self) -> BackendKind {
        match self {
            MapBackendHandle::Primary { .. } => BackendKind::Primary,
            MapBackendHandle::Fallback { .. } => BackendKind::Fallback,
            MapBackendHandle::StaticImage { .. } => BackendKind::StaticImage,
            MapBackendHandle::Placeholder { .. } => BackendKind::Placeholder,
        }
    }

    pub fn container_id(&self) -> &str {
        match self {
            MapBackendHandle::Primary { container_id }
            | MapBackendHandle::Fallback { container_id }
            | MapBackendHandle::StaticImage { container_id, .. }
            | MapBackendHandle::Placeholder { container_id } => container_id,
        }
    }
}
