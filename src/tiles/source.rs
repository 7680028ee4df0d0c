use crate::constants::{OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_TILE_TEMPLATE};

/// Raster tile provider as described to a tile-layer map library
pub trait TileSource: Send + Sync {
    /// `{s}`/`{z}`/`{x}`/`{y}` template handed to tile-layer map libraries
    fn url_template(&self) -> &str;

    /// Attribution text the tile provider requires on screen
    fn attribution(&self) -> &str;

    fn max_zoom(&self) -> u8;
}

/// Default OpenStreetMap tile server
pub struct OpenStreetMapSource;

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpenStreetMapSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMapSource {
    fn url_template(&self) -> &str {
        OSM_TILE_TEMPLATE
    }

    fn attribution(&self) -> &str {
        OSM_ATTRIBUTION
    }

    fn max_zoom(&self) -> u8 {
        OSM_MAX_ZOOM
    }
}
