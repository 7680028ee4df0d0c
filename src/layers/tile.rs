use crate::{
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::{OpenStreetMapSource, TileSource},
};

/// Base raster layer of the tile-layer map
pub struct TileLayer {
    properties: LayerProperties,
    source: Box<dyn TileSource>,
}

impl TileLayer {
    pub fn new(id: String, name: String, source: Box<dyn TileSource>) -> Self {
        let mut properties = LayerProperties::new(id, name, LayerType::Tile);
        properties.z_index = -1;
        properties.interactive = false;
        Self { properties, source }
    }

    pub fn openstreetmap(id: String, name: String) -> Self {
        Self::new(id, name, Box::new(OpenStreetMapSource::new()))
    }

    pub fn source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);
    crate::impl_read_only_options!();

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "urlTemplate": self.source.url_template(),
            "attribution": self.source.attribution(),
            "maxZoom": self.source.max_zoom(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_layer_sits_below_overlays() {
        let layer = TileLayer::openstreetmap("osm".to_string(), "OpenStreetMap".to_string());
        assert_eq!(layer.z_index(), -1);
        assert_eq!(layer.options()["maxZoom"], 19);
        assert_eq!(layer.options()["attribution"], "© OpenStreetMap contributors");
    }
}
