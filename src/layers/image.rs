use crate::{
    core::geo::LatLngBounds,
    layers::base::{LayerProperties, LayerTrait, LayerType},
};

/// A raster image pinned to a geographic rectangle
pub struct GroundImageLayer {
    properties: LayerProperties,
    url: String,
    bounds: LatLngBounds,
}

impl GroundImageLayer {
    pub fn new(id: String, url: String, bounds: LatLngBounds, opacity: f32) -> Self {
        let mut properties =
            LayerProperties::new(id, "Ground Image".to_string(), LayerType::GroundImage);
        properties.opacity = opacity.clamp(0.0, 1.0);
        properties.interactive = false;
        Self {
            properties,
            url,
            bounds,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_interactive(&self) -> bool {
        self.properties.interactive
    }
}

impl LayerTrait for GroundImageLayer {
    crate::impl_layer_trait!(GroundImageLayer, properties);
    crate::impl_read_only_options!();

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(self.bounds.clone())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url": self.url,
            "opacity": self.properties.opacity,
            "interactive": self.properties.interactive,
            "bounds": {
                "south": self.bounds.south_west.lat,
                "west": self.bounds.south_west.lng,
                "north": self.bounds.north_east.lat,
                "east": self.bounds.north_east.lng
            }
        })
    }
}
