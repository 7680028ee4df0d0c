use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// RGBA color that round-trips through CSS hex notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `0xRRGGBB` literal, the form scene-graph libraries take
    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 {
            return Err(MapError::Unsupported(format!("not a #rrggbb color: {}", hex)));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| MapError::Unsupported(format!("not a #rrggbb color: {}", hex)))?;
        Ok(Self::from_u32(value))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Brand blue used for water and flood shapes
    pub const FLOOD_BLUE: Color = Color::from_u32(0x3b82f6);
}

/// Style for polygon features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    pub stroke_color: Color,
    pub stroke_opacity: f32,
    pub stroke_weight: f32,
    pub fill_color: Color,
    pub fill_opacity: f32,
    pub editable: bool,
    pub draggable: bool,
}

impl PolygonStyle {
    /// Semi-transparent blue used for the simulated flood boundary
    pub fn flood() -> Self {
        Self {
            stroke_color: Color::FLOOD_BLUE,
            stroke_opacity: 0.8,
            stroke_weight: 2.0,
            fill_color: Color::FLOOD_BLUE,
            fill_opacity: 0.35,
            editable: false,
            draggable: false,
        }
    }
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self::flood()
    }
}

/// A closed ring of coordinates with its style and an optional popup
pub struct PolygonLayer {
    properties: LayerProperties,
    ring: Vec<LatLng>,
    style: PolygonStyle,
    popup: Option<String>,
}

impl PolygonLayer {
    pub fn new(id: String, ring: Vec<LatLng>, style: PolygonStyle) -> Self {
        let mut properties = LayerProperties::new(id, "Polygon".to_string(), LayerType::Polygon);
        properties.interactive = !style.editable && !style.draggable;
        Self {
            properties,
            ring,
            style,
            popup: None,
        }
    }

    pub fn with_popup(mut self, html: impl Into<String>) -> Self {
        self.popup = Some(html.into());
        self
    }

    pub fn ring(&self) -> &[LatLng] {
        &self.ring
    }

    pub fn style(&self) -> &PolygonStyle {
        &self.style
    }

    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }
}

impl LayerTrait for PolygonLayer {
    crate::impl_layer_trait!(PolygonLayer, properties);
    crate::impl_read_only_options!();

    fn bounds(&self) -> Option<LatLngBounds> {
        let first = self.ring.first()?;
        let mut bounds = LatLngBounds::new(*first, *first);
        for point in &self.ring[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(point.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(point.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(point.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(point.lng);
        }
        Some(bounds)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "vertices": self.ring.len(),
            "strokeColor": self.style.stroke_color.to_hex(),
            "strokeOpacity": self.style.stroke_opacity,
            "strokeWeight": self.style.stroke_weight,
            "fillColor": self.style.fill_color.to_hex(),
            "fillOpacity": self.style.fill_opacity,
            "popup": self.popup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::from_hex("#3b82f6").unwrap();
        assert_eq!(color, Color::FLOOD_BLUE);
        assert_eq!(color.to_hex(), "#3b82f6");
        assert_eq!(color.to_u32(), 0x3b82f6);
        assert!(Color::from_hex("#3b82").is_err());
        assert!(Color::from_hex("zzzzzz").is_err());
    }

    #[test]
    fn test_polygon_bounds_cover_ring() {
        let ring = vec![
            LatLng::new(26.0, 92.0),
            LatLng::new(26.5, 93.0),
            LatLng::new(25.8, 92.6),
        ];
        let layer = PolygonLayer::new("flood".to_string(), ring, PolygonStyle::flood());
        let bounds = layer.bounds().unwrap();

        assert_eq!(bounds.south_west, LatLng::new(25.8, 92.0));
        assert_eq!(bounds.north_east, LatLng::new(26.5, 93.0));
        assert!(layer.covers(&LatLng::new(26.2, 92.5)));
        assert_eq!(layer.options()["fillOpacity"], 0.35f32 as f64);
    }

    #[test]
    fn test_polygon_options_are_read_only() {
        let mut layer = PolygonLayer::new("flood".to_string(), Vec::new(), PolygonStyle::flood());
        assert!(layer.bounds().is_none());
        assert!(layer.set_options(serde_json::json!({})).is_err());
    }
}
