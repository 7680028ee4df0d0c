//! Construction surfaces of the two interactive map libraries
//!
//! [`VectorMapApi`] mirrors an object-oriented vector map library (maps,
//! polygons, ground overlays, markers, info windows, a drawing manager) that
//! takes `{lat, lng}` objects. [`TileMapApi`] mirrors a tile-layer library that
//! takes `[lat, lng]` arrays. Neither trait requires `Send` so browser bindings
//! holding JS handles can implement them.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{marker::MarkerIcon, vector::PolygonStyle},
    Result,
};
use serde::{Deserialize, Serialize};

/// Library-assigned handle of a constructed map object
pub type MapObjectId = u64;

/// One entry of the vector map's custom style list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyleRule {
    pub feature_type: String,
    pub element_type: String,
    pub color: String,
    pub visibility: Option<String>,
}

impl MapStyleRule {
    fn geometry(feature_type: &str, color: &str) -> Self {
        Self {
            feature_type: feature_type.to_string(),
            element_type: "geometry".to_string(),
            color: color.to_string(),
            visibility: None,
        }
    }

    /// Dark water, landscape and road colors of the dashboard theme
    pub fn dashboard_theme() -> Vec<MapStyleRule> {
        vec![
            MapStyleRule {
                visibility: Some("on".to_string()),
                ..Self::geometry("water", "#1e3a8a")
            },
            Self::geometry("landscape", "#065f46"),
            Self::geometry("road", "#374151"),
        ]
    }
}

/// UI chrome toggles of the vector map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapControls {
    pub zoom_control: bool,
    pub map_type_control: bool,
    pub scale_control: bool,
    pub street_view_control: bool,
    pub rotate_control: bool,
    pub fullscreen_control: bool,
}

impl Default for MapControls {
    fn default() -> Self {
        Self {
            zoom_control: true,
            map_type_control: true,
            scale_control: true,
            street_view_control: false,
            rotate_control: true,
            fullscreen_control: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorMapOptions {
    pub center: LatLng,
    pub zoom: u8,
    pub map_type_id: String,
    pub tilt: f64,
    pub heading: f64,
    pub styles: Vec<MapStyleRule>,
    pub controls: MapControls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMapOptions {
    pub center: [f64; 2],
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerOptions {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

/// Options shared by the vector map's ground overlay and the tile map's image overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageOverlayOptions {
    pub opacity: f32,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerOptions {
    pub title: String,
    pub icon: MarkerIcon,
}

/// Shape kinds offered by the drawing control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    Marker,
    Circle,
    Polygon,
    Polyline,
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlPosition {
    TopCenter,
    TopLeft,
    TopRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingToolsOptions {
    pub modes: Vec<DrawingMode>,
    pub position: ControlPosition,
    pub circle_style: PolygonStyle,
    pub circle_z_index: i32,
}

impl Default for DrawingToolsOptions {
    fn default() -> Self {
        Self {
            modes: vec![
                DrawingMode::Marker,
                DrawingMode::Circle,
                DrawingMode::Polygon,
                DrawingMode::Polyline,
                DrawingMode::Rectangle,
            ],
            position: ControlPosition::TopCenter,
            circle_style: PolygonStyle {
                editable: true,
                ..PolygonStyle::flood()
            },
            circle_z_index: 1,
        }
    }
}

/// Object-oriented vector map library
pub trait VectorMapApi {
    /// Whether the library's global entry point is loaded
    fn is_available(&self) -> bool;

    /// Builds the map inside the container and applies tilt and heading
    fn create_map(&mut self, container_id: &str, options: &VectorMapOptions) -> Result<()>;

    fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<()>;

    fn add_polygon(&mut self, paths: &[LatLng], style: &PolygonStyle) -> Result<MapObjectId>;

    fn add_ground_overlay(
        &mut self,
        url: &str,
        bounds: &LatLngBounds,
        options: &ImageOverlayOptions,
    ) -> Result<MapObjectId>;

    fn add_marker(&mut self, position: LatLng, options: &MarkerOptions) -> Result<MapObjectId>;

    /// Opens `html` in an info window when the object is clicked
    fn bind_info_window(&mut self, object: MapObjectId, html: &str) -> Result<()>;

    fn add_drawing_manager(&mut self, options: &DrawingToolsOptions) -> Result<MapObjectId>;
}

/// Tile-layer map library
pub trait TileMapApi {
    /// Whether the library's global entry point is loaded
    fn is_available(&self) -> bool;

    fn create_map(&mut self, container_id: &str, options: &TileMapOptions) -> Result<()>;

    fn set_view(&mut self, center: [f64; 2], zoom: u8) -> Result<()>;

    fn add_tile_layer(&mut self, options: &TileLayerOptions) -> Result<MapObjectId>;

    fn add_polygon(&mut self, latlngs: &[[f64; 2]], style: &PolygonStyle) -> Result<MapObjectId>;

    fn add_image_overlay(
        &mut self,
        url: &str,
        bounds: [[f64; 2]; 2],
        options: &ImageOverlayOptions,
    ) -> Result<MapObjectId>;

    fn add_marker(&mut self, latlng: [f64; 2], options: &MarkerOptions) -> Result<MapObjectId>;

    fn bind_popup(&mut self, object: MapObjectId, html: &str) -> Result<()>;
}

impl<T: VectorMapApi + ?Sized> VectorMapApi for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn create_map(&mut self, container_id: &str, options: &VectorMapOptions) -> Result<()> {
        (**self).create_map(container_id, options)
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) -> Result<()> {
        (**self).set_view(center, zoom)
    }

    fn add_polygon(&mut self, paths: &[LatLng], style: &PolygonStyle) -> Result<MapObjectId> {
        (**self).add_polygon(paths, style)
    }

    fn add_ground_overlay(
        &mut self,
        url: &str,
        bounds: &LatLngBounds,
        options: &ImageOverlayOptions,
    ) -> Result<MapObjectId> {
        (**self).add_ground_overlay(url, bounds, options)
    }

    fn add_marker(&mut self, position: LatLng, options: &MarkerOptions) -> Result<MapObjectId> {
        (**self).add_marker(position, options)
    }

    fn bind_info_window(&mut self, object: MapObjectId, html: &str) -> Result<()> {
        (**self).bind_info_window(object, html)
    }

    fn add_drawing_manager(&mut self, options: &DrawingToolsOptions) -> Result<MapObjectId> {
        (**self).add_drawing_manager(options)
    }
}

impl<T: TileMapApi + ?Sized> TileMapApi for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn create_map(&mut self, container_id: &str, options: &TileMapOptions) -> Result<()> {
        (**self).create_map(container_id, options)
    }

    fn set_view(&mut self, center: [f64; 2], zoom: u8) -> Result<()> {
        (**self).set_view(center, zoom)
    }

    fn add_tile_layer(&mut self, options: &TileLayerOptions) -> Result<MapObjectId> {
        (**self).add_tile_layer(options)
    }

    fn add_polygon(&mut self, latlngs: &[[f64; 2]], style: &PolygonStyle) -> Result<MapObjectId> {
        (**self).add_polygon(latlngs, style)
    }

    fn add_image_overlay(
        &mut self,
        url: &str,
        bounds: [[f64; 2]; 2],
        options: &ImageOverlayOptions,
    ) -> Result<MapObjectId> {
        (**self).add_image_overlay(url, bounds, options)
    }

    fn add_marker(&mut self, latlng: [f64; 2], options: &MarkerOptions) -> Result<MapObjectId> {
        (**self).add_marker(latlng, options)
    }

    fn bind_popup(&mut self, object: MapObjectId, html: &str) -> Result<()> {
        (**self).bind_popup(object, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_controls_hide_street_view() {
        let controls = MapControls::default();
        assert!(controls.zoom_control && controls.fullscreen_control);
        assert!(!controls.street_view_control);
    }

    #[test]
    fn test_drawing_tools_defaults() {
        let options = DrawingToolsOptions::default();
        assert_eq!(options.modes.len(), 5);
        assert_eq!(options.position, ControlPosition::TopCenter);
        assert!(options.circle_style.editable);
        assert_eq!(options.circle_z_index, 1);
        assert_eq!(serde_json::to_value(options.position).unwrap(), "TOP_CENTER");
    }

    #[test]
    fn test_theme_styles_geometry() {
        let styles = MapStyleRule::dashboard_theme();
        assert_eq!(styles.len(), 3);
        assert_eq!(styles[0].visibility.as_deref(), Some("on"));
        assert!(styles.iter().all(|s| s.element_type == "geometry"));
    }
}
