use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        vector::Color,
    },
};
use serde::{Deserialize, Serialize};

/// Severity of a monitored flood zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn color(&self) -> Color {
        match self {
            Severity::High => Color::from_u32(0xef4444),
            Severity::Medium => Color::from_u32(0xf59e0b),
            Severity::Low => Color::from_u32(0x10b981),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
        }
    }
}

/// Circle symbol drawn for a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub scale: f32,
    pub fill_color: Color,
    pub fill_opacity: f32,
    pub stroke_color: Color,
    pub stroke_weight: f32,
}

impl MarkerIcon {
    /// Unknown severities get the brand blue
    pub fn for_severity(severity: Option<Severity>) -> Self {
        Self {
            scale: 10.0,
            fill_color: severity.map(|s| s.color()).unwrap_or(Color::FLOOD_BLUE),
            fill_opacity: 0.8,
            stroke_color: Color::WHITE,
            stroke_weight: 2.0,
        }
    }
}

/// A flood-monitoring point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityMarker {
    pub position: LatLng,
    pub title: String,
    pub severity: Severity,
}

impl SeverityMarker {
    pub fn new(lat: f64, lng: f64, title: &str, severity: Severity) -> Self {
        Self {
            position: LatLng::new(lat, lng),
            title: title.to_string(),
            severity,
        }
    }

    pub fn icon(&self) -> MarkerIcon {
        MarkerIcon::for_severity(Some(self.severity))
    }

    pub fn popup_html(&self) -> String {
        format!(
            "<div style=\"padding: 10px;\"><h3 style=\"margin: 0 0 10px 0;\">{}</h3>\
             <p><strong>Severity:</strong> {}</p><p><strong>Status:</strong> Monitoring</p></div>",
            self.title, self.severity
        )
    }

    /// The three example zones shown around the default center
    pub fn examples() -> Vec<SeverityMarker> {
        vec![
            SeverityMarker::new(26.2006, 92.9376, "Flood Zone 1", Severity::High),
            SeverityMarker::new(26.1500, 93.0000, "Flood Zone 2", Severity::Medium),
            SeverityMarker::new(26.2500, 92.9000, "Flood Zone 3", Severity::Low),
        ]
    }
}

pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    title: String,
    icon: MarkerIcon,
    popup_text: Option<String>,
}

impl Marker {
    pub fn new(id: String, position: LatLng, title: impl Into<String>) -> Self {
        let properties = LayerProperties::new(id, "Marker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            title: title.into(),
            icon: MarkerIcon::for_severity(None),
            popup_text: None,
        }
    }

    pub fn from_severity(id: String, marker: &SeverityMarker) -> Self {
        Self::new(id, marker.position, marker.title.clone())
            .with_icon(marker.icon())
            .with_popup(marker.popup_html())
    }

    pub fn with_icon(mut self, icon: MarkerIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_popup(mut self, text: String) -> Self {
        self.popup_text = Some(text);
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &MarkerIcon {
        &self.icon
    }

    pub fn popup(&self) -> Option<&str> {
        self.popup_text.as_deref()
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);
    crate::impl_read_only_options!();

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "title": self.title,
            "fillColor": self.icon.fill_color.to_hex(),
            "popup": self.popup_text
        })
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::High.color().to_hex(), "#ef4444");
        assert_eq!(Severity::Medium.color().to_hex(), "#f59e0b");
        assert_eq!(Severity::Low.color().to_hex(), "#10b981");
        assert_eq!(MarkerIcon::for_severity(None).fill_color.to_hex(), "#3b82f6");
    }

    #[test]
    fn test_example_markers() {
        let markers = SeverityMarker::examples();
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].severity, Severity::High);
        assert!(markers[2].popup_html().contains("Flood Zone 3"));
        assert!(markers[2].popup_html().contains("low"));
    }

    #[test]
    fn test_marker_layer_from_severity() {
        let zone = SeverityMarker::new(26.15, 93.0, "Flood Zone 2", Severity::Medium);
        let marker = Marker::from_severity("marker-1".to_string(), &zone);

        assert_eq!(marker.position(), LatLng::new(26.15, 93.0));
        assert_eq!(marker.title(), "Flood Zone 2");
        assert_eq!(marker.icon().scale, 10.0);
        assert_eq!(marker.options()["fillColor"], "#f59e0b");
        assert!(marker.covers(&LatLng::new(26.15, 93.0)));
    }
}
