//! Flood, marker and ground-image overlays on the active backend

use crate::{
    backends::{BackendKind, MapBackend, OverlayGeometry},
    constants::{FLOOD_RING_JITTER, FLOOD_RING_RADIUS_DEG, FLOOD_RING_VERTICES, GROUND_OVERLAY_OPACITY},
    core::geo::{LatLng, LatLngBounds},
    layers::{
        image::GroundImageLayer,
        marker::{Marker, SeverityMarker},
        vector::{PolygonLayer, PolygonStyle},
    },
    Result,
};
use chrono::{DateTime, Local};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Source of the per-axis radius jitter of the flood ring
pub trait JitterSource: Send {
    /// A factor in `[min, max)`
    fn next_factor(&mut self, min: f64, max: f64) -> f64;
}

impl<R: Rng + Send> JitterSource for R {
    fn next_factor(&mut self, min: f64, max: f64) -> f64 {
        self.gen_range(min..max)
    }
}

/// Entropy-seeded jitter, different on every run
pub fn default_jitter() -> Box<dyn JitterSource> {
    Box::new(StdRng::from_entropy())
}

/// Deterministic jitter for reproducible rings
pub fn seeded_jitter(seed: u64) -> Box<dyn JitterSource> {
    Box::new(StdRng::seed_from_u64(seed))
}

/// Simulated flood boundary: a circle of `FLOOD_RING_VERTICES` points around
/// `center` whose radius is jittered independently on each axis per point.
pub fn flood_ring(center: LatLng, jitter: &mut dyn JitterSource) -> Vec<LatLng> {
    let (min, max) = FLOOD_RING_JITTER;
    (0..FLOOD_RING_VERTICES)
        .map(|i| {
            let angle = (i as f64 / FLOOD_RING_VERTICES as f64) * PI * 2.0;
            let lat = center.lat + FLOOD_RING_RADIUS_DEG * angle.cos() * jitter.next_factor(min, max);
            let lng = center.lng + FLOOD_RING_RADIUS_DEG * angle.sin() * jitter.next_factor(min, max);
            LatLng::new(lat, lng)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    FloodPolygon,
    Marker,
    GroundImage,
}

/// An overlay attached to exactly one backend
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayHandle {
    pub id: String,
    pub kind: OverlayKind,
    pub backend: BackendKind,
    pub geometry: OverlayGeometry,
}

/// Registers overlays on a backend and remembers what it registered
pub struct OverlayManager {
    jitter: Box<dyn JitterSource>,
    overlays: Vec<OverlayHandle>,
    next_id: u64,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::with_jitter(default_jitter())
    }

    pub fn with_jitter(jitter: Box<dyn JitterSource>) -> Self {
        Self {
            jitter,
            overlays: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn register(
        &mut self,
        id: String,
        kind: OverlayKind,
        backend: BackendKind,
        geometry: OverlayGeometry,
    ) -> OverlayHandle {
        let handle = OverlayHandle {
            id,
            kind,
            backend,
            geometry,
        };
        self.overlays.push(handle.clone());
        handle
    }

    /// Adds a freshly jittered flood ring around `center`
    pub fn add_flood_overlay(
        &mut self,
        backend: &mut dyn MapBackend,
        center: LatLng,
    ) -> Result<OverlayHandle> {
        let ring = flood_ring(center, self.jitter.as_mut());
        let id = self.next_id("flood");
        let layer = PolygonLayer::new(id.clone(), ring, PolygonStyle::flood())
            .with_popup(flood_popup(backend.kind(), Local::now()));

        let geometry = backend.add_polygon(layer)?;
        log::info!("flood overlay added to the {}", backend.kind());
        Ok(self.register(id, OverlayKind::FloodPolygon, backend.kind(), geometry))
    }

    /// Pins a non-interactive raster to `bounds` at the standard overlay opacity
    pub fn add_ground_overlay(
        &mut self,
        backend: &mut dyn MapBackend,
        image_url: &str,
        bounds: LatLngBounds,
    ) -> Result<OverlayHandle> {
        let id = self.next_id("ground");
        let layer = GroundImageLayer::new(
            id.clone(),
            image_url.to_string(),
            bounds,
            GROUND_OVERLAY_OPACITY,
        );
        let geometry = backend.add_ground_overlay(layer)?;
        log::info!("static image overlay added to the {}", backend.kind());
        Ok(self.register(id, OverlayKind::GroundImage, backend.kind(), geometry))
    }

    pub fn add_marker(
        &mut self,
        backend: &mut dyn MapBackend,
        marker: &SeverityMarker,
    ) -> Result<OverlayHandle> {
        let id = self.next_id("marker");
        let geometry = backend.add_marker(Marker::from_severity(id.clone(), marker))?;
        Ok(self.register(id, OverlayKind::Marker, backend.kind(), geometry))
    }

    /// The three example flood-zone markers
    pub fn add_severity_markers(
        &mut self,
        backend: &mut dyn MapBackend,
    ) -> Result<Vec<OverlayHandle>> {
        SeverityMarker::examples()
            .iter()
            .map(|marker| self.add_marker(backend, marker))
            .collect()
    }

    pub fn overlays(&self) -> &[OverlayHandle] {
        &self.overlays
    }

    pub fn count(&self, kind: OverlayKind) -> usize {
        self.overlays.iter().filter(|o| o.kind == kind).count()
    }

    /// Most recently added flood overlay
    pub fn flood_overlay(&self) -> Option<&OverlayHandle> {
        self.overlays
            .iter()
            .rev()
            .find(|o| o.kind == OverlayKind::FloodPolygon)
    }
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Popup of the flood ring. The vector map's info window also carries the
/// local date as `M/D/YYYY`.
fn flood_popup(backend: BackendKind, now: DateTime<Local>) -> String {
    match backend {
        BackendKind::Primary => format!(
            "<div style=\"padding: 10px;\"><h3 style=\"margin: 0 0 10px 0;\">Flood Affected Area</h3>\
             <p><strong>Area:</strong> 2,847 sq km</p><p><strong>Status:</strong> Active</p>\
             <p><strong>Last Updated:</strong> {}</p></div>",
            now.format("%-m/%-d/%Y")
        ),
        _ => "<div><h3>Flood Affected Area</h3><p><strong>Area:</strong> 2,847 sq km</p>\
              <p><strong>Status:</strong> Active</p></div>"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{
        headless::{HeadlessTileMap, HeadlessVectorMap, RecordedObject},
        StaticImageBackend, TileMap, VectorMap,
    };
    use crate::core::config::MapConfiguration;
    use crate::dom::page::InMemoryPage;
    use chrono::TimeZone;

    const CENTER: LatLng = LatLng {
        lat: 26.2006,
        lng: 92.9376,
    };

    #[test]
    fn test_ring_has_twenty_points_within_jitter_bounds() {
        let mut jitter = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let ring = flood_ring(CENTER, &mut jitter);
            assert_eq!(ring.len(), 20);

            for (i, point) in ring.iter().enumerate() {
                let angle = (i as f64 / 20.0) * PI * 2.0;
                let (cos, sin) = (angle.cos(), angle.sin());
                if cos.abs() > 1e-9 {
                    let factor = (point.lat - CENTER.lat) / (0.3 * cos);
                    assert!((0.8 - 1e-9..=1.2 + 1e-9).contains(&factor), "lat factor {}", factor);
                }
                if sin.abs() > 1e-9 {
                    let factor = (point.lng - CENTER.lng) / (0.3 * sin);
                    assert!((0.8 - 1e-9..=1.2 + 1e-9).contains(&factor), "lng factor {}", factor);
                }
                assert!((point.lat - CENTER.lat).abs() <= 0.36 + 1e-9);
                assert!((point.lng - CENTER.lng).abs() <= 0.36 + 1e-9);
            }
        }
    }

    #[test]
    fn test_seeded_rings_repeat_and_successive_rings_differ() {
        let first = flood_ring(CENTER, seeded_jitter(42).as_mut());
        let again = flood_ring(CENTER, seeded_jitter(42).as_mut());
        assert_eq!(first, again);

        let mut jitter = seeded_jitter(42);
        let a = flood_ring(CENTER, jitter.as_mut());
        let b = flood_ring(CENTER, jitter.as_mut());
        assert_ne!(a, b);
    }

    #[test]
    fn test_flood_overlay_geometry_follows_backend() {
        let config = MapConfiguration::default();
        let mut manager = OverlayManager::with_jitter(seeded_jitter(1));

        let mut primary = VectorMap::create(HeadlessVectorMap::available(), "m", &config).unwrap();
        let on_primary = manager.add_flood_overlay(&mut primary, CENTER).unwrap();
        assert!(matches!(on_primary.geometry, OverlayGeometry::LatLngObjects(ref p) if p.len() == 20));
        assert_eq!(on_primary.backend, BackendKind::Primary);

        let mut fallback = TileMap::create(HeadlessTileMap::available(), "m", &config).unwrap();
        let on_fallback = manager.add_flood_overlay(&mut fallback, CENTER).unwrap();
        assert!(matches!(on_fallback.geometry, OverlayGeometry::LatLngPairs(ref p) if p.len() == 20));
        assert_ne!(on_primary.id, on_fallback.id);
        assert_eq!(manager.count(OverlayKind::FloodPolygon), 2);
    }

    #[test]
    fn test_ground_overlay_is_fixed_opacity_and_non_interactive() {
        let api = HeadlessTileMap::available();
        let probe = api.clone();
        let mut backend = TileMap::create(api, "m", &MapConfiguration::default()).unwrap();
        let bounds = LatLngBounds::from_coords(24.0, 89.0, 28.0, 96.0);

        let handle = OverlayManager::new()
            .add_ground_overlay(&mut backend, "http://x/assam.png", bounds.clone())
            .unwrap();

        assert_eq!(handle.geometry, OverlayGeometry::Bounds(bounds));
        assert!(probe.objects().iter().any(|o| matches!(
            o,
            RecordedObject::GroundOverlay { opacity, interactive: false, .. } if (*opacity - 0.6).abs() < 1e-6
        )));
    }

    #[test]
    fn test_severity_markers() {
        let api = HeadlessVectorMap::available();
        let probe = api.clone();
        let mut backend = VectorMap::create(api, "m", &MapConfiguration::default()).unwrap();
        let mut manager = OverlayManager::new();

        let markers = manager.add_severity_markers(&mut backend).unwrap();
        assert_eq!(markers.len(), 3);
        assert_eq!(manager.count(OverlayKind::Marker), 3);
        assert_eq!(probe.popups().len(), 3);
        assert!(probe.popups()[0].1.contains("Severity:</strong> high"));
    }

    #[test]
    fn test_static_image_backend_registers_nothing() {
        let page = InMemoryPage::with_elements(&["m"]);
        let mut backend = StaticImageBackend::mount(&page, "m", "a.png").unwrap();
        let mut manager = OverlayManager::new();

        assert!(manager.add_flood_overlay(&mut backend, CENTER).is_err());
        assert!(manager.overlays().is_empty());
        assert!(manager.flood_overlay().is_none());
    }

    #[test]
    fn test_popup_date() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert!(flood_popup(BackendKind::Primary, time).contains("Last Updated:</strong> 3/1/2024"));
        assert!(!flood_popup(BackendKind::Fallback, time).contains("Last Updated"));
    }

    #[test]
    fn test_popup_date_is_local_calendar_day() {
        // Just after local midnight the UTC date may still be the previous day
        let time = Local.with_ymd_and_hms(2024, 3, 2, 0, 30, 0).unwrap();
        assert!(flood_popup(BackendKind::Primary, time).contains("Last Updated:</strong> 3/2/2024"));
    }
}
