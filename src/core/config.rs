//! Configuration system for the dashboard page
//!
//! Three layers feed every component: the built-in defaults, the page-wide
//! [`WaveRadarConfig`] (usually deserialized from the JSON object the page
//! embeds), and per-call [`MapOptions`]. Later layers win. The resolved
//! [`MapConfiguration`] is immutable once built.

use crate::{
    constants::*,
    core::geo::{LatLng, LatLngBounds},
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Page-wide configuration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveRadarConfig {
    pub api_base_url: String,
    pub map_center: [f64; 2],
    pub zoom: u8,
    pub map_type: String,
    pub map_region: String,
    pub use_interactive_map: bool,
    pub use_static_image: bool,
    pub use_static_image_overlay: bool,
    /// Base URL serving the flood-analysis raster; falls back to `api_base_url`
    pub static_image_base_url: Option<String>,
    pub auto_rotate_globe: bool,
    pub globe_rotation_speed: f64,
    #[serde(rename = "use3dGlobe")]
    pub use_3d_globe: bool,
    pub stats_update_interval_ms: u64,
    pub map_update_interval_ms: u64,
    pub readiness_retry_delay_ms: u64,
    /// `None` keeps polling forever
    pub readiness_timeout_ms: Option<u64>,
}

impl Default for WaveRadarConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            map_center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
            map_type: DEFAULT_MAP_TYPE.to_string(),
            map_region: DEFAULT_MAP_REGION.to_string(),
            use_interactive_map: true,
            use_static_image: false,
            use_static_image_overlay: true,
            static_image_base_url: None,
            auto_rotate_globe: true,
            globe_rotation_speed: GLOBE_AUTO_ROTATION,
            use_3d_globe: true,
            stats_update_interval_ms: STATS_UPDATE_INTERVAL_MS,
            map_update_interval_ms: MAP_UPDATE_INTERVAL_MS,
            readiness_retry_delay_ms: READINESS_RETRY_DELAY_MS,
            readiness_timeout_ms: Some(READINESS_TIMEOUT_MS),
        }
    }
}

impl WaveRadarConfig {
    /// Parses the page configuration object. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let center = LatLng::from_pair(self.map_center);
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "map center {:?} is out of range",
                self.map_center
            )));
        }
        if self.zoom > 22 {
            return Err(MapError::InvalidState(format!(
                "zoom {} exceeds the supported maximum of 22",
                self.zoom
            )));
        }
        if self.readiness_retry_delay_ms == 0 {
            return Err(MapError::InvalidState(
                "readiness retry delay must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of the pre-rendered flood-analysis image for the configured region
    pub fn static_image_url(&self) -> String {
        let base = self
            .static_image_base_url
            .as_deref()
            .unwrap_or(&self.api_base_url);
        format!(
            "{}/api/maps/analysis_image/{}",
            base.trim_end_matches('/'),
            self.map_region
        )
    }

    pub fn readiness(&self) -> ReadinessConfig {
        ReadinessConfig {
            retry_delay_ms: self.readiness_retry_delay_ms,
            timeout_ms: self.readiness_timeout_ms,
        }
    }

    pub fn globe(&self) -> GlobeConfig {
        GlobeConfig {
            auto_rotate: self.auto_rotate_globe,
            rotation_speed: self.globe_rotation_speed,
        }
    }

    pub fn dashboard(&self) -> DashboardConfig {
        DashboardConfig {
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            stats_update_interval_ms: self.stats_update_interval_ms,
        }
    }
}

/// Polling behaviour while waiting for a third-party library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub retry_delay_ms: u64,
    pub timeout_ms: Option<u64>,
}

impl ReadinessConfig {
    /// Keeps polling until the library shows up, however long that takes
    pub fn unbounded(retry_delay_ms: u64) -> Self {
        Self {
            retry_delay_ms,
            timeout_ms: None,
        }
    }

    /// Number of retries after the first check before giving up
    pub fn max_retries(&self) -> Option<u32> {
        let delay = self.retry_delay_ms.max(1);
        self.timeout_ms
            .map(|timeout| ((timeout + delay - 1) / delay).min(u32::MAX as u64) as u32)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: READINESS_RETRY_DELAY_MS,
            timeout_ms: Some(READINESS_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeConfig {
    pub auto_rotate: bool,
    /// Radians added to the sphere's y rotation every frame
    pub rotation_speed: f64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            rotation_speed: GLOBE_AUTO_ROTATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub stats_update_interval_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        WaveRadarConfig::default().dashboard()
    }
}

/// Which backend the configuration asks for first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendPreference {
    InteractivePrimary,
    InteractiveFallback,
    StaticImage,
}

/// Caller-supplied overrides for a single map mount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOptions {
    pub center: Option<LatLng>,
    pub zoom: Option<u8>,
    pub map_type: Option<String>,
    pub use_interactive_map: Option<bool>,
    pub use_static_image: Option<bool>,
    pub use_static_image_overlay: Option<bool>,
    /// An empty string disables the static image entirely
    pub static_image_url: Option<String>,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_center(mut self, center: LatLng) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_map_type(mut self, map_type: impl Into<String>) -> Self {
        self.map_type = Some(map_type.into());
        self
    }

    pub fn with_interactive_map(mut self, enabled: bool) -> Self {
        self.use_interactive_map = Some(enabled);
        self
    }

    pub fn with_static_image(mut self, enabled: bool) -> Self {
        self.use_static_image = Some(enabled);
        self
    }

    pub fn with_static_image_overlay(mut self, enabled: bool) -> Self {
        self.use_static_image_overlay = Some(enabled);
        self
    }

    pub fn with_static_image_url(mut self, url: impl Into<String>) -> Self {
        self.static_image_url = Some(url.into());
        self
    }
}

/// Fully resolved, immutable settings for one map mount
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfiguration {
    center: LatLng,
    zoom: u8,
    map_style_id: String,
    backend_preference: BackendPreference,
    static_image_url: Option<String>,
    overlay_enabled: bool,
}

impl MapConfiguration {
    /// Merges `options` over `config`; `config` already sits over the defaults.
    pub fn resolve(config: &WaveRadarConfig, options: &MapOptions) -> Self {
        let use_static_image = options.use_static_image.unwrap_or(config.use_static_image);
        let use_interactive = options
            .use_interactive_map
            .unwrap_or(config.use_interactive_map);

        let backend_preference = if use_static_image {
            BackendPreference::StaticImage
        } else if use_interactive {
            BackendPreference::InteractivePrimary
        } else {
            BackendPreference::InteractiveFallback
        };

        let static_image_url = match &options.static_image_url {
            Some(url) if url.is_empty() => None,
            Some(url) => Some(url.clone()),
            None => Some(config.static_image_url()),
        };

        Self {
            center: options
                .center
                .unwrap_or_else(|| LatLng::from_pair(config.map_center)),
            zoom: options.zoom.unwrap_or(config.zoom),
            map_style_id: options
                .map_type
                .clone()
                .unwrap_or_else(|| config.map_type.clone()),
            backend_preference,
            static_image_url,
            overlay_enabled: options
                .use_static_image_overlay
                .unwrap_or(config.use_static_image_overlay),
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn map_style_id(&self) -> &str {
        &self.map_style_id
    }

    pub fn backend_preference(&self) -> BackendPreference {
        self.backend_preference
    }

    pub fn static_image_url(&self) -> Option<&str> {
        self.static_image_url.as_deref()
    }

    pub fn overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    /// Whether the primary interactive library may be attempted at all
    pub fn allows_primary(&self) -> bool {
        self.backend_preference == BackendPreference::InteractivePrimary
    }

    /// Fixed rectangle the ground image is clipped to
    pub fn ground_overlay_bounds(&self) -> LatLngBounds {
        let (south, west, north, east) = GROUND_OVERLAY_BOUNDS;
        LatLngBounds::from_coords(south, west, north, east)
    }
}

impl Default for MapConfiguration {
    fn default() -> Self {
        Self::resolve(&WaveRadarConfig::default(), &MapOptions::default())
    }
}
