//! Backend selection and the fallback chain
//!
//! A provider picks exactly one backend per mount, in a fixed order:
//! static image when asked for, else the primary vector map, else the
//! tile-layer fallback, else the static image if a URL is configured, else a
//! text placeholder. Selection happens once and is never revisited.

use crate::{
    backends::{
        api::{DrawingToolsOptions, TileMapApi, VectorMapApi},
        static_image::StaticImageBackend,
        BackendKind, MapBackend, MapBackendHandle, TileMap, VectorMap,
    },
    constants::MAP_LOADING_ID,
    core::config::{BackendPreference, MapConfiguration, MapOptions, WaveRadarConfig},
    dashboard::fetch::Fetcher,
    dom::DomHost,
    map::overlays::{OverlayKind, OverlayManager},
    MapError,
};

pub const PLACEHOLDER_MARKUP: &str = "<div style=\"padding: 40px; text-align: center; color: white;\">\
<h3>Map Loading...</h3>\
<p>Please ensure the interactive map library is loaded or add a static image</p></div>";

/// The map libraries the page has, if any
#[derive(Default)]
pub struct MapLibraries {
    primary: Option<Box<dyn VectorMapApi>>,
    fallback: Option<Box<dyn TileMapApi>>,
}

impl MapLibraries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, api: impl VectorMapApi + 'static) -> Self {
        self.primary = Some(Box::new(api));
        self
    }

    pub fn with_fallback(mut self, api: impl TileMapApi + 'static) -> Self {
        self.fallback = Some(Box::new(api));
        self
    }

    pub fn primary_available(&self) -> bool {
        self.primary.as_ref().map_or(false, |api| api.is_available())
    }

    pub fn fallback_available(&self) -> bool {
        self.fallback.as_ref().map_or(false, |api| api.is_available())
    }

    /// Readiness predicate: at least one interactive library has loaded
    pub fn any_available(&self) -> bool {
        self.primary_available() || self.fallback_available()
    }
}

/// Owns the selected backend and the overlays registered on it
pub struct MapProvider {
    page_config: WaveRadarConfig,
    overlays: OverlayManager,
    configuration: Option<MapConfiguration>,
    backend: Option<Box<dyn MapBackend>>,
    handle: Option<MapBackendHandle>,
}

impl MapProvider {
    pub fn new(page_config: WaveRadarConfig) -> Self {
        Self::with_overlays(page_config, OverlayManager::new())
    }

    /// Uses `overlays` for registration, e.g. one with seeded jitter
    pub fn with_overlays(page_config: WaveRadarConfig, overlays: OverlayManager) -> Self {
        Self {
            page_config,
            overlays,
            configuration: None,
            backend: None,
            handle: None,
        }
    }

    /// Selects and builds a backend in `container_id`.
    ///
    /// Returns `None` when the container is missing. Construction failures
    /// are logged and demoted to the next tier; nothing is propagated. A
    /// second call returns the existing handle without re-selecting.
    pub fn initialize(
        &mut self,
        host: &dyn DomHost,
        libraries: MapLibraries,
        container_id: &str,
        options: &MapOptions,
    ) -> Option<MapBackendHandle> {
        if let Some(handle) = &self.handle {
            log::debug!("map already initialized with the {}", handle.kind());
            return Some(handle.clone());
        }
        if !host.has_element(container_id) {
            log::warn!("{}", MapError::MissingContainer(container_id.to_string()));
            return None;
        }

        let config = MapConfiguration::resolve(&self.page_config, options);
        let handle = if config.backend_preference() == BackendPreference::StaticImage {
            log::info!("static image mode requested");
            self.mount_static_image(host, container_id, &config)
        } else {
            let MapLibraries { primary, fallback } = libraries;
            match self.try_primary(primary, container_id, &config) {
                Some(handle) => handle,
                None => self.mount_fallback(host, fallback, container_id, &config),
            }
        };

        if handle.kind().is_interactive() {
            self.hide_loading(host);
        }
        log::info!("map initialized with the {}", handle.kind());
        self.configuration = Some(config);
        self.handle = Some(handle.clone());
        Some(handle)
    }

    fn try_primary(
        &mut self,
        primary: Option<Box<dyn VectorMapApi>>,
        container_id: &str,
        config: &MapConfiguration,
    ) -> Option<MapBackendHandle> {
        if !config.allows_primary() {
            log::info!("primary map disabled by configuration, using the fallback chain");
            return None;
        }
        let api = match primary {
            Some(api) if api.is_available() => api,
            _ => {
                log::info!("primary map library not loaded, using the fallback chain");
                return None;
            }
        };

        let map = match VectorMap::create(api, container_id, config) {
            Ok(map) => map,
            Err(e) => {
                log::error!("error initializing primary map: {}", e);
                return None;
            }
        };

        let mut backend: Box<dyn MapBackend> = Box::new(map);
        self.register_overlays(backend.as_mut(), config);
        if let Err(e) = self
            .overlays
            .add_severity_markers(backend.as_mut())
        {
            log::warn!("could not add severity markers: {}", e);
        }
        if let Err(e) = backend.add_drawing_tools(&DrawingToolsOptions::default()) {
            log::warn!("could not add drawing tools: {}", e);
        }

        self.backend = Some(backend);
        Some(MapBackendHandle::Primary {
            container_id: container_id.to_string(),
        })
    }

    fn mount_fallback(
        &mut self,
        host: &dyn DomHost,
        fallback: Option<Box<dyn TileMapApi>>,
        container_id: &str,
        config: &MapConfiguration,
    ) -> MapBackendHandle {
        if let Some(api) = fallback.filter(|api| api.is_available()) {
            match TileMap::create(api, container_id, config) {
                Ok(map) => {
                    let mut backend: Box<dyn MapBackend> = Box::new(map);
                    self.register_overlays(backend.as_mut(), config);
                    self.backend = Some(backend);
                    return MapBackendHandle::Fallback {
                        container_id: container_id.to_string(),
                    };
                }
                Err(e) => log::error!("error initializing fallback map: {}", e),
            }
        } else {
            log::info!("fallback map library not loaded");
        }

        if config.static_image_url().is_some() {
            return self.mount_static_image(host, container_id, config);
        }
        self.mount_placeholder(host, container_id)
    }

    fn mount_static_image(
        &mut self,
        host: &dyn DomHost,
        container_id: &str,
        config: &MapConfiguration,
    ) -> MapBackendHandle {
        let url = match config.static_image_url() {
            Some(url) => url,
            None => {
                log::warn!("static image mode requested without an image URL");
                return self.mount_placeholder(host, container_id);
            }
        };
        match StaticImageBackend::mount(host, container_id, url) {
            Ok(backend) => {
                self.backend = Some(Box::new(backend));
                MapBackendHandle::StaticImage {
                    container_id: container_id.to_string(),
                    url: url.to_string(),
                }
            }
            Err(e) => {
                log::error!("could not mount static image: {}", e);
                self.mount_placeholder(host, container_id)
            }
        }
    }

    fn mount_placeholder(&mut self, host: &dyn DomHost, container_id: &str) -> MapBackendHandle {
        if let Err(e) = host.set_html(container_id, PLACEHOLDER_MARKUP) {
            log::warn!("could not render map placeholder: {}", e);
        }
        self.hide_loading(host);
        MapBackendHandle::Placeholder {
            container_id: container_id.to_string(),
        }
    }

    /// Flood ring, then the ground image when enabled
    fn register_overlays(&mut self, backend: &mut dyn MapBackend, config: &MapConfiguration) {
        if let Err(e) = self.overlays.add_flood_overlay(backend, config.center()) {
            log::warn!("could not add flood overlay: {}", e);
        }
        if !config.overlay_enabled() {
            return;
        }
        if let Some(url) = config.static_image_url() {
            if let Err(e) =
                self.overlays
                    .add_ground_overlay(backend, url, config.ground_overlay_bounds())
            {
                log::warn!("could not add static image overlay: {}", e);
            }
        }
    }

    fn hide_loading(&self, host: &dyn DomHost) {
        if host.has_element(MAP_LOADING_ID) {
            let _ = host.set_visible(MAP_LOADING_ID, false);
        }
    }

    /// Load outcome of the static image. A failed load swaps in a text
    /// notice; the loading overlay goes away either way.
    pub fn image_settled(&mut self, host: &dyn DomHost, loaded: bool) {
        let container_id = match &self.handle {
            Some(MapBackendHandle::StaticImage { container_id, .. }) => container_id.clone(),
            _ => return,
        };
        if loaded {
            log::info!("static map image loaded");
        } else {
            log::error!("failed to load static map image");
            if let Err(e) = host.set_html(&container_id, &StaticImageBackend::unavailable_markup())
            {
                log::warn!("could not render image placeholder: {}", e);
            }
        }
        self.hide_loading(host);
    }

    /// Downloads and decodes the static image, then settles it. Returns
    /// whether the image loaded; `false` without a static image backend.
    pub async fn verify_static_image(&mut self, host: &dyn DomHost, fetcher: &dyn Fetcher) -> bool {
        let url = match &self.handle {
            Some(MapBackendHandle::StaticImage { url, .. }) => url.clone(),
            _ => return false,
        };
        let loaded = match fetcher.get_bytes(&url).await {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(img) => {
                    log::debug!("static image is {}x{}", img.width(), img.height());
                    true
                }
                Err(e) => {
                    log::warn!("{}", MapError::AssetLoad(format!("{}: {}", url, e)));
                    false
                }
            },
            Err(e) => {
                log::warn!("{}", MapError::AssetLoad(format!("{}: {}", url, e)));
                false
            }
        };
        self.image_settled(host, loaded);
        loaded
    }

    /// Accepts a flood data update for the live flood overlay. Returns
    /// whether an interactive flood overlay was there to receive it.
    pub fn update_flood_data(&self, payload: &serde_json::Value) -> bool {
        let interactive = self.backend_kind().map_or(false, |k| k.is_interactive());
        if interactive && self.overlays.count(OverlayKind::FloodPolygon) > 0 {
            log::info!("updating flood data: {}", payload);
            true
        } else {
            log::debug!("no flood overlay to update");
            false
        }
    }

    pub fn handle(&self) -> Option<&MapBackendHandle> {
        self.handle.as_ref()
    }

    pub fn backend_kind(&self) -> Option<BackendKind> {
        self.handle.as_ref().map(MapBackendHandle::kind)
    }

    pub fn backend(&self) -> Option<&dyn MapBackend> {
        self.backend.as_deref()
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    /// Resolved configuration of the mount, once initialized
    pub fn configuration(&self) -> Option<&MapConfiguration> {
        self.configuration.as_ref()
    }
}
