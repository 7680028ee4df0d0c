//! Page-level ownership of the visual components
//!
//! A [`PageController`] holds at most one map provider, one globe and one
//! dashboard binder. [`PageController::mount`] builds whatever is missing and
//! is a no-op while the page is mounted; [`PageController::unmount`] releases
//! everything so a later mount starts fresh.

use crate::{
    constants::{GLOBE_CONTAINER_ID, MAP_CONTAINER_ID},
    core::config::{BackendPreference, MapConfiguration, MapOptions, WaveRadarConfig},
    dashboard::{
        fetch::{Fetcher, HttpFetcher},
        DashboardDataBinder,
    },
    dom::DomHost,
    globe::{renderer::SceneRenderer, GlobeHandle, GlobeRenderer, GlobeState},
    map::{
        overlays::{seeded_jitter, OverlayManager},
        provider::{MapLibraries, MapProvider},
    },
    readiness::ReadinessPoller,
    runtime::AsyncHandle,
    MapBackendHandle,
};
use std::sync::Arc;

pub struct PageController {
    config: WaveRadarConfig,
    fetcher: Arc<dyn Fetcher>,
    jitter_seed: Option<u64>,
    mounted: bool,
    map: Option<MapProvider>,
    globe: Option<GlobeRenderer>,
    dashboard: Option<Arc<DashboardDataBinder>>,
    stats_refresh: Option<Box<dyn AsyncHandle>>,
}

impl PageController {
    pub fn new(config: WaveRadarConfig) -> Self {
        Self::with_fetcher(config, Arc::new(HttpFetcher))
    }

    pub fn with_fetcher(config: WaveRadarConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            jitter_seed: None,
            mounted: false,
            map: None,
            globe: None,
            dashboard: None,
            stats_refresh: None,
        }
    }

    /// Makes flood ring jitter reproducible
    pub fn with_jitter_seed(mut self, seed: u64) -> Self {
        self.jitter_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &WaveRadarConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn map(&self) -> Option<&MapProvider> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut MapProvider> {
        self.map.as_mut()
    }

    pub fn globe(&self) -> Option<&GlobeRenderer> {
        self.globe.as_ref()
    }

    pub fn dashboard(&self) -> Option<&Arc<DashboardDataBinder>> {
        self.dashboard.as_ref()
    }

    /// Mounts the map, the globe (when a renderer is supplied and the globe
    /// is enabled) and the dashboard widgets. Does nothing while mounted.
    pub async fn mount(
        &mut self,
        host: &dyn DomHost,
        libraries: MapLibraries,
        renderer: Option<Box<dyn SceneRenderer>>,
    ) {
        if self.mounted {
            log::debug!("page already mounted");
            return;
        }
        self.mounted = true;
        log::info!("mounting WaveRadar page");

        self.mount_map(host, libraries, &MapOptions::default()).await;

        match renderer {
            Some(renderer) => {
                self.mount_globe(host, renderer);
            }
            None => log::info!("no scene renderer available, globe skipped"),
        }

        self.load_dashboard(host).await;
    }

    /// Waits for a map library, then lets the provider select a backend.
    /// Returns the existing handle when a map is already mounted.
    pub async fn mount_map(
        &mut self,
        host: &dyn DomHost,
        libraries: MapLibraries,
        options: &MapOptions,
    ) -> Option<MapBackendHandle> {
        if let Some(map) = &self.map {
            return map.handle().cloned();
        }
        if !host.has_element(MAP_CONTAINER_ID) {
            log::info!("map container not found on this page");
            return None;
        }

        let resolved = MapConfiguration::resolve(&self.config, options);
        if resolved.backend_preference() != BackendPreference::StaticImage {
            let poller = ReadinessPoller::new("map libraries", self.config.readiness());
            if let Err(e) = poller.ensure_ready(|| libraries.any_available(), || {}).await {
                log::warn!("{}, continuing with non-interactive backends", e);
            }
        }

        let overlays = match self.jitter_seed {
            Some(seed) => OverlayManager::with_jitter(seeded_jitter(seed)),
            None => OverlayManager::new(),
        };
        let mut provider = MapProvider::with_overlays(self.config.clone(), overlays);
        let handle = provider.initialize(host, libraries, MAP_CONTAINER_ID, options);

        if let Some(MapBackendHandle::StaticImage { .. }) = &handle {
            provider.verify_static_image(host, self.fetcher.as_ref()).await;
        }

        self.map = Some(provider);
        handle
    }

    /// Creates and starts the globe. Returns the event handle of the running
    /// globe, or `None` when the globe is disabled or cannot mount.
    pub fn mount_globe(&mut self, host: &dyn DomHost, renderer: Box<dyn SceneRenderer>) -> Option<GlobeHandle> {
        if let Some(globe) = &self.globe {
            return globe.handle();
        }
        if !self.config.use_3d_globe {
            log::info!("3D globe disabled");
            return None;
        }
        if !host.has_element(GLOBE_CONTAINER_ID) {
            log::info!("globe container not found on this page");
            return None;
        }

        let mut globe = GlobeRenderer::new(GLOBE_CONTAINER_ID, self.config.globe());
        if let Err(e) = globe.initialize(host, renderer) {
            log::error!("globe initialization failed: {}", e);
            return None;
        }
        if let Err(e) = globe.start() {
            log::error!("globe animation failed to start: {}", e);
        }
        let handle = globe.handle();
        self.globe = Some(globe);
        handle
    }

    /// Loads stats, insights and the chart once
    pub async fn load_dashboard(&mut self, host: &dyn DomHost) {
        let binder = self.binder();
        binder.load_all(host).await;
    }

    /// Starts periodic statistics refresh. Does nothing if already running.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_stats_refresh<H>(&mut self, host: Arc<H>)
    where
        H: DomHost + Send + Sync + 'static,
    {
        if self.stats_refresh.as_ref().map_or(false, |h| !h.is_finished()) {
            return;
        }
        let binder = self.binder();
        self.stats_refresh = Some(binder.start_stats_refresh(host));
    }

    fn binder(&mut self) -> Arc<DashboardDataBinder> {
        if let Some(binder) = &self.dashboard {
            return binder.clone();
        }
        let binder = Arc::new(DashboardDataBinder::new(
            self.config.dashboard(),
            self.fetcher.clone(),
        ));
        self.dashboard = Some(binder.clone());
        binder
    }

    /// Destroys the globe, stops refreshes and drops the map
    pub fn unmount(&mut self, host: &dyn DomHost) {
        if let Some(handle) = self.stats_refresh.take() {
            handle.cancel();
        }
        if let Some(mut globe) = self.globe.take() {
            if globe.state() == GlobeState::Running {
                if let Err(e) = globe.destroy(host) {
                    log::warn!("globe teardown failed: {}", e);
                }
            }
        }
        self.map = None;
        self.dashboard = None;
        self.mounted = false;
        log::info!("WaveRadar page unmounted");
    }
}

impl Drop for PageController {
    fn drop(&mut self) {
        if let Some(handle) = self.stats_refresh.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::headless::{HeadlessTileMap, HeadlessVectorMap};
    use crate::backends::BackendKind;
    use crate::dashboard::fetch::CannedFetcher;
    use crate::dom::page::InMemoryPage;
    use crate::globe::renderer::HeadlessSceneRenderer;

    fn controller(config: WaveRadarConfig) -> PageController {
        PageController::with_fetcher(config, Arc::new(CannedFetcher::new())).with_jitter_seed(11)
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_is_idempotent() {
        let page = InMemoryPage::dashboard();
        let primary = HeadlessVectorMap::available();
        let probe = primary.clone();
        let renderer = HeadlessSceneRenderer::default();
        let mut controller = controller(WaveRadarConfig::default());

        controller
            .mount(
                &page,
                MapLibraries::new().with_primary(primary),
                Some(Box::new(renderer.clone())),
            )
            .await;
        controller
            .mount(
                &page,
                MapLibraries::new().with_primary(HeadlessVectorMap::available()),
                Some(Box::new(HeadlessSceneRenderer::default())),
            )
            .await;

        assert!(controller.is_mounted());
        assert_eq!(probe.polygon_count(), 1);
        assert_eq!(
            controller.map().and_then(|m| m.backend_kind()),
            Some(BackendKind::Primary)
        );
        assert_eq!(page.surfaces(GLOBE_CONTAINER_ID).len(), 1);
        controller.unmount(&page);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_releases_everything() {
        let page = InMemoryPage::dashboard();
        let renderer = HeadlessSceneRenderer::default();
        let mut controller = controller(WaveRadarConfig::default());
        controller
            .mount(
                &page,
                MapLibraries::new().with_fallback(HeadlessTileMap::available()),
                Some(Box::new(renderer.clone())),
            )
            .await;

        controller.unmount(&page);

        assert!(!controller.is_mounted());
        assert!(controller.map().is_none());
        assert!(controller.globe().is_none());
        assert!(page.surfaces(GLOBE_CONTAINER_ID).is_empty());
        assert!(renderer.stats().disposed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_globe_disabled_by_config() {
        let page = InMemoryPage::dashboard();
        let config = WaveRadarConfig {
            use_3d_globe: false,
            ..Default::default()
        };
        let mut controller = controller(config);

        let handle = controller.mount_globe(&page, Box::new(HeadlessSceneRenderer::default()));
        assert!(handle.is_none());
        assert!(page.surfaces(GLOBE_CONTAINER_ID).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_libraries_time_out_to_placeholder() {
        let page = InMemoryPage::dashboard();
        let config = WaveRadarConfig {
            readiness_timeout_ms: Some(1_000),
            ..Default::default()
        };
        let mut controller = controller(config);
        let options = MapOptions::new().with_static_image_url("");

        let handle = controller
            .mount_map(&page, MapLibraries::new(), &options)
            .await
            .unwrap();

        assert_eq!(handle.kind(), BackendKind::Placeholder);
        assert!(page
            .html(MAP_CONTAINER_ID)
            .unwrap()
            .contains("Map Loading..."));
    }
}
