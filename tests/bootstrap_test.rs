use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use waveradar::{
    backends::headless::{HeadlessTileMap, HeadlessVectorMap, RecordedObject},
    constants::{MAP_CONTAINER_ID, MAP_LOADING_ID},
    dashboard::fetch::CannedFetcher,
    map::provider::MapLibraries,
    BackendKind, InMemoryPage, LatLng, MapOptions, OverlayGeometry, OverlayKind, PageController,
    WaveRadarConfig,
};

/// End-to-end map bootstrap through the page controller
#[cfg(test)]
mod bootstrap_tests {
    use super::*;

    fn controller(config: WaveRadarConfig, fetcher: CannedFetcher) -> PageController {
        PageController::with_fetcher(config, Arc::new(fetcher)).with_jitter_seed(42)
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_failure_falls_back_with_same_view() {
        let page = InMemoryPage::dashboard();
        let fallback = HeadlessTileMap::available();
        let probe = fallback.clone();
        let options = MapOptions::new()
            .with_center(LatLng::new(26.5, 93.1))
            .with_zoom(9);
        let mut controller = controller(WaveRadarConfig::default(), CannedFetcher::new());

        let handle = controller
            .mount_map(
                &page,
                MapLibraries::new()
                    .with_primary(HeadlessVectorMap::failing("invalid map id"))
                    .with_fallback(fallback),
                &options,
            )
            .await
            .unwrap();

        assert_eq!(handle.kind(), BackendKind::Fallback);
        assert_eq!(probe.map_view(), Some((LatLng::new(26.5, 93.1), 9)));

        let map = controller.map().unwrap();
        assert_eq!(map.overlays().count(OverlayKind::FloodPolygon), 1);
        assert_eq!(map.overlays().count(OverlayKind::Marker), 0);
        assert_eq!(probe.polygon_count(), 1);
        assert!(matches!(
            map.overlays().flood_overlay().unwrap().geometry,
            OverlayGeometry::LatLngPairs(ref pairs) if pairs.len() == 20
        ));
        assert_eq!(page.is_visible(MAP_LOADING_ID), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_static_image_mode_never_touches_libraries() {
        let page = InMemoryPage::dashboard();
        let primary = HeadlessVectorMap::available();
        let fallback = HeadlessTileMap::available();
        let (primary_probe, fallback_probe) = (primary.clone(), fallback.clone());
        let config = WaveRadarConfig {
            use_static_image: true,
            ..Default::default()
        };
        let mut controller = controller(config, CannedFetcher::new());

        let handle = controller
            .mount_map(
                &page,
                MapLibraries::new().with_primary(primary).with_fallback(fallback),
                &MapOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(handle.kind(), BackendKind::StaticImage);
        assert!(!primary_probe.is_created());
        assert!(!fallback_probe.is_created());
        assert!(controller.map().unwrap().overlays().overlays().is_empty());

        // the canned fetcher has no image, so the load fails into the text placeholder
        assert!(page
            .html(MAP_CONTAINER_ID)
            .unwrap()
            .contains("Map image not available"));
        assert_eq!(page.is_visible(MAP_LOADING_ID), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_library_loading_late_is_picked_up() {
        let page = InMemoryPage::dashboard();
        let primary = HeadlessVectorMap::unavailable();
        let probe = primary.clone();
        let mut controller = controller(WaveRadarConfig::default(), CannedFetcher::new());

        let loader = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1_200)).await;
            probe.set_available(true);
            probe
        });

        let handle = controller
            .mount_map(
                &page,
                MapLibraries::new().with_primary(primary),
                &MapOptions::default(),
            )
            .await
            .unwrap();
        let probe = loader.await.unwrap();

        assert_eq!(handle.kind(), BackendKind::Primary);
        assert!(probe.is_created());
        let objects = probe.objects();
        assert_eq!(
            objects
                .iter()
                .filter(|o| matches!(o, RecordedObject::Marker { .. }))
                .count(),
            3
        );
        assert!(objects
            .iter()
            .any(|o| matches!(o, RecordedObject::DrawingManager { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_is_not_revisited() {
        let page = InMemoryPage::dashboard();
        let mut controller = controller(WaveRadarConfig::default(), CannedFetcher::new());

        let first = controller
            .mount_map(
                &page,
                MapLibraries::new().with_fallback(HeadlessTileMap::available()),
                &MapOptions::default(),
            )
            .await
            .unwrap();
        let second = controller
            .mount_map(
                &page,
                MapLibraries::new().with_primary(HeadlessVectorMap::available()),
                &MapOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.kind(), BackendKind::Fallback);
        assert!(controller
            .map()
            .unwrap()
            .update_flood_data(&json!({"area_km2": 2847})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_container_is_a_no_op() {
        let page = InMemoryPage::new();
        let mut controller = controller(WaveRadarConfig::default(), CannedFetcher::new());

        let handle = controller
            .mount_map(
                &page,
                MapLibraries::new().with_primary(HeadlessVectorMap::available()),
                &MapOptions::default(),
            )
            .await;

        assert!(handle.is_none());
        assert!(controller.map().is_none());
    }
}
