use serde_json::json;
use std::sync::Arc;
use waveradar::{
    dashboard::{
        fetch::CannedFetcher, slots, AI_INSIGHTS_PATH, FEATURE_IMPORTANCE_PATH, KEY_STATS_PATH,
    },
    globe::renderer::HeadlessSceneRenderer,
    map::provider::MapLibraries,
    InMemoryPage, PageController, WaveRadarConfig,
};

/// Dashboard widgets bound through a full page mount
#[cfg(test)]
mod dashboard_tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:8000";

    fn stats_body() -> serde_json::Value {
        json!({
            "floodedArea": {"value": 2847, "change": "+12%", "trend": "up"},
            "populationImpacted": {"value": 89432, "change": "+8.7%", "trend": "increasing"},
            "affectedVillages": {"value": 156, "change": "+5.1%", "trend": "stable"},
            "rainfall": {"value": 342.5, "change": "+23.4%", "trend": "increasing"}
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_binds_grouped_stats() {
        let page = InMemoryPage::dashboard();
        let fetcher = CannedFetcher::new()
            .with_json(format!("{}{}", BASE, KEY_STATS_PATH), stats_body());
        let mut controller = PageController::with_fetcher(WaveRadarConfig::default(), Arc::new(fetcher));

        controller.mount(&page, MapLibraries::new(), None).await;

        assert_eq!(page.text("floodedareavalue").as_deref(), Some("2,847"));
        assert_eq!(page.text("floodedareachange").as_deref(), Some("+12%"));
        assert_eq!(page.text("floodedareatrend").as_deref(), Some("up"));
        assert_eq!(page.text("populationimpactedvalue").as_deref(), Some("89,432"));
        assert_eq!(page.text("affectedvillagesvalue").as_deref(), Some("156"));
        assert_eq!(page.text("rainfallvalue").as_deref(), Some("342.5"));
        controller.unmount(&page);
    }

    #[tokio::test(start_paused = true)]
    async fn test_widgets_fail_independently() {
        let page = InMemoryPage::dashboard();
        let fetcher = CannedFetcher::new()
            .with_status(format!("{}{}", BASE, KEY_STATS_PATH), 503)
            .with_json(
                format!("{}{}", BASE, AI_INSIGHTS_PATH),
                json!({"insights": [{
                    "title": "Population Displacement Risk",
                    "description": "Evacuation may be required for 12,000 residents.",
                    "confidence": 87,
                    "priority": "high",
                    "category": "humanitarian"
                }]}),
            )
            .with_status(format!("{}{}", BASE, FEATURE_IMPORTANCE_PATH), 404);
        let mut controller = PageController::with_fetcher(WaveRadarConfig::default(), Arc::new(fetcher));

        controller.mount(&page, MapLibraries::new(), None).await;

        assert_eq!(
            page.html(slots::STATS_ERROR).as_deref(),
            Some(r#"<div class="error">Unable to load statistics</div>"#)
        );
        let insights = page.html(slots::AI_INSIGHTS_LIST).unwrap();
        assert!(insights.contains("mediumconfidence"));
        assert!(insights.contains("HIGH"));
        assert_eq!(page.is_visible(slots::FEATURE_IMPORTANCE_CHART), Some(false));
        assert_eq!(
            page.image(slots::FEATURE_IMPORTANCE_CHART).map(|i| i.alt).as_deref(),
            Some("Chart unavailable")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_remount_does_not_refetch() {
        let page = InMemoryPage::dashboard();
        let fetcher = Arc::new(
            CannedFetcher::new().with_json(format!("{}{}", BASE, KEY_STATS_PATH), stats_body()),
        );
        let mut controller = PageController::with_fetcher(WaveRadarConfig::default(), fetcher.clone());

        controller
            .mount(&page, MapLibraries::new(), Some(Box::new(HeadlessSceneRenderer::default())))
            .await;
        let requests = fetcher.requests().len();
        controller.mount(&page, MapLibraries::new(), None).await;

        assert_eq!(fetcher.requests().len(), requests);
        controller.unmount(&page);
    }
}
