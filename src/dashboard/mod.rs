//! Dashboard data binding
//!
//! [`DashboardDataBinder`] fetches key statistics, AI insights and the
//! feature-importance chart from the API and writes them into the page's
//! named slots. Each widget is independent: a missing slot is skipped and a
//! failed request turns into error markup in that widget only.
//!
//! Fetching and binding are separate steps so the binding half never holds
//! the page across an await.

pub mod fetch;
pub mod format;
pub mod models;
pub mod slots;

use crate::{
    core::config::DashboardConfig,
    dom::{show_error, DomHost},
    MapError, Result,
};
use fetch::{Fetcher, HttpFetcher};
use models::{InsightsReport, KeyStats, StatCategory};
use std::sync::Arc;

pub const KEY_STATS_PATH: &str = "/api/dashboard/keystats";
pub const AI_INSIGHTS_PATH: &str = "/api/reports/aiinsights";
pub const FEATURE_IMPORTANCE_PATH: &str = "/api/analytics/featureimportance";

pub const CHART_ALT: &str = "Feature Importance Analysis";
pub const CHART_UNAVAILABLE_ALT: &str = "Chart unavailable";

/// Writes `text` into `id`, logging instead of failing when it is missing
fn update_element(host: &dyn DomHost, id: &str, text: &str) {
    if let Err(e) = host.set_text(id, text) {
        log::warn!("element not found: {} ({})", id, e);
    }
}

pub struct DashboardDataBinder {
    config: DashboardConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl DashboardDataBinder {
    pub fn new(config: DashboardConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Binder over the shared HTTP client
    pub fn http(config: DashboardConfig) -> Self {
        Self::new(config, Arc::new(HttpFetcher))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    pub async fn fetch_stats(&self) -> Result<KeyStats> {
        let body = self.fetcher.get_json(&self.endpoint(KEY_STATS_PATH)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fills the four stat cards, or the stats error slot on failure
    pub fn bind_stats(&self, host: &dyn DomHost, stats: &Result<KeyStats>) {
        match stats {
            Ok(stats) => {
                for category in StatCategory::ALL {
                    let card = stats.card(category);
                    update_element(host, &slots::value(category), &format::group_number(card.value));
                    update_element(host, &slots::change(category), &card.change);
                    update_element(host, &slots::trend(category), &card.trend);
                }
                log::info!("dashboard stats updated");
            }
            Err(e) => {
                log::error!("error loading dashboard stats: {}", e);
                if host.has_element(slots::STATS_ERROR) {
                    if let Err(e) = show_error(host, slots::STATS_ERROR, format::STATS_ERROR) {
                        log::warn!("could not show stats error: {}", e);
                    }
                }
            }
        }
    }

    pub async fn load_stats(&self, host: &dyn DomHost) -> Result<KeyStats> {
        log::debug!("fetching dashboard statistics");
        let stats = self.fetch_stats().await;
        self.bind_stats(host, &stats);
        stats
    }

    pub async fn fetch_insights(&self) -> Result<InsightsReport> {
        let body = self.fetcher.get_json(&self.endpoint(AI_INSIGHTS_PATH)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Replaces the insights list with one card per insight, or the error
    /// markup on failure. Returns the number of cards rendered.
    pub fn bind_insights(&self, host: &dyn DomHost, report: &Result<InsightsReport>) -> Result<usize> {
        match report {
            Ok(report) => {
                host.set_html(slots::AI_INSIGHTS_LIST, "")?;
                for insight in &report.insights {
                    host.append_html(slots::AI_INSIGHTS_LIST, &format::insight_card(insight))?;
                }
                log::info!("rendered {} AI insights", report.insights.len());
                Ok(report.insights.len())
            }
            Err(e) => {
                log::error!("error loading AI insights: {}", e);
                show_error(host, slots::AI_INSIGHTS_LIST, format::INSIGHTS_ERROR)?;
                Ok(0)
            }
        }
    }

    /// Loads the insights list. A page without the list is skipped with `Ok(0)`.
    pub async fn load_insights(&self, host: &dyn DomHost) -> Result<usize> {
        if !host.has_element(slots::AI_INSIGHTS_LIST) {
            log::info!("AI insights container not found on this page");
            return Ok(0);
        }
        host.set_html(slots::AI_INSIGHTS_LIST, format::INSIGHTS_LOADING)?;
        let report = self.fetch_insights().await;
        self.bind_insights(host, &report)
    }

    /// Points the chart image at the analytics endpoint. Returns false when
    /// the page has no chart.
    pub fn load_chart(&self, host: &dyn DomHost) -> Result<bool> {
        if !host.has_element(slots::FEATURE_IMPORTANCE_CHART) {
            log::info!("feature importance chart not found on this page");
            return Ok(false);
        }
        host.set_image_source(
            slots::FEATURE_IMPORTANCE_CHART,
            &self.endpoint(FEATURE_IMPORTANCE_PATH),
            CHART_ALT,
        )?;
        Ok(true)
    }

    /// Load outcome of the chart image, reported by the host or by
    /// [`DashboardDataBinder::verify_chart`]
    pub fn chart_settled(&self, host: &dyn DomHost, loaded: bool) -> Result<()> {
        if loaded {
            log::info!("feature importance chart loaded");
            return Ok(());
        }
        log::error!("failed to load feature importance chart");
        host.set_image_alt(slots::FEATURE_IMPORTANCE_CHART, CHART_UNAVAILABLE_ALT)?;
        host.set_visible(slots::FEATURE_IMPORTANCE_CHART, false)
    }

    /// Downloads and decodes the chart image
    pub async fn fetch_chart(&self) -> Result<(u32, u32)> {
        let url = self.endpoint(FEATURE_IMPORTANCE_PATH);
        let bytes = self.fetcher.get_bytes(&url).await?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| MapError::AssetLoad(format!("{}: {}", url, e)))?;
        Ok((decoded.width(), decoded.height()))
    }

    /// Fetches the chart and settles it. Returns whether it loaded.
    pub async fn verify_chart(&self, host: &dyn DomHost) -> Result<bool> {
        let loaded = match self.fetch_chart().await {
            Ok((width, height)) => {
                log::debug!("chart is {}x{}", width, height);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        };
        self.chart_settled(host, loaded)?;
        Ok(loaded)
    }

    /// Loads every widget. Failures are already rendered into the page and
    /// only logged here.
    pub async fn load_all(&self, host: &dyn DomHost) {
        let _ = self.load_stats(host).await;

        if let Err(e) = self.load_insights(host).await {
            log::warn!("insights widget unavailable: {}", e);
        }

        match self.load_chart(host) {
            Ok(true) => {
                if let Err(e) = self.verify_chart(host).await {
                    log::warn!("chart widget unavailable: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => log::warn!("chart widget unavailable: {}", e),
        }
    }

    /// Re-fetches the statistics every `stats_update_interval_ms` until the
    /// returned handle is cancelled. The first refresh happens after one
    /// interval.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_stats_refresh<H>(self: &Arc<Self>, host: Arc<H>) -> Box<dyn crate::runtime::AsyncHandle>
    where
        H: DomHost + Send + Sync + 'static,
    {
        let binder = Arc::clone(self);
        let interval = std::time::Duration::from_millis(self.config.stats_update_interval_ms.max(1));
        crate::runtime::spawn(async move {
            loop {
                crate::runtime::async_delay(interval).await;
                let stats = binder.fetch_stats().await;
                binder.bind_stats(host.as_ref(), &stats);
            }
        })
    }
}
