use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use waveradar::{
    backends::headless::{HeadlessTileMap, HeadlessVectorMap},
    constants::{GLOBE_CONTAINER_ID, MAP_CONTAINER_ID},
    dashboard::{
        fetch::{CannedFetcher, Fetcher, HttpFetcher},
        models::StatCategory,
        slots, AI_INSIGHTS_PATH, FEATURE_IMPORTANCE_PATH, KEY_STATS_PATH,
    },
    globe::renderer::HeadlessSceneRenderer,
    map::provider::MapLibraries,
    InMemoryPage, PageController, WaveRadarConfig,
};

/// Mounts the dashboard page headlessly and prints what ended up in it
#[derive(Parser, Debug)]
#[command(author, version, about = "Headless WaveRadar dashboard demo")]
struct Args {
    /// Page configuration JSON (camelCase keys, all optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fetch from the configured API instead of built-in sample data
    #[arg(long)]
    live: bool,

    /// Make the primary map library fail during construction
    #[arg(long)]
    primary_fails: bool,

    /// Leave the primary map library off the page
    #[arg(long)]
    no_primary: bool,

    /// Leave the tile-layer library off the page
    #[arg(long)]
    no_fallback: bool,

    /// How long to let the globe animate
    #[arg(long, default_value_t = 500)]
    globe_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    waveradar::init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => WaveRadarConfig::from_file(path)
            .with_context(|| format!("reading configuration from {}", path.display()))?,
        None => WaveRadarConfig::default(),
    };

    let fetcher: Arc<dyn Fetcher> = if args.live {
        Arc::new(HttpFetcher)
    } else {
        Arc::new(sample_fetcher(&config)?)
    };

    let mut libraries = MapLibraries::new();
    if !args.no_primary {
        libraries = if args.primary_fails {
            libraries.with_primary(HeadlessVectorMap::failing("map id rejected"))
        } else {
            libraries.with_primary(HeadlessVectorMap::available())
        };
    }
    if !args.no_fallback {
        libraries = libraries.with_fallback(HeadlessTileMap::available());
    }

    let page = InMemoryPage::dashboard();
    let renderer = HeadlessSceneRenderer::default();
    let mut controller = PageController::with_fetcher(config, fetcher);

    controller
        .mount(&page, libraries, Some(Box::new(renderer.clone())))
        .await;
    log::info!(
        "page mounted, map backend: {}",
        controller
            .map()
            .and_then(|map| map.backend_kind())
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    tokio::time::sleep(Duration::from_millis(args.globe_ms)).await;

    report(&controller, &page, &renderer);
    controller.unmount(&page);
    Ok(())
}

fn report(controller: &PageController, page: &InMemoryPage, renderer: &HeadlessSceneRenderer) {
    match controller.map() {
        Some(map) => {
            let kind = map
                .backend_kind()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "nothing".to_string());
            println!("map:      {}", kind);
            for overlay in map.overlays().overlays() {
                println!(
                    "  overlay {} {:?} ({} points)",
                    overlay.id,
                    overlay.kind,
                    overlay.geometry.vertex_count()
                );
            }
        }
        None => println!("map:      not mounted"),
    }
    if let Some(html) = page.html(MAP_CONTAINER_ID).filter(|h| !h.is_empty()) {
        println!("  container markup: {}", html);
    }

    let stats = renderer.stats();
    println!(
        "globe:    {} frame(s), surfaces {:?}",
        stats.frames,
        page.surfaces(GLOBE_CONTAINER_ID)
    );

    for category in StatCategory::ALL {
        println!(
            "{:<19} {:>10} {:>8} {}",
            category.slot_prefix(),
            page.text(&slots::value(category)).unwrap_or_default(),
            page.text(&slots::change(category)).unwrap_or_default(),
            page.text(&slots::trend(category)).unwrap_or_default(),
        );
    }
    if let Some(error) = page.html(slots::STATS_ERROR).filter(|h| !h.is_empty()) {
        println!("stats error: {}", error);
    }

    let insights = page.html(slots::AI_INSIGHTS_LIST).unwrap_or_default();
    println!("insights: {} card(s)", insights.matches("aiinsightcard").count());

    let chart_visible = page.is_visible(slots::FEATURE_IMPORTANCE_CHART).unwrap_or(false);
    let chart_alt = page
        .image(slots::FEATURE_IMPORTANCE_CHART)
        .map(|image| image.alt)
        .unwrap_or_default();
    println!("chart:    {} (visible: {})", chart_alt, chart_visible);
}

/// Serves the same sample payloads as the development API
fn sample_fetcher(config: &WaveRadarConfig) -> Result<CannedFetcher> {
    let base = config.dashboard().api_base_url;
    let chart = image::DynamicImage::new_rgb8(4, 4);
    let mut png = Cursor::new(Vec::new());
    chart
        .write_to(&mut png, image::ImageOutputFormat::Png)
        .context("encoding sample chart")?;

    Ok(CannedFetcher::new()
        .with_json(
            format!("{}{}", base, KEY_STATS_PATH),
            json!({
                "floodedArea": {"value": 2847, "change": "+12.3%", "trend": "increasing"},
                "populationImpacted": {"value": 89432, "change": "+8.7%", "trend": "increasing"},
                "affectedVillages": {"value": 156, "change": "+5.1%", "trend": "stable"},
                "rainfall": {"value": 342.5, "change": "+23.4%", "trend": "increasing"}
            }),
        )
        .with_json(
            format!("{}{}", base, AI_INSIGHTS_PATH),
            json!({
                "insights": [
                    {
                        "title": "High-Risk Zone Expansion",
                        "description": "Flood-affected areas have expanded by 847 sq km in the past 72 hours.",
                        "confidence": 94,
                        "priority": "high",
                        "category": "prediction"
                    },
                    {
                        "title": "Rainfall Pattern Shift",
                        "description": "Precipitation is 23% above the seasonal average.",
                        "confidence": 89,
                        "priority": "medium",
                        "category": "weather"
                    }
                ],
                "modelVersion": "demo"
            }),
        )
        .with_bytes(format!("{}{}", base, FEATURE_IMPORTANCE_PATH), png.into_inner())
        .with_bytes(config.static_image_url(), Vec::new()))
}
