//! Product-wide constants for the flood dashboard page.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// DOM anchor the map backend is mounted into.
pub const MAP_CONTAINER_ID: &str = "earth-engine-map";

/// DOM anchor the globe render surface is appended to.
pub const GLOBE_CONTAINER_ID: &str = "globe3d-container";

/// Loading overlay shown on top of the map until a backend settles.
pub const MAP_LOADING_ID: &str = "map-loading";

/// Default map center (Assam, India).
pub const DEFAULT_MAP_CENTER: [f64; 2] = [26.2006, 92.9376];

pub const DEFAULT_MAP_ZOOM: u8 = 8;

pub const DEFAULT_MAP_TYPE: &str = "satellite";

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

pub const DEFAULT_MAP_REGION: &str = "assam";

/// Geographic rectangle the flood-analysis raster is clipped to,
/// as `(south, west, north, east)`.
pub const GROUND_OVERLAY_BOUNDS: (f64, f64, f64, f64) = (24.0, 89.0, 28.0, 96.0);

pub const GROUND_OVERLAY_OPACITY: f32 = 0.6;

/// Number of vertices in the simulated flood boundary ring.
pub const FLOOD_RING_VERTICES: usize = 20;

/// Nominal flood ring radius in degrees.
pub const FLOOD_RING_RADIUS_DEG: f64 = 0.3;

/// Per-axis jitter factor range `[min, max)` applied to the ring radius.
pub const FLOOD_RING_JITTER: (f64, f64) = (0.8, 1.2);

/// Camera tilt and heading of the primary interactive map, in degrees.
pub const PRIMARY_MAP_TILT: f64 = 45.0;
pub const PRIMARY_MAP_HEADING: f64 = 0.0;

/// OpenStreetMap tile template used by the tile-layer fallback.
pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
pub const OSM_MAX_ZOOM: u8 = 19;

/// Fraction of the remaining rotation distance covered each frame.
pub const GLOBE_DAMPING: f64 = 0.05;

/// Auto-rotation of the primary sphere per frame, in radians.
pub const GLOBE_AUTO_ROTATION: f64 = 0.002;

/// Slow drift of the whole scene per frame, in radians.
pub const GLOBE_SCENE_DRIFT: f64 = 0.0005;

/// Scale from normalized pointer offset to target rotation (radians).
pub const GLOBE_POINTER_SCALE: f64 = 0.5;

/// Readiness polling interval.
pub const READINESS_RETRY_DELAY_MS: u64 = 500;

/// Bounded readiness window before a library is reported unavailable.
pub const READINESS_TIMEOUT_MS: u64 = 10_000;

/// Dashboard refresh cadence.
pub const STATS_UPDATE_INTERVAL_MS: u64 = 30_000;
pub const MAP_UPDATE_INTERVAL_MS: u64 = 60_000;

/// Frame interval of the globe animation loop (~60 fps).
pub const FRAME_INTERVAL_MS: u64 = 16;
