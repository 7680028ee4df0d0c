//! # WaveRadar
//!
//! Map and visual-layer bootstrap for the WaveRadar flood-monitoring dashboard.
//!
//! The crate waits for third-party mapping libraries, selects exactly one map
//! backend through a fixed fallback chain (interactive primary, interactive
//! tile-layer fallback, static image, text placeholder), layers flood and
//! marker overlays on top of it, drives a decorative rotating globe and binds
//! dashboard statistics fetched over HTTP into named page slots.

pub mod animation;
pub mod backends;
pub mod core;
pub mod dashboard;
pub mod dom;
pub mod globe;
pub mod input;
pub mod layers;
pub mod map;
pub mod page;
pub mod prelude;
pub mod readiness;
pub mod runtime;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{BackendPreference, MapConfiguration, MapOptions, WaveRadarConfig},
    geo::{LatLng, LatLngBounds, Point},
};

pub use backends::{BackendKind, MapBackend, MapBackendHandle, OverlayGeometry};

pub use map::{
    overlays::{OverlayHandle, OverlayKind, OverlayManager},
    provider::MapProvider,
};

pub use dashboard::DashboardDataBinder;
pub use dom::{page::InMemoryPage, DomHost};
pub use globe::{GlobeRenderer, GlobeState};
pub use page::PageController;
pub use readiness::{ReadinessPoller, ReadinessState};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Container not found: {0}")]
    MissingContainer(String),

    #[error("Library unavailable: {library} (gave up after {attempts} attempts)")]
    LibraryUnavailable { library: String, attempts: u32 },

    #[error("Backend construction failed: {0}")]
    BackendConstruction(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Asset load failed: {0}")]
    AssetLoad(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

impl From<reqwest::Error> for MapError {
    fn from(error: reqwest::Error) -> Self {
        MapError::Network(error.to_string())
    }
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs the `env_logger` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
