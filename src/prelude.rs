//! Prelude module for common waveradar types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use waveradar::prelude::*;`

pub use crate::core::{
    config::{
        BackendPreference, DashboardConfig, GlobeConfig, MapConfiguration, MapOptions,
        ReadinessConfig, WaveRadarConfig,
    },
    geo::{LatLng, LatLngBounds, Point},
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    manager::LayerManager,
    marker::{Severity, SeverityMarker},
    vector::{Color, PolygonStyle},
};

pub use crate::backends::{
    api::{TileMapApi, VectorMapApi},
    BackendKind, MapBackend, MapBackendHandle, OverlayGeometry,
};

pub use crate::map::{
    overlays::{JitterSource, OverlayHandle, OverlayKind, OverlayManager},
    provider::{MapLibraries, MapProvider},
};

pub use crate::globe::{
    renderer::SceneRenderer, GlobeHandle, GlobeRenderer, GlobeSceneState, GlobeState,
};

pub use crate::dashboard::{fetch::Fetcher, DashboardDataBinder};
pub use crate::dom::{page::InMemoryPage, DomHost};
pub use crate::input::events::{ContainerRect, PointerEvent};
pub use crate::page::PageController;
pub use crate::readiness::{ReadinessPoller, ReadinessState};

pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

pub use futures::Future;
