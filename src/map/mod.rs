//! The map widget: backend selection and overlays

pub mod overlays;
pub mod provider;

pub use overlays::{OverlayHandle, OverlayKind, OverlayManager};
pub use provider::{MapLibraries, MapProvider};
