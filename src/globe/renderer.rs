//! Render surface abstraction for the globe
//!
//! The scene graph library is a collaborator owned by the host page. The
//! globe only needs to size a surface, draw a [`GlobeScene`] into it and
//! release it again.

use super::scene::GlobeScene;
use crate::Result;
use nalgebra::Vector3;
use std::sync::{Arc, Mutex};

pub trait SceneRenderer: Send {
    /// Element id of the drawing surface attached to the container
    fn surface_id(&self) -> &str;

    fn set_size(&mut self, width: f64, height: f64);

    fn render(&mut self, scene: &GlobeScene) -> Result<()>;

    /// Releases GPU and surface resources. Called once on destroy.
    fn dispose(&mut self);
}

impl<T: SceneRenderer + ?Sized> SceneRenderer for Box<T> {
    fn surface_id(&self) -> &str {
        (**self).surface_id()
    }

    fn set_size(&mut self, width: f64, height: f64) {
        (**self).set_size(width, height)
    }

    fn render(&mut self, scene: &GlobeScene) -> Result<()> {
        (**self).render(scene)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

/// What a [`HeadlessSceneRenderer`] has seen so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub frames: u64,
    pub size: (f64, f64),
    pub disposed: bool,
    pub globe_rotation: Option<Vector3<f64>>,
    pub scene_rotation: Option<Vector3<f64>>,
    pub camera_aspect: Option<f64>,
}

/// Renderer that draws nothing and records every call.
///
/// Clones share their stats, so a test can keep one clone and hand the
/// other to the globe.
#[derive(Debug, Clone)]
pub struct HeadlessSceneRenderer {
    surface_id: String,
    stats: Arc<Mutex<RenderStats>>,
}

impl HeadlessSceneRenderer {
    pub fn new(surface_id: impl Into<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            stats: Arc::new(Mutex::new(RenderStats::default())),
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn frames(&self) -> u64 {
        self.stats().frames
    }
}

impl Default for HeadlessSceneRenderer {
    fn default() -> Self {
        Self::new("globe-canvas")
    }
}

impl SceneRenderer for HeadlessSceneRenderer {
    fn surface_id(&self) -> &str {
        &self.surface_id
    }

    fn set_size(&mut self, width: f64, height: f64) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.size = (width, height);
        }
    }

    fn render(&mut self, scene: &GlobeScene) -> Result<()> {
        let mut stats = self
            .stats
            .lock()
            .map_err(|_| crate::MapError::InvalidState("render stats lock poisoned".to_string()))?;
        if stats.disposed {
            return Err(crate::MapError::InvalidState(
                "render called on a disposed surface".to_string(),
            ));
        }
        stats.frames += 1;
        stats.globe_rotation = Some(scene.globe.rotation);
        stats.scene_rotation = Some(scene.rotation);
        stats.camera_aspect = Some(scene.camera.aspect);
        Ok(())
    }

    fn dispose(&mut self) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.disposed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_clones_share_stats() {
        let renderer = HeadlessSceneRenderer::default();
        let mut boxed: Box<dyn SceneRenderer> = Box::new(renderer.clone());
        let scene = GlobeScene::compose_with_rng(1.0, &mut StdRng::seed_from_u64(3));

        boxed.set_size(640.0, 480.0);
        boxed.render(&scene).unwrap();
        boxed.render(&scene).unwrap();
        boxed.dispose();

        let stats = renderer.stats();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.size, (640.0, 480.0));
        assert!(stats.disposed);
        assert!(boxed.render(&scene).is_err());
    }
}
