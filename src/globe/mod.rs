//! Decorative rotating globe
//!
//! [`GlobeRenderer`] owns a [`scene::GlobeScene`] and a
//! [`renderer::SceneRenderer`] and moves through
//! `Uninitialized → Running → Destroyed`. While running, a frame task spawned
//! on the crate runtime eases the sphere toward a pointer-driven target
//! rotation, adds a slow auto-rotation and drift, and renders.
//!
//! Pointer and resize events arrive through a [`GlobeHandle`] and are queued
//! until the next frame.

pub mod renderer;
pub mod scene;

use crate::{
    animation::Damping,
    constants::{FRAME_INTERVAL_MS, GLOBE_DAMPING, GLOBE_POINTER_SCALE, GLOBE_SCENE_DRIFT},
    core::{config::GlobeConfig, geo::Point},
    dom::DomHost,
    input::events::{pointer_channel, ContainerRect, PointerEvent, PointerEventSender},
    runtime::{self, async_delay, AsyncHandle},
    MapError, Result,
};
use crossbeam_channel::Receiver;
use nalgebra::Vector3;
use renderer::SceneRenderer;
use scene::GlobeScene;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeState {
    Uninitialized,
    Running,
    Destroyed,
}

/// Rotation bookkeeping, each value an (x, y) pair in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobeSceneState {
    pub current_rotation: Point,
    pub target_rotation: Point,
    /// Last normalized pointer offset in `[-1, 1]`
    pub pointer_offset: Point,
}

impl GlobeSceneState {
    /// Horizontal pointer movement turns the globe about y, vertical about x
    pub fn pointer_moved(&mut self, rect: &ContainerRect, position: Point) {
        let offset = rect.normalized(position);
        self.pointer_offset = offset;
        self.target_rotation = Point::new(
            offset.y * GLOBE_POINTER_SCALE,
            offset.x * GLOBE_POINTER_SCALE,
        );
    }

    pub fn pointer_left(&mut self) {
        self.target_rotation = Point::zero();
    }

    pub fn step(&mut self, damping: &Damping) {
        self.current_rotation = damping.step(&self.current_rotation, &self.target_rotation);
    }
}

/// Cloneable, thread-safe entry point for host events
#[derive(Debug, Clone)]
pub struct GlobeHandle {
    events: PointerEventSender,
}

impl GlobeHandle {
    /// `x`, `y` are client (page) pixels. Returns false once the globe is gone.
    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.events.send(PointerEvent::Move {
            position: Point::new(x, y),
        })
    }

    pub fn pointer_leave(&self) -> bool {
        self.events.send(PointerEvent::Leave)
    }

    pub fn resize(&self, width: f64, height: f64) -> bool {
        self.events.send(PointerEvent::Resize {
            size: Point::new(width, height),
        })
    }

    pub fn send(&self, event: PointerEvent) -> bool {
        self.events.send(event)
    }
}

/// State shared between the renderer and its frame task
struct GlobeCore {
    scene: GlobeScene,
    state: GlobeSceneState,
    renderer: Box<dyn SceneRenderer>,
    rect: ContainerRect,
    damping: Damping,
    config: GlobeConfig,
    events: Receiver<PointerEvent>,
}

impl GlobeCore {
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                PointerEvent::Move { position } => self.state.pointer_moved(&self.rect, position),
                PointerEvent::Leave => self.state.pointer_left(),
                PointerEvent::Resize { size } => {
                    self.rect.width = size.x;
                    self.rect.height = size.y;
                    self.scene.camera.set_aspect(size.x, size.y);
                    self.renderer.set_size(size.x, size.y);
                    log::debug!("globe resized to {}x{}", size.x, size.y);
                }
            }
        }
    }

    fn tick(&mut self) -> Result<()> {
        self.drain_events();
        self.state.step(&self.damping);

        let current = self.state.current_rotation;
        let globe = &mut self.scene.globe.rotation;
        if self.config.auto_rotate {
            globe.y += self.config.rotation_speed;
        }
        globe.x = current.x;
        globe.y += current.y;
        self.scene.rotation.y += GLOBE_SCENE_DRIFT;

        self.renderer.render(&self.scene)
    }
}

/// Runs one frame; false stops the loop
fn tick_shared(core: &Mutex<GlobeCore>) -> bool {
    let mut core = match core.lock() {
        Ok(core) => core,
        Err(_) => {
            log::error!("globe state lock poisoned, stopping frame loop");
            return false;
        }
    };
    match core.tick() {
        Ok(()) => true,
        Err(e) => {
            log::error!("globe frame failed, stopping frame loop: {}", e);
            false
        }
    }
}

pub struct GlobeRenderer {
    container_id: String,
    config: GlobeConfig,
    state: GlobeState,
    core: Option<Arc<Mutex<GlobeCore>>>,
    events: Option<PointerEventSender>,
    frame_loop: Option<Box<dyn AsyncHandle>>,
}

impl GlobeRenderer {
    pub fn new(container_id: impl Into<String>, config: GlobeConfig) -> Self {
        Self {
            container_id: container_id.into(),
            config,
            state: GlobeState::Uninitialized,
            core: None,
            events: None,
            frame_loop: None,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn state(&self) -> GlobeState {
        self.state
    }

    /// Builds the scene, attaches the renderer's surface and enters
    /// `Running`. Frames are produced by [`GlobeRenderer::tick`] or by the
    /// loop from [`GlobeRenderer::start`].
    pub fn initialize(&mut self, host: &dyn DomHost, renderer: Box<dyn SceneRenderer>) -> Result<()> {
        self.initialize_with_scene(host, renderer, None)
    }

    /// Same as [`GlobeRenderer::initialize`] with a prebuilt scene
    pub fn initialize_with_scene(
        &mut self,
        host: &dyn DomHost,
        mut renderer: Box<dyn SceneRenderer>,
        scene: Option<GlobeScene>,
    ) -> Result<()> {
        if self.state != GlobeState::Uninitialized {
            return Err(MapError::InvalidState(format!(
                "globe in {:?} cannot be initialized",
                self.state
            )));
        }
        if !host.has_element(&self.container_id) {
            return Err(MapError::MissingContainer(self.container_id.clone()));
        }

        let rect = host.container_rect(&self.container_id)?;
        let mut scene = scene.unwrap_or_else(|| GlobeScene::compose(rect.aspect()));
        scene.camera.set_aspect(rect.width, rect.height);
        renderer.set_size(rect.width, rect.height);
        host.attach_surface(&self.container_id, renderer.surface_id())?;

        let (sender, receiver) = pointer_channel();
        self.core = Some(Arc::new(Mutex::new(GlobeCore {
            scene,
            state: GlobeSceneState::default(),
            renderer,
            rect,
            damping: Damping::new(GLOBE_DAMPING),
            config: self.config,
            events: receiver,
        })));
        self.events = Some(sender);
        self.state = GlobeState::Running;
        log::info!("globe initialized in #{}", self.container_id);
        Ok(())
    }

    /// Spawns the frame loop. Calling it again while a loop runs does nothing.
    pub fn start(&mut self) -> Result<()> {
        let core = match (&self.state, &self.core) {
            (GlobeState::Running, Some(core)) => core.clone(),
            _ => {
                return Err(MapError::InvalidState(format!(
                    "globe in {:?} cannot start animating",
                    self.state
                )))
            }
        };
        if self.frame_loop.as_ref().map_or(false, |h| !h.is_finished()) {
            return Ok(());
        }

        let interval = Duration::from_millis(FRAME_INTERVAL_MS);
        self.frame_loop = Some(runtime::spawn(async move {
            while tick_shared(&core) {
                async_delay(interval).await;
            }
        }));
        Ok(())
    }

    pub fn is_animating(&self) -> bool {
        self.frame_loop.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Advances one frame by hand
    pub fn tick(&self) -> Result<()> {
        let core = self.running_core()?;
        let mut core = core
            .lock()
            .map_err(|_| MapError::InvalidState("globe state lock poisoned".to_string()))?;
        core.tick()
    }

    pub fn handle(&self) -> Option<GlobeHandle> {
        self.events.clone().map(|events| GlobeHandle { events })
    }

    pub fn scene_state(&self) -> Option<GlobeSceneState> {
        self.with_core(|core| core.state)
    }

    pub fn globe_rotation(&self) -> Option<Vector3<f64>> {
        self.with_core(|core| core.scene.globe.rotation)
    }

    pub fn scene_rotation(&self) -> Option<Vector3<f64>> {
        self.with_core(|core| core.scene.rotation)
    }

    /// Stops the frame loop, detaches and disposes the surface. Terminal.
    pub fn destroy(&mut self, host: &dyn DomHost) -> Result<()> {
        if self.state != GlobeState::Running {
            return Err(MapError::InvalidState(format!(
                "globe in {:?} cannot be destroyed",
                self.state
            )));
        }

        if let Some(handle) = self.frame_loop.take() {
            handle.cancel();
        }
        self.events = None;
        self.state = GlobeState::Destroyed;

        if let Some(core) = self.core.take() {
            let mut core = core
                .lock()
                .map_err(|_| MapError::InvalidState("globe state lock poisoned".to_string()))?;
            if let Err(e) = host.detach_surface(&self.container_id, core.renderer.surface_id()) {
                log::warn!("globe surface already gone: {}", e);
            }
            core.renderer.dispose();
        }
        log::info!("globe in #{} destroyed", self.container_id);
        Ok(())
    }

    fn running_core(&self) -> Result<&Arc<Mutex<GlobeCore>>> {
        match (&self.state, &self.core) {
            (GlobeState::Running, Some(core)) => Ok(core),
            _ => Err(MapError::InvalidState(format!(
                "globe in {:?} is not running",
                self.state
            ))),
        }
    }

    fn with_core<T>(&self, f: impl FnOnce(&GlobeCore) -> T) -> Option<T> {
        let core = self.core.as_ref()?;
        let core = core.lock().ok()?;
        Some(f(&core))
    }
}

impl Drop for GlobeRenderer {
    fn drop(&mut self) {
        if let Some(handle) = self.frame_loop.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::renderer::HeadlessSceneRenderer;
    use super::*;
    use crate::constants::GLOBE_CONTAINER_ID;
    use crate::dom::page::InMemoryPage;
    use rand::{rngs::StdRng, SeedableRng};

    fn running_globe(config: GlobeConfig) -> (InMemoryPage, GlobeRenderer, HeadlessSceneRenderer) {
        let page = InMemoryPage::new();
        page.add_element_with_rect(GLOBE_CONTAINER_ID, ContainerRect::new(0.0, 0.0, 400.0, 200.0));
        let renderer = HeadlessSceneRenderer::default();
        let mut globe = GlobeRenderer::new(GLOBE_CONTAINER_ID, config);
        let scene = GlobeScene::compose_with_rng(2.0, &mut StdRng::seed_from_u64(5));
        globe
            .initialize_with_scene(&page, Box::new(renderer.clone()), Some(scene))
            .unwrap();
        (page, globe, renderer)
    }

    #[test]
    fn test_initialize_attaches_surface() {
        let (page, globe, renderer) = running_globe(GlobeConfig::default());
        assert_eq!(globe.state(), GlobeState::Running);
        assert_eq!(page.surfaces(GLOBE_CONTAINER_ID), vec!["globe-canvas".to_string()]);
        assert_eq!(renderer.stats().size, (400.0, 200.0));
    }

    #[test]
    fn test_missing_container() {
        let page = InMemoryPage::new();
        let mut globe = GlobeRenderer::new(GLOBE_CONTAINER_ID, GlobeConfig::default());
        let result = globe.initialize(&page, Box::new(HeadlessSceneRenderer::default()));
        assert!(matches!(result, Err(MapError::MissingContainer(_))));
        assert_eq!(globe.state(), GlobeState::Uninitialized);
    }

    #[test]
    fn test_frame_applies_rotation() {
        let (_page, globe, renderer) = running_globe(GlobeConfig::default());
        globe.tick().unwrap();
        globe.tick().unwrap();

        let rotation = globe.globe_rotation().unwrap();
        assert!((rotation.y - 0.004).abs() < 1e-12);
        assert_eq!(rotation.x, 0.0);
        assert!((globe.scene_rotation().unwrap().y - 0.001).abs() < 1e-12);
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn test_auto_rotate_off() {
        let config = GlobeConfig {
            auto_rotate: false,
            ..Default::default()
        };
        let (_page, globe, _renderer) = running_globe(config);
        globe.tick().unwrap();
        assert_eq!(globe.globe_rotation().unwrap().y, 0.0);
    }

    #[test]
    fn test_pointer_sets_target() {
        let (_page, globe, _renderer) = running_globe(GlobeConfig::default());
        let handle = globe.handle().unwrap();

        // right edge, top edge of a 400x200 container
        assert!(handle.pointer_move(400.0, 0.0));
        globe.tick().unwrap();

        let state = globe.scene_state().unwrap();
        assert_eq!(state.pointer_offset, Point::new(1.0, 1.0));
        assert_eq!(state.target_rotation, Point::new(0.5, 0.5));
        assert!((state.current_rotation.x - 0.025).abs() < 1e-12);
    }

    #[test]
    fn test_pointer_leave_converges_without_overshoot() {
        let (_page, globe, _renderer) = running_globe(GlobeConfig::default());
        let handle = globe.handle().unwrap();
        handle.pointer_move(300.0, 150.0);
        for _ in 0..200 {
            globe.tick().unwrap();
        }

        handle.pointer_leave();
        let mut previous = globe.scene_state().unwrap().current_rotation;
        assert!(previous.y > 0.0 && previous.x < 0.0);
        for _ in 0..400 {
            globe.tick().unwrap();
            let current = globe.scene_state().unwrap().current_rotation;
            assert!(current.y >= 0.0 && current.y < previous.y);
            assert!(current.x <= 0.0 && current.x > previous.x);
            previous = current;
        }
        assert!(previous.y.abs() < 1e-6 && previous.x.abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_camera_and_surface() {
        let (_page, globe, renderer) = running_globe(GlobeConfig::default());
        globe.handle().unwrap().resize(900.0, 300.0);
        globe.tick().unwrap();

        let stats = renderer.stats();
        assert_eq!(stats.size, (900.0, 300.0));
        assert_eq!(stats.camera_aspect, Some(3.0));
    }

    #[test]
    fn test_destroy_is_terminal() {
        let (page, mut globe, renderer) = running_globe(GlobeConfig::default());
        let handle = globe.handle().unwrap();
        globe.destroy(&page).unwrap();

        assert_eq!(globe.state(), GlobeState::Destroyed);
        assert!(page.surfaces(GLOBE_CONTAINER_ID).is_empty());
        assert!(renderer.stats().disposed);
        assert!(!handle.pointer_leave());
        assert!(globe.tick().is_err());
        assert!(globe.destroy(&page).is_err());
        assert!(globe
            .initialize(&page, Box::new(HeadlessSceneRenderer::default()))
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_loop_stops_after_destroy() {
        let (page, mut globe, renderer) = running_globe(GlobeConfig::default());
        globe.start().unwrap();
        assert!(globe.is_animating());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let frames = renderer.frames();
        assert!(frames >= 10);

        globe.destroy(&page).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(renderer.frames(), frames);
    }
}
