use std::time::Duration;
use waveradar::{
    constants::GLOBE_CONTAINER_ID,
    core::config::GlobeConfig,
    globe::renderer::HeadlessSceneRenderer,
    input::events::ContainerRect,
    GlobeRenderer, GlobeState, InMemoryPage,
};

/// Globe lifecycle driven by the runtime frame loop
#[cfg(test)]
mod globe_tests {
    use super::*;

    fn page() -> InMemoryPage {
        let page = InMemoryPage::new();
        page.add_element_with_rect(
            GLOBE_CONTAINER_ID,
            ContainerRect::new(100.0, 50.0, 600.0, 400.0),
        );
        page
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_parallax_through_frame_loop() {
        let page = page();
        let renderer = HeadlessSceneRenderer::default();
        let mut globe = GlobeRenderer::new(GLOBE_CONTAINER_ID, GlobeConfig::default());
        globe.initialize(&page, Box::new(renderer.clone())).unwrap();
        globe.start().unwrap();

        // top-left corner of the container
        let handle = globe.handle().unwrap();
        handle.pointer_move(100.0, 50.0);
        tokio::time::sleep(Duration::from_secs(3)).await;

        let state = globe.scene_state().unwrap();
        assert_eq!(state.target_rotation.x, 0.5);
        assert_eq!(state.target_rotation.y, -0.5);
        assert!((state.current_rotation.x - 0.5).abs() < 1e-3);
        assert!(renderer.frames() > 100);

        handle.pointer_leave();
        tokio::time::sleep(Duration::from_secs(3)).await;
        let state = globe.scene_state().unwrap();
        assert_eq!(state.target_rotation.x, 0.0);
        assert!(state.current_rotation.x.abs() < 1e-3);

        globe.destroy(&page).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroyed_globe_stops_ticking() {
        let page = page();
        let renderer = HeadlessSceneRenderer::default();
        let mut globe = GlobeRenderer::new(GLOBE_CONTAINER_ID, GlobeConfig::default());
        globe.initialize(&page, Box::new(renderer.clone())).unwrap();
        globe.start().unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        globe.destroy(&page).unwrap();
        let frames = renderer.frames();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(globe.state(), GlobeState::Destroyed);
        assert!(!globe.is_animating());
        assert_eq!(renderer.frames(), frames);
        assert!(page.surfaces(GLOBE_CONTAINER_ID).is_empty());
        assert!(globe.start().is_err());
    }
}
