//! In-memory DOM host used by the headless binary and tests

use super::{DomHost, ImageNode};
use crate::{
    constants::{GLOBE_CONTAINER_ID, MAP_CONTAINER_ID, MAP_LOADING_ID},
    dashboard::slots,
    input::events::ContainerRect,
    prelude::HashMap,
    MapError, Result,
};
use std::sync::{Mutex, MutexGuard};

/// Recorded state of one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub text: String,
    pub html: String,
    pub visible: bool,
    pub image: Option<ImageNode>,
    pub surfaces: Vec<String>,
    pub rect: ContainerRect,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            text: String::new(),
            html: String::new(),
            visible: true,
            image: None,
            surfaces: Vec::new(),
            rect: ContainerRect::new(0.0, 0.0, 800.0, 600.0),
        }
    }
}

/// A page made of flat, id-addressed elements
#[derive(Debug, Default)]
pub struct InMemoryPage {
    elements: Mutex<HashMap<String, ElementState>>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(ids: &[&str]) -> Self {
        let page = Self::new();
        for id in ids {
            page.add_element(id);
        }
        page
    }

    /// Every anchor the dashboard page exposes
    pub fn dashboard() -> Self {
        let page = Self::with_elements(&[MAP_CONTAINER_ID, MAP_LOADING_ID, GLOBE_CONTAINER_ID]);
        for id in slots::all() {
            page.add_element(&id);
        }
        page
    }

    pub fn add_element(&self, id: &str) {
        if let Ok(mut elements) = self.elements.lock() {
            elements.entry(id.to_string()).or_default();
        }
    }

    pub fn add_element_with_rect(&self, id: &str, rect: ContainerRect) {
        if let Ok(mut elements) = self.elements.lock() {
            elements.entry(id.to_string()).or_default().rect = rect;
        }
    }

    pub fn remove_element(&self, id: &str) -> bool {
        self.elements
            .lock()
            .map(|mut elements| elements.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Snapshot of an element's recorded state
    pub fn element(&self, id: &str) -> Option<ElementState> {
        self.elements.lock().ok()?.get(id).cloned()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.element(id).map(|e| e.text)
    }

    pub fn html(&self, id: &str) -> Option<String> {
        self.element(id).map(|e| e.html)
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.element(id).map(|e| e.visible)
    }

    pub fn image(&self, id: &str) -> Option<ImageNode> {
        self.element(id).and_then(|e| e.image)
    }

    pub fn surfaces(&self, id: &str) -> Vec<String> {
        self.element(id).map(|e| e.surfaces).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, ElementState>>> {
        self.elements
            .lock()
            .map_err(|_| MapError::InvalidState("page state lock poisoned".to_string()))
    }

    fn update<F>(&self, id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut ElementState),
    {
        let mut elements = self.lock()?;
        let element = elements
            .get_mut(id)
            .ok_or_else(|| MapError::MissingContainer(id.to_string()))?;
        f(element);
        Ok(())
    }
}

impl DomHost for InMemoryPage {
    fn has_element(&self, id: &str) -> bool {
        self.lock().map(|e| e.contains_key(id)).unwrap_or(false)
    }

    fn set_text(&self, id: &str, text: &str) -> Result<()> {
        self.update(id, |e| {
            e.text = text.to_string();
            e.html.clear();
            e.image = None;
        })
    }

    fn set_html(&self, id: &str, html: &str) -> Result<()> {
        self.update(id, |e| {
            e.html = html.to_string();
            e.text.clear();
            e.image = None;
        })
    }

    fn append_html(&self, id: &str, html: &str) -> Result<()> {
        self.update(id, |e| e.html.push_str(html))
    }

    fn set_visible(&self, id: &str, visible: bool) -> Result<()> {
        self.update(id, |e| e.visible = visible)
    }

    fn mount_image(&self, container_id: &str, image: &ImageNode) -> Result<()> {
        self.update(container_id, |e| {
            e.text.clear();
            e.html.clear();
            e.image = Some(image.clone());
        })
    }

    fn set_image_source(&self, id: &str, src: &str, alt: &str) -> Result<()> {
        self.update(id, |e| {
            let image = e.image.get_or_insert_with(|| ImageNode::new("", ""));
            image.src = src.to_string();
            image.alt = alt.to_string();
        })
    }

    fn set_image_alt(&self, id: &str, alt: &str) -> Result<()> {
        self.update(id, |e| {
            if let Some(image) = e.image.as_mut() {
                image.alt = alt.to_string();
            }
        })
    }

    fn attach_surface(&self, container_id: &str, surface_id: &str) -> Result<()> {
        self.update(container_id, |e| {
            if !e.surfaces.iter().any(|s| s == surface_id) {
                e.surfaces.push(surface_id.to_string());
            }
        })
    }

    fn detach_surface(&self, container_id: &str, surface_id: &str) -> Result<()> {
        self.update(container_id, |e| e.surfaces.retain(|s| s != surface_id))
    }

    fn container_rect(&self, id: &str) -> Result<ContainerRect> {
        self.lock()?
            .get(id)
            .map(|e| e.rect)
            .ok_or_else(|| MapError::MissingContainer(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_is_reported() {
        let page = InMemoryPage::new();
        assert!(!page.has_element("earth-engine-map"));
        assert!(matches!(
            page.set_text("earth-engine-map", "x"),
            Err(MapError::MissingContainer(id)) if id == "earth-engine-map"
        ));
    }

    #[test]
    fn test_image_replaces_content() {
        let page = InMemoryPage::with_elements(&["map"]);
        page.set_html("map", "<p>loading</p>").unwrap();
        page.mount_image("map", &ImageNode::new("a.png", "Flood map")).unwrap();

        assert_eq!(page.html("map").as_deref(), Some(""));
        assert_eq!(page.image("map").unwrap().src, "a.png");

        page.set_text("map", "Map image not available").unwrap();
        assert!(page.image("map").is_none());
    }

    #[test]
    fn test_surfaces_attach_once() {
        let page = InMemoryPage::with_elements(&["globe"]);
        page.attach_surface("globe", "canvas").unwrap();
        page.attach_surface("globe", "canvas").unwrap();
        assert_eq!(page.surfaces("globe"), vec!["canvas".to_string()]);

        page.detach_surface("globe", "canvas").unwrap();
        assert!(page.surfaces("globe").is_empty());
    }

    #[test]
    fn test_dashboard_page_has_all_anchors() {
        let page = InMemoryPage::dashboard();
        assert!(page.has_element(MAP_CONTAINER_ID));
        assert!(page.has_element(MAP_LOADING_ID));
        assert!(page.has_element("floodedareavalue"));
        assert!(page.has_element("featureimportancechart"));
    }
}
