//! Browser DOM host over `web-sys`

use super::{DomHost, ImageNode};
use crate::{input::events::ContainerRect, MapError, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

/// The live document of the current window
pub struct WebPage {
    document: Document,
}

impl WebPage {
    pub fn new() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| MapError::Unsupported("no browser document available".to_string()))?;
        Ok(Self { document })
    }

    fn element(&self, id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| MapError::MissingContainer(id.to_string()))
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement> {
        self.element(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| MapError::InvalidState(format!("#{} is not an HTML element", id)))
    }

    fn image_element(&self, id: &str) -> Result<HtmlImageElement> {
        self.element(id)?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| MapError::InvalidState(format!("#{} is not an image", id)))
    }
}

fn js_error(context: &str, value: JsValue) -> MapError {
    MapError::InvalidState(format!("{}: {:?}", context, value))
}

impl DomHost for WebPage {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn set_text(&self, id: &str, text: &str) -> Result<()> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_html(&self, id: &str, html: &str) -> Result<()> {
        self.element(id)?.set_inner_html(html);
        Ok(())
    }

    fn append_html(&self, id: &str, html: &str) -> Result<()> {
        self.element(id)?
            .insert_adjacent_html("beforeend", html)
            .map_err(|e| js_error("insertAdjacentHTML", e))
    }

    fn set_visible(&self, id: &str, visible: bool) -> Result<()> {
        let display = if visible { "" } else { "none" };
        self.html_element(id)?
            .style()
            .set_property("display", display)
            .map_err(|e| js_error("style.display", e))
    }

    fn mount_image(&self, container_id: &str, image: &ImageNode) -> Result<()> {
        let container = self.element(container_id)?;
        let img = self
            .document
            .create_element("img")
            .map_err(|e| js_error("createElement", e))?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| MapError::InvalidState("created element is not an image".to_string()))?;
        img.set_src(&image.src);
        img.set_alt(&image.alt);
        if let Some(style) = &image.style {
            img.set_attribute("style", style)
                .map_err(|e| js_error("setAttribute", e))?;
        }
        container.set_inner_html("");
        container
            .append_child(&img)
            .map_err(|e| js_error("appendChild", e))?;
        Ok(())
    }

    fn set_image_source(&self, id: &str, src: &str, alt: &str) -> Result<()> {
        let img = self.image_element(id)?;
        img.set_src(src);
        img.set_alt(alt);
        Ok(())
    }

    fn set_image_alt(&self, id: &str, alt: &str) -> Result<()> {
        self.image_element(id)?.set_alt(alt);
        Ok(())
    }

    fn attach_surface(&self, container_id: &str, surface_id: &str) -> Result<()> {
        if self.document.get_element_by_id(surface_id).is_some() {
            return Ok(());
        }
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|e| js_error("createElement", e))?;
        canvas.set_id(surface_id);
        self.element(container_id)?
            .append_child(&canvas)
            .map_err(|e| js_error("appendChild", e))?;
        Ok(())
    }

    fn detach_surface(&self, container_id: &str, surface_id: &str) -> Result<()> {
        let container = self.element(container_id)?;
        if let Some(surface) = self.document.get_element_by_id(surface_id) {
            let _ = container.remove_child(&surface);
        }
        Ok(())
    }

    fn container_rect(&self, id: &str) -> Result<ContainerRect> {
        let rect = self.element(id)?.get_bounding_client_rect();
        Ok(ContainerRect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }
}
