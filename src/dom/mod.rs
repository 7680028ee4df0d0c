//! Named DOM slots the crate writes into
//!
//! Everything that touches the page goes through [`DomHost`]: the map
//! container, the loading overlay, the globe container and the dashboard
//! widgets. [`page::InMemoryPage`] backs the headless binary and tests; the
//! `wasm` feature adds a browser implementation over `web-sys`.

pub mod page;
#[cfg(feature = "wasm")]
pub mod web;

use crate::{input::events::ContainerRect, Result};
use serde::{Deserialize, Serialize};

/// An `<img>`-equivalent node mounted into a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageNode {
    pub src: String,
    pub alt: String,
    /// Inline style, `None` leaves the host default
    pub style: Option<String>,
}

impl ImageNode {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Access to the page's element slots, addressed by element id.
///
/// Methods take `&self`; implementations use interior mutability. Every
/// mutating method returns [`crate::MapError::MissingContainer`] when the
/// element does not exist so callers can decide to no-op.
pub trait DomHost {
    fn has_element(&self, id: &str) -> bool;

    /// Replaces the element's children with a text node
    fn set_text(&self, id: &str, text: &str) -> Result<()>;

    /// Replaces the element's children with parsed markup
    fn set_html(&self, id: &str, html: &str) -> Result<()>;

    /// Appends markup after the element's existing children
    fn append_html(&self, id: &str, html: &str) -> Result<()>;

    /// Shows or hides the element (`display: none`)
    fn set_visible(&self, id: &str, visible: bool) -> Result<()>;

    /// Replaces the container's children with a single image node
    fn mount_image(&self, container_id: &str, image: &ImageNode) -> Result<()>;

    /// Updates `src` and `alt` of an element that already is an image
    fn set_image_source(&self, id: &str, src: &str, alt: &str) -> Result<()>;

    fn set_image_alt(&self, id: &str, alt: &str) -> Result<()>;

    /// Appends a render surface (canvas) to the container
    fn attach_surface(&self, container_id: &str, surface_id: &str) -> Result<()>;

    /// Removes a previously attached render surface; unknown surfaces are ignored
    fn detach_surface(&self, container_id: &str, surface_id: &str) -> Result<()>;

    /// Client-space bounding rectangle of the element
    fn container_rect(&self, id: &str) -> Result<ContainerRect>;
}

/// Writes `<div class="error">{message}</div>` into the slot
pub fn show_error(host: &dyn DomHost, id: &str, message: &str) -> Result<()> {
    host.set_html(id, &format!("<div class=\"error\">{}</div>", escape_html(message)))
}

/// Minimal escaping for text interpolated into markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_show_error_markup() {
        let page = page::InMemoryPage::with_elements(&["dashboardstatserror"]);
        show_error(&page, "dashboardstatserror", "Unable to load statistics").unwrap();
        assert_eq!(
            page.html("dashboardstatserror").as_deref(),
            Some("<div class=\"error\">Unable to load statistics</div>")
        );
    }
}
