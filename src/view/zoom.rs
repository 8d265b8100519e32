//! Image zoom popup
//!
//! Clicking a zoomable image opens a popup showing it; a link to the
//! full-size file is offered only when the image is larger than the viewport.

/// Visible area of the page, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// An image the user can click to zoom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomImage {
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ZoomImage {
    fn exceeds(&self, viewport: Viewport) -> bool {
        self.natural_width > viewport.width || self.natural_height > viewport.height
    }
}

/// The popup's parts: container, shown image and full-size link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoomPopup {
    pub visible: bool,
    pub image_src: String,
    pub link_href: String,
    pub link_visible: bool,
}

/// Drives a [`ZoomPopup`] it was handed
#[derive(Debug)]
pub struct ImageZoom<'a> {
    popup: &'a mut ZoomPopup,
    shown: Option<ZoomImage>,
}

impl<'a> ImageZoom<'a> {
    pub fn new(popup: &'a mut ZoomPopup) -> Self {
        Self { popup, shown: None }
    }

    /// Show `image` in the popup
    pub fn open(&mut self, image: &ZoomImage, viewport: Viewport) {
        self.popup.image_src = image.src.clone();
        self.popup.link_href = image.src.clone();
        self.popup.visible = true;
        self.popup.link_visible = image.exceeds(viewport);
        self.shown = Some(image.clone());
    }

    /// Re-evaluate whether the full-size link is worth showing
    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(image) = &self.shown {
            self.popup.link_visible = image.exceeds(viewport);
        }
    }

    pub fn close(&mut self) {
        self.popup.visible = false;
    }

    pub fn popup(&self) -> &ZoomPopup {
        &*self.popup
    }
}
