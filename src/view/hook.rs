//! Post-render hook

use super::Surface;
use crate::content::Highlighter;

/// Called each time new content has been attached to a surface
pub trait RenderHook {
    fn after_render(&self, surface: &mut Surface);
}

/// Highlights the attached code blocks, then reveals the surface
pub struct HighlightHook<'a, H: ?Sized> {
    highlighter: &'a H,
}

impl<'a, H: Highlighter + ?Sized> HighlightHook<'a, H> {
    pub fn new(highlighter: &'a H) -> Self {
        Self { highlighter }
    }
}

impl<H: Highlighter + ?Sized> RenderHook for HighlightHook<'_, H> {
    fn after_render(&self, surface: &mut Surface) {
        if !surface.html().is_empty() {
            let highlighted = self.highlighter.highlight(surface.html());
            surface.update_html(highlighted);
        }
        surface.reveal();
    }
}
