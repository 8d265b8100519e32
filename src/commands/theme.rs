//! Show or toggle the persisted theme

use anyhow::Result;

use crate::theme::{Theme, ThemeController};
use crate::view::Surface;
use crate::Blog;

/// Apply the persisted preference, optionally toggling it, and return the result
pub fn apply(blog: &Blog, prefers_dark: bool, toggle: bool) -> Result<Theme> {
    let ambient = if prefers_dark { Theme::Dark } else { Theme::Light };
    let mut surface = Surface::new();
    let mut controller = ThemeController::load(
        blog.theme_store(),
        ambient,
        &blog.config.theme.attribute,
        &mut surface,
    );

    if toggle {
        controller.toggle(&mut surface)?;
        tracing::debug!("Saved theme to {:?}", controller.store().path());
    }
    Ok(controller.theme())
}

pub fn run(blog: &Blog, prefers_dark: bool, toggle: bool) -> Result<()> {
    let theme = apply(blog, prefers_dark, toggle)?;
    println!("{}", theme);
    Ok(())
}
