//! Helper functions for page rendering
//!
//! URL building, edit/share links and HTML escaping.

mod html;
mod url;

pub use html::*;
pub use url::*;
