//! The post view: navigation state, rendering pipeline and display surface

mod hook;
mod pipeline;
mod state;
mod surface;
mod zoom;

pub use hook::{HighlightHook, RenderHook};
pub use pipeline::Pipeline;
pub use state::{CurrentView, Navigation, PostView, Ticket};
pub use surface::Surface;
pub use zoom::{ImageZoom, Viewport, ZoomImage, ZoomPopup};
