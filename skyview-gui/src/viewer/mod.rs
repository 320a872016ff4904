//! Visualization of image planes on the sky plot.

mod placement;
mod texture;

pub use placement::{describe, image_rect, to_plot};
pub use texture::render_plane;
