//! UI rendering modules.
//!
//! - `image_panel`: one row of display controls per image, plus the status bar
//! - `sky_plot`: central plot with image planes and decorations
//! - `control_dialog`: per-image render-control windows

mod control_dialog;
mod image_panel;
mod sky_plot;
pub mod theme;
