//! Main application state and logic.
//!
//! `SkyViewApp` owns the image manager, the plot surface every image is
//! attached to and the textures rendered from the current planes.

use std::collections::HashMap;

use eframe::egui;
use log::{debug, warn};
use skyview_core::{ImageId, ImageManager, PlotSurface};

use crate::ui::theme;
use crate::viewer::{describe, render_plane};

/// Main application state.
pub struct SkyViewApp {
    /// Loaded images and their display panels.
    pub(crate) manager: ImageManager,
    /// The sky plot all images are drawn on.
    pub(crate) surface: PlotSurface,
    /// Rendered planes, dropped when an image needs redrawing.
    pub(crate) textures: HashMap<ImageId, egui::TextureHandle>,
    /// Plot coordinate under the pointer, in degrees.
    pub(crate) cursor: Option<[f64; 2]>,
    /// Bottom bar text.
    pub(crate) status_text: String,
}

impl SkyViewApp {
    pub fn new(manager: ImageManager) -> Self {
        let surface = PlotSurface::new("sky");
        manager.attach_to_plot(&surface);
        let status_text = format!(
            "{} images, plot {}",
            manager.len(),
            describe(manager.plot_projection())
        );
        Self {
            manager,
            surface,
            textures: HashMap::new(),
            cursor: None,
            status_text,
        }
    }

    /// Handle requests queued by the images since the last frame.
    pub fn handle_messages(&mut self, ctx: &egui::Context) {
        let changes = self.manager.process_events();
        if changes.is_empty() {
            return;
        }
        for id in changes.redraw.iter().chain(&changes.unloaded) {
            self.textures.remove(id);
        }
        if changes.restacked {
            self.manager.attach_to_plot(&self.surface);
        }
        if !changes.unloaded.is_empty() || changes.recentred {
            self.status_text = format!(
                "{} images, plot {}",
                self.manager.len(),
                describe(self.manager.plot_projection())
            );
        }
        debug!("frame changes: {changes:?}");
        ctx.request_repaint();
    }

    /// Render textures for images that have none.
    pub(crate) fn refresh_textures(&mut self, ctx: &egui::Context) {
        for panel in self.manager.panels() {
            let id = panel.image().id();
            if self.textures.contains_key(&id) {
                continue;
            }
            match render_plane(panel.render_control()) {
                Ok(image) => {
                    let texture =
                        ctx.load_texture(id.to_string(), image, egui::TextureOptions::NEAREST);
                    self.textures.insert(id, texture);
                }
                Err(e) => warn!("cannot render {id}: {e}"),
            }
        }
    }

    /// Keyboard shortcuts acting on the top image.
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let Some(top) = self.manager.top_mut() else {
            return;
        };

        let render_key = top
            .render_controls_shortcut()
            .and_then(egui::Key::from_name);
        let (open_controls, step) = ctx.input(|i| {
            let open = render_key.is_some_and(|key| i.key_pressed(key));
            let step = if i.key_pressed(egui::Key::PageUp) {
                1
            } else if i.key_pressed(egui::Key::PageDown) {
                -1
            } else {
                0
            };
            (open, step)
        });

        if open_controls {
            top.show_render_controls();
        }
        if step != 0 {
            if let Some(axis) = top
                .slicers()
                .iter()
                .rev()
                .find(|s| s.is_visible())
                .map(skyview_core::SliceSelector::axis)
            {
                top.increment_slice(axis, step);
            }
        }
    }

    /// Run one frame.
    ///
    /// Widgets and shortcuts queue slice and repaint events while the frame
    /// is drawn; those are drained again at the end so the next frame
    /// renders them without waiting for more input.
    pub(crate) fn show(&mut self, ctx: &egui::Context) {
        theme::apply_system_theme(ctx);
        self.handle_messages(ctx);
        self.handle_shortcuts(ctx);
        self.render_image_panels(ctx);
        self.render_status_bar(ctx);
        self.refresh_textures(ctx);
        self.render_central_panel(ctx);
        self.render_control_dialogs(ctx);
        self.handle_messages(ctx);
    }
}

impl eframe::App for SkyViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{demo_images, DemoShape};
    use skyview_core::ViewerContext;

    fn app() -> SkyViewApp {
        let mut manager = ImageManager::new(ViewerContext::default());
        let shape = DemoShape {
            stokes: 2,
            channels: 3,
            size: 16,
        };
        for (image, name) in demo_images(&shape).unwrap() {
            manager.load_image(image, name);
        }
        SkyViewApp::new(manager)
    }

    #[test]
    fn test_slice_change_drops_texture_until_next_frame() {
        let ctx = egui::Context::default();
        let mut app = app();
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));
        assert_eq!(app.textures.len(), 2);

        let top = app.manager.top_mut().unwrap();
        let id = top.image().id();
        top.increment_slice(1, 1);
        app.handle_messages(&ctx);
        assert!(!app.textures.contains_key(&id));
        assert_eq!(app.textures.len(), 1);

        let _ = ctx.run(egui::RawInput::default(), |ctx| app.show(ctx));
        assert!(app.textures.contains_key(&id));
    }
}
