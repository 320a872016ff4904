//! Central sky plot: image planes with their borders and labels.

use eframe::egui::{self, Align2, RichText};
use egui_plot::{Line, Plot, PlotImage, PlotPoint, PlotPoints, Text};
use skyview_core::{ImageDisplayPanel, PlotItem, SurfaceId};

use crate::app::SkyViewApp;
use crate::util::{f64_to_f32, to_color32};
use crate::viewer::{image_rect, to_plot};

/// Something to draw, tagged with its stacking depth.
enum Layer {
    Image {
        texture: egui::TextureId,
        center: [f64; 2],
        size: [f64; 2],
    },
    Border {
        points: Vec<[f64; 2]>,
        color: egui::Color32,
        width: f32,
    },
    Label {
        at: [f64; 2],
        text: RichText,
    },
}

fn visible_on(item: &dyn PlotItem, surface: SurfaceId) -> bool {
    item.plot() == Some(surface) && item.is_visible()
}

impl SkyViewApp {
    fn collect_layers(&self) -> Vec<(i32, Layer)> {
        let surface = self.surface.id();
        let mut layers = Vec::new();
        for panel in self.manager.panels() {
            push_panel_layers(&mut layers, panel, surface, self.textures.get(&panel.image().id()));
        }
        layers.sort_by_key(|(z, _)| *z);
        layers
    }

    /// Render the central panel with the sky plot.
    pub(crate) fn render_central_panel(&mut self, ctx: &egui::Context) {
        let layers = self.collect_layers();
        egui::CentralPanel::default().show(ctx, |ui| {
            if layers.is_empty() {
                ui.centered_and_justified(|ui| ui.label("No Data"));
                return;
            }
            let response = Plot::new("sky")
                .data_aspect(1.0)
                .x_axis_label("ΔL (°)")
                .y_axis_label("ΔM (°)")
                .show(ui, |plot_ui| {
                    for (_, layer) in layers {
                        match layer {
                            Layer::Image {
                                texture,
                                center,
                                size,
                            } => plot_ui.image(PlotImage::new(
                                texture,
                                PlotPoint::from(center),
                                egui::vec2(f64_to_f32(size[0]), f64_to_f32(size[1])),
                            )),
                            Layer::Border {
                                points,
                                color,
                                width,
                            } => plot_ui
                                .line(Line::new(PlotPoints::from(points)).color(color).width(width)),
                            Layer::Label { at, text } => plot_ui
                                .text(Text::new(PlotPoint::from(at), text).anchor(Align2::LEFT_CENTER)),
                        }
                    }
                    plot_ui.pointer_coordinate()
                });
            self.cursor = response.inner.map(|p| [p.x, p.y]);
        });
    }
}

fn push_panel_layers(
    layers: &mut Vec<(i32, Layer)>,
    panel: &ImageDisplayPanel,
    surface: SurfaceId,
    texture: Option<&egui::TextureHandle>,
) {
    let image = panel.image();
    if let Some(texture) = texture.filter(|_| visible_on(&**image, surface)) {
        let (center, size) = image_rect(image);
        layers.push((
            image.z(),
            Layer::Image {
                texture: texture.id(),
                center,
                size,
            },
        ));
    }
    if let Some(border) = panel.border().filter(|b| visible_on(*b, surface)) {
        let pen = border.pen();
        layers.push((
            border.z(),
            Layer::Border {
                points: border.points().map(|p| to_plot(image, p)).collect(),
                color: to_color32(pen.color),
                width: pen.width,
            },
        ));
    }
    if let Some(label) = panel.border_label().filter(|l| visible_on(*l, surface)) {
        let mut text = RichText::new(label.text());
        if let Some(color) = label.color() {
            text = text.color(to_color32(color));
        }
        if let Some(background) = label.background() {
            text = text.background_color(to_color32(background));
        }
        layers.push((
            label.z(),
            Layer::Label {
                at: to_plot(image, label.anchor()),
                text,
            },
        ));
    }
}
