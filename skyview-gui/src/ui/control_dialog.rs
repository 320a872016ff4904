//! Render-control windows, one per image that opened one.

use eframe::egui;
use log::warn;
use skyview_core::{Colormap, ImageControlDialog, IntensityMap};

use super::theme;
use crate::app::SkyViewApp;

impl SkyViewApp {
    /// Render every visible control dialog.
    pub(crate) fn render_control_dialogs(&mut self, ctx: &egui::Context) {
        for panel in self.manager.panels_mut() {
            let Some(dialog) = panel.control_dialog_mut() else {
                continue;
            };
            if !dialog.is_visible() {
                continue;
            }
            let mut open = true;
            egui::Window::new(dialog.title().to_owned())
                .id(egui::Id::new(("control_dialog", dialog.image().id())))
                .open(&mut open)
                .resizable(false)
                .show(ctx, |ui| dialog_body(ui, dialog));
            if !open {
                dialog.hide();
            }
        }
    }
}

fn dialog_body(ui: &mut egui::Ui, dialog: &ImageControlDialog) {
    let rc = dialog.render_control();
    let id = dialog.image().id();

    ui.label(theme::section_header("Colours"));
    egui::Grid::new(("render_grid", id))
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Colourmap");
            let mut colormap = rc.colormap();
            egui::ComboBox::from_id_salt(("colormap", id))
                .selected_text(colormap.to_string())
                .show_ui(ui, |ui| {
                    for cmap in Colormap::ALL {
                        ui.selectable_value(&mut colormap, cmap, cmap.to_string());
                    }
                });
            dialog.set_colormap(colormap);
            ui.end_row();

            ui.label("Intensity");
            let mut map = rc.intensity_map();
            egui::ComboBox::from_id_salt(("intensity", id))
                .selected_text(map.to_string())
                .show_ui(ui, |ui| {
                    for m in IntensityMap::ALL {
                        ui.selectable_value(&mut map, m, m.to_string());
                    }
                });
            dialog.set_intensity_map(map);
            ui.end_row();
        });

    ui.separator();
    ui.label(theme::section_header("Display range"));
    ui.horizontal(|ui| {
        let range = dialog.range();
        let mut min_text = range.min_text();
        let mut max_text = range.max_text();
        ui.label("min");
        if ui
            .add(egui::TextEdit::singleline(&mut min_text).desired_width(90.0))
            .changed()
        {
            range.edit_min(&min_text);
        }
        ui.label("max");
        if ui
            .add(egui::TextEdit::singleline(&mut max_text).desired_width(90.0))
            .changed()
        {
            range.edit_max(&max_text);
        }
        if ui.add(theme::primary_button("Apply")).clicked() {
            dialog.apply_range();
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Full range").clicked() {
            dialog.reset_full_range();
        }
        if ui.button("Slice range").clicked() {
            if let Err(e) = dialog.reset_slice_range() {
                warn!("slice range for {id}: {e}");
            }
        }
    });

    let axes = dialog.image().extra_axes();
    if axes.iter().all(|a| a.len() < 2) {
        return;
    }
    ui.separator();
    ui.label(theme::section_header("Slice"));
    let current = rc.current_slice();
    for (i, axis) in axes.iter().enumerate().filter(|(_, a)| a.len() > 1) {
        ui.horizontal(|ui| {
            ui.label(theme::caption(&axis.name));
            let mut index = current[i];
            egui::ComboBox::from_id_salt(("dialog_axis", id, i))
                .selected_text(axis.labels[index].as_str())
                .show_ui(ui, |ui| {
                    for (j, label) in axis.labels.iter().enumerate() {
                        ui.selectable_value(&mut index, j, label);
                    }
                });
            if index != current[i] {
                if let Err(e) = dialog.select_slice_index(i, index) {
                    warn!("slice request for {id}: {e}");
                }
            }
        });
    }
}
