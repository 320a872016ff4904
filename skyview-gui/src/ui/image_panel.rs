//! Image panel rows (top bar) and the status bar.

use eframe::egui::{self, PopupCloseBehavior, RichText};
use skyview_core::panel::RENDER_BUTTON_TOOLTIP;
use skyview_core::{ImageDisplayPanel, MenuAction};

use super::theme::{self, ThemeColors};
use crate::app::SkyViewApp;

const RANGE_FIELD_WIDTH: f32 = 72.0;

impl SkyViewApp {
    /// Render one row of controls per image, top image first.
    pub(crate) fn render_image_panels(&mut self, ctx: &egui::Context) {
        let colors = ThemeColors::from_ctx(ctx);
        egui::TopBottomPanel::top("image_panels")
            .frame(
                egui::Frame::none()
                    .fill(colors.bg_header)
                    .inner_margin(egui::Margin::symmetric(12.0, 6.0)),
            )
            .show(ctx, |ui| {
                if self.manager.is_empty() {
                    ui.label(RichText::new("No images loaded").color(colors.text_muted));
                    return;
                }
                for panel in self.manager.panels_mut() {
                    image_panel_row(ui, panel);
                }
            });
    }

    /// Render the bottom status bar.
    pub(crate) fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(theme::status_text(&self.status_text));
                if let Some([x, y]) = self.cursor {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(theme::status_text(&format!("{x:+.4}°, {y:+.4}°")));
                    });
                }
            });
        });
    }
}

/// One panel: raise button and menu, centring mark, name, slice selectors,
/// display range fields and the render-controls button.
fn image_panel_row(ui: &mut egui::Ui, panel: &mut ImageDisplayPanel) {
    let base_id = ui.make_persistent_id(("image_panel", panel.image().id()));
    let popup_id = base_id.with("menu");

    ui.horizontal(|ui| {
        let raise = ui
            .add(theme::panel_button("⏶"))
            .on_hover_text(panel.raise_tooltip());
        if raise.clicked() {
            panel.activate_raise();
        }
        let arrow = ui
            .add(theme::panel_button("▾"))
            .on_hover_text("Image menu");
        if arrow.clicked() {
            ui.memory_mut(|m| m.toggle_popup(popup_id));
        }
        if panel.take_menu_request() {
            ui.memory_mut(|m| m.open_popup(popup_id));
        }
        if let Some(action) = image_menu(ui, popup_id, &raise.union(arrow), panel) {
            panel.trigger(action);
        }

        let mark = RichText::new(if panel.center_icon_visible() { "⊕" } else { " " });
        ui.label(mark.color(theme::ACCENT))
            .on_hover_text(panel.center_tooltip());

        let mut name = RichText::new(panel.label_text());
        if panel.label_is_bold() {
            name = name.strong();
        }
        ui.label(name).on_hover_text(panel.label_tooltip());

        slice_selectors(ui, base_id, panel);
        range_fields(ui, panel);

        if ui
            .add(theme::panel_button("🎨"))
            .on_hover_text(RENDER_BUTTON_TOOLTIP)
            .clicked()
        {
            panel.show_render_controls();
        }
    });
}

/// The image menu popup; returns the chosen entry.
fn image_menu(
    ui: &egui::Ui,
    popup_id: egui::Id,
    anchor: &egui::Response,
    panel: &ImageDisplayPanel,
) -> Option<MenuAction> {
    let mut chosen = None;
    egui::popup::popup_below_widget(
        ui,
        popup_id,
        anchor,
        PopupCloseBehavior::CloseOnClick,
        |ui| {
            ui.set_min_width(200.0);
            let menu = panel.menu();
            ui.label(RichText::new(menu.title()).strong());
            ui.separator();
            for entry in menu.visible_entries() {
                let mut button = egui::Button::new(entry.text.replace("&&", "&"));
                if let Some(key) = &entry.shortcut {
                    button = button.shortcut_text(key.as_str());
                }
                if ui.add(button).clicked() {
                    chosen = Some(entry.action);
                }
            }
        },
    );
    chosen
}

fn slice_selectors(ui: &mut egui::Ui, base_id: egui::Id, panel: &ImageDisplayPanel) {
    for slicer in panel.slicers().iter().filter(|s| s.is_visible()) {
        if let Some(caption) = slicer.caption() {
            ui.label(theme::caption(caption));
        }
        let mut index = slicer.current_index();
        egui::ComboBox::from_id_salt(base_id.with(("axis", slicer.axis())))
            .selected_text(slicer.current_label().unwrap_or_default())
            .show_ui(ui, |ui| {
                for (i, label) in slicer.labels().iter().enumerate() {
                    ui.selectable_value(&mut index, i, label);
                }
            })
            .response
            .on_hover_text(slicer.tooltip());
        if index != slicer.current_index() {
            slicer.set_current_index(index);
        }
    }
}

fn range_fields(ui: &mut egui::Ui, panel: &ImageDisplayPanel) {
    let range = panel.range();
    let mut min_text = range.min_text();
    let mut max_text = range.max_text();

    let mut min_resp = ui.add(
        egui::TextEdit::singleline(&mut min_text).desired_width(RANGE_FIELD_WIDTH),
    );
    let mut max_resp = ui.add(
        egui::TextEdit::singleline(&mut max_text).desired_width(RANGE_FIELD_WIDTH),
    );
    if let Some(tooltip) = panel.range_tooltip() {
        min_resp = min_resp.on_hover_text(tooltip);
        max_resp = max_resp.on_hover_text(tooltip);
    }

    if min_resp.changed() {
        range.edit_min(&min_text);
    }
    if max_resp.changed() {
        range.edit_max(&max_text);
    }
    if min_resp.lost_focus() || max_resp.lost_focus() {
        panel.change_display_range();
    }
}
