//! Application theme and colours.
//!
//! A dark and a light palette sharing one accent, following the system
//! preference; proportional text with monospace numbers in the range fields.

use eframe::egui::{
    self, Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Theme, Visuals,
};

/// Accent shared by both palettes; also the default plot border colour.
pub const ACCENT: Color32 = Color32::from_rgb(0x4a, 0x9e, 0xff);
const CONFIRM: Color32 = Color32::from_rgb(0x2e, 0xa0, 0x6b);

/// Colours that differ between the dark and light palettes.
#[derive(Clone, Copy)]
pub struct ThemeColors {
    pub bg_base: Color32,
    pub bg_panel: Color32,
    pub bg_header: Color32,
    pub bg_input: Color32,
    pub border: Color32,
    pub border_strong: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub button_hover: Color32,
}

const DARK: ThemeColors = ThemeColors {
    bg_base: Color32::from_rgb(0x12, 0x14, 0x1a),
    bg_panel: Color32::from_rgb(0x1b, 0x1e, 0x26),
    bg_header: Color32::from_rgb(0x22, 0x26, 0x30),
    bg_input: Color32::from_rgb(0x2a, 0x2e, 0x3a),
    border: Color32::from_rgb(0x34, 0x39, 0x46),
    border_strong: Color32::from_rgb(0x48, 0x4e, 0x5e),
    text_primary: Color32::from_rgb(0xe4, 0xe6, 0xeb),
    text_muted: Color32::from_rgb(0x8a, 0x90, 0x9c),
    button_hover: Color32::from_rgb(0x33, 0x38, 0x46),
};

const LIGHT: ThemeColors = ThemeColors {
    bg_base: Color32::from_rgb(0xf2, 0xf3, 0xf6),
    bg_panel: Color32::from_rgb(0xff, 0xff, 0xff),
    bg_header: Color32::from_rgb(0xf7, 0xf8, 0xfa),
    bg_input: Color32::from_rgb(0xec, 0xee, 0xf2),
    border: Color32::from_rgb(0xd2, 0xd5, 0xdc),
    border_strong: Color32::from_rgb(0xb8, 0xbc, 0xc6),
    text_primary: Color32::from_rgb(0x1c, 0x1f, 0x26),
    text_muted: Color32::from_rgb(0x60, 0x66, 0x72),
    button_hover: Color32::from_rgb(0xdf, 0xe2, 0xe8),
};

impl ThemeColors {
    /// Colours for the current theme of `ctx`.
    pub fn from_ctx(ctx: &egui::Context) -> Self {
        Self::for_theme(theme_of(ctx))
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }
}

fn theme_of(ctx: &egui::Context) -> Theme {
    if ctx.style().visuals.dark_mode {
        Theme::Dark
    } else {
        Theme::Light
    }
}

fn build_visuals(theme: Theme) -> Visuals {
    let c = ThemeColors::for_theme(theme);
    let mut visuals = match theme {
        Theme::Dark => Visuals::dark(),
        Theme::Light => Visuals::light(),
    };

    visuals.window_fill = c.bg_panel;
    visuals.panel_fill = c.bg_panel;
    visuals.faint_bg_color = c.bg_base;
    visuals.extreme_bg_color = c.bg_input;

    let rounding = Rounding::same(3.0);
    let widgets = &mut visuals.widgets;
    for (style, fill, fg, stroke) in [
        (&mut widgets.noninteractive, c.bg_input, c.text_muted, c.border),
        (&mut widgets.inactive, c.bg_input, c.text_primary, c.border_strong),
        (&mut widgets.hovered, c.button_hover, c.text_primary, ACCENT),
        (&mut widgets.active, ACCENT, Color32::WHITE, ACCENT),
        (&mut widgets.open, c.bg_input, c.text_primary, c.border_strong),
    ] {
        style.bg_fill = fill;
        style.weak_bg_fill = fill;
        style.fg_stroke = Stroke::new(1.0, fg);
        style.bg_stroke = Stroke::new(1.0, stroke);
        style.rounding = rounding;
    }

    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    visuals
}

/// Apply the visuals, fonts and spacing for `theme`.
pub fn configure_style_for_theme(ctx: &egui::Context, theme: Theme) {
    ctx.set_visuals(build_visuals(theme));

    let mut style = (*ctx.style()).clone();
    style.text_styles = [
        (TextStyle::Small, FontId::new(10.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(15.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    ctx.set_style(style);
}

/// Style for the current dark/light preference.
pub fn configure_style(ctx: &egui::Context) {
    configure_style_for_theme(ctx, theme_of(ctx));
}

static LAST_DARK_MODE: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);
static THEME_INITIALIZED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Re-apply the style when the system theme flips. Call once per frame.
pub fn apply_system_theme(ctx: &egui::Context) {
    use std::sync::atomic::Ordering;

    let is_dark = ctx.style().visuals.dark_mode;
    let was_initialized = THEME_INITIALIZED.swap(true, Ordering::Relaxed);
    let last_dark = LAST_DARK_MODE.swap(is_dark, Ordering::Relaxed);
    if !was_initialized || last_dark != is_dark {
        configure_style(ctx);
    }
}

/// Compact icon button used in the image panel rows.
pub fn panel_button(icon: &str) -> egui::Button<'_> {
    egui::Button::new(icon).min_size(egui::vec2(22.0, 20.0))
}

pub fn primary_button(text: &str) -> egui::Button<'_> {
    egui::Button::new(egui::RichText::new(text).color(Color32::WHITE))
        .fill(CONFIRM)
        .rounding(Rounding::same(3.0))
}

/// Extra-axis caption such as `FREQ:`.
pub fn caption(text: &str) -> egui::RichText {
    egui::RichText::new(text).size(11.0).weak()
}

/// Upper-case section title in the control dialog.
pub fn section_header(text: &str) -> egui::RichText {
    egui::RichText::new(text.to_uppercase()).size(11.0).strong()
}

pub fn status_text(text: &str) -> egui::RichText {
    egui::RichText::new(text).size(11.0).monospace()
}
