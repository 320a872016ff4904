//! The image display panel: one row of controls for one image.
//!
//! A panel shows a raise button with an image menu, a centring indicator,
//! the image name, one selector per extra axis, min/max display-range
//! fields and a button opening the render-control dialog. User input is
//! forwarded to the image's [`RenderControl`]; changes made there flow
//! back into the panel through its notification channels.

use std::path::Path;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::context::ViewerContext;
use crate::dialog::ImageControlDialog;
use crate::format::format_g;
use crate::image::{ImageEvent, SkyImage};
use crate::plot::{BorderCurve, BorderLabel, Color, Pen, PlotItem, PlotSurface};
use crate::projection::Projection;
use crate::range::RangeEditor;
use crate::render::RenderControl;
use crate::signal::Connection;
use crate::slicer::SliceSelector;

const RAISE_TOOLTIP_INITIAL: &str = "Click here to raise this image above other images. \
     Click on the down-arrow to show a menu of image operations.";
const RAISE_TOOLTIP_CAN_RAISE: &str = "Click here to raise this image to the top. \
     Click on the down-arrow to access the image menu.";
const RAISE_TOOLTIP_MENU_ONLY: &str = "Click to access the image menu.";

/// Tooltip of the button opening the render controls.
pub const RENDER_BUTTON_TOOLTIP: &str = "Click for colourmap and intensity policy options.";

/// Operations offered by the image menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Raise,
    Center,
    ShowRenderControls,
    Unload,
}

/// One entry of the image menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub action: MenuAction,
    pub text: &'static str,
    pub visible: bool,
    /// Key bound to this entry, if any.
    pub shortcut: Option<String>,
}

impl MenuAction {
    const fn index(self) -> usize {
        match self {
            MenuAction::Raise => 0,
            MenuAction::Center => 1,
            MenuAction::ShowRenderControls => 2,
            MenuAction::Unload => 3,
        }
    }
}

/// The menu attached to the raise button.
#[derive(Debug, Clone)]
pub struct ImageMenu {
    title: String,
    entries: [MenuEntry; 4],
}

impl ImageMenu {
    fn new(title: &str, can_raise: bool, center_visible: bool) -> Self {
        let entry = |action, text, visible| MenuEntry {
            action,
            text,
            visible,
            shortcut: None,
        };
        Self {
            title: title.to_string(),
            entries: [
                entry(MenuAction::Raise, "Raise image", can_raise),
                entry(MenuAction::Center, "Center plot on image", center_visible),
                entry(
                    MenuAction::ShowRenderControls,
                    "Colours && Intensities...",
                    true,
                ),
                entry(MenuAction::Unload, "Unload image", true),
            ],
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Entries currently shown.
    pub fn visible_entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter().filter(|e| e.visible)
    }

    #[must_use]
    pub fn entry(&self, action: MenuAction) -> &MenuEntry {
        &self.entries[action.index()]
    }

    fn entry_mut(&mut self, action: MenuAction) -> &mut MenuEntry {
        &mut self.entries[action.index()]
    }
}

/// What activating the raise button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseOutcome {
    /// A [`ImageEvent::Raise`] request was emitted.
    RaiseRequested,
    /// Nothing to raise to; the image menu was opened instead.
    MenuOpened,
}

/// Display controls for one image.
pub struct ImageDisplayPanel {
    image: Rc<SkyImage>,
    context: Rc<ViewerContext>,
    render_control: Rc<RenderControl>,
    name: String,
    label_bold: bool,
    label_tooltip: String,
    center_visible: bool,
    center_tooltip: String,
    raise_tooltip: &'static str,
    can_raise: bool,
    menu: ImageMenu,
    menu_requested: bool,
    render_shortcut: Option<String>,
    slicers: Rc<[SliceSelector]>,
    has_slicing: bool,
    range: RangeEditor,
    range_tooltip: Option<String>,
    border: Option<BorderCurve>,
    label: Option<BorderLabel>,
    control_dialog: Option<ImageControlDialog>,
    _connections: Vec<Connection>,
}

impl ImageDisplayPanel {
    /// Build the controls for `image`.
    ///
    /// The panel is named after the basename of `name`, or of the image
    /// name when `name` is `None` or empty.
    #[must_use]
    pub fn new(image: Rc<SkyImage>, context: Rc<ViewerContext>, name: Option<&str>) -> Self {
        let config = context.config();
        let render_control = Rc::new(
            RenderControl::new(Rc::clone(&image))
                .with_colormap(config.default_colormap)
                .with_intensity_map(config.default_intensity_map),
        );

        let name = basename(name.filter(|n| !n.is_empty()).unwrap_or_else(|| image.name()));
        let shape = image
            .shape()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\u{00D7}");
        let label_tooltip = format!("{} {shape}", image.filename());
        let (rx, ry) = image.reference_pixel();
        let center_tooltip = format!(
            "The plot is currently centered on (the reference pixel {rx},{ry}) of this image."
        );

        let current = render_control.current_slice();
        let slicers: Rc<[SliceSelector]> = (0..image.num_extra_axes())
            .map(|i| {
                let (_, axis_name, labels) = image.extra_axis_number_name_labels(i);
                SliceSelector::new(i, axis_name, labels, current[i])
            })
            .collect();
        let has_slicing = slicers.iter().any(SliceSelector::is_visible);

        let mut connections = Vec::with_capacity(slicers.len() + 1);
        for slicer in slicers.iter() {
            let axis = slicer.axis();
            let rc: Weak<RenderControl> = Rc::downgrade(&render_control);
            connections.push(slicer.on_index_changed(move |&index| {
                if let Some(rc) = rc.upgrade() {
                    request_slice(&rc, axis, index);
                }
            }));
        }
        let weak_slicers: Weak<[SliceSelector]> = Rc::downgrade(&slicers);
        connections.push(render_control.slice_changed().connect(move |slice| {
            if let Some(slicers) = weak_slicers.upgrade() {
                for (slicer, &index) in slicers.iter().zip(slice) {
                    slicer.sync(index);
                }
            }
        }));

        let range = RangeEditor::new(&render_control, context.range_precision());
        let range_tooltip = (!has_slicing).then(|| {
            let (lo, hi) = image.image_min_max();
            format!(
                "You can change the currently displayed intensity range by entering low and high limits here.\n\
                 Image min: {} max: {}",
                format_g(lo, 6),
                format_g(hi, 6)
            )
        });

        let center_visible = image.plot_projection() == image.projection();
        let menu = ImageMenu::new(&name, false, !center_visible);
        debug!(
            "panel '{name}' for {} with {} selectors",
            image.id(),
            slicers.len()
        );

        Self {
            image,
            context,
            render_control,
            name,
            label_bold: false,
            label_tooltip,
            center_visible,
            center_tooltip,
            raise_tooltip: RAISE_TOOLTIP_INITIAL,
            can_raise: false,
            menu,
            menu_requested: false,
            render_shortcut: None,
            slicers,
            has_slicing,
            range,
            range_tooltip,
            border: None,
            label: None,
            control_dialog: None,
            _connections: connections,
        }
    }

    #[must_use]
    pub fn image(&self) -> &Rc<SkyImage> {
        &self.image
    }

    #[must_use]
    pub fn render_control(&self) -> &Rc<RenderControl> {
        &self.render_control
    }

    #[must_use]
    pub fn context(&self) -> &Rc<ViewerContext> {
        &self.context
    }

    #[must_use]
    pub fn menu(&self) -> &ImageMenu {
        &self.menu
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        self.image.filename()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Name label text; shown bold when the image is on top.
    #[must_use]
    pub fn label_text(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label_is_bold(&self) -> bool {
        self.label_bold
    }

    #[must_use]
    pub fn label_tooltip(&self) -> &str {
        &self.label_tooltip
    }

    /// Whether the centring indicator is shown.
    #[must_use]
    pub fn center_icon_visible(&self) -> bool {
        self.center_visible
    }

    #[must_use]
    pub fn center_tooltip(&self) -> &str {
        &self.center_tooltip
    }

    #[must_use]
    pub fn raise_tooltip(&self) -> &str {
        self.raise_tooltip
    }

    #[must_use]
    pub fn can_raise(&self) -> bool {
        self.can_raise
    }

    /// Key bound to the render controls while this image is on top.
    #[must_use]
    pub fn render_controls_shortcut(&self) -> Option<&str> {
        self.render_shortcut.as_deref()
    }

    #[must_use]
    pub fn slicers(&self) -> &[SliceSelector] {
        &self.slicers
    }

    /// Whether any extra axis has more than one position.
    #[must_use]
    pub fn has_slicing(&self) -> bool {
        self.has_slicing
    }

    /// The min/max fields.
    #[must_use]
    pub fn range(&self) -> &RangeEditor {
        &self.range
    }

    #[must_use]
    pub fn range_tooltip(&self) -> Option<&str> {
        self.range_tooltip.as_deref()
    }

    #[must_use]
    pub fn border(&self) -> Option<&BorderCurve> {
        self.border.as_ref()
    }

    #[must_use]
    pub fn border_label(&self) -> Option<&BorderLabel> {
        self.label.as_ref()
    }

    #[must_use]
    pub fn control_dialog(&self) -> Option<&ImageControlDialog> {
        self.control_dialog.as_ref()
    }

    pub fn control_dialog_mut(&mut self) -> Option<&mut ImageControlDialog> {
        self.control_dialog.as_mut()
    }

    /// Project the image onto the plot's projection and update the centring indicator.
    pub fn set_plot_projection(&mut self, projection: Projection) {
        self.image.set_plot_projection(projection);
        let same = projection == self.image.projection();
        self.center_visible = same;
        self.menu.entry_mut(MenuAction::Center).visible = !same;
    }

    /// Create the outline and optional label drawn around the image.
    pub fn add_plot_border(
        &mut self,
        pen: Pen,
        label: Option<&str>,
        label_color: Option<Color>,
        background: Option<Color>,
    ) {
        let extents = self.image.get_extents();
        let z = self.image.z();
        self.border = Some(BorderCurve::new(extents, pen, z + 1));
        self.label = label.filter(|text| !text.is_empty()).map(|text| {
            let ((_, l1), (_, m1)) = extents;
            BorderLabel::new(text, (l1, m1), label_color, background, z + 2)
        });
    }

    /// Recolour the border and/or label; `None` leaves a colour unchanged.
    pub fn set_plot_border_style(&mut self, border_color: Option<Color>, label_color: Option<Color>) {
        if let (Some(color), Some(border)) = (border_color, &self.border) {
            border.set_color(color);
        }
        if let (Some(color), Some(label)) = (label_color, &self.label) {
            label.set_color(color);
        }
    }

    pub fn show_plot_border(&mut self, visible: bool) {
        if let Some(border) = &self.border {
            border.set_visible(visible);
        }
        if let Some(label) = &self.label {
            label.set_visible(visible);
        }
    }

    /// Attach the image and its decorations to `surface`.
    pub fn attach_to_plot(&self, surface: &PlotSurface) {
        for item in self.plot_items() {
            if item.plot() != Some(surface.id()) {
                item.attach(surface);
            }
        }
    }

    /// The image, border and label, whichever exist.
    pub fn plot_items(&self) -> impl Iterator<Item = &dyn PlotItem> {
        let image: &dyn PlotItem = self.image.as_ref();
        std::iter::once(image)
            .chain(self.border.as_ref().map(|b| b as &dyn PlotItem))
            .chain(self.label.as_ref().map(|l| l as &dyn PlotItem))
    }

    pub fn set_image_visible(&self, visible: bool) {
        self.image.set_visible(visible);
    }

    /// Toggle the render-control dialog, creating it on first use.
    pub fn show_render_controls(&mut self) {
        let dialog = self.control_dialog.get_or_insert_with(|| {
            ImageControlDialog::new(
                &self.name,
                Rc::clone(&self.render_control),
                Rc::clone(&self.context),
            )
        });
        if dialog.is_visible() {
            dialog.hide();
        } else {
            dialog.show();
        }
    }

    /// Write `(dmin, dmax)` into the min/max fields.
    pub fn update_display_range(&self, dmin: f64, dmax: f64) {
        self.range.show_range(dmin, dmax);
    }

    /// Commit the min/max fields to the render control.
    ///
    /// Text that does not parse as two numbers is ignored.
    pub fn change_display_range(&self) {
        self.range.commit(&self.render_control);
    }

    #[must_use]
    pub fn current_slice(&self) -> Vec<usize> {
        self.render_control.current_slice()
    }

    /// Select position `index` on extra axis `axis`, keeping the other axes.
    pub fn change_slice(&self, axis: usize, index: usize) {
        request_slice(&self.render_control, axis, index);
    }

    /// Step the selector of `axis` by `delta`, wrapping around.
    pub fn increment_slice(&self, axis: usize, delta: isize) {
        let Some(slicer) = self.slicers.get(axis) else {
            return;
        };
        let count = slicer.count();
        if count == 0 {
            return;
        }
        let current = self.render_control.current_slice()[axis];
        let count_i = isize::try_from(count).unwrap_or(isize::MAX);
        let step = usize::try_from(delta.rem_euclid(count_i)).unwrap_or(0);
        slicer.set_current_index((current + step) % count);
    }

    /// Set the stacking depth and the top/raise state.
    ///
    /// The image is drawn at `z`, its border at `z + 1` and its label at `z + 2`.
    pub fn set_z(&mut self, z: i32, top: bool, can_raise: bool) {
        for (offset, item) in (0..).zip(self.plot_items()) {
            item.set_z(z + offset);
        }
        self.label_bold = top;

        self.render_shortcut = top.then(|| self.context.config().render_controls_key.clone());
        self.menu.entry_mut(MenuAction::ShowRenderControls).shortcut = self.render_shortcut.clone();

        self.can_raise = can_raise;
        self.menu.entry_mut(MenuAction::Raise).visible = can_raise;
        self.raise_tooltip = if can_raise {
            RAISE_TOOLTIP_CAN_RAISE
        } else {
            RAISE_TOOLTIP_MENU_ONLY
        };
        debug!("'{}' z={z} top={top} can_raise={can_raise}", self.name);
    }

    /// Handle a click on the raise button.
    pub fn activate_raise(&mut self) -> RaiseOutcome {
        if self.can_raise {
            self.image.emit(ImageEvent::Raise);
            RaiseOutcome::RaiseRequested
        } else {
            self.menu_requested = true;
            RaiseOutcome::MenuOpened
        }
    }

    /// Whether the menu was asked to open since the last call.
    pub fn take_menu_request(&mut self) -> bool {
        std::mem::take(&mut self.menu_requested)
    }

    /// Run a menu entry.
    pub fn trigger(&mut self, action: MenuAction) {
        match action {
            MenuAction::Raise => self.image.emit(ImageEvent::Raise),
            MenuAction::Center => self.image.emit(ImageEvent::Center),
            MenuAction::ShowRenderControls => self.show_render_controls(),
            MenuAction::Unload => self.image.emit(ImageEvent::Unload),
        }
    }

    /// Close and release the control dialog, if one was created.
    pub fn close(&mut self) {
        if let Some(mut dialog) = self.control_dialog.take() {
            dialog.close();
        }
    }
}

impl Drop for ImageDisplayPanel {
    fn drop(&mut self) {
        self.close();
    }
}

impl PartialEq for ImageDisplayPanel {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ImageDisplayPanel {}

impl std::fmt::Debug for ImageDisplayPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDisplayPanel")
            .field("name", &self.name)
            .field("image", &self.image.id())
            .field("can_raise", &self.can_raise)
            .field("has_slicing", &self.has_slicing)
            .finish_non_exhaustive()
    }
}

fn request_slice(rc: &RenderControl, axis: usize, index: usize) {
    let mut slice = rc.current_slice();
    let Some(entry) = slice.get_mut(axis) else {
        warn!("no extra axis {axis} on {}", rc.image().id());
        return;
    };
    *entry = index;
    if let Err(e) = rc.select_slice(&slice) {
        warn!("slice request dropped: {e}");
    }
}

fn basename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
        .to_string()
}
