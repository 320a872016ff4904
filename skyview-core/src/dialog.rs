//! Render-control dialog state.
//!
//! One dialog belongs to one display panel. It is created the first time
//! the user asks for render controls and toggled by later requests; the
//! panel closes it when the panel itself closes.

use std::rc::Rc;

use log::debug;

use crate::colormap::{Colormap, IntensityMap};
use crate::context::ViewerContext;
use crate::error::{Error, Result};
use crate::image::SkyImage;
use crate::range::RangeEditor;
use crate::render::RenderControl;

/// Colour and intensity controls for one image.
#[derive(Debug)]
pub struct ImageControlDialog {
    title: String,
    render_control: Rc<RenderControl>,
    context: Rc<ViewerContext>,
    range: RangeEditor,
    visible: bool,
    closed: bool,
}

impl ImageControlDialog {
    /// Hidden dialog for the panel named `panel_name`.
    #[must_use]
    pub fn new(panel_name: &str, rc: Rc<RenderControl>, context: Rc<ViewerContext>) -> Self {
        let range = RangeEditor::new(&rc, context.range_precision());
        debug!("created control dialog for '{panel_name}'");
        Self {
            title: format!("{panel_name}: colours & intensities"),
            render_control: rc,
            context,
            range,
            visible: false,
            closed: false,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn image(&self) -> &Rc<SkyImage> {
        self.render_control.image()
    }

    #[must_use]
    pub fn render_control(&self) -> &Rc<RenderControl> {
        &self.render_control
    }

    #[must_use]
    pub fn context(&self) -> &ViewerContext {
        &self.context
    }

    /// The dialog's own min/max entry fields.
    #[must_use]
    pub fn range(&self) -> &RangeEditor {
        &self.range
    }

    /// Show the dialog. A closed dialog stays closed.
    pub fn show(&mut self) {
        if self.closed {
            debug!("'{}' is closed, not showing", self.title);
            return;
        }
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide the dialog for good.
    pub fn close(&mut self) {
        if !self.closed {
            debug!("closing '{}'", self.title);
        }
        self.visible = false;
        self.closed = true;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn reset_full_range(&self) {
        self.render_control.reset_full_range();
    }

    pub fn reset_slice_range(&self) -> Result<()> {
        self.render_control.reset_slice_range()
    }

    /// Commit the dialog's range fields.
    pub fn apply_range(&self) -> bool {
        self.range.commit(&self.render_control)
    }

    pub fn set_colormap(&self, colormap: Colormap) {
        self.render_control.set_colormap(colormap);
    }

    pub fn set_intensity_map(&self, map: IntensityMap) {
        self.render_control.set_intensity_map(map);
    }

    /// Select position `index` on extra axis `axis`, keeping the other axes.
    pub fn select_slice_index(&self, axis: usize, index: usize) -> Result<()> {
        let mut slice = self.render_control.current_slice();
        let expected = slice.len();
        let entry = slice.get_mut(axis).ok_or(Error::SliceLength {
            expected,
            found: axis + 1,
        })?;
        *entry = index;
        self.render_control.select_slice(&slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ExtraAxis, PixelGrid};
    use crate::projection::Projection;
    use ndarray::{ArrayD, IxDyn};

    fn dialog() -> ImageControlDialog {
        #[allow(clippy::cast_precision_loss)]
        let data = ArrayD::from_shape_fn(IxDyn(&[2, 2, 2]), |ix| (ix[0] + ix[2] * 10) as f32);
        let image = SkyImage::new(
            "d",
            data,
            vec![ExtraAxis::new("TIME", ["t0", "t1"])],
            PixelGrid::centred(2, 2, 1.0),
            Projection::cartesian(),
        )
        .unwrap();
        let rc = Rc::new(RenderControl::new(Rc::new(image)));
        ImageControlDialog::new("d", rc, Rc::new(ViewerContext::default()))
    }

    #[test]
    fn test_show_hide_close() {
        let mut dlg = dialog();
        assert!(!dlg.is_visible());
        dlg.show();
        assert!(dlg.is_visible());
        dlg.hide();
        assert!(!dlg.is_visible());
        dlg.close();
        dlg.show();
        assert!(!dlg.is_visible());
        assert!(dlg.is_closed());
    }

    #[test]
    fn test_range_fields_follow_render_control() {
        let dlg = dialog();
        assert_eq!(dlg.range().min_text(), "0");
        assert_eq!(dlg.range().max_text(), "11");

        assert!(dlg.range().edit_min("2"));
        assert!(dlg.range().edit_max("4.5"));
        assert!(dlg.apply_range());
        assert_eq!(dlg.render_control().display_range(), (2.0, 4.5));

        dlg.reset_full_range();
        assert_eq!(dlg.range().max_text(), "11");
    }

    #[test]
    fn test_slice_selection_from_dialog() {
        let dlg = dialog();
        dlg.select_slice_index(0, 1).unwrap();
        assert_eq!(dlg.render_control().current_slice(), vec![1]);
        dlg.reset_slice_range().unwrap();
        assert_eq!(dlg.render_control().display_range(), (10.0, 11.0));
    }

    #[test]
    fn test_unknown_axis_is_rejected() {
        let dlg = dialog();
        let err = dlg.select_slice_index(3, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::SliceLength {
                expected: 1,
                found: 4
            }
        ));
        assert_eq!(dlg.render_control().current_slice(), vec![0]);
    }
}
