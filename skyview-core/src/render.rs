//! Render control: the authoritative display range, slice selection and
//! colour settings of one image.
//!
//! Everything that changes how an image is drawn goes through
//! [`RenderControl`], which notifies observers (the display panel, the
//! control dialog) synchronously and asks the image to repaint.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};

use crate::colormap::{Colormap, IntensityMap};
use crate::error::Result;
use crate::image::{ImageEvent, SkyImage};
use crate::signal::Signal;

/// Display settings of one image.
pub struct RenderControl {
    image: Rc<SkyImage>,
    display_range: Cell<(f64, f64)>,
    colormap: Cell<Colormap>,
    intensity_map: Cell<IntensityMap>,
    display_range_changed: Signal<(f64, f64)>,
    slice_changed: Signal<Vec<usize>>,
}

impl RenderControl {
    /// Render control for `image`, starting at its full data range.
    #[must_use]
    pub fn new(image: Rc<SkyImage>) -> Self {
        let range = image.image_min_max();
        Self {
            image,
            display_range: Cell::new(range),
            colormap: Cell::new(Colormap::default()),
            intensity_map: Cell::new(IntensityMap::default()),
            display_range_changed: Signal::new(),
            slice_changed: Signal::new(),
        }
    }

    /// Set the initial colormap.
    #[must_use]
    pub fn with_colormap(self, colormap: Colormap) -> Self {
        self.colormap.set(colormap);
        self
    }

    /// Set the initial intensity map.
    #[must_use]
    pub fn with_intensity_map(self, map: IntensityMap) -> Self {
        self.intensity_map.set(map);
        self
    }

    #[must_use]
    pub fn image(&self) -> &Rc<SkyImage> {
        &self.image
    }

    #[must_use]
    pub fn display_range(&self) -> (f64, f64) {
        self.display_range.get()
    }

    /// Set the display range.
    ///
    /// Reversed bounds are swapped and NaN bounds are ignored. Observers
    /// of [`display_range_changed`](Self::display_range_changed) hear the
    /// stored value; nothing is emitted when the range does not change.
    pub fn set_display_range(&self, dmin: f64, dmax: f64) {
        if dmin.is_nan() || dmax.is_nan() {
            trace!("ignoring NaN display range for {}", self.image.id());
            return;
        }
        let range = if dmin > dmax { (dmax, dmin) } else { (dmin, dmax) };
        if range == self.display_range.get() {
            return;
        }
        debug!(
            "{}: display range {} .. {}",
            self.image.id(),
            range.0,
            range.1
        );
        self.display_range.set(range);
        self.display_range_changed.emit(&range);
        self.image.emit(ImageEvent::Repaint);
    }

    /// Reset the display range to the min/max of the whole cube.
    pub fn reset_full_range(&self) {
        let (lo, hi) = self.image.image_min_max();
        self.set_display_range(lo, hi);
    }

    /// Reset the display range to the min/max of the current plane.
    pub fn reset_slice_range(&self) -> Result<()> {
        let (lo, hi) = self.image.slice_min_max(&self.image.current_slice())?;
        self.set_display_range(lo, hi);
        Ok(())
    }

    /// Currently displayed slice, one index per extra axis.
    #[must_use]
    pub fn current_slice(&self) -> Vec<usize> {
        self.image.current_slice()
    }

    /// Display the plane selected by `slice`.
    ///
    /// A malformed vector is rejected; selecting the current slice is a no-op.
    pub fn select_slice(&self, slice: &[usize]) -> Result<()> {
        self.image.check_slice(slice)?;
        if self.image.current_slice() == slice {
            return Ok(());
        }
        debug!("{}: slice {slice:?}", self.image.id());
        self.image.select_slice(slice)?;
        self.slice_changed.emit(&slice.to_vec());
        Ok(())
    }

    #[must_use]
    pub fn colormap(&self) -> Colormap {
        self.colormap.get()
    }

    pub fn set_colormap(&self, colormap: Colormap) {
        if self.colormap.replace(colormap) != colormap {
            self.image.emit(ImageEvent::Repaint);
        }
    }

    #[must_use]
    pub fn intensity_map(&self) -> IntensityMap {
        self.intensity_map.get()
    }

    pub fn set_intensity_map(&self, map: IntensityMap) {
        if self.intensity_map.replace(map) != map {
            self.image.emit(ImageEvent::Repaint);
        }
    }

    /// Map a pixel value through the display range and intensity map to `[0, 1]`.
    ///
    /// NaN pixels stay NaN so the renderer can leave them blank.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn normalize(&self, value: f32) -> f32 {
        if value.is_nan() {
            return f32::NAN;
        }
        let (lo, hi) = self.display_range.get();
        let v = f64::from(value);
        let t = if hi > lo {
            (v - lo) / (hi - lo)
        } else if v >= hi {
            1.0
        } else {
            0.0
        };
        self.intensity_map.get().apply(t) as f32
    }

    /// Fires with the new `(min, max)` whenever the display range changes.
    #[must_use]
    pub fn display_range_changed(&self) -> &Signal<(f64, f64)> {
        &self.display_range_changed
    }

    /// Fires with the new slice vector whenever the slice changes.
    #[must_use]
    pub fn slice_changed(&self) -> &Signal<Vec<usize>> {
        &self.slice_changed
    }
}

impl fmt::Debug for RenderControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderControl")
            .field("image", &self.image.id())
            .field("display_range", &self.display_range.get())
            .field("colormap", &self.colormap.get())
            .field("intensity_map", &self.intensity_map.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ExtraAxis, PixelGrid};
    use crate::projection::Projection;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};
    use std::cell::RefCell;

    fn image() -> Rc<SkyImage> {
        #[allow(clippy::cast_precision_loss)]
        let data = ArrayD::from_shape_fn(IxDyn(&[2, 2, 3]), |ix| (ix[0] + 2 * ix[1] + 10 * ix[2]) as f32);
        Rc::new(
            SkyImage::new(
                "rc",
                data,
                vec![ExtraAxis::new("FREQ", ["a", "b", "c"])],
                PixelGrid::centred(2, 2, 1.0),
                Projection::cartesian(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_initial_range_is_full_range() {
        let rc = RenderControl::new(image());
        assert_eq!(rc.display_range(), (0.0, 23.0));
        assert_eq!(rc.current_slice(), vec![0]);
    }

    #[test]
    fn test_set_display_range_notifies_once() {
        let rc = RenderControl::new(image());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _c = rc
            .display_range_changed()
            .connect(move |r| sink.borrow_mut().push(*r));

        rc.set_display_range(1.0, 5.0);
        rc.set_display_range(1.0, 5.0);
        rc.set_display_range(9.0, 2.0);
        rc.set_display_range(f64::NAN, 2.0);

        assert_eq!(*seen.borrow(), vec![(1.0, 5.0), (2.0, 9.0)]);
    }

    #[test]
    fn test_display_range_change_requests_repaint() {
        let rc = RenderControl::new(image());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let _c = rc.image().events().connect(move |e| sink.borrow_mut().push(*e));

        rc.set_display_range(1.0, 2.0);
        rc.set_colormap(Colormap::Hot);
        rc.set_colormap(Colormap::Hot);
        rc.set_intensity_map(IntensityMap::Sqrt);

        assert_eq!(*events.borrow(), vec![ImageEvent::Repaint; 3]);
    }

    #[test]
    fn test_select_slice() {
        let rc = RenderControl::new(image());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _c = rc
            .slice_changed()
            .connect(move |s| sink.borrow_mut().push(s.clone()));

        rc.select_slice(&[2]).unwrap();
        rc.select_slice(&[2]).unwrap();
        assert!(rc.select_slice(&[3]).is_err());
        assert!(rc.select_slice(&[0, 0]).is_err());

        assert_eq!(rc.current_slice(), vec![2]);
        assert_eq!(*seen.borrow(), vec![vec![2]]);
    }

    #[test]
    fn test_reset_ranges() {
        let rc = RenderControl::new(image());
        rc.select_slice(&[1]).unwrap();
        rc.reset_slice_range().unwrap();
        assert_eq!(rc.display_range(), (10.0, 13.0));
        rc.reset_full_range();
        assert_eq!(rc.display_range(), (0.0, 23.0));
    }

    #[test]
    fn test_normalize() {
        let rc = RenderControl::new(image());
        rc.set_display_range(10.0, 20.0);
        assert_relative_eq!(rc.normalize(15.0), 0.5);
        assert_relative_eq!(rc.normalize(-5.0), 0.0);
        assert_relative_eq!(rc.normalize(50.0), 1.0);
        assert!(rc.normalize(f32::NAN).is_nan());

        rc.set_intensity_map(IntensityMap::Sqrt);
        assert_relative_eq!(rc.normalize(12.5), 0.5);

        rc.set_display_range(3.0, 3.0);
        assert_relative_eq!(rc.normalize(3.0), 1.0);
        assert_relative_eq!(rc.normalize(2.0), 0.0);
    }
}
