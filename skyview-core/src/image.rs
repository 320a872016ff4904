//! Sky images: a pixel cube with two spatial axes and any number of
//! extra axes (Stokes, frequency, time, ...), plus the display state the
//! viewer keeps per image.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use ndarray::{ArrayD, ArrayView2, Axis, Ix2};

use crate::error::{Error, Result};
use crate::plot::{impl_plot_item, ItemState, PlotItem, PlotSurface, SurfaceId};
use crate::projection::Projection;
use crate::signal::Signal;

/// Unique identity of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

static NEXT_IMAGE: AtomicU64 = AtomicU64::new(1);

impl ImageId {
    fn next() -> Self {
        Self(NEXT_IMAGE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// Notifications emitted by an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEvent {
    /// The user asked to raise this image above the others.
    Raise,
    /// The user asked to centre the plot on this image.
    Center,
    /// The user asked to unload this image.
    Unload,
    /// The displayed slice changed; the plane must be redrawn.
    Slice,
    /// Display range, colormap or intensity map changed.
    Repaint,
}

/// One non-spatial axis of the cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraAxis {
    /// Axis number within the cube (2 for the first extra axis).
    pub number: usize,
    pub name: String,
    /// One label per position along the axis.
    pub labels: Vec<String>,
}

impl ExtraAxis {
    /// Extra axis description; the axis number is assigned by [`SkyImage::new`].
    pub fn new<S: Into<String>>(name: impl Into<String>, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            number: 0,
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Linear mapping from pixel indices to sky offsets (radians) on the spatial axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    /// Reference pixel (l, m).
    pub ref_pixel: (usize, usize),
    /// Sky offset of the reference pixel.
    pub ref_coord: (f64, f64),
    /// Increment per pixel.
    pub delta: (f64, f64),
}

impl PixelGrid {
    /// Grid centred on the middle pixel of an `nx × ny` plane.
    #[must_use]
    pub fn centred(nx: usize, ny: usize, delta: f64) -> Self {
        Self {
            ref_pixel: (nx / 2, ny / 2),
            ref_coord: (0.0, 0.0),
            delta: (delta, delta),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn edges(ref_pixel: usize, ref_coord: f64, delta: f64, n: usize) -> (f64, f64) {
        let first = ref_coord + (0.0 - ref_pixel as f64) * delta - delta / 2.0;
        let last = ref_coord + (n as f64 - 1.0 - ref_pixel as f64) * delta + delta / 2.0;
        if first <= last {
            (first, last)
        } else {
            (last, first)
        }
    }
}

/// An image loaded into the viewer.
pub struct SkyImage {
    id: ImageId,
    name: String,
    filename: String,
    data: ArrayD<f32>,
    extra_axes: Vec<ExtraAxis>,
    grid: PixelGrid,
    projection: Projection,
    plot_projection: Cell<Projection>,
    slice: RefCell<Vec<usize>>,
    state: ItemState,
    events: Signal<ImageEvent>,
}

impl SkyImage {
    /// Build an image from a cube whose axes 0 and 1 are l and m.
    ///
    /// `extra_axes` must describe cube axes 2.. in order, with one label per
    /// position.
    pub fn new(
        name: impl Into<String>,
        data: ArrayD<f32>,
        extra_axes: Vec<ExtraAxis>,
        grid: PixelGrid,
        projection: Projection,
    ) -> Result<Self> {
        let shape = data.shape().to_vec();
        if shape.len() < 2 || shape.len() != extra_axes.len() + 2 {
            return Err(Error::InvalidShape { shape });
        }

        let mut extra_axes = extra_axes;
        for (i, axis) in extra_axes.iter_mut().enumerate() {
            axis.number = i + 2;
            if axis.labels.len() != shape[axis.number] {
                return Err(Error::AxisLabelCount {
                    axis: axis.number,
                    name: axis.name.clone(),
                    expected: shape[axis.number],
                    found: axis.labels.len(),
                });
            }
        }

        let name = name.into();
        let n_extra = extra_axes.len();
        let id = ImageId::next();
        debug!("created {id} '{name}' with shape {shape:?}");
        Ok(Self {
            id,
            filename: name.clone(),
            name,
            data,
            extra_axes,
            grid,
            projection,
            plot_projection: Cell::new(projection),
            slice: RefCell::new(vec![0; n_extra]),
            state: ItemState::new(0),
            events: Signal::new(),
        })
    }

    /// Set the file the image was read from.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> ImageId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    #[must_use]
    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    #[must_use]
    pub fn reference_pixel(&self) -> (usize, usize) {
        self.grid.ref_pixel
    }

    #[must_use]
    pub fn num_extra_axes(&self) -> usize {
        self.extra_axes.len()
    }

    /// Cube axis number, name and labels of extra axis `i`.
    ///
    /// # Panics
    /// If `i >= num_extra_axes()`.
    #[must_use]
    pub fn extra_axis_number_name_labels(&self, i: usize) -> (usize, &str, &[String]) {
        let axis = &self.extra_axes[i];
        (axis.number, &axis.name, &axis.labels)
    }

    #[must_use]
    pub fn extra_axes(&self) -> &[ExtraAxis] {
        &self.extra_axes
    }

    /// Sky extents `((l0, l1), (m0, m1))` of the pixel grid, edge to edge.
    #[must_use]
    pub fn get_extents(&self) -> ((f64, f64), (f64, f64)) {
        let g = &self.grid;
        (
            PixelGrid::edges(g.ref_pixel.0, g.ref_coord.0, g.delta.0, self.data.shape()[0]),
            PixelGrid::edges(g.ref_pixel.1, g.ref_coord.1, g.delta.1, self.data.shape()[1]),
        )
    }

    /// Minimum and maximum over the whole cube, ignoring NaNs.
    #[must_use]
    pub fn image_min_max(&self) -> (f64, f64) {
        min_max(self.data.iter().copied())
    }

    /// Minimum and maximum over one plane, ignoring NaNs.
    pub fn slice_min_max(&self, slice: &[usize]) -> Result<(f64, f64)> {
        Ok(min_max(self.plane(slice)?.iter().copied()))
    }

    /// The 2-D `(l, m)` plane selected by `slice`.
    pub fn plane(&self, slice: &[usize]) -> Result<ArrayView2<'_, f32>> {
        self.check_slice(slice)?;
        let mut view = self.data.view();
        for (i, &index) in slice.iter().enumerate().rev() {
            view = view.index_axis_move(Axis(i + 2), index);
        }
        view.into_dimensionality::<Ix2>()
            .map_err(|_| Error::InvalidShape {
                shape: self.data.shape().to_vec(),
            })
    }

    /// Validate a slice vector against the extra axes.
    pub fn check_slice(&self, slice: &[usize]) -> Result<()> {
        if slice.len() != self.extra_axes.len() {
            return Err(Error::SliceLength {
                expected: self.extra_axes.len(),
                found: slice.len(),
            });
        }
        for (axis, &index) in self.extra_axes.iter().zip(slice) {
            if index >= axis.len() {
                return Err(Error::SliceIndex {
                    axis: axis.number,
                    index,
                    len: axis.len(),
                });
            }
        }
        Ok(())
    }

    /// Currently displayed slice.
    #[must_use]
    pub fn current_slice(&self) -> Vec<usize> {
        self.slice.borrow().clone()
    }

    /// Switch the displayed plane; emits [`ImageEvent::Slice`].
    pub(crate) fn select_slice(&self, slice: &[usize]) -> Result<()> {
        self.check_slice(slice)?;
        self.slice.replace(slice.to_vec());
        self.emit(ImageEvent::Slice);
        Ok(())
    }

    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    #[must_use]
    pub fn plot_projection(&self) -> Projection {
        self.plot_projection.get()
    }

    pub fn set_plot_projection(&self, projection: Projection) {
        self.plot_projection.set(projection);
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.set_visible(visible);
    }

    /// Notification channel for this image.
    #[must_use]
    pub fn events(&self) -> &Signal<ImageEvent> {
        &self.events
    }

    /// Emit `event` to every observer.
    pub fn emit(&self, event: ImageEvent) {
        self.events.emit(&event);
    }
}

impl_plot_item!(SkyImage);

impl fmt::Debug for SkyImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkyImage")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("shape", &self.data.shape())
            .field("extra_axes", &self.extra_axes)
            .finish_non_exhaustive()
    }
}

fn min_max(values: impl Iterator<Item = f32>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| !v.is_nan())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        (0.0, 0.0)
    } else {
        (f64::from(lo), f64::from(hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::IxDyn;

    fn cube() -> SkyImage {
        let data = ArrayD::from_shape_fn(IxDyn(&[4, 3, 2, 3]), |ix| {
            #[allow(clippy::cast_precision_loss)]
            let v = (ix[0] + 10 * ix[1] + 100 * ix[2] + 1000 * ix[3]) as f32;
            v
        });
        SkyImage::new(
            "cube",
            data,
            vec![
                ExtraAxis::new("STOKES", ["I", "Q"]),
                ExtraAxis::new("FREQ", ["100MHz", "200MHz", "300MHz"]),
            ],
            PixelGrid::centred(4, 3, 1.0),
            Projection::cartesian(),
        )
        .unwrap()
    }

    #[test]
    fn test_axis_numbers_assigned() {
        let img = cube();
        assert_eq!(img.num_extra_axes(), 2);
        let (n, name, labels) = img.extra_axis_number_name_labels(1);
        assert_eq!(n, 3);
        assert_eq!(name, "FREQ");
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_label_count_mismatch_rejected() {
        let data = ArrayD::zeros(IxDyn(&[2, 2, 3]));
        let err = SkyImage::new(
            "bad",
            data,
            vec![ExtraAxis::new("FREQ", ["a", "b"])],
            PixelGrid::centred(2, 2, 1.0),
            Projection::cartesian(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::AxisLabelCount { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_missing_axis_rejected() {
        let data = ArrayD::zeros(IxDyn(&[2, 2, 3]));
        let err = SkyImage::new(
            "bad",
            data,
            Vec::new(),
            PixelGrid::centred(2, 2, 1.0),
            Projection::cartesian(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidShape { .. }));
    }

    #[test]
    fn test_plane_selects_extra_axes() {
        let img = cube();
        let plane = img.plane(&[1, 2]).unwrap();
        assert_eq!(plane.shape(), &[4, 3]);
        assert_relative_eq!(plane[[3, 2]], 2123.0);
        assert_eq!(img.slice_min_max(&[1, 2]).unwrap(), (2100.0, 2123.0));
    }

    #[test]
    fn test_check_slice_bounds() {
        let img = cube();
        assert!(matches!(img.plane(&[0]), Err(Error::SliceLength { .. })));
        assert!(matches!(
            img.plane(&[2, 0]),
            Err(Error::SliceIndex { axis: 2, index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_min_max_ignores_nan() {
        let mut data = ArrayD::from_elem(IxDyn(&[2, 2]), 1.0_f32);
        data[[0, 0]] = f32::NAN;
        data[[1, 1]] = -3.0;
        let img = SkyImage::new(
            "nan",
            data,
            Vec::new(),
            PixelGrid::centred(2, 2, 1.0),
            Projection::cartesian(),
        )
        .unwrap();
        assert_eq!(img.image_min_max(), (-3.0, 1.0));
    }

    #[test]
    fn test_extents_cover_pixel_edges() {
        let img = cube();
        let ((l0, l1), (m0, m1)) = img.get_extents();
        assert_relative_eq!(l0, -2.5);
        assert_relative_eq!(l1, 1.5);
        assert_relative_eq!(m0, -1.5);
        assert_relative_eq!(m1, 1.5);
    }

    #[test]
    fn test_negative_increment_keeps_order() {
        let data = ArrayD::zeros(IxDyn(&[4, 4]));
        let grid = PixelGrid {
            ref_pixel: (2, 2),
            ref_coord: (0.0, 0.0),
            delta: (-1.0, 1.0),
        };
        let img = SkyImage::new("ra", data, Vec::new(), grid, Projection::cartesian()).unwrap();
        let ((l0, l1), _) = img.get_extents();
        assert!(l0 < l1);
        assert_relative_eq!(l0, -1.5);
        assert_relative_eq!(l1, 2.5);
    }
}
