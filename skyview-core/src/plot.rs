//! Plot decorations and surfaces.
//!
//! The viewer draws each image with an optional rectangular border and a
//! text label on a [`PlotSurface`]. Items record which surface they are
//! attached to and their stacking depth; the renderer draws attached items
//! in ascending z order.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    /// Opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Color,
    pub width: f32,
}

impl Pen {
    #[must_use]
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Identity of a plot surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// A rendering surface items can be attached to.
#[derive(Debug)]
pub struct PlotSurface {
    id: SurfaceId,
    title: String,
}

impl PlotSurface {
    /// Creates a surface with a fresh identity.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SurfaceId(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed)),
            title: title.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Something that can be drawn on a [`PlotSurface`].
pub trait PlotItem {
    /// Surface the item is attached to, if any.
    fn plot(&self) -> Option<SurfaceId>;

    /// Attach to `surface`, leaving any previous surface.
    fn attach(&self, surface: &PlotSurface);

    /// Stacking depth; larger is drawn later.
    fn z(&self) -> i32;

    fn set_z(&self, z: i32);

    fn is_visible(&self) -> bool;
}

/// Surface, depth and visibility shared by every decoration.
#[derive(Debug)]
pub(crate) struct ItemState {
    surface: Cell<Option<SurfaceId>>,
    z: Cell<i32>,
    visible: Cell<bool>,
}

impl ItemState {
    pub(crate) fn new(z: i32) -> Self {
        Self {
            surface: Cell::new(None),
            z: Cell::new(z),
            visible: Cell::new(true),
        }
    }

    pub(crate) fn surface(&self) -> Option<SurfaceId> {
        self.surface.get()
    }

    pub(crate) fn attach(&self, surface: &PlotSurface) {
        self.surface.set(Some(surface.id()));
    }

    pub(crate) fn z(&self) -> i32 {
        self.z.get()
    }

    pub(crate) fn set_z(&self, z: i32) {
        self.z.set(z);
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}

macro_rules! impl_plot_item {
    ($ty:ty) => {
        impl PlotItem for $ty {
            fn plot(&self) -> Option<SurfaceId> {
                self.state.surface()
            }

            fn attach(&self, surface: &PlotSurface) {
                self.state.attach(surface);
            }

            fn z(&self) -> i32 {
                self.state.z()
            }

            fn set_z(&self, z: i32) {
                self.state.set_z(z);
            }

            fn is_visible(&self) -> bool {
                self.state.is_visible()
            }
        }
    };
}

pub(crate) use impl_plot_item;

/// Closed outline drawn around an image.
#[derive(Debug)]
pub struct BorderCurve {
    xs: [f64; 5],
    ys: [f64; 5],
    pen: Cell<Pen>,
    state: ItemState,
}

impl BorderCurve {
    /// Outline of the rectangle `(l0,l1) × (m0,m1)`.
    #[must_use]
    pub fn new(extents: ((f64, f64), (f64, f64)), pen: Pen, z: i32) -> Self {
        let ((l0, l1), (m0, m1)) = extents;
        Self {
            xs: [l0, l0, l1, l1, l0],
            ys: [m0, m1, m1, m0, m0],
            pen: Cell::new(pen),
            state: ItemState::new(z),
        }
    }

    /// Polyline vertices as `(x, y)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    #[must_use]
    pub fn pen(&self) -> Pen {
        self.pen.get()
    }

    pub fn set_color(&self, color: Color) {
        let mut pen = self.pen.get();
        pen.color = color;
        self.pen.set(pen);
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.set_visible(visible);
    }
}

impl_plot_item!(BorderCurve);

/// Text marker naming an image, anchored at its top-right corner.
///
/// The text extends to the right of the anchor, vertically centred.
#[derive(Debug)]
pub struct BorderLabel {
    text: String,
    anchor: (f64, f64),
    color: Cell<Option<Color>>,
    background: Option<Color>,
    state: ItemState,
}

impl BorderLabel {
    /// Label reading `" {label} "` at `anchor`.
    #[must_use]
    pub fn new(
        label: &str,
        anchor: (f64, f64),
        color: Option<Color>,
        background: Option<Color>,
        z: i32,
    ) -> Self {
        Self {
            text: format!(" {label} "),
            anchor,
            color: Cell::new(color),
            background,
            state: ItemState::new(z),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(Some(color));
    }

    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.set_visible(visible);
    }
}

impl_plot_item!(BorderLabel);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_traces_extents() {
        let border = BorderCurve::new(((-1.0, 1.0), (-2.0, 2.0)), Pen::new(Color::WHITE, 1.0), 5);
        let pts: Vec<_> = border.points().collect();
        assert_eq!(
            pts,
            vec![(-1.0, -2.0), (-1.0, 2.0), (1.0, 2.0), (1.0, -2.0), (-1.0, -2.0)]
        );
        assert_eq!(border.z(), 5);
    }

    #[test]
    fn test_label_text_is_padded() {
        let label = BorderLabel::new("3C147", (1.0, 2.0), None, None, 0);
        assert_eq!(label.text(), " 3C147 ");
        assert_eq!(label.anchor(), (1.0, 2.0));
    }

    #[test]
    fn test_surfaces_are_distinct() {
        let a = PlotSurface::new("a");
        let b = PlotSurface::new("b");
        assert_ne!(a.id(), b.id());

        let label = BorderLabel::new("x", (0.0, 0.0), None, None, 0);
        assert_eq!(label.plot(), None);
        label.attach(&a);
        assert_eq!(label.plot(), Some(a.id()));
        label.attach(&b);
        assert_eq!(label.plot(), Some(b.id()));
    }
}
