//! skyview-core: display controls for images in an astronomical sky viewer.
//!
//! This crate holds everything the viewer knows about a loaded image that
//! does not depend on a GUI toolkit: the image cube and its extra axes,
//! the render control owning display range, slice and colour settings, the
//! per-image display panel state machine, its control dialog, plot
//! decorations and the manager that stacks images.
//!
//! All types are single-threaded. Collaborators talk through
//! [`signal::Signal`] notification channels whose callbacks run
//! synchronously on the emitting thread.

pub mod colormap;
pub mod config;
pub mod context;
pub mod dialog;
pub mod error;
pub mod format;
pub mod image;
pub mod manager;
pub mod panel;
pub mod plot;
pub mod projection;
pub mod range;
pub mod render;
pub mod signal;
pub mod slicer;

pub use colormap::{Colormap, IntensityMap};
pub use config::ViewerConfig;
pub use context::ViewerContext;
pub use dialog::ImageControlDialog;
pub use error::{Error, Result};
pub use image::{ExtraAxis, ImageEvent, ImageId, PixelGrid, SkyImage};
pub use manager::{ImageManager, ManagerChanges};
pub use panel::{ImageDisplayPanel, ImageMenu, MenuAction, MenuEntry, RaiseOutcome};
pub use plot::{BorderCurve, BorderLabel, Color, Pen, PlotItem, PlotSurface, SurfaceId};
pub use projection::{Projection, ProjectionKind};
pub use range::RangeEditor;
pub use render::RenderControl;
pub use signal::{Connection, Signal};
pub use slicer::SliceSelector;
