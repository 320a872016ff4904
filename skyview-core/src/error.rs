//! Error types for skyview-core.

use thiserror::Error;

use crate::image::ImageId;

/// Result type alias for skyview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for skyview operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Pixel cube does not have at least two spatial axes.
    #[error("invalid image shape {shape:?}: need at least 2 axes")]
    InvalidShape { shape: Vec<usize> },

    /// Extra-axis label list disagrees with the cube shape.
    #[error("axis {axis} ({name}) has length {expected} but {found} labels were given")]
    AxisLabelCount {
        axis: usize,
        name: String,
        expected: usize,
        found: usize,
    },

    /// Slice vector has the wrong number of entries.
    #[error("slice has {found} entries, image has {expected} extra axes")]
    SliceLength { expected: usize, found: usize },

    /// Slice index beyond the end of an extra axis.
    #[error("slice index {index} out of range for axis {axis} of length {len}")]
    SliceIndex { axis: usize, index: usize, len: usize },

    /// No image with this id is managed.
    #[error("unknown image: {0}")]
    UnknownImage(ImageId),

    /// Configuration file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or written.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
