//! Sky projections.
//!
//! Images carry the projection their pixel grid was made in; the plot has
//! a current projection chosen by the image manager. Only equality matters
//! to the display panel: when they match, the plot is centred on the image.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Projection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Orthographic (SIN) projection.
    Sin,
    /// Gnomonic (TAN) projection.
    Tan,
    /// Flat, no sky coordinates.
    Cartesian,
}

/// A projection centred on a sky position (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub kind: ProjectionKind,
    pub ra0: f64,
    pub dec0: f64,
}

impl Projection {
    /// Creates a projection of `kind` centred on `(ra0, dec0)`.
    #[must_use]
    pub fn new(kind: ProjectionKind, ra0: f64, dec0: f64) -> Self {
        Self { kind, ra0, dec0 }
    }

    /// Flat projection centred on the origin.
    #[must_use]
    pub fn cartesian() -> Self {
        Self::new(ProjectionKind::Cartesian, 0.0, 0.0)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::cartesian()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            ProjectionKind::Sin => "SIN",
            ProjectionKind::Tan => "TAN",
            ProjectionKind::Cartesian => "CAR",
        };
        write!(
            f,
            "{name}({:.4}°, {:.4}°)",
            self.ra0.to_degrees(),
            self.dec0.to_degrees()
        )
    }
}
