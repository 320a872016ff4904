//! Synthetic images shown at startup.
//!
//! A polarised, multi-channel cube and a single-plane continuum map of a
//! neighbouring field, so every panel control has something to act on.

use ndarray::{ArrayD, IxDyn};
use skyview_core::{ExtraAxis, PixelGrid, Projection, ProjectionKind, SkyImage};

use crate::util::usize_to_f64;

const STOKES_LABELS: [&str; 4] = ["I", "Q", "U", "V"];
/// Fractional polarisation of the demo sources per Stokes plane.
const STOKES_FRACTION: [f64; 4] = [1.0, 0.3, -0.2, 0.05];

/// Pixel increment of the demo images: one arcminute.
const CELL: f64 = std::f64::consts::PI / (180.0 * 60.0);

/// Shape of the demo cube.
#[derive(Debug, Clone, Copy)]
pub struct DemoShape {
    pub stokes: usize,
    pub channels: usize,
    pub size: usize,
}

struct Source {
    x: f64,
    y: f64,
    flux: f64,
    width: f64,
    spectral_index: f64,
}

fn sources(size: usize) -> [Source; 3] {
    let n = usize_to_f64(size);
    [
        Source {
            x: 0.5 * n,
            y: 0.5 * n,
            flux: 10.0,
            width: 0.06 * n,
            spectral_index: -0.7,
        },
        Source {
            x: 0.25 * n,
            y: 0.7 * n,
            flux: 3.0,
            width: 0.03 * n,
            spectral_index: 0.5,
        },
        Source {
            x: 0.75 * n,
            y: 0.3 * n,
            flux: 1.5,
            width: 0.1 * n,
            spectral_index: -1.5,
        },
    ]
}

fn brightness(sources: &[Source], x: f64, y: f64, freq_ratio: f64) -> f64 {
    sources
        .iter()
        .map(|s| {
            let r2 = ((x - s.x).powi(2) + (y - s.y).powi(2)) / (2.0 * s.width.powi(2));
            s.flux * freq_ratio.powf(s.spectral_index) * (-r2).exp()
        })
        .sum()
}

fn frequency_mhz(channel: usize) -> f64 {
    1400.0 + 8.0 * usize_to_f64(channel)
}

/// A `size × size × stokes × channels` cube on a SIN grid.
pub fn demo_cube(shape: &DemoShape) -> skyview_core::Result<SkyImage> {
    let stokes = shape.stokes.clamp(1, STOKES_LABELS.len());
    let srcs = sources(shape.size);
    #[allow(clippy::cast_possible_truncation)]
    let data = ArrayD::from_shape_fn(
        IxDyn(&[shape.size, shape.size, stokes, shape.channels]),
        |ix| {
            let ratio = frequency_mhz(ix[3]) / frequency_mhz(0);
            let value = brightness(&srcs, usize_to_f64(ix[0]), usize_to_f64(ix[1]), ratio);
            (value * STOKES_FRACTION[ix[2]]) as f32
        },
    );
    let freq_labels = (0..shape.channels).map(|c| format!("{:.0} MHz", frequency_mhz(c)));

    Ok(SkyImage::new(
        "3C286 cube",
        data,
        vec![
            ExtraAxis::new("STOKES", STOKES_LABELS[..stokes].iter().copied()),
            ExtraAxis::new("FREQ", freq_labels),
        ],
        PixelGrid::centred(shape.size, shape.size, CELL),
        Projection::new(ProjectionKind::Sin, 3.539_3, 0.532_0),
    )?
    .with_filename("demo/3c286_cube.fits"))
}

/// A single-plane map offset from the cube's field.
pub fn demo_continuum(shape: &DemoShape) -> skyview_core::Result<SkyImage> {
    let size = shape.size / 2;
    let srcs = sources(size);
    #[allow(clippy::cast_possible_truncation)]
    let data = ArrayD::from_shape_fn(IxDyn(&[size, size, 1]), |ix| {
        let mut value = brightness(&srcs, usize_to_f64(ix[0]), usize_to_f64(ix[1]), 1.0);
        if (ix[0] + ix[1]) % 97 == 0 {
            value = f64::NAN;
        }
        value as f32
    });
    Ok(SkyImage::new(
        "continuum",
        data,
        vec![ExtraAxis::new("FREQ", ["1.4 GHz"])],
        PixelGrid::centred(size, size, 2.0 * CELL),
        Projection::new(ProjectionKind::Sin, 3.545_0, 0.540_0),
    )?
    .with_filename("demo/field_continuum.fits"))
}

/// Images to load at startup with their display names.
pub fn demo_images(shape: &DemoShape) -> skyview_core::Result<Vec<(SkyImage, Option<&'static str>)>> {
    Ok(vec![
        (demo_continuum(shape)?, Some("continuum.fits")),
        (demo_cube(shape)?, None),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_axes() {
        let shape = DemoShape {
            stokes: 2,
            channels: 5,
            size: 16,
        };
        let cube = demo_cube(&shape).unwrap();
        assert_eq!(cube.shape(), [16, 16, 2, 5]);
        let (_, name, labels) = cube.extra_axis_number_name_labels(0);
        assert_eq!(name, "STOKES");
        assert_eq!(labels, ["I", "Q"]);
        assert_eq!(cube.extra_axes()[1].labels[1], "1408 MHz");
    }

    #[test]
    fn test_continuum_has_no_slicing() {
        let shape = DemoShape {
            stokes: 1,
            channels: 1,
            size: 32,
        };
        let images = demo_images(&shape).unwrap();
        assert_eq!(images.len(), 2);
        let (continuum, name) = &images[0];
        assert_eq!(*name, Some("continuum.fits"));
        assert!(continuum.extra_axes().iter().all(|a| a.len() == 1));
        assert_ne!(continuum.projection(), images[1].0.projection());
    }
}
