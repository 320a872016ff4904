//! Where an image and its decorations land on the sky plot.
//!
//! Plot coordinates are degrees of offset from the plot projection centre.
//! Each image is shifted by the distance between its own projection centre
//! and the plot's; no resampling is done.

use skyview_core::{Projection, ProjectionKind, SkyImage};

/// Offset, in radians, of `image`'s centre from its plot projection centre.
fn centre_offset(image: &SkyImage) -> (f64, f64) {
    let own = image.projection();
    let plot = image.plot_projection();
    if own.kind == ProjectionKind::Cartesian || plot.kind == ProjectionKind::Cartesian {
        return (0.0, 0.0);
    }
    ((own.ra0 - plot.ra0) * plot.dec0.cos(), own.dec0 - plot.dec0)
}

/// Map an image-frame point `(l, m)` in radians to plot coordinates.
pub fn to_plot(image: &SkyImage, (l, m): (f64, f64)) -> [f64; 2] {
    let (dl, dm) = centre_offset(image);
    [(l + dl).to_degrees(), (m + dm).to_degrees()]
}

/// Plot-space centre and size of the image rectangle.
pub fn image_rect(image: &SkyImage) -> ([f64; 2], [f64; 2]) {
    let ((l0, l1), (m0, m1)) = image.get_extents();
    let lo = to_plot(image, (l0, m0));
    let hi = to_plot(image, (l1, m1));
    (
        [(lo[0] + hi[0]) / 2.0, (lo[1] + hi[1]) / 2.0],
        [hi[0] - lo[0], hi[1] - lo[1]],
    )
}

/// Short description of a projection for the status bar.
pub fn describe(projection: Option<Projection>) -> String {
    projection.map_or_else(|| "no images".to_string(), |p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use skyview_core::{ExtraAxis, PixelGrid};

    fn image(ra0: f64) -> SkyImage {
        SkyImage::new(
            "p",
            ArrayD::zeros(IxDyn(&[4, 2, 1])),
            vec![ExtraAxis::new("FREQ", ["f"])],
            PixelGrid::centred(4, 2, 0.01),
            Projection::new(ProjectionKind::Sin, ra0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_rect_matches_extents_when_centred() {
        let img = image(1.0);
        let ((l0, l1), (m0, m1)) = img.get_extents();
        let (center, size) = image_rect(&img);
        assert!((center[0] - ((l0 + l1) / 2.0).to_degrees()).abs() < 1e-12);
        assert!((size[0] - (l1 - l0).to_degrees()).abs() < 1e-12);
        assert!((size[1] - (m1 - m0).to_degrees()).abs() < 1e-12);
    }

    #[test]
    fn test_offset_follows_plot_projection() {
        let img = image(1.0);
        let before = to_plot(&img, (0.0, 0.0));
        img.set_plot_projection(Projection::new(ProjectionKind::Sin, 0.99, 0.0));
        let after = to_plot(&img, (0.0, 0.0));
        assert!((after[0] - before[0] - 0.01_f64.to_degrees()).abs() < 1e-9);
        assert_eq!(after[1], before[1]);
    }
}
