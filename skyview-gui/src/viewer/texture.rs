//! Texture generation for image planes.

use egui::ColorImage;
use skyview_core::{Result, RenderControl};

/// Render the current plane through the display range, intensity map and colormap.
///
/// Rows run from high to low m so the plane appears north-up. NaN pixels
/// are left transparent.
pub fn render_plane(rc: &RenderControl) -> Result<ColorImage> {
    let image = rc.image();
    let plane = image.plane(&rc.current_slice())?;
    let (nl, nm) = plane.dim();
    let colormap = rc.colormap();

    let mut pixels = vec![0u8; nl * nm * 4];
    for row in 0..nm {
        let m = nm - 1 - row;
        for l in 0..nl {
            let value = rc.normalize(plane[[l, m]]);
            if value.is_nan() {
                continue;
            }
            let offset = (row * nl + l) * 4;
            pixels[offset..offset + 4].copy_from_slice(&colormap.apply(value));
        }
    }

    Ok(ColorImage::from_rgba_unmultiplied([nl, nm], &pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};
    use skyview_core::{Colormap, ExtraAxis, PixelGrid, Projection, SkyImage};
    use std::rc::Rc;

    fn control() -> RenderControl {
        // l runs 0..3, m runs 0..2; value = l + 10 m, with one NaN.
        #[allow(clippy::cast_precision_loss)]
        let data = ArrayD::from_shape_fn(IxDyn(&[3, 2, 1]), |ix| {
            if ix[0] == 2 && ix[1] == 0 {
                f32::NAN
            } else {
                (ix[0] + 10 * ix[1]) as f32
            }
        });
        let image = SkyImage::new(
            "t",
            data,
            vec![ExtraAxis::new("FREQ", ["f"])],
            PixelGrid::centred(3, 2, 1.0),
            Projection::cartesian(),
        )
        .unwrap();
        RenderControl::new(Rc::new(image)).with_colormap(Colormap::Greyscale)
    }

    #[test]
    fn test_plane_is_north_up() {
        let image = render_plane(&control()).unwrap();
        assert_eq!(image.size, [3, 2]);
        // Top row is m = 1; its last pixel holds the maximum.
        assert_eq!(image.pixels[2].r(), 255);
        // Bottom-left is (l=0, m=0): the minimum, black.
        assert_eq!(image.pixels[3].r(), 0);
    }

    #[test]
    fn test_nan_is_transparent() {
        let image = render_plane(&control()).unwrap();
        assert_eq!(image.pixels[5].a(), 0);
    }
}
