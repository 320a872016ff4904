//! Colormaps and intensity maps used when rendering an image plane.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Available colormaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Colormap {
    /// Black to white.
    #[default]
    Greyscale,
    /// Black to red to yellow to white.
    Hot,
    /// Approximate viridis: blue to teal to green to yellow.
    Viridis,
    /// Black to bright green.
    Green,
}

impl Colormap {
    pub const ALL: [Colormap; 4] = [
        Colormap::Greyscale,
        Colormap::Hot,
        Colormap::Viridis,
        Colormap::Green,
    ];

    /// Map a normalized value in `[0, 1]` to RGBA bytes.
    #[must_use]
    pub fn apply(self, val: f32) -> [u8; 4] {
        let val = if val.is_nan() { 0.0 } else { val.clamp(0.0, 1.0) };
        match self {
            Colormap::Greyscale => {
                let v = unit_to_u8(val);
                [v, v, v, 255]
            }
            Colormap::Green => [0, unit_to_u8(val), 0, 255],
            Colormap::Hot => {
                let third = 1.0 / 3.0;
                if val < third {
                    [unit_to_u8(val * 3.0), 0, 0, 255]
                } else if val < 2.0 * third {
                    [255, unit_to_u8((val - third) * 3.0), 0, 255]
                } else {
                    [255, 255, unit_to_u8((val - 2.0 * third) * 3.0), 255]
                }
            }
            Colormap::Viridis => [
                unit_to_u8(val.powf(2.0)),
                unit_to_u8(val),
                unit_to_u8(1.0 - val),
                255,
            ],
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colormap::Greyscale => write!(f, "Greyscale"),
            Colormap::Hot => write!(f, "Hot"),
            Colormap::Viridis => write!(f, "Viridis"),
            Colormap::Green => write!(f, "Green"),
        }
    }
}

/// Transfer function applied after the display range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntensityMap {
    #[default]
    Linear,
    /// `log10(1 + 9t)`, stretching faint emission.
    Log,
    Sqrt,
}

impl IntensityMap {
    pub const ALL: [IntensityMap; 3] = [IntensityMap::Linear, IntensityMap::Log, IntensityMap::Sqrt];

    /// Map `t` in `[0, 1]` onto `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            IntensityMap::Linear => t,
            IntensityMap::Log => (1.0 + 9.0 * t).log10(),
            IntensityMap::Sqrt => t.sqrt(),
        }
    }
}

impl fmt::Display for IntensityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntensityMap::Linear => write!(f, "Linear"),
            IntensityMap::Log => write!(f, "Logarithmic"),
            IntensityMap::Sqrt => write!(f, "Square root"),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(Colormap::Greyscale.apply(0.0), [0, 0, 0, 255]);
        assert_eq!(Colormap::Greyscale.apply(1.0), [255, 255, 255, 255]);
        assert_eq!(Colormap::Hot.apply(0.0), [0, 0, 0, 255]);
        assert_eq!(Colormap::Hot.apply(1.0), [255, 255, 255, 255]);
        assert_eq!(Colormap::Green.apply(2.0), [0, 255, 0, 255]);
        assert_eq!(Colormap::Viridis.apply(f32::NAN), [0, 0, 255, 255]);
    }

    #[test]
    fn test_hot_passes_through_red_and_yellow() {
        let [r, g, b, _] = Colormap::Hot.apply(0.2);
        assert!(r > 0 && g == 0 && b == 0);
        assert_eq!(Colormap::Hot.apply(0.5)[0], 255);
        assert!(Colormap::Hot.apply(0.5)[1] > 0);
        assert_eq!(&Colormap::Hot.apply(0.8)[..2], &[255, 255]);
    }

    #[test]
    fn test_intensity_maps_fix_endpoints() {
        for map in IntensityMap::ALL {
            assert_relative_eq!(map.apply(0.0), 0.0);
            assert_relative_eq!(map.apply(1.0), 1.0);
        }
        assert!(IntensityMap::Log.apply(0.1) > IntensityMap::Linear.apply(0.1));
        assert_relative_eq!(IntensityMap::Sqrt.apply(0.25), 0.5);
    }
}
