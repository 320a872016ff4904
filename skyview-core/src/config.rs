//! Viewer configuration, persisted as JSON.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::colormap::{Colormap, IntensityMap};
use crate::error::Result;
use crate::plot::Color;

/// User-tunable viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Significant digits shown in the display-range fields.
    pub range_precision: usize,
    /// Key that opens the render controls of the top image.
    pub render_controls_key: String,
    /// Colour of image borders.
    pub border_color: Color,
    /// Colour of image labels.
    pub label_color: Color,
    /// Background behind image labels.
    pub label_background: Option<Color>,
    /// Colormap given to newly loaded images.
    pub default_colormap: Colormap,
    /// Intensity map given to newly loaded images.
    pub default_intensity_map: IntensityMap,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            range_precision: 4,
            render_controls_key: "F9".to_string(),
            border_color: Color::rgb(0x4a, 0x9e, 0xff),
            label_color: Color::WHITE,
            label_background: Some(Color::rgba(0, 0, 0, 160)),
            default_colormap: Colormap::Greyscale,
            default_intensity_map: IntensityMap::Linear,
            window_size: [1200.0, 800.0],
        }
    }
}

impl ViewerConfig {
    /// Read a configuration file; missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skyview.json");
        let config = ViewerConfig {
            range_precision: 6,
            default_colormap: Colormap::Viridis,
            label_background: None,
            ..ViewerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "render_controls_key": "F2" }}"#).unwrap();
        let config = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(config.render_controls_key, "F2");
        assert_eq!(config.range_precision, 4);
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ViewerConfig::load(file.path()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::load("/nonexistent/skyview.json"),
            Err(Error::Io(_))
        ));
    }
}
