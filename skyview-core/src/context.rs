//! State shared by every image the manager holds.

use crate::config::ViewerConfig;

/// Context handed from the image manager to each display panel and on to
/// its control dialog.
#[derive(Debug, Default)]
pub struct ViewerContext {
    config: ViewerConfig,
}

impl ViewerContext {
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Significant digits for display-range text, at least 1.
    #[must_use]
    pub fn range_precision(&self) -> usize {
        self.config.range_precision.max(1)
    }
}
