//! The image manager: owns the display panels in stacking order and acts
//! on the raise/centre/unload requests their images emit.
//!
//! Image notifications are queued on a channel and handled by
//! [`ImageManager::process_events`], called once per UI frame, so a panel
//! never has to call back into the manager that owns it.

use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};

use log::{debug, info, trace};

use crate::context::ViewerContext;
use crate::error::{Error, Result};
use crate::image::{ImageEvent, ImageId, SkyImage};
use crate::panel::ImageDisplayPanel;
use crate::plot::{Pen, PlotSurface};
use crate::projection::Projection;
use crate::signal::Connection;

/// Depth step between neighbouring images.
const Z_STEP: i32 = 10;

struct ManagedImage {
    panel: ImageDisplayPanel,
    _events: Connection,
}

/// What [`ImageManager::process_events`] changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManagerChanges {
    /// Images whose plane or colours must be redrawn.
    pub redraw: Vec<ImageId>,
    /// Images that were unloaded.
    pub unloaded: Vec<ImageId>,
    /// The stacking order changed.
    pub restacked: bool,
    /// The plot projection changed.
    pub recentred: bool,
}

impl ManagerChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.redraw.is_empty() && self.unloaded.is_empty() && !self.restacked && !self.recentred
    }
}

/// Holds every loaded image, top first.
pub struct ImageManager {
    context: Rc<ViewerContext>,
    entries: Vec<ManagedImage>,
    plot_projection: Option<Projection>,
    tx: Sender<(ImageId, ImageEvent)>,
    rx: Receiver<(ImageId, ImageEvent)>,
}

impl ImageManager {
    #[must_use]
    pub fn new(context: ViewerContext) -> Self {
        let (tx, rx) = channel();
        Self {
            context: Rc::new(context),
            entries: Vec::new(),
            plot_projection: None,
            tx,
            rx,
        }
    }

    #[must_use]
    pub fn context(&self) -> &Rc<ViewerContext> {
        &self.context
    }

    /// Add `image` on top of the stack and return its id.
    ///
    /// The first image loaded defines the plot projection.
    pub fn load_image(&mut self, image: SkyImage, name: Option<&str>) -> ImageId {
        let image = Rc::new(image);
        let id = image.id();
        let mut panel = ImageDisplayPanel::new(Rc::clone(&image), Rc::clone(&self.context), name);

        let config = self.context.config();
        let label = panel.name().to_string();
        panel.add_plot_border(
            Pen::new(config.border_color, 1.0),
            Some(&label),
            Some(config.label_color),
            config.label_background,
        );
        let projection = *self.plot_projection.get_or_insert(image.projection());
        panel.set_plot_projection(projection);

        let tx = self.tx.clone();
        let events = image.events().connect(move |event| {
            if tx.send((id, *event)).is_err() {
                trace!("manager gone, dropping {event:?} from {id}");
            }
        });

        self.entries.insert(
            0,
            ManagedImage {
                panel,
                _events: events,
            },
        );
        self.restack();
        info!("loaded {id} as '{label}'");
        id
    }

    /// Move image `id` to the top.
    pub fn raise_image(&mut self, id: ImageId) -> Result<()> {
        let pos = self.position(id)?;
        let entry = self.entries.remove(pos);
        self.entries.insert(0, entry);
        self.restack();
        debug!("raised {id}");
        Ok(())
    }

    /// Remove image `id`; its panel closes its control dialog as it drops.
    pub fn unload_image(&mut self, id: ImageId) -> Result<()> {
        let pos = self.position(id)?;
        drop(self.entries.remove(pos));
        if self.entries.is_empty() {
            self.plot_projection = None;
        }
        self.restack();
        info!("unloaded {id}");
        Ok(())
    }

    /// Switch the plot to the projection of image `id`.
    pub fn center_image(&mut self, id: ImageId) -> Result<()> {
        let pos = self.position(id)?;
        let projection = self.entries[pos].panel.image().projection();
        self.set_plot_projection(projection);
        Ok(())
    }

    /// Apply `projection` to every image.
    pub fn set_plot_projection(&mut self, projection: Projection) {
        self.plot_projection = Some(projection);
        for entry in &mut self.entries {
            entry.panel.set_plot_projection(projection);
        }
        debug!("plot projection now {projection}");
    }

    /// Handle queued image notifications.
    pub fn process_events(&mut self) -> ManagerChanges {
        let mut changes = ManagerChanges::default();
        while let Ok((id, event)) = self.rx.try_recv() {
            let handled = match event {
                ImageEvent::Raise => self.raise_image(id).map(|()| changes.restacked = true),
                ImageEvent::Unload => self.unload_image(id).map(|()| {
                    changes.unloaded.push(id);
                    changes.restacked = true;
                }),
                ImageEvent::Center => self.center_image(id).map(|()| changes.recentred = true),
                ImageEvent::Slice | ImageEvent::Repaint => {
                    if !changes.redraw.contains(&id) {
                        changes.redraw.push(id);
                    }
                    Ok(())
                }
            };
            if let Err(e) = handled {
                debug!("ignoring {event:?}: {e}");
            }
        }
        changes
    }

    /// Attach every image and decoration to `surface`.
    pub fn attach_to_plot(&self, surface: &PlotSurface) {
        for entry in &self.entries {
            entry.panel.attach_to_plot(surface);
        }
    }

    /// Panels, top first.
    pub fn panels(&self) -> impl Iterator<Item = &ImageDisplayPanel> {
        self.entries.iter().map(|e| &e.panel)
    }

    /// Panels, top first, mutably.
    pub fn panels_mut(&mut self) -> impl Iterator<Item = &mut ImageDisplayPanel> {
        self.entries.iter_mut().map(|e| &mut e.panel)
    }

    #[must_use]
    pub fn panel(&self, id: ImageId) -> Option<&ImageDisplayPanel> {
        self.panels().find(|p| p.image().id() == id)
    }

    pub fn panel_mut(&mut self, id: ImageId) -> Option<&mut ImageDisplayPanel> {
        self.panels_mut().find(|p| p.image().id() == id)
    }

    #[must_use]
    pub fn top(&self) -> Option<&ImageDisplayPanel> {
        self.entries.first().map(|e| &e.panel)
    }

    pub fn top_mut(&mut self) -> Option<&mut ImageDisplayPanel> {
        self.entries.first_mut().map(|e| &mut e.panel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn plot_projection(&self) -> Option<Projection> {
        self.plot_projection
    }

    fn position(&self, id: ImageId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.panel.image().id() == id)
            .ok_or(Error::UnknownImage(id))
    }

    fn restack(&mut self) {
        let n = self.entries.len();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let depth = i32::try_from(n - i).unwrap_or(i32::MAX / Z_STEP);
            entry.panel.set_z(Z_STEP * depth, i == 0, i > 0);
        }
    }
}

impl std::fmt::Debug for ImageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageManager")
            .field("images", &self.entries.len())
            .field("plot_projection", &self.plot_projection)
            .finish_non_exhaustive()
    }
}
