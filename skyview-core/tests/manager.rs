use ndarray::{ArrayD, IxDyn};
use skyview_core::{
    ExtraAxis, ImageManager, MenuAction, PixelGrid, PlotItem, PlotSurface, Projection,
    ProjectionKind, RaiseOutcome, SkyImage, ViewerContext,
};

fn image(name: &str, ra0: f64) -> SkyImage {
    #[allow(clippy::cast_precision_loss)]
    let data = ArrayD::from_shape_fn(IxDyn(&[4, 4, 3]), |ix| (ix[0] + 10 * ix[2]) as f32);
    SkyImage::new(
        name,
        data,
        vec![ExtraAxis::new("FREQ", ["1GHz", "2GHz", "3GHz"])],
        PixelGrid::centred(4, 4, 0.01),
        Projection::new(ProjectionKind::Sin, ra0, 0.2),
    )
    .unwrap()
}

fn two_images() -> (ImageManager, skyview_core::ImageId, skyview_core::ImageId) {
    let mut manager = ImageManager::new(ViewerContext::default());
    let first = manager.load_image(image("first", 0.0), None);
    let second = manager.load_image(image("second", 1.0), Some("/tmp/second.fits"));
    (manager, first, second)
}

#[test]
fn test_newest_image_is_on_top() {
    let (manager, first, second) = two_images();
    assert_eq!(manager.len(), 2);

    let top = manager.top().unwrap();
    assert_eq!(top.image().id(), second);
    assert_eq!(top.name(), "second.fits");
    assert!(top.label_is_bold());
    assert!(!top.can_raise());
    assert_eq!(top.render_controls_shortcut(), Some("F9"));

    let below = manager.panel(first).unwrap();
    assert!(below.can_raise());
    assert!(!below.label_is_bold());
    assert!(top.image().z() > below.image().z());
    assert_eq!(below.border().unwrap().z(), below.image().z() + 1);
}

#[test]
fn test_first_image_defines_projection() {
    let (manager, first, second) = two_images();
    assert_eq!(
        manager.plot_projection(),
        Some(Projection::new(ProjectionKind::Sin, 0.0, 0.2))
    );
    assert!(manager.panel(first).unwrap().center_icon_visible());
    assert!(!manager.panel(second).unwrap().center_icon_visible());
}

#[test]
fn test_raise_request_restacks() {
    let (mut manager, first, second) = two_images();

    let outcome = manager.panel_mut(first).unwrap().activate_raise();
    assert_eq!(outcome, RaiseOutcome::RaiseRequested);
    let changes = manager.process_events();
    assert!(changes.restacked);

    assert_eq!(manager.top().unwrap().image().id(), first);
    assert!(manager.panel(second).unwrap().can_raise());
    assert!(!manager.panel(first).unwrap().can_raise());
}

#[test]
fn test_unload_from_menu() {
    let (mut manager, first, second) = two_images();
    manager
        .panel_mut(second)
        .unwrap()
        .trigger(MenuAction::ShowRenderControls);
    manager.panel_mut(second).unwrap().trigger(MenuAction::Unload);

    let changes = manager.process_events();
    assert_eq!(changes.unloaded, vec![second]);
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.top().unwrap().image().id(), first);
    assert!(!manager.top().unwrap().can_raise());
}

#[test]
fn test_center_switches_projection() {
    let (mut manager, first, second) = two_images();
    manager.panel_mut(second).unwrap().trigger(MenuAction::Center);

    let changes = manager.process_events();
    assert!(changes.recentred);
    assert!(manager.panel(second).unwrap().center_icon_visible());
    assert!(!manager.panel(first).unwrap().center_icon_visible());
}

#[test]
fn test_slice_and_range_changes_request_redraw() {
    let (mut manager, first, second) = two_images();
    assert!(manager.process_events().is_empty());

    let panel = manager.panel(first).unwrap();
    panel.change_slice(0, 2);
    panel.render_control().set_display_range(1.0, 2.0);
    manager.panel(second).unwrap().increment_slice(0, 1);

    let changes = manager.process_events();
    assert_eq!(changes.redraw, vec![first, second]);
    assert!(!changes.restacked);
}

#[test]
fn test_unknown_image_is_an_error() {
    let (mut manager, first, _) = two_images();
    manager.unload_image(first).unwrap();
    assert!(manager.raise_image(first).is_err());
    assert!(manager.center_image(first).is_err());
}

#[test]
fn test_attach_every_panel() {
    let (manager, _, _) = two_images();
    let surface = PlotSurface::new("sky");
    manager.attach_to_plot(&surface);
    for panel in manager.panels() {
        assert_eq!(panel.plot_items().count(), 3);
        assert!(panel.plot_items().all(|i| i.plot() == Some(surface.id())));
    }
}

#[test]
fn test_empty_display_name_still_labels_border() {
    let mut manager = ImageManager::new(ViewerContext::default());
    let id = manager.load_image(image("fields/a2029.fits", 0.0), Some(""));
    let panel = manager.panel(id).unwrap();
    assert_eq!(panel.name(), "a2029.fits");
    assert_eq!(panel.border_label().unwrap().text(), " a2029.fits ");
}
