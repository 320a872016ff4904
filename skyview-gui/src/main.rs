//! Skyview GUI application entry point.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod demo;
mod ui;
mod util;
mod viewer;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use app::SkyViewApp;
use clap::Parser;
use eframe::egui;
use log::info;
use skyview_core::{ImageManager, ViewerConfig, ViewerContext};

/// Sky image viewer with per-image display controls.
#[derive(Parser, Debug)]
#[command(name = "skyview", version, about)]
struct Args {
    /// Viewer configuration (JSON); defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file.
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Number of Stokes planes in the demo cube (1-4).
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
    stokes: u8,

    /// Number of frequency channels in the demo cube.
    #[arg(long, default_value_t = 16)]
    channels: usize,

    /// Width and height of the demo images in pixels.
    #[arg(long, default_value_t = 128)]
    size: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("writing config {}", path.display()))?;
        info!("saved configuration to {}", path.display());
    }

    let window_size = config.window_size;
    let mut manager = ImageManager::new(ViewerContext::new(config));
    let shape = demo::DemoShape {
        stokes: usize::from(args.stokes),
        channels: args.channels.max(1),
        size: args.size.max(8),
    };
    for (image, name) in demo::demo_images(&shape)? {
        manager.load_image(image, name);
    }

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(window_size),
        ..Default::default()
    };
    eframe::run_native(
        "Skyview",
        opts,
        Box::new(move |cc| {
            ui::theme::configure_style(&cc.egui_ctx);
            Ok(Box::new(SkyViewApp::new(manager)))
        }),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
