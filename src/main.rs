//! Pin Scene - viewer for graph pin scenes
//!
//! Entry point for the application. An optional first argument names a JSON
//! config file.

use std::path::PathBuf;

use eframe::egui;
use pin_scene::app::{AppConfig, SceneApp};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let loaded = AppConfig::discover(config_path.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = &loaded {
        warn!(error = %e, "using default configuration");
    }
    info!(snapshot = %config.snapshot_path.display(), "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_size.0, config.window_size.1])
            .with_title("Pin Scene"),
        ..Default::default()
    };

    eframe::run_native(
        "Pin Scene",
        options,
        Box::new(move |_cc| Ok(Box::new(SceneApp::new(&config)))),
    )
}
