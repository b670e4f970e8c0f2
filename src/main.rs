//! Prénoms Dashboard - French baby names explorer
//!
//! Loads the INSEE departmental first-name file and the department
//! boundaries, then shows rankings, a regional map and gender trends.

mod analysis;
mod charts;
mod config;
mod data;
mod gui;

use config::AppConfig;
use data::DataCache;
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> eframe::Result<()> {
    // Optional single argument: path to a TOML config file
    let config = match AppConfig::discover(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!(
        "Names: {}, departments: {}",
        config.data.names_path.display(),
        config.data.geo_path.display()
    );

    let cache = Arc::new(DataCache::new(config.sources()));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("French Baby Names"),
        ..Default::default()
    };

    eframe::run_native(
        "French Baby Names",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, cache)))),
    )
}
