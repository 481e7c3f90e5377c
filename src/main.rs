#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on windows in release mode!

mod app;
mod clock;
mod config;
mod content;
mod downloads_page;
mod entry_page;
mod gate;
mod home_page;
mod launch;
mod loading_screen;
mod mods_page;
mod news_page;
mod profile;
mod servers_page;
mod session;
mod settings_page;
mod store;
mod surface;
mod ui;

use eframe::egui;
use log::{info, warn};

use crate::app::{App, AppModel, APP_NAME};
use crate::clock::SystemClock;
use crate::store::{FileBackend, MemoryBackend, StorageBackend};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = config::load_or_default();
    let backend: Box<dyn StorageBackend> = match config.storage_dir() {
        Ok(dir) => {
            let backend = FileBackend::open(&dir);
            info!("Storing launcher data in {}", backend.path().display());
            Box::new(backend)
        }
        Err(e) => {
            // Nothing will be remembered across runs, but everything still works.
            warn!("{}; keeping launcher data in memory", e);
            Box::new(MemoryBackend::default())
        }
    };
    let model = AppModel::new(config, backend, Box::new(SystemClock::default()));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION")).as_str(),
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(App::new(cc, model)))
        }),
    )
}
