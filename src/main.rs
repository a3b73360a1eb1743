mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use app::AttriscopeApp;
use eframe::egui;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    // The dataset path is the only configuration input.
    let path: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "EA.csv".to_string())
        .into();

    // Loaded once, then shared read-only with the session.
    let dataset = match data::loader::load(&path) {
        Ok(dataset) => {
            log::info!("Loaded {} employees from {}", dataset.len(), path.display());
            dataset
        }
        Err(e) => {
            log::error!("Cannot load dataset: {e}");
            eprintln!("Error: cannot load {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    let state = AppState::new(Arc::new(dataset));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Attriscope – HR Attrition Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(AttriscopeApp::new(state)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI error: {e}");
            ExitCode::FAILURE
        }
    }
}
