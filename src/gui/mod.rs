//! eframe front-end: window bootstrap, panels, and the chart surface.

mod app;
mod plots;

pub use app::AnalyzerApp;

use anyhow::Result;

/// Window title, also the native app name.
pub const APP_TITLE: &str = "FASTQ File Analyzer";

const INITIAL_SIZE: [f32; 2] = [800.0, 600.0];
const MIN_SIZE: [f32; 2] = [700.0, 500.0];

/// Opens the main window and runs the UI event loop to completion.
pub fn run() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size(INITIAL_SIZE)
            .with_min_inner_size(MIN_SIZE),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(AnalyzerApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {e}"))
}
