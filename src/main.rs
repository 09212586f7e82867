//! LedgerView - Bank statement import & synchronized chart viewer
//!
//! Desktop shell around the ledgerview core library.

use eframe::egui;
use ledgerview::gui::LedgerApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("LedgerView"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "LedgerView",
        options,
        Box::new(|cc| Ok(Box::new(LedgerApp::new(cc)))),
    )
}
