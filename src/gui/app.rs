//! LedgerView Main Application
//! Import toolbar, status line and the synchronized chart list.

use std::sync::mpsc::{channel, Receiver};
use std::thread;

use anyhow::Context as _;
use egui::{CentralPanel, TopBottomPanel};
use log::{error, warn};

use crate::gui::ChartViewer;
use crate::import::{ImportController, ImportError};

/// File read result from the background thread.
enum LoadResult {
    Complete { name: String, bytes: Vec<u8> },
    Error(String),
}

/// Main application window.
pub struct LedgerApp {
    controller: ImportController,
    viewer: ChartViewer,
    status: String,

    // Async file reading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl LedgerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            controller: ImportController::new(),
            viewer: ChartViewer::new(),
            status: "Ready".to_string(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle statement file selection - the read happens off the UI thread.
    fn handle_import(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Spreadsheets", &["xls", "xlsx", "csv"])
            .pick_file()
        {
            self.status = format!("Reading {}...", path.display());
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());

                let result = std::fs::read(&path)
                    .with_context(|| format!("reading {}", path.display()));
                let message = match result {
                    Ok(bytes) => LoadResult::Complete { name, bytes },
                    Err(e) => LoadResult::Error(format!("{e:#}")),
                };
                let _ = tx.send(message);
            });
        }
    }

    /// Check for file read results; run the import when the bytes arrive.
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete { name, bytes } => {
                        self.status = self.run_import(&name, &bytes);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(message) => {
                        warn!("file read failed: {message}");
                        self.status = format!("Error: {message}");
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Run the import pipeline and produce the status line for it.
    fn run_import(&mut self, name: &str, bytes: &[u8]) -> String {
        match self.controller.import(name, bytes, &mut self.viewer) {
            Ok(_) => format!(
                "Imported {name} ({} charts)",
                self.controller.registry().len()
            ),
            Err(ImportError::NoTransactions(_)) => "No valid transactions found.".to_string(),
            Err(ImportError::Decode(e)) => {
                warn!("decode failed for {name}: {e}");
                format!("Could not read {name}: {e}")
            }
            Err(ImportError::Registry(e)) => {
                error!("registration failed for {name}: {e}");
                format!("Internal error: {e}")
            }
        }
    }
}

impl eframe::App for LedgerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while a file read is in flight
        if self.is_loading {
            ctx.request_repaint();
        }

        // Top panel - import button and status line
        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let import = ui.add_enabled(!self.is_loading, egui::Button::new("Import Statement"));
                if import.clicked() {
                    self.handle_import();
                }
                ui.separator();
                ui.label(&self.status);
            });
            ui.add_space(4.0);
        });

        // Central panel - chart list; fan any observed range change out to
        // the other charts before the next frame draws them.
        CentralPanel::default().show(ctx, |ui| {
            let events = self.viewer.show(ui, self.controller.registry());
            if !events.is_empty() {
                for (source, range) in events {
                    self.controller.range_changed(source, range);
                }
                ctx.request_repaint();
            }
        });
    }
}
