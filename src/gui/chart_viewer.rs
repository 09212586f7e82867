//! Chart Viewer Widget
//! Scrollable list of imported statement charts; also the chart factory.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{Color32, RichText, ScrollArea, Stroke};
use log::warn;

use crate::charts::{
    ChartHandle, ChartId, ChartPlotter, ChartRegistry, ChartSurface, SeriesPresentation,
    SharedSurface, Viewport,
};
use crate::data::TransactionSeries;
use crate::import::ChartFactory;

const CHART_SPACING: f32 = 15.0;
const CARD_BORDER: Color32 = Color32::from_rgb(96, 125, 139);
const SUMMARY_DATE_FORMAT: &str = "%d %b %Y";

/// One rendered statement chart: the series it owns plus live axis state.
pub struct ImportedChart {
    id: ChartId,
    title: String,
    series: TransactionSeries,
    presentation: SeriesPresentation,
    viewport: Option<Viewport>,
    pending: Option<Viewport>,
    needs_repaint: bool,
}

impl ImportedChart {
    fn new(
        id: ChartId,
        title: String,
        series: TransactionSeries,
        presentation: SeriesPresentation,
    ) -> Self {
        Self {
            id,
            title,
            series,
            presentation,
            viewport: None,
            pending: None,
            needs_repaint: false,
        }
    }

    fn summary(&self) -> String {
        let span = match (self.series.first_date(), self.series.last_date()) {
            (Some(first), Some(last)) => format!(
                "{} - {}",
                first.format(SUMMARY_DATE_FORMAT),
                last.format(SUMMARY_DATE_FORMAT)
            ),
            _ => String::new(),
        };
        format!(
            "{} transactions | {span} | net {:+.2}",
            self.series.len(),
            self.series.net()
        )
    }
}

impl ChartSurface for ImportedChart {
    fn axis_range(&self) -> Viewport {
        self.viewport
            .unwrap_or_else(|| Viewport::new(0.0, self.presentation.len() as f64))
    }

    /// Stage a synchronized range; it is applied on the next drawn frame.
    fn set_axis_range(&mut self, range: Viewport) {
        self.pending = Some(range);
        self.viewport = Some(range);
    }

    fn redraw(&mut self, _animated: bool) {
        self.needs_repaint = true;
    }

    fn show(&mut self, ui: &mut egui::Ui) -> Option<Viewport> {
        self.needs_repaint = false;
        let pending = self.pending.take();
        let mut outcome = None;

        egui::Frame::none()
            .rounding(8.0)
            .stroke(Stroke::new(1.0, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&self.title).size(16.0).strong());
                    ui.label(RichText::new(self.summary()).size(12.0).weak());
                    ui.add_space(6.0);
                    outcome = Some(ChartPlotter::draw_transaction_chart(
                        ui,
                        self.id,
                        &self.presentation,
                        self.viewport,
                        pending,
                    ));
                });
            });

        let outcome = outcome?;
        self.viewport = Some(outcome.viewport);
        outcome.changed_by_user.then_some(outcome.viewport)
    }
}

/// Scrollable chart display area. Creates chart surfaces for the import
/// controller and reports the range-change notifications observed while
/// drawing.
pub struct ChartViewer {
    next_id: u64,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every registered chart. Returns the (source, new range) events
    /// seen this frame, in registry order.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        registry: &ChartRegistry,
    ) -> Vec<(ChartId, Viewport)> {
        let mut events = Vec::new();

        if registry.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Import a statement to see charts").size(20.0));
            });
            return events;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for handle in registry.all() {
                    match handle.surface().try_borrow_mut() {
                        Ok(mut chart) => {
                            if let Some(range) = chart.show(ui) {
                                events.push((handle.id(), range));
                            }
                        }
                        Err(_) => {
                            warn!("chart {} busy, not drawn this frame", handle.id().raw())
                        }
                    }
                    ui.add_space(CHART_SPACING);
                }
            });

        events
    }
}

impl ChartFactory for ChartViewer {
    fn create_chart(
        &mut self,
        title: &str,
        series: TransactionSeries,
        presentation: SeriesPresentation,
    ) -> ChartHandle {
        let id = ChartId::new(self.next_id);
        self.next_id += 1;

        let surface: SharedSurface = Rc::new(RefCell::new(ImportedChart::new(
            id,
            title.to_string(),
            series,
            presentation,
        )));
        ChartHandle::new(id, surface)
    }
}
