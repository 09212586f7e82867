//! Chart Plotter Module
//! Presentation mapping and interactive bar charts using egui_plot.

use egui::{Color32, Stroke};
use egui_plot::{Bar, BarChart, Plot, PlotBounds};

use crate::data::TransactionSeries;

use super::registry::ChartId;
use super::viewport::Viewport;

/// Bar colors by sign of the amount.
pub const CREDIT_FILL: Color32 = Color32::from_rgb(0, 200, 0);
pub const CREDIT_STROKE: Color32 = Color32::from_rgb(0, 150, 0);
pub const DEBIT_FILL: Color32 = Color32::from_rgb(255, 0, 0);
pub const DEBIT_STROKE: Color32 = Color32::from_rgb(200, 0, 0);

const CHART_HEIGHT: f32 = 300.0;
const BAR_WIDTH: f64 = 0.6;
const FILL_ALPHA: f32 = 0.7;
const LABEL_DATE_FORMAT: &str = "%d %b %Y";

/// Per-point presentation attributes derived from one series: a
/// human-readable date label, the signed amount, and a fill/stroke pair
/// classified by sign.
#[derive(Debug, Clone)]
pub struct SeriesPresentation {
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
    pub fills: Vec<Color32>,
    pub strokes: Vec<Color32>,
}

impl SeriesPresentation {
    pub fn from_series(series: &TransactionSeries) -> Self {
        let labels = series
            .iter()
            .map(|txn| txn.date.format(LABEL_DATE_FORMAT).to_string())
            .collect();
        let amounts: Vec<f64> = series.iter().map(|txn| txn.amount).collect();
        let fills = amounts
            .iter()
            .map(|&amount| if amount >= 0.0 { CREDIT_FILL } else { DEBIT_FILL })
            .collect();
        let strokes = amounts
            .iter()
            .map(|&amount| {
                if amount >= 0.0 {
                    CREDIT_STROKE
                } else {
                    DEBIT_STROKE
                }
            })
            .collect();
        Self {
            labels,
            amounts,
            fills,
            strokes,
        }
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// What one drawn frame observed about the plot's x-range.
pub struct PlotOutcome {
    pub viewport: Viewport,
    pub changed_by_user: bool,
}

/// Draws transaction bar charts and reports viewport movement.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw one transaction bar chart.
    ///
    /// `pending` is a synchronized range to pin this frame; only x is set,
    /// each chart keeps its own y bounds. The outcome reports a user change
    /// only when the x-bounds moved under an active gesture on a frame that
    /// applied no pending range, so synchronized updates never echo back.
    pub fn draw_transaction_chart(
        ui: &mut egui::Ui,
        id: ChartId,
        presentation: &SeriesPresentation,
        last_viewport: Option<Viewport>,
        pending: Option<Viewport>,
    ) -> PlotOutcome {
        let x_labels = presentation.labels.clone();
        let tip_labels = presentation.labels.clone();

        let bars: Vec<Bar> = presentation
            .amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                Bar::new(i as f64, amount)
                    .width(BAR_WIDTH)
                    .fill(presentation.fills[i].gamma_multiply(FILL_ALPHA))
                    .stroke(Stroke::new(1.0, presentation.strokes[i]))
            })
            .collect();

        let response = Plot::new(("transaction_chart", id.raw()))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_zoom([true, false])
            .allow_drag([true, false])
            .x_axis_label("Date")
            .y_axis_label("Amount")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx < 0.0 || (mark.value - idx).abs() > 1e-3 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .label_formatter(move |_name, value| {
                let idx = value.x.round();
                let label = (idx >= 0.0)
                    .then(|| tip_labels.get(idx as usize))
                    .flatten();
                match label {
                    Some(date) => format!("{date}\n{:+.2}", value.y),
                    None => String::new(),
                }
            })
            .show(ui, |plot_ui| {
                if let Some(range) = pending {
                    let bounds = plot_ui.plot_bounds();
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [range.min, bounds.min()[1]],
                        [range.max, bounds.max()[1]],
                    ));
                }
                plot_ui.bar_chart(BarChart::new(bars).name("Transaction Amount"));
            });

        let bounds = response.transform.bounds();
        let observed = Viewport::new(bounds.min()[0], bounds.max()[0]);
        let gesture = response.response.dragged() || response.response.hovered();
        let changed_by_user = pending.is_none()
            && gesture
            && last_viewport.is_some_and(|known| !observed.approx_eq(known));

        PlotOutcome {
            viewport: observed,
            changed_by_user,
        }
    }
}
