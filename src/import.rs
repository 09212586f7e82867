//! Import Controller Module
//! Turns file bytes into a decoded, extracted and registered chart.

use log::{debug, info};
use thiserror::Error;

use crate::charts::{
    ChartHandle, ChartId, ChartRegistry, RegistryError, SeriesPresentation, Viewport,
    ViewportSynchronizer,
};
use crate::data::{decode_workbook, extract, DecodeError, ExtractError, TransactionSeries};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    NoTransactions(#[from] ExtractError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Charting collaborator seam: builds one rendered chart that takes
/// ownership of its series and presentation.
pub trait ChartFactory {
    fn create_chart(
        &mut self,
        title: &str,
        series: TransactionSeries,
        presentation: SeriesPresentation,
    ) -> ChartHandle;
}

/// Glues the extraction pipeline to chart creation, registration and
/// viewport synchronization.
#[derive(Default)]
pub struct ImportController {
    registry: ChartRegistry,
    synchronizer: ViewportSynchronizer,
}

impl ImportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    /// Import one statement file as a new chart.
    ///
    /// Decode failures and statements with no valid transactions are
    /// reported to the caller without touching the registry; the caller owns
    /// the user-facing message.
    pub fn import(
        &mut self,
        title: &str,
        bytes: &[u8],
        factory: &mut dyn ChartFactory,
    ) -> Result<ChartId, ImportError> {
        let rows = decode_workbook(bytes)?;
        debug!("decoded {} rows from {title}", rows.len());

        let series = extract(&rows)?;
        info!("imported {} transactions from {title}", series.len());

        let presentation = SeriesPresentation::from_series(&series);
        let handle = factory.create_chart(title, series, presentation);
        let id = handle.id();
        self.registry.register(handle)?;
        Ok(id)
    }

    /// Forward a chart's range-changed notification to the synchronizer.
    pub fn range_changed(&self, source: ChartId, new_range: Viewport) {
        self.synchronizer
            .on_range_changed(&self.registry, source, new_range);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::charts::{ChartSurface, SharedSurface};

    struct StubSurface {
        viewport: Viewport,
    }

    impl ChartSurface for StubSurface {
        fn axis_range(&self) -> Viewport {
            self.viewport
        }

        fn set_axis_range(&mut self, range: Viewport) {
            self.viewport = range;
        }

        fn redraw(&mut self, _animated: bool) {}

        fn show(&mut self, _ui: &mut egui::Ui) -> Option<Viewport> {
            None
        }
    }

    #[derive(Default)]
    struct StubFactory {
        next_id: u64,
        surfaces: Vec<Rc<RefCell<StubSurface>>>,
        series_lens: Vec<usize>,
    }

    impl ChartFactory for StubFactory {
        fn create_chart(
            &mut self,
            _title: &str,
            series: TransactionSeries,
            _presentation: SeriesPresentation,
        ) -> ChartHandle {
            self.next_id += 1;
            self.series_lens.push(series.len());
            let surface = Rc::new(RefCell::new(StubSurface {
                viewport: Viewport::new(0.0, series.len() as f64),
            }));
            self.surfaces.push(surface.clone());
            let shared: SharedSurface = surface;
            ChartHandle::new(ChartId::new(self.next_id), shared)
        }
    }

    fn statement_csv(data_lines: &[&str]) -> Vec<u8> {
        let mut text = String::new();
        for _ in 0..10 {
            text.push_str("Account Statement,,,,,,,\n");
        }
        for line in data_lines {
            text.push_str(line);
            text.push('\n');
        }
        text.into_bytes()
    }

    #[test]
    fn test_import_creates_and_registers_one_chart() {
        let mut controller = ImportController::new();
        let mut factory = StubFactory::default();
        let bytes = statement_csv(&[",,2024-01-05,,,,DR,50", ",,2024-01-01,,,,CR,100"]);

        let id = controller.import("jan.csv", &bytes, &mut factory).unwrap();

        assert_eq!(id, ChartId::new(1));
        assert_eq!(controller.registry().len(), 1);
        assert_eq!(factory.series_lens, vec![2]);
    }

    #[test]
    fn test_empty_statement_leaves_registry_untouched() {
        let mut controller = ImportController::new();
        let mut factory = StubFactory::default();
        let bytes = statement_csv(&[",,N/A,,,,DR,50", ",,2024-01-01,,,,CR,oops"]);

        let err = controller.import("bad.csv", &bytes, &mut factory).unwrap_err();

        assert!(matches!(err, ImportError::NoTransactions(_)));
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn test_malformed_workbook_is_a_decode_failure() {
        let mut controller = ImportController::new();
        let mut factory = StubFactory::default();
        let mut bytes = vec![0x50, 0x4B, 0x03, 0x04];
        bytes.extend_from_slice(b"definitely not a workbook");

        let err = controller.import("junk.xlsx", &bytes, &mut factory).unwrap_err();

        assert!(matches!(err, ImportError::Decode(_)));
        assert!(controller.registry().is_empty());
    }

    #[test]
    fn test_range_change_fans_out_to_other_imports() {
        let mut controller = ImportController::new();
        let mut factory = StubFactory::default();
        let bytes = statement_csv(&[",,2024-01-01,,,,CR,100"]);

        let first = controller.import("jan.csv", &bytes, &mut factory).unwrap();
        controller.import("feb.csv", &bytes, &mut factory).unwrap();

        let zoomed = Viewport::new(10.0, 20.0);
        controller.range_changed(first, zoomed);

        assert_eq!(factory.surfaces[0].borrow().axis_range(), Viewport::new(0.0, 1.0));
        assert_eq!(factory.surfaces[1].borrow().axis_range(), zoomed);
    }
}
