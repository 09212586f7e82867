//! Charts module - registry, viewport synchronization and plotting

mod plotter;
mod registry;
mod sync;
mod viewport;

pub use plotter::{ChartPlotter, PlotOutcome, SeriesPresentation};
pub use registry::{ChartHandle, ChartId, ChartRegistry, ChartSurface, RegistryError, SharedSurface};
pub use sync::ViewportSynchronizer;
pub use viewport::Viewport;
