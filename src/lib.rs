//! LedgerView - Bank statement import & synchronized chart viewer
//!
//! Core library behind the desktop shell: statement decoding, transaction
//! extraction, the chart registry and the viewport synchronizer. Each
//! imported statement becomes one bar chart; panning or zooming any chart
//! moves every other chart's time axis identically.

pub mod charts;
pub mod data;
pub mod gui;
pub mod import;

// Re-export commonly used types
pub use charts::{
    ChartHandle, ChartId, ChartRegistry, ChartSurface, RegistryError, SeriesPresentation,
    Viewport, ViewportSynchronizer,
};
pub use data::{
    decode_workbook, extract, Cell, DecodeError, ExtractError, RawRow, Transaction,
    TransactionSeries, TxnKind,
};
pub use import::{ChartFactory, ImportController, ImportError};
