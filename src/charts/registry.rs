//! Chart Registry Module
//! Owns the live set of rendered charts in import order.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use thiserror::Error;

use super::viewport::Viewport;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("chart handle has no assigned id")]
    InvalidHandle,
}

/// Identity of one rendered chart, assigned when the chart is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

impl ChartId {
    /// Reserved sentinel for a surface that was never assigned an id.
    pub const UNSET: ChartId = ChartId(0);

    pub fn new(raw: u64) -> Self {
        ChartId(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// One rendered chart as the core sees it: live axis state plus redraw
/// control.
///
/// `show` draws the chart for the current frame and returns the new
/// viewport when the user's own gesture changed it - the range-changed
/// notification the synchronizer consumes. Frames that merely apply a
/// synchronized range must return `None`.
pub trait ChartSurface {
    fn axis_range(&self) -> Viewport;
    fn set_axis_range(&mut self, range: Viewport);
    fn redraw(&mut self, animated: bool);
    fn show(&mut self, ui: &mut egui::Ui) -> Option<Viewport>;
}

pub type SharedSurface = Rc<RefCell<dyn ChartSurface>>;

/// Chart identity plus shared access to its surface.
#[derive(Clone)]
pub struct ChartHandle {
    id: ChartId,
    surface: SharedSurface,
}

impl ChartHandle {
    pub fn new(id: ChartId, surface: SharedSurface) -> Self {
        Self { id, surface }
    }

    pub fn id(&self) -> ChartId {
        self.id
    }

    pub fn surface(&self) -> &SharedSurface {
        &self.surface
    }
}

/// Insertion-ordered set of every chart imported this session. There is no
/// removal: charts accumulate until the app closes.
#[derive(Default)]
pub struct ChartRegistry {
    charts: Vec<ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chart. Re-registering an id that is already present is a
    /// no-op; a handle without an assigned id is a programming error.
    pub fn register(&mut self, handle: ChartHandle) -> Result<(), RegistryError> {
        if handle.id() == ChartId::UNSET {
            return Err(RegistryError::InvalidHandle);
        }
        if self.charts.iter().any(|known| known.id() == handle.id()) {
            debug!("chart {} already registered", handle.id().raw());
            return Ok(());
        }
        self.charts.push(handle);
        Ok(())
    }

    /// Current membership in registration order.
    pub fn all(&self) -> &[ChartHandle] {
        &self.charts
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
