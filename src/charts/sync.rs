//! Viewport Synchronizer Module
//! Fans one chart's new x-range out to every other registered chart.

use std::cell::Cell;

use log::warn;

use super::registry::{ChartId, ChartRegistry};
use super::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    Idle,
    Synchronizing,
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState::Idle
    }
}

/// Propagates interactive range changes across the registry without
/// feedback loops.
///
/// Applying a range to a chart can synchronously re-fire that chart's
/// range-changed notification. While the state is `Synchronizing`, nested
/// notifications are ignored, and the state returns to `Idle` on every exit
/// path out of the fan-out, including failures.
#[derive(Default)]
pub struct ViewportSynchronizer {
    state: Cell<SyncState>,
}

impl ViewportSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_synchronizing(&self) -> bool {
        self.state.get() == SyncState::Synchronizing
    }

    /// Apply `new_range` to every chart except `source` and request a
    /// non-animated redraw of each (animation would fight the ongoing
    /// gesture). A chart whose surface is unavailable is skipped; the rest
    /// still receive the range.
    pub fn on_range_changed(
        &self,
        registry: &ChartRegistry,
        source: ChartId,
        new_range: Viewport,
    ) {
        if self.is_synchronizing() {
            return;
        }
        let _guard = SyncGuard::enter(&self.state);

        for handle in registry.all() {
            if handle.id() == source {
                continue;
            }
            match handle.surface().try_borrow_mut() {
                Ok(mut chart) => {
                    chart.set_axis_range(new_range);
                    chart.redraw(false);
                }
                Err(_) => warn!("chart {} busy during fan-out, skipped", handle.id().raw()),
            }
        }
    }
}

/// Restores `Idle` on drop, so no exit path can leave the synchronizer
/// stuck mid-synchronization.
struct SyncGuard<'a> {
    state: &'a Cell<SyncState>,
}

impl<'a> SyncGuard<'a> {
    fn enter(state: &'a Cell<SyncState>) -> Self {
        state.set(SyncState::Synchronizing);
        Self { state }
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.state.set(SyncState::Idle);
    }
}
