//! Diagnostic hooks for the exposure computation.

use std::fmt::Display;
use tracing::trace;

/// Receives per-cell values while exposure is accumulated.
///
/// Every method has an empty default body.
pub trait ExposureObserver<K> {
    /// A grid cell is about to be processed.
    fn cell(&mut self, index: usize, concentration: f64) {
        let _ = (index, concentration);
    }

    /// One group's contribution at a grid cell.
    fn group_cell(&mut self, index: usize, group: &K, population: f64, exposure: f64) {
        let _ = (index, group, population, exposure);
    }

    /// Final totals for one group.
    fn group_total(&mut self, group: &K, exposure: f64, population: f64) {
        let _ = (group, exposure, population);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<K> ExposureObserver<K> for NoopObserver {}

/// Observer that emits every callback as a `trace` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<K: Display> ExposureObserver<K> for TracingObserver {
    fn cell(&mut self, index: usize, concentration: f64) {
        trace!(cell = index, concentration, "grid cell");
    }

    fn group_cell(&mut self, index: usize, group: &K, population: f64, exposure: f64) {
        trace!(cell = index, %group, population, exposure, "group contribution");
    }

    fn group_total(&mut self, group: &K, exposure: f64, population: f64) {
        trace!(%group, exposure, population, "group exposure");
    }
}
