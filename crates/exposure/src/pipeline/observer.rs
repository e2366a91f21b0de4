//! Progress hooks for pipeline runs.

use exposure_core::{Demograph, ExposureObserver, NoopObserver, Stage, TracingObserver};
use tracing::{debug, trace};

/// Receives stage transitions and per-group progress during a run.
///
/// Also sees every per-cell exposure callback through its
/// [`ExposureObserver`] supertrait.
pub trait PipelineObserver: ExposureObserver<String> {
    /// A stage is about to query its provider.
    fn stage(&mut self, stage: Stage) {
        let _ = stage;
    }

    /// The row of `group` at `index` has been filled.
    fn group_attributed(&mut self, index: usize, group: Demograph) {
        let _ = (index, group);
    }
}

impl PipelineObserver for NoopObserver {}

impl PipelineObserver for TracingObserver {
    fn stage(&mut self, stage: Stage) {
        debug!(%stage, "pipeline stage");
    }

    fn group_attributed(&mut self, index: usize, group: Demograph) {
        trace!(row = index, %group, "group attributed");
    }
}
