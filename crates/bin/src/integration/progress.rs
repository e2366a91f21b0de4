//! Progress bar driven by pipeline callbacks.

use exposure::PipelineObserver;
use exposure_core::{Demograph, ExposureObserver, Stage, TracingObserver};
use indicatif::style::TemplateError;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Stages reported through [`PipelineObserver::stage`].
const STAGES: u64 = 6;

/// Advances a progress bar once per stage and once per attributed group,
/// forwarding every callback to a [`TracingObserver`].
pub(crate) struct ProgressObserver {
    bar: ProgressBar,
    tracing: TracingObserver,
}

impl ProgressObserver {
    /// Progress bar sized for a run over `groups` demographic groups.
    pub(crate) fn new(groups: usize, visible: bool) -> Result<Self, TemplateError> {
        let bar = if visible {
            ProgressBar::new(STAGES + groups as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Ok(Self {
            bar,
            tracing: TracingObserver,
        })
    }

    /// Close the bar with a final message.
    pub(crate) fn finish(&self, message: &'static str) {
        self.bar.finish_with_message(message);
    }
}

impl ExposureObserver<String> for ProgressObserver {
    fn cell(&mut self, index: usize, concentration: f64) {
        ExposureObserver::<String>::cell(&mut self.tracing, index, concentration);
    }

    fn group_cell(&mut self, index: usize, group: &String, population: f64, exposure: f64) {
        self.tracing.group_cell(index, group, population, exposure);
    }

    fn group_total(&mut self, group: &String, exposure: f64, population: f64) {
        self.tracing.group_total(group, exposure, population);
    }
}

impl PipelineObserver for ProgressObserver {
    fn stage(&mut self, stage: Stage) {
        self.tracing.stage(stage);
        self.bar.set_message(format!("Querying {stage}..."));
        self.bar.inc(1);
    }

    fn group_attributed(&mut self, index: usize, group: Demograph) {
        self.tracing.group_attributed(index, group);
        self.bar.set_message(format!("Attributed {group}"));
        self.bar.inc(1);
    }
}
