//! Glue between the pipeline and the terminal.
//!
//! This module drives the progress bar from pipeline callbacks and renders
//! results in the configured output format.

pub(crate) mod progress;
pub(crate) mod render;
