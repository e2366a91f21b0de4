#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/exposure/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pipeline;

// Re-export main types from sub-crates
pub use exposure_core as model;
pub use exposure_data as data;
pub use exposure_output as output;

pub use pipeline::{GroupSelection, Pipeline, PipelineObserver, PipelineOutput, PipelineRequest};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
