//! Exposure computation
//!
//! Exposure of a group is the sum over grid cells of its population in the
//! cell times the cell's pollutant concentration.

pub mod calculator;
pub mod observer;

pub use calculator::{ExposureCalculator, ExposureTotals};
pub use observer::{ExposureObserver, NoopObserver, TracingObserver};
