#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/exposure/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod attribution;
pub mod demograph;
pub mod error;
pub mod exposure;
pub mod numeric;
pub mod provider;
pub mod reference;
pub mod sector;
pub mod types;

// Re-export main types
pub use attribution::{DemandEmissionsMatrix, DemandEmissionsMatrixBuilder, PopulationAdjuster};
pub use demograph::{Decile, DemographicKind, Demograph, Ethnicity, ParseDemographError};
pub use error::{ExposureError, ProviderError, Result, Stage};
pub use exposure::{
    ExposureCalculator, ExposureObserver, ExposureTotals, NoopObserver, TracingObserver,
};
pub use provider::{
    ConcentrationProvider, ConsumptionProvider, DemandProvider, DemographicCountProvider,
    EmissionsProvider, ExposureSource, PopulationProvider, ProviderResult,
};
pub use reference::ReferenceData;
pub use sector::{IndustryToSccMap, Scc, SectorAggregator, emissions_by_sector};
pub use types::{FinalDemandType, Location, ParsePollutantError, Pollutant, Year};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
