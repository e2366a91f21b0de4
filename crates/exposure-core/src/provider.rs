//! Query interfaces to the upstream economic, emissions and population models.
//!
//! Each trait is a plain synchronous request/response capability. Transport,
//! caching and retries belong to the implementor; the pipeline surfaces any
//! [`ProviderError`] immediately.

use crate::demograph::Demograph;
use crate::error::ProviderError;
use crate::types::{FinalDemandType, Location, Pollutant, Year};
use ndarray::{Array1, Array2};

/// Result type for provider queries.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Economic demand attributable to a demographic group.
pub trait ConsumptionProvider {
    /// Total demand by industry for one group and year.
    fn demographic_consumption(&self, group: Demograph, year: Year) -> ProviderResult<Array1<f64>>;
}

/// Head counts of demographic groups.
pub trait DemographicCountProvider {
    /// Population of `group` in `year`.
    fn population_count(&self, group: Demograph, year: Year) -> ProviderResult<u64>;
}

/// Final demand from the input-output model.
pub trait DemandProvider {
    /// Industry-indexed final demand of the given category.
    fn final_demand(
        &self,
        demand_type: FinalDemandType,
        year: Year,
        location: Location,
    ) -> ProviderResult<Array1<f64>>;
}

/// Spatial emissions model.
pub trait EmissionsProvider {
    /// Emissions caused by `demand`, as a (grid cell x sector) matrix.
    fn emissions_matrix(
        &self,
        demand: &Array1<f64>,
        year: Year,
        location: Location,
    ) -> ProviderResult<Array2<f64>>;
}

/// Spatial air quality model.
pub trait ConcentrationProvider {
    /// Grid-cell concentrations of `pollutant` caused by `demand`.
    fn concentrations(
        &self,
        demand: &Array1<f64>,
        pollutant: Pollutant,
        year: Year,
        location: Location,
    ) -> ProviderResult<Array1<f64>>;
}

/// Gridded population counts.
pub trait PopulationProvider {
    /// Names of the available population grids.
    fn population_names(&self) -> ProviderResult<Vec<String>>;

    /// Grid-cell population counts for one named population.
    fn population(&self, year: Year, name: &str) -> ProviderResult<Array1<f64>>;
}

/// Everything a full pipeline run queries.
pub trait ExposureSource:
    ConsumptionProvider
    + DemographicCountProvider
    + DemandProvider
    + EmissionsProvider
    + ConcentrationProvider
    + PopulationProvider
{
}

impl<T> ExposureSource for T where
    T: ConsumptionProvider
        + DemographicCountProvider
        + DemandProvider
        + EmissionsProvider
        + ConcentrationProvider
        + PopulationProvider
{
}
