//! Demand-emissions matrix construction
//!
//! Cell `(g, s)` is group `g`'s consumption in sector `s` times the total
//! emissions of sector `s`. This takes a group's share of sector consumption
//! as its share of sector emissions; the product is element-wise per row,
//! not a matrix product.

use super::DemandEmissionsMatrix;
use crate::demograph::Demograph;
use crate::error::{ExposureError, Result, Stage};
use crate::provider::ConsumptionProvider;
use crate::reference::ReferenceData;
use crate::types::Year;
use ndarray::{Array1, Array2};
use tracing::debug;

/// Builds (group x sector) emissions attribution matrices.
#[derive(Debug, Clone, Copy)]
pub struct DemandEmissionsMatrixBuilder<'a> {
    reference: &'a ReferenceData,
}

impl<'a> DemandEmissionsMatrixBuilder<'a> {
    /// Create a builder over the given reference data.
    pub const fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Build the attribution matrix.
    ///
    /// # Arguments
    /// * `emissions_by_scc` - Total emissions per sector
    /// * `groups` - Demographic groups, one row each
    /// * `year` - Year of the consumption data
    /// * `provider` - Source of per-group consumption
    ///
    /// # Returns
    /// * Matrix with `groups.len()` rows and one column per SCC
    pub fn build<P>(
        &self,
        emissions_by_scc: &Array1<f64>,
        groups: &[Demograph],
        year: Year,
        provider: &P,
    ) -> Result<DemandEmissionsMatrix>
    where
        P: ConsumptionProvider + ?Sized,
    {
        self.build_with(emissions_by_scc, groups, year, provider, |_, _| {})
    }

    /// Build the attribution matrix, calling `on_row` after each group's row
    /// is filled.
    pub fn build_with<P, F>(
        &self,
        emissions_by_scc: &Array1<f64>,
        groups: &[Demograph],
        year: Year,
        provider: &P,
        mut on_row: F,
    ) -> Result<DemandEmissionsMatrix>
    where
        P: ConsumptionProvider + ?Sized,
        F: FnMut(usize, Demograph),
    {
        if groups.is_empty() {
            return Err(ExposureError::EmptyGroups);
        }
        if groups.iter().any(Demograph::is_all) {
            return Err(ExposureError::SentinelGroup);
        }

        let num_sectors = self.reference.num_sectors();
        if emissions_by_scc.len() != num_sectors {
            return Err(ExposureError::dimension(
                "sector consumption vs emissions",
                num_sectors,
                emissions_by_scc.len(),
            ));
        }

        let aggregator = self.reference.aggregator();
        let mut values = Array2::<f64>::zeros((groups.len(), num_sectors));

        for (row, &group) in groups.iter().enumerate() {
            let consumption = provider
                .demographic_consumption(group, year)
                .map_err(|e| {
                    ExposureError::provider(
                        Stage::Consumption,
                        format!("group {group}, year {year}"),
                        e,
                    )
                })?;

            let consumption_by_scc = aggregator.aggregate(&consumption)?;
            if consumption_by_scc.len() != emissions_by_scc.len() {
                return Err(ExposureError::dimension(
                    format!("sector consumption of group {group}"),
                    emissions_by_scc.len(),
                    consumption_by_scc.len(),
                ));
            }

            values
                .row_mut(row)
                .assign(&(&consumption_by_scc * emissions_by_scc));

            debug!(%group, year, "attributed sector emissions");
            on_row(row, group);
        }

        DemandEmissionsMatrix::new(values, groups.to_vec(), self.reference.sccs().to_vec())
    }
}
