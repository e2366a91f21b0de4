//! Population-weighted exposure.

use super::observer::{ExposureObserver, NoopObserver};
use crate::error::{ExposureError, Result};
use crate::numeric::CompensatedSum;
use ndarray::Array1;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Exposure and population totals per group.
///
/// Only built by [`ExposureCalculator`], which fills both maps with the
/// same keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureTotals<K: Ord> {
    exposure: BTreeMap<K, f64>,
    population: BTreeMap<K, f64>,
}

impl<K: Ord> ExposureTotals<K> {
    /// Total exposure of a group, in person-concentration units.
    pub fn exposure(&self, group: &K) -> Option<f64> {
        self.exposure.get(group).copied()
    }

    /// Total population of a group over all grid cells.
    pub fn population(&self, group: &K) -> Option<f64> {
        self.population.get(group).copied()
    }

    /// Population-weighted mean concentration of a group.
    ///
    /// `None` for unknown groups and groups with no population.
    pub fn per_capita(&self, group: &K) -> Option<f64> {
        let population = self.population(group)?;
        if population > 0.0 {
            self.exposure(group).map(|e| e / population)
        } else {
            None
        }
    }

    /// Exposure totals keyed by group.
    pub const fn exposures(&self) -> &BTreeMap<K, f64> {
        &self.exposure
    }

    /// Population totals keyed by group.
    pub const fn populations(&self) -> &BTreeMap<K, f64> {
        &self.population
    }

    /// Iterate over `(group, exposure, population)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64, f64)> {
        self.exposure
            .iter()
            .zip(self.population.values())
            .map(|((k, &e), &p)| (k, e, p))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.exposure.len()
    }

    /// True when no groups were supplied.
    pub fn is_empty(&self) -> bool {
        self.exposure.is_empty()
    }
}

/// Combines gridded concentrations with gridded population.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExposureCalculator;

impl ExposureCalculator {
    /// Create a calculator.
    pub const fn new() -> Self {
        Self
    }

    /// Total exposure per group.
    ///
    /// # Arguments
    /// * `concentration` - Concentration per grid cell
    /// * `population_by_group` - Population per grid cell for each group
    pub fn compute<K>(
        &self,
        concentration: &Array1<f64>,
        population_by_group: &BTreeMap<K, Array1<f64>>,
    ) -> Result<ExposureTotals<K>>
    where
        K: Ord + Clone,
    {
        self.compute_observed(concentration, population_by_group, &mut NoopObserver)
    }

    /// Same as [`compute`](Self::compute), reporting each cell to `observer`.
    pub fn compute_observed<K, O>(
        &self,
        concentration: &Array1<f64>,
        population_by_group: &BTreeMap<K, Array1<f64>>,
        observer: &mut O,
    ) -> Result<ExposureTotals<K>>
    where
        K: Ord + Clone,
        O: ExposureObserver<K> + ?Sized,
    {
        let n_cells = concentration.len();
        for grid in population_by_group.values() {
            if grid.len() != n_cells {
                return Err(ExposureError::dimension(
                    "population grid vs concentrations",
                    n_cells,
                    grid.len(),
                ));
            }
        }

        let mut exposure_acc = vec![CompensatedSum::new(); population_by_group.len()];
        let mut population_acc = vec![CompensatedSum::new(); population_by_group.len()];

        for (cell, &c) in concentration.iter().enumerate() {
            observer.cell(cell, c);
            for (i, (group, grid)) in population_by_group.iter().enumerate() {
                let people = grid[cell];
                let exposure = people * c;
                population_acc[i].add(people);
                exposure_acc[i].add(exposure);
                observer.group_cell(cell, group, people, exposure);
            }
        }

        let mut exposure = BTreeMap::new();
        let mut population = BTreeMap::new();
        for ((group, e), p) in population_by_group
            .keys()
            .zip(&exposure_acc)
            .zip(&population_acc)
        {
            observer.group_total(group, e.total(), p.total());
            exposure.insert(group.clone(), e.total());
            population.insert(group.clone(), p.total());
        }

        debug!(
            cells = n_cells,
            groups = population_by_group.len(),
            "computed exposure"
        );

        Ok(ExposureTotals {
            exposure,
            population,
        })
    }
}
