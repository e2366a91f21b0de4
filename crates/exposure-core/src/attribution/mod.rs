//! Demographic attribution of sector emissions
//!
//! Builds the (group x sector) matrix of emissions attributable to each
//! demographic group's consumption, then corrects it for group size.

pub mod adjust;
pub mod builder;

pub use adjust::PopulationAdjuster;
pub use builder::DemandEmissionsMatrixBuilder;

use crate::demograph::Demograph;
use crate::error::{ExposureError, Result};
use crate::numeric::compensated_sum;
use crate::sector::Scc;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Emissions attributed to each demographic group, by sector.
///
/// Row `i` belongs to `groups()[i]` and column `j` to `sectors()[j]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDemandEmissionsMatrix")]
pub struct DemandEmissionsMatrix {
    values: Array2<f64>,
    groups: Vec<Demograph>,
    sectors: Vec<Scc>,
}

#[derive(Deserialize)]
struct RawDemandEmissionsMatrix {
    values: Array2<f64>,
    groups: Vec<Demograph>,
    sectors: Vec<Scc>,
}

impl TryFrom<RawDemandEmissionsMatrix> for DemandEmissionsMatrix {
    type Error = ExposureError;

    fn try_from(raw: RawDemandEmissionsMatrix) -> Result<Self> {
        Self::new(raw.values, raw.groups, raw.sectors)
    }
}

impl DemandEmissionsMatrix {
    /// Wrap a matrix with its row and column labels.
    pub fn new(values: Array2<f64>, groups: Vec<Demograph>, sectors: Vec<Scc>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != groups.len() {
            return Err(ExposureError::dimension("matrix rows", groups.len(), rows));
        }
        if cols != sectors.len() {
            return Err(ExposureError::dimension(
                "matrix columns",
                sectors.len(),
                cols,
            ));
        }
        Ok(Self {
            values,
            groups,
            sectors,
        })
    }

    /// The raw (group x sector) values.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub(crate) const fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.values
    }

    /// Row labels.
    pub fn groups(&self) -> &[Demograph] {
        &self.groups
    }

    /// Column labels.
    pub fn sectors(&self) -> &[Scc] {
        &self.sectors
    }

    /// `(groups, sectors)`.
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Row of one group.
    pub fn row(&self, group: Demograph) -> Option<ArrayView1<'_, f64>> {
        self.groups
            .iter()
            .position(|&g| g == group)
            .map(|i| self.values.row(i))
    }

    /// Value for one group and sector.
    pub fn get(&self, group: Demograph, sector: &Scc) -> Option<f64> {
        let i = self.groups.iter().position(|&g| g == group)?;
        let j = self.sectors.iter().position(|s| s == sector)?;
        Some(self.values[[i, j]])
    }

    /// Total attributed emissions per group (row sums).
    pub fn group_totals(&self) -> Vec<(Demograph, f64)> {
        self.groups
            .iter()
            .zip(self.values.rows())
            .map(|(&group, row)| (group, compensated_sum(row.iter().copied())))
            .collect()
    }

    /// Split into the value matrix and its sector labels.
    pub fn into_parts(self) -> (Array2<f64>, Vec<Scc>) {
        (self.values, self.sectors)
    }
}
