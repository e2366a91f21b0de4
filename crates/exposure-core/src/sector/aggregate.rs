//! Industry to sector aggregation.

use super::IndustryToSccMap;
use crate::error::{ExposureError, Result};
use crate::numeric::CompensatedSum;
use ndarray::{Array1, Array2};

/// Collapses industry-indexed vectors onto SCC sectors.
///
/// Each industry's full value is added to every sector it maps to, so an
/// industry mapped to two sectors is counted in both.
#[derive(Debug, Clone, Copy)]
pub struct SectorAggregator<'a> {
    map: &'a IndustryToSccMap,
}

impl<'a> SectorAggregator<'a> {
    /// Create an aggregator over the given map.
    pub const fn new(map: &'a IndustryToSccMap) -> Self {
        Self { map }
    }

    /// Number of sectors produced.
    pub const fn num_sectors(&self) -> usize {
        self.map.num_sectors()
    }

    /// Aggregate an industry-indexed vector into a sector-indexed one.
    ///
    /// # Arguments
    /// * `values` - One value per industry in the map
    ///
    /// # Returns
    /// * Vector of length `num_sectors`; sectors no industry maps to stay zero
    pub fn aggregate(&self, values: &Array1<f64>) -> Result<Array1<f64>> {
        if values.len() != self.map.num_industries() {
            return Err(ExposureError::dimension(
                "industry vector",
                self.map.num_industries(),
                values.len(),
            ));
        }

        let mut result = Array1::<f64>::zeros(self.map.num_sectors());
        for (industry, sectors) in self.map.iter() {
            let value = values[industry];
            for &sector in sectors {
                result[sector] += value;
            }
        }

        Ok(result)
    }
}

/// Aggregate with an explicit sector count.
///
/// Fails if `num_sectors` disagrees with the map.
pub fn aggregate(
    values: &Array1<f64>,
    map: &IndustryToSccMap,
    num_sectors: usize,
) -> Result<Array1<f64>> {
    if map.num_sectors() != num_sectors {
        return Err(ExposureError::dimension(
            "sector count",
            num_sectors,
            map.num_sectors(),
        ));
    }
    SectorAggregator::new(map).aggregate(values)
}

/// Total emissions per sector from a (grid cell x sector) matrix.
///
/// Sums each column over all grid cells.
pub fn emissions_by_sector(emissions: &Array2<f64>, num_sectors: usize) -> Result<Array1<f64>> {
    if emissions.ncols() != num_sectors {
        return Err(ExposureError::dimension(
            "emissions matrix columns",
            num_sectors,
            emissions.ncols(),
        ));
    }

    Ok(emissions
        .columns()
        .into_iter()
        .map(|column| column.iter().sum::<CompensatedSum>().total())
        .collect())
}
