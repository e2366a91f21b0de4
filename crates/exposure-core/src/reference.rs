//! Static reference data shared by every pipeline run.

use crate::error::{ExposureError, Result};
use crate::sector::{IndustryToSccMap, SectorAggregator, Scc};
use std::collections::HashSet;

/// Ordered SCC list plus the industry grouping onto it.
///
/// Constructed once and passed by reference into each run. Sector index `i`
/// in every vector and matrix column refers to `sccs()[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    sccs: Vec<Scc>,
    industry_map: IndustryToSccMap,
}

impl ReferenceData {
    /// Create reference data, checking the SCC list against the map.
    pub fn new(sccs: Vec<Scc>, industry_map: IndustryToSccMap) -> Result<Self> {
        let mut seen = HashSet::with_capacity(sccs.len());
        for scc in &sccs {
            if !seen.insert(scc) {
                return Err(ExposureError::DuplicateSector(scc.clone()));
            }
        }

        if industry_map.num_sectors() != sccs.len() {
            return Err(ExposureError::dimension(
                "industry map sector count",
                sccs.len(),
                industry_map.num_sectors(),
            ));
        }

        Ok(Self { sccs, industry_map })
    }

    /// Sector codes in column order.
    pub fn sccs(&self) -> &[Scc] {
        &self.sccs
    }

    /// Number of sectors.
    pub fn num_sectors(&self) -> usize {
        self.sccs.len()
    }

    /// Number of industries in the input-output model.
    pub fn num_industries(&self) -> usize {
        self.industry_map.num_industries()
    }

    /// The industry grouping.
    pub const fn industry_map(&self) -> &IndustryToSccMap {
        &self.industry_map
    }

    /// Aggregator over this reference data's map.
    pub const fn aggregator(&self) -> SectorAggregator<'_> {
        SectorAggregator::new(&self.industry_map)
    }

    /// Index of a sector code.
    pub fn position(&self, scc: &Scc) -> Option<usize> {
        self.sccs.iter().position(|s| s == scc)
    }
}
