//! SCC identifiers and the industry to SCC grouping.

use crate::error::{ExposureError, Result};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Source Classification Code of an emissions-relevant sector.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct Scc(String);

impl Scc {
    /// Create a sector code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Scc {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Many-to-many grouping of input-output industries onto SCC sectors.
///
/// Entry `i` lists the sector indices industry `i` contributes to. An empty
/// entry means the industry has no emissions-relevant sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndustryToSccMap")]
pub struct IndustryToSccMap {
    entries: Vec<Vec<usize>>,
    num_sectors: usize,
}

#[derive(Deserialize)]
struct RawIndustryToSccMap {
    entries: Vec<Vec<usize>>,
    num_sectors: usize,
}

impl TryFrom<RawIndustryToSccMap> for IndustryToSccMap {
    type Error = ExposureError;

    fn try_from(raw: RawIndustryToSccMap) -> Result<Self> {
        Self::new(raw.entries, raw.num_sectors)
    }
}

impl IndustryToSccMap {
    /// Create a map, checking every sector index is below `num_sectors`.
    pub fn new(entries: Vec<Vec<usize>>, num_sectors: usize) -> Result<Self> {
        for (industry, sectors) in entries.iter().enumerate() {
            if let Some(&sector) = sectors.iter().find(|&&s| s >= num_sectors) {
                return Err(ExposureError::SectorOutOfRange {
                    industry,
                    sector,
                    num_sectors,
                });
            }
        }
        Ok(Self {
            entries,
            num_sectors,
        })
    }

    /// One-to-one map where industry `i` is sector `i`.
    pub fn identity(n: usize) -> Self {
        Self {
            entries: (0..n).map(|i| vec![i]).collect(),
            num_sectors: n,
        }
    }

    /// Number of industries with an entry.
    pub fn num_industries(&self) -> usize {
        self.entries.len()
    }

    /// Number of sectors the map targets.
    pub const fn num_sectors(&self) -> usize {
        self.num_sectors
    }

    /// Sector indices for one industry.
    pub fn sectors_for(&self, industry: usize) -> &[usize] {
        self.entries.get(industry).map_or(&[], Vec::as_slice)
    }

    /// Iterate over `(industry, sectors)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, sectors)| (i, sectors.as_slice()))
    }

    /// True when every industry maps to exactly one sector.
    pub fn is_one_to_one(&self) -> bool {
        self.entries.iter().all(|sectors| sectors.len() == 1)
    }
}
