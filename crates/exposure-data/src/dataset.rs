//! Recorded upstream responses.
//!
//! A [`Dataset`] holds what the input-output, emissions, air quality and
//! population models returned for a set of queries. Lookups that were never
//! recorded fail with [`ProviderError::NotFound`]; queries whose demand vector
//! does not fit the industry list fail with [`ProviderError::Malformed`].

use crate::error::{DataError, Result};
use exposure_core::{
    ConcentrationProvider, ConsumptionProvider, DemandProvider, DemographicCountProvider,
    Demograph, EmissionsProvider, FinalDemandType, IndustryToSccMap, Location, Pollutant,
    PopulationProvider, ProviderError, ProviderResult, ReferenceData, Scc, Year,
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::info;

/// Final demand recorded for one category and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    /// Demand category
    pub demand_type: FinalDemandType,

    /// Location scope
    pub location: Location,

    /// Demand by industry
    pub values: Vec<f64>,
}

/// Concentrations recorded for one pollutant and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRecord {
    /// Pollutant species
    pub pollutant: Pollutant,

    /// Location scope
    pub location: Location,

    /// Concentration by grid cell
    pub values: Vec<f64>,
}

/// Everything recorded for one year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Final demand vectors
    #[serde(default)]
    pub final_demand: Vec<DemandRecord>,

    /// Consumption by industry per demographic group
    #[serde(default)]
    pub consumption: BTreeMap<Demograph, Vec<f64>>,

    /// Head count per demographic group
    #[serde(default)]
    pub population_counts: BTreeMap<Demograph, u64>,

    /// (grid cell x sector) emissions per location, stored row by row
    #[serde(default)]
    pub emissions: BTreeMap<Location, Vec<Vec<f64>>>,

    /// Concentration grids
    #[serde(default)]
    pub concentrations: Vec<ConcentrationRecord>,

    /// Population grids keyed by population name
    #[serde(default)]
    pub populations: BTreeMap<String, Vec<f64>>,
}

/// Reference data plus recorded responses, keyed by year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Sector codes in column order
    pub sccs: Vec<Scc>,

    /// Sector indices for each industry
    pub industry_to_scc: Vec<Vec<usize>>,

    /// Names of the gridded populations; results are reported in name order
    #[serde(default)]
    pub population_names: Vec<String>,

    /// Recorded responses per year
    #[serde(default)]
    pub years: BTreeMap<Year, YearRecord>,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Load a dataset from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let dataset = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            sectors = dataset.sccs.len(),
            industries = dataset.industry_to_scc.len(),
            years = dataset.years.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that recorded vectors agree with the reference data.
    ///
    /// Only shapes that can be checked without the upstream models are
    /// verified: consumption and demand lengths, emission column counts and
    /// population grid names, which must be unique.
    pub fn validate(&self) -> Result<()> {
        let n_industries = self.industry_to_scc.len();
        let n_sectors = self.sccs.len();

        let mut seen = BTreeSet::new();
        if let Some(name) = self.population_names.iter().find(|name| !seen.insert(*name)) {
            return Err(DataError::InvalidDataset(format!(
                "population name {name} is listed twice"
            )));
        }

        for (year, record) in &self.years {
            for demand in &record.final_demand {
                if demand.values.len() != n_industries {
                    return Err(DataError::InvalidDataset(format!(
                        "{year} {} demand ({}) has {} industries, expected {n_industries}",
                        demand.demand_type,
                        demand.location,
                        demand.values.len()
                    )));
                }
            }
            for (group, values) in &record.consumption {
                if values.len() != n_industries {
                    return Err(DataError::InvalidDataset(format!(
                        "{year} consumption of {group} has {} industries, expected {n_industries}",
                        values.len()
                    )));
                }
            }
            for (location, rows) in &record.emissions {
                if let Some(row) = rows.iter().find(|r| r.len() != n_sectors) {
                    return Err(DataError::InvalidDataset(format!(
                        "{year} {location} emissions row has {} sectors, expected {n_sectors}",
                        row.len()
                    )));
                }
            }
            if let Some(name) = record
                .populations
                .keys()
                .find(|name| !self.population_names.contains(name))
            {
                return Err(DataError::InvalidDataset(format!(
                    "{year} population grid {name} is not listed in population_names"
                )));
            }
        }

        Ok(())
    }

    /// Build the pipeline reference data.
    pub fn reference_data(&self) -> Result<ReferenceData> {
        let map = IndustryToSccMap::new(self.industry_to_scc.clone(), self.sccs.len())?;
        Ok(ReferenceData::new(self.sccs.clone(), map)?)
    }

    /// Years with recorded responses.
    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.years.keys().copied()
    }

    fn year(&self, year: Year) -> ProviderResult<&YearRecord> {
        self.years
            .get(&year)
            .ok_or_else(|| ProviderError::NotFound(format!("no data recorded for {year}")))
    }

    fn check_demand(&self, demand: &Array1<f64>) -> ProviderResult<()> {
        let expected = self.industry_to_scc.len();
        if demand.len() == expected {
            Ok(())
        } else {
            Err(ProviderError::Malformed(format!(
                "demand has {} industries, expected {expected}",
                demand.len()
            )))
        }
    }
}

impl ConsumptionProvider for Dataset {
    fn demographic_consumption(&self, group: Demograph, year: Year) -> ProviderResult<Array1<f64>> {
        self.year(year)?
            .consumption
            .get(&group)
            .map(|values| Array1::from_vec(values.clone()))
            .ok_or_else(|| ProviderError::NotFound(format!("consumption of {group} in {year}")))
    }
}

impl DemographicCountProvider for Dataset {
    fn population_count(&self, group: Demograph, year: Year) -> ProviderResult<u64> {
        self.year(year)?
            .population_counts
            .get(&group)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(format!("population of {group} in {year}")))
    }
}

impl DemandProvider for Dataset {
    fn final_demand(
        &self,
        demand_type: FinalDemandType,
        year: Year,
        location: Location,
    ) -> ProviderResult<Array1<f64>> {
        self.year(year)?
            .final_demand
            .iter()
            .find(|r| r.demand_type == demand_type && r.location == location)
            .map(|r| Array1::from_vec(r.values.clone()))
            .ok_or_else(|| {
                ProviderError::NotFound(format!("{demand_type} ({location}) demand in {year}"))
            })
    }
}

impl EmissionsProvider for Dataset {
    fn emissions_matrix(
        &self,
        demand: &Array1<f64>,
        year: Year,
        location: Location,
    ) -> ProviderResult<Array2<f64>> {
        self.check_demand(demand)?;
        let rows = self
            .year(year)?
            .emissions
            .get(&location)
            .ok_or_else(|| ProviderError::NotFound(format!("{location} emissions in {year}")))?;
        rows_to_matrix(rows)
    }
}

impl ConcentrationProvider for Dataset {
    fn concentrations(
        &self,
        demand: &Array1<f64>,
        pollutant: Pollutant,
        year: Year,
        location: Location,
    ) -> ProviderResult<Array1<f64>> {
        self.check_demand(demand)?;
        self.year(year)?
            .concentrations
            .iter()
            .find(|r| r.pollutant == pollutant && r.location == location)
            .map(|r| Array1::from_vec(r.values.clone()))
            .ok_or_else(|| {
                ProviderError::NotFound(format!(
                    "{pollutant} ({location}) concentrations in {year}"
                ))
            })
    }
}

impl PopulationProvider for Dataset {
    fn population_names(&self) -> ProviderResult<Vec<String>> {
        Ok(self.population_names.clone())
    }

    fn population(&self, year: Year, name: &str) -> ProviderResult<Array1<f64>> {
        self.year(year)?
            .populations
            .get(name)
            .map(|values| Array1::from_vec(values.clone()))
            .ok_or_else(|| ProviderError::NotFound(format!("population grid {name} in {year}")))
    }
}

fn rows_to_matrix(rows: &[Vec<f64>]) -> ProviderResult<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(ProviderError::Malformed(
            "emissions rows have differing lengths".to_string(),
        ));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| ProviderError::Malformed(e.to_string()))
}
