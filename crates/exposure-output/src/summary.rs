//! Exposure summaries.
//!
//! Structures for reporting population-weighted exposure per gridded
//! population, together with the population totals used to derive
//! per-capita concentrations.

use exposure_core::{ExposureTotals, Location, Pollutant, Year};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exposure of a single gridded population.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupExposure {
    /// Population name (e.g., "TotalPop").
    pub name: String,

    /// Sum over cells of concentration times population.
    pub exposure: f64,

    /// Sum over cells of population.
    pub population: f64,

    /// Population-weighted mean concentration, absent for empty populations.
    pub per_capita: Option<f64>,
}

impl GroupExposure {
    /// Create a new group exposure, deriving the per-capita value.
    ///
    /// # Examples
    ///
    /// ```
    /// use exposure_output::GroupExposure;
    ///
    /// let group = GroupExposure::new("TotalPop".to_string(), 2500.0, 300.0);
    /// assert!((group.per_capita.unwrap() - 8.333).abs() < 1e-3);
    ///
    /// let empty = GroupExposure::new("Nobody".to_string(), 0.0, 0.0);
    /// assert_eq!(empty.per_capita, None);
    /// ```
    pub fn new(name: String, exposure: f64, population: f64) -> Self {
        let per_capita = (population > 0.0).then(|| exposure / population);
        Self {
            name,
            exposure,
            population,
            per_capita,
        }
    }
}

impl fmt::Display for GroupExposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.per_capita {
            Some(pc) => write!(
                f,
                "{}: {:.4e} (population: {:.0}, per capita: {:.4})",
                self.name, self.exposure, self.population, pc
            ),
            None => write!(f, "{}: {:.4e} (no population)", self.name, self.exposure),
        }
    }
}

/// Exposure results of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureSummary {
    /// Pollutant whose concentrations were weighted.
    pub pollutant: Pollutant,

    /// Year of the run.
    pub year: Year,

    /// Location scope of the run.
    pub location: Location,

    /// One entry per gridded population, in name order.
    pub groups: Vec<GroupExposure>,
}

impl ExposureSummary {
    /// Build a summary from calculator totals.
    pub fn from_totals(
        totals: &ExposureTotals<String>,
        pollutant: Pollutant,
        year: Year,
        location: Location,
    ) -> Self {
        let groups = totals
            .iter()
            .map(|(name, exposure, population)| {
                GroupExposure::new(name.clone(), exposure, population)
            })
            .collect();

        Self {
            pollutant,
            year,
            location,
            groups,
        }
    }

    /// Look up a population by name.
    pub fn group(&self, name: &str) -> Option<&GroupExposure> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Per-capita concentration of `name` relative to `baseline`.
    ///
    /// Returns `None` if either is missing or has no population.
    pub fn disparity(&self, name: &str, baseline: &str) -> Option<f64> {
        let group = self.group(name)?.per_capita?;
        let base = self.group(baseline)?.per_capita?;
        (base.abs() > 1e-12).then(|| group / base)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nPopulation-Weighted Exposure: {} {} ({})\n",
            self.pollutant, self.year, self.location
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<20} {:>18} {:>16} {:>14}\n",
            "Population", "Exposure", "Persons", "Per Capita"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for group in &self.groups {
            let per_capita = group
                .per_capita
                .map(|pc| format!("{pc:.4}"))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{:<20} {:>18.4e} {:>16.0} {:>14}\n",
                group.name, group.exposure, group.population, per_capita
            ));
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Population-Weighted Exposure\n\n");
        output.push_str(&format!(
            "**Pollutant:** {} | **Year:** {} | **Location:** {}\n\n",
            self.pollutant, self.year, self.location
        ));

        output.push_str("| Population | Exposure | Persons | Per Capita |\n");
        output.push_str("|------------|----------|---------|------------|\n");
        for group in &self.groups {
            let per_capita = group
                .per_capita
                .map(|pc| format!("{pc:.4}"))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "| {} | {:.4e} | {:.0} | {} |\n",
                group.name, group.exposure, group.population, per_capita
            ));
        }

        output
    }
}
