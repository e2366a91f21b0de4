//! Emissions attribution summaries.
//!
//! This module turns a demand-emissions matrix into per-group totals and
//! per-sector breakdowns suitable for display and export.

use exposure_core::{DemandEmissionsMatrix, Location, Year};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emissions attributed to one group in one sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorEmissions {
    /// Sector code.
    pub scc: String,

    /// Attributed emissions.
    pub emissions: f64,
}

/// Attribution result for a single demographic group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupEmissions {
    /// Group name (e.g., "decile_3").
    pub group: String,

    /// Sum of the group's row.
    pub total_emissions: f64,

    /// The group's total as a percentage of all groups' totals.
    pub share_pct: f64,

    /// Per-sector values in column order.
    pub sectors: Vec<SectorEmissions>,
}

impl GroupEmissions {
    /// Sectors with the largest attributed emissions, largest first.
    pub fn top_sectors(&self, n: usize) -> Vec<&SectorEmissions> {
        let mut sorted: Vec<&SectorEmissions> = self.sectors.iter().collect();
        sorted.sort_by(|a, b| b.emissions.total_cmp(&a.emissions));
        sorted.truncate(n);
        sorted
    }
}

impl fmt::Display for GroupEmissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2} ({:.2}% of total)",
            self.group, self.total_emissions, self.share_pct
        )
    }
}

/// Emissions attribution across all groups of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionsSummary {
    /// Year of the run.
    pub year: Year,

    /// Location scope of the run.
    pub location: Location,

    /// Whether rows were population adjusted.
    pub population_adjusted: bool,

    /// One entry per group, in matrix row order.
    pub groups: Vec<GroupEmissions>,
}

impl EmissionsSummary {
    /// Summarize a demand-emissions matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use exposure_core::{Decile, DemandEmissionsMatrix, Location, Scc};
    /// use exposure_output::EmissionsSummary;
    /// use ndarray::array;
    ///
    /// let matrix = DemandEmissionsMatrix::new(
    ///     array![[10.0, 20.0], [30.0, 20.0]],
    ///     vec![Decile::First.into(), Decile::Second.into()],
    ///     vec![Scc::from("a"), Scc::from("b")],
    /// )
    /// .unwrap();
    ///
    /// let summary = EmissionsSummary::from_matrix(&matrix, 2015, Location::Domestic, false);
    /// assert_eq!(summary.groups[1].total_emissions, 50.0);
    /// ```
    pub fn from_matrix(
        matrix: &DemandEmissionsMatrix,
        year: Year,
        location: Location,
        population_adjusted: bool,
    ) -> Self {
        let totals = matrix.group_totals();
        let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();

        let groups = totals
            .iter()
            .zip(matrix.values().rows())
            .map(|((group, total), row)| GroupEmissions {
                group: group.to_string(),
                total_emissions: *total,
                share_pct: if grand_total.abs() > 1e-12 {
                    total / grand_total * 100.0
                } else {
                    0.0
                },
                sectors: matrix
                    .sectors()
                    .iter()
                    .zip(row.iter())
                    .map(|(scc, &emissions)| SectorEmissions {
                        scc: scc.to_string(),
                        emissions,
                    })
                    .collect(),
            })
            .collect();

        Self {
            year,
            location,
            population_adjusted,
            groups,
        }
    }

    /// Sum of all group totals.
    pub fn grand_total(&self) -> f64 {
        self.groups.iter().map(|g| g.total_emissions).sum()
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&GroupEmissions> {
        self.groups.iter().find(|g| g.group == name)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nEmissions by Demographic Group: {} ({})\n",
            self.year, self.location
        ));
        if self.population_adjusted {
            output.push_str("Population adjusted\n");
        }
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<16} {:>18} {:>10} {:>24}\n",
            "Group", "Emissions", "% Total", "Largest Sector"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for group in &self.groups {
            let largest = group
                .top_sectors(1)
                .first()
                .map(|s| s.scc.clone())
                .unwrap_or_default();
            output.push_str(&format!(
                "{:<16} {:>18.2} {:>9.2}% {:>24}\n",
                group.group, group.total_emissions, group.share_pct, largest
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!("{:<16} {:>18.2}\n", "Total", self.grand_total()));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Emissions by Demographic Group\n\n");
        output.push_str(&format!(
            "**Year:** {} | **Location:** {} | **Population adjusted:** {}\n\n",
            self.year,
            self.location,
            if self.population_adjusted { "yes" } else { "no" }
        ));

        output.push_str("| Group | Emissions | % of Total |\n");
        output.push_str("|-------|-----------|------------|\n");
        for group in &self.groups {
            output.push_str(&format!(
                "| {} | {:.2} | {:.2}% |\n",
                group.group, group.total_emissions, group.share_pct
            ));
        }
        output.push('\n');
        output.push_str(&format!("- **Total:** {:.2}\n", self.grand_total()));

        output
    }
}
