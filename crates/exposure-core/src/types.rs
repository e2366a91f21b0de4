//! Query parameters shared by every provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar year of an economic or population query.
pub type Year = i32;

/// Geographic scope of the demand included in a query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Demand met by domestic production
    #[default]
    Domestic,
    /// Demand met by imports
    Imports,
    /// Domestic and imported demand together
    Total,
}

impl Location {
    /// Returns the scope name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Domestic => "domestic",
            Self::Imports => "imports",
            Self::Total => "total",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ambient pollutant species reported by the concentration model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    /// Particulate ammonium
    Pnh4,
    /// Particulate nitrate
    Pno3,
    /// Particulate sulfate
    Pso4,
    /// Secondary organic aerosol
    Soa,
    /// Primary PM2.5
    PrimaryPm25,
    /// Total PM2.5
    #[default]
    TotalPm25,
}

impl Pollutant {
    /// Returns all pollutant species.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Pnh4,
            Self::Pno3,
            Self::Pso4,
            Self::Soa,
            Self::PrimaryPm25,
            Self::TotalPm25,
        ]
    }

    /// Returns the key used in data files and on the command line.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Pnh4 => "pnh4",
            Self::Pno3 => "pno3",
            Self::Pso4 => "pso4",
            Self::Soa => "soa",
            Self::PrimaryPm25 => "primary_pm25",
            Self::TotalPm25 => "total_pm25",
        }
    }

    /// Returns the conventional species label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pnh4 => "pNH4",
            Self::Pno3 => "pNO3",
            Self::Pso4 => "pSO4",
            Self::Soa => "SOA",
            Self::PrimaryPm25 => "Primary PM2.5",
            Self::TotalPm25 => "Total PM2.5",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a pollutant name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown pollutant: {0}")]
pub struct ParsePollutantError(pub String);

impl FromStr for Pollutant {
    type Err = ParsePollutantError;

    /// Accepts either the key (`total_pm25`) or the label (`Total PM2.5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|p| p.key() == s || p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParsePollutantError(s.to_string()))
    }
}

/// Category of final demand requested from the input-output model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FinalDemandType {
    /// Sum of every demand category
    #[default]
    AllDemand,
    /// Household personal consumption
    PersonalConsumption,
    /// Private investment in structures
    PrivateStructures,
    /// Private investment in equipment
    PrivateEquipment,
    /// Private residential investment
    PrivateResidential,
    /// Exports
    Exports,
    /// Government spending
    Government,
}

impl FinalDemandType {
    /// Returns the category name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AllDemand => "all demand",
            Self::PersonalConsumption => "personal consumption",
            Self::PrivateStructures => "private structures",
            Self::PrivateEquipment => "private equipment",
            Self::PrivateResidential => "private residential",
            Self::Exports => "exports",
            Self::Government => "government",
        }
    }
}

impl fmt::Display for FinalDemandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
