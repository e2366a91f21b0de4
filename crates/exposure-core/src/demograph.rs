//! Demographic group definitions.
//!
//! Groups come from two closed domains: income deciles and ethnicities.
//! [`Demograph::All`] is the "all groups" sentinel used for whole-population
//! queries. [`DemographicKind::groups`] never yields it, and the attribution
//! stages reject it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Household income decile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Decile {
    /// Lowest income decile
    First,
    /// Second decile
    Second,
    /// Third decile
    Third,
    /// Fourth decile
    Fourth,
    /// Fifth decile
    Fifth,
    /// Sixth decile
    Sixth,
    /// Seventh decile
    Seventh,
    /// Eighth decile
    Eighth,
    /// Ninth decile
    Ninth,
    /// Highest income decile
    Tenth,
}

impl Decile {
    /// Returns all deciles, lowest income first.
    pub fn all() -> Vec<Self> {
        vec![
            Self::First,
            Self::Second,
            Self::Third,
            Self::Fourth,
            Self::Fifth,
            Self::Sixth,
            Self::Seventh,
            Self::Eighth,
            Self::Ninth,
            Self::Tenth,
        ]
    }

    /// Returns the decile number (1-10).
    pub const fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Fifth => 5,
            Self::Sixth => 6,
            Self::Seventh => 7,
            Self::Eighth => 8,
            Self::Ninth => 9,
            Self::Tenth => 10,
        }
    }

    /// Parse a decile from its number.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Fourth),
            5 => Some(Self::Fifth),
            6 => Some(Self::Sixth),
            7 => Some(Self::Seventh),
            8 => Some(Self::Eighth),
            9 => Some(Self::Ninth),
            10 => Some(Self::Tenth),
            _ => None,
        }
    }
}

/// Ethnicity of the household reference person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ethnicity {
    /// Black
    Black,
    /// Hispanic
    Hispanic,
    /// White and other
    WhiteOther,
}

impl Ethnicity {
    /// Returns all ethnicities.
    pub fn all() -> Vec<Self> {
        vec![Self::Black, Self::Hispanic, Self::WhiteOther]
    }

    /// Returns the key used in text form.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Hispanic => "hispanic",
            Self::WhiteOther => "white_other",
        }
    }
}

/// A demographic group, or the whole population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Demograph {
    /// Every group at once
    All,
    /// An income decile
    Decile(Decile),
    /// An ethnicity
    Ethnicity(Ethnicity),
}

impl Demograph {
    /// Returns true for the all-groups sentinel.
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Decile> for Demograph {
    fn from(decile: Decile) -> Self {
        Self::Decile(decile)
    }
}

impl From<Ethnicity> for Demograph {
    fn from(ethnicity: Ethnicity) -> Self {
        Self::Ethnicity(ethnicity)
    }
}

impl fmt::Display for Demograph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Decile(d) => write!(f, "decile_{}", d.number()),
            Self::Ethnicity(e) => f.write_str(e.key()),
        }
    }
}

/// Error returned when parsing an unknown group name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown demographic group: {0}")]
pub struct ParseDemographError(pub String);

impl FromStr for Demograph {
    type Err = ParseDemographError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if key == "all" {
            return Ok(Self::All);
        }
        if let Some(number) = key.strip_prefix("decile_") {
            return number
                .parse::<u8>()
                .ok()
                .and_then(Decile::from_number)
                .map(Self::Decile)
                .ok_or_else(|| ParseDemographError(s.to_string()));
        }
        Ethnicity::all()
            .into_iter()
            .find(|e| e.key() == key)
            .map(Self::Ethnicity)
            .ok_or_else(|| ParseDemographError(s.to_string()))
    }
}

impl From<Demograph> for String {
    fn from(group: Demograph) -> Self {
        group.to_string()
    }
}

impl TryFrom<String> for Demograph {
    type Error = ParseDemographError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which demographic domain a run is disaggregated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemographicKind {
    /// Income deciles
    #[default]
    Decile,
    /// Ethnicities
    Ethnicity,
}

impl DemographicKind {
    /// Every individual group of this domain, in domain order.
    pub fn groups(self) -> Vec<Demograph> {
        match self {
            Self::Decile => Decile::all().into_iter().map(Demograph::Decile).collect(),
            Self::Ethnicity => Ethnicity::all()
                .into_iter()
                .map(Demograph::Ethnicity)
                .collect(),
        }
    }

    /// Returns the domain name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Decile => "decile",
            Self::Ethnicity => "ethnicity",
        }
    }
}

impl fmt::Display for DemographicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemographicKind {
    type Err = ParseDemographError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decile" | "deciles" | "income" => Ok(Self::Decile),
            "ethnicity" | "ethnicities" => Ok(Self::Ethnicity),
            _ => Err(ParseDemographError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_group_domains_exclude_sentinel() {
        let deciles = DemographicKind::Decile.groups();
        assert_eq!(deciles.len(), 10);
        assert!(deciles.iter().all(|g| !g.is_all()));

        let ethnicities = DemographicKind::Ethnicity.groups();
        assert_eq!(ethnicities.len(), 3);
        assert!(ethnicities.iter().all(|g| !g.is_all()));
    }

    #[test]
    fn test_decile_order() {
        let deciles = DemographicKind::Decile.groups();
        assert_eq!(deciles[0], Demograph::Decile(Decile::First));
        assert_eq!(deciles[9], Demograph::Decile(Decile::Tenth));
    }

    #[rstest]
    #[case(Demograph::All, "all")]
    #[case(Demograph::Decile(Decile::Third), "decile_3")]
    #[case(Demograph::Decile(Decile::Tenth), "decile_10")]
    #[case(Demograph::Ethnicity(Ethnicity::WhiteOther), "white_other")]
    fn test_text_form(#[case] group: Demograph, #[case] text: &str) {
        assert_eq!(group.to_string(), text);
        assert_eq!(text.parse::<Demograph>().unwrap(), group);
    }

    #[rstest]
    #[case("decile_0")]
    #[case("decile_11")]
    #[case("decile_x")]
    #[case("martian")]
    fn test_rejects_unknown(#[case] text: &str) {
        assert!(text.parse::<Demograph>().is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "Ethnicity".parse::<DemographicKind>().unwrap(),
            DemographicKind::Ethnicity
        );
        assert_eq!(
            "deciles".parse::<DemographicKind>().unwrap(),
            DemographicKind::Decile
        );
        assert!("age".parse::<DemographicKind>().is_err());
    }
}
