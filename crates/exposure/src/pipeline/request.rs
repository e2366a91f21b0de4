//! Parameters of a single pipeline run.

use exposure_core::{DemographicKind, Demograph, FinalDemandType, Location, Pollutant, Year};
use serde::{Deserialize, Serialize};

/// Which demographic groups become rows of the attribution matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSelection {
    /// Every group of one classification, in domain order.
    Kind(DemographicKind),
    /// An explicit list, in the given order.
    Groups(Vec<Demograph>),
}

impl GroupSelection {
    /// The selected groups in row order.
    pub fn resolve(&self) -> Vec<Demograph> {
        match self {
            Self::Kind(kind) => kind.groups(),
            Self::Groups(groups) => groups.clone(),
        }
    }
}

impl Default for GroupSelection {
    fn default() -> Self {
        Self::Kind(DemographicKind::default())
    }
}

impl From<DemographicKind> for GroupSelection {
    fn from(kind: DemographicKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<Vec<Demograph>> for GroupSelection {
    fn from(groups: Vec<Demograph>) -> Self {
        Self::Groups(groups)
    }
}

/// Inputs of [`Pipeline::run`](super::Pipeline::run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Data year.
    pub year: Year,
    /// Location scope of every query.
    pub location: Location,
    /// Pollutant for the concentration query.
    pub pollutant: Pollutant,
    /// Final demand category driving emissions and concentrations.
    pub demand_type: FinalDemandType,
    /// Matrix rows.
    pub groups: GroupSelection,
}

impl Default for PipelineRequest {
    fn default() -> Self {
        Self::new(2015)
    }
}

impl PipelineRequest {
    /// Request for `year` with default scope, pollutant, demand and groups.
    pub fn new(year: Year) -> Self {
        Self {
            year,
            location: Location::default(),
            pollutant: Pollutant::default(),
            demand_type: FinalDemandType::default(),
            groups: GroupSelection::default(),
        }
    }

    /// Set the location scope.
    pub const fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Set the pollutant.
    pub const fn pollutant(mut self, pollutant: Pollutant) -> Self {
        self.pollutant = pollutant;
        self
    }

    /// Set the final demand category.
    pub const fn demand_type(mut self, demand_type: FinalDemandType) -> Self {
        self.demand_type = demand_type;
        self
    }

    /// Set the matrix rows.
    pub fn groups(mut self, groups: impl Into<GroupSelection>) -> Self {
        self.groups = groups.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exposure_core::{Decile, Ethnicity};

    #[test]
    fn test_default_request() {
        let request = PipelineRequest::default();
        assert_eq!(request.year, 2015);
        assert_eq!(request.pollutant, Pollutant::TotalPm25);
        assert_eq!(request.groups.resolve().len(), 10);
    }

    #[test]
    fn test_explicit_groups_keep_order() {
        let groups: Vec<Demograph> = vec![Ethnicity::Hispanic.into(), Decile::Third.into()];
        let request = PipelineRequest::new(2011).groups(groups.clone());
        assert_eq!(request.groups.resolve(), groups);
    }

    #[test]
    fn test_kind_selection() {
        let request = PipelineRequest::new(2011).groups(DemographicKind::Ethnicity);
        assert_eq!(
            request.groups.resolve(),
            vec![
                Demograph::Ethnicity(Ethnicity::Black),
                Demograph::Ethnicity(Ethnicity::Hispanic),
                Demograph::Ethnicity(Ethnicity::WhiteOther),
            ]
        );
    }
}
