//! Error types for the exposure pipeline.

use crate::sector::Scc;
use std::fmt;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ExposureError>;

/// Pipeline stage that issued a provider query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Final demand lookup
    FinalDemand,
    /// Per-group consumption lookup
    Consumption,
    /// Gridded emissions lookup
    Emissions,
    /// Gridded concentration lookup
    Concentration,
    /// Demographic population count lookup
    PopulationCount,
    /// Gridded population lookup
    Population,
}

impl Stage {
    /// Human-readable stage name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FinalDemand => "final demand",
            Self::Consumption => "consumption",
            Self::Emissions => "emissions",
            Self::Concentration => "concentration",
            Self::PopulationCount => "population count",
            Self::Population => "population",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by an external data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The provider returned data that cannot be used
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The provider could not be reached or refused the query
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while building attribution matrices or exposures.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// Two stages disagree on a vector or matrix length
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being compared
        context: String,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// A demographic group has zero population
    #[error("Division by zero: group {group} has zero population")]
    DivisionByZero {
        /// Group with no population
        group: String,
    },

    /// An upstream provider query failed
    #[error("{stage} query failed for {context}: {source}")]
    Provider {
        /// Stage issuing the query
        stage: Stage,
        /// Group, year and other query parameters
        context: String,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// The "all groups" sentinel was passed where individual groups are required
    #[error("The all-groups sentinel cannot be part of an aggregation set")]
    SentinelGroup,

    /// No demographic groups were supplied
    #[error("At least one demographic group is required")]
    EmptyGroups,

    /// An industry maps to a sector outside the sector list
    #[error("Industry {industry} maps to sector {sector}, but only {num_sectors} sectors exist")]
    SectorOutOfRange {
        /// Industry index
        industry: usize,
        /// Offending sector index
        sector: usize,
        /// Number of sectors
        num_sectors: usize,
    },

    /// The same SCC appears twice in the sector list
    #[error("Duplicate sector code: {0}")]
    DuplicateSector(Scc),
}

impl ExposureError {
    /// Build a dimension mismatch error.
    pub fn dimension(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Wrap a provider failure with the stage and query context that produced it.
    pub fn provider(stage: Stage, context: impl Into<String>, source: ProviderError) -> Self {
        Self::Provider {
            stage,
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display_carries_context() {
        let err = ExposureError::provider(
            Stage::Consumption,
            "group decile_3, year 2015",
            ProviderError::NotFound("no consumption record".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.contains("consumption"));
        assert!(msg.contains("decile_3"));
        assert!(msg.contains("2015"));
        assert!(msg.contains("no consumption record"));
    }

    #[test]
    fn test_dimension_display() {
        let err = ExposureError::dimension("emissions columns", 3, 2);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in emissions columns: expected 3, got 2"
        );
    }
}
