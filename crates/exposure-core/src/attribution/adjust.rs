//! Population size adjustment
//!
//! Raw attributed emissions grow with group size. Scaling each row by
//! `total / group` population expresses every group's emissions per capita,
//! scaled to the combined population, so groups can be compared directly.

use super::DemandEmissionsMatrix;
use crate::demograph::Demograph;
use crate::error::{ExposureError, Result, Stage};
use crate::numeric::compensated_sum;
use crate::provider::DemographicCountProvider;
use crate::types::Year;
use ndarray::Array2;
use tracing::debug;

/// Rescales attribution rows by relative group population.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationAdjuster;

impl PopulationAdjuster {
    /// Create an adjuster.
    pub const fn new() -> Self {
        Self
    }

    /// Adjust `matrix` in place using population counts for `year`.
    ///
    /// All counts are fetched and checked before any cell changes, so on
    /// error the matrix is left as it was.
    pub fn adjust<P>(
        &self,
        matrix: &mut DemandEmissionsMatrix,
        groups: &[Demograph],
        provider: &P,
        year: Year,
    ) -> Result<()>
    where
        P: DemographicCountProvider + ?Sized,
    {
        let rows = matrix.dim().0;
        if rows != groups.len() {
            return Err(ExposureError::dimension("matrix rows", groups.len(), rows));
        }

        let counts = self.population_counts(groups, provider, year)?;
        self.apply(matrix.values_mut(), groups, &counts)
    }

    /// Population of each group in `year`.
    pub fn population_counts<P>(
        &self,
        groups: &[Demograph],
        provider: &P,
        year: Year,
    ) -> Result<Vec<u64>>
    where
        P: DemographicCountProvider + ?Sized,
    {
        groups
            .iter()
            .map(|&group| {
                if group.is_all() {
                    return Err(ExposureError::SentinelGroup);
                }
                provider.population_count(group, year).map_err(|e| {
                    ExposureError::provider(
                        Stage::PopulationCount,
                        format!("group {group}, year {year}"),
                        e,
                    )
                })
            })
            .collect()
    }

    /// Scale row `i` of `values` by `sum(counts) / counts[i]`.
    pub fn apply(
        &self,
        values: &mut Array2<f64>,
        groups: &[Demograph],
        counts: &[u64],
    ) -> Result<()> {
        if values.nrows() != counts.len() {
            return Err(ExposureError::dimension(
                "population counts",
                values.nrows(),
                counts.len(),
            ));
        }
        if groups.len() != counts.len() {
            return Err(ExposureError::dimension(
                "population counts",
                groups.len(),
                counts.len(),
            ));
        }
        if let Some(i) = counts.iter().position(|&c| c == 0) {
            return Err(ExposureError::DivisionByZero {
                group: groups[i].to_string(),
            });
        }

        let total = compensated_sum(counts.iter().map(|&c| c as f64));
        for ((mut row, &count), group) in values.rows_mut().into_iter().zip(counts).zip(groups) {
            let ratio = total / count as f64;
            row *= ratio;
            debug!(%group, population = count, ratio, "population adjusted");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demograph::Decile;
    use crate::error::ProviderError;
    use crate::provider::ProviderResult;
    use crate::sector::Scc;
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::collections::HashMap;

    struct Counts(HashMap<Demograph, u64>);

    impl DemographicCountProvider for Counts {
        fn population_count(&self, group: Demograph, _year: Year) -> ProviderResult<u64> {
            self.0
                .get(&group)
                .copied()
                .ok_or_else(|| ProviderError::NotFound(group.to_string()))
        }
    }

    fn groups() -> Vec<Demograph> {
        vec![Decile::First.into(), Decile::Second.into()]
    }

    fn matrix(values: Array2<f64>) -> DemandEmissionsMatrix {
        DemandEmissionsMatrix::new(values, groups(), vec![Scc::from("a"), Scc::from("b")])
            .unwrap()
    }

    #[test]
    fn test_scales_by_total_over_group() {
        let groups = groups();
        let counts = Counts(HashMap::from([(groups[0], 100), (groups[1], 300)]));
        let mut m = matrix(array![[10.0, 20.0], [30.0, 20.0]]);

        PopulationAdjuster::new()
            .adjust(&mut m, &groups, &counts, 2015)
            .unwrap();

        let v = m.values();
        assert_relative_eq!(v[[0, 0]], 40.0, max_relative = 1e-9);
        assert_relative_eq!(v[[0, 1]], 80.0, max_relative = 1e-9);
        assert_relative_eq!(v[[1, 0]], 40.0, max_relative = 1e-9);
        assert_relative_eq!(v[[1, 1]], 80.0 / 3.0, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_population_leaves_matrix_untouched() {
        let groups = groups();
        let counts = Counts(HashMap::from([(groups[0], 100), (groups[1], 0)]));
        let original = array![[1.0, 2.0], [3.0, 4.0]];
        let mut m = matrix(original.clone());

        let err = PopulationAdjuster::new()
            .adjust(&mut m, &groups, &counts, 2015)
            .unwrap_err();

        assert!(matches!(err, ExposureError::DivisionByZero { ref group } if group == "decile_2"));
        assert_eq!(m.values(), &original);
    }

    #[test]
    fn test_provider_failure_leaves_matrix_untouched() {
        let groups = groups();
        let counts = Counts(HashMap::from([(groups[0], 100)]));
        let original = array![[1.0, 2.0], [3.0, 4.0]];
        let mut m = matrix(original.clone());

        let err = PopulationAdjuster::new()
            .adjust(&mut m, &groups, &counts, 2015)
            .unwrap_err();

        assert!(matches!(
            err,
            ExposureError::Provider {
                stage: Stage::PopulationCount,
                ..
            }
        ));
        assert_eq!(m.values(), &original);
    }

    #[test]
    fn test_rejects_all_sentinel() {
        let groups = vec![Decile::First.into(), Demograph::All];
        let counts = Counts(HashMap::from([(groups[0], 100), (Demograph::All, 400)]));
        let original = array![[1.0, 2.0], [3.0, 4.0]];
        let mut m = matrix(original.clone());

        let err = PopulationAdjuster::new()
            .adjust(&mut m, &groups, &counts, 2015)
            .unwrap_err();

        assert!(matches!(err, ExposureError::SentinelGroup));
        assert_eq!(m.values(), &original);
    }

    #[test]
    fn test_counts_beyond_u64_total() {
        let groups = groups();
        let mut values = array![[1.0, 1.0], [1.0, 1.0]];

        PopulationAdjuster::new()
            .apply(&mut values, &groups, &[u64::MAX, u64::MAX])
            .unwrap();

        assert_relative_eq!(values[[0, 0]], 2.0, max_relative = 1e-9);
        assert_relative_eq!(values[[1, 1]], 2.0, max_relative = 1e-9);
    }

    #[test]
    fn test_row_count_mismatch() {
        let counts = Counts(HashMap::new());
        let mut m = matrix(array![[1.0, 2.0], [3.0, 4.0]]);
        let err = PopulationAdjuster::new()
            .adjust(&mut m, &[Decile::First.into()], &counts, 2015)
            .unwrap_err();
        assert!(matches!(
            err,
            ExposureError::DimensionMismatch {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }
}
