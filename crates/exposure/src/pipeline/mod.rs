//! End-to-end exposure pipeline.
//!
//! A [`Pipeline`] borrows immutable reference data and runs every stage
//! against an [`ExposureSource`]. Any provider or dimension error aborts the
//! run; there is no partial output.

mod observer;
mod request;

pub use observer::PipelineObserver;
pub use request::{GroupSelection, PipelineRequest};

use exposure_core::{
    DemandEmissionsMatrix, DemandEmissionsMatrixBuilder, ExposureCalculator, ExposureError,
    ExposureSource, ExposureTotals, NoopObserver, PopulationAdjuster, ProviderError, ReferenceData,
    Result, Stage, emissions_by_sector,
};
use exposure_output::{EmissionsSummary, ExposureSummary, Report, ReportBuilder};
use ndarray::Array1;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Results of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Population-adjusted (group x sector) emissions.
    pub matrix: DemandEmissionsMatrix,
    /// Total emissions per sector before attribution.
    pub sector_emissions: Array1<f64>,
    /// Exposure per gridded population name.
    pub exposure: ExposureTotals<String>,
}

impl PipelineOutput {
    /// Emissions attribution summary for display or export.
    pub fn emissions_summary(&self, request: &PipelineRequest) -> EmissionsSummary {
        EmissionsSummary::from_matrix(&self.matrix, request.year, request.location, true)
    }

    /// Exposure summary for display or export.
    pub fn exposure_summary(&self, request: &PipelineRequest) -> ExposureSummary {
        ExposureSummary::from_totals(
            &self.exposure,
            request.pollutant,
            request.year,
            request.location,
        )
    }

    /// Timestamped report holding both summaries.
    pub fn report(&self, request: &PipelineRequest) -> Report {
        ReportBuilder::new()
            .title(format!(
                "{} exposure, {} {} ({})",
                request.pollutant, request.demand_type, request.year, request.location
            ))
            .year(request.year)
            .emissions(self.emissions_summary(request))
            .exposure(self.exposure_summary(request))
            .build()
    }
}

/// Runs the full computation over fixed reference data.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    reference: &'a ReferenceData,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over the given reference data.
    pub const fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Reference data used for sector alignment.
    pub const fn reference(&self) -> &'a ReferenceData {
        self.reference
    }

    /// Run every stage for `request`.
    pub fn run<S>(&self, source: &S, request: &PipelineRequest) -> Result<PipelineOutput>
    where
        S: ExposureSource + ?Sized,
    {
        self.run_observed(source, request, &mut NoopObserver)
    }

    /// Same as [`run`](Self::run), reporting progress to `observer`.
    ///
    /// Stages run in this order: final demand, emissions, consumption
    /// (matrix build), population counts (adjustment), concentrations,
    /// gridded populations, exposure.
    pub fn run_observed<S, O>(
        &self,
        source: &S,
        request: &PipelineRequest,
        observer: &mut O,
    ) -> Result<PipelineOutput>
    where
        S: ExposureSource + ?Sized,
        O: PipelineObserver + ?Sized,
    {
        let PipelineRequest {
            year,
            location,
            pollutant,
            demand_type,
            ..
        } = *request;
        let groups = request.groups.resolve();
        info!(year, %location, %pollutant, %demand_type, groups = groups.len(), "running pipeline");

        observer.stage(Stage::FinalDemand);
        let demand = source
            .final_demand(demand_type, year, location)
            .map_err(|e| {
                ExposureError::provider(
                    Stage::FinalDemand,
                    format!("{demand_type}, year {year}, {location}"),
                    e,
                )
            })?;
        if demand.len() != self.reference.num_industries() {
            return Err(ExposureError::dimension(
                "final demand vs industries",
                self.reference.num_industries(),
                demand.len(),
            ));
        }

        observer.stage(Stage::Emissions);
        let grid_emissions = source
            .emissions_matrix(&demand, year, location)
            .map_err(|e| {
                ExposureError::provider(Stage::Emissions, format!("year {year}, {location}"), e)
            })?;
        let sector_emissions = emissions_by_sector(&grid_emissions, self.reference.num_sectors())?;
        debug!(cells = grid_emissions.nrows(), "emissions collapsed to sectors");

        observer.stage(Stage::Consumption);
        let mut matrix = DemandEmissionsMatrixBuilder::new(self.reference).build_with(
            &sector_emissions,
            &groups,
            year,
            source,
            |index, group| observer.group_attributed(index, group),
        )?;

        observer.stage(Stage::PopulationCount);
        PopulationAdjuster::new().adjust(&mut matrix, &groups, source, year)?;

        observer.stage(Stage::Concentration);
        let concentration = source
            .concentrations(&demand, pollutant, year, location)
            .map_err(|e| {
                ExposureError::provider(
                    Stage::Concentration,
                    format!("{pollutant}, year {year}, {location}"),
                    e,
                )
            })?;

        observer.stage(Stage::Population);
        let names = source
            .population_names()
            .map_err(|e| ExposureError::provider(Stage::Population, "population names", e))?;
        let mut grids = BTreeMap::new();
        for name in names {
            if grids.contains_key(&name) {
                return Err(ExposureError::provider(
                    Stage::Population,
                    "population names",
                    ProviderError::Malformed(format!("duplicate population name {name}")),
                ));
            }
            let grid = source.population(year, &name).map_err(|e| {
                ExposureError::provider(Stage::Population, format!("{name}, year {year}"), e)
            })?;
            if grid.len() != concentration.len() {
                return Err(ExposureError::dimension(
                    format!("population grid {name} vs concentrations"),
                    concentration.len(),
                    grid.len(),
                ));
            }
            grids.insert(name, grid);
        }

        let exposure =
            ExposureCalculator::new().compute_observed(&concentration, &grids, observer)?;
        info!(populations = exposure.len(), "pipeline finished");

        Ok(PipelineOutput {
            matrix,
            sector_emissions,
            exposure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use exposure_core::{
        ConcentrationProvider, ConsumptionProvider, Decile, DemandProvider,
        DemographicCountProvider, Demograph, EmissionsProvider, ExposureObserver,
        FinalDemandType, IndustryToSccMap, Location, Pollutant, PopulationProvider, ProviderError,
        ProviderResult, Scc, Year,
    };
    use ndarray::{Array2, array};
    use std::collections::HashMap;

    /// Two industries, two sectors, two grid cells.
    struct TwoCellSource {
        consumption: HashMap<Demograph, Array1<f64>>,
        counts: HashMap<Demograph, u64>,
        populations: Vec<(String, Array1<f64>)>,
    }

    impl Default for TwoCellSource {
        fn default() -> Self {
            let first = Demograph::Decile(Decile::First);
            let second = Demograph::Decile(Decile::Second);
            Self {
                consumption: HashMap::from([
                    (first, array![1.0, 1.0]),
                    (second, array![3.0, 1.0]),
                ]),
                counts: HashMap::from([(first, 100), (second, 300)]),
                populations: vec![
                    ("A".to_string(), array![100.0, 200.0]),
                    ("B".to_string(), array![50.0, 50.0]),
                ],
            }
        }
    }

    impl ConsumptionProvider for TwoCellSource {
        fn demographic_consumption(
            &self,
            group: Demograph,
            _year: Year,
        ) -> ProviderResult<Array1<f64>> {
            self.consumption
                .get(&group)
                .cloned()
                .ok_or_else(|| ProviderError::NotFound(group.to_string()))
        }
    }

    impl DemographicCountProvider for TwoCellSource {
        fn population_count(&self, group: Demograph, _year: Year) -> ProviderResult<u64> {
            self.counts
                .get(&group)
                .copied()
                .ok_or_else(|| ProviderError::NotFound(group.to_string()))
        }
    }

    impl DemandProvider for TwoCellSource {
        fn final_demand(
            &self,
            _demand_type: FinalDemandType,
            _year: Year,
            _location: Location,
        ) -> ProviderResult<Array1<f64>> {
            Ok(array![1.0, 1.0])
        }
    }

    impl EmissionsProvider for TwoCellSource {
        fn emissions_matrix(
            &self,
            _demand: &Array1<f64>,
            _year: Year,
            _location: Location,
        ) -> ProviderResult<Array2<f64>> {
            Ok(array![[4.0, 5.0], [6.0, 15.0]])
        }
    }

    impl ConcentrationProvider for TwoCellSource {
        fn concentrations(
            &self,
            _demand: &Array1<f64>,
            _pollutant: Pollutant,
            _year: Year,
            _location: Location,
        ) -> ProviderResult<Array1<f64>> {
            Ok(array![5.0, 10.0])
        }
    }

    impl PopulationProvider for TwoCellSource {
        fn population_names(&self) -> ProviderResult<Vec<String>> {
            Ok(self.populations.iter().map(|(n, _)| n.clone()).collect())
        }

        fn population(&self, _year: Year, name: &str) -> ProviderResult<Array1<f64>> {
            self.populations
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, grid)| grid.clone())
                .ok_or_else(|| ProviderError::NotFound(name.to_string()))
        }
    }

    fn reference() -> ReferenceData {
        ReferenceData::new(
            vec![Scc::from("2102001000"), Scc::from("2103007000")],
            IndustryToSccMap::identity(2),
        )
        .unwrap()
    }

    fn request() -> PipelineRequest {
        PipelineRequest::new(2015).groups(vec![
            Demograph::Decile(Decile::First),
            Demograph::Decile(Decile::Second),
        ])
    }

    #[derive(Default)]
    struct Recorder {
        stages: Vec<Stage>,
        rows: Vec<usize>,
        totals: Vec<String>,
    }

    impl ExposureObserver<String> for Recorder {
        fn group_total(&mut self, group: &String, _exposure: f64, _population: f64) {
            self.totals.push(group.clone());
        }
    }

    impl PipelineObserver for Recorder {
        fn stage(&mut self, stage: Stage) {
            self.stages.push(stage);
        }

        fn group_attributed(&mut self, index: usize, _group: Demograph) {
            self.rows.push(index);
        }
    }

    #[test]
    fn test_run_end_to_end() {
        let reference = reference();
        let output = Pipeline::new(&reference)
            .run(&TwoCellSource::default(), &request())
            .unwrap();

        assert_eq!(output.sector_emissions, array![10.0, 20.0]);
        let v = output.matrix.values();
        assert_relative_eq!(v[[0, 0]], 40.0, max_relative = 1e-9);
        assert_relative_eq!(v[[0, 1]], 80.0, max_relative = 1e-9);
        assert_relative_eq!(v[[1, 0]], 40.0, max_relative = 1e-9);
        assert_relative_eq!(v[[1, 1]], 80.0 / 3.0, max_relative = 1e-9);
        assert_eq!(output.matrix.sectors(), reference.sccs());

        assert_relative_eq!(output.exposure.exposure(&"A".to_string()).unwrap(), 2500.0);
        assert_relative_eq!(output.exposure.exposure(&"B".to_string()).unwrap(), 750.0);
    }

    #[test]
    fn test_observer_sees_stages_in_order() {
        let reference = reference();
        let mut recorder = Recorder::default();
        Pipeline::new(&reference)
            .run_observed(&TwoCellSource::default(), &request(), &mut recorder)
            .unwrap();

        assert_eq!(
            recorder.stages,
            vec![
                Stage::FinalDemand,
                Stage::Emissions,
                Stage::Consumption,
                Stage::PopulationCount,
                Stage::Concentration,
                Stage::Population,
            ]
        );
        assert_eq!(recorder.rows, vec![0, 1]);
        assert_eq!(recorder.totals, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_missing_consumption_aborts_run() {
        let reference = reference();
        let mut source = TwoCellSource::default();
        source
            .consumption
            .remove(&Demograph::Decile(Decile::Second));

        let err = Pipeline::new(&reference)
            .run(&source, &request())
            .unwrap_err();

        match err {
            ExposureError::Provider { stage, context, .. } => {
                assert_eq!(stage, Stage::Consumption);
                assert!(context.contains("decile_2"));
                assert!(context.contains("2015"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_population_grid_length_mismatch() {
        let reference = reference();
        let mut source = TwoCellSource::default();
        source.populations[1].1 = array![1.0, 2.0, 3.0];

        let err = Pipeline::new(&reference)
            .run(&source, &request())
            .unwrap_err();

        assert!(matches!(
            err,
            ExposureError::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_population_name_aborts_run() {
        let reference = reference();
        let mut source = TwoCellSource::default();
        source
            .populations
            .push(("A".to_string(), array![1.0, 1.0]));

        let err = Pipeline::new(&reference)
            .run(&source, &request())
            .unwrap_err();

        match err {
            ExposureError::Provider {
                stage,
                source: ProviderError::Malformed(message),
                ..
            } => {
                assert_eq!(stage, Stage::Population);
                assert!(message.contains("duplicate population name A"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_population_count_aborts_run() {
        let reference = reference();
        let mut source = TwoCellSource::default();
        source.counts.insert(Demograph::Decile(Decile::First), 0);

        let err = Pipeline::new(&reference)
            .run(&source, &request())
            .unwrap_err();

        assert!(matches!(err, ExposureError::DivisionByZero { .. }));
    }

    #[test]
    fn test_report_carries_both_summaries() {
        let reference = reference();
        let request = request();
        let output = Pipeline::new(&reference)
            .run(&TwoCellSource::default(), &request)
            .unwrap();

        let report = output.report(&request);
        assert_eq!(report.year, 2015);
        assert!(report.title.contains("Total PM2.5"));
        let emissions = report.emissions.unwrap();
        assert!(emissions.population_adjusted);
        assert_relative_eq!(emissions.groups[0].total_emissions, 120.0, max_relative = 1e-9);
        assert_eq!(report.exposure.unwrap().groups.len(), 2);
    }
}
