//! Integration tests for summaries and exports built from pipeline results

use approx::assert_relative_eq;
use exposure_core::{Decile, DemandEmissionsMatrix, ExposureCalculator, Location, Pollutant, Scc};
use exposure_output::{EmissionsSummary, ExportFormat, Exporter, ExposureSummary, ReportBuilder};
use ndarray::array;
use rstest::rstest;
use std::collections::BTreeMap;

fn matrix() -> DemandEmissionsMatrix {
    DemandEmissionsMatrix::new(
        array![[10.0, 20.0], [30.0, 20.0]],
        vec![Decile::First.into(), Decile::Second.into()],
        vec![Scc::from("2102001000"), Scc::from("2103007000")],
    )
    .unwrap()
}

fn exposure_summary() -> ExposureSummary {
    let populations = BTreeMap::from([
        ("A".to_string(), array![100.0, 200.0]),
        ("B".to_string(), array![50.0, 50.0]),
    ]);
    let totals = ExposureCalculator::new()
        .compute(&array![5.0, 10.0], &populations)
        .unwrap();
    ExposureSummary::from_totals(&totals, Pollutant::TotalPm25, 2015, Location::Domestic)
}

#[test]
fn test_emissions_summary_from_matrix() {
    let summary = EmissionsSummary::from_matrix(&matrix(), 2015, Location::Domestic, false);

    assert_eq!(summary.groups.len(), 2);
    assert_eq!(summary.groups[0].group, "decile_1");
    assert_relative_eq!(summary.groups[0].total_emissions, 30.0);
    assert_relative_eq!(summary.groups[1].share_pct, 62.5);
    assert_eq!(summary.groups[1].sectors[0].scc, "2102001000");
}

#[test]
fn test_exposure_summary_from_totals() {
    let summary = exposure_summary();

    let a = summary.group("A").unwrap();
    assert_relative_eq!(a.exposure, 2500.0);
    assert_relative_eq!(a.population, 300.0);
    assert_relative_eq!(a.per_capita.unwrap(), 2500.0 / 300.0);

    let b = summary.group("B").unwrap();
    assert_relative_eq!(b.exposure, 750.0);
    assert_relative_eq!(b.per_capita.unwrap(), 7.5);
}

#[rstest]
#[case(ExportFormat::Csv, "decile_2,2103007000,20.0")]
#[case(ExportFormat::Json, "\"group\":\"decile_2\"")]
#[case(ExportFormat::PrettyJson, "\"group\": \"decile_2\"")]
fn test_emissions_export_formats(#[case] format: ExportFormat, #[case] expected: &str) {
    let summary = EmissionsSummary::from_matrix(&matrix(), 2015, Location::Domestic, false);
    let out = summary.export_to_string(format).unwrap();
    assert!(out.contains(expected), "{out}");
}

#[test]
fn test_exposure_csv_export() {
    let csv = exposure_summary()
        .export_to_string(ExportFormat::Csv)
        .unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "pollutant,year,location,population_name,exposure,population,per_capita"
    );
    assert_eq!(
        lines.next().unwrap(),
        "total_pm25,2015,domestic,A,2500.0,300.0,8.333333333333334"
    );
    assert_eq!(lines.next().unwrap(), "total_pm25,2015,domestic,B,750.0,100.0,7.5");
}

#[test]
fn test_full_report() {
    let report = ReportBuilder::new()
        .title("Exposure 2015")
        .emissions(EmissionsSummary::from_matrix(
            &matrix(),
            2015,
            Location::Domestic,
            true,
        ))
        .exposure(exposure_summary())
        .build();

    let ascii = report.to_ascii();
    assert!(ascii.starts_with("Exposure 2015"));
    assert!(ascii.contains("Emissions by Demographic Group"));
    assert!(ascii.contains("Population-Weighted Exposure"));

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["year"], 2015);
    assert_eq!(value["exposure"]["groups"][1]["name"], "B");
}
