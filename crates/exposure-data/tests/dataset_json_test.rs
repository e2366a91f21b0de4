//! Integration tests for loading recorded datasets from JSON

use exposure_core::{
    ConsumptionProvider, Decile, DemographicCountProvider, Demograph, Ethnicity, FinalDemandType,
    Location, Pollutant, PopulationProvider,
};
use exposure_data::{DataError, Dataset};
use rstest::rstest;

const SAMPLE: &str = r#"{
    "sccs": ["2102001000", "2103007000"],
    "industry_to_scc": [[0], [1], [0, 1]],
    "population_names": ["TotalPop", "Black"],
    "years": {
        "2015": {
            "final_demand": [
                { "demand_type": "all_demand", "location": "domestic", "values": [1.0, 2.0, 3.0] }
            ],
            "consumption": {
                "decile_1": [0.2, 0.4, 0.1],
                "black": [0.3, 0.3, 0.3]
            },
            "population_counts": { "decile_1": 1200, "black": 900 },
            "emissions": { "domestic": [[1.0, 0.5], [2.0, 0.25]] },
            "concentrations": [
                { "pollutant": "total_pm25", "location": "domestic", "values": [8.0, 9.5] }
            ],
            "populations": { "TotalPop": [100.0, 50.0], "Black": [10.0, 5.0] }
        }
    }
}"#;

#[test]
fn test_load_sample() {
    let ds = Dataset::from_json(SAMPLE).unwrap();

    assert_eq!(ds.sccs.len(), 2);
    assert_eq!(ds.years().collect::<Vec<_>>(), vec![2015]);
    assert_eq!(ds.population_names().unwrap(), vec!["TotalPop", "Black"]);

    let decile = Demograph::Decile(Decile::First);
    let black = Demograph::Ethnicity(Ethnicity::Black);
    assert_eq!(ds.demographic_consumption(decile, 2015).unwrap().len(), 3);
    assert_eq!(ds.population_count(black, 2015).unwrap(), 900);

    let reference = ds.reference_data().unwrap();
    assert_eq!(reference.sccs()[1].as_str(), "2103007000");
}

#[test]
fn test_round_trip_preserves_dataset() {
    let ds = Dataset::from_json(SAMPLE).unwrap();
    let json = ds.to_json().unwrap();
    assert!(json.contains("\"total_pm25\""));
    assert!(json.contains("\"decile_1\""));
    assert_eq!(Dataset::from_json(&json).unwrap(), ds);
}

#[rstest]
#[case(Pollutant::PrimaryPm25, "\"primary_pm25\"")]
#[case(Pollutant::Pnh4, "\"pnh4\"")]
#[case(Pollutant::TotalPm25, "\"total_pm25\"")]
fn test_pollutant_names(#[case] pollutant: Pollutant, #[case] json: &str) {
    assert_eq!(serde_json::to_string(&pollutant).unwrap(), json);
}

#[rstest]
#[case(FinalDemandType::PersonalConsumption, "\"personal_consumption\"")]
#[case(FinalDemandType::AllDemand, "\"all_demand\"")]
fn test_demand_type_names(#[case] demand: FinalDemandType, #[case] json: &str) {
    assert_eq!(serde_json::to_string(&demand).unwrap(), json);
}

#[test]
fn test_location_names() {
    assert_eq!(serde_json::to_string(&Location::Imports).unwrap(), "\"imports\"");
}

#[test]
fn test_unknown_group_key_is_rejected() {
    let json = SAMPLE.replace("\"decile_1\": [0.2", "\"decile_42\": [0.2");
    assert!(matches!(Dataset::from_json(&json), Err(DataError::Json(_))));
}

#[test]
fn test_inconsistent_demand_is_rejected() {
    let json = SAMPLE.replace("[1.0, 2.0, 3.0]", "[1.0, 2.0]");
    assert!(matches!(
        Dataset::from_json(&json),
        Err(DataError::InvalidDataset(_))
    ));
}

#[test]
fn test_missing_file() {
    let err = Dataset::from_json_file(std::path::Path::new("/nonexistent/dataset.json"));
    assert!(matches!(err, Err(DataError::Io(_))));
}
