//! Export functionality for exposure results.
//!
//! This module provides CSV and JSON export for emissions attribution and
//! exposure summaries. CSV output is flattened to one record per cell.

use crate::attribution::EmissionsSummary;
use crate::summary::ExposureSummary;
use exposure_core::{Location, Pollutant, Year};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized bytes were not valid UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One attributed cell of the demand-emissions matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct EmissionsRecord {
    year: Year,
    location: Location,
    group: String,
    scc: String,
    emissions: f64,
}

/// Exposure of one gridded population.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ExposureRecord {
    pollutant: Pollutant,
    year: Year,
    location: Location,
    population_name: String,
    exposure: f64,
    population: f64,
    per_capita: Option<f64>,
}

impl EmissionsSummary {
    fn to_flat_records(&self) -> Vec<EmissionsRecord> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.sectors.iter().map(|sector| EmissionsRecord {
                    year: self.year,
                    location: self.location,
                    group: group.group.clone(),
                    scc: sector.scc.clone(),
                    emissions: sector.emissions,
                })
            })
            .collect()
    }
}

impl ExposureSummary {
    fn to_flat_records(&self) -> Vec<ExposureRecord> {
        self.groups
            .iter()
            .map(|group| ExposureRecord {
                pollutant: self.pollutant,
                year: self.year,
                location: self.location,
                population_name: group.name.clone(),
                exposure: group.exposure,
                population: group.population,
                per_capita: group.per_capita,
            })
            .collect()
    }
}

fn write_csv<T: Serialize>(records: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for EmissionsSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&self.to_flat_records()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for ExposureSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&self.to_flat_records()),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
