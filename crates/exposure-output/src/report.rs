//! Report generation for exposure runs.

use crate::attribution::EmissionsSummary;
use crate::summary::ExposureSummary;
use chrono::{DateTime, Utc};
use exposure_core::Year;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A report of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Year of the run.
    pub year: Year,

    /// Emissions attribution, if computed.
    pub emissions: Option<EmissionsSummary>,

    /// Exposure results, if computed.
    pub exposure: Option<ExposureSummary>,
}

impl Report {
    /// Create a new report.
    pub fn new(title: String, year: Year) -> Self {
        Self {
            title,
            timestamp: Utc::now(),
            year,
            emissions: None,
            exposure: None,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &std::path::Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Render all sections as ASCII tables.
    pub fn to_ascii(&self) -> String {
        let mut output = format!(
            "{}\nGenerated: {}\n",
            self.title,
            self.timestamp.to_rfc3339()
        );
        if let Some(emissions) = &self.emissions {
            output.push_str(&emissions.to_ascii_table());
        }
        if let Some(exposure) = &self.exposure {
            output.push_str(&exposure.to_ascii_table());
        }
        output
    }

    /// Render all sections as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = format!(
            "# {}\n\n_Generated {}_\n\n",
            self.title,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if let Some(emissions) = &self.emissions {
            output.push('#');
            output.push_str(&emissions.to_markdown());
            output.push('\n');
        }
        if let Some(exposure) = &self.exposure {
            output.push('#');
            output.push_str(&exposure.to_markdown());
        }
        output
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    year: Option<Year>,
    emissions: Option<EmissionsSummary>,
    exposure: Option<ExposureSummary>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the year.
    pub const fn year(mut self, year: Year) -> Self {
        self.year = Some(year);
        self
    }

    /// Attach an emissions attribution summary.
    pub fn emissions(mut self, emissions: EmissionsSummary) -> Self {
        self.emissions = Some(emissions);
        self
    }

    /// Attach an exposure summary.
    pub fn exposure(mut self, exposure: ExposureSummary) -> Self {
        self.exposure = Some(exposure);
        self
    }

    /// Build the report.
    ///
    /// The year defaults to the year of whichever summary is attached.
    pub fn build(self) -> Report {
        let year = self
            .year
            .or_else(|| self.emissions.as_ref().map(|e| e.year))
            .or_else(|| self.exposure.as_ref().map(|e| e.year))
            .unwrap_or(2015);
        let mut report = Report::new(
            self.title
                .unwrap_or_else(|| "Pollution Exposure Report".to_string()),
            year,
        );
        report.emissions = self.emissions;
        report.exposure = self.exposure;
        report
    }
}
