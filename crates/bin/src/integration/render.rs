//! Rendering pipeline results in the configured format.

use crate::config::OutputFormat;
use exposure::{PipelineOutput, PipelineRequest};
use exposure_output::{ExportFormat, Exporter};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `output` to `path`, or to stdout when no path is given.
///
/// CSV produces two tables; with a path they go to `<stem>_emissions.csv`
/// and `<stem>_exposure.csv` next to it.
pub(crate) fn write_output(
    output: &PipelineOutput,
    request: &PipelineRequest,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let report = output.report(request);

    let content = match format {
        OutputFormat::Text => report.to_ascii(),
        OutputFormat::Markdown => report.to_markdown(),
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Csv => {
            let emissions = output.emissions_summary(request);
            let exposure = output.exposure_summary(request);
            if let Some(path) = path {
                let emissions_path = suffixed(path, "emissions");
                let exposure_path = suffixed(path, "exposure");
                emissions.export_to_file(&emissions_path, ExportFormat::Csv)?;
                exposure.export_to_file(&exposure_path, ExportFormat::Csv)?;
                info!(
                    emissions = %emissions_path.display(),
                    exposure = %exposure_path.display(),
                    "wrote CSV tables"
                );
                return Ok(());
            }
            format!(
                "{}\n{}",
                emissions.export_to_string(ExportFormat::Csv)?,
                exposure.export_to_string(ExportFormat::Csv)?
            )
        }
    };

    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            info!(path = %path.display(), "wrote report");
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "exposure".to_string());
    path.with_file_name(format!("{stem}_{suffix}.csv"))
}
