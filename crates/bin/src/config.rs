//! Configuration file handling.
//!
//! Settings are read from `config.toml` in the platform config directory
//! (or a path given with `--config`) and then overridden by CLI flags.

use exposure::{GroupSelection, PipelineRequest};
use exposure_core::{DemographicKind, Demograph, FinalDemandType, Location, Pollutant, Year};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or writing configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// IO error
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: toml::de::Error,
    },

    /// Default config could not be rendered
    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    /// Group selection names neither a kind nor known groups
    #[error("Unknown group selection: {0}")]
    UnknownGroups(String),

    /// No dataset given on the command line or in the config file
    #[error("No dataset given; pass --dataset or set run.dataset")]
    MissingDataset,

    /// Refusing to overwrite an existing config file
    #[error("{} already exists; pass --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// Pipeline parameters.
    #[serde(default)]
    pub(crate) run: RunConfig,

    /// Output settings.
    #[serde(default)]
    pub(crate) output: OutputConfig,
}

/// Pipeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RunConfig {
    /// Recorded dataset to run against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) dataset: Option<PathBuf>,

    /// Data year.
    #[serde(default = "default_year")]
    pub(crate) year: Year,

    /// Location scope.
    #[serde(default)]
    pub(crate) location: Location,

    /// Pollutant species.
    #[serde(default)]
    pub(crate) pollutant: Pollutant,

    /// Final demand category.
    #[serde(default)]
    pub(crate) demand: FinalDemandType,

    /// `decile`, `ethnicity`, or a comma-separated list of groups.
    #[serde(default = "default_groups")]
    pub(crate) groups: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            year: default_year(),
            location: Location::default(),
            pollutant: Pollutant::default(),
            demand: FinalDemandType::default(),
            groups: default_groups(),
        }
    }
}

const fn default_year() -> Year {
    2015
}

fn default_groups() -> String {
    DemographicKind::default().to_string()
}

/// How results are rendered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub(crate) enum OutputFormat {
    /// ASCII tables
    #[default]
    Text,
    /// Markdown tables
    Markdown,
    /// Pretty JSON report
    Json,
    /// Flat CSV records
    Csv,
}

/// Output settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct OutputConfig {
    /// Render format.
    #[serde(default)]
    pub(crate) format: OutputFormat,

    /// Write here instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) path: Option<PathBuf>,
}

/// Values given on the command line, each overriding the config file.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub(crate) dataset: Option<PathBuf>,
    pub(crate) year: Option<Year>,
    pub(crate) pollutant: Option<Pollutant>,
    pub(crate) groups: Option<String>,
    pub(crate) format: Option<OutputFormat>,
    pub(crate) output: Option<PathBuf>,
}

/// Platform-specific config file location.
///
/// - Linux: `~/.config/exposure/config.toml`
/// - macOS: `~/Library/Application Support/exposure/config.toml`
/// - Windows: `%APPDATA%\exposure\config.toml`
pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("exposure")
        .join("config.toml")
}

impl Config {
    /// Load configuration from a file path.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else the default file if present, else defaults.
    pub(crate) fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply command-line overrides.
    pub(crate) fn merge(&mut self, overrides: Overrides) {
        if let Some(dataset) = overrides.dataset {
            self.run.dataset = Some(dataset);
        }
        if let Some(year) = overrides.year {
            self.run.year = year;
        }
        if let Some(pollutant) = overrides.pollutant {
            self.run.pollutant = pollutant;
        }
        if let Some(groups) = overrides.groups {
            self.run.groups = groups;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if let Some(path) = overrides.output {
            self.output.path = Some(path);
        }
    }

    /// Dataset path, which must be set by now.
    pub(crate) fn dataset(&self) -> Result<&Path, ConfigError> {
        self.run.dataset.as_deref().ok_or(ConfigError::MissingDataset)
    }

    /// Pipeline request described by the `[run]` table.
    pub(crate) fn request(&self) -> Result<PipelineRequest, ConfigError> {
        Ok(PipelineRequest::new(self.run.year)
            .location(self.run.location)
            .pollutant(self.run.pollutant)
            .demand_type(self.run.demand)
            .groups(parse_groups(&self.run.groups)?))
    }

    /// Default configuration as TOML.
    pub(crate) fn default_toml() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Write the default configuration to `path`.
    pub(crate) fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, Self::default_toml()?).map_err(io_err)
    }
}

/// Parse `decile`, `ethnicity`, or a comma-separated group list.
pub(crate) fn parse_groups(selection: &str) -> Result<GroupSelection, ConfigError> {
    if let Ok(kind) = selection.parse::<DemographicKind>() {
        return Ok(GroupSelection::Kind(kind));
    }
    let groups = selection
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Demograph>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConfigError::UnknownGroups(e.to_string()))?;
    if groups.is_empty() {
        return Err(ConfigError::UnknownGroups(selection.to_string()));
    }
    Ok(GroupSelection::Groups(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exposure_core::{Decile, Ethnicity};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.run.year, 2015);
        assert_eq!(config.run.groups, "decile");
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(matches!(config.dataset(), Err(ConfigError::MissingDataset)));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[run]
dataset = "demos/demo_dataset.json"
year = 2011
location = "imports"
pollutant = "primary_pm25"
demand = "government"
groups = "black, hispanic"

[output]
format = "csv"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.run.year, 2011);
        assert_eq!(config.run.location, Location::Imports);
        assert_eq!(config.run.demand, FinalDemandType::Government);
        assert_eq!(config.output.format, OutputFormat::Csv);

        let request = config.request().unwrap();
        assert_eq!(request.pollutant, Pollutant::PrimaryPm25);
        assert_eq!(
            request.groups.resolve(),
            vec![
                Demograph::Ethnicity(Ethnicity::Black),
                Demograph::Ethnicity(Ethnicity::Hispanic),
            ]
        );
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.merge(Overrides {
            year: Some(2020),
            groups: Some("decile_3".to_string()),
            format: Some(OutputFormat::Json),
            ..Overrides::default()
        });

        assert_eq!(config.run.year, 2020);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(
            config.request().unwrap().groups.resolve(),
            vec![Demograph::Decile(Decile::Third)]
        );
    }

    #[test]
    fn test_unknown_groups() {
        assert!(matches!(
            parse_groups("decile_11"),
            Err(ConfigError::UnknownGroups(_))
        ));
        assert!(matches!(parse_groups(" , "), Err(ConfigError::UnknownGroups(_))));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = Config::default_toml().unwrap();
        assert!(toml_str.contains("[run]"));
        assert!(toml_str.contains("[output]"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_write_default_refuses_overwrite() {
        let path = std::env::temp_dir().join("exposure_config_test.toml");
        std::fs::remove_file(&path).ok();

        Config::write_default(&path, false).unwrap();
        assert!(matches!(
            Config::write_default(&path, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        Config::write_default(&path, true).unwrap();

        std::fs::remove_file(path).ok();
    }
}
