//! Exposure CLI binary.
//!
//! Runs the exposure pipeline against a recorded dataset and prints or
//! exports the results.

mod config;
mod integration;

use clap::{Parser, Subcommand};
use config::{Config, OutputFormat, Overrides, default_config_path};
use exposure::Pipeline;
use exposure_core::{DemographicKind, Pollutant, Year};
use exposure_data::Dataset;
use integration::progress::ProgressObserver;
use integration::render::write_output;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "exposure")]
#[command(about = "Population-weighted pollution exposure by sector and demographic group")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline against a recorded dataset
    Run {
        /// Dataset JSON file
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Config file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Data year
        #[arg(long)]
        year: Option<Year>,

        /// `decile`, `ethnicity`, or a comma-separated list of groups
        #[arg(long)]
        groups: Option<String>,

        /// Pollutant (e.g. total_pm25, primary_pm25, soa)
        #[arg(long)]
        pollutant: Option<Pollutant>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List demographic groups and, with a dataset, its population grids
    Groups {
        /// Only list one classification
        #[arg(long)]
        kind: Option<DemographicKind>,

        /// Dataset JSON file
        #[arg(long)]
        dataset: Option<PathBuf>,
    },

    /// Write a default config file
    InitConfig {
        /// Destination (defaults to the platform config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;
    debug!(version = exposure::VERSION, "exposure starting");

    match cli.command {
        Commands::Run {
            dataset,
            config,
            year,
            groups,
            pollutant,
            format,
            output,
        } => {
            let mut config = Config::resolve(config.as_deref())?;
            config.merge(Overrides {
                dataset,
                year,
                pollutant,
                groups,
                format,
                output,
            });
            run_pipeline(&config, !cli.quiet)?;
        }
        Commands::Groups { kind, dataset } => {
            list_groups(kind, dataset)?;
        }
        Commands::InitConfig { path, force } => {
            let path = path.unwrap_or_else(default_config_path);
            Config::write_default(&path, force)?;
            println!("Created {}", path.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run_pipeline(config: &Config, show_progress: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::from_json_file(config.dataset()?)?;
    let reference = dataset.reference_data()?;
    let request = config.request()?;
    info!(
        sectors = reference.num_sectors(),
        industries = reference.num_industries(),
        "reference data ready"
    );

    let mut progress = ProgressObserver::new(request.groups.resolve().len(), show_progress)?;
    let output = match Pipeline::new(&reference).run_observed(&dataset, &request, &mut progress) {
        Ok(output) => {
            progress.finish("Done");
            output
        }
        Err(e) => {
            progress.finish("Failed!");
            return Err(e.into());
        }
    };

    write_output(
        &output,
        &request,
        config.output.format,
        config.output.path.as_deref(),
    )
}

fn list_groups(
    kind: Option<DemographicKind>,
    dataset: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![DemographicKind::Decile, DemographicKind::Ethnicity],
    };

    for kind in kinds {
        println!("\n{}:", kind);
        for group in kind.groups() {
            println!("  {}", group);
        }
    }

    if let Some(path) = dataset {
        let dataset = Dataset::from_json_file(&path)?;
        println!("\nPopulation grids in {}:", path.display());
        for name in &dataset.population_names {
            println!("  {}", name);
        }
        let years: Vec<String> = dataset.years().map(|y| y.to_string()).collect();
        println!("\nYears: {}", years.join(", "));
    }

    Ok(())
}
