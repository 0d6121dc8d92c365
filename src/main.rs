use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use surfbuoy_service::config::Config;
use surfbuoy_service::ingest::surfbuoys;
use surfbuoy_service::logging::{self, DataSource, LogLevel};
use surfbuoy_service::model::BuoyError;
use surfbuoy_service::normalize;
use surfbuoy_service::report;
use surfbuoy_service::stations;
use surfbuoy_service::verify;

#[derive(Parser)]
#[command(name = "surfbuoy")]
#[command(about = "Fetch and normalize Hawaiian surf buoy readings")]
#[command(version)]
struct Cli {
    /// Config file (default: ./surfbuoy.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a multi-station wave document
    Waves {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Readings to keep per station
        #[arg(short, long)]
        num_readings: Option<usize>,
    },
    /// Normalize the Kahului wind station document
    Wind {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Readings to keep
        #[arg(short, long)]
        num_readings: Option<usize>,
    },
    /// Fetch raw wave readings for the registry buoys
    FetchWaves {
        /// Where to write the raw document (default: waves.input)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Station ids to fetch (comma-separated). Default: all registry buoys
        #[arg(long, value_delimiter = ',')]
        stations: Vec<String>,
    },
    /// Fetch raw readings for the wind station
    FetchWind {
        /// Where to write the raw document (default: wind.input)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch buoys and wind, normalize both and write one combined report
    Report {
        /// Where to write the report (default: report.output)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Wave station ids (comma-separated). Default: all registry buoys
        #[arg(long, value_delimiter = ',')]
        stations: Vec<String>,
    },
    /// Check which stations the API currently serves
    Verify,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), BuoyError> {
    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli.command);
    config.validate()?;

    let level = if cli.verbose { LogLevel::Debug } else { config.log_level()? };
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);
    logging::debug(DataSource::Config, None, &format!("{:?}", config));

    match cli.command {
        Commands::Waves { .. } => {
            normalize::transform_wave_file(
                &config.waves.input,
                &config.waves.output,
                config.waves.num_readings,
            )?;
        }
        Commands::Wind { .. } => {
            normalize::transform_wind_file(
                &config.wind.input,
                &config.wind.output,
                &config.wind.station_id,
                config.wind.num_readings,
            )?;
        }
        Commands::FetchWaves { output, stations: requested } => {
            let ids = wave_station_ids(&requested);
            let client = surfbuoys::build_client()?;
            let raw = surfbuoys::fetch_stations(&client, &config.api.base_url, &ids)?;
            let path = output.unwrap_or(config.waves.input);
            normalize::write_json(&path, &raw)?;
            logging::info(
                DataSource::Api,
                None,
                &format!("raw readings for {} station(s) saved to {}", raw.len(), path.display()),
            );
        }
        Commands::FetchWind { output } => {
            let client = surfbuoys::build_client()?;
            let raw = surfbuoys::fetch_wind_station(
                &client,
                &config.api.base_url,
                &config.wind.station_id,
            )?;
            let path = output.unwrap_or(config.wind.input);
            normalize::write_json(&path, &raw)?;
            logging::info(
                DataSource::Api,
                Some(&config.wind.station_id),
                &format!("raw readings saved to {}", path.display()),
            );
        }
        Commands::Report { output, stations: requested } => {
            let ids = wave_station_ids(&requested);
            let client = surfbuoys::build_client()?;
            let surf_report = report::fetch_report(&client, &config, &ids)?;
            let path = output.unwrap_or(config.report.output);
            normalize::write_json(&path, &surf_report)?;
            logging::info(DataSource::System, None, &format!("report written to {}", path.display()));
        }
        Commands::Verify => {
            let report = verify::run_full_verification(&config)?;
            verify::print_summary(&report);
        }
    }

    Ok(())
}

/// The ids given on the command line, or every registry buoy.
fn wave_station_ids(requested: &[String]) -> Vec<&str> {
    if requested.is_empty() {
        stations::all_station_ids()
    } else {
        requested.iter().map(String::as_str).collect()
    }
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut Config, command: &Commands) {
    match command {
        Commands::Waves { input, output, num_readings } => {
            if let Some(p) = input {
                config.waves.input = p.clone();
            }
            if let Some(p) = output {
                config.waves.output = p.clone();
            }
            if let Some(n) = num_readings {
                config.waves.num_readings = *n;
            }
        }
        Commands::Wind { input, output, num_readings } => {
            if let Some(p) = input {
                config.wind.input = p.clone();
            }
            if let Some(p) = output {
                config.wind.output = p.clone();
            }
            if let Some(n) = num_readings {
                config.wind.num_readings = *n;
            }
        }
        Commands::FetchWaves { .. }
        | Commands::FetchWind { .. }
        | Commands::Report { .. }
        | Commands::Verify => {}
    }
}
