//! Commuter Line Simulator
//!
//! Runs the line simulation repeatedly and appends each run's mean
//! satisfaction to the results file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use rail_core::{
    ConfigError, RandomDisruptions, ResultSinks, ResultsFile, RunDriver, RunLog, SimConfig,
    SnapshotWriter, DEFAULT_TUNING_PATH,
};
use rail_events::series_mean;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "line_sim")]
#[command(about = "Commuter line disruption and satisfaction simulator")]
struct Args {
    /// Tuning file; defaults are used if the default path does not exist
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of independent runs
    #[arg(long)]
    runs: Option<u32>,

    /// Ticks per run
    #[arg(long)]
    steps: Option<u32>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// File receiving one mean satisfaction per run
    #[arg(long)]
    results: Option<PathBuf>,

    /// JSON Lines file receiving one summary per run
    #[arg(long)]
    run_log: Option<PathBuf>,

    /// JSON Lines file receiving one snapshot per tick
    #[arg(long)]
    snapshots: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log each disruption; repeat (-vv) to report every train every tick
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.print_config {
        return match config.to_toml() {
            Ok(toml) => {
                print!("{}", toml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let stations = config.station_table();
    println!("Commuter Line Simulator");
    println!("=======================");
    println!(
        "Line: {} stations, {} -> {}",
        stations.len(),
        stations.name_at(0),
        stations.name_at(stations.last_index())
    );
    println!(
        "Fleets: {} up, {} down, every {} ticks",
        config.fleets.up_trains, config.fleets.down_trains, config.fleets.departure_interval
    );
    println!("Runs: {} x {} ticks", config.simulation.runs, config.simulation.steps);
    match config.simulation.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: from entropy"),
    }
    println!();

    let source = match config.simulation.seed {
        Some(seed) => RandomDisruptions::seeded(seed, &config.disruption),
        None => RandomDisruptions::from_entropy(&config.disruption),
    };
    let mut driver = RunDriver::new(&config, stations, Box::new(source));

    if let Some(path) = &config.output.snapshot_path {
        match SnapshotWriter::create(path) {
            Ok(writer) => driver = driver.with_snapshots(writer),
            Err(e) => tracing::warn!("Snapshot log disabled: {}", e),
        }
    }

    let mut sinks = ResultSinks::new().with(ResultsFile::new(&config.output.results_path));
    if let Some(path) = &config.output.run_log_path {
        sinks.push(RunLog::new(path));
    }

    let summaries = driver.run_many(config.simulation.runs, &mut sinks);

    let means: Vec<f64> = summaries.iter().map(|s| s.mean_satisfaction).collect();
    let disruptions: u32 = summaries.iter().map(|s| s.disruptions).sum();
    println!();
    println!(
        "Simulation complete. {} runs, mean satisfaction {:.2}, {} disruptions.",
        summaries.len(),
        series_mean(&means),
        disruptions
    );
    println!("Results appended to {}", config.output.results_path.display());
    if sinks.failures() > 0 {
        println!("{} result writes failed; see warnings above.", sinks.failures());
    }

    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the tuning file and applies command line overrides.
fn load_config(args: &Args) -> Result<SimConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::load_or_default(DEFAULT_TUNING_PATH)?,
    };

    if let Some(runs) = args.runs {
        config.simulation.runs = runs;
    }
    if let Some(steps) = args.steps {
        config.simulation.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(path) = &args.results {
        config.output.results_path = path.clone();
    }
    if let Some(path) = &args.run_log {
        config.output.run_log_path = Some(path.clone());
    }
    if let Some(path) = &args.snapshots {
        config.output.snapshot_path = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}
