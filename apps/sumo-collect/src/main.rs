//! sumo-collect: drive a SUMO scenario over TraCI and export what the
//! vehicles did.
//!
//! ```text
//! sumo-collect [--config FILE] <basic|trajectory|junction> [-- SUMO ARGS...]
//! ```
//!
//! Set `RUST_LOG=debug` for per-step output.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;

use st_core::SystemClock;
use st_traci::{LaunchCommand, launch};
use sumo_collect::{CollectorConfig, basic_simulation, junction_export, trajectory_export};

#[derive(Parser, Debug)]
#[command(name = "sumo-collect", version, about = "SUMO vehicle telemetry collector")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Step ceiling (overrides the config file).
    #[arg(long)]
    max_steps: Option<u64>,

    /// Directory for the CSV exports.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log vehicle counts and ids per step.
    Basic(SumoArgs),
    /// Export per-vehicle trajectories.
    Trajectory(SumoArgs),
    /// Export each vehicle's bounding junctions.
    Junction {
        /// SUMO `.net.xml` to resolve segments against.
        #[arg(long)]
        network: Option<PathBuf>,

        #[command(flatten)]
        sumo: SumoArgs,
    },
}

#[derive(Args, Debug)]
struct SumoArgs {
    /// Simulator command line, e.g. `-- sumo-gui -c map.sumocfg`.
    #[arg(last = true)]
    sumo: Vec<String>,
}

impl Command {
    fn sumo_args(&self) -> &[String] {
        match self {
            Command::Basic(a) | Command::Trajectory(a) | Command::Junction { sumo: a, .. } => {
                &a.sumo
            }
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<CollectorConfig> {
    let mut config = match &cli.config {
        Some(path) => CollectorConfig::load(path)?,
        None => CollectorConfig::default(),
    };
    if let Some(n) = cli.max_steps {
        config.max_steps = n;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Command::Junction { network: Some(net), .. } = &cli.command {
        config.network_path = net.clone();
    }
    let args = cli.command.sumo_args();
    if !args.is_empty() {
        config.sumo_command = args.to_vec();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let command = config.launch_command()?;
    let options = config.launch_options();
    let launcher = |cmd: &LaunchCommand| launch(cmd, &options);
    let clock = Box::new(SystemClock);

    let report = match cli.command {
        Command::Basic(_) => basic_simulation(&config, &command, launcher, clock)?,
        Command::Trajectory(_) => trajectory_export(&config, &command, launcher, clock)?,
        Command::Junction { .. } => junction_export(&config, &command, launcher, clock)?,
    };

    info!(
        "{} steps ({:?}), {} vehicle observations",
        report.summary.steps_executed, report.summary.stop_reason, report.rows
    );
    Ok(())
}
