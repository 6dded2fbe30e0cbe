//! The three entry points.
//!
//! All share one shape: open a [`Session`] on the launched simulator, run a
//! [`StepLoop`] with the entry point's observer, close the session, then
//! write whatever was collected.  The session is closed on every exit path;
//! an error mid-run drops it, and the drop closes the connection.

use anyhow::{Context, Result};
use log::info;

use st_core::Clock;
use st_network::load_net_xml;
use st_output::{
    CsvExporter, ExportStats, JunctionCollector, TrajectoryCollector, VehicleLogObserver,
};
use st_sim::{RunSummary, Session, StepLoop};
use st_traci::{LaunchCommand, SimulationControl, TraciResult};

use crate::CollectorConfig;

/// What one entry point did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Vehicle observations: rows exported, or id entries logged.
    pub rows:    usize,
    /// Head/full file sizes for the CSV entry points.
    pub export:  Option<ExportStats>,
}

/// Start the simulator; `gui_schema` applies the GUI view scheme when the
/// command runs `sumo-gui`.
fn open_session<C, F>(command: &LaunchCommand, launch: F, gui_schema: bool) -> Result<Session<C>>
where
    C: SimulationControl,
    F: FnOnce(&LaunchCommand) -> TraciResult<C>,
{
    let control = launch(command)
        .with_context(|| format!("starting simulator `{}`", command.program()))?;
    Ok(Session::open(control, gui_schema && command.is_gui())?)
}

/// Step the scenario and write the vehicle log.
pub fn basic_simulation<C, F>(
    config:  &CollectorConfig,
    command: &LaunchCommand,
    launch:  F,
    clock:   Box<dyn Clock>,
) -> Result<RunReport>
where
    C: SimulationControl,
    F: FnOnce(&LaunchCommand) -> TraciResult<C>,
{
    let step_loop = StepLoop::new(config.step_limit()?);
    let mut observer = VehicleLogObserver::create(&config.log_path, clock)
        .with_context(|| format!("opening {}", config.log_path.display()))?;

    let mut session = open_session(command, launch, true)?;
    info!("basic simulation started");
    let summary = step_loop.run(session.control(), &mut observer)?;
    session.close()?;
    info!("basic simulation finished after {} steps", summary.steps_executed);

    Ok(RunReport { summary, rows: observer.entries(), export: None })
}

/// Collect per-vehicle trajectories and export them as CSV.
pub fn trajectory_export<C, F>(
    config:  &CollectorConfig,
    command: &LaunchCommand,
    launch:  F,
    clock:   Box<dyn Clock>,
) -> Result<RunReport>
where
    C: SimulationControl,
    F: FnOnce(&LaunchCommand) -> TraciResult<C>,
{
    let step_loop = StepLoop::new(config.step_limit()?);
    let mut collector = TrajectoryCollector::new(clock);

    // The trajectory export leaves the GUI's view scheme untouched.
    let mut session = open_session(command, launch, false)?;
    info!("trajectory export started");
    let summary = step_loop.run(session.control(), &mut collector)?;
    session.close()?;

    let mut table = collector.into_table();
    let stats = CsvExporter::new(config.trajectory_paths())
        .with_head_rows(config.head_rows)
        .export(&mut table)
        .context("writing trajectory CSV")?;
    info!("trajectory export finished after {} steps", summary.steps_executed);

    Ok(RunReport { summary, rows: stats.full_rows, export: Some(stats) })
}

/// Resolve each vehicle's segment to its junctions and export as CSV.
///
/// The network is read before the simulator is started.
pub fn junction_export<C, F>(
    config:  &CollectorConfig,
    command: &LaunchCommand,
    launch:  F,
    clock:   Box<dyn Clock>,
) -> Result<RunReport>
where
    C: SimulationControl,
    F: FnOnce(&LaunchCommand) -> TraciResult<C>,
{
    let step_loop = StepLoop::new(config.step_limit()?);
    let network = load_net_xml(&config.network_path)
        .with_context(|| format!("reading network {}", config.network_path.display()))?;
    let mut collector = JunctionCollector::new(&network, config.label(), clock);

    let mut session = open_session(command, launch, true)?;
    info!("junction export started");
    let summary = step_loop.run(session.control(), &mut collector)?;
    session.close()?;

    let mut table = collector.into_table();
    let stats = CsvExporter::new(config.junction_paths())
        .with_head_rows(config.head_rows)
        .export(&mut table)
        .context("writing junction CSV")?;
    info!("junction export finished after {} steps", summary.steps_executed);

    Ok(RunReport { summary, rows: stats.full_rows, export: Some(stats) })
}
