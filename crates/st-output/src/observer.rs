//! Step observers that turn simulator state into log lines and rows.

use std::path::Path;

use log::{debug, info, warn};

use st_core::{Clock, MS_TO_KMH, Step, round2};
use st_network::{JunctionLookup, RoadNetwork};
use st_sim::{RunSummary, SimError, SimResult, StepObserver};
use st_traci::{SimulationControl, render_next_tls};

use crate::row::{JunctionRow, NotFoundLabel, TrajectoryRow};
use crate::table::ExportTable;
use crate::vehicle_log::VehicleLog;
use crate::OutputError;

impl From<OutputError> for SimError {
    fn from(e: OutputError) -> Self {
        match e {
            OutputError::Io(io) => SimError::Io(io),
            other => SimError::Observer(other.to_string()),
        }
    }
}

// ── VehicleLogObserver ────────────────────────────────────────────────────────

/// Basic Loop observer: one log block per simulated step.
pub struct VehicleLogObserver {
    log:     VehicleLog,
    clock:   Box<dyn Clock>,
    entries: usize,
}

impl VehicleLogObserver {
    /// Open the log at `path` and stamp the start time.
    pub fn create(path: &Path, clock: Box<dyn Clock>) -> SimResult<Self> {
        let log = VehicleLog::create(path, clock.now())?;
        info!("logging vehicles to {}", path.display());
        Ok(Self { log, clock, entries: 0 })
    }

    /// Vehicle ids logged across all steps.
    pub fn entries(&self) -> usize {
        self.entries
    }
}

impl StepObserver for VehicleLogObserver {
    fn on_step(&mut self, step: Step, control: &mut dyn SimulationControl) -> SimResult<()> {
        let vehicles = control.vehicle_ids()?;
        self.log.write_step(step, &vehicles)?;
        self.entries += vehicles.len();
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> SimResult<()> {
        self.log.finish(self.clock.now())?;
        Ok(())
    }
}

// ── TrajectoryCollector ───────────────────────────────────────────────────────

/// Trajectory Exporter observer: the extended attribute set per vehicle.
pub struct TrajectoryCollector {
    table: ExportTable<TrajectoryRow>,
    clock: Box<dyn Clock>,
}

impl TrajectoryCollector {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { table: ExportTable::new(), clock }
    }

    pub fn table(&self) -> &ExportTable<TrajectoryRow> {
        &self.table
    }

    pub fn into_table(self) -> ExportTable<TrajectoryRow> {
        self.table
    }
}

impl StepObserver for TrajectoryCollector {
    fn on_step(&mut self, step: Step, control: &mut dyn SimulationControl) -> SimResult<()> {
        let vehicles = control.vehicle_ids()?;
        debug!("step {step}: {} vehicles", vehicles.len());

        for vehicle_id in vehicles {
            let position = control.position(&vehicle_id)?;
            let geo = control.convert_geo(position)?;
            let speed_kmh = round2(control.speed(&vehicle_id)? * MS_TO_KMH);
            let edge = control.road_id(&vehicle_id)?;
            let lane = control.lane_id(&vehicle_id)?;
            let displacement = round2(control.distance(&vehicle_id)?);
            let turn_angle = round2(control.angle(&vehicle_id)?);
            let next_tls = render_next_tls(&control.next_tls(&vehicle_id)?);

            self.table.push(TrajectoryRow {
                date_time: self.clock.now(),
                vehicle_id,
                position,
                geo,
                speed_kmh,
                edge,
                lane,
                displacement,
                turn_angle,
                next_tls,
            });
        }
        Ok(())
    }
}

// ── JunctionCollector ─────────────────────────────────────────────────────────

/// Junction Exporter observer: each vehicle's segment resolved to its
/// bounding junctions.
///
/// A lookup that does not find the junctions still yields a row; both
/// junction fields then carry the [`NotFoundLabel`].
pub struct JunctionCollector<'n> {
    network:  &'n RoadNetwork,
    label:    NotFoundLabel,
    table:    ExportTable<JunctionRow>,
    clock:    Box<dyn Clock>,
    fallback: usize,
}

impl<'n> JunctionCollector<'n> {
    pub fn new(network: &'n RoadNetwork, label: NotFoundLabel, clock: Box<dyn Clock>) -> Self {
        Self {
            network,
            label,
            table: ExportTable::new(),
            clock,
            fallback: 0,
        }
    }

    /// Rows written with the fallback label so far.
    pub fn fallback_rows(&self) -> usize {
        self.fallback
    }

    pub fn table(&self) -> &ExportTable<JunctionRow> {
        &self.table
    }

    pub fn into_table(self) -> ExportTable<JunctionRow> {
        self.table
    }
}

impl StepObserver for JunctionCollector<'_> {
    fn on_step(&mut self, step: Step, control: &mut dyn SimulationControl) -> SimResult<()> {
        let vehicles = control.vehicle_ids()?;
        debug!("step {step}: {} vehicles", vehicles.len());

        for vehicle_id in vehicles {
            let lane_id = control.lane_id(&vehicle_id)?;
            let edge_id = control.road_id(&vehicle_id)?;
            let position = control.position(&vehicle_id)?;
            let date_time = self.clock.now();

            let lookup = self.network.lookup(&edge_id);
            match &lookup {
                JunctionLookup::Found { .. } => {}
                JunctionLookup::SegmentNotFound => {
                    self.fallback += 1;
                    warn!(
                        "{date_time} {vehicle_id} {edge_id} {lane_id} {}: segment not in network",
                        self.label.as_str()
                    );
                }
                JunctionLookup::LookupError(cause) => {
                    self.fallback += 1;
                    warn!(
                        "{date_time} {vehicle_id} {edge_id} {lane_id} {}: {cause}",
                        self.label.as_str()
                    );
                }
            }

            self.table.push(JunctionRow {
                date_time,
                vehicle_id,
                position,
                edge_id,
                lane_id,
                lookup,
                label: self.label.clone(),
            });
        }
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> SimResult<()> {
        if self.fallback > 0 {
            info!(
                "{} of {} rows after {} steps carry {}",
                self.fallback,
                self.table.len(),
                summary.steps_executed,
                self.label.as_str()
            );
        }
        Ok(())
    }
}
