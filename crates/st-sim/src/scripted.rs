//! A deterministic in-memory simulator.
//!
//! Each simulated step exposes a scripted list of vehicles.  Used by tests
//! throughout the workspace wherever a real SUMO process would be needed.
//!
//! `convert_geo` maps a position to `(x / 1000, y / 1000)` so expected
//! values are easy to write down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use st_core::{EdgeId, GeoCoord, LaneId, Position, VehicleId};
use st_traci::{NextTls, SimulationControl, TraciError, TraciResult};

use st_traci::constants::{CMD_GET_VEHICLE_VARIABLE, CMD_SIMSTEP};

// ── VehicleState ──────────────────────────────────────────────────────────────

/// Everything a scripted vehicle reports for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub id:       VehicleId,
    pub position: Position,
    /// m/s.
    pub speed:    f64,
    pub road:     EdgeId,
    pub lane:     LaneId,
    pub distance: f64,
    pub angle:    f64,
    pub next_tls: Vec<NextTls>,
}

impl VehicleState {
    /// A stationary vehicle on `road`, lane index 0.
    pub fn on(id: &str, road: &str) -> Self {
        Self {
            id:       VehicleId::from(id),
            position: Position::default(),
            speed:    0.0,
            road:     EdgeId::from(road),
            lane:     LaneId::new(format!("{road}_0")),
            distance: 0.0,
            angle:    0.0,
            next_tls: Vec::new(),
        }
    }
}

// ── ScriptProbe ───────────────────────────────────────────────────────────────

/// Shared counters that outlive the simulation they observe.
#[derive(Debug, Clone, Default)]
pub struct ScriptProbe {
    steps:       Arc<AtomicUsize>,
    close_calls: Arc<AtomicUsize>,
    gui_schema:  Arc<Mutex<Option<(String, String)>>>,
}

impl ScriptProbe {
    /// Successful `simulation_step` calls.
    pub fn steps(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    /// Calls to `close`, including repeated ones.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Last `(view, schema)` passed to `set_gui_schema`.
    pub fn gui_schema(&self) -> Option<(String, String)> {
        self.gui_schema.lock().ok().and_then(|g| g.clone())
    }
}

// ── ScriptedSimulation ────────────────────────────────────────────────────────

/// Deterministic [`SimulationControl`] driven by a per-step vehicle script.
pub struct ScriptedSimulation {
    /// Vehicles active after step `i + 1`.
    schedule:        Vec<Vec<VehicleState>>,
    /// Reuse the last scripted step forever once the script runs out.
    repeat_last:     bool,
    /// `min_expected_number` drops to 0 once this many steps have run.
    depleted_after:  Option<u64>,
    fail_step_at:    Option<u64>,
    failing_vehicle: Option<VehicleId>,
    current:         u64,
    closed:          bool,
    probe:           ScriptProbe,
}

impl ScriptedSimulation {
    /// Play `schedule` once; the simulation depletes after its last step.
    pub fn new(schedule: Vec<Vec<VehicleState>>) -> Self {
        let steps = schedule.len() as u64;
        Self {
            schedule,
            repeat_last:     false,
            depleted_after:  Some(steps),
            fail_step_at:    None,
            failing_vehicle: None,
            current:         0,
            closed:          false,
            probe:           ScriptProbe::default(),
        }
    }

    /// The same vehicles at every step, never depleting.
    pub fn endless(vehicles: Vec<VehicleState>) -> Self {
        Self {
            repeat_last:     true,
            depleted_after:  None,
            ..Self::new(vec![vehicles])
        }
    }

    /// Deplete after `steps` steps instead of at the end of the script.
    pub fn depleted_after(mut self, steps: u64) -> Self {
        self.depleted_after = Some(steps);
        self
    }

    /// Make the `step`-th call to `simulation_step` fail.
    pub fn fail_step_at(mut self, step: u64) -> Self {
        self.fail_step_at = Some(step);
        self
    }

    /// Make every per-vehicle query for `id` fail.
    pub fn fail_queries_for(mut self, id: &str) -> Self {
        self.failing_vehicle = Some(VehicleId::from(id));
        self
    }

    pub fn probe(&self) -> ScriptProbe {
        self.probe.clone()
    }

    fn ensure_open(&self) -> TraciResult<()> {
        if self.closed { Err(TraciError::Closed) } else { Ok(()) }
    }

    fn active(&self) -> &[VehicleState] {
        if self.current == 0 {
            return &[];
        }
        let idx = (self.current - 1) as usize;
        match self.schedule.get(idx) {
            Some(v) => v.as_slice(),
            None if self.repeat_last => self.schedule.last().map(Vec::as_slice).unwrap_or(&[]),
            None => &[],
        }
    }

    fn vehicle(&self, id: &VehicleId) -> TraciResult<&VehicleState> {
        self.ensure_open()?;
        let unknown = || TraciError::CommandFailed {
            command:     CMD_GET_VEHICLE_VARIABLE,
            description: format!("Vehicle '{id}' is not known"),
        };
        if self.failing_vehicle.as_ref() == Some(id) {
            return Err(unknown());
        }
        self.active().iter().find(|v| &v.id == id).ok_or_else(unknown)
    }
}

impl SimulationControl for ScriptedSimulation {
    fn simulation_step(&mut self) -> TraciResult<()> {
        self.ensure_open()?;
        if self.fail_step_at == Some(self.current + 1) {
            return Err(TraciError::CommandFailed {
                command:     CMD_SIMSTEP,
                description: format!("scripted failure at step {}", self.current + 1),
            });
        }
        self.current += 1;
        self.probe.steps.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn min_expected_number(&mut self) -> TraciResult<i32> {
        self.ensure_open()?;
        match self.depleted_after {
            Some(k) if self.current >= k => Ok(0),
            _ => Ok(self.active().len() as i32 + 1),
        }
    }

    fn vehicle_ids(&mut self) -> TraciResult<Vec<VehicleId>> {
        self.ensure_open()?;
        Ok(self.active().iter().map(|v| v.id.clone()).collect())
    }

    fn position(&mut self, vehicle: &VehicleId) -> TraciResult<Position> {
        Ok(self.vehicle(vehicle)?.position)
    }

    fn speed(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        Ok(self.vehicle(vehicle)?.speed)
    }

    fn road_id(&mut self, vehicle: &VehicleId) -> TraciResult<EdgeId> {
        Ok(self.vehicle(vehicle)?.road.clone())
    }

    fn lane_id(&mut self, vehicle: &VehicleId) -> TraciResult<LaneId> {
        Ok(self.vehicle(vehicle)?.lane.clone())
    }

    fn distance(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        Ok(self.vehicle(vehicle)?.distance)
    }

    fn angle(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        Ok(self.vehicle(vehicle)?.angle)
    }

    fn next_tls(&mut self, vehicle: &VehicleId) -> TraciResult<Vec<NextTls>> {
        Ok(self.vehicle(vehicle)?.next_tls.clone())
    }

    fn convert_geo(&mut self, position: Position) -> TraciResult<GeoCoord> {
        self.ensure_open()?;
        Ok(GeoCoord::new(position.x / 1000.0, position.y / 1000.0))
    }

    fn set_gui_schema(&mut self, view: &str, schema: &str) -> TraciResult<()> {
        self.ensure_open()?;
        if let Ok(mut g) = self.probe.gui_schema.lock() {
            *g = Some((view.to_owned(), schema.to_owned()));
        }
        Ok(())
    }

    fn close(&mut self) -> TraciResult<()> {
        self.probe.close_calls.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        Ok(())
    }
}
