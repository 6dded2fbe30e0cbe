//! Integration tests for st-sim.

use st_core::{Step, StepLimit};
use st_traci::SimulationControl;

use crate::{SimError, SimResult, StepObserver};
use crate::scripted::{ScriptedSimulation, VehicleState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fleet(n: usize) -> Vec<VehicleState> {
    (0..n).map(|i| VehicleState::on(&format!("veh{i}"), "E0")).collect()
}

/// Records the step numbers and vehicle counts it observes.
#[derive(Default)]
struct Recorder {
    steps:    Vec<u64>,
    vehicles: usize,
    started:  bool,
    ended:    bool,
}

impl StepObserver for Recorder {
    fn on_run_start(&mut self) -> SimResult<()> {
        self.started = true;
        Ok(())
    }

    fn on_step(&mut self, step: Step, control: &mut dyn SimulationControl) -> SimResult<()> {
        self.steps.push(step.0);
        self.vehicles += control.vehicle_ids()?.len();
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &crate::RunSummary) -> SimResult<()> {
        self.ended = true;
        Ok(())
    }
}

// ── Stop rules ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stop_rules {
    use super::*;
    use crate::{NoopObserver, StepLoop, StopReason};

    #[test]
    fn never_depleting_stops_at_400() {
        let mut sim = ScriptedSimulation::endless(fleet(2));
        let probe = sim.probe();
        let summary = StepLoop::default().run(&mut sim, &mut NoopObserver).unwrap();
        assert_eq!(summary.steps_executed, 400);
        assert_eq!(summary.stop_reason, StopReason::StepLimit);
        assert_eq!(probe.steps(), 400, "step 401 must not be simulated");
    }

    #[test]
    fn depletion_after_k_stops_at_k() {
        let mut sim = ScriptedSimulation::endless(fleet(1)).depleted_after(17);
        let probe = sim.probe();
        let summary = StepLoop::default().run(&mut sim, &mut NoopObserver).unwrap();
        assert_eq!(summary.steps_executed, 17);
        assert_eq!(summary.stop_reason, StopReason::Depleted);
        assert_eq!(probe.steps(), 17);
    }

    #[test]
    fn depletion_exactly_at_limit_reports_depleted() {
        let mut sim = ScriptedSimulation::endless(fleet(1)).depleted_after(400);
        let summary = StepLoop::default().run(&mut sim, &mut NoopObserver).unwrap();
        assert_eq!(summary.steps_executed, 400);
        assert_eq!(summary.stop_reason, StopReason::Depleted);
    }

    #[test]
    fn already_depleted_runs_nothing() {
        let mut sim = ScriptedSimulation::new(vec![]);
        let mut rec = Recorder::default();
        let summary = StepLoop::default().run(&mut sim, &mut rec).unwrap();
        assert_eq!(summary.steps_executed, 0);
        assert!(rec.steps.is_empty());
        assert!(rec.started && rec.ended);
    }

    #[test]
    fn custom_limit() {
        let mut sim = ScriptedSimulation::endless(fleet(1));
        let summary = StepLoop::new(StepLimit::new(5).unwrap())
            .run(&mut sim, &mut NoopObserver)
            .unwrap();
        assert_eq!(summary.steps_executed, 5);
        assert_eq!(summary.stop_reason, StopReason::StepLimit);
    }
}

// ── Observation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod observation {
    use super::*;
    use crate::StepLoop;

    #[test]
    fn observer_sees_each_step_in_order() {
        let mut sim = ScriptedSimulation::new(vec![fleet(1), fleet(3), fleet(2)]);
        let mut rec = Recorder::default();
        StepLoop::default().run(&mut sim, &mut rec).unwrap();
        assert_eq!(rec.steps, vec![1, 2, 3]);
        assert_eq!(rec.vehicles, 6);
    }

    #[test]
    fn simulator_error_aborts_run() {
        let mut sim = ScriptedSimulation::endless(fleet(1)).fail_step_at(3);
        let mut rec = Recorder::default();
        let result = StepLoop::default().run(&mut sim, &mut rec);
        assert!(matches!(result, Err(SimError::Traci(_))));
        assert_eq!(rec.steps, vec![1, 2]);
        assert!(!rec.ended);
    }

    #[test]
    fn observer_error_aborts_run() {
        struct FailOnSecond;
        impl StepObserver for FailOnSecond {
            fn on_step(&mut self, step: Step, _c: &mut dyn SimulationControl) -> SimResult<()> {
                if step.0 == 2 {
                    return Err(SimError::Observer("boom".into()));
                }
                Ok(())
            }
        }

        let mut sim = ScriptedSimulation::endless(fleet(1));
        let probe = sim.probe();
        let result = StepLoop::default().run(&mut sim, &mut FailOnSecond);
        assert!(matches!(result, Err(SimError::Observer(_))));
        assert_eq!(probe.steps(), 2);
    }
}

// ── Sessions ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sessions {
    use super::*;
    use crate::{GUI_SCHEMA, GUI_VIEW, NoopObserver, Session, StepLoop};

    #[test]
    fn explicit_close_closes_once() {
        let sim = ScriptedSimulation::new(vec![fleet(1)]);
        let probe = sim.probe();
        let mut session = Session::open(sim, false).unwrap();
        StepLoop::default().run(session.control(), &mut NoopObserver).unwrap();
        session.close().unwrap();
        assert_eq!(probe.close_calls(), 1);
    }

    #[test]
    fn error_path_still_closes() {
        let sim = ScriptedSimulation::endless(fleet(1)).fail_step_at(2);
        let probe = sim.probe();
        let result = (|| -> SimResult<()> {
            let mut session = Session::open(sim, false)?;
            StepLoop::default().run(session.control(), &mut NoopObserver)?;
            session.close()
        })();
        assert!(result.is_err());
        assert_eq!(probe.close_calls(), 1, "drop must close the connection");
    }

    #[test]
    fn gui_session_sets_schema() {
        let sim = ScriptedSimulation::new(vec![]);
        let probe = sim.probe();
        let session = Session::open(sim, true).unwrap();
        assert_eq!(probe.gui_schema(), Some((GUI_VIEW.to_string(), GUI_SCHEMA.to_string())));
        session.close().unwrap();
    }

    #[test]
    fn headless_session_leaves_schema_alone() {
        let sim = ScriptedSimulation::new(vec![]);
        let probe = sim.probe();
        drop(Session::open(sim, false).unwrap());
        assert_eq!(probe.gui_schema(), None);
        assert_eq!(probe.close_calls(), 1);
    }
}

// ── Scripted simulator ────────────────────────────────────────────────────────

#[cfg(test)]
mod scripted {
    use st_core::VehicleId;

    use super::*;

    #[test]
    fn unknown_vehicle_query_fails() {
        let mut sim = ScriptedSimulation::new(vec![fleet(1)]);
        sim.simulation_step().unwrap();
        assert!(sim.speed(&VehicleId::from("veh0")).is_ok());
        assert!(sim.speed(&VehicleId::from("ghost")).is_err());
    }

    #[test]
    fn queries_fail_after_close() {
        let mut sim = ScriptedSimulation::new(vec![fleet(1)]);
        sim.close().unwrap();
        assert!(sim.vehicle_ids().is_err());
        assert!(sim.simulation_step().is_err());
    }

    #[test]
    fn failing_vehicle_queries() {
        let mut sim = ScriptedSimulation::new(vec![fleet(2)]).fail_queries_for("veh1");
        sim.simulation_step().unwrap();
        assert!(sim.road_id(&VehicleId::from("veh0")).is_ok());
        assert!(sim.road_id(&VehicleId::from("veh1")).is_err());
    }
}
