//! The `StepLoop` and its stop rules.

use log::{debug, info};

use st_core::{Step, StepLimit};
use st_traci::SimulationControl;

use crate::{SimResult, StepObserver};

/// Why a run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The simulator reported no more expected vehicles.
    Depleted,
    /// The step ceiling was reached.
    StepLimit,
}

/// Outcome of a completed run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps actually simulated (and observed).
    pub steps_executed: u64,
    pub stop_reason:    StopReason,
}

/// Drives a simulation one step at a time until depletion or the ceiling.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepLoop {
    pub limit: StepLimit,
}

impl StepLoop {
    pub fn new(limit: StepLimit) -> Self {
        Self { limit }
    }

    /// Run to completion, calling `observer` after every simulated step.
    pub fn run<O>(&self, control: &mut dyn SimulationControl, observer: &mut O) -> SimResult<RunSummary>
    where
        O: StepObserver + ?Sized,
    {
        observer.on_run_start()?;

        let mut step = Step::ZERO;
        let stop_reason = loop {
            if control.min_expected_number()? <= 0 {
                break StopReason::Depleted;
            }
            step.advance();
            if self.limit.exceeded_by(step) {
                break StopReason::StepLimit;
            }

            control.simulation_step()?;
            debug!("step {step}");
            observer.on_step(step, control)?;
        };

        let steps_executed = match stop_reason {
            StopReason::Depleted => step.0,
            StopReason::StepLimit => step.0 - 1,
        };
        let summary = RunSummary { steps_executed, stop_reason };
        info!("run stopped after {steps_executed} steps ({stop_reason:?})");

        observer.on_run_end(&summary)?;
        Ok(summary)
    }
}
