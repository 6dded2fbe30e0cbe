//! Step observer trait for per-step data collection.

use st_core::Step;
use st_traci::SimulationControl;

use crate::{RunSummary, SimResult};

/// Callbacks invoked by [`StepLoop::run`][crate::StepLoop::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  An `Err` from any hook aborts the run.
///
/// # Example: vehicle counter
///
/// ```rust,ignore
/// struct Counter { rows: usize }
///
/// impl StepObserver for Counter {
///     fn on_step(&mut self, _step: Step, control: &mut dyn SimulationControl) -> SimResult<()> {
///         self.rows += control.vehicle_ids()?.len();
///         Ok(())
///     }
/// }
/// ```
pub trait StepObserver {
    /// Called once before the first depletion check.
    fn on_run_start(&mut self) -> SimResult<()> {
        Ok(())
    }

    /// Called after each simulated step.  `control` reflects the state
    /// after that step.
    fn on_step(&mut self, _step: Step, _control: &mut dyn SimulationControl) -> SimResult<()> {
        Ok(())
    }

    /// Called once after the loop stops normally.
    fn on_run_end(&mut self, _summary: &RunSummary) -> SimResult<()> {
        Ok(())
    }
}

/// A [`StepObserver`] that does nothing.
pub struct NoopObserver;

impl StepObserver for NoopObserver {}
