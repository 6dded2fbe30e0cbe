//! `st-sim` — the control loop shared by every collector.
//!
//! # Step loop
//!
//! ```text
//! step = 0
//! while control.min_expected_number() > 0:
//!   step += 1
//!   if step > limit: stop          ← that step is not simulated
//!   control.simulation_step()
//!   observer.on_step(step, control)
//! ```
//!
//! The two stop causes are independent; whichever fires first ends the run.
//! Errors from the simulator or an observer end the run immediately.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use st_sim::{NoopObserver, Session, StepLoop};
//!
//! let mut session = Session::open(connection, command.is_gui())?;
//! let summary = StepLoop::default().run(session.control(), &mut NoopObserver)?;
//! session.close()?;
//! ```

pub mod error;
pub mod observer;
pub mod runner;
pub mod scripted;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, StepObserver};
pub use runner::{RunSummary, StepLoop, StopReason};
pub use scripted::{ScriptProbe, ScriptedSimulation, VehicleState};
pub use session::{GUI_SCHEMA, GUI_VIEW, Session};
