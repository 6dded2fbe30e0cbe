//! Scoped ownership of a simulator connection.
//!
//! A [`Session`] closes its connection exactly once: explicitly through
//! [`Session::close`], or on drop when a run ends early with an error.

use log::{info, warn};

use st_traci::SimulationControl;

use crate::SimResult;

/// GUI view adjusted when running under `sumo-gui`.
pub const GUI_VIEW: &str = "View #0";
/// Visualisation scheme applied to [`GUI_VIEW`].
pub const GUI_SCHEMA: &str = "real world";

/// Owns a [`SimulationControl`] for the duration of one run.
pub struct Session<C: SimulationControl> {
    control: C,
    closed:  bool,
}

impl<C: SimulationControl> Session<C> {
    /// Take ownership of an open connection.  With `gui`, switch the main
    /// view to the real-world scheme first.
    pub fn open(control: C, gui: bool) -> SimResult<Self> {
        let mut session = Self { control, closed: false };
        if gui {
            session.control.set_gui_schema(GUI_VIEW, GUI_SCHEMA)?;
            info!("set {GUI_VIEW:?} schema to {GUI_SCHEMA:?}");
        }
        Ok(session)
    }

    pub fn control(&mut self) -> &mut C {
        &mut self.control
    }

    /// Close the connection and consume the session.
    pub fn close(mut self) -> SimResult<()> {
        self.closed = true;
        self.control.close()?;
        Ok(())
    }
}

impl<C: SimulationControl> Drop for Session<C> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.control.close() {
                warn!("closing simulator session on drop failed: {e}");
            }
        }
    }
}
