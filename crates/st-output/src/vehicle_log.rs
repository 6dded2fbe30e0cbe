//! The Basic Loop's line-oriented vehicle log.
//!
//! ```text
//! 2023-03-01 00:00:00.000000
//! ====================the 1 st====================
//! vehicle_number: 2
//! vehicle_id_list: ['veh0', 'veh1']
//! …
//! 2023-03-01 00:00:07.000000
//! ```
//!
//! The file is opened once and held for the whole run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use st_core::{Step, Timestamp, VehicleId};

use crate::OutputResult;

/// Writes the per-step vehicle log to any `Write` sink.
pub struct VehicleLog<W: Write = BufWriter<File>> {
    out:      W,
    finished: bool,
}

impl VehicleLog<BufWriter<File>> {
    /// Create (truncating) the log at `path`, creating parent directories,
    /// and write the start timestamp.
    pub fn create(path: &Path, start: Timestamp) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::new(BufWriter::new(File::create(path)?), start)
    }
}

impl<W: Write> VehicleLog<W> {
    pub fn new(mut out: W, start: Timestamp) -> OutputResult<Self> {
        writeln!(out, "{start}")?;
        Ok(Self { out, finished: false })
    }

    /// Divider, vehicle count and id list for one step.
    pub fn write_step(&mut self, step: Step, vehicles: &[VehicleId]) -> OutputResult<()> {
        writeln!(self.out, "====================the {step} st====================")?;
        writeln!(self.out, "vehicle_number: {}", vehicles.len())?;
        writeln!(self.out, "vehicle_id_list: {}", id_list(vehicles))?;
        Ok(())
    }

    /// Write the end timestamp and flush.  Later calls are no-ops.
    pub fn finish(&mut self, end: Timestamp) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        writeln!(self.out, "{end}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `['a', 'b']`, matching the log format downstream scripts parse.
fn id_list(vehicles: &[VehicleId]) -> String {
    let quoted: Vec<String> = vehicles.iter().map(|v| format!("'{v}'")).collect();
    format!("[{}]", quoted.join(", "))
}
