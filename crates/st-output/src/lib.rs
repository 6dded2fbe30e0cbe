//! `st-output` — turning observed steps into export files.
//!
//! | Artifact                              | Produced by                              |
//! |---------------------------------------|------------------------------------------|
//! | `log/log_vehicle.txt`                 | [`VehicleLogObserver`]                   |
//! | `output/output{,_to_1000}.csv`        | [`TrajectoryCollector`] + [`CsvExporter`]|
//! | `output/vehicle_junction{,_to_1000}.csv` | [`JunctionCollector`] + [`CsvExporter`] |
//!
//! Collectors implement `st_sim::StepObserver` and accumulate rows in an
//! [`ExportTable`] held entirely in memory; nothing is written until the run
//! ends.
//!
//! # Usage
//!
//! ```rust,ignore
//! use st_output::{CsvExporter, ExportPaths, TrajectoryCollector};
//!
//! let mut collector = TrajectoryCollector::new(Box::new(SystemClock));
//! StepLoop::default().run(session.control(), &mut collector)?;
//! session.close()?;
//! let mut table = collector.into_table();
//! CsvExporter::new(ExportPaths::trajectory(Path::new("output"))).export(&mut table)?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod table;
pub mod vehicle_log;


pub use self::csv::{CsvExporter, DEFAULT_HEAD_ROWS, ExportPaths, ExportStats};
pub use error::{OutputError, OutputResult};
pub use observer::{JunctionCollector, TrajectoryCollector, VehicleLogObserver};
pub use row::{ExportRow, JunctionRow, NOT_FOUND_OR_FINAL_JUNCTION, NotFoundLabel, TrajectoryRow};
pub use table::ExportTable;
pub use vehicle_log::VehicleLog;
