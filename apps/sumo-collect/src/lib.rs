//! `sumo-collect` — the three collector entry points.
//!
//! | Entry point             | Observer                | Artifacts                                  |
//! |-------------------------|-------------------------|--------------------------------------------|
//! | [`basic_simulation`]    | `VehicleLogObserver`    | `log/log_vehicle.txt`                      |
//! | [`trajectory_export`]   | `TrajectoryCollector`   | `output/output{,_to_1000}.csv`             |
//! | [`junction_export`]     | `JunctionCollector`     | `output/vehicle_junction{,_to_1000}.csv`   |
//!
//! Each entry point takes a launcher closure that turns the simulator command
//! into a [`SimulationControl`](st_traci::SimulationControl).  The binary
//! passes one that spawns SUMO; tests pass a scripted simulation.

pub mod config;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use config::CollectorConfig;
pub use pipeline::{RunReport, basic_simulation, junction_export, trajectory_export};
