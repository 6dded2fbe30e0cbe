//! `st-traci` — talking to SUMO over TraCI.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`control`]   | `SimulationControl` trait, `NextTls`                      |
//! | [`constants`] | Command, variable, and type identifiers                   |
//! | [`storage`]   | Big-endian `Storage` reader and `StorageBuilder` writer   |
//! | [`client`]    | `TraciClient` over any `Read + Write` stream              |
//! | [`launch`]    | `LaunchCommand`, `launch`, `SumoConnection`               |
//! | [`error`]     | `TraciError`, `TraciResult<T>`                            |
//!
//! Everything is blocking and single-threaded: one request, one response.
//!
//! ```rust,ignore
//! use st_traci::{LaunchCommand, LaunchOptions, SimulationControl, launch};
//!
//! let cmd = LaunchCommand::new(["sumo", "-c", "sumo/map.sumocfg"])?;
//! let mut conn = launch(&cmd, &LaunchOptions::default())?;
//! while conn.min_expected_number()? > 0 {
//!     conn.simulation_step()?;
//! }
//! conn.close()?;
//! ```

pub mod client;
pub mod constants;
pub mod control;
pub mod error;
pub mod launch;
pub mod storage;


pub use client::TraciClient;
pub use control::{NextTls, SimulationControl, render_next_tls};
pub use error::{TraciError, TraciResult};
pub use launch::{LaunchCommand, LaunchOptions, SumoConnection, launch};
pub use storage::{Storage, StorageBuilder};
