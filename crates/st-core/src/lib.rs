//! `st-core` — foundational types for the SUMO telemetry collector.
//!
//! This crate is a dependency of every other `st-*` crate.  It has no `st-*`
//! dependencies and minimal external ones (`chrono` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `VehicleId`, `EdgeId`, `LaneId`, `JunctionId`              |
//! | [`geo`]     | `Position` (planar), `GeoCoord` (lon/lat), `round2`        |
//! | [`step`]    | `Step`, `StepLimit`                                        |
//! | [`time`]    | `Timestamp`, `Clock`, `SystemClock`, `FixedClock`          |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod step;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoCoord, MS_TO_KMH, Position, round2};
pub use ids::{EdgeId, JunctionId, LaneId, VehicleId};
pub use step::{Step, StepLimit};
pub use time::{Clock, FixedClock, SystemClock, Timestamp};
