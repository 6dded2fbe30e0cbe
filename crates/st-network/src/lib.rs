//! `st-network` — road network topology.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork`, `RoadNetworkBuilder`, `JunctionLookup`        |
//! | [`netxml`]  | `load_net_xml`, `load_net_reader` (SUMO `.net.xml`)          |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! The network is read once at startup and never mutated afterwards.

pub mod error;
pub mod netxml;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use netxml::{load_net_reader, load_net_xml};
pub use network::{JunctionLookup, RoadNetwork, RoadNetworkBuilder};
