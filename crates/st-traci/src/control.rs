//! `SimulationControl`, the collector's only view of SUMO.

use std::fmt;

use st_core::{EdgeId, GeoCoord, LaneId, Position, VehicleId};

use crate::TraciResult;

/// An upcoming traffic light on a vehicle's route, as SUMO reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct NextTls {
    pub tls_id:     String,
    pub link_index: i32,
    /// Distance to the stop line in metres.
    pub distance:   f64,
    /// Signal state character (`r`, `y`, `G`, …).
    pub state:      char,
}

impl fmt::Display for NextTls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.tls_id, self.link_index, self.distance, self.state)
    }
}

/// Render a next-TLS list as one opaque cell: entries joined with `;`, or
/// an empty string when no signal lies ahead.
pub fn render_next_tls(list: &[NextTls]) -> String {
    list.iter().map(ToString::to_string).collect::<Vec<_>>().join(";")
}

/// Blocking control interface to a running simulation.
///
/// Every query observes the state after the most recent
/// [`simulation_step`](Self::simulation_step).  Implemented by
/// [`TraciClient`][crate::TraciClient] and
/// [`SumoConnection`][crate::SumoConnection]; tests use a scripted
/// in-memory implementation.
pub trait SimulationControl {
    /// Advance the simulation by one step.
    fn simulation_step(&mut self) -> TraciResult<()>;

    /// Vehicles still running or waiting to depart.  Zero means the
    /// scenario is exhausted.
    fn min_expected_number(&mut self) -> TraciResult<i32>;

    /// Vehicles currently in the network, in simulator order.
    fn vehicle_ids(&mut self) -> TraciResult<Vec<VehicleId>>;

    fn position(&mut self, vehicle: &VehicleId) -> TraciResult<Position>;

    /// Speed in m/s.
    fn speed(&mut self, vehicle: &VehicleId) -> TraciResult<f64>;

    fn road_id(&mut self, vehicle: &VehicleId) -> TraciResult<EdgeId>;

    fn lane_id(&mut self, vehicle: &VehicleId) -> TraciResult<LaneId>;

    /// Odometer: distance driven since departure, in metres.
    fn distance(&mut self, vehicle: &VehicleId) -> TraciResult<f64>;

    /// Heading in degrees, clockwise from north.
    fn angle(&mut self, vehicle: &VehicleId) -> TraciResult<f64>;

    fn next_tls(&mut self, vehicle: &VehicleId) -> TraciResult<Vec<NextTls>>;

    /// Convert a network position to (lon, lat) with the simulator's own
    /// projection.
    fn convert_geo(&mut self, position: Position) -> TraciResult<GeoCoord>;

    /// Switch a GUI view's visualisation scheme.  Only valid for `sumo-gui`.
    fn set_gui_schema(&mut self, view: &str, schema: &str) -> TraciResult<()>;

    /// End the session.  Implementations make repeated calls a no-op.
    fn close(&mut self) -> TraciResult<()>;
}

impl<C: SimulationControl + ?Sized> SimulationControl for Box<C> {
    fn simulation_step(&mut self) -> TraciResult<()> {
        (**self).simulation_step()
    }
    fn min_expected_number(&mut self) -> TraciResult<i32> {
        (**self).min_expected_number()
    }
    fn vehicle_ids(&mut self) -> TraciResult<Vec<VehicleId>> {
        (**self).vehicle_ids()
    }
    fn position(&mut self, vehicle: &VehicleId) -> TraciResult<Position> {
        (**self).position(vehicle)
    }
    fn speed(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        (**self).speed(vehicle)
    }
    fn road_id(&mut self, vehicle: &VehicleId) -> TraciResult<EdgeId> {
        (**self).road_id(vehicle)
    }
    fn lane_id(&mut self, vehicle: &VehicleId) -> TraciResult<LaneId> {
        (**self).lane_id(vehicle)
    }
    fn distance(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        (**self).distance(vehicle)
    }
    fn angle(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        (**self).angle(vehicle)
    }
    fn next_tls(&mut self, vehicle: &VehicleId) -> TraciResult<Vec<NextTls>> {
        (**self).next_tls(vehicle)
    }
    fn convert_geo(&mut self, position: Position) -> TraciResult<GeoCoord> {
        (**self).convert_geo(position)
    }
    fn set_gui_schema(&mut self, view: &str, schema: &str) -> TraciResult<()> {
        (**self).set_gui_schema(view, schema)
    }
    fn close(&mut self) -> TraciResult<()> {
        (**self).close()
    }
}
