//! Row types written to the export tables.

use std::sync::Arc;

use st_core::{EdgeId, GeoCoord, LaneId, Position, Timestamp, VehicleId};
use st_network::JunctionLookup;

/// Default placeholder for junction fields that could not be resolved.
pub const NOT_FOUND_OR_FINAL_JUNCTION: &str = "NOT_FOUND_OR_FINAL_JUNCTION";

/// A flat, fixed-schema export row.
pub trait ExportRow {
    /// Column names, in record order.
    const HEADER: &'static [&'static str];

    fn vehicle_id(&self) -> &VehicleId;

    fn timestamp(&self) -> Timestamp;

    /// Field values, one per [`HEADER`](Self::HEADER) column.
    fn record(&self) -> Vec<String>;
}

/// Floats keep a trailing `.0` so integral values still read as decimals.
fn float(v: f64) -> String {
    format!("{v:?}")
}

// ── TrajectoryRow ─────────────────────────────────────────────────────────────

/// One vehicle's extended attribute set at one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRow {
    pub date_time:    Timestamp,
    pub vehicle_id:   VehicleId,
    pub position:     Position,
    pub geo:          GeoCoord,
    /// km/h, two decimals.
    pub speed_kmh:    f64,
    pub edge:         EdgeId,
    pub lane:         LaneId,
    /// Odometer in metres, two decimals.
    pub displacement: f64,
    /// Heading in degrees, two decimals.
    pub turn_angle:   f64,
    /// Upcoming traffic lights, rendered as the simulator reported them.
    pub next_tls:     String,
}

impl ExportRow for TrajectoryRow {
    const HEADER: &'static [&'static str] = &[
        "date_time", "vehicle_id", "x", "y", "lon", "lat", "spd",
        "edge", "lane", "displacement", "turn_angle", "next_tls",
    ];

    fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    fn timestamp(&self) -> Timestamp {
        self.date_time
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.date_time.to_string(),
            self.vehicle_id.to_string(),
            float(self.position.x),
            float(self.position.y),
            float(self.geo.lon),
            float(self.geo.lat),
            float(self.speed_kmh),
            self.edge.to_string(),
            self.lane.to_string(),
            float(self.displacement),
            float(self.turn_angle),
            self.next_tls.clone(),
        ]
    }
}

// ── NotFoundLabel ─────────────────────────────────────────────────────────────

/// Text written in place of a junction id when a lookup does not succeed.
///
/// Cheap to clone; every junction row carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundLabel(Arc<str>);

impl NotFoundLabel {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NotFoundLabel {
    fn default() -> Self {
        Self::new(NOT_FOUND_OR_FINAL_JUNCTION)
    }
}

// ── JunctionRow ───────────────────────────────────────────────────────────────

/// One vehicle's segment and its bounding junctions at one step.
///
/// The full [`JunctionLookup`] is kept, so callers can tell a segment
/// missing from the network apart from an inconsistent one; both serialise
/// to the same label.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionRow {
    pub date_time:  Timestamp,
    pub vehicle_id: VehicleId,
    pub position:   Position,
    pub edge_id:    EdgeId,
    pub lane_id:    LaneId,
    pub lookup:     JunctionLookup,
    pub label:      NotFoundLabel,
}

impl JunctionRow {
    /// Origin junction, or the label.
    pub fn from_node_id(&self) -> &str {
        match &self.lookup {
            JunctionLookup::Found { from, .. } => from.as_str(),
            _ => self.label.as_str(),
        }
    }

    /// Destination junction, or the label.
    pub fn next_node_id(&self) -> &str {
        match &self.lookup {
            JunctionLookup::Found { to, .. } => to.as_str(),
            _ => self.label.as_str(),
        }
    }
}

impl ExportRow for JunctionRow {
    // `land_id` is the column name existing consumers of this file read.
    const HEADER: &'static [&'static str] = &[
        "date_time", "vehicle_id", "x_position", "y_position",
        "edge_id", "land_id", "from_node_id", "next_node_id",
    ];

    fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    fn timestamp(&self) -> Timestamp {
        self.date_time
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.date_time.to_string(),
            self.vehicle_id.to_string(),
            float(self.position.x),
            float(self.position.y),
            self.edge_id.to_string(),
            self.lane_id.to_string(),
            self.from_node_id().to_owned(),
            self.next_node_id().to_owned(),
        ]
    }
}
