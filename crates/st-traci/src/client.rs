//! Request/response TraCI client over a byte stream.
//!
//! Every call sends one message holding one command and blocks until the
//! matching response message arrives.  The response starts with a status
//! command for the request; get-variable requests are followed by a
//! response command echoing the variable and object id.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use st_core::{EdgeId, GeoCoord, LaneId, Position, VehicleId};

use crate::constants::*;
use crate::control::{NextTls, SimulationControl};
use crate::storage::{Storage, StorageBuilder};
use crate::{TraciError, TraciResult};

/// A TraCI session over `S` (a `TcpStream` in production).
pub struct TraciClient<S: Read + Write = TcpStream> {
    stream: S,
    closed: bool,
}

impl TraciClient<TcpStream> {
    /// Connect to a listening SUMO instance, retrying `attempts` times with
    /// `delay` between tries.
    pub fn connect(addr: SocketAddr, attempts: u32, delay: Duration) -> TraciResult<Self> {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    debug!("connected to {addr} on attempt {attempt}");
                    return Ok(Self::from_stream(stream));
                }
                Err(e) if attempt < attempts => {
                    debug!("connect to {addr} failed ({e}), retrying");
                    thread::sleep(delay);
                }
                Err(_) => {}
            }
        }
        Err(TraciError::ConnectTimeout { addr: addr.to_string(), attempts })
    }
}

impl<S: Read + Write> TraciClient<S> {
    /// Wrap an already-connected stream.
    pub fn from_stream(stream: S) -> Self {
        Self { stream, closed: false }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Ask the server for its API version and identifier string.
    pub fn get_version(&mut self) -> TraciResult<(i32, String)> {
        let mut resp = self.send_command(CMD_GETVERSION, &[])?;
        resp.read_length()?;
        let id = resp.read_u8()?;
        if id != CMD_GETVERSION {
            return Err(TraciError::Protocol(format!(
                "version response has command id {id:#04x}"
            )));
        }
        Ok((resp.read_i32()?, resp.read_string()?))
    }

    // ── Transport ─────────────────────────────────────────────────────────

    /// Send one command and return the response positioned after its status.
    fn send_command(&mut self, id: u8, payload: &[u8]) -> TraciResult<Storage> {
        if self.closed {
            return Err(TraciError::Closed);
        }
        let message = StorageBuilder::new().command(id, payload).into_message();
        self.stream.write_all(&message)?;
        self.stream.flush()?;

        let mut resp = self.receive()?;
        check_status(&mut resp, id)?;
        Ok(resp)
    }

    fn receive(&mut self) -> TraciResult<Storage> {
        let mut header = [0u8; 4];
        self.stream.read_exact(&mut header)?;
        let total = i32::from_be_bytes(header);
        if total < 4 {
            return Err(TraciError::Protocol(format!("message length {total} below header size")));
        }
        let mut body = vec![0u8; total as usize - 4];
        self.stream.read_exact(&mut body)?;
        Ok(Storage::new(body))
    }

    /// Issue a get-variable command and validate the echoed header.  The
    /// returned storage is positioned at the value's type tag.
    fn get_variable(
        &mut self,
        cmd: u8,
        var: u8,
        object_id: &str,
        param: Option<&[u8]>,
    ) -> TraciResult<Storage> {
        let mut payload = StorageBuilder::new().u8(var).string(object_id);
        if let Some(p) = param {
            payload = payload.bytes(p);
        }
        let mut resp = self.send_command(cmd, &payload.finish())?;

        resp.read_length()?;
        let resp_cmd = resp.read_u8()?;
        let resp_var = resp.read_u8()?;
        let resp_obj = resp.read_string()?;
        if resp_cmd != cmd.wrapping_add(RESPONSE_OFFSET) || resp_var != var || resp_obj != object_id {
            return Err(TraciError::Protocol(format!(
                "response {resp_cmd:#04x}/{resp_var:#04x}/{resp_obj:?} does not match request \
                 {cmd:#04x}/{var:#04x}/{object_id:?}"
            )));
        }
        Ok(resp)
    }

    fn vehicle_var(&mut self, var: u8, vehicle: &VehicleId) -> TraciResult<Storage> {
        self.get_variable(CMD_GET_VEHICLE_VARIABLE, var, vehicle.as_str(), None)
    }
}

/// Parse the status command answering `id`.
fn check_status(resp: &mut Storage, id: u8) -> TraciResult<()> {
    resp.read_length()?;
    let echoed = resp.read_u8()?;
    let result = resp.read_u8()?;
    let description = resp.read_string()?;
    if echoed != id {
        return Err(TraciError::Protocol(format!(
            "status for command {echoed:#04x}, expected {id:#04x}"
        )));
    }
    match result {
        RTYPE_OK => Ok(()),
        RTYPE_NOTIMPLEMENTED => Err(TraciError::CommandFailed {
            command: id,
            description: format!("not implemented: {description}"),
        }),
        RTYPE_ERR => Err(TraciError::CommandFailed { command: id, description }),
        other => Err(TraciError::Protocol(format!("unknown status code {other:#04x}"))),
    }
}

/// Decode the `VAR_NEXT_TLS` compound.
fn read_next_tls(resp: &mut Storage) -> TraciResult<Vec<NextTls>> {
    resp.read_compound()?;
    let count = resp.read_typed_i32()?;
    let mut out = Vec::new();
    for _ in 0..count {
        let tls_id = resp.read_typed_string()?;
        let link_index = resp.read_typed_i32()?;
        let distance = resp.read_typed_f64()?;
        // SUMO has sent the state both as byte and ubyte across versions.
        let tag = resp.read_u8()?;
        if tag != TYPE_BYTE && tag != TYPE_UBYTE {
            return Err(TraciError::UnexpectedType { expected: TYPE_BYTE, got: tag });
        }
        let state = resp.read_u8()? as char;
        out.push(NextTls { tls_id, link_index, distance, state });
    }
    Ok(out)
}

impl<S: Read + Write> SimulationControl for TraciClient<S> {
    fn simulation_step(&mut self) -> TraciResult<()> {
        // Target time 0 means "advance one step".
        let payload = StorageBuilder::new().f64(0.0).finish();
        let mut resp = self.send_command(CMD_SIMSTEP, &payload)?;
        // No subscriptions are made, so the result count should be zero.
        let subscriptions = resp.read_i32()?;
        if subscriptions != 0 {
            debug!("ignoring {subscriptions} subscription results");
        }
        Ok(())
    }

    fn min_expected_number(&mut self) -> TraciResult<i32> {
        self.get_variable(CMD_GET_SIM_VARIABLE, VAR_MIN_EXPECTED_VEHICLES, "", None)?
            .read_typed_i32()
    }

    fn vehicle_ids(&mut self) -> TraciResult<Vec<VehicleId>> {
        let ids = self
            .get_variable(CMD_GET_VEHICLE_VARIABLE, TRACI_ID_LIST, "", None)?
            .read_typed_string_list()?;
        Ok(ids.into_iter().map(VehicleId).collect())
    }

    fn position(&mut self, vehicle: &VehicleId) -> TraciResult<Position> {
        self.vehicle_var(VAR_POSITION, vehicle)?.read_typed_position()
    }

    fn speed(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        self.vehicle_var(VAR_SPEED, vehicle)?.read_typed_f64()
    }

    fn road_id(&mut self, vehicle: &VehicleId) -> TraciResult<EdgeId> {
        Ok(EdgeId(self.vehicle_var(VAR_ROAD_ID, vehicle)?.read_typed_string()?))
    }

    fn lane_id(&mut self, vehicle: &VehicleId) -> TraciResult<LaneId> {
        Ok(LaneId(self.vehicle_var(VAR_LANE_ID, vehicle)?.read_typed_string()?))
    }

    fn distance(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        self.vehicle_var(VAR_DISTANCE, vehicle)?.read_typed_f64()
    }

    fn angle(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        self.vehicle_var(VAR_ANGLE, vehicle)?.read_typed_f64()
    }

    fn next_tls(&mut self, vehicle: &VehicleId) -> TraciResult<Vec<NextTls>> {
        read_next_tls(&mut self.vehicle_var(VAR_NEXT_TLS, vehicle)?)
    }

    fn convert_geo(&mut self, position: Position) -> TraciResult<GeoCoord> {
        // compound(2): POSITION_2D(x, y), UBYTE(target = LON_LAT)
        let param = StorageBuilder::new()
            .u8(TYPE_COMPOUND)
            .i32(2)
            .u8(POSITION_2D)
            .f64(position.x)
            .f64(position.y)
            .u8(TYPE_UBYTE)
            .u8(POSITION_LON_LAT)
            .finish();
        let mut resp =
            self.get_variable(CMD_GET_SIM_VARIABLE, POSITION_CONVERSION, "", Some(&param))?;
        resp.expect_type(POSITION_LON_LAT)?;
        Ok(GeoCoord::new(resp.read_f64()?, resp.read_f64()?))
    }

    fn set_gui_schema(&mut self, view: &str, schema: &str) -> TraciResult<()> {
        let payload = StorageBuilder::new()
            .u8(VAR_VIEW_SCHEMA)
            .string(view)
            .u8(TYPE_STRING)
            .string(schema)
            .finish();
        self.send_command(CMD_SET_GUI_VARIABLE, &payload)?;
        Ok(())
    }

    fn close(&mut self) -> TraciResult<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.send_command(CMD_CLOSE, &[]).map(|_| ());
        self.closed = true;
        result
    }
}

impl<S: Read + Write> Drop for TraciClient<S> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                warn!("closing TraCI connection on drop failed: {e}");
            }
        }
    }
}
