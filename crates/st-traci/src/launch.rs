//! Starting SUMO as a child process and connecting to it.
//!
//! The launch command is opaque: whatever arguments the caller assembled are
//! passed through, with `--remote-port <port>` appended so SUMO listens for
//! TraCI on a free local port.

use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use st_core::{EdgeId, GeoCoord, LaneId, Position, VehicleId};

use crate::client::TraciClient;
use crate::control::{NextTls, SimulationControl};
use crate::{TraciError, TraciResult};

/// Program name that selects SUMO's GUI build.
pub const GUI_PROGRAM: &str = "sumo-gui";

// ── LaunchCommand ─────────────────────────────────────────────────────────────

/// The simulator command line: program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    args: Vec<String>,
}

impl LaunchCommand {
    /// Fails when `args` is empty.
    pub fn new<I, S>(args: I) -> TraciResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(TraciError::Launch("launch command is empty".into()));
        }
        Ok(Self { args })
    }

    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// `true` when the first token is exactly `sumo-gui`.
    pub fn is_gui(&self) -> bool {
        self.program() == GUI_PROGRAM
    }
}

/// How to reach the launched process.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Fixed TraCI port; `None` picks a free one.
    pub port:        Option<u16>,
    pub attempts:    u32,
    pub retry_delay: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            port:        None,
            attempts:    60,
            retry_delay: Duration::from_secs(1),
        }
    }
}

fn free_port() -> TraciResult<u16> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    Ok(listener.local_addr()?.port())
}

/// Spawn the simulator and open a TraCI session to it.
pub fn launch(command: &LaunchCommand, options: &LaunchOptions) -> TraciResult<SumoConnection> {
    let port = match options.port {
        Some(p) => p,
        None => free_port()?,
    };

    let mut child = Command::new(command.program())
        .args(&command.args()[1..])
        .arg("--remote-port")
        .arg(port.to_string())
        .spawn()
        .map_err(|e| TraciError::Launch(format!("{}: {e}", command.program())))?;
    info!("started {} (pid {}) on port {port}", command.program(), child.id());

    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let client = match connect_while_alive(&mut child, addr, options) {
        Ok(c) => c,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let mut conn = SumoConnection { client, child, closed: false };
    let (api, version) = conn.client.get_version()?;
    info!("connected to {version} (TraCI API {api})");
    Ok(conn)
}

/// Retry the connection, giving up early if the process has already exited.
fn connect_while_alive(
    child:   &mut Child,
    addr:    SocketAddr,
    options: &LaunchOptions,
) -> TraciResult<TraciClient> {
    let attempts = options.attempts.max(1);
    for _ in 0..attempts {
        if let Some(status) = child.try_wait()? {
            return Err(TraciError::Launch(format!("simulator exited early with {status}")));
        }
        match TraciClient::connect(addr, 1, Duration::ZERO) {
            Ok(client) => return Ok(client),
            Err(TraciError::ConnectTimeout { .. }) => thread::sleep(options.retry_delay),
            Err(e) => return Err(e),
        }
    }
    Err(TraciError::ConnectTimeout { addr: addr.to_string(), attempts })
}

// ── SumoConnection ────────────────────────────────────────────────────────────

/// A TraCI session that owns the simulator process it talks to.
///
/// `close()` ends the session and waits for the process to exit.  Dropping
/// an unclosed connection does the same.
pub struct SumoConnection {
    client: TraciClient,
    child:  Child,
    closed: bool,
}

impl SimulationControl for SumoConnection {
    fn simulation_step(&mut self) -> TraciResult<()> {
        self.client.simulation_step()
    }
    fn min_expected_number(&mut self) -> TraciResult<i32> {
        self.client.min_expected_number()
    }
    fn vehicle_ids(&mut self) -> TraciResult<Vec<VehicleId>> {
        self.client.vehicle_ids()
    }
    fn position(&mut self, vehicle: &VehicleId) -> TraciResult<Position> {
        self.client.position(vehicle)
    }
    fn speed(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        self.client.speed(vehicle)
    }
    fn road_id(&mut self, vehicle: &VehicleId) -> TraciResult<EdgeId> {
        self.client.road_id(vehicle)
    }
    fn lane_id(&mut self, vehicle: &VehicleId) -> TraciResult<LaneId> {
        self.client.lane_id(vehicle)
    }
    fn distance(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        self.client.distance(vehicle)
    }
    fn angle(&mut self, vehicle: &VehicleId) -> TraciResult<f64> {
        self.client.angle(vehicle)
    }
    fn next_tls(&mut self, vehicle: &VehicleId) -> TraciResult<Vec<NextTls>> {
        self.client.next_tls(vehicle)
    }
    fn convert_geo(&mut self, position: Position) -> TraciResult<GeoCoord> {
        self.client.convert_geo(position)
    }
    fn set_gui_schema(&mut self, view: &str, schema: &str) -> TraciResult<()> {
        self.client.set_gui_schema(view, schema)
    }

    fn close(&mut self) -> TraciResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let result = self.client.close();
        if result.is_err() {
            let _ = self.child.kill();
        }
        let status = self.child.wait()?;
        info!("simulator exited with {status}");
        result
    }
}

impl Drop for SumoConnection {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                warn!("closing simulator on drop failed: {e}");
            }
        }
    }
}
