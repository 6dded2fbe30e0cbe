//! TraCI identifiers used by this crate.
//!
//! Only the subset the collector needs.  Values follow SUMO's
//! `TraCIConstants.h`.

// ── Commands ──────────────────────────────────────────────────────────────────

pub const CMD_GETVERSION: u8 = 0x00;
pub const CMD_SIMSTEP: u8 = 0x02;
pub const CMD_CLOSE: u8 = 0x7F;

pub const CMD_GET_VEHICLE_VARIABLE: u8 = 0xa4;
pub const CMD_GET_SIM_VARIABLE: u8 = 0xab;
pub const CMD_SET_GUI_VARIABLE: u8 = 0xcc;

/// A get-variable response uses the request's command id plus this offset.
pub const RESPONSE_OFFSET: u8 = 0x10;

// ── Variables ─────────────────────────────────────────────────────────────────

pub const TRACI_ID_LIST: u8 = 0x00;
pub const VAR_SPEED: u8 = 0x40;
pub const VAR_POSITION: u8 = 0x42;
pub const VAR_ANGLE: u8 = 0x43;
pub const VAR_ROAD_ID: u8 = 0x50;
pub const VAR_LANE_ID: u8 = 0x51;
pub const VAR_NEXT_TLS: u8 = 0x70;
pub const VAR_MIN_EXPECTED_VEHICLES: u8 = 0x7d;
pub const POSITION_CONVERSION: u8 = 0x82;
pub const VAR_DISTANCE: u8 = 0x84;
pub const VAR_VIEW_SCHEMA: u8 = 0xa2;

// ── Type tags ─────────────────────────────────────────────────────────────────

pub const POSITION_LON_LAT: u8 = 0x00;
pub const POSITION_2D: u8 = 0x01;
pub const TYPE_UBYTE: u8 = 0x07;
pub const TYPE_BYTE: u8 = 0x08;
pub const TYPE_INTEGER: u8 = 0x09;
pub const TYPE_DOUBLE: u8 = 0x0B;
pub const TYPE_STRING: u8 = 0x0C;
pub const TYPE_STRINGLIST: u8 = 0x0E;
pub const TYPE_COMPOUND: u8 = 0x0F;

// ── Status codes ──────────────────────────────────────────────────────────────

pub const RTYPE_OK: u8 = 0x00;
pub const RTYPE_NOTIMPLEMENTED: u8 = 0x01;
pub const RTYPE_ERR: u8 = 0xFF;
