//! Big-endian TraCI storage.
//!
//! # Framing
//!
//! ```text
//! message  := total_len:i32  command*
//! command  := len:u8 id:u8 payload            (len = 2 + payload, ≤ 255)
//!           | 0:u8 len:i32 id:u8 payload      (len = 6 + payload)
//! string   := len:i32 utf8-bytes
//! ```
//!
//! `total_len` and both command lengths count their own header bytes.

use st_core::Position;

use crate::constants::{
    POSITION_2D, TYPE_COMPOUND, TYPE_DOUBLE, TYPE_INTEGER, TYPE_STRING, TYPE_STRINGLIST,
};
use crate::{TraciError, TraciResult};

// ── Reader ────────────────────────────────────────────────────────────────────

/// Cursor over a received TraCI message body.
#[derive(Debug, Clone)]
pub struct Storage {
    buf: Vec<u8>,
    pos: usize,
}

impl Storage {
    pub fn new(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> TraciResult<&[u8]> {
        if self.remaining() < n {
            return Err(TraciError::Protocol(format!(
                "truncated message: wanted {n} bytes at offset {}, {} left",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> TraciResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> TraciResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32(&mut self) -> TraciResult<i32> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_f64(&mut self) -> TraciResult<f64> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    pub fn read_string(&mut self) -> TraciResult<String> {
        let len = self.read_count()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| TraciError::Protocol(format!("string is not UTF-8: {e}")))
    }

    pub fn read_string_list(&mut self) -> TraciResult<Vec<String>> {
        let n = self.read_count()?;
        (0..n).map(|_| self.read_string()).collect()
    }

    /// A command length: one byte, or zero followed by an `i32`.
    pub fn read_length(&mut self) -> TraciResult<usize> {
        let short = self.read_u8()?;
        if short > 0 {
            return Ok(short as usize);
        }
        let long = self.read_i32()?;
        usize::try_from(long)
            .map_err(|_| TraciError::Protocol(format!("negative command length {long}")))
    }

    fn read_count(&mut self) -> TraciResult<usize> {
        let n = self.read_i32()?;
        usize::try_from(n).map_err(|_| TraciError::Protocol(format!("negative count {n}")))
    }

    // ── Typed values ──────────────────────────────────────────────────────

    /// Consume a type tag and fail unless it equals `expected`.
    pub fn expect_type(&mut self, expected: u8) -> TraciResult<()> {
        let got = self.read_u8()?;
        if got != expected {
            return Err(TraciError::UnexpectedType { expected, got });
        }
        Ok(())
    }

    pub fn read_typed_i32(&mut self) -> TraciResult<i32> {
        self.expect_type(TYPE_INTEGER)?;
        self.read_i32()
    }

    pub fn read_typed_f64(&mut self) -> TraciResult<f64> {
        self.expect_type(TYPE_DOUBLE)?;
        self.read_f64()
    }

    pub fn read_typed_string(&mut self) -> TraciResult<String> {
        self.expect_type(TYPE_STRING)?;
        self.read_string()
    }

    pub fn read_typed_string_list(&mut self) -> TraciResult<Vec<String>> {
        self.expect_type(TYPE_STRINGLIST)?;
        self.read_string_list()
    }

    /// `POSITION_2D` followed by x and y doubles.
    pub fn read_typed_position(&mut self) -> TraciResult<Position> {
        self.expect_type(POSITION_2D)?;
        Ok(Position::new(self.read_f64()?, self.read_f64()?))
    }

    /// `TYPE_COMPOUND` header; returns the item count.
    pub fn read_compound(&mut self) -> TraciResult<usize> {
        self.expect_type(TYPE_COMPOUND)?;
        self.read_count()
    }
}

// ── Writer ────────────────────────────────────────────────────────────────────

/// Accumulates a command payload or a whole message.
#[derive(Debug, Clone, Default)]
pub struct StorageBuilder {
    buf: Vec<u8>,
}

impl StorageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.buf.push(v);
        self
    }

    pub fn i32(mut self, v: i32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn f64(mut self, v: f64) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        self.buf.extend_from_slice(&(s.len() as i32).to_be_bytes());
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn string_list(mut self, items: &[&str]) -> Self {
        self.buf.extend_from_slice(&(items.len() as i32).to_be_bytes());
        for s in items {
            self = self.string(s);
        }
        self
    }

    pub fn bytes(mut self, raw: &[u8]) -> Self {
        self.buf.extend_from_slice(raw);
        self
    }

    /// Append one framed command, choosing the short form when it fits.
    pub fn command(mut self, id: u8, payload: &[u8]) -> Self {
        let short_len = 2 + payload.len();
        if short_len <= u8::MAX as usize {
            self.buf.push(short_len as u8);
        } else {
            self.buf.push(0);
            self.buf.extend_from_slice(&((6 + payload.len()) as i32).to_be_bytes());
        }
        self.buf.push(id);
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Prefix with the 4-byte total length, producing a wire message.
    pub fn into_message(self) -> Vec<u8> {
        let total = (self.buf.len() + 4) as i32;
        let mut out = Vec::with_capacity(self.buf.len() + 4);
        out.extend_from_slice(&total.to_be_bytes());
        out.extend_from_slice(&self.buf);
        out
    }
}
