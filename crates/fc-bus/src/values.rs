//! `ValueMap` — the name → bytes payload of every interaction and reflection.
//!
//! # Encoding
//!
//! | Scalar   | Bytes                                                  |
//! |----------|--------------------------------------------------------|
//! | `i32`    | 4, big-endian two's complement                         |
//! | `f64`    | 8, big-endian IEEE-754                                 |
//! | string   | 4-byte big-endian length, then that many UTF-8 bytes   |
//!
//! Counts and ids are carried as `i32` and range-checked on decode, so a
//! negative count can never reach a queue.

use std::collections::BTreeMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use fc_core::StationId;

use crate::{DecodeError, DecodeResult};

/// Encoded parameters of one interaction, or attributes of one reflection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueMap(BTreeMap<String, Bytes>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate value names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    // ── Writers ───────────────────────────────────────────────────────────

    /// Insert an already-encoded value.  Intended for tests and foreign
    /// publishers; typed code uses the `put_*` helpers.
    pub fn put_raw(&mut self, name: &str, raw: impl Into<Bytes>) -> &mut Self {
        self.0.insert(name.to_owned(), raw.into());
        self
    }

    pub fn put_i32(&mut self, name: &str, value: i32) -> &mut Self {
        let mut buf = BytesMut::with_capacity(4);
        buf.put_i32(value);
        self.put_raw(name, buf.freeze())
    }

    /// Encode a non-negative count; values above `i32::MAX` saturate.
    pub fn put_count(&mut self, name: &str, value: u32) -> &mut Self {
        self.put_i32(name, i32::try_from(value).unwrap_or(i32::MAX))
    }

    pub fn put_f64(&mut self, name: &str, value: f64) -> &mut Self {
        let mut buf = BytesMut::with_capacity(8);
        buf.put_f64(value);
        self.put_raw(name, buf.freeze())
    }

    pub fn put_str(&mut self, name: &str, value: &str) -> &mut Self {
        let mut buf = BytesMut::with_capacity(4 + value.len());
        buf.put_u32(value.len() as u32);
        buf.put_slice(value.as_bytes());
        self.put_raw(name, buf.freeze())
    }

    pub fn put_bool(&mut self, name: &str, value: bool) -> &mut Self {
        self.put_i32(name, i32::from(value))
    }

    // ── Readers ───────────────────────────────────────────────────────────

    fn raw(&self, name: &'static str) -> DecodeResult<&Bytes> {
        self.0.get(name).ok_or(DecodeError::Missing { name })
    }

    fn fixed(&self, name: &'static str, width: usize) -> DecodeResult<&[u8]> {
        let raw = self.raw(name)?;
        if raw.len() != width {
            return Err(DecodeError::Width { name, expected: width, got: raw.len() });
        }
        Ok(raw.as_ref())
    }

    pub fn get_i32(&self, name: &'static str) -> DecodeResult<i32> {
        let mut buf = self.fixed(name, 4)?;
        Ok(buf.get_i32())
    }

    /// Decode a count; negative values are `OutOfRange`.
    pub fn get_count(&self, name: &'static str) -> DecodeResult<u32> {
        let value = self.get_i32(name)?;
        u32::try_from(value).map_err(|_| DecodeError::OutOfRange { name, value: value.into() })
    }

    pub fn get_station(&self, name: &'static str) -> DecodeResult<StationId> {
        let value = self.get_i32(name)?;
        StationId::from_wire(value).ok_or(DecodeError::OutOfRange { name, value: value.into() })
    }

    pub fn get_f64(&self, name: &'static str) -> DecodeResult<f64> {
        let mut buf = self.fixed(name, 8)?;
        Ok(buf.get_f64())
    }

    /// Decode a `0`/`1` flag.
    pub fn get_bool(&self, name: &'static str) -> DecodeResult<bool> {
        match self.get_i32(name)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::OutOfRange { name, value: other.into() }),
        }
    }

    pub fn get_str(&self, name: &'static str) -> DecodeResult<String> {
        let raw = self.raw(name)?;
        if raw.len() < 4 {
            return Err(DecodeError::Truncated { name });
        }
        let mut buf = raw.as_ref();
        let declared = buf.get_u32() as usize;
        if declared > buf.remaining() {
            return Err(DecodeError::Truncated { name });
        }
        if declared < buf.remaining() {
            return Err(DecodeError::Width { name, expected: 4 + declared, got: raw.len() });
        }
        String::from_utf8(buf.to_vec()).map_err(|_| DecodeError::Utf8 { name })
    }

    /// Decode an optional value: `Ok(None)` when absent, an error only when
    /// present but malformed.
    pub fn get_opt<T>(
        &self,
        name: &'static str,
        get: impl FnOnce(&Self, &'static str) -> DecodeResult<T>,
    ) -> DecodeResult<Option<T>> {
        if self.contains(name) { get(self, name).map(Some) } else { Ok(None) }
    }
}
