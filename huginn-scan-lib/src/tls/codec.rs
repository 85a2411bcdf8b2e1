use bytes::{BufMut, BytesMut};
use thiserror::Error;

/// Errors raised while decoding TLS wire structures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated {what}: needed {needed} bytes, {remaining} remaining")]
    Truncated { what: &'static str, needed: usize, remaining: usize },

    #[error("invalid {what}: {value:#x}")]
    InvalidValue { what: &'static str, value: u32 },

    #[error("record too large: {0} bytes")]
    RecordTooLarge(usize),
}

/// Bounds-checked big-endian reader over a byte slice
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Unread part of the input
    pub fn rest(&self) -> &'a [u8] {
        self.buf
    }

    pub fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.buf.len() < len {
            return Err(DecodeError::Truncated { what, needed: len, remaining: self.buf.len() });
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub fn u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        let bytes = self.take(1, what)?;
        Ok(bytes[0])
    }

    pub fn u16(&mut self, what: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn u24(&mut self, what: &'static str) -> Result<usize, DecodeError> {
        let bytes = self.take(3, what)?;
        Ok(usize::from(bytes[0]) << 16 | usize::from(bytes[1]) << 8 | usize::from(bytes[2]))
    }

    /// Reads a vector prefixed with a one byte length
    pub fn vec_u8(&mut self, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.u8(what)?;
        self.take(usize::from(len), what)
    }

    /// Reads a vector prefixed with a two byte length
    pub fn vec_u16(&mut self, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.u16(what)?;
        self.take(usize::from(len), what)
    }
}

/// Writes `body` prefixed with its length as a big-endian u16.
///
/// Callers only pass bodies built from bounded lists (cipher suites,
/// extensions, hostnames), so the length always fits.
pub(crate) fn put_vec_u16(buf: &mut BytesMut, body: &[u8]) {
    buf.put_u16(u16::try_from(body.len()).unwrap_or(u16::MAX));
    buf.put_slice(body);
}

pub(crate) fn put_vec_u8(buf: &mut BytesMut, body: &[u8]) {
    buf.put_u8(u8::try_from(body.len()).unwrap_or(u8::MAX));
    buf.put_slice(body);
}

pub(crate) fn put_u24(buf: &mut BytesMut, value: usize) {
    let value = u32::try_from(value).unwrap_or(u32::MAX).min(0x00ff_ffff);
    buf.put_slice(&value.to_be_bytes()[1..]);
}
