use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::tls::codec::{DecodeError, Reader};
use crate::tls::handshake::HandshakeType;
use crate::tls::version::ProtocolVersion;

pub const RECORD_HEADER_LEN: usize = 5;

/// Largest fragment a peer may send: 2^14 plus expansion allowance
pub const MAX_FRAGMENT_LEN: usize = 16384 + 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    ChangeCipherSpec,
    Alert,
    Handshake,
    ApplicationData,
    Other(u8),
}

impl ContentType {
    pub fn as_u8(self) -> u8 {
        match self {
            ContentType::ChangeCipherSpec => 20,
            ContentType::Alert => 21,
            ContentType::Handshake => 22,
            ContentType::ApplicationData => 23,
            ContentType::Other(value) => value,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            20 => ContentType::ChangeCipherSpec,
            21 => ContentType::Alert,
            22 => ContentType::Handshake,
            23 => ContentType::ApplicationData,
            other => ContentType::Other(other),
        }
    }
}

/// A plaintext TLS record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub content_type: ContentType,
    pub version: u16,
    pub fragment: Bytes,
}

pub fn encode_record(content_type: ContentType, version: ProtocolVersion, fragment: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(RECORD_HEADER_LEN.saturating_add(fragment.len()));
    buf.put_u8(content_type.as_u8());
    buf.put_u16(version.as_u16());
    buf.put_u16(u16::try_from(fragment.len()).unwrap_or(u16::MAX));
    buf.put_slice(fragment);
    buf.freeze()
}

/// Splits the next complete record off the front of `buf`.
///
/// Returns `Ok(None)` while the record is still incomplete.
pub fn take_record(buf: &mut BytesMut) -> Result<Option<Record>, DecodeError> {
    if buf.len() < RECORD_HEADER_LEN {
        return Ok(None);
    }
    let mut header = Reader::new(&buf[..RECORD_HEADER_LEN]);
    let content_type = ContentType::from_u8(header.u8("record content type")?);
    let version = header.u16("record version")?;
    let length = usize::from(header.u16("record length")?);
    if length > MAX_FRAGMENT_LEN {
        return Err(DecodeError::RecordTooLarge(length));
    }
    let total = RECORD_HEADER_LEN.saturating_add(length);
    if buf.len() < total {
        return Ok(None);
    }
    buf.advance(RECORD_HEADER_LEN);
    let fragment = buf.split_to(length).freeze();
    Ok(Some(Record { content_type, version, fragment }))
}

/// Reassembles handshake messages spread over (or packed into) records
#[derive(Debug, Default)]
pub struct HandshakeReassembler {
    pending: BytesMut,
}

impl HandshakeReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: &[u8]) {
        self.pending.extend_from_slice(fragment);
    }

    /// Next complete message as `(type, body)`, if one is buffered
    pub fn next_message(&mut self) -> Result<Option<(HandshakeType, Bytes)>, DecodeError> {
        if self.pending.len() < 4 {
            return Ok(None);
        }
        let mut header = Reader::new(&self.pending[..4]);
        let handshake_type = HandshakeType::from_u8(header.u8("handshake type")?);
        let length = header.u24("handshake length")?;
        if length > MAX_FRAGMENT_LEN.saturating_mul(4) {
            return Err(DecodeError::RecordTooLarge(length));
        }
        if self.pending.len() < length.saturating_add(4) {
            return Ok(None);
        }
        self.pending.advance(4);
        let body = self.pending.split_to(length).freeze();
        Ok(Some((handshake_type, body)))
    }
}
