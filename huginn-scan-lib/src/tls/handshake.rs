use bytes::Bytes;
use std::collections::BTreeMap;

use crate::tls::codec::{DecodeError, Reader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandshakeType {
    HelloRequest,
    ClientHello,
    ServerHello,
    Certificate,
    ServerKeyExchange,
    CertificateRequest,
    ServerHelloDone,
    CertificateStatus,
    Other(u8),
}

impl HandshakeType {
    pub fn as_u8(self) -> u8 {
        match self {
            HandshakeType::HelloRequest => 0,
            HandshakeType::ClientHello => 1,
            HandshakeType::ServerHello => 2,
            HandshakeType::Certificate => 11,
            HandshakeType::ServerKeyExchange => 12,
            HandshakeType::CertificateRequest => 13,
            HandshakeType::ServerHelloDone => 14,
            HandshakeType::CertificateStatus => 22,
            HandshakeType::Other(value) => value,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => HandshakeType::HelloRequest,
            1 => HandshakeType::ClientHello,
            2 => HandshakeType::ServerHello,
            11 => HandshakeType::Certificate,
            12 => HandshakeType::ServerKeyExchange,
            13 => HandshakeType::CertificateRequest,
            14 => HandshakeType::ServerHelloDone,
            22 => HandshakeType::CertificateStatus,
            other => HandshakeType::Other(other),
        }
    }
}

/// The fields of a ServerHello the scanner checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    /// Raw negotiated version, may be one the scanner does not know
    pub version: u16,
    pub random: [u8; 32],
    pub session_id: Bytes,
    pub cipher_suite: u16,
    pub compression_method: u8,
}

impl ServerHello {
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(body);
        let version = reader.u16("server hello version")?;
        let mut random = [0u8; 32];
        random.copy_from_slice(reader.take(32, "server hello random")?);
        let session_id = Bytes::copy_from_slice(reader.vec_u8("server hello session id")?);
        let cipher_suite = reader.u16("server hello cipher suite")?;
        let compression_method = reader.u8("server hello compression method")?;
        // Extensions are not needed to classify curves
        Ok(Self { version, random, session_id, cipher_suite, compression_method })
    }
}

/// ServerKeyExchange as received: ECDH parameters followed by the signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerKeyExchange {
    body: Bytes,
}

impl ServerKeyExchange {
    pub fn new(body: Bytes) -> Self {
        Self { body }
    }

    pub fn param_bytes(&self) -> &[u8] {
        &self.body
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeMessage {
    ServerHello(ServerHello),
    ServerKeyExchange(ServerKeyExchange),
    /// Messages the scanner does not interpret, kept raw
    Raw(Bytes),
}

/// Server handshake messages collected during one attempt, keyed by type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeMessages {
    messages: BTreeMap<HandshakeType, HandshakeMessage>,
}

impl HandshakeMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handshake_type: HandshakeType, message: HandshakeMessage) {
        self.messages.insert(handshake_type, message);
    }

    pub fn get(&self, handshake_type: HandshakeType) -> Option<&HandshakeMessage> {
        self.messages.get(&handshake_type)
    }

    pub fn contains(&self, handshake_type: HandshakeType) -> bool {
        self.messages.contains_key(&handshake_type)
    }

    pub fn server_hello(&self) -> Option<&ServerHello> {
        match self.get(HandshakeType::ServerHello) {
            Some(HandshakeMessage::ServerHello(hello)) => Some(hello),
            _ => None,
        }
    }

    pub fn server_key_exchange(&self) -> Option<&ServerKeyExchange> {
        match self.get(HandshakeType::ServerKeyExchange) {
            Some(HandshakeMessage::ServerKeyExchange(ske)) => Some(ske),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_server_hello() -> Result<(), DecodeError> {
        let mut body = vec![0x03, 0x03];
        body.extend_from_slice(&[7u8; 32]);
        body.extend_from_slice(&[2, 0xab, 0xcd]); // session id
        body.extend_from_slice(&[0xc0, 0x2f, 0x00]);
        body.extend_from_slice(&[0x00, 0x00]); // empty extensions

        let hello = ServerHello::decode(&body)?;
        assert_eq!(hello.version, 0x0303);
        assert_eq!(hello.random, [7u8; 32]);
        assert_eq!(&hello.session_id[..], &[0xab, 0xcd]);
        assert_eq!(hello.cipher_suite, 0xc02f);
        assert_eq!(hello.compression_method, 0);
        Ok(())
    }

    #[test]
    fn test_truncated_server_hello() {
        assert!(ServerHello::decode(&[0x03, 0x03, 0x00]).is_err());
    }

    #[test]
    fn test_messages_lookup_by_type() {
        let mut messages = HandshakeMessages::new();
        assert!(messages.server_key_exchange().is_none());
        let ske = ServerKeyExchange::new(Bytes::from_static(&[3, 0, 23]));
        messages.insert(HandshakeType::ServerKeyExchange, HandshakeMessage::ServerKeyExchange(ske.clone()));
        assert_eq!(messages.server_key_exchange(), Some(&ske));
        assert!(messages.contains(HandshakeType::ServerKeyExchange));
        assert!(!messages.contains(HandshakeType::ServerHello));
        assert_eq!(messages.len(), 1);
    }
}
