use thiserror::Error;

use crate::client::{HandshakeError, NetworkError, SecurityFailure};
use crate::tls::{AlertDescription, DecodeError, EcdhError, HandshakeType, ProtocolVersion};

/// Errors that can abort a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Protocol version not supported by this analyzer: {0}")]
    UnsupportedProtocol(ProtocolVersion),

    #[error("Server sent alert: {0}")]
    Alert(AlertDescription),

    #[error("Network error: {0}")]
    Network(NetworkError),

    #[error("Security failure: {0}")]
    Security(SecurityFailure),

    #[error("Malformed server message: {0}")]
    Decode(#[from] DecodeError),

    #[error("Malformed ECDH parameters: {0}")]
    Ecdh(#[from] EcdhError),

    #[error("Handshake ended without {0:?} message")]
    MissingMessage(HandshakeType),

    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl From<HandshakeError> for ScanError {
    fn from(err: HandshakeError) -> Self {
        match err {
            HandshakeError::Alert(alert) => ScanError::Alert(alert.description),
            HandshakeError::Network(network) => ScanError::Network(network),
            HandshakeError::Security(failure) => ScanError::Security(failure),
            HandshakeError::Decode(decode) => ScanError::Decode(decode),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
