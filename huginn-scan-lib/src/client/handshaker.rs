use std::future::Future;
use thiserror::Error;

use crate::target::AnalyzerTarget;
use crate::tls::{Alert, ClientHello, DecodeError, HandshakeMessages, HandshakeType, ProtocolVersion};

/// Transport-level failures of a handshake attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("cannot connect to {address}: {reason}")]
    NoConnection { address: String, reason: String },

    #[error("connection to {address} failed: {reason}")]
    ConnectionFailed { address: String, reason: String },

    /// The server closed the connection, reset it or stayed silent before
    /// sending a complete handshake message
    #[error("no response from server")]
    NoResponse,
}

/// The server answered with something a conforming server must not send
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityFailure {
    #[error("protocol downgraded from {offered} to {negotiated:#06x}")]
    ProtocolDowngrade { offered: ProtocolVersion, negotiated: u16 },

    #[error("cipher suite {0:#06x} selected but not offered")]
    UnofferedCipherSuite(u16),

    #[error("compression method {0} selected but not offered")]
    UnofferedCompression(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("alert received: {:?} {}", .0.level, .0.description)]
    Alert(Alert),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Security(#[from] SecurityFailure),

    #[error("malformed server response: {0}")]
    Decode(#[from] DecodeError),
}

/// A client able to run partial TLS handshakes against one target
///
/// Each call is an independent attempt: implementations open a fresh
/// connection, send `hello` and collect server handshake messages until
/// `last` (or ServerHelloDone) is received.
pub trait Handshaker {
    fn target(&self) -> &AnalyzerTarget;

    fn do_tls_handshake(
        &self,
        hello: &ClientHello,
        last: HandshakeType,
    ) -> impl Future<Output = Result<HandshakeMessages, HandshakeError>> + Send;
}
