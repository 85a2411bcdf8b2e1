use bytes::{Bytes, BytesMut};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::client::handshaker::{HandshakeError, Handshaker, NetworkError, SecurityFailure};
use crate::error::{Result, ScanError};
use crate::target::AnalyzerTarget;
use crate::tls::codec::DecodeError;
use crate::tls::record::{take_record, ContentType, HandshakeReassembler};
use crate::tls::{
    Alert, ClientHello, HandshakeMessage, HandshakeMessages, HandshakeType, ServerHello,
    ServerKeyExchange,
};

/// Upper bound on buffered, not yet decoded server bytes
const MAX_BUFFERED: usize = 64 * 1024;

/// Runs handshake attempts over plain TCP connections
#[derive(Debug, Clone)]
pub struct TcpHandshaker {
    target: AnalyzerTarget,
    address: SocketAddr,
    timeout: Duration,
}

impl TcpHandshaker {
    pub fn new(target: AnalyzerTarget, address: SocketAddr, timeout: Duration) -> Self {
        Self { target, address, timeout }
    }

    /// Resolves `target` and uses its first address
    pub async fn resolve(target: AnalyzerTarget, timeout: Duration) -> Result<Self> {
        let address = target
            .resolve()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ScanError::InvalidTarget(format!("no addresses found for {target}")))?;
        debug!(%target, %address, "target resolved");
        Ok(Self::new(target, address, timeout))
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    async fn connect(&self) -> std::result::Result<TcpStream, NetworkError> {
        let no_connection = |reason: String| NetworkError::NoConnection {
            address: self.address.to_string(),
            reason,
        };
        match timeout(self.timeout, TcpStream::connect(self.address)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(no_connection(e.to_string())),
            Err(_) => Err(no_connection(format!("timed out after {:?}", self.timeout))),
        }
    }
}

impl Handshaker for TcpHandshaker {
    fn target(&self) -> &AnalyzerTarget {
        &self.target
    }

    async fn do_tls_handshake(
        &self,
        hello: &ClientHello,
        last: HandshakeType,
    ) -> std::result::Result<HandshakeMessages, HandshakeError> {
        let mut stream = self.connect().await?;
        let record = hello.encode_record();
        trace!(address = %self.address, bytes = record.len(), "sending client hello");
        if let Err(e) = stream.write_all(&record).await {
            debug!(address = %self.address, error = %e, "write failed");
            return Err(NetworkError::NoResponse.into());
        }

        let mut buf = BytesMut::with_capacity(8192);
        let mut reassembler = HandshakeReassembler::new();
        let mut messages = HandshakeMessages::new();
        loop {
            while let Some(record) = take_record(&mut buf)? {
                trace!(content_type = ?record.content_type, len = record.fragment.len(), "record received");
                match record.content_type {
                    ContentType::Alert => {
                        return Err(HandshakeError::Alert(Alert::decode(&record.fragment)?));
                    }
                    ContentType::Handshake => {
                        reassembler.push(&record.fragment);
                        while let Some((handshake_type, body)) = reassembler.next_message()? {
                            let message = interpret_message(hello, handshake_type, body)?;
                            messages.insert(handshake_type, message);
                            if handshake_type == last || handshake_type == HandshakeType::ServerHelloDone {
                                return Ok(messages);
                            }
                        }
                    }
                    other => {
                        return Err(DecodeError::InvalidValue {
                            what: "record content type",
                            value: u32::from(other.as_u8()),
                        }
                        .into());
                    }
                }
            }
            if buf.len() > MAX_BUFFERED {
                return Err(DecodeError::RecordTooLarge(buf.len()).into());
            }

            let read = timeout(self.timeout, stream.read_buf(&mut buf)).await;
            let closed = match read {
                Ok(Ok(0)) => true,
                Ok(Ok(_)) => false,
                Ok(Err(e)) => match read_failure(self.address, &e) {
                    None => true,
                    Some(failure) => {
                        debug!(address = %self.address, error = %e, "read failed");
                        return Err(failure.into());
                    }
                },
                Err(_) => {
                    debug!(address = %self.address, timeout = ?self.timeout, "read timed out");
                    true
                }
            };
            if closed {
                if messages.is_empty() {
                    return Err(NetworkError::NoResponse.into());
                }
                return Ok(messages);
            }
        }
    }
}

fn is_connection_closed(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}

/// A read error that is not a closed connection aborts the attempt
fn read_failure(address: SocketAddr, e: &io::Error) -> Option<NetworkError> {
    if is_connection_closed(e) {
        return None;
    }
    Some(NetworkError::ConnectionFailed { address: address.to_string(), reason: e.to_string() })
}

/// Decodes the messages the scanner inspects and checks the ServerHello
/// against what `hello` offered
fn interpret_message(
    hello: &ClientHello,
    handshake_type: HandshakeType,
    body: Bytes,
) -> std::result::Result<HandshakeMessage, HandshakeError> {
    match handshake_type {
        HandshakeType::ServerHello => {
            let server_hello = ServerHello::decode(&body)?;
            check_server_hello(hello, &server_hello)?;
            Ok(HandshakeMessage::ServerHello(server_hello))
        }
        HandshakeType::ServerKeyExchange => {
            Ok(HandshakeMessage::ServerKeyExchange(ServerKeyExchange::new(body)))
        }
        _ => Ok(HandshakeMessage::Raw(body)),
    }
}

fn check_server_hello(
    hello: &ClientHello,
    server_hello: &ServerHello,
) -> std::result::Result<(), HandshakeError> {
    let offered = hello.version();
    if server_hello.version != offered.as_u16() {
        if server_hello.version < offered.as_u16() {
            return Err(SecurityFailure::ProtocolDowngrade {
                offered,
                negotiated: server_hello.version,
            }
            .into());
        }
        return Err(DecodeError::InvalidValue {
            what: "server hello version",
            value: u32::from(server_hello.version),
        }
        .into());
    }
    if !hello.cipher_suites().contains(&server_hello.cipher_suite) {
        return Err(SecurityFailure::UnofferedCipherSuite(server_hello.cipher_suite).into());
    }
    if !hello
        .compression_methods()
        .contains(&server_hello.compression_method)
    {
        return Err(SecurityFailure::UnofferedCompression(server_hello.compression_method).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::ProtocolVersion;

    fn server_hello(version: u16, cipher_suite: u16, compression_method: u8) -> ServerHello {
        ServerHello {
            version,
            random: [0u8; 32],
            session_id: Bytes::new(),
            cipher_suite,
            compression_method,
        }
    }

    #[test]
    fn test_read_failure_only_for_unexpected_errors() {
        let address: SocketAddr = ([127, 0, 0, 1], 443).into();
        for kind in [io::ErrorKind::UnexpectedEof, io::ErrorKind::ConnectionReset, io::ErrorKind::BrokenPipe] {
            assert_eq!(read_failure(address, &io::Error::from(kind)), None);
        }
        assert_eq!(
            read_failure(address, &io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Some(NetworkError::ConnectionFailed {
                address: "127.0.0.1:443".to_string(),
                reason: "denied".to_string(),
            })
        );
    }

    #[test]
    fn test_check_server_hello_accepts_offered_parameters() {
        let hello = ClientHello::ecdhx(ProtocolVersion::Tls1_2, None);
        assert_eq!(check_server_hello(&hello, &server_hello(0x0303, 0xc02f, 0)), Ok(()));
    }

    #[test]
    fn test_check_server_hello_detects_downgrade() {
        let hello = ClientHello::ecdhx(ProtocolVersion::Tls1_2, None);
        assert_eq!(
            check_server_hello(&hello, &server_hello(0x0301, 0xc013, 0)),
            Err(HandshakeError::Security(SecurityFailure::ProtocolDowngrade {
                offered: ProtocolVersion::Tls1_2,
                negotiated: 0x0301,
            }))
        );
    }

    #[test]
    fn test_check_server_hello_detects_unoffered_choices() {
        let hello = ClientHello::ecdhx(ProtocolVersion::Tls1_0, None);
        assert_eq!(
            check_server_hello(&hello, &server_hello(0x0301, 0xc02f, 0)),
            Err(HandshakeError::Security(SecurityFailure::UnofferedCipherSuite(0xc02f)))
        );
        assert_eq!(
            check_server_hello(&hello, &server_hello(0x0301, 0xc013, 1)),
            Err(HandshakeError::Security(SecurityFailure::UnofferedCompression(1)))
        );
    }
}
