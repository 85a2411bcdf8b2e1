//! Shared test helpers: wire builders, a scripted handshaker and a local
//! scripted TLS server
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use huginn_scan_lib::client::{HandshakeError, Handshaker, NetworkError};
use huginn_scan_lib::tls::{
    Alert, AlertDescription, ClientHello, HandshakeMessage, HandshakeMessages, HandshakeType,
    NamedCurve, ServerKeyExchange,
};
use huginn_scan_lib::AnalyzerTarget;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Generate a temporary file path for testing
pub fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_nanos();
    std::env::temp_dir().join(format!("huginn-scan-test-{nanos}-{name}"))
}

/// ServerKeyExchange body for a named curve with a dummy point and signature
pub fn server_key_exchange_body(curve_code: u16) -> Vec<u8> {
    let [hi, lo] = curve_code.to_be_bytes();
    vec![3, hi, lo, 4, 0x04, 0x01, 0x02, 0x03, 0x04, 0x01, 0x00, 0x02, 0xde, 0xad]
}

pub fn server_hello_body(version: u16, cipher_suite: u16) -> Vec<u8> {
    let mut body = version.to_be_bytes().to_vec();
    body.extend_from_slice(&[0x5a; 32]);
    body.push(0);
    body.extend_from_slice(&cipher_suite.to_be_bytes());
    body.push(0);
    body
}

pub fn handshake_message(handshake_type: HandshakeType, body: &[u8]) -> Vec<u8> {
    let len = u32::try_from(body.len()).unwrap_or(u32::MAX).to_be_bytes();
    let mut message = vec![handshake_type.as_u8(), len[1], len[2], len[3]];
    message.extend_from_slice(body);
    message
}

pub fn record(content_type: u8, fragment: &[u8]) -> Vec<u8> {
    let len = u16::try_from(fragment.len()).unwrap_or(u16::MAX).to_be_bytes();
    let mut out = vec![content_type, 0x03, 0x03, len[0], len[1]];
    out.extend_from_slice(fragment);
    out
}

pub fn alert_record(description: AlertDescription) -> Vec<u8> {
    record(21, &Alert::fatal(description).encode())
}

/// ServerHello, ServerKeyExchange and ServerHelloDone, as one flight
pub fn key_exchange_flight(version: u16, cipher_suite: u16, curve_code: u16) -> Vec<u8> {
    let mut messages = handshake_message(HandshakeType::ServerHello, &server_hello_body(version, cipher_suite));
    messages.extend(handshake_message(
        HandshakeType::ServerKeyExchange,
        &server_key_exchange_body(curve_code),
    ));
    messages.extend(handshake_message(HandshakeType::ServerHelloDone, &[]));
    record(22, &messages)
}

/// Handshake result carrying a ServerKeyExchange for `curve`
pub fn key_exchange(curve: NamedCurve) -> Result<HandshakeMessages, HandshakeError> {
    let mut messages = HandshakeMessages::new();
    messages.insert(
        HandshakeType::ServerKeyExchange,
        HandshakeMessage::ServerKeyExchange(ServerKeyExchange::new(
            server_key_exchange_body(curve.code()).into(),
        )),
    );
    Ok(messages)
}

pub fn alert(description: AlertDescription) -> Result<HandshakeMessages, HandshakeError> {
    Err(HandshakeError::Alert(Alert::fatal(description)))
}

pub fn no_response() -> Result<HandshakeMessages, HandshakeError> {
    Err(HandshakeError::Network(NetworkError::NoResponse))
}

type Responder = Box<dyn Fn(NamedCurve) -> Result<HandshakeMessages, HandshakeError> + Send + Sync>;

/// Handshaker answering from a closure of the single requested curve
pub struct MockHandshaker {
    target: AnalyzerTarget,
    responder: Responder,
    hellos: Mutex<Vec<ClientHello>>,
}

impl MockHandshaker {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(NamedCurve) -> Result<HandshakeMessages, HandshakeError> + Send + Sync + 'static,
    {
        Self::with_target(AnalyzerTarget::new("example.com", 443), responder)
    }

    pub fn with_target<F>(target: AnalyzerTarget, responder: F) -> Self
    where
        F: Fn(NamedCurve) -> Result<HandshakeMessages, HandshakeError> + Send + Sync + 'static,
    {
        Self { target, responder: Box::new(responder), hellos: Mutex::new(Vec::new()) }
    }

    /// Every ClientHello received so far
    pub fn hellos(&self) -> Vec<ClientHello> {
        self.hellos.lock().map(|h| h.clone()).unwrap_or_default()
    }

    /// Curves requested so far, in order
    pub fn requested(&self) -> Vec<NamedCurve> {
        self.hellos()
            .iter()
            .filter_map(|h| h.supported_groups().and_then(|g| g.first().copied()))
            .collect()
    }
}

impl Handshaker for MockHandshaker {
    fn target(&self) -> &AnalyzerTarget {
        &self.target
    }

    async fn do_tls_handshake(
        &self,
        hello: &ClientHello,
        _last: HandshakeType,
    ) -> Result<HandshakeMessages, HandshakeError> {
        if let Ok(mut hellos) = self.hellos.lock() {
            hellos.push(hello.clone());
        }
        match hello.supported_groups().and_then(|g| g.first().copied()) {
            Some(curve) => (self.responder)(curve),
            None => no_response(),
        }
    }
}

/// Curve code of the first entry of the supported groups extension of a
/// ClientHello record
pub fn requested_curve(client_hello_record: &[u8]) -> Option<u16> {
    let u16_at = |data: &[u8], at: usize| -> Option<u16> {
        Some(u16::from_be_bytes([*data.get(at)?, *data.get(at + 1)?]))
    };
    // record header, handshake header, version, random
    let mut pos = 5 + 4 + 2 + 32;
    pos += 1 + usize::from(*client_hello_record.get(pos)?);
    pos += 2 + usize::from(u16_at(client_hello_record, pos)?);
    pos += 1 + usize::from(*client_hello_record.get(pos)?);
    let end = pos + 2 + usize::from(u16_at(client_hello_record, pos)?);
    pos += 2;
    while pos + 4 <= end {
        let ext_type = u16_at(client_hello_record, pos)?;
        let ext_len = usize::from(u16_at(client_hello_record, pos + 2)?);
        if ext_type == 0x000a {
            return u16_at(client_hello_record, pos + 6);
        }
        pos += 4 + ext_len;
    }
    None
}

async fn read_client_hello(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut record = vec![0u8; 5];
    stream.read_exact(&mut record).await?;
    let len = usize::from(u16::from_be_bytes([record[3], record[4]]));
    record.resize(5 + len, 0);
    stream.read_exact(&mut record[5..]).await?;
    Ok(record)
}

/// Local server answering each connection with `respond(client_hello_record)`;
/// an empty answer closes the connection silently
pub async fn spawn_server<F>(respond: F) -> std::io::Result<SocketAddr>
where
    F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let respond = Arc::new(respond);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let respond = Arc::clone(&respond);
            tokio::spawn(async move {
                let Ok(hello) = read_client_hello(&mut stream).await else {
                    return;
                };
                let answer = respond(&hello);
                if !answer.is_empty() {
                    let _ = stream.write_all(&answer).await;
                }
                let _ = stream.shutdown().await;
            });
        }
    });
    Ok(address)
}
