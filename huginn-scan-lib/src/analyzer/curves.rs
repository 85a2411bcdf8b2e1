use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzer::Analyzer;
use crate::client::{HandshakeError, Handshaker, NetworkError};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::target::AnalyzerTarget;
use crate::tls::{
    parse_ecdh_params, resolve_cipher_suites, AlertDescription, ClientHello, EcdhError, Extension,
    ExtensionType, HandshakeMessages, HandshakeType, NamedCurve, ProtocolVersion,
    ServerKeyExchange,
};

/// Alerts a server sends when it shares no curve with the client
/// (RFC 8422 section 5.1); on any probe they reject only the offered curve
const REJECTION_ALERTS: [AlertDescription; 3] = [
    AlertDescription::HandshakeFailure,
    AlertDescription::InternalError,
    AlertDescription::InsufficientSecurity,
];

/// Alerts reporting that the extension itself could not be processed
/// (RFC 5246 section 7.2.2); on the first probe they leave extension support
/// undeterminable
const FIRST_PROBE_AMBIGUOUS_ALERTS: [AlertDescription; 3] = [
    AlertDescription::DecodeError,
    AlertDescription::IllegalParameter,
    AlertDescription::UnsupportedExtension,
];

/// Outcome of one single-curve handshake attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    KeyExchange(ServerKeyExchange),
    /// The server refused the curve
    Rejected,
    NoResponse,
    /// Extension support cannot be determined; stop probing
    Undeterminable,
}

/// Curves supported by a server for one protocol version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerResultCurves {
    pub target: AnalyzerTarget,
    pub protocol_version: ProtocolVersion,
    /// Supported curves in probing order
    pub curves: Vec<NamedCurve>,
    /// `Some(true)`: the server honored every single-curve request,
    /// `Some(false)`: it answered with a curve that was not requested,
    /// `None`: could not be determined
    pub extension_supported: Option<bool>,
}

/// Finds the elliptic curves a server accepts for ECDHE key exchange
///
/// Every curve is offered alone in the supported groups extension of an
/// ECDHE-only ClientHello; the curve named in the server's
/// ServerKeyExchange tells whether it was accepted.
#[derive(Debug, Clone)]
pub struct AnalyzerCurves {
    curves: Vec<NamedCurve>,
    cipher_suites: Vec<String>,
}

impl Default for AnalyzerCurves {
    fn default() -> Self {
        Self { curves: NamedCurve::ALL.to_vec(), cipher_suites: Vec::new() }
    }
}

impl Analyzer for AnalyzerCurves {
    fn name() -> &'static str {
        "curves"
    }

    fn help() -> &'static str {
        "Check which elliptic curves are supported by the server(s)"
    }
}

impl AnalyzerCurves {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer for validated scan settings; unknown curve names are skipped
    pub fn from_config(config: &ScanConfig) -> Self {
        let curves = config
            .curves
            .iter()
            .filter_map(|name| match name.parse::<NamedCurve>() {
                Ok(curve) => Some(curve),
                Err(err) => {
                    warn!(curve = %name, %err, "unknown curve ignored");
                    None
                }
            })
            .collect();
        Self::default()
            .with_curves(curves)
            .with_cipher_suites(config.cipher_suites.clone())
    }

    /// Restricts probing to `curves`, in the given order; empty keeps the
    /// full registry
    pub fn with_curves(mut self, curves: Vec<NamedCurve>) -> Self {
        if !curves.is_empty() {
            self.curves = curves;
        }
        self
    }

    /// Restricts the offered cipher suites by name; empty offers every
    /// ECDHE suite valid for the probed version
    pub fn with_cipher_suites(mut self, cipher_suites: Vec<String>) -> Self {
        self.cipher_suites = cipher_suites;
        self
    }

    pub fn curves(&self) -> &[NamedCurve] {
        &self.curves
    }

    /// Baseline ClientHello for `version`, without supported groups
    pub fn client_hello<H: Handshaker>(&self, handshaker: &H, version: ProtocolVersion) -> ClientHello {
        let mut hello = ClientHello::ecdhx(version, handshaker.target().server_name());
        let restricted = resolve_cipher_suites(&self.cipher_suites, version);
        if !restricted.is_empty() {
            hello.set_cipher_suites(restricted);
        } else if !self.cipher_suites.is_empty() {
            warn!(
                protocol = %version,
                configured = self.cipher_suites.len(),
                "no configured cipher suite can be offered with this version, offering every ECDHE suite"
            );
        }
        while hello.remove_extension(ExtensionType::SupportedGroups).is_some() {}
        hello
    }

    /// Offers `curve` alone and classifies the server's answer
    ///
    /// The supported groups extension is attached to `hello` only for the
    /// duration of the attempt.
    pub async fn probe_curve<H: Handshaker>(
        handshaker: &H,
        hello: &mut ClientHello,
        curve: NamedCurve,
        first_probe: bool,
    ) -> Result<ProbeOutcome> {
        let attempt = {
            let scoped = hello.scoped_extension(Extension::SupportedGroups(vec![curve]));
            handshaker
                .do_tls_handshake(&scoped, HandshakeType::ServerKeyExchange)
                .await
        };
        classify_attempt(attempt, first_probe)
    }

    pub async fn analyze<H: Handshaker>(
        &self,
        handshaker: &H,
        protocol_version: ProtocolVersion,
    ) -> Result<AnalyzerResultCurves> {
        if !protocol_version.has_ecdh_key_exchange() {
            return Err(ScanError::UnsupportedProtocol(protocol_version));
        }
        let target = handshaker.target().clone();
        let mut hello = self.client_hello(handshaker, protocol_version);

        let mut supported: Vec<NamedCurve> = Vec::new();
        let mut extension_supported = Some(true);
        for (index, &curve) in self.curves.iter().enumerate() {
            let outcome = Self::probe_curve(handshaker, &mut hello, curve, index == 0).await?;
            debug!(%target, protocol = %protocol_version, %curve, ?outcome, "curve probed");
            let server_key_exchange = match outcome {
                ProbeOutcome::KeyExchange(ske) => ske,
                ProbeOutcome::Rejected | ProbeOutcome::NoResponse => continue,
                ProbeOutcome::Undeterminable => {
                    warn!(%target, protocol = %protocol_version, %curve, "cannot determine supported groups extension support");
                    extension_supported = None;
                    break;
                }
            };

            let Some(selected) = identify_curve(&server_key_exchange)? else {
                continue;
            };
            if !supported.contains(&selected) {
                supported.push(selected);
            }
            if selected != curve {
                debug!(%target, requested = %curve, %selected, "server ignored the requested curve");
                extension_supported = Some(false);
                break;
            }
        }

        info!(
            %target,
            protocol = %protocol_version,
            curves = supported.len(),
            ?extension_supported,
            "curve analysis finished"
        );
        Ok(AnalyzerResultCurves {
            target,
            protocol_version,
            curves: supported,
            extension_supported,
        })
    }
}

/// Maps a handshake attempt onto a probe outcome; fatal conditions are errors
pub fn classify_attempt(
    attempt: std::result::Result<HandshakeMessages, HandshakeError>,
    first_probe: bool,
) -> Result<ProbeOutcome> {
    match attempt {
        Ok(messages) => match messages.server_key_exchange() {
            Some(ske) => Ok(ProbeOutcome::KeyExchange(ske.clone())),
            None => Err(ScanError::MissingMessage(HandshakeType::ServerKeyExchange)),
        },
        Err(HandshakeError::Alert(alert)) if REJECTION_ALERTS.contains(&alert.description) => {
            Ok(ProbeOutcome::Rejected)
        }
        Err(HandshakeError::Alert(alert))
            if first_probe && FIRST_PROBE_AMBIGUOUS_ALERTS.contains(&alert.description) =>
        {
            Ok(ProbeOutcome::Undeterminable)
        }
        Err(HandshakeError::Security(_)) if first_probe => Ok(ProbeOutcome::Undeterminable),
        Err(HandshakeError::Security(failure)) => {
            debug!(%failure, "security failure treated as curve rejection");
            Ok(ProbeOutcome::Rejected)
        }
        Err(HandshakeError::Network(NetworkError::NoResponse)) => Ok(ProbeOutcome::NoResponse),
        Err(err) => Err(err.into()),
    }
}

/// The curve a ServerKeyExchange uses
///
/// `None` when the server sent explicit curve parameters. Codes outside the
/// registry come back as [`NamedCurve::Unknown`].
pub fn identify_curve(server_key_exchange: &ServerKeyExchange) -> Result<Option<NamedCurve>> {
    match parse_ecdh_params(server_key_exchange.param_bytes()) {
        Ok((params, _signature)) => Ok(Some(params.named_curve)),
        Err(EcdhError::UnsupportedCurveType(_)) => Ok(None),
        Err(EcdhError::UnknownNamedCurve(code)) => Ok(Some(NamedCurve::from_code_lossy(code))),
        Err(err) => Err(err.into()),
    }
}
