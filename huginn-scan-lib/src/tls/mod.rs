pub mod alert;
pub mod cipher_suites;
pub mod client_hello;
pub mod codec;
pub mod curves;
pub mod ecdh;
pub mod extension;
pub mod handshake;
pub mod record;
pub mod version;

pub use alert::{Alert, AlertDescription, AlertLevel};
pub use cipher_suites::{
    ecdhe_cipher_suites, is_cipher_suite_supported, resolve_cipher_suites,
    supported_cipher_suites,
};
pub use client_hello::{ClientHello, ScopedExtension};
pub use codec::DecodeError;
pub use curves::{is_curve_supported, supported_curves, NamedCurve};
pub use ecdh::{parse_ecdh_params, CurveType, EcdhError, EcdhParams};
pub use extension::{Extension, ExtensionType};
pub use handshake::{HandshakeMessage, HandshakeMessages, HandshakeType, ServerHello, ServerKeyExchange};
pub use version::ProtocolVersion;
