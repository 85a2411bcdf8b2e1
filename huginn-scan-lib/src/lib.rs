#![forbid(unsafe_code)]

pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod target;
pub mod tls;

pub use analyzer::{Analyzer, AnalyzerCurves, AnalyzerResultCurves};
pub use client::{HandshakeError, Handshaker, TcpHandshaker};
pub use config::{load_from_path, Config};
pub use error::{Result, ScanError};
pub use target::AnalyzerTarget;
pub use tls::{parse_ecdh_params, NamedCurve, ProtocolVersion};
