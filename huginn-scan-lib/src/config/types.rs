use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::tls::ProtocolVersion;

/// Probing parameters
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Protocol versions to analyze, in order
    /// Default: ["tls1_2"]
    #[serde(default = "default_protocols")]
    pub protocols: Vec<ProtocolVersion>,
    /// Connect and read timeout of a single handshake attempt
    /// Default: 5000
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Cipher suite names to offer
    /// Default: empty (every ECDHE suite valid for the version)
    #[serde(default)]
    pub cipher_suites: Vec<String>,
    /// Curve names to probe, in order
    /// Default: empty (full registry)
    #[serde(default)]
    pub curves: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            protocols: default_protocols(),
            timeout_ms: default_timeout_ms(),
            cipher_suites: Vec::new(),
            curves: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Report format
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other} (expected json or markdown)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Markdown => f.write_str("markdown"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Default: "markdown"
    #[serde(default)]
    pub format: OutputFormat,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Show module path (target) in log messages
    /// Default: false
    #[serde(default = "default_false")]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), show_target: default_false() }
    }
}

/// Scanner configuration
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_protocols() -> Vec<ProtocolVersion> {
    vec![ProtocolVersion::Tls1_2]
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}
