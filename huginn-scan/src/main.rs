#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use huginn_scan_lib::config::{validate, Config, LoggingConfig, OutputFormat};
use huginn_scan_lib::logging::init_tracing;
use huginn_scan_lib::{
    load_from_path, report, Analyzer, AnalyzerCurves, AnalyzerTarget, ProtocolVersion,
    ScanError, TcpHandshaker,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Huginn TLS scanner")]
struct Cli {
    /// Path to configuration TOML file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format, overrides [output] format
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Connect and read timeout per handshake, overrides [scan] timeout_ms
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Protocol version to analyze (repeatable), overrides [scan] protocols
    #[arg(short, long = "protocol", value_name = "VERSION")]
    protocols: Vec<ProtocolVersion>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = AnalyzerCurves::help())]
    Curves {
        /// host, host:port or tls://host:port
        #[arg(required = true, value_name = "TARGET")]
        targets: Vec<AnalyzerTarget>,
    },
}

impl Cli {
    fn apply_overrides(&self, mut cfg: Config) -> Result<Config, ScanError> {
        if let Some(format) = self.format {
            cfg.output.format = format;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            cfg.scan.timeout_ms = timeout_ms;
        }
        if !self.protocols.is_empty() {
            cfg.scan.protocols = self.protocols.clone();
        }
        validate(&cfg).map_err(ScanError::Config)?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => load_from_path(path),
        None => Ok(Config::default()),
    };
    let loaded = loaded.and_then(|cfg| cli.apply_overrides(cfg));

    let logging = loaded.as_ref().map(|cfg| cfg.logging.clone()).unwrap_or_default();
    init_logging(&logging);

    let cfg = match loaded {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };
    info!(protocols = ?cfg.scan.protocols, timeout_ms = cfg.scan.timeout_ms, "configuration loaded");

    let ok = match &cli.command {
        Command::Curves { targets } => run_curves(&cfg, targets).await,
    };
    if !ok {
        std::process::exit(1);
    }
}

/// Scans every target for every configured version, sequentially, and
/// prints the report. Returns false if any scan failed.
async fn run_curves(cfg: &Config, targets: &[AnalyzerTarget]) -> bool {
    let analyzer = AnalyzerCurves::from_config(&cfg.scan);
    let mut results = Vec::new();
    let mut ok = true;

    for target in targets {
        let handshaker = match TcpHandshaker::resolve(target.clone(), cfg.scan.timeout()).await {
            Ok(handshaker) => handshaker,
            Err(err) => {
                error!(%target, %err, "cannot resolve target");
                ok = false;
                continue;
            }
        };
        for &version in &cfg.scan.protocols {
            match analyzer.analyze(&handshaker, version).await {
                Ok(result) => results.push(result),
                Err(err) => {
                    error!(%target, protocol = %version, analyzer = AnalyzerCurves::name(), %err, "analysis failed");
                    ok = false;
                }
            }
        }
    }

    match report::render(&results, cfg.output.format) {
        Ok(out) => print!("{out}"),
        Err(err) => {
            error!(%err, "failed to render report");
            ok = false;
        }
    }
    ok
}

fn init_logging(logging: &LoggingConfig) {
    if let Err(err) = init_tracing(&logging.level, logging.show_target) {
        eprintln!("failed to initialize logging: {err}");
    }
}
