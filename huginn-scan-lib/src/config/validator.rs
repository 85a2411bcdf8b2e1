use crate::config::types::Config;
use crate::tls::{
    is_cipher_suite_supported, is_curve_supported, resolve_cipher_suites, supported_curves,
    ProtocolVersion,
};

pub fn validate(config: &Config) -> Result<(), String> {
    let scan = &config.scan;
    if scan.protocols.is_empty() {
        return Err("at least one protocol is required".into());
    }
    if let Some(version) = scan.protocols.iter().find(|v| !v.has_ecdh_key_exchange()) {
        let supported: Vec<&str> = ProtocolVersion::ecdh_versions().into_iter().map(ProtocolVersion::id).collect();
        return Err(format!(
            "protocol {version} has no ECDH key exchange to analyze (expected one of {})",
            supported.join(", ")
        ));
    }
    if scan.timeout_ms == 0 {
        return Err("timeout_ms must be > 0".into());
    }
    if let Some(name) = scan.cipher_suites.iter().find(|n| !is_cipher_suite_supported(n)) {
        return Err(format!("unknown cipher suite: {name}"));
    }
    if !scan.cipher_suites.is_empty() {
        if let Some(version) = scan
            .protocols
            .iter()
            .find(|v| resolve_cipher_suites(&scan.cipher_suites, **v).is_empty())
        {
            return Err(format!("none of the configured cipher suites can be offered with {version}"));
        }
    }
    if let Some(name) = scan.curves.iter().find(|n| !is_curve_supported(n)) {
        return Err(format!("unknown curve: {name} (supported: {})", supported_curves().join(", ")));
    }
    if config.logging.level.trim().is_empty() {
        return Err("logging level cannot be empty".into());
    }
    Ok(())
}
