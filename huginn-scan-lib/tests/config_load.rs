mod helpers;

use std::fs;
use std::io::Write;
use std::time::Duration;

use helpers::tmp_path;
use huginn_scan_lib::config::{load_from_path, OutputFormat};
use huginn_scan_lib::{ProtocolVersion, ScanError};
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[test]
fn loads_empty_config_with_defaults() -> TestResult {
    let path = tmp_path("empty.toml");
    fs::write(&path, "")?;

    let cfg = load_from_path(&path)?;
    assert_eq!(cfg.scan.protocols, vec![ProtocolVersion::Tls1_2]);
    assert_eq!(cfg.scan.timeout(), Duration::from_millis(5000));
    assert!(cfg.scan.cipher_suites.is_empty());
    assert!(cfg.scan.curves.is_empty());
    assert_eq!(cfg.output.format, OutputFormat::Markdown);
    assert_eq!(cfg.logging.level, "info");
    assert!(!cfg.logging.show_target);

    fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn loads_full_config() -> TestResult {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"
[scan]
protocols = ["tls1_0", "tls1_2"]
timeout_ms = 1500
cipher_suites = ["TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA"]
curves = ["x25519", "secp256r1"]

[output]
format = "json"

[logging]
level = "debug"
show_target = true
"#
    )?;

    let cfg = load_from_path(file.path())?;
    assert_eq!(cfg.scan.protocols, vec![ProtocolVersion::Tls1_0, ProtocolVersion::Tls1_2]);
    assert_eq!(cfg.scan.timeout_ms, 1500);
    assert_eq!(cfg.scan.cipher_suites, vec!["TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA".to_string()]);
    assert_eq!(cfg.scan.curves, vec!["x25519".to_string(), "secp256r1".to_string()]);
    assert_eq!(cfg.output.format, OutputFormat::Json);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.show_target);
    Ok(())
}

#[test]
fn rejects_invalid_values() -> TestResult {
    let cases = [
        "[scan]\ntimeout_ms = 0\n",
        "[scan]\nprotocols = []\n",
        "[scan]\nprotocols = [\"tls1_3\"]\n",
        "[scan]\ncipher_suites = [\"TLS_RSA_WITH_RC4_128_MD5\"]\n",
        "[scan]\ncurves = [\"curve25519x\"]\n",
        "[scan]\nprotocols = [\"tls1_1\"]\ncipher_suites = [\"TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256\"]\n",
    ];
    for (i, case) in cases.iter().enumerate() {
        let path = tmp_path(&format!("invalid-{i}.toml"));
        fs::write(&path, case)?;
        let result = load_from_path(&path);
        assert!(matches!(result, Err(ScanError::Config(_))), "case {i} should fail: {case}");
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[test]
fn rejects_unparsable_files() -> TestResult {
    let cases = [
        "[scan]\ncurves = \"x25519\"\n",
        "[output]\nformat = \"yaml\"\n",
        "[scan\n",
    ];
    for case in cases {
        let mut file = NamedTempFile::new()?;
        file.write_all(case.as_bytes())?;
        let err = load_from_path(file.path()).err().ok_or("config should not load")?;
        assert!(err.to_string().contains("Failed to parse config"), "{err}");
    }
    Ok(())
}

#[test]
fn reports_missing_file() {
    let result = load_from_path(tmp_path("does-not-exist.toml"));
    assert!(matches!(result, Err(ScanError::Config(msg)) if msg.contains("Failed to read")));
}
