use crate::tls::version::ProtocolVersion;
use tracing::warn;

/// A cipher suite whose key exchange is ephemeral (EC)DH over a named curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdhCipherSuite {
    pub name: &'static str,
    pub code: u16,
    /// Oldest protocol version the suite may be negotiated with
    pub min_version: ProtocolVersion,
}

const fn suite(name: &'static str, code: u16, min_version: ProtocolVersion) -> EcdhCipherSuite {
    EcdhCipherSuite { name, code, min_version }
}

/// Cipher suites offered while probing curves.
///
/// Every entry makes the server send a ServerKeyExchange carrying ECDH
/// parameters; static ECDH suites are left out because they never do.
const ECDHE_CIPHER_SUITES: &[EcdhCipherSuite] = &[
    // TLS 1.2: AEAD
    suite("TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256", 0xc02b, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384", 0xc02c, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256", 0xc02f, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384", 0xc030, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256", 0xcca8, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256", 0xcca9, ProtocolVersion::Tls1_2),
    // TLS 1.2: CBC with SHA-2
    suite("TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256", 0xc023, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA384", 0xc024, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256", 0xc027, ProtocolVersion::Tls1_2),
    suite("TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384", 0xc028, ProtocolVersion::Tls1_2),
    // TLS 1.0+: ECDSA
    suite("TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA", 0xc009, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA", 0xc00a, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_ECDSA_WITH_3DES_EDE_CBC_SHA", 0xc008, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_ECDSA_WITH_RC4_128_SHA", 0xc007, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_ECDSA_WITH_NULL_SHA", 0xc006, ProtocolVersion::Tls1_0),
    // TLS 1.0+: RSA
    suite("TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA", 0xc013, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA", 0xc014, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA", 0xc012, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_RSA_WITH_RC4_128_SHA", 0xc011, ProtocolVersion::Tls1_0),
    suite("TLS_ECDHE_RSA_WITH_NULL_SHA", 0xc010, ProtocolVersion::Tls1_0),
    // TLS 1.0+: anonymous
    suite("TLS_ECDH_anon_WITH_AES_128_CBC_SHA", 0xc018, ProtocolVersion::Tls1_0),
    suite("TLS_ECDH_anon_WITH_AES_256_CBC_SHA", 0xc019, ProtocolVersion::Tls1_0),
    suite("TLS_ECDH_anon_WITH_3DES_EDE_CBC_SHA", 0xc017, ProtocolVersion::Tls1_0),
    suite("TLS_ECDH_anon_WITH_RC4_128_SHA", 0xc016, ProtocolVersion::Tls1_0),
    suite("TLS_ECDH_anon_WITH_NULL_SHA", 0xc015, ProtocolVersion::Tls1_0),
];

/// Names of every ECDHE cipher suite the scanner knows.
pub fn supported_cipher_suites() -> Vec<&'static str> {
    ECDHE_CIPHER_SUITES.iter().map(|s| s.name).collect()
}

/// Check if a cipher suite name is known to the scanner.
pub fn is_cipher_suite_supported(name: &str) -> bool {
    supported_cipher_suites().contains(&name)
}

/// ECDHE cipher suite codes that may be offered with `version`.
pub fn ecdhe_cipher_suites(version: ProtocolVersion) -> Vec<u16> {
    ECDHE_CIPHER_SUITES
        .iter()
        .filter(|s| s.min_version <= version)
        .map(|s| s.code)
        .collect()
}

/// Resolve a list of cipher suite names into the codes offered with `version`.
///
/// Unknown names are skipped (validation should have been done earlier by
/// [`is_cipher_suite_supported`]), and so are suites too recent for
/// `version`. If the returned `Vec` is empty, callers should fall back to
/// [`ecdhe_cipher_suites`].
pub fn resolve_cipher_suites(names: &[String], version: ProtocolVersion) -> Vec<u16> {
    names
        .iter()
        .filter_map(|name| match ECDHE_CIPHER_SUITES.iter().find(|s| s.name == name.as_str()) {
            Some(s) if s.min_version <= version => Some(s.code),
            Some(_) => None,
            None => {
                warn!(cipher_suite = %name, "unknown cipher suite ignored; check `supported_cipher_suites()` for valid names");
                None
            }
        })
        .collect()
}
