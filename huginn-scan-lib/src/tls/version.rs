use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TLS protocol versions known to the scanner
///
/// Only TLS 1.0 to TLS 1.2 carry ECDH parameters in a ServerKeyExchange
/// message; the other versions are recognised so that they can be
/// reported and rejected explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// SSL 3.0
    #[serde(rename = "ssl3")]
    Ssl3,
    /// TLS 1.0
    #[serde(rename = "tls1_0")]
    Tls1_0,
    /// TLS 1.1
    #[serde(rename = "tls1_1")]
    Tls1_1,
    /// TLS 1.2
    #[serde(rename = "tls1_2")]
    Tls1_2,
    /// TLS 1.3
    #[serde(rename = "tls1_3")]
    Tls1_3,
}

impl ProtocolVersion {
    pub const fn as_u16(self) -> u16 {
        match self {
            ProtocolVersion::Ssl3 => 0x0300,
            ProtocolVersion::Tls1_0 => 0x0301,
            ProtocolVersion::Tls1_1 => 0x0302,
            ProtocolVersion::Tls1_2 => 0x0303,
            ProtocolVersion::Tls1_3 => 0x0304,
        }
    }

    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0300 => Some(ProtocolVersion::Ssl3),
            0x0301 => Some(ProtocolVersion::Tls1_0),
            0x0302 => Some(ProtocolVersion::Tls1_1),
            0x0303 => Some(ProtocolVersion::Tls1_2),
            0x0304 => Some(ProtocolVersion::Tls1_3),
            _ => None,
        }
    }

    /// Short identifier used on the command line and in config files
    pub const fn id(self) -> &'static str {
        match self {
            ProtocolVersion::Ssl3 => "ssl3",
            ProtocolVersion::Tls1_0 => "tls1_0",
            ProtocolVersion::Tls1_1 => "tls1_1",
            ProtocolVersion::Tls1_2 => "tls1_2",
            ProtocolVersion::Tls1_3 => "tls1_3",
        }
    }

    /// Whether the curve analyzer can probe this version
    pub const fn has_ecdh_key_exchange(self) -> bool {
        matches!(self, ProtocolVersion::Tls1_0 | ProtocolVersion::Tls1_1 | ProtocolVersion::Tls1_2)
    }

    /// Versions the curve analyzer can probe, oldest first
    pub fn ecdh_versions() -> Vec<ProtocolVersion> {
        vec![ProtocolVersion::Tls1_0, ProtocolVersion::Tls1_1, ProtocolVersion::Tls1_2]
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolVersion::Ssl3 => "SSL 3.0",
            ProtocolVersion::Tls1_0 => "TLS 1.0",
            ProtocolVersion::Tls1_1 => "TLS 1.1",
            ProtocolVersion::Tls1_2 => "TLS 1.2",
            ProtocolVersion::Tls1_3 => "TLS 1.3",
        };
        f.write_str(name)
    }
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ssl3" | "sslv3" | "ssl 3.0" => Ok(ProtocolVersion::Ssl3),
            "tls1_0" | "tls1.0" | "tls 1.0" | "tls1" => Ok(ProtocolVersion::Tls1_0),
            "tls1_1" | "tls1.1" | "tls 1.1" => Ok(ProtocolVersion::Tls1_1),
            "tls1_2" | "tls1.2" | "tls 1.2" => Ok(ProtocolVersion::Tls1_2),
            "tls1_3" | "tls1.3" | "tls 1.3" => Ok(ProtocolVersion::Tls1_3),
            _ => Err(format!("unknown protocol version: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_protocol_aliases() {
        assert_eq!("tls1_2".parse::<ProtocolVersion>(), Ok(ProtocolVersion::Tls1_2));
        assert_eq!("TLS 1.0".parse::<ProtocolVersion>(), Ok(ProtocolVersion::Tls1_0));
        assert!("tls2".parse::<ProtocolVersion>().is_err());
    }

    #[test]
    fn test_wire_codes_round_trip() {
        for version in ProtocolVersion::ecdh_versions() {
            assert_eq!(ProtocolVersion::from_u16(version.as_u16()), Some(version));
        }
        assert_eq!(ProtocolVersion::from_u16(0x0305), None);
    }

    #[test]
    fn test_only_tls10_to_tls12_have_ecdh_key_exchange() {
        assert!(!ProtocolVersion::Ssl3.has_ecdh_key_exchange());
        assert!(ProtocolVersion::Tls1_1.has_ecdh_key_exchange());
        assert!(!ProtocolVersion::Tls1_3.has_ecdh_key_exchange());
    }
}
