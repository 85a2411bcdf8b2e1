use bytes::{BufMut, BytesMut};

use crate::tls::codec::{put_vec_u16, put_vec_u8};
use crate::tls::curves::NamedCurve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionType {
    ServerName,
    SupportedGroups,
    EcPointFormats,
    SignatureAlgorithms,
    RenegotiationInfo,
    Other(u16),
}

impl ExtensionType {
    pub fn as_u16(self) -> u16 {
        match self {
            ExtensionType::ServerName => 0x0000,
            ExtensionType::SupportedGroups => 0x000a,
            ExtensionType::EcPointFormats => 0x000b,
            ExtensionType::SignatureAlgorithms => 0x000d,
            ExtensionType::RenegotiationInfo => 0xff01,
            ExtensionType::Other(value) => value,
        }
    }

    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => ExtensionType::ServerName,
            0x000a => ExtensionType::SupportedGroups,
            0x000b => ExtensionType::EcPointFormats,
            0x000d => ExtensionType::SignatureAlgorithms,
            0xff01 => ExtensionType::RenegotiationInfo,
            other => ExtensionType::Other(other),
        }
    }
}

/// EC point formats (RFC 8422 §5.1.2)
pub const EC_POINT_FORMAT_UNCOMPRESSED: u8 = 0;
pub const EC_POINT_FORMAT_ANSIX962_COMPRESSED_PRIME: u8 = 1;
pub const EC_POINT_FORMAT_ANSIX962_COMPRESSED_CHAR2: u8 = 2;

/// Signature schemes offered in TLS 1.2 ClientHellos, strongest first
pub const SIGNATURE_ALGORITHMS: &[u16] = &[
    0x0403, // ecdsa_secp256r1_sha256
    0x0503, // ecdsa_secp384r1_sha384
    0x0603, // ecdsa_secp521r1_sha512
    0x0804, // rsa_pss_rsae_sha256
    0x0805, // rsa_pss_rsae_sha384
    0x0806, // rsa_pss_rsae_sha512
    0x0401, // rsa_pkcs1_sha256
    0x0501, // rsa_pkcs1_sha384
    0x0601, // rsa_pkcs1_sha512
    0x0203, // ecdsa_sha1
    0x0201, // rsa_pkcs1_sha1
];

/// ClientHello extensions the scanner sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    /// SNI with a single `host_name` entry
    ServerName(String),
    SupportedGroups(Vec<NamedCurve>),
    EcPointFormats(Vec<u8>),
    SignatureAlgorithms(Vec<u16>),
    RenegotiationInfo(Vec<u8>),
}

impl Extension {
    pub fn extension_type(&self) -> ExtensionType {
        match self {
            Extension::ServerName(_) => ExtensionType::ServerName,
            Extension::SupportedGroups(_) => ExtensionType::SupportedGroups,
            Extension::EcPointFormats(_) => ExtensionType::EcPointFormats,
            Extension::SignatureAlgorithms(_) => ExtensionType::SignatureAlgorithms,
            Extension::RenegotiationInfo(_) => ExtensionType::RenegotiationInfo,
        }
    }

    /// Appends type, length and body to `buf`
    pub fn encode(&self, buf: &mut BytesMut) {
        let mut body = BytesMut::new();
        match self {
            Extension::ServerName(host) => {
                let mut entry = BytesMut::new();
                entry.put_u8(0); // host_name
                put_vec_u16(&mut entry, host.as_bytes());
                put_vec_u16(&mut body, &entry);
            }
            Extension::SupportedGroups(curves) => {
                let mut list = BytesMut::with_capacity(curves.len().saturating_mul(2));
                for curve in curves {
                    list.put_u16(curve.code());
                }
                put_vec_u16(&mut body, &list);
            }
            Extension::EcPointFormats(formats) => {
                put_vec_u8(&mut body, formats);
            }
            Extension::SignatureAlgorithms(schemes) => {
                let mut list = BytesMut::with_capacity(schemes.len().saturating_mul(2));
                for scheme in schemes {
                    list.put_u16(*scheme);
                }
                put_vec_u16(&mut body, &list);
            }
            Extension::RenegotiationInfo(verify_data) => {
                put_vec_u8(&mut body, verify_data);
            }
        }
        buf.put_u16(self.extension_type().as_u16());
        put_vec_u16(buf, &body);
    }
}
