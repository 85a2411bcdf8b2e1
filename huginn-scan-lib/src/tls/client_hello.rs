use bytes::{BufMut, Bytes, BytesMut};
use rand::{rng, Rng};
use std::ops::Deref;

use crate::tls::cipher_suites::ecdhe_cipher_suites;
use crate::tls::codec::{put_u24, put_vec_u16, put_vec_u8};
use crate::tls::curves::NamedCurve;
use crate::tls::extension::{
    Extension, ExtensionType, EC_POINT_FORMAT_ANSIX962_COMPRESSED_CHAR2,
    EC_POINT_FORMAT_ANSIX962_COMPRESSED_PRIME, EC_POINT_FORMAT_UNCOMPRESSED, SIGNATURE_ALGORITHMS,
};
use crate::tls::handshake::HandshakeType;
use crate::tls::record::{encode_record, ContentType};
use crate::tls::version::ProtocolVersion;

/// A ClientHello under construction
///
/// The extension list is ordered and may be mutated between handshake
/// attempts; [`ClientHello::scoped_extension`] appends an extension for the
/// lifetime of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    version: ProtocolVersion,
    random: [u8; 32],
    session_id: Vec<u8>,
    cipher_suites: Vec<u16>,
    compression_methods: Vec<u8>,
    extensions: Vec<Extension>,
}

impl ClientHello {
    pub fn new(version: ProtocolVersion, cipher_suites: Vec<u16>) -> Self {
        let mut random = [0u8; 32];
        rng().fill(&mut random);
        Self {
            version,
            random,
            session_id: Vec::new(),
            cipher_suites,
            compression_methods: vec![0],
            extensions: Vec::new(),
        }
    }

    /// ClientHello offering every ECDHE cipher suite valid for `version`
    ///
    /// Carries SNI (when `server_name` is given), EC point formats, the full
    /// supported groups list, signature algorithms (TLS 1.2 only) and an
    /// empty renegotiation info.
    pub fn ecdhx(version: ProtocolVersion, server_name: Option<&str>) -> Self {
        let mut hello = Self::new(version, ecdhe_cipher_suites(version));
        if let Some(name) = server_name {
            hello.push_extension(Extension::ServerName(name.to_string()));
        }
        hello.push_extension(Extension::EcPointFormats(vec![
            EC_POINT_FORMAT_UNCOMPRESSED,
            EC_POINT_FORMAT_ANSIX962_COMPRESSED_PRIME,
            EC_POINT_FORMAT_ANSIX962_COMPRESSED_CHAR2,
        ]));
        hello.push_extension(Extension::SupportedGroups(NamedCurve::ALL.to_vec()));
        if version >= ProtocolVersion::Tls1_2 {
            hello.push_extension(Extension::SignatureAlgorithms(SIGNATURE_ALGORITHMS.to_vec()));
        }
        hello.push_extension(Extension::RenegotiationInfo(Vec::new()));
        hello
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn cipher_suites(&self) -> &[u16] {
        &self.cipher_suites
    }

    pub fn set_cipher_suites(&mut self, cipher_suites: Vec<u16>) {
        self.cipher_suites = cipher_suites;
    }

    pub fn compression_methods(&self) -> &[u8] {
        &self.compression_methods
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn push_extension(&mut self, extension: Extension) {
        self.extensions.push(extension);
    }

    pub fn has_extension(&self, extension_type: ExtensionType) -> bool {
        self.extensions
            .iter()
            .any(|e| e.extension_type() == extension_type)
    }

    /// Removes the last extension of `extension_type`
    pub fn remove_extension(&mut self, extension_type: ExtensionType) -> Option<Extension> {
        let index = self
            .extensions
            .iter()
            .rposition(|e| e.extension_type() == extension_type)?;
        Some(self.extensions.remove(index))
    }

    /// Curves listed in the supported groups extension, if present
    pub fn supported_groups(&self) -> Option<&[NamedCurve]> {
        self.extensions.iter().find_map(|e| match e {
            Extension::SupportedGroups(curves) => Some(curves.as_slice()),
            _ => None,
        })
    }

    /// Appends `extension` until the returned guard is dropped
    pub fn scoped_extension(&mut self, extension: Extension) -> ScopedExtension<'_> {
        let extension_type = extension.extension_type();
        self.extensions.push(extension);
        ScopedExtension { hello: self, extension_type }
    }

    /// Handshake message: type, 24-bit length and body
    pub fn encode_handshake(&self) -> BytesMut {
        let mut body = BytesMut::with_capacity(256);
        body.put_u16(self.version.as_u16());
        body.put_slice(&self.random);
        put_vec_u8(&mut body, &self.session_id);

        let mut suites = BytesMut::with_capacity(self.cipher_suites.len().saturating_mul(2));
        for suite in &self.cipher_suites {
            suites.put_u16(*suite);
        }
        put_vec_u16(&mut body, &suites);
        put_vec_u8(&mut body, &self.compression_methods);

        if !self.extensions.is_empty() {
            let mut extensions = BytesMut::new();
            for extension in &self.extensions {
                extension.encode(&mut extensions);
            }
            put_vec_u16(&mut body, &extensions);
        }

        let mut message = BytesMut::with_capacity(body.len().saturating_add(4));
        message.put_u8(HandshakeType::ClientHello.as_u8());
        put_u24(&mut message, body.len());
        message.put_slice(&body);
        message
    }

    /// Handshake record ready to be written to the wire
    ///
    /// The record layer advertises TLS 1.0 whatever the offered version,
    /// as many servers reject unknown record versions on the first flight.
    pub fn encode_record(&self) -> Bytes {
        encode_record(ContentType::Handshake, ProtocolVersion::Tls1_0, &self.encode_handshake())
    }
}

/// Guard returned by [`ClientHello::scoped_extension`]
///
/// Dereferences to the ClientHello with the extension attached and removes
/// it again on drop, on every exit path.
#[derive(Debug)]
pub struct ScopedExtension<'a> {
    hello: &'a mut ClientHello,
    extension_type: ExtensionType,
}

impl Deref for ScopedExtension<'_> {
    type Target = ClientHello;

    fn deref(&self) -> &ClientHello {
        self.hello
    }
}

impl Drop for ScopedExtension<'_> {
    fn drop(&mut self) {
        self.hello.remove_extension(self.extension_type);
    }
}
