mod helpers;

use helpers::{requested_curve, server_key_exchange_body};
use huginn_scan_lib::tls::{
    ecdhe_cipher_suites, parse_ecdh_params, ClientHello, CurveType, EcdhError, Extension,
    NamedCurve, ProtocolVersion,
};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[test]
fn test_client_hello_record_layout() -> TestResult {
    let mut hello = ClientHello::ecdhx(ProtocolVersion::Tls1_2, Some("example.com"));
    let record = {
        let scoped = hello.scoped_extension(Extension::SupportedGroups(vec![NamedCurve::Secp521r1]));
        scoped.encode_record()
    };

    assert_eq!(&record[..3], &[22, 0x03, 0x01]);
    let record_len = usize::from(u16::from_be_bytes([record[3], record[4]]));
    assert_eq!(record.len(), 5 + record_len);

    assert_eq!(record[5], 1);
    let body_len = (usize::from(record[6]) << 16) | (usize::from(record[7]) << 8) | usize::from(record[8]);
    assert_eq!(record_len, 4 + body_len);
    assert_eq!(&record[9..11], &[0x03, 0x03]);

    let suites_at = 9 + 2 + 32 + 1;
    let suites_len = usize::from(u16::from_be_bytes([record[suites_at], record[suites_at + 1]]));
    assert_eq!(suites_len, 2 * ecdhe_cipher_suites(ProtocolVersion::Tls1_2).len());

    // ecdhx() carries the full list; the scoped one is appended after it
    assert_eq!(requested_curve(&record), Some(NamedCurve::Sect163k1.code()));
    Ok(())
}

#[test]
fn test_single_curve_hello_requests_that_curve() {
    let mut hello = ClientHello::new(ProtocolVersion::Tls1_0, ecdhe_cipher_suites(ProtocolVersion::Tls1_0));
    let scoped = hello.scoped_extension(Extension::SupportedGroups(vec![NamedCurve::BrainpoolP384r1]));
    assert_eq!(requested_curve(&scoped.encode_record()), Some(27));
}

#[test]
fn test_parse_server_key_exchange_params() -> TestResult {
    let body = server_key_exchange_body(NamedCurve::BrainpoolP512r1.code());
    let (params, signature) = parse_ecdh_params(&body)?;

    assert_eq!(params.named_curve, NamedCurve::BrainpoolP512r1);
    assert_eq!(&params.public_point[..], &[0x04, 0x01, 0x02, 0x03]);
    assert_eq!(signature, &[0x04, 0x01, 0x00, 0x02, 0xde, 0xad]);
    Ok(())
}

#[test]
fn test_parse_rejects_what_cannot_be_identified() {
    assert_eq!(
        parse_ecdh_params(&[2, 0x00]),
        Err(EcdhError::UnsupportedCurveType(CurveType::ExplicitChar2))
    );
    assert_eq!(
        parse_ecdh_params(&server_key_exchange_body(0x0100)),
        Err(EcdhError::UnknownNamedCurve(0x0100))
    );
    assert!(matches!(parse_ecdh_params(&[3, 0x00, 0x17, 65, 0x04]), Err(EcdhError::Decode(_))));
    assert!(matches!(parse_ecdh_params(&[]), Err(EcdhError::Decode(_))));
}
