//! ECDH parameters of a ServerKeyExchange (RFC 8422 §5.4)
//!
//! ```text
//! struct {
//!     ECCurveType curve_type;     // 1 byte
//!     NamedCurve  namedcurve;     // 2 bytes, only for named_curve
//!     opaque      point <1..2^8-1>;
//! } ServerECDHParams;
//! ```
//! The signature that follows the parameters is left in the remainder.

use bytes::Bytes;
use thiserror::Error;

use crate::tls::codec::{DecodeError, Reader};
use crate::tls::curves::NamedCurve;

/// Curve type marker of the ECDH parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    /// Explicit prime curve parameters (deprecated)
    ExplicitPrime,
    /// Explicit characteristic-2 curve parameters (deprecated)
    ExplicitChar2,
    NamedCurve,
    Unknown(u8),
}

impl CurveType {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => CurveType::ExplicitPrime,
            2 => CurveType::ExplicitChar2,
            3 => CurveType::NamedCurve,
            other => CurveType::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            CurveType::ExplicitPrime => 1,
            CurveType::ExplicitChar2 => 2,
            CurveType::NamedCurve => 3,
            CurveType::Unknown(value) => value,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcdhError {
    /// Only `named_curve` parameters are decoded
    #[error("unsupported ECDH curve type: {0:?}")]
    UnsupportedCurveType(CurveType),

    #[error("unknown named curve: {0:#06x}")]
    UnknownNamedCurve(u16),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcdhParams {
    pub named_curve: NamedCurve,
    pub public_point: Bytes,
}

/// Parses the ECDH parameters at the start of `input`
///
/// Returns the parameters and the unparsed remainder (the signature).
pub fn parse_ecdh_params(input: &[u8]) -> Result<(EcdhParams, &[u8]), EcdhError> {
    let mut reader = Reader::new(input);
    let curve_type = CurveType::from_u8(reader.u8("ECDH curve type")?);
    if curve_type != CurveType::NamedCurve {
        return Err(EcdhError::UnsupportedCurveType(curve_type));
    }
    let code = reader.u16("ECDH named curve")?;
    let named_curve = NamedCurve::from_code(code).ok_or(EcdhError::UnknownNamedCurve(code))?;
    let public_point = reader.vec_u8("ECDH public point")?;
    if public_point.is_empty() {
        return Err(DecodeError::InvalidValue { what: "ECDH public point length", value: 0 }.into());
    }
    let params = EcdhParams { named_curve, public_point: Bytes::copy_from_slice(public_point) };
    Ok((params, reader.rest()))
}
