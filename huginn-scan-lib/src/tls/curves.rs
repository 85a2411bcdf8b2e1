//! Elliptic curves (named groups) probed by the curve analyzer
//!
//! The registry holds the IANA "TLS Supported Groups" entries that name an
//! elliptic curve usable with ECDHE key exchange in TLS 1.0 to TLS 1.2,
//! in ascending code order. Probing iterates this order.
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! named_curves {
    ($($variant:ident => ($code:literal, $name:literal)),+ $(,)?) => {
        /// A TLS named curve
        ///
        /// `Unknown` holds a code read from the wire that is not part of the
        /// registry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NamedCurve {
            $($variant,)+
            Unknown(u16),
        }

        impl NamedCurve {
            /// Every registered curve, in registry order
            pub const ALL: &'static [NamedCurve] = &[$(NamedCurve::$variant,)+];

            /// IANA code point
            pub const fn code(self) -> u16 {
                match self {
                    $(NamedCurve::$variant => $code,)+
                    NamedCurve::Unknown(code) => code,
                }
            }

            /// Registered curve for an IANA code point
            pub const fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(NamedCurve::$variant),)+
                    _ => None,
                }
            }

            /// IANA description, `None` for unknown codes
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $(NamedCurve::$variant => Some($name),)+
                    NamedCurve::Unknown(_) => None,
                }
            }
        }
    };
}

named_curves! {
    Sect163k1 => (1, "sect163k1"),
    Sect163r1 => (2, "sect163r1"),
    Sect163r2 => (3, "sect163r2"),
    Sect193r1 => (4, "sect193r1"),
    Sect193r2 => (5, "sect193r2"),
    Sect233k1 => (6, "sect233k1"),
    Sect233r1 => (7, "sect233r1"),
    Sect239k1 => (8, "sect239k1"),
    Sect283k1 => (9, "sect283k1"),
    Sect283r1 => (10, "sect283r1"),
    Sect409k1 => (11, "sect409k1"),
    Sect409r1 => (12, "sect409r1"),
    Sect571k1 => (13, "sect571k1"),
    Sect571r1 => (14, "sect571r1"),
    Secp160k1 => (15, "secp160k1"),
    Secp160r1 => (16, "secp160r1"),
    Secp160r2 => (17, "secp160r2"),
    Secp192k1 => (18, "secp192k1"),
    Secp192r1 => (19, "secp192r1"),
    Secp224k1 => (20, "secp224k1"),
    Secp224r1 => (21, "secp224r1"),
    Secp256k1 => (22, "secp256k1"),
    Secp256r1 => (23, "secp256r1"),
    Secp384r1 => (24, "secp384r1"),
    Secp521r1 => (25, "secp521r1"),
    BrainpoolP256r1 => (26, "brainpoolP256r1"),
    BrainpoolP384r1 => (27, "brainpoolP384r1"),
    BrainpoolP512r1 => (28, "brainpoolP512r1"),
    X25519 => (29, "x25519"),
    X448 => (30, "x448"),
}

impl NamedCurve {
    /// Maps any code to a curve, keeping unregistered codes as `Unknown`
    pub fn from_code_lossy(code: u16) -> Self {
        Self::from_code(code).unwrap_or(NamedCurve::Unknown(code))
    }
}

impl fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown_{:#06x}", self.code()),
        }
    }
}

impl FromStr for NamedCurve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamedCurve::ALL
            .iter()
            .copied()
            .find(|curve| curve.name().is_some_and(|name| name.eq_ignore_ascii_case(s)))
            .ok_or_else(|| format!("unknown curve: {s}"))
    }
}

impl Serialize for NamedCurve {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Names of every curve the analyzer can probe
pub fn supported_curves() -> Vec<&'static str> {
    NamedCurve::ALL.iter().filter_map(|curve| curve.name()).collect()
}

/// Check if a curve name is known to the analyzer
pub fn is_curve_supported(name: &str) -> bool {
    name.parse::<NamedCurve>().is_ok()
}
