//! Error types for the ASN.1 element model.
//!
//! Two disjoint kinds: [`DecodeError`] for anything that goes wrong while
//! turning bytes into elements (or while validating a value at
//! construction), and [`TypeError`] for a checked downcast that found a
//! different kind than the caller expected. A `TypeError` is recoverable;
//! callers branch on it to try alternative kinds.

use thiserror::Error;

/// Errors raised while decoding BER/DER bytes into elements, or while
/// validating an element value at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid BER encoding: {0}")]
    Ber(#[from] ber::Error),

    // Boolean
    #[error("BOOLEAN: content must be exactly one octet, got {0}")]
    BooleanLength(usize),

    // Integer / Enumerated
    #[error("INTEGER: no content octets")]
    IntegerNoData,

    // Null
    #[error("NULL: content must be empty, got {0} octets")]
    NullWithContent(usize),

    // BitString
    #[error("BIT STRING: no content octets")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBits(u8),
    #[error("BIT STRING: {0} unused bits declared on empty bit data")]
    BitStringUnusedWithoutData(u8),

    // ObjectIdentifier / RelativeOid
    #[error("OBJECT IDENTIFIER: no content octets")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: needs at least two arcs")]
    ObjectIdentifierTooFewArcs,
    #[error("OBJECT IDENTIFIER: first arc must be 0, 1 or 2, got {0}")]
    ObjectIdentifierFirstArc(u64),
    #[error("OBJECT IDENTIFIER: second arc must be 0-39 when the first arc is {first}, got {second}")]
    ObjectIdentifierSecondArc { first: u64, second: u64 },
    #[error("RELATIVE-OID: no content octets")]
    RelativeOidNoData,
    #[error("object identifier arc: dangling continuation octet")]
    OidDanglingArc,
    #[error("object identifier arc: padded encoding (leading 0x80 octet)")]
    OidPaddedArc,
    #[error("object identifier arc: value overflows u64")]
    OidArcOverflow,
    #[error("object identifier: invalid component '{0}'")]
    OidInvalidComponent(String),

    // Real
    #[error("REAL: unrecognized encoding form 0x{0:02x}")]
    RealForm(u8),
    #[error("REAL: special value encoding must be a single octet")]
    RealSpecialLength,
    #[error("REAL: truncated binary encoding")]
    RealTruncated,
    #[error("REAL: exponent of {0} octets is not supported")]
    RealExponentTooLong(usize),
    #[error("REAL: mantissa overflows u64")]
    RealMantissaOverflow,
    #[error("REAL: invalid decimal encoding")]
    RealDecimal,

    // Strings
    #[error("UTF8String: invalid UTF-8")]
    StringNotUtf8,
    #[error("{kind}: invalid character {ch:?}")]
    StringBadCharacter { kind: &'static str, ch: char },
    #[error("BMPString: odd content length {0}")]
    BmpStringOddLength(usize),
    #[error("BMPString: surrogate code unit 0x{0:04x}")]
    BmpStringSurrogate(u16),
    #[error("BMPString: character {0:?} is outside the basic multilingual plane")]
    BmpStringOutsidePlane(char),
    #[error("UniversalString: content length {0} is not a multiple of 4")]
    UniversalStringLength(usize),
    #[error("UniversalString: invalid code point 0x{0:08x}")]
    UniversalStringCodePoint(u32),

    // Times
    #[error("UTCTime: invalid format: {0}")]
    UtcTimeFormat(String),
    #[error("GeneralizedTime: invalid format: {0}")]
    GeneralizedTimeFormat(String),

    // Structure
    #[error("{0}: primitive encoding required")]
    PrimitiveExpected(&'static str),
    #[error("{0}: constructed encoding required")]
    ConstructedExpected(&'static str),

    // Tagging
    #[error("tagged type: class must not be UNIVERSAL")]
    TaggedUniversalClass,
    #[error("implicit tagging cannot wrap raw DER data")]
    ImplicitOverDerData,

    // Top-level shape
    #[error("no element in input")]
    Empty,
    #[error("{0} trailing elements after the first")]
    TrailingElements(usize),
    #[error("DER data must contain exactly one element, got {0}")]
    DerDataElementCount(usize),
}

/// A checked downcast found a different kind than the caller expected.
///
/// Carries the expected kind name and a descriptor of the actual kind:
/// its universal tag name, or `<CLASS> TAG <n>` for non-universal tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, got {actual}")]
pub struct TypeError {
    expected: String,
    actual: String,
}

impl TypeError {
    pub(crate) fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        TypeError {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn actual(&self) -> &str {
        &self.actual
    }
}
