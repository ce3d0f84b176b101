//! Owned value types backing the primitive universal kinds that need
//! more structure than a `String` or `bool`: INTEGER, BIT STRING,
//! OCTET STRING, OBJECT IDENTIFIER and RELATIVE-OID.

use std::fmt::Display;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;

/// An arbitrary-precision INTEGER (also backs ENUMERATED).
///
/// Content octets are the two's-complement big-endian value, per X.690
/// 8.3.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Builds an integer from content octets. At least one octet is
    /// required.
    pub fn from_content(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::IntegerNoData);
        }
        Ok(Integer {
            inner: BigInt::from_signed_bytes_be(data),
        })
    }

    /// Minimal two's-complement content octets.
    pub fn to_content(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let inner = BigInt::from_str(&s).map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

/// A BIT STRING: bit data plus the count of unused trailing bits in the
/// final octet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self, DecodeError> {
        if unused > 7 {
            return Err(DecodeError::BitStringUnusedBits(unused));
        }
        if data.is_empty() && unused != 0 {
            return Err(DecodeError::BitStringUnusedWithoutData(unused));
        }
        Ok(BitString { unused, data })
    }

    /// Builds a bit string from content octets: the leading octet is the
    /// unused-bit count, the rest is bit data.
    pub fn from_content(content: &[u8]) -> Result<Self, DecodeError> {
        let Some((&unused, data)) = content.split_first() else {
            return Err(DecodeError::BitStringNoData);
        };
        Self::new(unused, data.to_vec())
    }

    pub fn to_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.push(self.unused);
        out.extend_from_slice(&self.data);
        out
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of bits carried.
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - self.unused as usize
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.data.iter().enumerate() {
            if i + 1 == self.data.len() && self.unused > 0 {
                let width = 8 - self.unused as usize;
                write!(f, "{:0width$b}", byte >> self.unused, width = width)?;
            } else {
                write!(f, "{:08b}", byte)?;
            }
        }
        Ok(())
    }
}

/// An OCTET STRING: an opaque byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(inner: Vec<u8>) -> Self {
        OctetString { inner }
    }
}

impl From<&[u8]> for OctetString {
    fn from(data: &[u8]) -> Self {
        OctetString {
            inner: data.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.inner {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

// Base-128 subidentifier parsing shared by OBJECT IDENTIFIER and
// RELATIVE-OID. Rejects a padded leading 0x80 octet and values past u64.
fn parse_arcs(data: &[u8]) -> Result<Vec<u64>, DecodeError> {
    let mut arcs = Vec::new();
    let mut value = 0u64;
    let mut continuing = false;
    for &octet in data {
        if !continuing && octet == 0x80 {
            return Err(DecodeError::OidPaddedArc);
        }
        value = value
            .checked_mul(128)
            .and_then(|v| v.checked_add((octet & 0x7f) as u64))
            .ok_or(DecodeError::OidArcOverflow)?;
        if octet & 0x80 == 0 {
            arcs.push(value);
            value = 0;
            continuing = false;
        } else {
            continuing = true;
        }
    }
    if continuing {
        return Err(DecodeError::OidDanglingArc);
    }
    Ok(arcs)
}

// Appends one subidentifier as base-128 digits, most significant first,
// continuation bit on every non-final octet.
fn push_arc(out: &mut Vec<u8>, value: u64) {
    let mut digits = vec![(value & 0x7f) as u8];
    let mut v = value >> 7;
    while v > 0 {
        digits.push((v & 0x7f) as u8 | 0x80);
        v >>= 7;
    }
    out.extend(digits.iter().rev());
}

/// An OBJECT IDENTIFIER: at least two arcs, the first 0-2, the second
/// 0-39 unless the first is 2.
///
/// The wire folds the first two arcs into one subidentifier. Decoding
/// splits it back: values below 40 belong to root arc 0, below 80 to
/// root arc 1, everything above to root arc 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    arcs: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn new(arcs: Vec<u64>) -> Result<Self, DecodeError> {
        if arcs.len() < 2 {
            return Err(DecodeError::ObjectIdentifierTooFewArcs);
        }
        if arcs[0] > 2 {
            return Err(DecodeError::ObjectIdentifierFirstArc(arcs[0]));
        }
        if arcs[0] < 2 && arcs[1] > 39 {
            return Err(DecodeError::ObjectIdentifierSecondArc {
                first: arcs[0],
                second: arcs[1],
            });
        }
        // The wire folds the first pair into 40*X+Y, so under root arc 2
        // the second arc is bounded by u64::MAX - 80.
        if arcs[0] == 2 && arcs[1] > u64::MAX - 80 {
            return Err(DecodeError::OidArcOverflow);
        }
        Ok(ObjectIdentifier { arcs })
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    pub fn from_content(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::ObjectIdentifierNoData);
        }
        let subidentifiers = parse_arcs(data)?;
        let mut arcs = Vec::with_capacity(subidentifiers.len() + 1);
        let first = subidentifiers[0];
        if first < 40 {
            arcs.push(0);
            arcs.push(first);
        } else if first < 80 {
            arcs.push(1);
            arcs.push(first - 40);
        } else {
            arcs.push(2);
            arcs.push(first - 80);
        }
        arcs.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { arcs })
    }

    pub fn to_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        push_arc(&mut out, self.arcs[0] * 40 + self.arcs[1]);
        for &arc in &self.arcs[2..] {
            push_arc(&mut out, arc);
        }
        out
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for ObjectIdentifier {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|component| {
                component
                    .parse::<u64>()
                    .map_err(|_| DecodeError::OidInvalidComponent(component.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(arcs)
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A RELATIVE-OID: one or more arcs, no root-arc folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativeOid {
    arcs: Vec<u64>,
}

impl RelativeOid {
    pub fn new(arcs: Vec<u64>) -> Result<Self, DecodeError> {
        if arcs.is_empty() {
            return Err(DecodeError::RelativeOidNoData);
        }
        Ok(RelativeOid { arcs })
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    pub fn from_content(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::RelativeOidNoData);
        }
        Ok(RelativeOid {
            arcs: parse_arcs(data)?,
        })
    }

    pub fn to_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for &arc in &self.arcs {
            push_arc(&mut out, arc);
        }
        out
    }
}

impl Display for RelativeOid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::{BitString, Integer, ObjectIdentifier, OctetString, RelativeOid};
    use crate::error::DecodeError;

    #[rstest(content, expected,
        case(vec![0x00], 0),
        case(vec![0x07], 7),
        case(vec![0x7f], 127),
        case(vec![0x00, 0x80], 128),
        case(vec![0x80], -128),
        case(vec![0xff], -1),
        case(vec![0xfe, 0x00], -512),
        case(vec![0x01, 0x00, 0x00], 65536),
    )]
    fn test_integer_from_content(content: Vec<u8>, expected: i64) {
        let integer = Integer::from_content(&content).unwrap();
        assert_eq!(Some(expected), integer.to_i64());
    }

    #[rstest(value, content,
        case(0, vec![0x00]),
        case(127, vec![0x7f]),
        case(128, vec![0x00, 0x80]),
        case(-1, vec![0xff]),
        case(-128, vec![0x80]),
        case(256, vec![0x01, 0x00]),
    )]
    fn test_integer_to_content_minimal(value: i64, content: Vec<u8>) {
        assert_eq!(content, Integer::from(value).to_content());
    }

    #[test]
    fn test_integer_empty_content() {
        assert_eq!(Integer::from_content(&[]), Err(DecodeError::IntegerNoData));
    }

    #[test]
    fn test_integer_serde() {
        let integer = Integer::from(-42);
        let json = serde_json::to_string(&integer).unwrap();
        assert_eq!("\"-42\"", json);
        assert_eq!(integer, serde_json::from_str::<Integer>(&json).unwrap());
    }

    #[test]
    fn test_bit_string_from_content() {
        let bits = BitString::from_content(&[0x06, 0x6e, 0x5d, 0xc0]).unwrap();
        assert_eq!(6, bits.unused_bits());
        assert_eq!(&[0x6e, 0x5d, 0xc0], bits.as_bytes());
        assert_eq!(18, bits.bit_len());
        assert_eq!("011011100101110111", bits.to_string());
        assert_eq!(vec![0x06, 0x6e, 0x5d, 0xc0], bits.to_content());
    }

    #[rstest(content, expected,
        case(vec![], DecodeError::BitStringNoData),
        case(vec![0x08, 0xff], DecodeError::BitStringUnusedBits(8)),
        case(vec![0x03], DecodeError::BitStringUnusedWithoutData(3)),
    )]
    fn test_bit_string_invalid(content: Vec<u8>, expected: DecodeError) {
        assert_eq!(BitString::from_content(&content), Err(expected));
    }

    #[test]
    fn test_bit_string_empty_is_valid() {
        let bits = BitString::from_content(&[0x00]).unwrap();
        assert_eq!(0, bits.bit_len());
        assert_eq!(vec![0x00], bits.to_content());
    }

    #[test]
    fn test_octet_string_display() {
        let octets = OctetString::from(&[0xde, 0xad, 0xbe, 0xef][..]);
        assert_eq!("deadbeef", octets.to_string());
    }

    #[rstest(content, dotted,
        case(vec![0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b], "1.2.840.113549.1.1.11"),
        case(vec![0x55, 0x04, 0x03], "2.5.4.3"),
        case(vec![0x27, 0x01], "0.39.1"),
        case(vec![0x88, 0x37], "2.999"),
    )]
    fn test_oid_from_content(content: Vec<u8>, dotted: &str) {
        let oid = ObjectIdentifier::from_content(&content).unwrap();
        assert_eq!(dotted, oid.to_string());
        assert_eq!(content, oid.to_content());
    }

    #[test]
    fn test_oid_from_str_roundtrip() {
        let oid = ObjectIdentifier::from_str("1.3.6.1.4.1.11129.2.4.2").unwrap();
        assert_eq!(
            oid,
            ObjectIdentifier::from_content(&oid.to_content()).unwrap()
        );
    }

    #[rstest(content, expected,
        case(vec![], DecodeError::ObjectIdentifierNoData),
        case(vec![0x2a, 0x86], DecodeError::OidDanglingArc),
        case(vec![0x2a, 0x80, 0x01], DecodeError::OidPaddedArc),
    )]
    fn test_oid_invalid_content(content: Vec<u8>, expected: DecodeError) {
        assert_eq!(ObjectIdentifier::from_content(&content), Err(expected));
    }

    #[rstest(arcs, expected,
        case(vec![1], DecodeError::ObjectIdentifierTooFewArcs),
        case(vec![3, 1], DecodeError::ObjectIdentifierFirstArc(3)),
        case(vec![1, 40], DecodeError::ObjectIdentifierSecondArc { first: 1, second: 40 }),
    )]
    fn test_oid_invalid_arcs(arcs: Vec<u64>, expected: DecodeError) {
        assert_eq!(ObjectIdentifier::new(arcs), Err(expected));
    }

    #[test]
    fn test_oid_second_arc_unbounded_under_root_two() {
        assert!(ObjectIdentifier::new(vec![2, 999]).is_ok());
    }

    #[test]
    fn test_oid_second_arc_folding_bound_under_root_two() {
        // 80 + second must stay within u64 for the folded first pair.
        assert_eq!(
            ObjectIdentifier::new(vec![2, u64::MAX - 10]),
            Err(DecodeError::OidArcOverflow)
        );
        let oid = ObjectIdentifier::new(vec![2, u64::MAX - 80]).unwrap();
        assert_eq!(
            oid,
            ObjectIdentifier::from_content(&oid.to_content()).unwrap()
        );
    }

    #[test]
    fn test_oid_arc_overflow() {
        // Eleven continuation octets push the arc past u64.
        let mut content = vec![0x2a];
        content.extend([0xff; 10]);
        content.push(0x7f);
        assert_eq!(
            ObjectIdentifier::from_content(&content),
            Err(DecodeError::OidArcOverflow)
        );
    }

    #[test]
    fn test_oid_serde() {
        let oid = ObjectIdentifier::new(vec![1, 2, 840, 113549]).unwrap();
        let json = serde_json::to_string(&oid).unwrap();
        assert_eq!("\"1.2.840.113549\"", json);
        assert_eq!(oid, serde_json::from_str::<ObjectIdentifier>(&json).unwrap());
    }

    #[test]
    fn test_relative_oid_roundtrip() {
        let roid = RelativeOid::new(vec![8571, 3, 2]).unwrap();
        assert_eq!(vec![0xc2, 0x7b, 0x03, 0x02], roid.to_content());
        assert_eq!(
            roid,
            RelativeOid::from_content(&roid.to_content()).unwrap()
        );
        assert_eq!("8571.3.2", roid.to_string());
    }

    #[test]
    fn test_relative_oid_empty() {
        assert_eq!(
            RelativeOid::from_content(&[]),
            Err(DecodeError::RelativeOidNoData)
        );
    }
}
