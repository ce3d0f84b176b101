use std::fmt::Display;

use crate::error::Error;
use crate::read_u8;

const CONSTRUCTED_BIT: u8 = 0x20;
const HIGH_TAG_FORM: u8 = 0x1f;

// Base-128 digits needed for a u64 tag number.
const MAX_TAG_OCTETS: usize = 10;

/// The four ASN.1 tag classes, from bits 8-7 of the leading identifier
/// octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    fn from_octet(octet: u8) -> Self {
        match octet >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xc0,
        }
    }
}

impl Display for TagClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT SPECIFIC",
            TagClass::Private => "PRIVATE",
        };
        write!(f, "{}", s)
    }
}

/// The identifier octets of a TLV: tag class, constructed bit and tag
/// number.
///
/// Tag numbers 0-30 encode in the leading octet (short form). Larger
/// numbers use the high-tag-number form: the leading octet carries 0x1f
/// and the number follows as base-128 digits, most significant first,
/// with the high bit set on every non-final octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier {
    class: TagClass,
    constructed: bool,
    number: u64,
}

impl Identifier {
    pub fn new(class: TagClass, constructed: bool, number: u64) -> Self {
        Identifier {
            class,
            constructed,
            number,
        }
    }

    pub fn universal(constructed: bool, number: u64) -> Self {
        Self::new(TagClass::Universal, constructed, number)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Parses the identifier octets, returning the remaining input.
    ///
    /// Fails on truncated input, on a continuation that never terminates
    /// within the u64 bound, and on a padded leading 0x80 continuation
    /// octet (X.690 8.1.2.4.2 c).
    pub fn parse(input: &[u8]) -> Result<(&[u8], Self), Error> {
        let (mut rest, first) = read_u8(input, "identifier")?;
        let class = TagClass::from_octet(first);
        let constructed = first & CONSTRUCTED_BIT != 0;
        let bits = first & HIGH_TAG_FORM;
        if bits < HIGH_TAG_FORM {
            return Ok((rest, Identifier::new(class, constructed, bits as u64)));
        }

        let mut number = 0u64;
        for i in 0..MAX_TAG_OCTETS {
            let (r, octet) = read_u8(rest, "identifier continuation")?;
            rest = r;
            if i == 0 && octet == 0x80 {
                return Err(Error::PaddedTagNumber);
            }
            number = number
                .checked_mul(128)
                .and_then(|n| n.checked_add((octet & 0x7f) as u64))
                .ok_or(Error::TagNumberOverflow)?;
            if octet & 0x80 == 0 {
                return Ok((rest, Identifier::new(class, constructed, number)));
            }
        }
        Err(Error::TagNumberTooLong(MAX_TAG_OCTETS))
    }

    /// Encodes the identifier octets: short form when the tag number fits
    /// in 5 bits, high-tag-number form otherwise.
    pub fn encode(&self) -> Vec<u8> {
        let lead = self.class.to_bits()
            | if self.constructed {
                CONSTRUCTED_BIT
            } else {
                0x00
            };
        if self.number <= 30 {
            return vec![lead | self.number as u8];
        }

        let mut digits = Vec::new();
        let mut n = self.number;
        loop {
            digits.push((n & 0x7f) as u8);
            n >>= 7;
            if n == 0 {
                break;
            }
        }
        let mut out = vec![lead | HIGH_TAG_FORM];
        while let Some(digit) = digits.pop() {
            if digits.is_empty() {
                out.push(digit);
            } else {
                out.push(digit | 0x80);
            }
        }
        out
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.class,
            if self.constructed {
                "CONSTRUCTED"
            } else {
                "PRIMITIVE"
            },
            self.number
        )
    }
}
