//! Raw TLV wire layer for BER/DER (ITU-T X.690).
//!
//! This crate parses a byte buffer into a tree of tag-length-value
//! triplets and re-serializes such a tree into canonical definite-length
//! bytes. It knows nothing about the universal ASN.1 types; the `asn1`
//! crate maps [`Tlv`] nodes onto the typed element model.
//!
//! Decoding accepts full BER: short and high-tag-number identifiers,
//! short, long and indefinite lengths. Encoding is strict DER: definite
//! lengths only, in their minimal form.
//!
//! ```ignore
//! use tsugite::decoder::Decoder;
//!
//! let bytes: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x07];
//! let der: ber::Der = bytes.decode()?;
//! ```

use nom::Parser;
use tsugite::decoder::{DecodableFrom, Decoder};

pub mod error;
mod identifier;
mod length;

pub use error::Error;
pub use identifier::{Identifier, TagClass};
pub use length::Length;

// End-of-contents marker terminating indefinite-length content.
const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

pub(crate) fn read_u8<'a>(input: &'a [u8], what: &'static str) -> Result<(&'a [u8], u8), Error> {
    let result: nom::IResult<&[u8], u8> = nom::number::be_u8().parse(input);
    result.map_err(|_| Error::Truncated {
        what,
        needed: 1,
        available: input.len(),
    })
}

pub(crate) fn take_bytes<'a>(
    input: &'a [u8],
    count: usize,
    what: &'static str,
) -> Result<(&'a [u8], &'a [u8]), Error> {
    let result: nom::IResult<&[u8], &[u8]> = nom::bytes::complete::take(count).parse(input);
    result.map_err(|_| Error::Truncated {
        what,
        needed: count,
        available: input.len(),
    })
}

/// Guards against adversarial input: decoding fails fast instead of
/// exhausting the stack on deep nesting or allocating for an oversized
/// buffer.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_depth: usize,
    pub max_input: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 64,
            max_input: 64 << 20,
        }
    }
}

/// A parsed BER/DER buffer: the list of its top-level TLVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    tlvs: Vec<Tlv>,
}

impl Der {
    pub fn new(tlvs: Vec<Tlv>) -> Self {
        Der { tlvs }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.tlvs
    }

    pub fn into_elements(self) -> Vec<Tlv> {
        self.tlvs
    }

    /// Parses every top-level TLV in the buffer with the default
    /// [`Limits`].
    pub fn parse(input: &[u8]) -> Result<Self, Error> {
        Self::parse_with(input, Limits::default())
    }

    pub fn parse_with(input: &[u8], limits: Limits) -> Result<Self, Error> {
        if input.len() > limits.max_input {
            return Err(Error::InputTooLarge {
                len: input.len(),
                limit: limits.max_input,
            });
        }
        let mut tlvs = Vec::new();
        let mut rest = input;
        while !rest.is_empty() {
            let (r, tlv) = Tlv::parse_at(rest, 0, &limits)?;
            rest = r;
            tlvs.push(tlv);
        }
        Ok(Der { tlvs })
    }

    /// Canonical DER re-encoding of every top-level TLV.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.tlvs.iter().flat_map(|tlv| tlv.to_bytes()).collect()
    }
}

impl DecodableFrom<[u8]> for Der {}

impl Decoder<[u8], Der> for [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Error> {
        Der::parse(self)
    }
}

/// One tag-length-value triplet. Constructed TLVs own their children;
/// primitive TLVs own their content octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    identifier: Identifier,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Primitive(Vec<u8>),
    Constructed(Vec<Tlv>),
}

impl Tlv {
    pub fn new_primitive(identifier: Identifier, data: Vec<u8>) -> Self {
        Tlv {
            identifier,
            value: Value::Primitive(data),
        }
    }

    pub fn new_constructed(identifier: Identifier, children: Vec<Tlv>) -> Self {
        Tlv {
            identifier,
            value: Value::Constructed(children),
        }
    }

    pub fn identifier(&self) -> Identifier {
        self.identifier
    }

    /// Content octets of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Primitive(data) => Some(data),
            Value::Constructed(_) => None,
        }
    }

    /// Child TLVs of a constructed TLV.
    pub fn children(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Primitive(_) => None,
            Value::Constructed(children) => Some(children),
        }
    }

    /// Parses one TLV, returning the remaining input.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Tlv), Error> {
        Self::parse_at(input, 0, &Limits::default())
    }

    fn parse_at<'a>(input: &'a [u8], depth: usize, limits: &Limits) -> Result<(&'a [u8], Tlv), Error> {
        if depth >= limits.max_depth {
            return Err(Error::DepthLimitExceeded(limits.max_depth));
        }
        let (rest, identifier) = Identifier::parse(input)?;
        let (rest, length) = Length::parse(rest)?;

        match length {
            Length::Definite(n) => {
                let (rest, content) = take_bytes(rest, n, "content")?;
                if identifier.is_constructed() {
                    // Children must exactly tile the parent's content; a
                    // child running past the bound fails inside its own
                    // parse.
                    let mut children = Vec::new();
                    let mut inner = content;
                    while !inner.is_empty() {
                        let (r, child) = Tlv::parse_at(inner, depth + 1, limits)?;
                        inner = r;
                        children.push(child);
                    }
                    Ok((rest, Tlv::new_constructed(identifier, children)))
                } else {
                    Ok((rest, Tlv::new_primitive(identifier, content.to_vec())))
                }
            }
            Length::Indefinite => {
                if !identifier.is_constructed() {
                    return Err(Error::IndefiniteOnPrimitive);
                }
                let mut children = Vec::new();
                let mut inner = rest;
                loop {
                    if inner.starts_with(&END_OF_CONTENTS) {
                        inner = &inner[END_OF_CONTENTS.len()..];
                        break;
                    }
                    if inner.is_empty() {
                        return Err(Error::UnterminatedIndefinite);
                    }
                    let (r, child) = Tlv::parse_at(inner, depth + 1, limits)?;
                    inner = r;
                    children.push(child);
                }
                Ok((inner, Tlv::new_constructed(identifier, children)))
            }
        }
    }

    /// Canonical DER encoding: identifier, minimal definite length, then
    /// content. Children decoded from an indefinite-length encoding come
    /// out definite.
    pub fn to_bytes(&self) -> Vec<u8> {
        let content: Vec<u8> = match &self.value {
            Value::Primitive(data) => data.clone(),
            Value::Constructed(children) => {
                children.iter().flat_map(|child| child.to_bytes()).collect()
            }
        };
        let mut out = self.identifier.encode();
        out.extend(Length::Definite(content.len()).to_bytes());
        out.extend(content);
        out
    }
}
