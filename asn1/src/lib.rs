//! Typed ASN.1 element model over the BER/DER wire layer.
//!
//! The `ber` crate turns bytes into [`ber::Tlv`] trees; this crate maps
//! those trees onto [`Element`], the sum of the universal kinds plus
//! tagged, unknown and raw-DER nodes. Decoding accepts BER; encoding via
//! [`Element::to_der`] always emits canonical DER.
//!
//! The usual entry point is [`decode`], which yields an
//! [`UnspecifiedType`] for checked downcasting:
//!
//! ```ignore
//! let value = asn1::decode(&bytes)?;
//! let fields = value.as_sequence()?;
//! let serial = fields[0].clone();
//! ```

use std::convert::Infallible;
use std::fmt::Display;

use ber::{Der, Identifier, Length, TagClass};
use chrono::NaiveDateTime;
use tsugite::decoder::{DecodableFrom, Decoder};
use tsugite::encoder::{EncodableTo, Encoder};

pub mod error;
mod real;
mod strings;
pub mod tagged;
mod time;
pub mod unspecified;
pub mod value;

pub use ber::Limits;
pub use error::{DecodeError, TypeError};
pub use strings::{
    BmpString, CharacterString, GeneralString, GraphicString, Ia5String, NumericString,
    ObjectDescriptor, PrintableString, T61String, VideotexString, VisibleString,
};
pub use tagged::{TagMode, TaggedElement};
pub use unspecified::UnspecifiedType;
pub use value::{BitString, Integer, ObjectIdentifier, OctetString, RelativeOid};

/// The specialized universal tag numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniversalTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    ObjectDescriptor,
    Real,
    Enumerated,
    Utf8String,
    RelativeOid,
    Sequence,
    Set,
    NumericString,
    PrintableString,
    T61String,
    VideotexString,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    GraphicString,
    VisibleString,
    GeneralString,
    UniversalString,
    CharacterString,
    BmpString,
}

impl UniversalTag {
    pub fn number(&self) -> u64 {
        match self {
            UniversalTag::Boolean => 1,
            UniversalTag::Integer => 2,
            UniversalTag::BitString => 3,
            UniversalTag::OctetString => 4,
            UniversalTag::Null => 5,
            UniversalTag::ObjectIdentifier => 6,
            UniversalTag::ObjectDescriptor => 7,
            UniversalTag::Real => 9,
            UniversalTag::Enumerated => 10,
            UniversalTag::Utf8String => 12,
            UniversalTag::RelativeOid => 13,
            UniversalTag::Sequence => 16,
            UniversalTag::Set => 17,
            UniversalTag::NumericString => 18,
            UniversalTag::PrintableString => 19,
            UniversalTag::T61String => 20,
            UniversalTag::VideotexString => 21,
            UniversalTag::Ia5String => 22,
            UniversalTag::UtcTime => 23,
            UniversalTag::GeneralizedTime => 24,
            UniversalTag::GraphicString => 25,
            UniversalTag::VisibleString => 26,
            UniversalTag::GeneralString => 27,
            UniversalTag::UniversalString => 28,
            UniversalTag::CharacterString => 29,
            UniversalTag::BmpString => 30,
        }
    }

    /// Looks up a specialized kind by tag number. EXTERNAL (8),
    /// EMBEDDED PDV (11) and the reserved numbers come back `None` and
    /// decode as [`Element::Unknown`].
    pub fn from_number(number: u64) -> Option<Self> {
        let tag = match number {
            1 => UniversalTag::Boolean,
            2 => UniversalTag::Integer,
            3 => UniversalTag::BitString,
            4 => UniversalTag::OctetString,
            5 => UniversalTag::Null,
            6 => UniversalTag::ObjectIdentifier,
            7 => UniversalTag::ObjectDescriptor,
            9 => UniversalTag::Real,
            10 => UniversalTag::Enumerated,
            12 => UniversalTag::Utf8String,
            13 => UniversalTag::RelativeOid,
            16 => UniversalTag::Sequence,
            17 => UniversalTag::Set,
            18 => UniversalTag::NumericString,
            19 => UniversalTag::PrintableString,
            20 => UniversalTag::T61String,
            21 => UniversalTag::VideotexString,
            22 => UniversalTag::Ia5String,
            23 => UniversalTag::UtcTime,
            24 => UniversalTag::GeneralizedTime,
            25 => UniversalTag::GraphicString,
            26 => UniversalTag::VisibleString,
            27 => UniversalTag::GeneralString,
            28 => UniversalTag::UniversalString,
            29 => UniversalTag::CharacterString,
            30 => UniversalTag::BmpString,
            _ => return None,
        };
        Some(tag)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UniversalTag::Boolean => "BOOLEAN",
            UniversalTag::Integer => "INTEGER",
            UniversalTag::BitString => "BIT STRING",
            UniversalTag::OctetString => "OCTET STRING",
            UniversalTag::Null => "NULL",
            UniversalTag::ObjectIdentifier => "OBJECT IDENTIFIER",
            UniversalTag::ObjectDescriptor => "ObjectDescriptor",
            UniversalTag::Real => "REAL",
            UniversalTag::Enumerated => "ENUMERATED",
            UniversalTag::Utf8String => "UTF8String",
            UniversalTag::RelativeOid => "RELATIVE-OID",
            UniversalTag::Sequence => "SEQUENCE",
            UniversalTag::Set => "SET",
            UniversalTag::NumericString => "NumericString",
            UniversalTag::PrintableString => "PrintableString",
            UniversalTag::T61String => "T61String",
            UniversalTag::VideotexString => "VideotexString",
            UniversalTag::Ia5String => "IA5String",
            UniversalTag::UtcTime => "UTCTime",
            UniversalTag::GeneralizedTime => "GeneralizedTime",
            UniversalTag::GraphicString => "GraphicString",
            UniversalTag::VisibleString => "VisibleString",
            UniversalTag::GeneralString => "GeneralString",
            UniversalTag::UniversalString => "UniversalString",
            UniversalTag::CharacterString => "CHARACTER STRING",
            UniversalTag::BmpString => "BMPString",
        }
    }
}

/// A universal tag the model does not specialize, kept with its raw
/// content octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownElement {
    identifier: Identifier,
    content: Vec<u8>,
}

impl UnknownElement {
    pub fn new(identifier: Identifier, content: Vec<u8>) -> Self {
        UnknownElement {
            identifier,
            content,
        }
    }

    pub fn identifier(&self) -> Identifier {
        self.identifier
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Pre-encoded DER spliced verbatim into the output.
///
/// Validated to hold exactly one well-formed TLV at construction; see
/// [`Element::der_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerData {
    identifier: Identifier,
    bytes: Vec<u8>,
}

impl DerData {
    pub fn identifier(&self) -> Identifier {
        self.identifier
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn content_bytes(&self) -> Vec<u8> {
        // The header re-parses; it was validated at construction.
        if let Ok((rest, _)) = Identifier::parse(&self.bytes) {
            if let Ok((content, _)) = Length::parse(rest) {
                return content.to_vec();
            }
        }
        Vec::new()
    }
}

/// One decoded ASN.1 value: a universal kind, a tagged value, an
/// unspecialized tag, or raw DER to splice on encode.
///
/// The restricted string kinds carry validated newtypes, so an element
/// holding characters outside its repertoire cannot be built at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    ObjectDescriptor(ObjectDescriptor),
    Real(f64),
    Enumerated(Integer),
    Utf8String(String),
    RelativeOid(RelativeOid),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    NumericString(NumericString),
    PrintableString(PrintableString),
    T61String(T61String),
    VideotexString(VideotexString),
    Ia5String(Ia5String),
    UtcTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    GraphicString(GraphicString),
    VisibleString(VisibleString),
    GeneralString(GeneralString),
    UniversalString(String),
    CharacterString(CharacterString),
    BmpString(BmpString),
    Tagged(TaggedElement),
    Unknown(UnknownElement),
    DerData(DerData),
}

impl Element {
    pub fn numeric_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::NumericString(NumericString::new(s)?))
    }

    pub fn printable_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::PrintableString(PrintableString::new(s)?))
    }

    pub fn ia5_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::Ia5String(Ia5String::new(s)?))
    }

    pub fn visible_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::VisibleString(VisibleString::new(s)?))
    }

    pub fn t61_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::T61String(T61String::new(s)?))
    }

    pub fn videotex_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::VideotexString(VideotexString::new(s)?))
    }

    pub fn graphic_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::GraphicString(GraphicString::new(s)?))
    }

    pub fn general_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::GeneralString(GeneralString::new(s)?))
    }

    pub fn character_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::CharacterString(CharacterString::new(s)?))
    }

    pub fn object_descriptor(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::ObjectDescriptor(ObjectDescriptor::new(s)?))
    }

    pub fn bmp_string(s: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Element::BmpString(BmpString::new(s)?))
    }

    /// Wraps pre-encoded DER for verbatim splicing into the output.
    /// The bytes must hold exactly one well-formed TLV.
    pub fn der_data(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        let der = Der::parse(&bytes)?;
        match der.elements() {
            [tlv] => Ok(Element::DerData(DerData {
                identifier: tlv.identifier(),
                bytes,
            })),
            tlvs => Err(DecodeError::DerDataElementCount(tlvs.len())),
        }
    }

    /// The identifier this element encodes under.
    pub fn identifier(&self) -> Identifier {
        match self {
            Element::Tagged(tagged) => tagged.identifier(),
            Element::Unknown(unknown) => unknown.identifier(),
            Element::DerData(data) => data.identifier(),
            Element::Sequence(_) => Identifier::universal(true, UniversalTag::Sequence.number()),
            Element::Set(_) => Identifier::universal(true, UniversalTag::Set.number()),
            Element::Boolean(_) => Identifier::universal(false, UniversalTag::Boolean.number()),
            Element::Integer(_) => Identifier::universal(false, UniversalTag::Integer.number()),
            Element::BitString(_) => Identifier::universal(false, UniversalTag::BitString.number()),
            Element::OctetString(_) => {
                Identifier::universal(false, UniversalTag::OctetString.number())
            }
            Element::Null => Identifier::universal(false, UniversalTag::Null.number()),
            Element::ObjectIdentifier(_) => {
                Identifier::universal(false, UniversalTag::ObjectIdentifier.number())
            }
            Element::ObjectDescriptor(_) => {
                Identifier::universal(false, UniversalTag::ObjectDescriptor.number())
            }
            Element::Real(_) => Identifier::universal(false, UniversalTag::Real.number()),
            Element::Enumerated(_) => {
                Identifier::universal(false, UniversalTag::Enumerated.number())
            }
            Element::Utf8String(_) => {
                Identifier::universal(false, UniversalTag::Utf8String.number())
            }
            Element::RelativeOid(_) => {
                Identifier::universal(false, UniversalTag::RelativeOid.number())
            }
            Element::NumericString(_) => {
                Identifier::universal(false, UniversalTag::NumericString.number())
            }
            Element::PrintableString(_) => {
                Identifier::universal(false, UniversalTag::PrintableString.number())
            }
            Element::T61String(_) => Identifier::universal(false, UniversalTag::T61String.number()),
            Element::VideotexString(_) => {
                Identifier::universal(false, UniversalTag::VideotexString.number())
            }
            Element::Ia5String(_) => Identifier::universal(false, UniversalTag::Ia5String.number()),
            Element::UtcTime(_) => Identifier::universal(false, UniversalTag::UtcTime.number()),
            Element::GeneralizedTime(_) => {
                Identifier::universal(false, UniversalTag::GeneralizedTime.number())
            }
            Element::GraphicString(_) => {
                Identifier::universal(false, UniversalTag::GraphicString.number())
            }
            Element::VisibleString(_) => {
                Identifier::universal(false, UniversalTag::VisibleString.number())
            }
            Element::GeneralString(_) => {
                Identifier::universal(false, UniversalTag::GeneralString.number())
            }
            Element::UniversalString(_) => {
                Identifier::universal(false, UniversalTag::UniversalString.number())
            }
            Element::CharacterString(_) => {
                Identifier::universal(false, UniversalTag::CharacterString.number())
            }
            Element::BmpString(_) => Identifier::universal(false, UniversalTag::BmpString.number()),
        }
    }

    /// The specialized universal kind, if this element has one.
    pub fn universal_tag(&self) -> Option<UniversalTag> {
        let identifier = self.identifier();
        match identifier.class() {
            TagClass::Universal => UniversalTag::from_number(identifier.number()),
            _ => None,
        }
    }

    /// Human-readable kind descriptor: the universal tag name, or
    /// `<CLASS> TAG <n>` for non-universal tags.
    pub(crate) fn describe(&self) -> String {
        let identifier = self.identifier();
        match identifier.class() {
            TagClass::Universal => match UniversalTag::from_number(identifier.number()) {
                Some(tag) => tag.name().to_string(),
                None => format!("UNIVERSAL TAG {}", identifier.number()),
            },
            class => format!("{} TAG {}", class, identifier.number()),
        }
    }

    /// Content octets under canonical DER rules.
    pub(crate) fn content_bytes(&self) -> Vec<u8> {
        match self {
            Element::Boolean(value) => vec![if *value { 0xff } else { 0x00 }],
            Element::Integer(value) | Element::Enumerated(value) => value.to_content(),
            Element::BitString(value) => value.to_content(),
            Element::OctetString(value) => value.as_bytes().to_vec(),
            Element::Null => Vec::new(),
            Element::ObjectIdentifier(value) => value.to_content(),
            Element::Real(value) => real::encode(*value),
            Element::RelativeOid(value) => value.to_content(),
            Element::Sequence(children) => {
                children.iter().flat_map(|child| child.to_der()).collect()
            }
            Element::Set(children) => {
                // DER orders SET members by their encoded octets.
                let mut encoded: Vec<Vec<u8>> =
                    children.iter().map(|child| child.to_der()).collect();
                encoded.sort();
                encoded.concat()
            }
            Element::Utf8String(value) => value.as_bytes().to_vec(),
            Element::NumericString(value) => value.as_str().as_bytes().to_vec(),
            Element::PrintableString(value) => value.as_str().as_bytes().to_vec(),
            Element::Ia5String(value) => value.as_str().as_bytes().to_vec(),
            Element::VisibleString(value) => value.as_str().as_bytes().to_vec(),
            Element::ObjectDescriptor(value) => strings::encode_latin1(value.as_str()),
            Element::T61String(value) => strings::encode_latin1(value.as_str()),
            Element::VideotexString(value) => strings::encode_latin1(value.as_str()),
            Element::GraphicString(value) => strings::encode_latin1(value.as_str()),
            Element::GeneralString(value) => strings::encode_latin1(value.as_str()),
            Element::CharacterString(value) => strings::encode_latin1(value.as_str()),
            Element::UniversalString(value) => strings::encode_universal(value),
            Element::BmpString(value) => strings::encode_bmp(value.as_str()),
            Element::UtcTime(value) => time::format_utc_time(value).into_bytes(),
            Element::GeneralizedTime(value) => time::format_generalized_time(value).into_bytes(),
            Element::Tagged(tagged) => tagged.content_bytes(),
            Element::Unknown(unknown) => unknown.content().to_vec(),
            Element::DerData(data) => data.content_bytes(),
        }
    }

    /// Canonical DER encoding of the whole element.
    pub fn to_der(&self) -> Vec<u8> {
        if let Element::DerData(data) = self {
            return data.bytes().to_vec();
        }
        let content = self.content_bytes();
        let mut out = self.identifier().encode();
        out.extend(Length::Definite(content.len()).to_bytes());
        out.extend(content);
        out
    }

    /// Decodes primitive content octets as the named universal kind.
    pub(crate) fn decode_primitive(tag: UniversalTag, data: &[u8]) -> Result<Element, DecodeError> {
        match tag {
            UniversalTag::Boolean => match data {
                // Any non-zero octet is true under BER.
                [octet] => Ok(Element::Boolean(*octet != 0)),
                _ => Err(DecodeError::BooleanLength(data.len())),
            },
            UniversalTag::Integer => Ok(Element::Integer(Integer::from_content(data)?)),
            UniversalTag::Enumerated => Ok(Element::Enumerated(Integer::from_content(data)?)),
            UniversalTag::BitString => Ok(Element::BitString(BitString::from_content(data)?)),
            UniversalTag::OctetString => Ok(Element::OctetString(OctetString::from(data))),
            UniversalTag::Null => {
                if data.is_empty() {
                    Ok(Element::Null)
                } else {
                    Err(DecodeError::NullWithContent(data.len()))
                }
            }
            UniversalTag::ObjectIdentifier => Ok(Element::ObjectIdentifier(
                ObjectIdentifier::from_content(data)?,
            )),
            UniversalTag::ObjectDescriptor => Element::object_descriptor(strings::decode_latin1(data)),
            UniversalTag::Real => Ok(Element::Real(real::decode(data)?)),
            UniversalTag::Utf8String => Ok(Element::Utf8String(strings::decode_utf8(data)?)),
            UniversalTag::RelativeOid => Ok(Element::RelativeOid(RelativeOid::from_content(data)?)),
            UniversalTag::NumericString => Element::numeric_string(strings::decode_latin1(data)),
            UniversalTag::PrintableString => {
                Element::printable_string(strings::decode_latin1(data))
            }
            UniversalTag::T61String => Element::t61_string(strings::decode_latin1(data)),
            UniversalTag::VideotexString => Element::videotex_string(strings::decode_latin1(data)),
            UniversalTag::Ia5String => Element::ia5_string(strings::decode_latin1(data)),
            UniversalTag::UtcTime => Ok(Element::UtcTime(time::parse_utc_time(data)?)),
            UniversalTag::GeneralizedTime => {
                Ok(Element::GeneralizedTime(time::parse_generalized_time(data)?))
            }
            UniversalTag::GraphicString => Element::graphic_string(strings::decode_latin1(data)),
            UniversalTag::VisibleString => Element::visible_string(strings::decode_latin1(data)),
            UniversalTag::GeneralString => Element::general_string(strings::decode_latin1(data)),
            UniversalTag::UniversalString => {
                Ok(Element::UniversalString(strings::decode_universal(data)?))
            }
            UniversalTag::CharacterString => Element::character_string(strings::decode_latin1(data)),
            UniversalTag::BmpString => Element::bmp_string(strings::decode_bmp(data)?),
            UniversalTag::Sequence | UniversalTag::Set => {
                Err(DecodeError::ConstructedExpected(tag.name()))
            }
        }
    }

    /// Decodes content octets as the named universal kind, including the
    /// constructed kinds. Used by [`TaggedElement::interpret_as`].
    pub(crate) fn from_universal_content(
        tag: UniversalTag,
        content: &[u8],
    ) -> Result<Element, DecodeError> {
        match tag {
            UniversalTag::Sequence | UniversalTag::Set => {
                let children = Der::parse(content)?
                    .elements()
                    .iter()
                    .map(Element::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match tag {
                    UniversalTag::Set => Element::Set(children),
                    _ => Element::Sequence(children),
                })
            }
            primitive => Element::decode_primitive(primitive, content),
        }
    }
}

// Content octets of a universal TLV the model does not specialize.
fn raw_content(tlv: &ber::Tlv) -> Vec<u8> {
    match tlv.data() {
        Some(data) => data.to_vec(),
        None => tlv
            .children()
            .unwrap_or(&[])
            .iter()
            .flat_map(|child| child.to_bytes())
            .collect(),
    }
}

impl TryFrom<&ber::Tlv> for Element {
    type Error = DecodeError;

    fn try_from(tlv: &ber::Tlv) -> Result<Self, Self::Error> {
        let identifier = tlv.identifier();
        match identifier.class() {
            TagClass::Universal => match UniversalTag::from_number(identifier.number()) {
                Some(UniversalTag::Sequence) => {
                    let children = tlv
                        .children()
                        .ok_or(DecodeError::ConstructedExpected("SEQUENCE"))?;
                    let elements = children
                        .iter()
                        .map(Element::try_from)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Element::Sequence(elements))
                }
                Some(UniversalTag::Set) => {
                    let children = tlv
                        .children()
                        .ok_or(DecodeError::ConstructedExpected("SET"))?;
                    let elements = children
                        .iter()
                        .map(Element::try_from)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Element::Set(elements))
                }
                Some(primitive) => {
                    let data = tlv
                        .data()
                        .ok_or(DecodeError::PrimitiveExpected(primitive.name()))?;
                    Element::decode_primitive(primitive, data)
                }
                None => Ok(Element::Unknown(UnknownElement::new(
                    identifier,
                    raw_content(tlv),
                ))),
            },
            class => {
                // Without a schema the wire cannot say whether a
                // non-universal tag is implicit or explicit. A
                // constructed tag holding exactly one child reads as
                // explicit; anything else reads as implicit.
                match tlv.children() {
                    Some([child]) => {
                        let inner = Element::try_from(child)?;
                        Ok(Element::Tagged(TaggedElement::explicit(
                            class,
                            identifier.number(),
                            inner,
                        )?))
                    }
                    Some(children) => {
                        let elements = children
                            .iter()
                            .map(Element::try_from)
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Element::Tagged(TaggedElement::implicit(
                            class,
                            identifier.number(),
                            Element::Sequence(elements),
                        )?))
                    }
                    None => {
                        // Primitive content stays opaque until the caller
                        // names the real kind via interpret_as.
                        let data = tlv.data().unwrap_or_default().to_vec();
                        let inner = Element::Unknown(UnknownElement::new(
                            Identifier::new(class, false, identifier.number()),
                            data,
                        ));
                        Ok(Element::Tagged(TaggedElement::implicit(
                            class,
                            identifier.number(),
                            inner,
                        )?))
                    }
                }
            }
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(value) => write!(f, "BOOLEAN {}", value),
            Element::Integer(value) => write!(f, "INTEGER {}", value),
            Element::BitString(value) => write!(f, "BIT STRING {}", value),
            Element::OctetString(value) => write!(f, "OCTET STRING {}", value),
            Element::Null => write!(f, "NULL"),
            Element::ObjectIdentifier(value) => write!(f, "OBJECT IDENTIFIER {}", value),
            Element::Real(value) => write!(f, "REAL {}", value),
            Element::Enumerated(value) => write!(f, "ENUMERATED {}", value),
            Element::RelativeOid(value) => write!(f, "RELATIVE-OID {}", value),
            Element::Sequence(children) => write!(f, "SEQUENCE ({} elements)", children.len()),
            Element::Set(children) => write!(f, "SET ({} elements)", children.len()),
            Element::UtcTime(value) => write!(f, "UTCTime {}", time::format_utc_time(value)),
            Element::GeneralizedTime(value) => {
                write!(f, "GeneralizedTime {}", time::format_generalized_time(value))
            }
            Element::ObjectDescriptor(value) => write!(f, "{} {}", self.describe(), value),
            Element::Utf8String(value) => write!(f, "{} {}", self.describe(), value),
            Element::NumericString(value) => write!(f, "{} {}", self.describe(), value),
            Element::PrintableString(value) => write!(f, "{} {}", self.describe(), value),
            Element::T61String(value) => write!(f, "{} {}", self.describe(), value),
            Element::VideotexString(value) => write!(f, "{} {}", self.describe(), value),
            Element::Ia5String(value) => write!(f, "{} {}", self.describe(), value),
            Element::GraphicString(value) => write!(f, "{} {}", self.describe(), value),
            Element::VisibleString(value) => write!(f, "{} {}", self.describe(), value),
            Element::GeneralString(value) => write!(f, "{} {}", self.describe(), value),
            Element::UniversalString(value) => write!(f, "{} {}", self.describe(), value),
            Element::CharacterString(value) => write!(f, "{} {}", self.describe(), value),
            Element::BmpString(value) => write!(f, "{} {}", self.describe(), value),
            Element::Tagged(tagged) => {
                let mode = match tagged.mode() {
                    TagMode::Implicit => "IMPLICIT",
                    TagMode::Explicit => "EXPLICIT",
                };
                write!(
                    f,
                    "[{} {}] {} {}",
                    tagged.class(),
                    tagged.number(),
                    mode,
                    tagged.inner()
                )
            }
            Element::Unknown(unknown) => {
                write!(
                    f,
                    "UNKNOWN {} ({} bytes)",
                    unknown.identifier(),
                    unknown.content().len()
                )
            }
            Element::DerData(data) => write!(f, "DER DATA ({} bytes)", data.bytes().len()),
        }
    }
}

impl EncodableTo<Element> for Vec<u8> {}

impl Encoder<Element, Vec<u8>> for Element {
    type Error = Infallible;

    fn encode(&self) -> Result<Vec<u8>, Infallible> {
        Ok(self.to_der())
    }
}

/// Decodes a buffer holding exactly one element.
pub fn decode(input: &[u8]) -> Result<UnspecifiedType, DecodeError> {
    decode_with_limits(input, Limits::default())
}

pub fn decode_with_limits(input: &[u8], limits: Limits) -> Result<UnspecifiedType, DecodeError> {
    let der = Der::parse_with(input, limits)?;
    match der.elements() {
        [] => Err(DecodeError::Empty),
        [tlv] => Ok(UnspecifiedType::new(Element::try_from(tlv)?)),
        tlvs => Err(DecodeError::TrailingElements(tlvs.len() - 1)),
    }
}

/// An ordered run of top-level values decoded from one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ASN1Object {
    elements: Vec<UnspecifiedType>,
}

impl ASN1Object {
    pub fn new(elements: Vec<UnspecifiedType>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[UnspecifiedType] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<UnspecifiedType> {
        self.elements
    }

    pub fn parse(input: &[u8]) -> Result<Self, DecodeError> {
        Der::parse(input)?.decode()
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.elements
            .iter()
            .flat_map(|element| element.to_der())
            .collect()
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = DecodeError;

    fn decode(&self) -> Result<ASN1Object, DecodeError> {
        let elements = self
            .elements()
            .iter()
            .map(|tlv| Element::try_from(tlv).map(UnspecifiedType::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object::new(elements))
    }
}

impl EncodableTo<ASN1Object> for Vec<u8> {}

impl Encoder<ASN1Object, Vec<u8>> for ASN1Object {
    type Error = Infallible;

    fn encode(&self) -> Result<Vec<u8>, Infallible> {
        Ok(self.to_der())
    }
}

#[cfg(test)]
mod tests {
    use ber::TagClass;
    use rstest::rstest;
    use tsugite::encoder::Encoder;

    use super::*;
    use crate::value::{Integer, ObjectIdentifier};

    #[rstest(input, expected,
        case(vec![0x01, 0x01, 0xff], Element::Boolean(true)),
        case(vec![0x01, 0x01, 0x01], Element::Boolean(true)),
        case(vec![0x01, 0x01, 0x00], Element::Boolean(false)),
        case(vec![0x02, 0x01, 0x07], Element::Integer(Integer::from(7))),
        case(vec![0x02, 0x02, 0xfe, 0x00], Element::Integer(Integer::from(-512))),
        case(vec![0x05, 0x00], Element::Null),
        case(
            vec![0x06, 0x03, 0x55, 0x04, 0x03],
            Element::ObjectIdentifier(ObjectIdentifier::new(vec![2, 5, 4, 3]).unwrap()),
        ),
        case(
            vec![0x0c, 0x02, 0xc3, 0xa9],
            Element::Utf8String("é".to_string()),
        ),
        case(
            vec![0x13, 0x04, 0x74, 0x65, 0x73, 0x74],
            Element::printable_string("test").unwrap(),
        ),
        case(vec![0x0a, 0x01, 0x02], Element::Enumerated(Integer::from(2))),
        case(vec![0x09, 0x00], Element::Real(0.0)),
    )]
    fn test_decode_primitive_kinds(input: Vec<u8>, expected: Element) {
        let value = decode(&input).unwrap();
        assert_eq!(&expected, value.element());
    }

    #[test]
    fn test_decode_sequence() {
        let input = [
            0x30, 0x0a, 0x02, 0x01, 0x07, 0x16, 0x03, 0x61, 0x62, 0x63, 0x05, 0x00,
        ];
        let value = decode(&input).unwrap();
        let Element::Sequence(children) = value.element() else {
            panic!("expected a sequence");
        };
        assert_eq!(3, children.len());
        assert_eq!(Element::Integer(Integer::from(7)), children[0]);
        assert_eq!(Element::ia5_string("abc").unwrap(), children[1]);
        assert_eq!(Element::Null, children[2]);
        assert_eq!(input.to_vec(), value.to_der());
    }

    #[test]
    fn test_decode_indefinite_reencodes_definite() {
        let input = [0x30, 0x80, 0x02, 0x01, 0x07, 0x00, 0x00];
        let value = decode(&input).unwrap();
        assert_eq!(vec![0x30, 0x03, 0x02, 0x01, 0x07], value.to_der());
    }

    #[test]
    fn test_set_encoding_sorts_members() {
        let set = Element::Set(vec![
            Element::Integer(Integer::from(0x200)),
            Element::Boolean(true),
            Element::Null,
        ]);
        // Sorted by encoded octets: BOOLEAN (0x01) < INTEGER (0x02) <
        // NULL (0x05).
        assert_eq!(
            vec![0x31, 0x09, 0x01, 0x01, 0xff, 0x02, 0x02, 0x02, 0x00, 0x05, 0x00],
            set.to_der()
        );
        // Encoded bytes are independent of insertion order.
        let reordered = Element::Set(vec![
            Element::Null,
            Element::Integer(Integer::from(0x200)),
            Element::Boolean(true),
        ]);
        assert_eq!(set.to_der(), reordered.to_der());
    }

    #[test]
    fn test_decode_unspecialized_universal_tag() {
        // EXTERNAL (tag 8) is not specialized.
        let input = [0x28, 0x03, 0x02, 0x01, 0x07];
        let value = decode(&input).unwrap();
        let Element::Unknown(unknown) = value.element() else {
            panic!("expected an unknown element");
        };
        assert_eq!(8, unknown.identifier().number());
        assert_eq!(&[0x02, 0x01, 0x07], unknown.content());
        assert_eq!(input.to_vec(), value.to_der());
    }

    #[test]
    fn test_decode_explicit_tag() {
        // [0] constructed with one child reads as explicit.
        let input = [0xa0, 0x03, 0x02, 0x01, 0x07];
        let value = decode(&input).unwrap();
        let Element::Tagged(tagged) = value.element() else {
            panic!("expected a tagged element");
        };
        assert_eq!(TagMode::Explicit, tagged.mode());
        assert_eq!(TagClass::ContextSpecific, tagged.class());
        assert_eq!(&Element::Integer(Integer::from(7)), tagged.inner());
        assert_eq!(input.to_vec(), value.to_der());
    }

    #[test]
    fn test_decode_implicit_constructed_tag() {
        // [1] constructed with two children reads as implicit.
        let input = [0xa1, 0x06, 0x02, 0x01, 0x07, 0x02, 0x01, 0x08];
        let value = decode(&input).unwrap();
        let Element::Tagged(tagged) = value.element() else {
            panic!("expected a tagged element");
        };
        assert_eq!(TagMode::Implicit, tagged.mode());
        let Element::Sequence(children) = tagged.inner() else {
            panic!("expected a sequence inner");
        };
        assert_eq!(2, children.len());
        assert_eq!(input.to_vec(), value.to_der());
    }

    #[test]
    fn test_decode_implicit_primitive_tag() {
        let input = [0x82, 0x03, 0x61, 0x62, 0x63];
        let value = decode(&input).unwrap();
        let Element::Tagged(tagged) = value.element() else {
            panic!("expected a tagged element");
        };
        assert_eq!(TagMode::Implicit, tagged.mode());
        assert!(matches!(tagged.inner(), Element::Unknown(_)));
        assert_eq!(
            Element::ia5_string("abc").unwrap(),
            tagged.interpret_as(UniversalTag::Ia5String).unwrap()
        );
        assert_eq!(input.to_vec(), value.to_der());
    }

    #[rstest(input, expected,
        case(vec![], DecodeError::Empty),
        case(vec![0x05, 0x00, 0x05, 0x00], DecodeError::TrailingElements(1)),
        case(vec![0x05, 0x01, 0xaa], DecodeError::NullWithContent(1)),
        case(vec![0x01, 0x02, 0xff, 0xff], DecodeError::BooleanLength(2)),
        case(vec![0x02, 0x00], DecodeError::IntegerNoData),
    )]
    fn test_decode_invalid(input: Vec<u8>, expected: DecodeError) {
        assert_eq!(decode(&input).map(|_| ()), Err(expected));
    }

    #[test]
    fn test_decode_truncated_is_ber_error() {
        assert!(matches!(
            decode(&[0x30, 0x05, 0x02, 0x01]),
            Err(DecodeError::Ber(ber::Error::Truncated { .. }))
        ));
    }

    #[test]
    fn test_decode_with_limits_depth() {
        let mut input = Vec::new();
        for _ in 0..5 {
            input.extend([0x30, 0x80]);
        }
        let limits = Limits {
            max_depth: 3,
            max_input: 1 << 20,
        };
        assert_eq!(
            decode_with_limits(&input, limits).map(|_| ()),
            Err(DecodeError::Ber(ber::Error::DepthLimitExceeded(3)))
        );
    }

    #[test]
    fn test_der_data_splices_verbatim() {
        let raw = vec![0x02, 0x01, 0x2a];
        let sequence = Element::Sequence(vec![
            Element::der_data(raw.clone()).unwrap(),
            Element::Null,
        ]);
        assert_eq!(
            vec![0x30, 0x05, 0x02, 0x01, 0x2a, 0x05, 0x00],
            sequence.to_der()
        );
    }

    #[test]
    fn test_der_data_rejects_multiple_elements() {
        assert_eq!(
            Element::der_data(vec![0x05, 0x00, 0x05, 0x00]).map(|_| ()),
            Err(DecodeError::DerDataElementCount(2))
        );
    }

    #[test]
    fn test_boolean_encodes_canonical_true() {
        // BER true 0x01 re-encodes as DER 0xff.
        let value = decode(&[0x01, 0x01, 0x01]).unwrap();
        assert_eq!(vec![0x01, 0x01, 0xff], value.to_der());
    }

    #[test]
    fn test_high_tag_number_roundtrip() {
        // Private class, tag 999, primitive, empty content.
        let input = [0xdf, 0x87, 0x67, 0x00];
        let value = decode(&input).unwrap();
        let Element::Tagged(tagged) = value.element() else {
            panic!("expected a tagged element");
        };
        assert_eq!(999, tagged.number());
        assert_eq!(input.to_vec(), value.to_der());
    }

    #[test]
    fn test_asn1_object_roundtrip() {
        let input: &[u8] = &[0x02, 0x01, 0x07, 0x05, 0x00, 0x01, 0x01, 0xff];
        let object = ASN1Object::parse(input).unwrap();
        assert_eq!(3, object.elements().len());
        assert_eq!(input.to_vec(), object.encode().unwrap());
    }

    #[test]
    fn test_element_display() {
        assert_eq!(
            "INTEGER 42",
            Element::Integer(Integer::from(42)).to_string()
        );
        assert_eq!(
            "SEQUENCE (2 elements)",
            Element::Sequence(vec![Element::Null, Element::Null]).to_string()
        );
        assert_eq!(
            "IA5String abc",
            Element::ia5_string("abc").unwrap().to_string()
        );
    }

    #[test]
    fn test_string_kinds_reject_bad_repertoire_at_construction() {
        // The variant payloads are validated newtypes, so out-of-band
        // characters cannot reach the encoder.
        assert!(Element::printable_string("user@example.com").is_err());
        assert!(Element::numeric_string("12a").is_err());
        assert!(Element::t61_string("日本語").is_err());
        assert!(Element::bmp_string("😀").is_err());
        let ok = Element::bmp_string("あい").unwrap();
        assert_eq!(vec![0x1e, 0x04, 0x30, 0x42, 0x30, 0x44], ok.to_der());
    }

    #[test]
    fn test_element_encoder_trait() {
        let element = Element::Boolean(false);
        assert_eq!(vec![0x01, 0x01, 0x00], element.encode().unwrap());
    }
}
