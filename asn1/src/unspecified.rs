//! Schema-free wrapper with checked downcasts.
//!
//! [`UnspecifiedType`] is what [`crate::decode`] hands back: the caller
//! knows from context what kind to expect and asks for it with an
//! `as_*` accessor, getting a [`TypeError`] naming both kinds when the
//! wire disagrees.

use std::fmt::Display;

use chrono::NaiveDateTime;

use crate::error::TypeError;
use crate::value::{BitString, Integer, ObjectIdentifier, OctetString, RelativeOid};
use crate::{DerData, Element, TaggedElement, UniversalTag, UnknownElement};
use ber::TagClass;

macro_rules! kind_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Result<&$ty, TypeError> {
            match &self.element {
                Element::$variant(value) => Ok(value),
                other => Err(TypeError::new(
                    UniversalTag::$variant.name(),
                    other.describe(),
                )),
            }
        }
    };
}

macro_rules! string_accessor {
    ($name:ident, $variant:ident) => {
        pub fn $name(&self) -> Result<&str, TypeError> {
            match &self.element {
                Element::$variant(value) => Ok(value.as_str()),
                other => Err(TypeError::new(
                    UniversalTag::$variant.name(),
                    other.describe(),
                )),
            }
        }
    };
}

/// A decoded value whose kind the schema, not the wire, determines.
#[derive(Debug, Clone, PartialEq)]
pub struct UnspecifiedType {
    element: Element,
}

impl UnspecifiedType {
    pub fn new(element: Element) -> Self {
        UnspecifiedType { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    pub fn type_class(&self) -> TagClass {
        self.element.identifier().class()
    }

    pub fn is_constructed(&self) -> bool {
        self.element.identifier().is_constructed()
    }

    pub fn tag(&self) -> u64 {
        self.element.identifier().number()
    }

    /// Whether this is a universal value with the given tag number.
    pub fn is_type(&self, tag: u64) -> bool {
        let identifier = self.element.identifier();
        identifier.class() == TagClass::Universal && identifier.number() == tag
    }

    pub fn is_tagged(&self) -> bool {
        matches!(self.element, Element::Tagged(_))
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.element.to_der()
    }

    /// The element, if it is a universal value with the given tag
    /// number.
    pub fn expect_type(&self, tag: u64) -> Result<&Element, TypeError> {
        if self.is_type(tag) {
            return Ok(&self.element);
        }
        let expected = match UniversalTag::from_number(tag) {
            Some(kind) => kind.name().to_string(),
            None => format!("UNIVERSAL TAG {}", tag),
        };
        Err(TypeError::new(expected, self.element.describe()))
    }

    /// The tagged value, optionally constrained to a tag number.
    pub fn expect_tagged(&self, tag: Option<u64>) -> Result<&TaggedElement, TypeError> {
        match &self.element {
            Element::Tagged(tagged) if tag.is_none_or(|n| tagged.number() == n) => Ok(tagged),
            other => {
                let expected = match tag {
                    Some(n) => format!("TAG {}", n),
                    None => "a tagged value".to_string(),
                };
                Err(TypeError::new(expected, other.describe()))
            }
        }
    }

    pub fn as_boolean(&self) -> Result<bool, TypeError> {
        match &self.element {
            Element::Boolean(value) => Ok(*value),
            other => Err(TypeError::new(
                UniversalTag::Boolean.name(),
                other.describe(),
            )),
        }
    }

    pub fn as_real(&self) -> Result<f64, TypeError> {
        match &self.element {
            Element::Real(value) => Ok(*value),
            other => Err(TypeError::new(UniversalTag::Real.name(), other.describe())),
        }
    }

    pub fn as_null(&self) -> Result<(), TypeError> {
        match &self.element {
            Element::Null => Ok(()),
            other => Err(TypeError::new(UniversalTag::Null.name(), other.describe())),
        }
    }

    kind_accessor!(as_integer, Integer, Integer);
    kind_accessor!(as_enumerated, Enumerated, Integer);
    kind_accessor!(as_bit_string, BitString, BitString);
    kind_accessor!(as_octet_string, OctetString, OctetString);
    kind_accessor!(as_object_identifier, ObjectIdentifier, ObjectIdentifier);
    kind_accessor!(as_relative_oid, RelativeOid, RelativeOid);
    kind_accessor!(as_utc_time, UtcTime, NaiveDateTime);
    kind_accessor!(as_generalized_time, GeneralizedTime, NaiveDateTime);

    string_accessor!(as_utf8_string, Utf8String);
    string_accessor!(as_numeric_string, NumericString);
    string_accessor!(as_printable_string, PrintableString);
    string_accessor!(as_t61_string, T61String);
    string_accessor!(as_videotex_string, VideotexString);
    string_accessor!(as_ia5_string, Ia5String);
    string_accessor!(as_graphic_string, GraphicString);
    string_accessor!(as_visible_string, VisibleString);
    string_accessor!(as_general_string, GeneralString);
    string_accessor!(as_universal_string, UniversalString);
    string_accessor!(as_character_string, CharacterString);
    string_accessor!(as_bmp_string, BmpString);
    string_accessor!(as_object_descriptor, ObjectDescriptor);

    pub fn as_sequence(&self) -> Result<&[Element], TypeError> {
        match &self.element {
            Element::Sequence(children) => Ok(children),
            other => Err(TypeError::new(
                UniversalTag::Sequence.name(),
                other.describe(),
            )),
        }
    }

    pub fn as_set(&self) -> Result<&[Element], TypeError> {
        match &self.element {
            Element::Set(children) => Ok(children),
            other => Err(TypeError::new(UniversalTag::Set.name(), other.describe())),
        }
    }

    /// Any of the restricted or unrestricted string kinds.
    pub fn as_string(&self) -> Result<&str, TypeError> {
        match &self.element {
            Element::Utf8String(value) => Ok(value.as_str()),
            Element::UniversalString(value) => Ok(value.as_str()),
            Element::NumericString(value) => Ok(value.as_str()),
            Element::PrintableString(value) => Ok(value.as_str()),
            Element::T61String(value) => Ok(value.as_str()),
            Element::VideotexString(value) => Ok(value.as_str()),
            Element::Ia5String(value) => Ok(value.as_str()),
            Element::GraphicString(value) => Ok(value.as_str()),
            Element::VisibleString(value) => Ok(value.as_str()),
            Element::GeneralString(value) => Ok(value.as_str()),
            Element::CharacterString(value) => Ok(value.as_str()),
            Element::BmpString(value) => Ok(value.as_str()),
            Element::ObjectDescriptor(value) => Ok(value.as_str()),
            other => Err(TypeError::new("a string type", other.describe())),
        }
    }

    /// Either UTCTime or GeneralizedTime.
    pub fn as_time(&self) -> Result<&NaiveDateTime, TypeError> {
        match &self.element {
            Element::UtcTime(value) | Element::GeneralizedTime(value) => Ok(value),
            other => Err(TypeError::new("a time type", other.describe())),
        }
    }

    pub fn as_tagged(&self) -> Result<&TaggedElement, TypeError> {
        self.expect_tagged(None)
    }

    pub fn as_unknown(&self) -> Result<&UnknownElement, TypeError> {
        match &self.element {
            Element::Unknown(unknown) => Ok(unknown),
            other => Err(TypeError::new("an unspecialized element", other.describe())),
        }
    }

    pub fn as_der_data(&self) -> Result<&DerData, TypeError> {
        match &self.element {
            Element::DerData(data) => Ok(data),
            other => Err(TypeError::new("raw DER data", other.describe())),
        }
    }
}

impl From<Element> for UnspecifiedType {
    fn from(element: Element) -> Self {
        UnspecifiedType { element }
    }
}

impl Display for UnspecifiedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.element.fmt(f)
    }
}
