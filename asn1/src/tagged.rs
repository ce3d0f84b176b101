//! Implicit and explicit tagging over the element model.

use ber::{Identifier, TagClass};

use crate::error::DecodeError;
use crate::{Element, UniversalTag};

/// How a tagged value relates to its inner element on the wire.
///
/// Explicit tagging nests the inner element's full TLV as the content of
/// the outer tag. Implicit tagging replaces the inner identifier with
/// the outer one and keeps only the inner content octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagMode {
    Implicit,
    Explicit,
}

/// A value carrying a non-universal tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedElement {
    class: TagClass,
    number: u64,
    mode: TagMode,
    inner: Box<Element>,
}

impl TaggedElement {
    /// Wraps an element implicitly. The inner element supplies the
    /// content octets; its own identifier is discarded on the wire.
    pub fn implicit(class: TagClass, number: u64, inner: Element) -> Result<Self, DecodeError> {
        if class == TagClass::Universal {
            return Err(DecodeError::TaggedUniversalClass);
        }
        if matches!(inner, Element::DerData(_)) {
            // Raw DER data has no separable content octets to retag.
            return Err(DecodeError::ImplicitOverDerData);
        }
        Ok(TaggedElement {
            class,
            number,
            mode: TagMode::Implicit,
            inner: Box::new(inner),
        })
    }

    /// Wraps an element explicitly: the inner TLV nests whole inside the
    /// outer, always-constructed tag.
    pub fn explicit(class: TagClass, number: u64, inner: Element) -> Result<Self, DecodeError> {
        if class == TagClass::Universal {
            return Err(DecodeError::TaggedUniversalClass);
        }
        Ok(TaggedElement {
            class,
            number,
            mode: TagMode::Explicit,
            inner: Box::new(inner),
        })
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn mode(&self) -> TagMode {
        self.mode
    }

    pub fn inner(&self) -> &Element {
        &self.inner
    }

    pub fn into_inner(self) -> Element {
        *self.inner
    }

    /// The outer identifier: explicit tags are always constructed,
    /// implicit tags inherit the inner element's constructed bit.
    pub fn identifier(&self) -> Identifier {
        let constructed = match self.mode {
            TagMode::Explicit => true,
            TagMode::Implicit => self.inner.identifier().is_constructed(),
        };
        Identifier::new(self.class, constructed, self.number)
    }

    pub(crate) fn content_bytes(&self) -> Vec<u8> {
        match self.mode {
            TagMode::Explicit => self.inner.to_der(),
            TagMode::Implicit => self.inner.content_bytes(),
        }
    }

    /// Re-decodes an implicitly tagged value's content as the named
    /// universal kind. The tag on the wire hides the original type, so
    /// the caller names it from schema knowledge.
    pub fn interpret_as(&self, tag: UniversalTag) -> Result<Element, DecodeError> {
        Element::from_universal_content(tag, &self.inner.content_bytes())
    }
}

#[cfg(test)]
mod tests {
    use ber::TagClass;
    use rstest::rstest;

    use super::{TagMode, TaggedElement};
    use crate::error::DecodeError;
    use crate::{Element, Integer, UniversalTag};

    #[test]
    fn test_explicit_wire_shape() {
        let tagged = TaggedElement::explicit(
            TagClass::ContextSpecific,
            0,
            Element::Integer(Integer::from(7)),
        )
        .unwrap();
        assert!(tagged.identifier().is_constructed());
        // [0] EXPLICIT wrapping INTEGER 7 nests the whole inner TLV.
        assert_eq!(
            vec![0xa0, 0x03, 0x02, 0x01, 0x07],
            Element::Tagged(tagged).to_der()
        );
    }

    #[test]
    fn test_implicit_wire_shape() {
        let tagged = TaggedElement::implicit(
            TagClass::ContextSpecific,
            2,
            Element::ia5_string("abc").unwrap(),
        )
        .unwrap();
        assert!(!tagged.identifier().is_constructed());
        // [2] IMPLICIT keeps only the content octets.
        assert_eq!(
            vec![0x82, 0x03, 0x61, 0x62, 0x63],
            Element::Tagged(tagged).to_der()
        );
    }

    #[test]
    fn test_implicit_constructed_inherits_bit() {
        let tagged = TaggedElement::implicit(
            TagClass::ContextSpecific,
            1,
            Element::Sequence(vec![Element::Boolean(true)]),
        )
        .unwrap();
        assert!(tagged.identifier().is_constructed());
        assert_eq!(
            vec![0xa1, 0x03, 0x01, 0x01, 0xff],
            Element::Tagged(tagged).to_der()
        );
    }

    #[rstest(mode, case(TagMode::Implicit), case(TagMode::Explicit))]
    fn test_universal_class_rejected(mode: TagMode) {
        let inner = Element::Null;
        let result = match mode {
            TagMode::Implicit => TaggedElement::implicit(TagClass::Universal, 0, inner),
            TagMode::Explicit => TaggedElement::explicit(TagClass::Universal, 0, inner),
        };
        assert_eq!(result, Err(DecodeError::TaggedUniversalClass));
    }

    #[test]
    fn test_implicit_over_der_data_rejected() {
        let der_data = Element::der_data(vec![0x05, 0x00]).unwrap();
        assert_eq!(
            TaggedElement::implicit(TagClass::ContextSpecific, 0, der_data),
            Err(DecodeError::ImplicitOverDerData)
        );
    }

    #[test]
    fn test_interpret_as() {
        // [0] IMPLICIT over what is really an IA5String.
        let bytes = [0x80, 0x03, 0x61, 0x62, 0x63];
        let element = crate::decode(&bytes).unwrap().into_element();
        let Element::Tagged(tagged) = element else {
            panic!("expected a tagged element");
        };
        assert_eq!(
            Element::ia5_string("abc").unwrap(),
            tagged.interpret_as(UniversalTag::Ia5String).unwrap()
        );
    }
}
