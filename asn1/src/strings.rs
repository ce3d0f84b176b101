//! Character validation and wire codecs for the restricted string kinds.
//!
//! The ASCII-subset kinds (NumericString, PrintableString, IA5String,
//! VisibleString) and the Latin-1 kinds (T61String, VideotexString,
//! GraphicString, GeneralString, ObjectDescriptor, CHARACTER STRING)
//! decode byte-per-character. BMPString is UTF-16BE without surrogate
//! pairs; UniversalString is UTF-32BE.

use crate::error::DecodeError;

macro_rules! restricted_string {
    ($(#[$meta:meta])* $name:ident, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validates the character repertoire and wraps the string.
            pub fn new(s: impl Into<String>) -> Result<Self, DecodeError> {
                let s = s.into();
                $check(&s)?;
                Ok($name(s))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

restricted_string!(
    /// Digits and space only.
    NumericString,
    check_numeric
);
restricted_string!(
    /// The PrintableString repertoire: alphanumerics and ` '()+,-./:=?`.
    PrintableString,
    check_printable
);
restricted_string!(
    /// Any 7-bit character, control characters included.
    Ia5String,
    check_ia5
);
restricted_string!(
    /// Printing ASCII, 0x20-0x7E.
    VisibleString,
    check_visible
);
restricted_string!(T61String, |s| check_latin1("T61String", s));
restricted_string!(VideotexString, |s| check_latin1("VideotexString", s));
restricted_string!(GraphicString, |s| check_latin1("GraphicString", s));
restricted_string!(GeneralString, |s| check_latin1("GeneralString", s));
restricted_string!(CharacterString, |s| check_latin1("CHARACTER STRING", s));
restricted_string!(ObjectDescriptor, |s| check_latin1("ObjectDescriptor", s));
restricted_string!(
    /// Basic Multilingual Plane only; no surrogate pairs on the wire.
    BmpString,
    check_bmp
);

pub(crate) fn check_numeric(s: &str) -> Result<(), DecodeError> {
    check_chars("NumericString", s, |ch| ch.is_ascii_digit() || ch == ' ')
}

pub(crate) fn check_printable(s: &str) -> Result<(), DecodeError> {
    check_chars("PrintableString", s, |ch| {
        ch.is_ascii_alphanumeric() || " '()+,-./:=?".contains(ch)
    })
}

pub(crate) fn check_ia5(s: &str) -> Result<(), DecodeError> {
    check_chars("IA5String", s, |ch| ch as u32 <= 0x7f)
}

pub(crate) fn check_visible(s: &str) -> Result<(), DecodeError> {
    check_chars("VisibleString", s, |ch| {
        (0x20..=0x7e).contains(&(ch as u32))
    })
}

pub(crate) fn check_latin1(kind: &'static str, s: &str) -> Result<(), DecodeError> {
    check_chars(kind, s, |ch| ch as u32 <= 0xff)
}

fn check_chars(
    kind: &'static str,
    s: &str,
    accept: impl Fn(char) -> bool,
) -> Result<(), DecodeError> {
    match s.chars().find(|&ch| !accept(ch)) {
        Some(ch) => Err(DecodeError::StringBadCharacter { kind, ch }),
        None => Ok(()),
    }
}

pub(crate) fn decode_utf8(data: &[u8]) -> Result<String, DecodeError> {
    String::from_utf8(data.to_vec()).map_err(|_| DecodeError::StringNotUtf8)
}

// Every byte is a character in 0x00-0xFF, so this cannot fail.
pub(crate) fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&byte| byte as char).collect()
}

pub(crate) fn encode_latin1(s: &str) -> Vec<u8> {
    // Characters above 0xFF are rejected at construction.
    s.chars().map(|ch| ch as u32 as u8).collect()
}

pub(crate) fn check_bmp(s: &str) -> Result<(), DecodeError> {
    match s.chars().find(|&ch| ch as u32 > 0xffff) {
        Some(ch) => Err(DecodeError::BmpStringOutsidePlane(ch)),
        None => Ok(()),
    }
}

pub(crate) fn decode_bmp(data: &[u8]) -> Result<String, DecodeError> {
    if data.len() % 2 != 0 {
        return Err(DecodeError::BmpStringOddLength(data.len()));
    }
    let mut out = String::with_capacity(data.len() / 2);
    for pair in data.chunks_exact(2) {
        let unit = u16::from_be_bytes([pair[0], pair[1]]);
        if (0xd800..=0xdfff).contains(&unit) {
            return Err(DecodeError::BmpStringSurrogate(unit));
        }
        match char::from_u32(unit as u32) {
            Some(ch) => out.push(ch),
            None => return Err(DecodeError::BmpStringSurrogate(unit)),
        }
    }
    Ok(out)
}

pub(crate) fn encode_bmp(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 2);
    for ch in s.chars() {
        // Characters outside the plane are rejected at construction.
        out.extend((ch as u32 as u16).to_be_bytes());
    }
    out
}

pub(crate) fn decode_universal(data: &[u8]) -> Result<String, DecodeError> {
    if data.len() % 4 != 0 {
        return Err(DecodeError::UniversalStringLength(data.len()));
    }
    let mut out = String::with_capacity(data.len() / 4);
    for quad in data.chunks_exact(4) {
        let code = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
        match char::from_u32(code) {
            Some(ch) => out.push(ch),
            None => return Err(DecodeError::UniversalStringCodePoint(code)),
        }
    }
    Ok(out)
}

pub(crate) fn encode_universal(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len() * 4);
    for ch in s.chars() {
        out.extend((ch as u32).to_be_bytes());
    }
    out
}
