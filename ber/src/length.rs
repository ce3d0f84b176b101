use crate::error::Error;
use crate::{read_u8, take_bytes};

/// The length octets of a TLV.
///
/// Decoding accepts the three BER forms: short definite (one octet,
/// 0-127), long definite (length-of-length followed by big-endian value
/// octets) and indefinite (0x80, terminated by an end-of-contents marker
/// in the content). Encoding only ever produces the minimal definite
/// form, as DER requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(usize),
    Indefinite,
}

impl Length {
    pub fn is_indefinite(&self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Parses the length octets, returning the remaining input.
    pub fn parse(input: &[u8]) -> Result<(&[u8], Self), Error> {
        let (rest, first) = read_u8(input, "length")?;
        if first & 0x80 == 0 {
            return Ok((rest, Length::Definite(first as usize)));
        }

        let count = (first & 0x7f) as usize;
        if count == 0 {
            return Ok((rest, Length::Indefinite));
        }
        if count == 0x7f {
            // X.690 8.1.3.5 (c)
            return Err(Error::ReservedLengthForm);
        }

        let (rest, octets) = take_bytes(rest, count, "length octets")?;
        let mut value = 0usize;
        for &octet in octets {
            value = value
                .checked_mul(256)
                .and_then(|v| v.checked_add(octet as usize))
                .ok_or(Error::LengthOverflow)?;
        }
        Ok((rest, Length::Definite(value)))
    }

    /// Encodes the length octets. Definite lengths use the short form
    /// when they fit in 7 bits, otherwise the long form with the minimal
    /// number of value octets.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Length::Indefinite => vec![0x80],
            Length::Definite(n) if *n <= 127 => vec![*n as u8],
            Length::Definite(n) => {
                let mut octets = Vec::new();
                let mut v = *n;
                while v > 0 {
                    octets.push((v & 0xff) as u8);
                    v >>= 8;
                }
                let mut out = Vec::with_capacity(octets.len() + 1);
                out.push(0x80 | octets.len() as u8);
                out.extend(octets.iter().rev());
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::Length;
    use crate::error::Error;

    #[rstest(input, expected, consumed,
        case(vec![0x00], Length::Definite(0), 1),
        case(vec![0x02, 0x01], Length::Definite(2), 1),
        case(vec![0x7f], Length::Definite(127), 1),
        case(vec![0x81, 0x80], Length::Definite(128), 2),
        case(vec![0x82, 0x02, 0x10], Length::Definite(0x210), 3),
        case(vec![0x83, 0x01, 0x00, 0x00], Length::Definite(0x10000), 4),
        case(vec![0x80], Length::Indefinite, 1),
    )]
    fn test_length_parse(input: Vec<u8>, expected: Length, consumed: usize) {
        let (rest, actual) = Length::parse(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input.len() - consumed, rest.len());
    }

    #[rstest(
        n,
        case(0),
        case(1),
        case(127),
        case(128),
        case(255),
        case(256),
        case(65535),
        case(1 << 24)
    )]
    fn test_length_roundtrip(n: usize) {
        let encoded = Length::Definite(n).to_bytes();
        // Short form is used exactly for 0-127.
        assert_eq!(n <= 127, encoded.len() == 1);
        let (rest, decoded) = Length::parse(&encoded).unwrap();
        assert!(rest.is_empty());
        assert_eq!(Length::Definite(n), decoded);
    }

    #[test]
    fn test_length_parse_reserved() {
        assert_eq!(Length::parse(&[0xff]), Err(Error::ReservedLengthForm));
    }

    #[rstest(input, case(vec![]), case(vec![0x82, 0x01]), case(vec![0x84]))]
    fn test_length_parse_truncated(input: Vec<u8>) {
        assert!(matches!(Length::parse(&input), Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_length_parse_overflow() {
        let mut input = vec![0x89];
        input.extend([0xff; 9]);
        assert_eq!(Length::parse(&input), Err(Error::LengthOverflow));
    }
}
