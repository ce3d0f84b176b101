//! UTCTime and GeneralizedTime content codecs.
//!
//! Decoding accepts the Z suffix, an explicit +/-hhmm offset, and the
//! missing-seconds (UTCTime) and fractional-seconds (GeneralizedTime)
//! variants. Offset forms are normalized to UTC. Encoding always emits
//! the Z form with seconds, as DER requires.

use chrono::{DateTime, NaiveDateTime};

use crate::error::DecodeError;

const UTC_TIME_Z_FORMATS: [&str; 2] = ["%y%m%d%H%M%SZ", "%y%m%d%H%MZ"];
const UTC_TIME_OFFSET_FORMATS: [&str; 2] = ["%y%m%d%H%M%S%z", "%y%m%d%H%M%z"];

const GENERALIZED_Z_FORMATS: [&str; 2] = ["%Y%m%d%H%M%SZ", "%Y%m%d%H%M%S%.fZ"];
const GENERALIZED_OFFSET_FORMATS: [&str; 2] = ["%Y%m%d%H%M%S%z", "%Y%m%d%H%M%S%.f%z"];

pub(crate) fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime, DecodeError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| DecodeError::UtcTimeFormat("non-ASCII content".to_string()))?;
    if !utc_time_shape(text) {
        return Err(DecodeError::UtcTimeFormat(text.to_string()));
    }
    parse(text, &UTC_TIME_Z_FORMATS, &UTC_TIME_OFFSET_FORMATS)
        .ok_or_else(|| DecodeError::UtcTimeFormat(text.to_string()))
}

pub(crate) fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime, DecodeError> {
    let text = std::str::from_utf8(data)
        .map_err(|_| DecodeError::GeneralizedTimeFormat("non-ASCII content".to_string()))?;
    if !generalized_time_shape(text) {
        return Err(DecodeError::GeneralizedTimeFormat(text.to_string()));
    }
    parse(text, &GENERALIZED_Z_FORMATS, &GENERALIZED_OFFSET_FORMATS)
        .ok_or_else(|| DecodeError::GeneralizedTimeFormat(text.to_string()))
}

// The grammars use fixed two-digit fields, which chrono's format strings
// alone do not enforce. Shapes are checked before chrono parses.

// YYMMDDhhmm[ss] followed by Z or a +-hhmm offset.
fn utc_time_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    let digits = match bytes.len() {
        11 | 15 => 10,
        13 | 17 => 12,
        _ => return false,
    };
    bytes[..digits].iter().all(u8::is_ascii_digit) && suffix_shape(&bytes[digits..])
}

// YYYYMMDDhhmmss, an optional .fraction, then Z or a +-hhmm offset.
fn generalized_time_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 15 || !bytes[..14].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let mut rest = &bytes[14..];
    if rest[0] == b'.' {
        let fraction = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if fraction == 0 {
            return false;
        }
        rest = &rest[1 + fraction..];
    }
    suffix_shape(rest)
}

fn suffix_shape(rest: &[u8]) -> bool {
    match rest {
        [b'Z'] => true,
        [b'+' | b'-', offset @ ..] => offset.len() == 4 && offset.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

fn parse(text: &str, z_formats: &[&str], offset_formats: &[&str]) -> Option<NaiveDateTime> {
    for format in z_formats {
        if let Ok(time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(time);
        }
    }
    for format in offset_formats {
        if let Ok(time) = DateTime::parse_from_str(text, format) {
            return Some(time.naive_utc());
        }
    }
    None
}

pub(crate) fn format_utc_time(time: &NaiveDateTime) -> String {
    time.format("%y%m%d%H%M%SZ").to_string()
}

pub(crate) fn format_generalized_time(time: &NaiveDateTime) -> String {
    if time.and_utc().timestamp_subsec_nanos() == 0 {
        time.format("%Y%m%d%H%M%SZ").to_string()
    } else {
        time.format("%Y%m%d%H%M%S%.fZ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::rstest;

    use super::*;
    use crate::error::DecodeError;

    fn at(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[rstest(input, expected,
        case("240315123045Z", at(2024, 3, 15, 12, 30, 45)),
        case("2403151230Z", at(2024, 3, 15, 12, 30, 0)),
        // chrono maps two-digit years 00-68 to 20xx, 69-99 to 19xx
        case("991231235959Z", at(1999, 12, 31, 23, 59, 59)),
        // offset forms normalize to UTC
        case("240315143045+0200", at(2024, 3, 15, 12, 30, 45)),
        case("240315073045-0500", at(2024, 3, 15, 12, 30, 45)),
    )]
    fn test_parse_utc_time(input: &str, expected: NaiveDateTime) {
        assert_eq!(expected, parse_utc_time(input.as_bytes()).unwrap());
    }

    #[rstest(input,
        case("not a time"),
        case("240315123045"),
        // one-digit seconds field
        case("24031512304Z"),
        case("241315123045Z"),
        // truncated offset
        case("240315123045+02"),
    )]
    fn test_parse_utc_time_invalid(input: &str) {
        assert!(matches!(
            parse_utc_time(input.as_bytes()),
            Err(DecodeError::UtcTimeFormat(_))
        ));
    }

    #[rstest(input,
        // one-digit seconds field
        case("2024031512304Z"),
        case("20240315123045"),
        // empty fraction
        case("20240315123045.Z"),
        case("20240315123045+02"),
    )]
    fn test_parse_generalized_time_invalid(input: &str) {
        assert!(matches!(
            parse_generalized_time(input.as_bytes()),
            Err(DecodeError::GeneralizedTimeFormat(_))
        ));
    }

    #[rstest(input, expected,
        case("20240315123045Z", at(2024, 3, 15, 12, 30, 45)),
        case("20240315143045+0200", at(2024, 3, 15, 12, 30, 45)),
    )]
    fn test_parse_generalized_time(input: &str, expected: NaiveDateTime) {
        assert_eq!(expected, parse_generalized_time(input.as_bytes()).unwrap());
    }

    #[test]
    fn test_parse_generalized_time_fraction() {
        use chrono::Timelike;

        let time = parse_generalized_time(b"20240315123045.5Z").unwrap();
        assert_eq!(at(2024, 3, 15, 12, 30, 45), time.with_nanosecond(0).unwrap());
        assert_eq!(500_000_000, time.and_utc().timestamp_subsec_nanos());
    }

    #[test]
    fn test_format_utc_time() {
        assert_eq!("240315123045Z", format_utc_time(&at(2024, 3, 15, 12, 30, 45)));
    }

    #[test]
    fn test_format_generalized_time() {
        assert_eq!(
            "20240315123045Z",
            format_generalized_time(&at(2024, 3, 15, 12, 30, 45))
        );
    }
}
