//! Wire-level decode errors.

use thiserror::Error;

/// Errors raised while parsing raw BER/DER bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("truncated input while reading {what}: need {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    // Identifier errors
    #[error("identifier: tag number does not terminate within {0} octets")]
    TagNumberTooLong(usize),
    #[error("identifier: tag number overflows u64")]
    TagNumberOverflow,
    #[error("identifier: padded tag number encoding (leading 0x80 continuation octet)")]
    PaddedTagNumber,

    // Length errors
    #[error("length: long form first octet 0xFF is reserved")]
    ReservedLengthForm,
    #[error("length: value overflows usize")]
    LengthOverflow,

    // Structure errors
    #[error("indefinite length on a primitive identifier")]
    IndefiniteOnPrimitive,
    #[error("indefinite length content missing end-of-contents marker")]
    UnterminatedIndefinite,
    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),
    #[error("input length {len} exceeds limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },
}
