//! REAL content codec (X.690 8.5).
//!
//! Decoding accepts all three encodings: the special-value octets, the
//! binary form in base 2, 8 or 16, and the decimal (ISO 6093) form.
//! Encoding always emits the canonical DER binary form, base 2 with an
//! odd mantissa, so every finite non-zero value has exactly one
//! encoding.

use crate::error::DecodeError;

pub(crate) fn decode(content: &[u8]) -> Result<f64, DecodeError> {
    let Some((&first, rest)) = content.split_first() else {
        // Empty content is the value zero.
        return Ok(0.0);
    };
    if first & 0x80 != 0 {
        return decode_binary(first, rest);
    }
    if first & 0x40 != 0 {
        if !rest.is_empty() {
            return Err(DecodeError::RealSpecialLength);
        }
        return match first {
            0x40 => Ok(f64::INFINITY),
            0x41 => Ok(f64::NEG_INFINITY),
            0x42 => Ok(f64::NAN),
            0x43 => Ok(-0.0),
            _ => Err(DecodeError::RealForm(first)),
        };
    }
    decode_decimal(rest)
}

fn decode_binary(first: u8, rest: &[u8]) -> Result<f64, DecodeError> {
    let sign = if first & 0x40 != 0 { -1.0 } else { 1.0 };
    // Bases 2, 8 and 16 are all powers of two, so the whole exponent
    // reduces to a binary shift of the mantissa.
    let base_shift: i64 = match (first >> 4) & 0x03 {
        0 => 1,
        1 => 3,
        2 => 4,
        _ => return Err(DecodeError::RealForm(first)),
    };
    let scale = ((first >> 2) & 0x03) as i64;

    let (exp_len, rest) = match first & 0x03 {
        0 => (1, rest),
        1 => (2, rest),
        2 => (3, rest),
        _ => {
            let Some((&n, r)) = rest.split_first() else {
                return Err(DecodeError::RealTruncated);
            };
            (n as usize, r)
        }
    };
    if exp_len == 0 || rest.len() < exp_len {
        return Err(DecodeError::RealTruncated);
    }
    if exp_len > 8 {
        return Err(DecodeError::RealExponentTooLong(exp_len));
    }

    // Signed big-endian exponent.
    let mut exponent = (rest[0] as i8) as i64;
    for &octet in &rest[1..exp_len] {
        exponent = (exponent << 8) | octet as i64;
    }

    let mantissa_octets = &rest[exp_len..];
    if mantissa_octets.is_empty() {
        return Err(DecodeError::RealTruncated);
    }
    let mut mantissa = 0u64;
    for &octet in mantissa_octets {
        mantissa = mantissa
            .checked_mul(256)
            .and_then(|m| m.checked_add(octet as u64))
            .ok_or(DecodeError::RealMantissaOverflow)?;
    }

    let shift = exponent.saturating_mul(base_shift).saturating_add(scale);
    Ok(sign * ldexp(mantissa, shift))
}

// mantissa * 2^exponent, applied in steps no larger than the normal
// range so subnormal results survive instead of underflowing through an
// intermediate zero.
fn ldexp(mantissa: u64, exponent: i64) -> f64 {
    let mut value = mantissa as f64;
    // Past +-1200 the result is already saturated to infinity or zero
    // for any u64 mantissa, so the loop stays short for wire exponents
    // of up to eight octets.
    let mut remaining = exponent.clamp(-1200, 1200);
    while remaining > 0 {
        let step = remaining.min(1023);
        value *= 2f64.powi(step as i32);
        remaining -= step;
    }
    while remaining < 0 {
        let step = remaining.max(-1022);
        value *= 2f64.powi(step as i32);
        remaining -= step;
    }
    value
}

fn decode_decimal(rest: &[u8]) -> Result<f64, DecodeError> {
    let text = std::str::from_utf8(rest).map_err(|_| DecodeError::RealDecimal)?;
    // NR forms allow leading spaces and a comma as the decimal mark.
    let normalized = text.trim().replace(',', ".");
    let unsigned = normalized.strip_prefix('+').unwrap_or(&normalized);
    unsigned.parse::<f64>().map_err(|_| DecodeError::RealDecimal)
}

pub(crate) fn encode(value: f64) -> Vec<u8> {
    if value.is_nan() {
        return vec![0x42];
    }
    if value == f64::INFINITY {
        return vec![0x40];
    }
    if value == f64::NEG_INFINITY {
        return vec![0x41];
    }
    if value == 0.0 {
        return if value.is_sign_negative() {
            vec![0x43]
        } else {
            vec![]
        };
    }

    let bits = value.to_bits();
    let negative = bits >> 63 != 0;
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & 0x000f_ffff_ffff_ffff;
    let (mut mantissa, mut exponent) = if biased == 0 {
        // Subnormal.
        (fraction, -1074i64)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };
    // Canonical form keeps the mantissa odd.
    while mantissa & 1 == 0 {
        mantissa >>= 1;
        exponent += 1;
    }

    let exp_octets = signed_be(exponent);
    let mut out = Vec::with_capacity(2 + exp_octets.len() + 8);
    // f64 exponents fit in two octets, so bits 1-0 encode the count
    // directly.
    out.push(0x80 | if negative { 0x40 } else { 0x00 } | (exp_octets.len() as u8 - 1));
    out.extend(exp_octets);

    let mut digits = Vec::new();
    let mut m = mantissa;
    while m > 0 {
        digits.push((m & 0xff) as u8);
        m >>= 8;
    }
    out.extend(digits.iter().rev());
    out
}

// Minimal two's-complement big-endian octets.
fn signed_be(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < 7 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xff && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}
