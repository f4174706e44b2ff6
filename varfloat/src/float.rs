//! The varfloat codec for a single `f64`.
//!
//! Layout of a nonzero value:
//!
//! ```text
//! uvarint(header) || uvarint(mantissa)
//! header = ((zigzag(exponent) + 1) << 1) | sign
//! ```
//!
//! where the value is `m' * 2^exponent` with `m'` in `[1, 2)`, and `mantissa`
//! is the fractional part of `m'` quantized to `bits` bits. Zero (either sign)
//! is the single byte `0x00`; the `+ 1` in the header keeps every other
//! encoding away from that byte.

use tracing::debug;

use crate::{
    error::{check_bits, Result, VarfloatError},
    varint::{append_uvarint, decode_uvarint, unzigzag, zigzag},
};

/// The one-byte encoding of `0.0` and `-0.0`.
pub const ZERO_SENTINEL: u8 = 0x00;

/// Adjusted exponent of the largest finite `f64`.
const MAX_EXPONENT: i64 = 1023;

const TWO_POW_53: f64 = 9_007_199_254_740_992.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// `2^n` for `n` in the normal exponent range `[-1022, 1023]`.
#[inline(always)]
fn pow2(n: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&n));
    f64::from_bits(((0x3ff + n) as u64) << 52)
}

/// Splits a finite `x` into `m * 2^e` with `|m|` in `[0.5, 1)`.
///
/// Subnormals are normalized, so the result is exact for every finite input.
/// Zero maps to `(0.0, 0)`.
pub(crate) fn frexp(x: f64) -> (f64, i32) {
    if x == 0.0 {
        return (x, 0);
    }
    let bits = x.to_bits();
    let exp_field = ((bits >> 52) & 0x7ff) as i32;
    if exp_field == 0 {
        let (m, e) = frexp(x * TWO_POW_64);
        return (m, e - 64);
    }
    // Force the biased exponent to 1022, i.e. a magnitude in [0.5, 1)
    let m = f64::from_bits((bits & !(0x7ff << 52)) | (1022 << 52));
    (m, exp_field - 1022)
}

/// Computes `x * 2^n`, saturating to infinity or zero outside the `f64` range.
///
/// Results in the subnormal range are rounded once.
pub(crate) fn ldexp(mut x: f64, n: i64) -> f64 {
    // Anything past +-3000 has already saturated for every finite x
    let mut n = n.clamp(-3000, 3000) as i32;
    if n > 1023 {
        x *= pow2(1023);
        n -= 1023;
        if n > 1023 {
            x *= pow2(1023);
            n -= 1023;
            n = n.min(1023);
        }
    } else if n < -1022 {
        // Keep 53 bits of headroom so only the last multiply can round
        x *= pow2(-1022) * TWO_POW_53;
        n += 1022 - 53;
        if n < -1022 {
            x *= pow2(-1022) * TWO_POW_53;
            n += 1022 - 53;
            n = n.max(-1022);
        }
    }
    x * pow2(n)
}

/// Largest quantized mantissa for a width, `2^bits - 1`, or 0 for 0 bits.
#[inline(always)]
pub(crate) const fn mant_max_for_bits(bits: u32) -> u64 {
    if bits == 0 {
        0
    } else {
        (1 << bits) - 1
    }
}

/// Appends `v` to `dst`. `mant_max` must come from [`mant_max_for_bits`].
pub(crate) fn append_with_mant_max(dst: &mut Vec<u8>, v: f64, mant_max: u64) -> Result<()> {
    if !v.is_finite() {
        return Err(VarfloatError::NonFiniteValue { value: v });
    }
    if v == 0.0 {
        dst.push(ZERO_SENTINEL);
        return Ok(());
    }

    let sign = u64::from(v < 0.0);
    let (m, e) = frexp(v.abs());
    // v = m' * 2^exponent with m' in [1, 2)
    let m_prime = m * 2.0;
    let exponent = i64::from(e) - 1;

    let mut mant = 0;
    if mant_max > 0 {
        mant = ((m_prime - 1.0) * mant_max as f64).round() as u64;
        // Rounding up to m' = 2 at the top exponent would decode as infinity
        if exponent == MAX_EXPONENT {
            mant = mant.min(mant_max - 1);
        }
    }

    let header = ((zigzag(exponent) + 1) << 1) | sign;
    append_uvarint(dst, header);
    append_uvarint(dst, mant);
    Ok(())
}

/// Decodes one value from the front of `bytes`. `mant_max` must come from
/// [`mant_max_for_bits`].
pub(crate) fn consume_with_mant_max(bytes: &[u8], mant_max: u64) -> Result<(f64, usize)> {
    let Some(&first) = bytes.first() else {
        return Err(VarfloatError::TruncatedBuffer);
    };
    if first == ZERO_SENTINEL {
        return Ok((0.0, 1));
    }

    let (header, header_len) = decode_uvarint(bytes).map_err(|err| {
        debug!("varfloat header is not a valid varint");
        err
    })?;
    let negative = header & 1 == 1;
    let ez_plus_one = header >> 1;
    if ez_plus_one == 0 {
        debug!(header, "varfloat header uses the reserved exponent field");
        return Err(VarfloatError::InvalidEncoding {
            reason: "reserved exponent field in header",
        });
    }
    let exponent = unzigzag(ez_plus_one - 1);

    let rest = &bytes[header_len..];
    if rest.is_empty() {
        return Err(VarfloatError::TruncatedBuffer);
    }
    let (mant, mant_len) = decode_uvarint(rest).map_err(|err| {
        debug!("varfloat mantissa is not a valid varint");
        err
    })?;

    let m_prime = if mant_max > 0 {
        1.0 + mant as f64 / mant_max as f64
    } else {
        1.0
    };
    // Exact inverse of the encode side: m = m' / 2 in [0.5, 1)
    let v = ldexp(m_prime * 0.5, exponent.saturating_add(1));

    Ok((if negative { -v } else { v }, header_len + mant_len))
}

/// Appends the varfloat encoding of `v` with `bits` mantissa bits to `dst`.
pub fn append_float(dst: &mut Vec<u8>, v: f64, bits: u32) -> Result<()> {
    check_bits(bits)?;
    append_with_mant_max(dst, v, mant_max_for_bits(bits))
}

/// Encodes `v` into a fresh buffer with `bits` mantissa bits.
///
/// Fails with [`VarfloatError::InvalidBitWidth`] if `bits > 52` and with
/// [`VarfloatError::NonFiniteValue`] for NaN and infinities.
///
/// At the top exponent (values of `2^1023` and above) the mantissa is capped
/// at `2^bits - 2` instead of rounding up to `2^bits - 1`, so these values
/// always decode to a finite `f64`. For example `f64::MAX` at 10 bits is
/// written with mantissa 1022, not 1023. Every other value is byte for byte
/// the plain rounding of `(m' - 1) * (2^bits - 1)`.
pub fn encode_float(v: f64, bits: u32) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4);
    append_float(&mut out, v, bits)?;
    Ok(out)
}

/// Decodes a value from the front of `bytes`, returning `(value, bytes_consumed)`.
///
/// `bits` must match the width used to encode.
pub fn decode_float(bytes: &[u8], bits: u32) -> Result<(f64, usize)> {
    check_bits(bits)?;
    consume_with_mant_max(bytes, mant_max_for_bits(bits))
}
