//! Heuristics that pick a mantissa width from a precision or range target.
//!
//! The relative quantization step of a varfloat with `bits` mantissa bits is
//! roughly `2^-bits`, so every helper here is some flavour of
//! `ceil(log2(scale / tolerance))` clamped into `[0, 52]`.

use tracing::trace;

use crate::error::{check_bounds, Result, VarfloatError, MAX_MANTISSA_BITS};

#[inline(always)]
fn clamp_bits(bits: f64) -> u32 {
    // `as` saturates, so negative and NaN land on 0
    (bits as u32).min(MAX_MANTISSA_BITS)
}

/// Returns the width whose relative quantization step is at most `max_rel_err`:
///
/// ```text
/// bits = ceil(log2(1 / max_rel_err))
/// ```
///
/// `max_rel_err` must lie in `(0, 1)`.
pub fn bits_for_max_relative_error(max_rel_err: f64) -> Result<u32> {
    if !(max_rel_err > 0.0 && max_rel_err < 1.0) {
        return Err(VarfloatError::InvalidArgument {
            reason: "max_rel_err must be in (0, 1)",
        });
    }
    let bits = clamp_bits((1.0 / max_rel_err).log2().ceil());
    trace!(max_rel_err, bits, "bits for relative error");
    Ok(bits)
}

/// Returns a width that can distinguish every integer in `[min, max]`:
///
/// ```text
/// bits = ceil(log2(max - min + 1))
/// ```
///
/// This is the width used by [`crate::bounded::encode_int_auto`]. It is the
/// bit length of `max - min`, computed without going through floats. Ranges
/// wider than `2^52` are clamped to 52 bits and are no longer lossless.
pub fn bits_for_int_range(min: i64, max: i64) -> Result<u32> {
    check_bounds(min, max)?;
    let width = max.abs_diff(min);
    let bits = (u64::BITS - width.leading_zeros()).min(MAX_MANTISSA_BITS);
    trace!(min, max, bits, "bits for int range");
    Ok(bits)
}

/// Returns a width that keeps the absolute error of integers in `[min, max]`
/// within `max_abs_err`, assuming a step of `(max - min) / 2^bits`:
///
/// ```text
/// bits = ceil(log2((max - min) / max_abs_err))
/// ```
///
/// Returns 0 when `max_abs_err >= max - min`.
pub fn bits_for_int_max_error(min: i64, max: i64, max_abs_err: i64) -> Result<u32> {
    check_bounds(min, max)?;
    if max_abs_err <= 0 {
        return Err(VarfloatError::InvalidArgument {
            reason: "max_abs_err must be > 0",
        });
    }
    let width = max.abs_diff(min) as f64;
    let max_abs_err = max_abs_err as f64;
    if width == 0.0 || max_abs_err >= width {
        return Ok(0);
    }
    let bits = clamp_bits((width / max_abs_err).log2().ceil());
    trace!(min, max, max_abs_err, bits, "bits for int max error");
    Ok(bits)
}

/// Approximate maximum relative error of a width, `2^-bits`.
///
/// Widths above 52 are treated as 52.
pub fn max_relative_error_for_bits(bits: u32) -> f64 {
    let bits = bits.min(MAX_MANTISSA_BITS) as i32;
    2f64.powi(-bits)
}

/// Quantization step of a width, in fractions of 1.0. With 10 bits this is
/// about `1 / 1024`.
#[inline]
pub fn quantization_step(bits: u32) -> f64 {
    max_relative_error_for_bits(bits)
}

/// Rounds `v` toward zero onto a multiple of `step` with integer division.
///
/// Useful to bucket counts before handing them to the bounded-int codec.
/// A non-positive `step` leaves `v` unchanged.
pub fn quantize_int_down(v: i64, step: i64) -> i64 {
    if step <= 0 {
        return v;
    }
    (v / step) * step
}

/// Largest error [`quantize_int_down`] introduces on non-negative input.
pub fn max_int_quantization_error(step: i64) -> i64 {
    if step <= 0 {
        return 0;
    }
    step - 1
}
