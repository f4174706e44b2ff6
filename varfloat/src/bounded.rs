//! Integers known to lie in `[min, max]`, stored as varfloats.
//!
//! The integer is converted to `f64` and written with the float codec; the
//! bounds never reach the wire. On the way back the decoded float is rounded
//! to the nearest integer and then **clamped** into `[min, max]`. Decoding
//! therefore never fails because of the range: if the encoder and decoder
//! disagree on `(min, max, bits)` the result is a plausible but wrong integer.
//! Callers that need strict checking must validate on their own.
//!
//! Two width policies sit on top of the explicit-width functions:
//!
//! - *auto* ([`encode_int_auto`]) uses [`bits_for_int_range`], so every
//!   integer of a range that contains zero round trips exactly.
//! - *lossy* ([`encode_int_lossy`]) uses [`bits_for_int_max_error`] to trade
//!   precision for size with a target absolute error.
//!
//! Both widths are sized from `max - min` alone, while the float codec's error
//! scales with the magnitude of the value. For ranges far from zero neither
//! exactness (auto) nor `max_abs_err` (lossy) holds: with `[1e9, 1e9 + 1000]`
//! and `max_abs_err = 10` the lossy width is 7 bits, the quantization step is
//! millions, and every value decodes clamped to one of the bounds. Shift such
//! values toward zero (e.g. store `n - min`) before encoding.

use crate::{
    advisor::{bits_for_int_max_error, bits_for_int_range},
    config::Config,
    error::{check_bounds, Result, VarfloatError},
};

/// Bounds plus a width, validated once and reused for many values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedIntCodec {
    min: i64,
    max: i64,
    config: Config,
}

impl BoundedIntCodec {
    pub fn new(min: i64, max: i64, bits: u32) -> Result<BoundedIntCodec> {
        check_bounds(min, max)?;
        Ok(BoundedIntCodec {
            min,
            max,
            config: Config::new(bits)?,
        })
    }

    /// Width from [`bits_for_int_range`].
    pub fn auto(min: i64, max: i64) -> Result<BoundedIntCodec> {
        BoundedIntCodec::new(min, max, bits_for_int_range(min, max)?)
    }

    /// Width from [`bits_for_int_max_error`].
    pub fn lossy(min: i64, max: i64, max_abs_err: i64) -> Result<BoundedIntCodec> {
        BoundedIntCodec::new(min, max, bits_for_int_max_error(min, max, max_abs_err)?)
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn mantissa_bits(&self) -> u32 {
        self.config.mantissa_bits()
    }

    /// Appends `n`, failing with [`VarfloatError::ValueOutOfRange`] outside the bounds.
    #[inline]
    pub fn append(&self, dst: &mut Vec<u8>, n: i64) -> Result<()> {
        if n < self.min || n > self.max {
            return Err(VarfloatError::ValueOutOfRange {
                value: n,
                min: self.min,
                max: self.max,
            });
        }
        self.config.append(dst, n as f64)
    }

    pub fn encode(&self, n: i64) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(4);
        self.append(&mut out, n)?;
        Ok(out)
    }

    /// Decodes one integer, rounding and then clamping it into the bounds.
    #[inline]
    pub fn decode(&self, bytes: &[u8]) -> Result<(i64, usize)> {
        let (v, n) = self.config.decode(bytes)?;
        // `as` saturates on overflow and maps NaN to 0; the clamp does the rest
        let rounded = v.round() as i64;
        Ok((rounded.clamp(self.min, self.max), n))
    }
}

/// Appends `n`, which must lie in `[min, max]`, with `bits` mantissa bits.
pub fn append_bounded_int(dst: &mut Vec<u8>, n: i64, min: i64, max: i64, bits: u32) -> Result<()> {
    BoundedIntCodec::new(min, max, bits)?.append(dst, n)
}

/// Encodes `n`, which must lie in `[min, max]`, with `bits` mantissa bits.
///
/// Fails with [`VarfloatError::InvalidBounds`] if `min > max`,
/// [`VarfloatError::ValueOutOfRange`] if `n` is outside the bounds and
/// [`VarfloatError::InvalidBitWidth`] if `bits > 52`.
pub fn encode_bounded_int(n: i64, min: i64, max: i64, bits: u32) -> Result<Vec<u8>> {
    BoundedIntCodec::new(min, max, bits)?.encode(n)
}

/// Decodes an integer written by [`encode_bounded_int`] with the same
/// `(min, max, bits)`, returning `(value, bytes_consumed)`.
///
/// The result is always inside `[min, max]`; see the module docs.
pub fn decode_bounded_int(bytes: &[u8], min: i64, max: i64, bits: u32) -> Result<(i64, usize)> {
    BoundedIntCodec::new(min, max, bits)?.decode(bytes)
}

/// Encodes `n` with the width from [`bits_for_int_range`].
pub fn encode_int_auto(n: i64, min: i64, max: i64) -> Result<Vec<u8>> {
    BoundedIntCodec::auto(min, max)?.encode(n)
}

/// Decodes an integer written by [`encode_int_auto`] with the same bounds.
pub fn decode_int_auto(bytes: &[u8], min: i64, max: i64) -> Result<(i64, usize)> {
    BoundedIntCodec::auto(min, max)?.decode(bytes)
}

/// Encodes `n` with the width from [`bits_for_int_max_error`].
pub fn encode_int_lossy(n: i64, min: i64, max: i64, max_abs_err: i64) -> Result<Vec<u8>> {
    BoundedIntCodec::lossy(min, max, max_abs_err)?.encode(n)
}

/// Decodes an integer written by [`encode_int_lossy`] with the same bounds
/// and error target.
pub fn decode_int_lossy(bytes: &[u8], min: i64, max: i64, max_abs_err: i64) -> Result<(i64, usize)> {
    BoundedIntCodec::lossy(min, max, max_abs_err)?.decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::encode_float;

    #[test]
    fn same_bytes_as_float() {
        for n in [-1000, -1, 0, 1, 42, 1000] {
            assert_eq!(
                encode_bounded_int(n, -1000, 1000, 8).unwrap(),
                encode_float(n as f64, 8).unwrap()
            );
        }
    }

    #[test]
    fn extremes_round_trip_with_range_width() {
        for (min, max) in [(0, 1000), (-1000, 1000), (-5, 0), (0, 1), (3, 3), (-65_536, 65_535)] {
            let bits = bits_for_int_range(min, max).unwrap();
            let mut probes = vec![min, max, min + (max - min) / 2];
            if min <= 0 && 0 <= max {
                probes.push(0);
            }
            for n in probes {
                let bytes = encode_bounded_int(n, min, max, bits).unwrap();
                assert_eq!(
                    decode_bounded_int(&bytes, min, max, bits),
                    Ok((n, bytes.len())),
                    "failed on {n} in [{min}, {max}]"
                );
            }
        }
    }

    #[test]
    fn error_propagation() {
        assert_eq!(
            encode_bounded_int(7, 10, 5, 8),
            Err(VarfloatError::InvalidBounds { min: 10, max: 5 })
        );
        assert_eq!(
            encode_bounded_int(100, 0, 10, 8),
            Err(VarfloatError::ValueOutOfRange {
                value: 100,
                min: 0,
                max: 10
            })
        );
        assert_eq!(
            encode_bounded_int(5, 0, 10, 53),
            Err(VarfloatError::InvalidBitWidth { bits: 53 })
        );
        assert_eq!(
            decode_bounded_int(&[], 0, 10, 8),
            Err(VarfloatError::TruncatedBuffer)
        );
        assert_eq!(
            decode_bounded_int(&[0x02, 0x00], 10, 0, 8),
            Err(VarfloatError::InvalidBounds { min: 10, max: 0 })
        );
    }

    #[test]
    fn mismatched_bounds_clamp_silently() {
        let bytes = encode_bounded_int(900, 0, 1000, 10).unwrap();
        // Decoder believes the range is [0, 100]
        assert_eq!(decode_bounded_int(&bytes, 0, 100, 10), Ok((100, bytes.len())));
        // Decoder believes the range is [950, 2000]
        assert_eq!(decode_bounded_int(&bytes, 950, 2000, 10), Ok((950, bytes.len())));
    }

    #[test]
    fn mismatched_bits_decode_without_error() {
        let bytes = encode_bounded_int(777, 0, 1000, 10).unwrap();
        let (n, used) = decode_bounded_int(&bytes, 0, 1000, 4).unwrap();
        assert_eq!(used, bytes.len());
        assert!((0..=1000).contains(&n));
        assert_ne!(n, 777);
    }

    #[test]
    fn huge_decoded_values_clamp() {
        // 2^1023, far outside any i64
        let bytes = encode_float(2f64.powi(1023), 0).unwrap();
        assert_eq!(decode_bounded_int(&bytes, -5, 5, 0).unwrap().0, 5);
        let bytes = encode_float(-(2f64.powi(1023)), 0).unwrap();
        assert_eq!(decode_bounded_int(&bytes, -5, 5, 0).unwrap().0, -5);
    }

    #[test]
    fn auto_and_lossy_policies() {
        for n in [0, 1, 999, 1000] {
            let bytes = encode_int_auto(n, 0, 1000).unwrap();
            assert_eq!(decode_int_auto(&bytes, 0, 1000).unwrap().0, n);
        }

        for n in (0..=10_000).step_by(37) {
            let bytes = encode_int_lossy(n, 0, 10_000, 5).unwrap();
            let (back, _) = decode_int_lossy(&bytes, 0, 10_000, 5).unwrap();
            assert!((back - n).abs() <= 5, "{n} decoded as {back}");
        }

        assert!(matches!(
            encode_int_lossy(3, 0, 10, 0),
            Err(VarfloatError::InvalidArgument { .. })
        ));
        assert!(matches!(
            encode_int_auto(11, 0, 10),
            Err(VarfloatError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn codec_value_matches_free_functions() {
        let codec = BoundedIntCodec::auto(-500, 500).unwrap();
        assert_eq!(codec.mantissa_bits(), 10);
        assert_eq!((codec.min(), codec.max()), (-500, 500));
        let mut buf = Vec::new();
        for n in [-500, -7, 0, 7, 500] {
            codec.append(&mut buf, n).unwrap();
        }
        let mut offset = 0;
        for n in [-500, -7, 0, 7, 500] {
            let (back, used) = decode_int_auto(&buf[offset..], -500, 500).unwrap();
            assert_eq!(back, n);
            offset += used;
        }
        assert_eq!(offset, buf.len());
    }
}
