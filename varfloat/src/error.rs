use thiserror::Error;

/// Everything that can go wrong while encoding or decoding varfloats.
///
/// Decoding a bounded integer never fails because of its range: out of range
/// values are clamped instead (see [`crate::bounded::decode_bounded_int`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VarfloatError {
    #[error("mantissa bits must be between 0 and 52, got {bits}")]
    InvalidBitWidth { bits: u32 },

    #[error("min must be <= max, got [{min}, {max}]")]
    InvalidBounds { min: i64, max: i64 },

    #[error("value {value} out of bounds [{min}, {max}]")]
    ValueOutOfRange { value: i64, min: i64, max: i64 },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    #[error("buffer ended before a complete value could be read")]
    TruncatedBuffer,

    #[error("malformed varint")]
    MalformedVarint,

    #[error("invalid encoding: {reason}")]
    InvalidEncoding { reason: &'static str },

    #[error("cannot encode non-finite value {value}")]
    NonFiniteValue { value: f64 },
}

pub type Result<T> = std::result::Result<T, VarfloatError>;

/// Largest mantissa width a `f64` can carry.
pub const MAX_MANTISSA_BITS: u32 = 52;

/// Rejects widths outside `[0, 52]`.
#[inline]
pub(crate) fn check_bits(bits: u32) -> Result<()> {
    if bits > MAX_MANTISSA_BITS {
        return Err(VarfloatError::InvalidBitWidth { bits });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_bounds(min: i64, max: i64) -> Result<()> {
    if min > max {
        return Err(VarfloatError::InvalidBounds { min, max });
    }
    Ok(())
}
