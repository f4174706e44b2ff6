use crate::{
    advisor::{bits_for_max_relative_error, max_relative_error_for_bits},
    error::{check_bits, Result},
    float::{append_with_mant_max, consume_with_mant_max, mant_max_for_bits},
};

/// Width used by [`Config::default`].
pub const DEFAULT_MANTISSA_BITS: u32 = 10;

/// An immutable mantissa width with the float codec bound to it.
///
/// Encoder and decoder must agree on the width; it is never written to the
/// encoded bytes. Every `Config` is an independent value, so concurrent
/// callers each hold their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    mantissa_bits: u32,
    mant_max: u64,
}

impl Config {
    /// Fails with [`crate::VarfloatError::InvalidBitWidth`] unless `bits <= 52`.
    pub fn new(bits: u32) -> Result<Config> {
        check_bits(bits)?;
        Ok(Config {
            mantissa_bits: bits,
            mant_max: mant_max_for_bits(bits),
        })
    }

    /// Chooses the width with [`bits_for_max_relative_error`].
    pub fn from_max_relative_error(max_rel_err: f64) -> Result<Config> {
        Config::new(bits_for_max_relative_error(max_rel_err)?)
    }

    pub fn mantissa_bits(&self) -> u32 {
        self.mantissa_bits
    }

    /// Approximate worst-case relative error, `2^-bits`.
    pub fn max_relative_error(&self) -> f64 {
        max_relative_error_for_bits(self.mantissa_bits)
    }

    /// Appends the encoding of `v` to `dst`.
    #[inline]
    pub fn append(&self, dst: &mut Vec<u8>, v: f64) -> Result<()> {
        append_with_mant_max(dst, v, self.mant_max)
    }

    pub fn encode(&self, v: f64) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(4);
        self.append(&mut out, v)?;
        Ok(out)
    }

    /// Decodes one value from the front of `bytes`, returning `(value, bytes_consumed)`.
    #[inline]
    pub fn decode(&self, bytes: &[u8]) -> Result<(f64, usize)> {
        consume_with_mant_max(bytes, self.mant_max)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mantissa_bits: DEFAULT_MANTISSA_BITS,
            mant_max: mant_max_for_bits(DEFAULT_MANTISSA_BITS),
        }
    }
}

impl TryFrom<u32> for Config {
    type Error = crate::VarfloatError;

    fn try_from(bits: u32) -> Result<Config> {
        Config::new(bits)
    }
}
