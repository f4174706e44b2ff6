//! Length-prefixed sequences of varfloats.
//!
//! ```text
//! slice:            uvarint(count) || value_0 || ... || value_{count-1}
//! slice with bits:  u8(bits) || slice
//! bounded ints:     u8(bits) || uvarint(count) || bounded_0 || ...
//! ```
//!
//! The width header makes a buffer self-describing; the plain framing relies
//! on the caller knowing `bits`.

use crate::{
    bounded::BoundedIntCodec,
    config::Config,
    error::{Result, VarfloatError},
    varint::{append_uvarint, decode_uvarint},
};

/// Slices longer than this are encoded in parallel chunks of this size.
#[cfg(feature = "parallel")]
pub const PARALLEL_CHUNK: usize = 4096;

/// Element types that know their own length-prefixed framing.
///
/// This lets the chunk stream in [`crate::stream`] carry any of them.
pub trait SliceCodec: Sized {
    /// Appends the framed encoding of `values` to `dst`.
    fn append_slice(dst: &mut Vec<u8>, values: &[Self], config: &Config) -> Result<()>;

    /// Decodes a framed slice from the front of `bytes`, returning
    /// `(values, bytes_consumed)`.
    fn decode_slice(bytes: &[u8], config: &Config) -> Result<(Vec<Self>, usize)>;
}

impl SliceCodec for f64 {
    fn append_slice(dst: &mut Vec<u8>, values: &[f64], config: &Config) -> Result<()> {
        append_uvarint(dst, values.len() as u64);
        append_values(dst, values, config)
    }

    fn decode_slice(bytes: &[u8], config: &Config) -> Result<(Vec<f64>, usize)> {
        let (count, mut offset) = read_count(bytes)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let (v, used) = config.decode(&bytes[offset..])?;
            values.push(v);
            offset += used;
        }
        Ok((values, offset))
    }
}

/// Appends every value of `values` with no framing of its own.
///
/// With the `parallel` feature, long inputs are split into chunks encoded on
/// the rayon pool and stitched back in order, so the bytes are identical to
/// the sequential path.
pub(crate) fn append_values(dst: &mut Vec<u8>, values: &[f64], config: &Config) -> Result<()> {
    #[cfg(feature = "parallel")]
    {
        if values.len() > PARALLEL_CHUNK {
            use rayon::prelude::{ParallelIterator, ParallelSlice};

            let parts = values
                .par_chunks(PARALLEL_CHUNK)
                .map(|chunk| {
                    let mut part = Vec::with_capacity(chunk.len() * 3);
                    for &v in chunk {
                        config.append(&mut part, v)?;
                    }
                    Ok(part)
                })
                .collect::<Result<Vec<Vec<u8>>>>()?;
            dst.reserve(parts.iter().map(Vec::len).sum());
            for part in parts {
                dst.extend_from_slice(&part);
            }
            return Ok(());
        }
    }

    dst.reserve(values.len() * 3);
    for &v in values {
        config.append(dst, v)?;
    }
    Ok(())
}

/// Reads a count prefix, returning `(count, bytes_consumed)`.
///
/// Every encoded value takes at least one byte, so a count larger than the
/// rest of the buffer can only mean truncation. Checking it up front also
/// keeps a corrupt prefix from requesting a huge allocation.
pub(crate) fn read_count(bytes: &[u8]) -> Result<(usize, usize)> {
    if bytes.is_empty() {
        return Err(VarfloatError::TruncatedBuffer);
    }
    let (count, used) = decode_uvarint(bytes)?;
    let remaining = (bytes.len() - used) as u64;
    if count > remaining {
        return Err(VarfloatError::TruncatedBuffer);
    }
    Ok((count as usize, used))
}

/// Reads a one-byte width header.
pub(crate) fn read_bits_header(bytes: &[u8]) -> Result<(Config, &[u8])> {
    let Some((&bits, rest)) = bytes.split_first() else {
        return Err(VarfloatError::TruncatedBuffer);
    };
    Ok((Config::new(u32::from(bits))?, rest))
}

/// Encodes `values` as `uvarint(len) || values` with `bits` mantissa bits.
pub fn encode_floats(values: &[f64], bits: u32) -> Result<Vec<u8>> {
    let config = Config::new(bits)?;
    let mut out = Vec::new();
    f64::append_slice(&mut out, values, &config)?;
    Ok(out)
}

/// Decodes a slice written by [`encode_floats`], returning `(values, bytes_consumed)`.
pub fn decode_floats(bytes: &[u8], bits: u32) -> Result<(Vec<f64>, usize)> {
    f64::decode_slice(bytes, &Config::new(bits)?)
}

/// Like [`encode_floats`] with a leading byte carrying `bits`, so the decoder
/// does not need to know the width.
pub fn encode_floats_with_bits(values: &[f64], bits: u32) -> Result<Vec<u8>> {
    let config = Config::new(bits)?;
    let mut out = vec![bits as u8];
    f64::append_slice(&mut out, values, &config)?;
    Ok(out)
}

/// Decodes a buffer written by [`encode_floats_with_bits`], returning
/// `(values, bits, bytes_consumed)`.
pub fn decode_floats_with_bits(bytes: &[u8]) -> Result<(Vec<f64>, u32, usize)> {
    let (config, rest) = read_bits_header(bytes)?;
    let (values, used) = f64::decode_slice(rest, &config)?;
    Ok((values, config.mantissa_bits(), used + 1))
}

/// Encodes integers in `[min, max]` as `u8(bits) || uvarint(len) || values`.
pub fn encode_bounded_ints(values: &[i64], min: i64, max: i64, bits: u32) -> Result<Vec<u8>> {
    let codec = BoundedIntCodec::new(min, max, bits)?;
    let mut out = Vec::with_capacity(1 + 10 + values.len() * 2);
    out.push(bits as u8);
    append_uvarint(&mut out, values.len() as u64);
    for &n in values {
        codec.append(&mut out, n)?;
    }
    Ok(out)
}

/// Decodes a buffer written by [`encode_bounded_ints`] with the same bounds,
/// returning `(values, bits, bytes_consumed)`. Values are clamped like
/// [`crate::bounded::decode_bounded_int`].
pub fn decode_bounded_ints(bytes: &[u8], min: i64, max: i64) -> Result<(Vec<i64>, u32, usize)> {
    let (config, rest) = read_bits_header(bytes)?;
    let codec = BoundedIntCodec::new(min, max, config.mantissa_bits())?;
    let (count, mut offset) = read_count(rest)?;
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let (n, used) = codec.decode(&rest[offset..])?;
        values.push(n);
        offset += used;
    }
    Ok((values, config.mantissa_bits(), offset + 1))
}
