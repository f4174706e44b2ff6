//! Varint encoding and decoding functions.
//!
//! Unsigned integers use LEB128: they are split into 7-bit groups, least
//! significant group first. Each group sits in the low 7 bits of a byte and
//! every byte except the last has its high bit set.
//!
//! Signed integers are first mapped through [`zigzag`] so that values of small
//! magnitude stay short regardless of their sign.

use crate::error::{Result, VarfloatError};

/// Maximum number of bytes a varint-encoded `u64` can occupy.
pub const MAX_VARINT_LEN64: usize = 10;

/// Appends the LEB128 encoding of `value` to `dst`.
#[inline]
pub fn append_uvarint(dst: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        dst.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    dst.push(value as u8);
}

/// Encodes `value` into a fresh buffer.
pub fn encode_uvarint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN64);
    append_uvarint(&mut out, value);
    out
}

/// Decodes a varint from the start of `bytes`, returning `(value, bytes_consumed)`.
///
/// Fails with [`VarfloatError::MalformedVarint`] if the buffer ends before a
/// terminating byte, or if the encoding does not fit into 64 bits.
#[inline]
pub fn decode_uvarint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in bytes.iter().enumerate() {
        // The 10th byte only has room for the top bit of a u64
        if i == MAX_VARINT_LEN64 - 1 && byte > 1 {
            return Err(VarfloatError::MalformedVarint);
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    Err(VarfloatError::MalformedVarint)
}

/// Maps signed integers to unsigned so that small magnitudes get small codes.
///
/// `0, -1, 1, -2, 2, ...` map to `0, 1, 2, 3, 4, ...`.
#[inline(always)]
pub const fn zigzag(x: i64) -> u64 {
    ((x << 1) ^ (x >> 63)) as u64
}

/// Inverse of [`zigzag`].
#[inline(always)]
pub const fn unzigzag(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Appends a zigzag + LEB128 encoded signed integer.
#[inline]
pub fn append_varint(dst: &mut Vec<u8>, value: i64) {
    append_uvarint(dst, zigzag(value))
}

/// Decodes a signed varint written by [`append_varint`].
#[inline]
pub fn decode_varint(bytes: &[u8]) -> Result<(i64, usize)> {
    let (u, n) = decode_uvarint(bytes)?;
    Ok((unzigzag(u), n))
}
