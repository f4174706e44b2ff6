//! Fixed-width big-endian encodings, used as the size baseline varfloats are
//! compared against.

use crate::error::{Result, VarfloatError};

/// Reads the first `N` bytes of `bytes`.
#[inline(always)]
fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    match bytes.get(..N) {
        Some(head) => {
            let mut out = [0; N];
            out.copy_from_slice(head);
            Ok(out)
        }
        None => Err(VarfloatError::TruncatedBuffer),
    }
}

/// 8-byte IEEE 754 big-endian `f64`.
pub fn encode_f64_fixed(v: f64) -> [u8; 8] {
    v.to_be_bytes()
}

pub fn decode_f64_fixed(bytes: &[u8]) -> Result<(f64, usize)> {
    Ok((f64::from_be_bytes(take(bytes)?), 8))
}

/// 4-byte IEEE 754 big-endian `f32`.
pub fn encode_f32_fixed(v: f32) -> [u8; 4] {
    v.to_be_bytes()
}

pub fn decode_f32_fixed(bytes: &[u8]) -> Result<(f32, usize)> {
    Ok((f32::from_be_bytes(take(bytes)?), 4))
}

/// 8-byte big-endian two's complement `i64`.
pub fn encode_i64_fixed(v: i64) -> [u8; 8] {
    v.to_be_bytes()
}

pub fn decode_i64_fixed(bytes: &[u8]) -> Result<(i64, usize)> {
    Ok((i64::from_be_bytes(take(bytes)?), 8))
}

/// 4-byte big-endian two's complement `i32`.
pub fn encode_i32_fixed(v: i32) -> [u8; 4] {
    v.to_be_bytes()
}

pub fn decode_i32_fixed(bytes: &[u8]) -> Result<(i32, usize)> {
    Ok((i32::from_be_bytes(take(bytes)?), 4))
}
