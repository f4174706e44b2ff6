//! 3D vectors stored as three varfloats.
//!
//! A single vector is a float slice of length 3. A slice of vectors is the
//! flattened float slice of length `3 * len`, so both share the
//! [`crate::slice`] framing.

use crate::{
    config::Config,
    error::{Result, VarfloatError},
    slice::{append_values, read_bits_header, read_count, SliceCodec},
    varint::append_uvarint,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or the zero vector for zero input.
    pub fn normalize(&self) -> Vec3 {
        let n = self.length();
        if n == 0.0 {
            return Vec3::default();
        }
        Vec3::new(self.x / n, self.y / n, self.z / n)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Vec3 {
        Vec3 { x, y, z }
    }
}

impl SliceCodec for Vec3 {
    fn append_slice(dst: &mut Vec<u8>, values: &[Vec3], config: &Config) -> Result<()> {
        let flat: Vec<f64> = values.iter().flat_map(|v| v.to_array()).collect();
        append_uvarint(dst, flat.len() as u64);
        append_values(dst, &flat, config)
    }

    fn decode_slice(bytes: &[u8], config: &Config) -> Result<(Vec<Vec3>, usize)> {
        let (count, mut offset) = read_count(bytes)?;
        if count % 3 != 0 {
            return Err(VarfloatError::InvalidEncoding {
                reason: "vec3 slice length is not a multiple of 3",
            });
        }
        let mut out = Vec::with_capacity(count / 3);
        let mut xyz = [0.0; 3];
        for _ in 0..count / 3 {
            for component in xyz.iter_mut() {
                let (v, used) = config.decode(&bytes[offset..])?;
                *component = v;
                offset += used;
            }
            out.push(Vec3::from(xyz));
        }
        Ok((out, offset))
    }
}

/// Encodes one vector as a 3-element float slice.
pub fn encode_vec3(v: Vec3, bits: u32) -> Result<Vec<u8>> {
    let config = Config::new(bits)?;
    let mut out = Vec::with_capacity(10);
    Vec3::append_slice(&mut out, &[v], &config)?;
    Ok(out)
}

/// Decodes one vector written by [`encode_vec3`], returning `(vector, bytes_consumed)`.
pub fn decode_vec3(bytes: &[u8], bits: u32) -> Result<(Vec3, usize)> {
    let (mut vs, used) = Vec3::decode_slice(bytes, &Config::new(bits)?)?;
    match (vs.pop(), vs.is_empty()) {
        (Some(v), true) => Ok((v, used)),
        _ => Err(VarfloatError::InvalidEncoding {
            reason: "expected exactly 3 components for a vec3",
        }),
    }
}

pub fn encode_vec3_slice(vs: &[Vec3], bits: u32) -> Result<Vec<u8>> {
    let config = Config::new(bits)?;
    let mut out = Vec::new();
    Vec3::append_slice(&mut out, vs, &config)?;
    Ok(out)
}

pub fn decode_vec3_slice(bytes: &[u8], bits: u32) -> Result<(Vec<Vec3>, usize)> {
    Vec3::decode_slice(bytes, &Config::new(bits)?)
}

/// [`encode_vec3_slice`] preceded by a byte carrying `bits`.
pub fn encode_vec3_slice_with_bits(vs: &[Vec3], bits: u32) -> Result<Vec<u8>> {
    let config = Config::new(bits)?;
    let mut out = vec![bits as u8];
    Vec3::append_slice(&mut out, vs, &config)?;
    Ok(out)
}

/// Returns `(vectors, bits, bytes_consumed)`.
pub fn decode_vec3_slice_with_bits(bytes: &[u8]) -> Result<(Vec<Vec3>, u32, usize)> {
    let (config, rest) = read_bits_header(bytes)?;
    let (vs, used) = Vec3::decode_slice(rest, &config)?;
    Ok((vs, config.mantissa_bits(), used + 1))
}
