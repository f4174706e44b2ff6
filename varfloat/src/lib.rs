//! Precision-tunable variable-length encoding for `f64` and bounded integers.
//!
//! A value is split into sign, exponent and a mantissa quantized to a chosen
//! number of bits, then packed as two LEB128 varints. Fewer mantissa bits
//! means fewer bytes and a larger relative error, roughly `2^-bits`.
//!
//! ```
//! use varfloat::{bits_for_max_relative_error, Config};
//!
//! let bits = bits_for_max_relative_error(0.001).unwrap();
//! let config = Config::new(bits).unwrap();
//! let bytes = config.encode(3.14159).unwrap();
//! assert_eq!(bytes.len(), 3);
//!
//! let (v, used) = config.decode(&bytes).unwrap();
//! assert_eq!(used, 3);
//! assert!((v - 3.14159).abs() / 3.14159 < 0.001);
//! ```
//!
//! The width is never stored next to a single value: encoder and decoder
//! must agree on it (or use the headed slice formats in [`slice`] and
//! [`stream`]). There is no global default; [`Config::default`] is just a
//! value the caller owns.

pub mod advisor;
pub mod bounded;
pub mod config;
pub mod error;
pub mod ffi;
pub mod fixed;
pub mod float;
pub mod slice;
pub mod stream;
pub mod varint;
pub mod vector;

pub use advisor::{
    bits_for_int_max_error, bits_for_int_range, bits_for_max_relative_error,
    max_int_quantization_error, max_relative_error_for_bits, quantization_step,
    quantize_int_down,
};
pub use bounded::{
    decode_bounded_int, decode_int_auto, decode_int_lossy, encode_bounded_int, encode_int_auto,
    encode_int_lossy, BoundedIntCodec,
};
pub use config::{Config, DEFAULT_MANTISSA_BITS};
pub use error::{Result, VarfloatError, MAX_MANTISSA_BITS};
pub use float::{decode_float, encode_float};
pub use slice::{decode_floats, encode_floats, SliceCodec};
pub use stream::{ChunkReader, ChunkWriter};
pub use vector::Vec3;
