//! Self-contained chunks of varfloat slices laid end to end in one buffer.
//!
//! ```text
//! chunk: u8(bits) || uvarint(payload_len) || payload
//! ```
//!
//! `payload` is the [`SliceCodec`] framing of the chunk's values. Each chunk
//! carries its own width, so consecutive chunks may use different precisions
//! and a reader can skip or resume at chunk boundaries.

use tracing::{debug, trace};

use crate::{
    config::Config,
    error::{Result, VarfloatError},
    slice::SliceCodec,
    varint::{append_uvarint, decode_uvarint},
};

/// Appends chunks to an owned buffer.
#[derive(Debug, Default, Clone)]
pub struct ChunkWriter {
    buf: Vec<u8>,
}

impl ChunkWriter {
    pub fn new() -> ChunkWriter {
        ChunkWriter::default()
    }

    /// Continues writing after whatever `buf` already holds.
    pub fn with_buffer(buf: Vec<u8>) -> ChunkWriter {
        ChunkWriter { buf }
    }

    /// Encodes `values` with `bits` mantissa bits as one chunk.
    ///
    /// Nothing is written if encoding fails.
    pub fn write_chunk<T: SliceCodec>(&mut self, values: &[T], bits: u32) -> Result<()> {
        let config = Config::new(bits)?;
        let mut payload = Vec::new();
        T::append_slice(&mut payload, values, &config)?;

        self.buf.push(bits as u8);
        append_uvarint(&mut self.buf, payload.len() as u64);
        self.buf.extend_from_slice(&payload);
        trace!(values = values.len(), bits, payload = payload.len(), "wrote chunk");
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads chunks written by [`ChunkWriter`] from a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(bytes: &'a [u8]) -> ChunkReader<'a> {
        ChunkReader { bytes, offset: 0 }
    }

    /// Decodes the next chunk, returning its values and width, or `None` once
    /// the buffer is exhausted.
    ///
    /// On error the reader stays at the start of the offending chunk.
    pub fn read_chunk<T: SliceCodec>(&mut self) -> Result<Option<(Vec<T>, u32)>> {
        let rest = &self.bytes[self.offset..];
        let Some((&bits, after_bits)) = rest.split_first() else {
            return Ok(None);
        };
        let config = Config::new(u32::from(bits))?;

        if after_bits.is_empty() {
            return Err(VarfloatError::TruncatedBuffer);
        }
        let (payload_len, len_used) = decode_uvarint(after_bits)?;
        let body = &after_bits[len_used..];
        let Some(payload) = usize::try_from(payload_len)
            .ok()
            .and_then(|len| body.get(..len))
        else {
            debug!(
                offset = self.offset,
                payload_len,
                available = body.len(),
                "chunk payload is truncated"
            );
            return Err(VarfloatError::TruncatedBuffer);
        };

        let values = if payload.is_empty() {
            Vec::new()
        } else {
            let (values, used) = T::decode_slice(payload, &config)?;
            if used != payload.len() {
                debug!(offset = self.offset, used, payload = payload.len(), "chunk has trailing bytes");
                return Err(VarfloatError::InvalidEncoding {
                    reason: "chunk payload has trailing bytes",
                });
            }
            values
        };

        self.offset += 1 + len_used + payload.len();
        Ok(Some((values, config.mantissa_bits())))
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    #[test]
    fn chunks_keep_their_own_widths() {
        let mut writer = ChunkWriter::new();
        writer.write_chunk(&[1.0, 2.0, 4.0], 4).unwrap();
        writer.write_chunk::<f64>(&[], 10).unwrap();
        writer.write_chunk(&[0.5, -8.0], 52).unwrap();
        assert!(!writer.is_empty());

        let bytes = writer.into_inner();
        let mut reader = ChunkReader::new(&bytes);
        assert_eq!(reader.read_chunk::<f64>(), Ok(Some((vec![1.0, 2.0, 4.0], 4))));
        assert_eq!(reader.read_chunk::<f64>(), Ok(Some((vec![], 10))));
        assert_eq!(reader.read_chunk::<f64>(), Ok(Some((vec![0.5, -8.0], 52))));
        assert_eq!(reader.read_chunk::<f64>(), Ok(None));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn chunk_layout() {
        let mut writer = ChunkWriter::new();
        writer.write_chunk(&[1.0], 10).unwrap();
        // bits, payload length, count, header, mantissa
        assert_eq!(writer.as_bytes(), &[10, 3, 1, 0x02, 0x00]);
        assert_eq!(writer.len(), 5);
    }

    #[test]
    fn vec3_chunks() {
        let vs = vec![Vec3::new(1.0, 2.0, 0.25), Vec3::new(-1.0, 0.0, 16.0)];
        let mut writer = ChunkWriter::with_buffer(Vec::new());
        writer.write_chunk(&vs[..], 12).unwrap();
        let bytes = writer.into_inner();
        let mut reader = ChunkReader::new(&bytes);
        assert_eq!(reader.read_chunk::<Vec3>(), Ok(Some((vs, 12))));
        assert_eq!(reader.read_chunk::<Vec3>(), Ok(None));
    }

    #[test]
    fn failed_write_leaves_buffer_alone() {
        let mut writer = ChunkWriter::new();
        writer.write_chunk(&[1.0], 10).unwrap();
        let before = writer.len();
        assert!(writer.write_chunk(&[1.0, f64::INFINITY], 10).is_err());
        assert!(writer.write_chunk(&[1.0], 53).is_err());
        assert_eq!(writer.len(), before);
    }

    #[test]
    fn corrupt_chunks() {
        // Width byte only
        let mut reader = ChunkReader::new(&[10]);
        assert_eq!(reader.read_chunk::<f64>(), Err(VarfloatError::TruncatedBuffer));

        // Payload shorter than announced
        let mut reader = ChunkReader::new(&[10, 9, 1, 0x02]);
        assert_eq!(reader.read_chunk::<f64>(), Err(VarfloatError::TruncatedBuffer));
        assert_eq!(reader.remaining(), 4);

        // Invalid width
        let mut reader = ChunkReader::new(&[99, 0]);
        assert_eq!(
            reader.read_chunk::<f64>(),
            Err(VarfloatError::InvalidBitWidth { bits: 99 })
        );

        // Payload longer than its slice
        let mut reader = ChunkReader::new(&[10, 4, 1, 0x02, 0x00, 0x00]);
        assert!(matches!(
            reader.read_chunk::<f64>(),
            Err(VarfloatError::InvalidEncoding { .. })
        ));
    }
}
