//! C ABI over the scalar codecs and the width advisor.
//!
//! Every function returns a [`VarfloatStatus`] and reports its results
//! through out-pointers. A C header is generated by `build.rs` into
//! `$OUT_DIR/varfloat.h`.

use crate::{advisor, bounded, error::VarfloatError, float};

/// Most bytes a single encoded value can take: two 10-byte varints.
pub const VARFLOAT_MAX_ENCODED_LEN: usize = 20;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarfloatStatus {
    Ok = 0,
    InvalidBitWidth = 1,
    InvalidBounds = 2,
    ValueOutOfRange = 3,
    InvalidArgument = 4,
    TruncatedBuffer = 5,
    MalformedVarint = 6,
    InvalidEncoding = 7,
    NonFiniteValue = 8,
    /// The output buffer cannot hold the encoding.
    BufferTooSmall = 9,
    NullPointer = 10,
}

impl From<&VarfloatError> for VarfloatStatus {
    fn from(err: &VarfloatError) -> Self {
        match err {
            VarfloatError::InvalidBitWidth { .. } => VarfloatStatus::InvalidBitWidth,
            VarfloatError::InvalidBounds { .. } => VarfloatStatus::InvalidBounds,
            VarfloatError::ValueOutOfRange { .. } => VarfloatStatus::ValueOutOfRange,
            VarfloatError::InvalidArgument { .. } => VarfloatStatus::InvalidArgument,
            VarfloatError::TruncatedBuffer => VarfloatStatus::TruncatedBuffer,
            VarfloatError::MalformedVarint => VarfloatStatus::MalformedVarint,
            VarfloatError::InvalidEncoding { .. } => VarfloatStatus::InvalidEncoding,
            VarfloatError::NonFiniteValue { .. } => VarfloatStatus::NonFiniteValue,
        }
    }
}

/// Borrows `len` bytes at `data`. A zero length never touches the pointer.
unsafe fn input<'a>(data: *const u8, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        return None;
    }
    Some(core::slice::from_raw_parts(data, len))
}

/// Copies `encoded` into `out` and stores its length in `out_len`.
unsafe fn write_encoded(
    encoded: Result<Vec<u8>, VarfloatError>,
    out: *mut u8,
    out_cap: usize,
    out_len: *mut usize,
) -> VarfloatStatus {
    if out.is_null() || out_len.is_null() {
        return VarfloatStatus::NullPointer;
    }
    let encoded = match encoded {
        Ok(encoded) => encoded,
        Err(err) => return VarfloatStatus::from(&err),
    };
    if encoded.len() > out_cap {
        return VarfloatStatus::BufferTooSmall;
    }
    core::ptr::copy_nonoverlapping(encoded.as_ptr(), out, encoded.len());
    *out_len = encoded.len();
    VarfloatStatus::Ok
}

/// Stores a decoded `(value, consumed)` pair.
unsafe fn write_decoded<T>(
    decoded: Result<(T, usize), VarfloatError>,
    out_value: *mut T,
    out_consumed: *mut usize,
) -> VarfloatStatus {
    match decoded {
        Ok((value, consumed)) => {
            *out_value = value;
            *out_consumed = consumed;
            VarfloatStatus::Ok
        }
        Err(err) => VarfloatStatus::from(&err),
    }
}

/// Stores an advisor result.
unsafe fn write_bits(bits: Result<u32, VarfloatError>, out_bits: *mut u32) -> VarfloatStatus {
    if out_bits.is_null() {
        return VarfloatStatus::NullPointer;
    }
    match bits {
        Ok(bits) => {
            *out_bits = bits;
            VarfloatStatus::Ok
        }
        Err(err) => VarfloatStatus::from(&err),
    }
}

/// Encodes `value` into `out`, which has room for `out_cap` bytes.
///
/// # Safety
///
/// `out` must be valid for `out_cap` writes and `out_len` for one write.
#[no_mangle]
pub unsafe extern "C" fn varfloat_encode_float(
    value: f64,
    bits: u32,
    out: *mut u8,
    out_cap: usize,
    out_len: *mut usize,
) -> VarfloatStatus {
    write_encoded(float::encode_float(value, bits), out, out_cap, out_len)
}

/// Decodes one value from `data`.
///
/// # Safety
///
/// `data` must be valid for `len` reads; `out_value` and `out_consumed` for
/// one write each.
#[no_mangle]
pub unsafe extern "C" fn varfloat_decode_float(
    data: *const u8,
    len: usize,
    bits: u32,
    out_value: *mut f64,
    out_consumed: *mut usize,
) -> VarfloatStatus {
    if out_value.is_null() || out_consumed.is_null() {
        return VarfloatStatus::NullPointer;
    }
    let Some(bytes) = input(data, len) else {
        return VarfloatStatus::NullPointer;
    };
    write_decoded(float::decode_float(bytes, bits), out_value, out_consumed)
}

/// Encodes an integer in `[min, max]` into `out`.
///
/// # Safety
///
/// Same contract as [`varfloat_encode_float`].
#[no_mangle]
pub unsafe extern "C" fn varfloat_encode_bounded_int(
    value: i64,
    min: i64,
    max: i64,
    bits: u32,
    out: *mut u8,
    out_cap: usize,
    out_len: *mut usize,
) -> VarfloatStatus {
    write_encoded(
        bounded::encode_bounded_int(value, min, max, bits),
        out,
        out_cap,
        out_len,
    )
}

/// Decodes an integer in `[min, max]`; out of range results are clamped.
///
/// # Safety
///
/// Same contract as [`varfloat_decode_float`].
#[no_mangle]
pub unsafe extern "C" fn varfloat_decode_bounded_int(
    data: *const u8,
    len: usize,
    min: i64,
    max: i64,
    bits: u32,
    out_value: *mut i64,
    out_consumed: *mut usize,
) -> VarfloatStatus {
    if out_value.is_null() || out_consumed.is_null() {
        return VarfloatStatus::NullPointer;
    }
    let Some(bytes) = input(data, len) else {
        return VarfloatStatus::NullPointer;
    };
    write_decoded(
        bounded::decode_bounded_int(bytes, min, max, bits),
        out_value,
        out_consumed,
    )
}

/// # Safety
///
/// `out_bits` must be valid for one write.
#[no_mangle]
pub unsafe extern "C" fn varfloat_bits_for_max_relative_error(
    max_rel_err: f64,
    out_bits: *mut u32,
) -> VarfloatStatus {
    write_bits(advisor::bits_for_max_relative_error(max_rel_err), out_bits)
}

/// # Safety
///
/// `out_bits` must be valid for one write.
#[no_mangle]
pub unsafe extern "C" fn varfloat_bits_for_int_range(
    min: i64,
    max: i64,
    out_bits: *mut u32,
) -> VarfloatStatus {
    write_bits(advisor::bits_for_int_range(min, max), out_bits)
}

/// # Safety
///
/// `out_bits` must be valid for one write.
#[no_mangle]
pub unsafe extern "C" fn varfloat_bits_for_int_max_error(
    min: i64,
    max: i64,
    max_abs_err: i64,
    out_bits: *mut u32,
) -> VarfloatStatus {
    write_bits(advisor::bits_for_int_max_error(min, max, max_abs_err), out_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_round_trip_through_c_abi() {
        let mut buf = [0u8; VARFLOAT_MAX_ENCODED_LEN];
        let mut len = 0;
        let status =
            unsafe { varfloat_encode_float(3.14159, 10, buf.as_mut_ptr(), buf.len(), &mut len) };
        assert_eq!(status, VarfloatStatus::Ok);
        assert_eq!(&buf[..len], &[0x06, 0xc8, 0x04]);

        let mut value = 0.0;
        let mut consumed = 0;
        let status =
            unsafe { varfloat_decode_float(buf.as_ptr(), len, 10, &mut value, &mut consumed) };
        assert_eq!(status, VarfloatStatus::Ok);
        assert_eq!(consumed, 3);
        assert!((value - 3.14159).abs() / 3.14159 <= 2f64.powi(-10));
    }

    #[test]
    fn bounded_int_through_c_abi() {
        let mut buf = [0u8; VARFLOAT_MAX_ENCODED_LEN];
        let mut len = 0;
        let status = unsafe {
            varfloat_encode_bounded_int(-321, -1000, 1000, 11, buf.as_mut_ptr(), buf.len(), &mut len)
        };
        assert_eq!(status, VarfloatStatus::Ok);

        let mut value = 0;
        let mut consumed = 0;
        let status = unsafe {
            varfloat_decode_bounded_int(buf.as_ptr(), len, -1000, 1000, 11, &mut value, &mut consumed)
        };
        assert_eq!(status, VarfloatStatus::Ok);
        assert_eq!((value, consumed), (-321, len));

        let status = unsafe {
            varfloat_encode_bounded_int(5, 10, 0, 11, buf.as_mut_ptr(), buf.len(), &mut len)
        };
        assert_eq!(status, VarfloatStatus::InvalidBounds);
    }

    #[test]
    fn status_codes() {
        let mut small = [0u8; 2];
        let mut len = 0;
        let status =
            unsafe { varfloat_encode_float(3.14159, 10, small.as_mut_ptr(), small.len(), &mut len) };
        assert_eq!(status, VarfloatStatus::BufferTooSmall);

        let status = unsafe {
            varfloat_encode_float(1.0, 10, core::ptr::null_mut(), 8, &mut len)
        };
        assert_eq!(status, VarfloatStatus::NullPointer);

        let mut value = 0.0;
        let mut consumed = 0;
        let status = unsafe {
            varfloat_decode_float(core::ptr::null(), 0, 10, &mut value, &mut consumed)
        };
        assert_eq!(status, VarfloatStatus::TruncatedBuffer);

        let mut bits = 0;
        assert_eq!(
            unsafe { varfloat_bits_for_max_relative_error(0.001, &mut bits) },
            VarfloatStatus::Ok
        );
        assert_eq!(bits, 10);
        assert_eq!(
            unsafe { varfloat_bits_for_int_range(0, 1000, &mut bits) },
            VarfloatStatus::Ok
        );
        assert_eq!(bits, 10);
        assert_eq!(
            unsafe { varfloat_bits_for_int_max_error(0, 10, 0, &mut bits) },
            VarfloatStatus::InvalidArgument
        );
        assert_eq!(
            unsafe { varfloat_bits_for_int_range(0, 10, core::ptr::null_mut()) },
            VarfloatStatus::NullPointer
        );
    }
}
