//! Endian-aware primitive access for metadata buffers.
//!
//! The [`LeIO`] trait abstracts reading and writing fixed-size primitives
//! from byte slices. All metadata structures are little-endian regardless of
//! host, so only the little-endian forms are provided.

use crate::{Error::OutOfBounds, Result};

/// Trait implemented by every primitive that can cross the wire boundary.
///
/// Implementations exist for the integer and floating point types used by
/// ECMA-335 structures. The associated `Bytes` array carries the exact wire
/// width of the type.
pub trait LeIO: Sized + Copy {
    #[allow(missing_docs)]
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]> + AsRef<[u8]>;

    /// Decode `Self` from its little-endian byte representation
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
    /// Encode `Self` into its little-endian byte representation
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_le_io {
    ($($ty:ty),+) => {
        $(
            impl LeIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )+
    };
}

impl_le_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Safely read `T` in little-endian from the start of a data stream.
///
/// ## Arguments
/// * 'data' - The data buffer to read from
///
/// # Errors
/// Returns [`OutOfBounds`] if the buffer is shorter than `T`'s wire width
pub fn read_le<T: LeIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely read `T` in little-endian from an offset, advancing the offset by
/// the number of bytes consumed.
///
/// ## Arguments
/// * 'data'    - The data buffer to read from
/// * 'offset'  - Read position, advanced by the amount of bytes read
///
/// # Errors
/// Returns [`OutOfBounds`] if the read would exceed the data length
pub fn read_le_at<T: LeIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Read a 2- or 4-byte little-endian index depending on `is_large`,
/// widening to `u32`. Variable-width heap and table index columns use this.
///
/// ## Arguments
/// * 'data'        - The data buffer to read from
/// * 'offset'      - Read position, advanced by the amount of bytes read
/// * `is_large`    - Indicates if 4 or 2 bytes should be read
///
/// # Errors
/// Returns [`OutOfBounds`] if the read would exceed the data length
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

/// Safely write `T` in little-endian at an offset, advancing the offset by
/// the number of bytes produced.
///
/// ## Arguments
/// * 'data'    - The mutable buffer to write into
/// * 'offset'  - Write position, advanced by the amount of bytes written
/// * 'value'   - The value to encode
///
/// # Errors
/// Returns [`OutOfBounds`] if the write would exceed the data length
pub fn write_le_at<T: LeIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let bytes = value.to_le_bytes();
    let type_len = bytes.as_ref().len();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..*offset + type_len].copy_from_slice(bytes.as_ref());
    *offset += type_len;

    Ok(())
}
