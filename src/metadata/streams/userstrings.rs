//! User string heap (`#US`) access.
//!
//! The `#US` heap stores the string literals of method bodies as
//! length-prefixed UTF-16 with a trailing flag byte. Entries are addressed
//! by the RID of `ldstr`-style string tokens (table byte 0x70).
//!
//! # Reference
//! - ECMA-335 II.24.2.4

use widestring::U16Str;

use crate::{Error::OutOfBounds, Parser, Result};

/// Read-only view over the `#US` heap.
///
/// Each entry is a compressed length followed by `length - 1` bytes of
/// UTF-16 code units and one terminal flag byte (0 or 1). Index 0 is the
/// absent entry and answers `None`.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::streams::UserStrings;
/// let data = &[0u8, 0x05, b'H', 0, b'i', 0, 0x00];
/// let us = UserStrings::from(data)?;
/// assert_eq!(us.get(1)?.map(|s| s.to_string_lossy()), Some("Hi".to_string()));
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct UserStrings<'a> {
    data: &'a [u8],
}

impl<'a> UserStrings<'a> {
    /// Create a `UserStrings` view from the heap bytes.
    ///
    /// ## Arguments
    /// * 'data' - The heap contents
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not
    /// begin with the mandatory NUL entry
    pub fn from(data: &'a [u8]) -> Result<UserStrings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #US heap is invalid"));
        }

        Ok(UserStrings { data })
    }

    /// Resolve a heap index to its UTF-16 view, `None` for index 0.
    ///
    /// The returned slice excludes the terminal flag byte.
    ///
    /// ## Arguments
    /// * 'index' - Byte offset within the heap
    ///
    /// # Errors
    /// Returns [`OutOfBounds`] for an index past the heap or
    /// [`crate::Error::Malformed`] for a length that is not `2n + 1`
    pub fn get(&self, index: usize) -> Result<Option<&'a U16Str>> {
        if index == 0 {
            return Ok(None);
        }
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(self.data);
        parser.seek(index)?;
        let length = parser.read_compressed_uint()? as usize;
        if length == 0 {
            return Ok(Some(U16Str::from_slice(&[])));
        }

        // length counts the UTF-16 bytes plus the terminal flag byte
        if length % 2 == 0 {
            return Err(malformed_error!(
                "Invalid #US entry length {} at index {}",
                length,
                index
            ));
        }

        let bytes = parser.read_bytes(length - 1)?;
        let _flag = parser.read_le::<u8>()?;

        let units = unsafe {
            #[allow(clippy::cast_ptr_alignment)]
            std::slice::from_raw_parts(bytes.as_ptr().cast::<u16>(), bytes.len() / 2)
        };

        Ok(Some(U16Str::from_slice(units)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data: [u8; 29] = [
            0x00,
            0x1B,
            b'H', 0, b'e', 0, b'l', 0, b'l', 0, b'o', 0, b',', 0, b' ', 0,
            b'C', 0, b'L', 0, b'R', 0, b'!', 0, b'!', 0, b'!', 0,
            0x00,
        ];

        let us = UserStrings::from(&data).unwrap();

        assert_eq!(us.get(0).unwrap(), None);
        let value = us.get(1).unwrap().unwrap();
        assert_eq!(value.to_string_lossy(), "Hello, CLR!!!");
    }

    #[test]
    fn invalid() {
        assert!(UserStrings::from(&[]).is_err());
        assert!(UserStrings::from(&[0x22, 0x00]).is_err());

        // even length prefix is not a valid entry
        let data = [0x00u8, 0x04, b'a', 0, b'b', 0];
        let us = UserStrings::from(&data).unwrap();
        assert!(us.get(1).is_err());

        // truncated entry
        let data = [0x00u8, 0x0B, b'a', 0];
        let us = UserStrings::from(&data).unwrap();
        assert!(matches!(us.get(1), Err(OutOfBounds)));
    }
}
