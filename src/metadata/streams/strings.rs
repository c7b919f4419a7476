//! String heap (`#Strings`) access.
//!
//! The `#Strings` heap stores identifier strings (type, method, field
//! names) as NUL-terminated UTF-8, deduplicated, with index 0 reserved for
//! the empty entry.
//!
//! # Reference
//! - ECMA-335 II.24.2.3

use std::ffi::CStr;

use crate::{Error::OutOfBounds, Result};

/// Read-only view over the `#Strings` heap.
///
/// Indexes come from metadata table columns; index 0 is the absent entry
/// and answers `None`.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::streams::Strings;
/// let data = &[0u8, b'H', b'e', b'l', b'l', b'o', 0u8];
/// let strings = Strings::from(data)?;
/// assert_eq!(strings.get(1)?, Some("Hello"));
/// assert_eq!(strings.get(0)?, None);
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a `Strings` view from the heap bytes.
    ///
    /// ## Arguments
    /// * 'data' - The heap contents
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not
    /// begin with the mandatory NUL entry
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is invalid"));
        }

        Ok(Strings { data })
    }

    /// Resolve a heap index to its string, `None` for index 0.
    ///
    /// ## Arguments
    /// * 'index' - Byte offset within the heap (from a table column)
    ///
    /// # Errors
    /// Returns [`OutOfBounds`] for an index past the heap or
    /// [`crate::Error::Malformed`] for invalid UTF-8 / missing terminator
    pub fn get(&self, index: usize) -> Result<Option<&'a str>> {
        if index == 0 {
            return Ok(None);
        }
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(raw) => match raw.to_str() {
                Ok(result) => Ok(Some(result)),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Unterminated string at index - {}", index)),
        }
    }

    /// Resolve a heap index, mapping the absent entry to `""`.
    ///
    /// ## Arguments
    /// * 'index' - Byte offset within the heap
    ///
    /// # Errors
    /// Same conditions as [`Self::get`]
    pub fn get_or_empty(&self, index: usize) -> Result<&'a str> {
        Ok(self.get(index)?.unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data: [u8; 32] = [
            0x00,
            b'<', b'M', b'o', b'd', b'u', b'l', b'e', b'>', 0x00,
            b'V', b'a', b'l', b'u', b'e', 0x00,
            b'S', b'y', b's', b't', b'e', b'm', b'.', b'E', b'n', b'u', b'm', 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        let strings = Strings::from(&data).unwrap();

        assert_eq!(strings.get(0).unwrap(), None);
        assert_eq!(strings.get(1).unwrap(), Some("<Module>"));
        assert_eq!(strings.get(10).unwrap(), Some("Value"));
        assert_eq!(strings.get(16).unwrap(), Some("System.Enum"));
        // an index into the middle of an entry is a valid suffix
        assert_eq!(strings.get(23).unwrap(), Some("Enum"));
        assert_eq!(strings.get_or_empty(0).unwrap(), "");
    }

    #[test]
    fn invalid() {
        assert!(Strings::from(&[]).is_err());
        assert!(Strings::from(&[b'x', 0x00]).is_err());

        let strings_data = [0x00u8, b'a', b'b'];
        let strings = Strings::from(&strings_data).unwrap();
        // unterminated tail
        assert!(strings.get(1).is_err());
        // past the end
        assert!(matches!(strings.get(3), Err(OutOfBounds)));
    }
}
