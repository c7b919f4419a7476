//! Blob heap (`#Blob`) access.
//!
//! The `#Blob` heap stores binary runs (signatures, constant values,
//! public keys) as compressed-length-prefixed byte sequences, with index 0
//! reserved for the empty entry.
//!
//! # Reference
//! - ECMA-335 II.24.2.4

use crate::{Error::OutOfBounds, Parser, Result};

/// Read-only view over the `#Blob` heap.
///
/// Indexes come from metadata table columns and address the compressed
/// length prefix of an entry. Index 0 is the absent entry and answers
/// `None`.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::streams::Blob;
/// let data = &[0u8, 0x03, 0x41, 0x42, 0x43];
/// let blob = Blob::from(data)?;
/// assert_eq!(blob.get(1)?, Some(&[0x41u8, 0x42, 0x43][..]));
/// assert_eq!(blob.get(0)?, None);
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a `Blob` view from the heap bytes.
    ///
    /// ## Arguments
    /// * 'data' - The heap contents
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not
    /// begin with the mandatory NUL entry
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Resolve a heap index to its byte run, `None` for index 0.
    ///
    /// ## Arguments
    /// * 'index' - Byte offset within the heap (from a table column)
    ///
    /// # Errors
    /// Returns [`OutOfBounds`] for an index or length crossing the heap
    /// end, [`crate::Error::MalformedCompressedInt`] for an invalid length
    /// prefix
    pub fn get(&self, index: usize) -> Result<Option<&'a [u8]>> {
        if index == 0 {
            return Ok(None);
        }
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(self.data);
        parser.seek(index)?;
        let length = parser.read_compressed_uint()? as usize;

        Ok(Some(parser.read_bytes(length)?))
    }
}
