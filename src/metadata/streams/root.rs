//! Metadata root header and stream directory.
//!
//! The metadata root (`BSJB` blob) is the entry point for reading .NET
//! metadata: a signature, a version string and the directory locating the
//! heap and table streams. A PE loader hands this blob over as-is; nothing
//! in this module depends on the surrounding file container.
//!
//! # Reference
//! - ECMA-335 II.24.2.1

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// The magic signature of a metadata root: "BSJB" in little-endian
pub const METADATA_SIGNATURE: u32 = 0x424A_5342;

/// Parsed metadata root: version information and the stream directory.
///
/// # Example
///
/// ```rust
/// use metascope::metadata::streams::Root;
/// let root = Root::read(&[
///     0x42, 0x53, 0x4A, 0x42, // signature
///     0x01, 0x00, 0x01, 0x00, // major, minor
///     0x00, 0x00, 0x00, 0x00, // reserved
///     0x04, 0x00, 0x00, 0x00, // version length
///     b'v', b'4', b'.', 0x00, // version
///     0x00, 0x00,             // flags
///     0x01, 0x00,             // stream count
///     0x20, 0x00, 0x00, 0x00, // stream offset
///     0x04, 0x00, 0x00, 0x00, // stream size
///     0x23, 0x7E, 0x00, 0x00, // "#~"
///     0xCC, 0xCC, 0xCC, 0xCC, // stream bytes
/// ])?;
/// assert_eq!(root.stream_headers.len(), 1);
/// # Ok::<(), metascope::Error>(())
/// ```
#[derive(Debug)]
pub struct Root {
    /// Magic signature, always `0x424A5342`
    pub signature: u32,
    /// Major version of the metadata format
    pub major_version: u16,
    /// Minor version of the metadata format
    pub minor_version: u16,
    /// Reserved, always 0
    pub reserved: u32,
    /// Runtime version string (e.g. `v4.0.30319`)
    pub version: String,
    /// Reserved flags, always 0
    pub flags: u16,
    /// Stream directory
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Parse a metadata root from a byte slice.
    ///
    /// ## Arguments
    /// * `data` - The full metadata blob, starting at the `BSJB` signature
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong signature, an
    /// invalid version string, a duplicate stream name or a stream crossing
    /// the blob end, [`OutOfBounds`] on truncation
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != METADATA_SIGNATURE {
            return Err(malformed_error!(
                "Metadata signature does not match - {:#x}",
                signature
            ));
        }

        let mut cursor = 12_usize;
        let version_length = read_le_at::<u32>(data, &mut cursor)? as usize;
        if version_length == 0 || version_length > 255 {
            return Err(malformed_error!(
                "Invalid version string length - {}",
                version_length
            ));
        }
        if 16 + version_length > data.len() {
            return Err(OutOfBounds);
        }

        // NUL-padded to its declared length; trim at the first NUL
        let raw_version = &data[16..16 + version_length];
        let version_end = raw_version
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_length);
        let version = match std::str::from_utf8(&raw_version[..version_end]) {
            Ok(v) => v.to_string(),
            Err(_) => return Err(malformed_error!("Version string is not valid UTF-8")),
        };
        if !version.starts_with('v') {
            return Err(malformed_error!(
                "Version string '{}' must start with 'v'",
                version
            ));
        }

        let mut cursor = 16 + version_length;
        let flags = read_le_at::<u16>(data, &mut cursor)?;
        let stream_count = read_le_at::<u16>(data, &mut cursor)?;
        if stream_count == 0 || stream_count > 6 {
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut streams: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            if cursor > data.len() {
                return Err(OutOfBounds);
            }

            let header = StreamHeader::from(&data[cursor..])?;

            match u32::checked_add(header.offset, header.size) {
                Some(end) if end as usize <= data.len() => {}
                _ => {
                    return Err(malformed_error!(
                        "Stream '{}' crosses the metadata end - {} + {}",
                        header.name,
                        header.offset,
                        header.size
                    ))
                }
            }

            if streams.iter().any(|existing| existing.name == header.name) {
                return Err(malformed_error!(
                    "Duplicate stream name found: '{}'",
                    header.name
                ));
            }

            cursor += header.byte_size();
            streams.push(header);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            reserved: read_le::<u32>(&data[8..])?,
            version,
            flags,
            stream_headers: streams,
        })
    }

    /// Find a stream header by name
    ///
    /// ## Arguments
    /// * `name` - The stream name to look up (e.g. `"#Strings"`)
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}
