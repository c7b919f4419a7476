use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The error type covering everything this library can report.
///
/// Parsing errors identify the offending stream, table or offset in their
/// message; resolution errors carry the [`Token`] that failed. `try_*`
/// lookups on the module facade convert the single expected "not found"
/// case into `Ok(None)` — every other variant still surfaces.
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata is damaged and could not be parsed.
    ///
    /// Raised for structural inconsistencies: a `valid` bit naming a table
    /// with zero rows, a row count exceeding the RID space, overlapping
    /// streams, invalid UTF-8 in a heap, and similar. The message names the
    /// offending structure; `file`/`line` locate the detecting code.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// Description of what was malformed
        message: String,
        /// Source file in which the malformation was detected
        file: &'static str,
        /// Source line in which the malformation was detected
        line: u32,
    },

    /// A read or seek would have crossed the end of the data.
    #[error("Out of bound read would have occurred!")]
    OutOfBounds,

    /// First byte of a compressed unsigned integer carries the reserved
    /// `111` prefix (ECMA-335 II.23.2).
    #[error("Invalid compressed integer prefix - 0x{0:02x}")]
    MalformedCompressedInt(u8),

    /// A coded index decoded to a tag with no candidate table.
    #[error("Coded index tag out of range - {0}")]
    InvalidCodedIndex(u32),

    /// A token's RID exceeds the row count of its table.
    #[error("Token out of range - {0}")]
    TokenOutOfRange(Token),

    /// An element-type byte outside the set supported for custom attribute
    /// values.
    #[error("Unsupported element type - 0x{0:02x}")]
    UnsupportedElement(u8),

    /// A Class / Enum / ValueType reference needed to decode an element
    /// value could not be resolved.
    #[error("Failed to resolve member for element decoding - {0}")]
    MemberResolution(Token),

    /// A `TypeSpec` expansion re-entered a token that is already being
    /// expanded.
    #[error("Cyclic TypeSpec expansion - {0}")]
    SignatureRecursion(Token),

    /// Recursion limit reached while walking a signature blob.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// This metadata format is not supported (`#-` stream, portable PDB
    /// tables).
    #[error("This metadata format is not supported")]
    NotSupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_carries_location() {
        let err = malformed_error!("bad table - {}", 42);
        match err {
            Error::Malformed { message, file, .. } => {
                assert_eq!(message, "bad table - 42");
                assert!(file.ends_with("error.rs"));
            }
            _ => panic!("expected Malformed"),
        }
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            Error::TokenOutOfRange(Token::new(0x0200_0010)).to_string(),
            "Token out of range - 0x02000010"
        );
        assert_eq!(
            Error::UnsupportedElement(0x17).to_string(),
            "Unsupported element type - 0x17"
        );
    }
}
