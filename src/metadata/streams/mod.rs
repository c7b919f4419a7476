//! The physical metadata streams: the `BSJB` root directory, the four
//! heaps and the `#~` tables stream.
//!
//! All stream types are zero-copy views over the metadata buffer; heap
//! accessors answer `None` for index 0, the absent entry of every heap.

mod blob;
mod guid;
mod root;
mod streamheader;
mod strings;
mod tablesstream;
mod userstrings;

pub use blob::Blob;
pub use guid::GuidHeap;
pub use root::{Root, METADATA_SIGNATURE};
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesstream::{TableSummary, TablesStream};
pub use userstrings::UserStrings;
