//! # metascope
//!
//! A cross-platform reader for the ECMA-335 metadata embedded in .NET PE
//! executables. metascope consumes a raw metadata root (the `BSJB` blob a PE
//! loader hands over), materializes the four heaps and the `#~` tables
//! stream, and resolves metadata tokens into a coherent, lazily constructed
//! member graph — without requiring Windows or the .NET runtime.
//!
//! # Architecture
//!
//! - **File layer**: bounds-checked little-endian reads and writes,
//!   compressed integers and length-prefixed strings ([`Parser`])
//! - **Streams**: `#Strings`, `#US`, `#GUID`, `#Blob` heaps and the `#~`
//!   tables stream with variable-width columns
//! - **Tables**: fixed-shape row definitions for every ECMA-335 table,
//!   coded-index encoding/decoding, owner-run range decoding
//! - **Members**: token-identity cached member objects (types, methods,
//!   fields, ...), linked by token rather than by pointer
//! - **Signatures**: blob grammars for method/field/property/typespec
//!   signatures and custom-attribute element values
//!
//! The main entry point is [`Module`], created from a metadata root buffer:
//!
//! ```rust,no_run
//! use metascope::{metadata::token::Token, Module};
//!
//! let data = std::fs::read("metadata.bin").unwrap();
//! let module = Module::from_metadata(data)?;
//!
//! println!("module {}", module.name()?);
//! for ty in module.top_level_types()? {
//!     println!("  {}.{}", ty.namespace, ty.name);
//! }
//! let member = module.lookup_member(Token::new(0x0200_0001))?;
//! println!("resolved {}", member.token());
//! # Ok::<(), metascope::Error>(())
//! ```
//!
//! # Thread safety
//!
//! A [`Module`] is immutable with respect to layout after creation. The
//! lazily built caches (member identity, owner-range maps, the nested-type
//! tree) use compute-then-publish initialization, so concurrent readers are
//! safe and a token resolved twice returns the same object.

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// ECMA-335 metadata: heaps, tables, tokens, signatures and members.
pub mod metadata;

pub use error::Error;
pub use file::parser::Parser;
pub use file::writer::{
    compressed_uint_size, ser_string_size, write_compressed_uint, write_ser_string, Writer,
};
pub use metadata::module::{Corlib, Module};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
