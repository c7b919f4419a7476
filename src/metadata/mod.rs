//! ECMA-335 metadata parsing and resolution.
//!
//! The submodules mirror the physical layout of a metadata root: the four
//! heaps and the `#~` tables stream live in [`streams`], the fixed-shape
//! row definitions and coded-index machinery in [`tables`], and the
//! resolved object layer on top of them in [`members`]. [`module::Module`]
//! ties everything together behind token lookup.

pub mod elements;
pub mod members;
pub mod module;
pub mod ranges;
pub mod signatures;
pub mod streams;
pub mod tables;
pub mod token;
