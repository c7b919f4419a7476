//! Blob-stream signature grammars: type, method, field, property,
//! local-variable, `TypeSpec` and `MethodSpec` signatures.
//!
//! Signature blobs are self-describing byte streams whose leading bytes
//! select the production; the constant modules below carry the wire values
//! of ECMA-335 II.23.1.16 (element types) and II.23.2.1 (calling
//! conventions).

mod parser;
mod types;

pub use parser::{RecursionProtection, SignatureParser};
pub use types::{
    ArrayDimension, SignatureArray, SignatureField, SignatureLocalVariable,
    SignatureLocalVariables, SignatureMethod, SignatureMethodSpec, SignatureParameter,
    SignaturePointer, SignatureProperty, SignatureSzArray, SignatureTypeSpec, TypeSignature,
};

#[allow(non_snake_case, missing_docs)]
/// Element type constants (ECMA-335 II.23.1.16)
pub mod ELEMENT_TYPE {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const PTR: u8 = 0x0F;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1B;
    pub const OBJECT: u8 = 0x1C;
    pub const SZARRAY: u8 = 0x1D;
    pub const MVAR: u8 = 0x1E;
    pub const CMOD_REQD: u8 = 0x1F;
    pub const CMOD_OPT: u8 = 0x20;
    pub const INTERNAL: u8 = 0x21;
    pub const MODIFIER: u8 = 0x40;
    pub const SENTINEL: u8 = 0x41;
    pub const PINNED: u8 = 0x45;
}

#[allow(non_snake_case, missing_docs)]
/// Calling convention constants of the method signature header byte
/// (ECMA-335 II.23.2.1 and II.15.3)
pub mod CALLING_CONVENTION {
    /// Mask selecting the convention kind in the low nibble
    pub const KIND_MASK: u8 = 0x0F;
    pub const DEFAULT: u8 = 0x00;
    pub const C: u8 = 0x01;
    pub const STDCALL: u8 = 0x02;
    pub const THISCALL: u8 = 0x03;
    pub const FASTCALL: u8 = 0x04;
    pub const VARARG: u8 = 0x05;
    /// Header byte of a field signature
    pub const FIELD: u8 = 0x06;
    /// Header byte of a local variable signature
    pub const LOCAL_SIG: u8 = 0x07;
    /// Header bit of a property signature
    pub const PROPERTY: u8 = 0x08;
    /// Header byte of a method specification instantiation
    pub const GENERICINST: u8 = 0x0A;
    /// The method carries generic parameters
    pub const GENERIC: u8 = 0x10;
    /// The method takes a `this` pointer
    pub const HASTHIS: u8 = 0x20;
    /// The `this` pointer type is spelled out in the signature
    pub const EXPLICITTHIS: u8 = 0x40;
}

#[allow(non_snake_case, missing_docs)]
/// Serialization type tags used inside custom attribute blobs
/// (ECMA-335 II.23.3)
pub mod SERIALIZATION_TYPE {
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const SZARRAY: u8 = 0x1D;
    /// `System.Type` argument, serialized as its assembly-qualified name
    pub const TYPE: u8 = 0x50;
    /// Boxed argument: a tag byte follows, then the value
    pub const TAGGED_OBJECT: u8 = 0x51;
    /// Named argument is a field
    pub const FIELD: u8 = 0x53;
    /// Named argument is a property
    pub const PROPERTY: u8 = 0x54;
    /// Enum argument: the type name follows, then the underlying value
    pub const ENUM: u8 = 0x55;
}
