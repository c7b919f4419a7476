use crate::{
    metadata::{
        elements::ElementValue,
        signatures::{RecursionProtection, TypeSignature, ELEMENT_TYPE, SERIALIZATION_TYPE},
        tables::TableId,
        token::Token,
    },
    Error::{MemberResolution, UnsupportedElement},
    Parser, Result,
};

/// Resolution services the element decoder needs from its module.
///
/// `Class`/`ValueType` atoms carry tokens; decoding them requires the
/// type's full name (to recognize `System.Type`, `System.String`,
/// `System.Object`) and, for enums, the underlying primitive. The module
/// facade implements this; tests may substitute a fixture.
pub trait ElementScope {
    /// Full name (`Namespace.Name`) of a `TypeDef` or `TypeRef` token.
    ///
    /// ## Arguments
    /// * `token` - The type token to name
    ///
    /// # Errors
    /// Returns [`MemberResolution`] when the token cannot be resolved
    fn type_name(&self, token: Token) -> Result<String>;

    /// Expand a `TypeSpec` token into its type signature.
    ///
    /// ## Arguments
    /// * `token` - The `TypeSpec` token
    /// * `guard` - Recursion guard threaded through the expansion
    ///
    /// # Errors
    /// Returns [`crate::Error::SignatureRecursion`] for cyclic expansion,
    /// [`MemberResolution`] when the token cannot be resolved
    fn expand_spec(&self, token: Token, guard: &mut RecursionProtection) -> Result<TypeSignature>;

    /// Underlying primitive signature of an enum type, `None` when the
    /// token names a non-enum type.
    ///
    /// ## Arguments
    /// * `token` - The type token to inspect
    /// * `guard` - Recursion guard threaded through nested resolution
    ///
    /// # Errors
    /// Returns [`MemberResolution`] when the token cannot be resolved
    fn enum_underlying(
        &self,
        token: Token,
        guard: &mut RecursionProtection,
    ) -> Result<Option<TypeSignature>>;
}

/// Map a runtime type name to the signature it abbreviates.
///
/// Known primitive names decode to their element types; anything else is
/// carried as a [`TypeSignature::Named`] assembly-qualified name.
#[must_use]
pub(crate) fn signature_from_type_name(name: &str) -> TypeSignature {
    // assembly-qualified names carry ", AssemblyName, ..." after the type
    let type_part = name.split(',').next().unwrap_or(name).trim();

    match type_part {
        "System.Void" => TypeSignature::Void,
        "System.Boolean" => TypeSignature::Boolean,
        "System.Char" => TypeSignature::Char,
        "System.SByte" => TypeSignature::I1,
        "System.Byte" => TypeSignature::U1,
        "System.Int16" => TypeSignature::I2,
        "System.UInt16" => TypeSignature::U2,
        "System.Int32" => TypeSignature::I4,
        "System.UInt32" => TypeSignature::U4,
        "System.Int64" => TypeSignature::I8,
        "System.UInt64" => TypeSignature::U8,
        "System.Single" => TypeSignature::R4,
        "System.Double" => TypeSignature::R8,
        "System.String" => TypeSignature::String,
        "System.Object" => TypeSignature::Object,
        "System.IntPtr" => TypeSignature::I,
        "System.UIntPtr" => TypeSignature::U,
        _ => TypeSignature::Named(name.to_string()),
    }
}

/// Decode one element value described by `atom`.
///
/// ## Arguments
/// * `parser` - Cursor positioned at the element's first wire byte
/// * `atom`   - The type signature describing the element
/// * `scope`  - Token resolution services
/// * `guard`  - Recursion guard for `TypeSpec`/enum resolution
///
/// # Errors
/// Returns [`UnsupportedElement`] for element types outside the attribute
/// value grammar, [`MemberResolution`] when a `Class`/`ValueType` token
/// cannot be resolved, and read errors for truncated data
pub fn read_element(
    parser: &mut Parser,
    atom: &TypeSignature,
    scope: &dyn ElementScope,
    guard: &mut RecursionProtection,
) -> Result<ElementValue> {
    match atom {
        TypeSignature::Boolean => Ok(ElementValue::Boolean(parser.read_le::<u8>()? != 0)),
        TypeSignature::Char => {
            let unit = parser.read_le::<u16>()?;
            let character = char::from_u32(u32::from(unit)).unwrap_or('\u{FFFD}');
            Ok(ElementValue::Char(character))
        }
        TypeSignature::I1 => Ok(ElementValue::I1(parser.read_le::<i8>()?)),
        TypeSignature::U1 => Ok(ElementValue::U1(parser.read_le::<u8>()?)),
        TypeSignature::I2 => Ok(ElementValue::I2(parser.read_le::<i16>()?)),
        TypeSignature::U2 => Ok(ElementValue::U2(parser.read_le::<u16>()?)),
        TypeSignature::I4 => Ok(ElementValue::I4(parser.read_le::<i32>()?)),
        TypeSignature::U4 => Ok(ElementValue::U4(parser.read_le::<u32>()?)),
        TypeSignature::I8 => Ok(ElementValue::I8(parser.read_le::<i64>()?)),
        TypeSignature::U8 => Ok(ElementValue::U8(parser.read_le::<u64>()?)),
        TypeSignature::R4 => Ok(ElementValue::R4(parser.read_le::<f32>()?)),
        TypeSignature::R8 => Ok(ElementValue::R8(parser.read_le::<f64>()?)),
        TypeSignature::String => Ok(ElementValue::String(parser.read_ser_string()?)),
        TypeSignature::Object => {
            let tag = parser.read_le::<u8>()?;
            read_element_by_tag(parser, tag, scope, guard)
        }
        TypeSignature::Named(_) => {
            // already-resolved external type name: a System.Type atom
            let name = parser.read_ser_string()?;
            Ok(ElementValue::Type(match name {
                Some(name) => signature_from_type_name(&name),
                None => TypeSignature::Unknown,
            }))
        }
        TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
            read_resolved_element(parser, *token, scope, guard)
        }
        TypeSignature::Void => Err(UnsupportedElement(ELEMENT_TYPE::VOID)),
        TypeSignature::SzArray(_) | TypeSignature::Array(_) => {
            Err(UnsupportedElement(ELEMENT_TYPE::SZARRAY))
        }
        TypeSignature::Ptr(_) => Err(UnsupportedElement(ELEMENT_TYPE::PTR)),
        TypeSignature::ByRef(_) => Err(UnsupportedElement(ELEMENT_TYPE::BYREF)),
        TypeSignature::FnPtr(_) => Err(UnsupportedElement(ELEMENT_TYPE::FNPTR)),
        TypeSignature::GenericInst(..) => Err(UnsupportedElement(ELEMENT_TYPE::GENERICINST)),
        _ => Err(UnsupportedElement(ELEMENT_TYPE::END)),
    }
}

fn read_resolved_element(
    parser: &mut Parser,
    token: Token,
    scope: &dyn ElementScope,
    guard: &mut RecursionProtection,
) -> Result<ElementValue> {
    if token.table() == TableId::TypeSpec as u8 {
        let expanded = scope.expand_spec(token, guard)?;
        return read_element(parser, &expanded, scope, guard);
    }

    let full_name = scope.type_name(token)?;
    match full_name.as_str() {
        "System.Type" => {
            let name = parser.read_ser_string()?;
            Ok(ElementValue::Type(match name {
                Some(name) => signature_from_type_name(&name),
                None => TypeSignature::Unknown,
            }))
        }
        "System.String" => Ok(ElementValue::String(parser.read_ser_string()?)),
        "System.Object" => {
            let tag = parser.read_le::<u8>()?;
            read_element_by_tag(parser, tag, scope, guard)
        }
        _ => match scope.enum_underlying(token, guard)? {
            Some(underlying) => {
                let value = read_element(parser, &underlying, scope, guard)?;
                Ok(ElementValue::Enum(token, Box::new(value)))
            }
            None => {
                // a known primitive spelled as a value type reference
                match signature_from_type_name(&full_name) {
                    TypeSignature::Named(_) => Err(MemberResolution(token)),
                    primitive => read_element(parser, &primitive, scope, guard),
                }
            }
        },
    }
}

fn read_element_by_tag(
    parser: &mut Parser,
    tag: u8,
    scope: &dyn ElementScope,
    guard: &mut RecursionProtection,
) -> Result<ElementValue> {
    match tag {
        SERIALIZATION_TYPE::BOOLEAN => Ok(ElementValue::Boolean(parser.read_le::<u8>()? != 0)),
        SERIALIZATION_TYPE::CHAR => {
            let unit = parser.read_le::<u16>()?;
            Ok(ElementValue::Char(
                char::from_u32(u32::from(unit)).unwrap_or('\u{FFFD}'),
            ))
        }
        SERIALIZATION_TYPE::I1 => Ok(ElementValue::I1(parser.read_le::<i8>()?)),
        SERIALIZATION_TYPE::U1 => Ok(ElementValue::U1(parser.read_le::<u8>()?)),
        SERIALIZATION_TYPE::I2 => Ok(ElementValue::I2(parser.read_le::<i16>()?)),
        SERIALIZATION_TYPE::U2 => Ok(ElementValue::U2(parser.read_le::<u16>()?)),
        SERIALIZATION_TYPE::I4 => Ok(ElementValue::I4(parser.read_le::<i32>()?)),
        SERIALIZATION_TYPE::U4 => Ok(ElementValue::U4(parser.read_le::<u32>()?)),
        SERIALIZATION_TYPE::I8 => Ok(ElementValue::I8(parser.read_le::<i64>()?)),
        SERIALIZATION_TYPE::U8 => Ok(ElementValue::U8(parser.read_le::<u64>()?)),
        SERIALIZATION_TYPE::R4 => Ok(ElementValue::R4(parser.read_le::<f32>()?)),
        SERIALIZATION_TYPE::R8 => Ok(ElementValue::R8(parser.read_le::<f64>()?)),
        SERIALIZATION_TYPE::STRING => Ok(ElementValue::String(parser.read_ser_string()?)),
        SERIALIZATION_TYPE::TYPE => {
            let name = parser.read_ser_string()?;
            Ok(ElementValue::Type(match name {
                Some(name) => signature_from_type_name(&name),
                None => TypeSignature::Unknown,
            }))
        }
        SERIALIZATION_TYPE::TAGGED_OBJECT => {
            let inner_tag = parser.read_le::<u8>()?;
            read_element_by_tag(parser, inner_tag, scope, guard)
        }
        _ => Err(UnsupportedElement(tag)),
    }
}
