use crate::{
    file::writer::{ser_string_size, write_ser_string},
    metadata::{elements::ElementValue, signatures::TypeSignature},
    Error::{MemberResolution, UnsupportedElement},
    Result,
};

/// Runtime type name of a signature, for serializing `System.Type` atoms.
///
/// Token-carrying signatures cannot be named without resolution context
/// and are refused rather than guessed.
fn type_name_of(signature: &TypeSignature) -> Result<Option<String>> {
    let name = match signature {
        TypeSignature::Unknown => return Ok(None),
        TypeSignature::Void => "System.Void",
        TypeSignature::Boolean => "System.Boolean",
        TypeSignature::Char => "System.Char",
        TypeSignature::I1 => "System.SByte",
        TypeSignature::U1 => "System.Byte",
        TypeSignature::I2 => "System.Int16",
        TypeSignature::U2 => "System.UInt16",
        TypeSignature::I4 => "System.Int32",
        TypeSignature::U4 => "System.UInt32",
        TypeSignature::I8 => "System.Int64",
        TypeSignature::U8 => "System.UInt64",
        TypeSignature::R4 => "System.Single",
        TypeSignature::R8 => "System.Double",
        TypeSignature::String => "System.String",
        TypeSignature::Object => "System.Object",
        TypeSignature::I => "System.IntPtr",
        TypeSignature::U => "System.UIntPtr",
        TypeSignature::Named(name) => return Ok(Some(name.clone())),
        TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
            return Err(MemberResolution(*token))
        }
        _ => return Err(UnsupportedElement(0)),
    };

    Ok(Some(name.to_string()))
}

/// Serialize one element value into its wire form.
///
/// The output inverts [`crate::metadata::elements::read_element`]:
/// primitives in their natural width, strings as SerStrings, enums as
/// their underlying primitive, `Type` atoms as the SerString of their
/// assembly-qualified name.
///
/// ## Arguments
/// * `value`  - The element to serialize
/// * `buffer` - Output buffer the wire bytes are appended to
///
/// # Errors
/// Returns [`MemberResolution`] for a `Type` atom still carrying an
/// unresolved token and [`UnsupportedElement`] for signatures outside the
/// atom grammar
pub fn write_element(value: &ElementValue, buffer: &mut Vec<u8>) -> Result<()> {
    match value {
        ElementValue::Boolean(v) => buffer.push(u8::from(*v)),
        ElementValue::Char(v) => {
            let mut units = [0u16; 2];
            let encoded = v.encode_utf16(&mut units);
            // atoms are single UTF-16 units; surrogate pairs cannot appear
            buffer.extend_from_slice(&encoded[0].to_le_bytes());
        }
        ElementValue::I1(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U1(v) => buffer.push(*v),
        ElementValue::I2(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U2(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::I4(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U4(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::I8(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U8(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::R4(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::R8(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::String(v) => write_ser_string(v.as_deref(), buffer)?,
        ElementValue::Type(signature) => {
            let name = type_name_of(signature)?;
            write_ser_string(name.as_deref(), buffer)?;
        }
        ElementValue::Enum(_, inner) => write_element(inner, buffer)?,
    }

    Ok(())
}

/// Predict the wire size of an element without serializing it.
///
/// ## Arguments
/// * `value` - The element to measure
///
/// # Errors
/// Same conditions as [`write_element`]
pub fn element_size(value: &ElementValue) -> Result<u32> {
    Ok(match value {
        ElementValue::Boolean(_) | ElementValue::I1(_) | ElementValue::U1(_) => 1,
        ElementValue::Char(_) | ElementValue::I2(_) | ElementValue::U2(_) => 2,
        ElementValue::I4(_) | ElementValue::U4(_) | ElementValue::R4(_) => 4,
        ElementValue::I8(_) | ElementValue::U8(_) | ElementValue::R8(_) => 8,
        ElementValue::String(v) => ser_string_size(v.as_deref()),
        ElementValue::Type(signature) => ser_string_size(type_name_of(signature)?.as_deref()),
        ElementValue::Enum(_, inner) => element_size(inner)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        elements::{read_element, ElementScope},
        signatures::RecursionProtection,
        token::Token,
    };
    use crate::Parser;

    struct EnumScope;

    impl ElementScope for EnumScope {
        fn type_name(&self, token: Token) -> Result<String> {
            match token.value() {
                0x0200_0001 => Ok("Palette.Colors".to_string()),
                _ => Err(MemberResolution(token)),
            }
        }

        fn expand_spec(
            &self,
            token: Token,
            _guard: &mut RecursionProtection,
        ) -> Result<TypeSignature> {
            Err(MemberResolution(token))
        }

        fn enum_underlying(
            &self,
            token: Token,
            _guard: &mut RecursionProtection,
        ) -> Result<Option<TypeSignature>> {
            match token.value() {
                0x0200_0001 => Ok(Some(TypeSignature::I2)),
                _ => Err(MemberResolution(token)),
            }
        }
    }

    fn roundtrip(value: &ElementValue, atom: &TypeSignature) {
        let mut buffer = Vec::new();
        write_element(value, &mut buffer).unwrap();
        assert_eq!(buffer.len() as u32, element_size(value).unwrap());

        let mut parser = Parser::new(&buffer);
        let mut guard = RecursionProtection::new();
        let decoded = read_element(&mut parser, atom, &EnumScope, &mut guard).unwrap();
        assert_eq!(&decoded, value);
        assert_eq!(parser.pos(), buffer.len(), "trailing bytes after {value:?}");
    }

    #[test]
    fn roundtrip_primitives() {
        roundtrip(&ElementValue::Boolean(true), &TypeSignature::Boolean);
        roundtrip(&ElementValue::Boolean(false), &TypeSignature::Boolean);
        roundtrip(&ElementValue::Char('Ω'), &TypeSignature::Char);
        roundtrip(&ElementValue::I1(-5), &TypeSignature::I1);
        roundtrip(&ElementValue::U1(200), &TypeSignature::U1);
        roundtrip(&ElementValue::I2(-3000), &TypeSignature::I2);
        roundtrip(&ElementValue::U2(60000), &TypeSignature::U2);
        roundtrip(&ElementValue::I4(i32::MIN), &TypeSignature::I4);
        roundtrip(&ElementValue::U4(u32::MAX), &TypeSignature::U4);
        roundtrip(&ElementValue::I8(i64::MAX), &TypeSignature::I8);
        roundtrip(&ElementValue::U8(u64::MAX), &TypeSignature::U8);
        roundtrip(&ElementValue::R4(3.5), &TypeSignature::R4);
        roundtrip(&ElementValue::R8(-0.25), &TypeSignature::R8);
    }

    #[test]
    fn roundtrip_strings() {
        roundtrip(
            &ElementValue::String(Some("hello".to_string())),
            &TypeSignature::String,
        );
        roundtrip(
            &ElementValue::String(Some(String::new())),
            &TypeSignature::String,
        );
        roundtrip(&ElementValue::String(None), &TypeSignature::String);
    }

    #[test]
    fn roundtrip_enum() {
        let atom = TypeSignature::ValueType(Token::new(0x0200_0001));
        roundtrip(
            &ElementValue::Enum(
                Token::new(0x0200_0001),
                Box::new(ElementValue::I2(7)),
            ),
            &atom,
        );
    }

    #[test]
    fn type_atom_names() {
        let mut buffer = Vec::new();
        write_element(&ElementValue::Type(TypeSignature::I4), &mut buffer).unwrap();
        assert_eq!(buffer[0] as usize, "System.Int32".len());
        assert_eq!(&buffer[1..], b"System.Int32");

        buffer.clear();
        write_element(
            &ElementValue::Type(TypeSignature::Named("A.B".to_string())),
            &mut buffer,
        )
        .unwrap();
        assert_eq!(&buffer[1..], b"A.B");

        // unresolved token refuses to serialize
        let unresolved = ElementValue::Type(TypeSignature::Class(Token::new(0x0100_0009)));
        assert!(write_element(&unresolved, &mut Vec::new()).is_err());
        assert!(element_size(&unresolved).is_err());
    }
}
