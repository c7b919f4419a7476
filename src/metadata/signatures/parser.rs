use rustc_hash::FxHashSet;

use crate::{
    metadata::{
        signatures::{
            SignatureArray, SignatureField, SignatureLocalVariable, SignatureLocalVariables,
            SignatureMethod, SignatureMethodSpec, SignatureParameter, SignaturePointer,
            SignatureProperty, SignatureSzArray, SignatureTypeSpec, TypeSignature, ArrayDimension,
            CALLING_CONVENTION, ELEMENT_TYPE,
        },
        token::Token,
    },
    Error::{RecursionLimit, SignatureRecursion},
    Parser, Result,
};

/// Maximum nesting depth while walking a single signature blob
const MAX_RECURSION_DEPTH: usize = 50;

/// Guard against cyclic `TypeSpec` expansion.
///
/// A `TypeSpec` signature may reference another `TypeSpec` by token;
/// resolving such references re-enters signature decoding, and a malformed
/// image can close the loop. The guard tracks the set of `TypeSpec` tokens
/// currently being expanded: entering an already-active token fails with
/// [`SignatureRecursion`] instead of looping.
#[derive(Default)]
pub struct RecursionProtection {
    active: FxHashSet<Token>,
}

impl RecursionProtection {
    /// Create an empty guard
    #[must_use]
    pub fn new() -> Self {
        RecursionProtection::default()
    }

    /// Mark `token` as currently expanding.
    ///
    /// ## Arguments
    /// * `token` - The `TypeSpec` token being entered
    ///
    /// # Errors
    /// Returns [`SignatureRecursion`] if the token is already expanding
    pub fn enter(&mut self, token: Token) -> Result<()> {
        if !self.active.insert(token) {
            return Err(SignatureRecursion(token));
        }
        Ok(())
    }

    /// Unmark `token` after its expansion completed
    ///
    /// ## Arguments
    /// * `token` - The `TypeSpec` token being left
    pub fn leave(&mut self, token: Token) {
        self.active.remove(&token);
    }
}

/// Parser over a single signature blob.
///
/// One instance decodes one blob; the cursor is not reusable across
/// signatures.
///
/// # Example
///
/// ```rust
/// use metascope::metadata::signatures::SignatureParser;
/// let data = &[0x20, 0x01, 0x01, 0x0E];
/// let mut parser = SignatureParser::new(data);
/// let sig = parser.parse_method_signature()?;
/// assert!(sig.has_this);
/// assert_eq!(sig.params.len(), 1);
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a `SignatureParser` over a blob
    ///
    /// ## Arguments
    /// * 'data' - The signature blob bytes
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    /// Parse a single type production.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for unknown element bytes,
    /// [`RecursionLimit`] for a blob nested past the depth bound
    pub fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<TypeSignature> {
        let element = self.parser.read_le::<u8>()?;
        match element {
            ELEMENT_TYPE::VOID => Ok(TypeSignature::Void),
            ELEMENT_TYPE::BOOLEAN => Ok(TypeSignature::Boolean),
            ELEMENT_TYPE::CHAR => Ok(TypeSignature::Char),
            ELEMENT_TYPE::I1 => Ok(TypeSignature::I1),
            ELEMENT_TYPE::U1 => Ok(TypeSignature::U1),
            ELEMENT_TYPE::I2 => Ok(TypeSignature::I2),
            ELEMENT_TYPE::U2 => Ok(TypeSignature::U2),
            ELEMENT_TYPE::I4 => Ok(TypeSignature::I4),
            ELEMENT_TYPE::U4 => Ok(TypeSignature::U4),
            ELEMENT_TYPE::I8 => Ok(TypeSignature::I8),
            ELEMENT_TYPE::U8 => Ok(TypeSignature::U8),
            ELEMENT_TYPE::R4 => Ok(TypeSignature::R4),
            ELEMENT_TYPE::R8 => Ok(TypeSignature::R8),
            ELEMENT_TYPE::STRING => Ok(TypeSignature::String),
            ELEMENT_TYPE::PTR => Ok(TypeSignature::Ptr(SignaturePointer {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            })),
            ELEMENT_TYPE::BYREF => Ok(TypeSignature::ByRef(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::VALUETYPE => Ok(TypeSignature::ValueType(
                self.parser.read_compressed_token()?,
            )),
            ELEMENT_TYPE::CLASS => Ok(TypeSignature::Class(self.parser.read_compressed_token()?)),
            ELEMENT_TYPE::VAR => Ok(TypeSignature::GenericParamType(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::ARRAY => {
                let elem_type = self.parse_type()?;
                let rank = self.parser.read_compressed_uint()?;

                let num_sizes = self.parser.read_compressed_uint()?;
                let mut dimensions: Vec<ArrayDimension> = Vec::with_capacity(num_sizes as usize);
                for _ in 0..num_sizes {
                    dimensions.push(ArrayDimension {
                        size: Some(self.parser.read_compressed_uint()?),
                        lower_bound: None,
                    });
                }

                let num_lo_bounds = self.parser.read_compressed_uint()?;
                for i in 0..num_lo_bounds {
                    if let Some(dimension) = dimensions.get_mut(i as usize) {
                        dimension.lower_bound = Some(self.parser.read_compressed_uint()?);
                    }
                }

                Ok(TypeSignature::Array(SignatureArray {
                    base: Box::new(elem_type),
                    rank,
                    dimensions,
                }))
            }
            ELEMENT_TYPE::GENERICINST => {
                let peek_byte = self.parser.peek_byte()?;
                if peek_byte != ELEMENT_TYPE::CLASS && peek_byte != ELEMENT_TYPE::VALUETYPE {
                    return Err(malformed_error!(
                        "GENERICINST base is not CLASS or VALUETYPE - {:#04x}",
                        peek_byte
                    ));
                }

                let base_type = self.parse_type()?;
                let arg_count = self.parser.read_compressed_uint()?;

                let mut type_args = Vec::with_capacity(arg_count as usize);
                for _ in 0..arg_count {
                    type_args.push(self.parse_type()?);
                }

                Ok(TypeSignature::GenericInst(Box::new(base_type), type_args))
            }
            ELEMENT_TYPE::TYPEDBYREF => Ok(TypeSignature::TypedByRef),
            ELEMENT_TYPE::I => Ok(TypeSignature::I),
            ELEMENT_TYPE::U => Ok(TypeSignature::U),
            ELEMENT_TYPE::FNPTR => Ok(TypeSignature::FnPtr(Box::new(
                self.parse_method_signature()?,
            ))),
            ELEMENT_TYPE::OBJECT => Ok(TypeSignature::Object),
            ELEMENT_TYPE::SZARRAY => Ok(TypeSignature::SzArray(SignatureSzArray {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            })),
            ELEMENT_TYPE::MVAR => Ok(TypeSignature::GenericParamMethod(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::CMOD_REQD => {
                Ok(TypeSignature::ModifiedRequired(self.parse_custom_mods()?))
            }
            ELEMENT_TYPE::CMOD_OPT => {
                Ok(TypeSignature::ModifiedOptional(self.parse_custom_mods()?))
            }
            ELEMENT_TYPE::INTERNAL => Ok(TypeSignature::Internal),
            ELEMENT_TYPE::SENTINEL => Ok(TypeSignature::Sentinel),
            ELEMENT_TYPE::PINNED => Ok(TypeSignature::Pinned(Box::new(self.parse_type()?))),
            _ => Err(malformed_error!(
                "Unsupported element type in signature - {:#04x}",
                element
            )),
        }
    }

    /// Parse a run of custom modifiers (`CMOD_OPT` / `CMOD_REQD`)
    fn parse_custom_mods(&mut self) -> Result<Vec<Token>> {
        let mut mods = Vec::new();

        while self.parser.has_more_data() {
            let next_byte = self.parser.peek_byte()?;
            if next_byte != ELEMENT_TYPE::CMOD_OPT && next_byte != ELEMENT_TYPE::CMOD_REQD {
                break;
            }

            self.parser.advance()?;
            mods.push(self.parser.read_compressed_token()?);
        }

        Ok(mods)
    }

    /// Parse one parameter (the return type counts as a parameter)
    fn parse_param(&mut self) -> Result<SignatureParameter> {
        let custom_mods = self.parse_custom_mods()?;

        let mut by_ref = false;
        if self.parser.peek_byte()? == ELEMENT_TYPE::BYREF {
            self.parser.advance()?;
            by_ref = true;
        }

        Ok(SignatureParameter {
            modifiers: custom_mods,
            by_ref,
            base: self.parse_type()?,
        })
    }

    /// Parse a method signature - `MethodDefSig`, `MethodRefSig` or
    /// `StandAloneMethodSig`.
    ///
    /// A `SENTINEL` element inside the parameter list splits it: every
    /// parameter after the sentinel lands in `varargs` (used by vararg
    /// call sites).
    ///
    /// # Errors
    /// Returns parsing errors for malformed or truncated blobs
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let convention = self.parser.read_le::<u8>()?;
        let kind = convention & CALLING_CONVENTION::KIND_MASK;

        let mut method = SignatureMethod {
            has_this: convention & CALLING_CONVENTION::HASTHIS != 0,
            explicit_this: convention & CALLING_CONVENTION::EXPLICITTHIS != 0,
            default: kind == CALLING_CONVENTION::DEFAULT,
            vararg: kind == CALLING_CONVENTION::VARARG,
            cdecl: kind == CALLING_CONVENTION::C,
            stdcall: kind == CALLING_CONVENTION::STDCALL,
            thiscall: kind == CALLING_CONVENTION::THISCALL,
            fastcall: kind == CALLING_CONVENTION::FASTCALL,
            param_count_generic: if convention & CALLING_CONVENTION::GENERIC != 0 {
                self.parser.read_compressed_uint()?
            } else {
                0
            },
            param_count: self.parser.read_compressed_uint()?,
            return_type: self.parse_param()?,
            params: Vec::new(),
            varargs: Vec::new(),
        };

        let mut sentinel = false;
        let mut parsed = 0;
        while parsed < method.param_count {
            if !sentinel && self.parser.peek_byte()? == ELEMENT_TYPE::SENTINEL {
                self.parser.advance()?;
                sentinel = true;
                continue;
            }

            let param = self.parse_param()?;
            if sentinel {
                method.varargs.push(param);
            } else {
                method.params.push(param);
            }
            parsed += 1;
        }

        Ok(method)
    }

    /// Parse a field signature (ECMA-335 II.23.2.4)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong header byte
    pub fn parse_field_signature(&mut self) -> Result<SignatureField> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != CALLING_CONVENTION::FIELD {
            return Err(malformed_error!(
                "Field signature has invalid header - {:#04x}",
                head_byte
            ));
        }

        Ok(SignatureField {
            modifiers: self.parse_custom_mods()?,
            base: self.parse_type()?,
        })
    }

    /// Parse a property signature (ECMA-335 II.23.2.5)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong header byte
    pub fn parse_property_signature(&mut self) -> Result<SignatureProperty> {
        let head_byte = self.parser.read_le::<u8>()?;
        if (head_byte & CALLING_CONVENTION::PROPERTY) == 0 {
            return Err(malformed_error!(
                "Property signature has invalid header - {:#04x}",
                head_byte
            ));
        }

        let has_this = (head_byte & CALLING_CONVENTION::HASTHIS) != 0;

        let param_count = self.parser.read_compressed_uint()?;
        let custom_mods = self.parse_custom_mods()?;
        let type_sig = self.parse_type()?;

        let mut params = Vec::with_capacity(param_count as usize);
        for _ in 0..param_count {
            params.push(self.parse_param()?);
        }

        Ok(SignatureProperty {
            has_this,
            modifiers: custom_mods,
            base: type_sig,
            params,
        })
    }

    /// Parse a local variable signature (ECMA-335 II.23.2.6)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong header byte
    pub fn parse_local_var_signature(&mut self) -> Result<SignatureLocalVariables> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != CALLING_CONVENTION::LOCAL_SIG {
            return Err(malformed_error!(
                "Local variable signature has invalid header - {:#04x}",
                head_byte
            ));
        }

        let count = self.parser.read_compressed_uint()?;

        let mut locals = Vec::with_capacity(count as usize);
        for _ in 0..count {
            if self.parser.peek_byte()? == ELEMENT_TYPE::TYPEDBYREF {
                self.parser.advance()?;
                locals.push(SignatureLocalVariable {
                    modifiers: Vec::new(),
                    is_byref: false,
                    is_pinned: false,
                    base: TypeSignature::TypedByRef,
                });
                continue;
            }

            let mut custom_mods = Vec::new();
            let mut pinned = false;

            // modifiers and the PINNED constraint may interleave
            while self.parser.has_more_data() {
                match self.parser.peek_byte()? {
                    ELEMENT_TYPE::CMOD_OPT | ELEMENT_TYPE::CMOD_REQD => {
                        self.parser.advance()?;
                        custom_mods.push(self.parser.read_compressed_token()?);
                    }
                    ELEMENT_TYPE::PINNED => {
                        self.parser.advance()?;
                        pinned = true;
                    }
                    _ => break,
                }
            }

            let by_ref = if self.parser.peek_byte()? == ELEMENT_TYPE::BYREF {
                self.parser.advance()?;
                true
            } else {
                false
            };

            locals.push(SignatureLocalVariable {
                modifiers: custom_mods,
                is_byref: by_ref,
                is_pinned: pinned,
                base: self.parse_type()?,
            });
        }

        Ok(SignatureLocalVariables { locals })
    }

    /// Parse a type specification signature (ECMA-335 II.23.2.14)
    ///
    /// # Errors
    /// Returns parsing errors for malformed blobs
    pub fn parse_type_spec_signature(&mut self) -> Result<SignatureTypeSpec> {
        Ok(SignatureTypeSpec {
            base: self.parse_type()?,
        })
    }

    /// Parse a method specification signature (ECMA-335 II.23.2.15)
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a wrong header byte
    pub fn parse_method_spec_signature(&mut self) -> Result<SignatureMethodSpec> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != CALLING_CONVENTION::GENERICINST {
            return Err(malformed_error!(
                "MethodSpec signature has invalid header - {:#04x}",
                head_byte
            ));
        }

        let arg_count = self.parser.read_compressed_uint()?;
        let mut generic_args = Vec::with_capacity(arg_count as usize);
        for _ in 0..arg_count {
            generic_args.push(self.parse_type()?);
        }

        Ok(SignatureMethodSpec { generic_args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_types() {
        let test_cases = [
            (vec![0x01], TypeSignature::Void),
            (vec![0x02], TypeSignature::Boolean),
            (vec![0x03], TypeSignature::Char),
            (vec![0x04], TypeSignature::I1),
            (vec![0x05], TypeSignature::U1),
            (vec![0x06], TypeSignature::I2),
            (vec![0x07], TypeSignature::U2),
            (vec![0x08], TypeSignature::I4),
            (vec![0x09], TypeSignature::U4),
            (vec![0x0A], TypeSignature::I8),
            (vec![0x0B], TypeSignature::U8),
            (vec![0x0C], TypeSignature::R4),
            (vec![0x0D], TypeSignature::R8),
            (vec![0x0E], TypeSignature::String),
            (vec![0x1C], TypeSignature::Object),
            (vec![0x18], TypeSignature::I),
            (vec![0x19], TypeSignature::U),
        ];

        for (bytes, expected) in test_cases {
            let mut parser = SignatureParser::new(&bytes);
            assert_eq!(parser.parse_type().unwrap(), expected);
        }
    }

    #[test]
    fn class_and_valuetype() {
        let mut parser = SignatureParser::new(&[0x12, 0x42]);
        assert_eq!(
            parser.parse_type().unwrap(),
            TypeSignature::Class(Token::new(0x1B00_0010))
        );

        let mut parser = SignatureParser::new(&[0x11, 0x35]);
        assert_eq!(
            parser.parse_type().unwrap(),
            TypeSignature::ValueType(Token::new(0x0100_000D))
        );

        let mut parser = SignatureParser::new(&[0x13, 0x03]);
        assert_eq!(
            parser.parse_type().unwrap(),
            TypeSignature::GenericParamType(3)
        );
    }

    #[test]
    fn arrays() {
        let mut parser = SignatureParser::new(&[0x1D, 0x08]);
        let result = parser.parse_type().unwrap();
        let TypeSignature::SzArray(inner) = result else {
            panic!("expected SzArray");
        };
        assert_eq!(*inner.base, TypeSignature::I4);

        let mut parser = SignatureParser::new(&[
            0x14, // ARRAY
            0x08, // I4
            0x02, // rank 2
            0x02, // 2 sizes
            0x02, 0x03, // sizes 2, 3
            0x00, // no lower bounds
        ]);
        let TypeSignature::Array(array) = parser.parse_type().unwrap() else {
            panic!("expected Array");
        };
        assert_eq!(*array.base, TypeSignature::I4);
        assert_eq!(array.rank, 2);
        assert_eq!(array.dimensions.len(), 2);
        assert_eq!(array.dimensions[0].size, Some(2));
        assert_eq!(array.dimensions[1].size, Some(3));
    }

    #[test]
    fn pointers_and_byref() {
        let mut parser = SignatureParser::new(&[0x0F, 0x08]);
        let TypeSignature::Ptr(inner) = parser.parse_type().unwrap() else {
            panic!("expected Ptr");
        };
        assert_eq!(*inner.base, TypeSignature::I4);

        let mut parser = SignatureParser::new(&[0x10, 0x08]);
        let TypeSignature::ByRef(inner) = parser.parse_type().unwrap() else {
            panic!("expected ByRef");
        };
        assert_eq!(*inner, TypeSignature::I4);
    }

    #[test]
    fn generic_instance() {
        let mut parser = SignatureParser::new(&[
            0x15, // GENERICINST
            0x12, 0x2A, // Class token
            0x02, // 2 type args
            0x0E, // String
            0x08, // I4
        ]);

        let TypeSignature::GenericInst(class, args) = parser.parse_type().unwrap() else {
            panic!("expected GenericInst");
        };
        assert!(matches!(*class, TypeSignature::Class(_)));
        assert_eq!(args, vec![TypeSignature::String, TypeSignature::I4]);

        // invalid base
        let mut parser = SignatureParser::new(&[0x15, 0x08]);
        assert!(parser.parse_type().is_err());
    }

    #[test]
    fn method_signature_plain() {
        // instance string Method(int32, bool)
        let mut parser = SignatureParser::new(&[0x20, 0x02, 0x0E, 0x08, 0x02]);
        let method = parser.parse_method_signature().unwrap();

        assert!(method.has_this);
        assert!(method.default);
        assert!(!method.vararg);
        assert_eq!(method.param_count, 2);
        assert_eq!(method.return_type.base, TypeSignature::String);
        assert_eq!(method.params.len(), 2);
        assert_eq!(method.params[0].base, TypeSignature::I4);
        assert_eq!(method.params[1].base, TypeSignature::Boolean);
        assert!(method.varargs.is_empty());
    }

    #[test]
    fn method_signature_generic() {
        // T Method<T>(ref T)
        let mut parser = SignatureParser::new(&[
            0x30, // HASTHIS | GENERIC
            0x01, // 1 generic parameter
            0x01, // 1 parameter
            0x13, 0x00, // return: VAR 0
            0x10, 0x13, 0x00, // param: BYREF VAR 0
        ]);
        let method = parser.parse_method_signature().unwrap();

        assert_eq!(method.param_count_generic, 1);
        assert_eq!(method.return_type.base, TypeSignature::GenericParamType(0));
        assert!(method.params[0].by_ref);
    }

    #[test]
    fn method_signature_vararg_sentinel() {
        // vararg void Call(int32, ..., string, string)
        let mut parser = SignatureParser::new(&[
            0x05, // VARARG
            0x03, // 3 params
            0x01, // void return
            0x08, // int32
            0x41, // SENTINEL
            0x0E, // string
            0x0E, // string
        ]);
        let method = parser.parse_method_signature().unwrap();

        assert!(method.vararg);
        assert_eq!(method.params.len(), 1);
        assert_eq!(method.varargs.len(), 2);
        assert_eq!(method.varargs[0].base, TypeSignature::String);
    }

    #[test]
    fn field_signature() {
        let mut parser = SignatureParser::new(&[0x06, 0x08]);
        let field = parser.parse_field_signature().unwrap();
        assert_eq!(field.base, TypeSignature::I4);

        let mut parser = SignatureParser::new(&[0x07, 0x08]);
        assert!(parser.parse_field_signature().is_err());
    }

    #[test]
    fn property_signature() {
        // instance int32 Item(string)
        let mut parser = SignatureParser::new(&[0x28, 0x01, 0x08, 0x0E]);
        let property = parser.parse_property_signature().unwrap();
        assert!(property.has_this);
        assert_eq!(property.base, TypeSignature::I4);
        assert_eq!(property.params.len(), 1);
    }

    #[test]
    fn local_var_signature() {
        // locals: pinned byte*, int32
        let mut parser = SignatureParser::new(&[
            0x07, // LOCAL_SIG
            0x02, // 2 locals
            0x45, 0x0F, 0x05, // PINNED, PTR U1
            0x08, // I4
        ]);
        let locals = parser.parse_local_var_signature().unwrap();
        assert_eq!(locals.locals.len(), 2);
        assert!(locals.locals[0].is_pinned);
        assert!(!locals.locals[1].is_pinned);
        assert_eq!(locals.locals[1].base, TypeSignature::I4);
    }

    #[test]
    fn method_spec_signature() {
        let mut parser = SignatureParser::new(&[0x0A, 0x02, 0x08, 0x0E]);
        let spec = parser.parse_method_spec_signature().unwrap();
        assert_eq!(
            spec.generic_args,
            vec![TypeSignature::I4, TypeSignature::String]
        );
    }

    #[test]
    fn custom_mods() {
        let mut parser = SignatureParser::new(&[
            0x20, 0x42, // CMOD_OPT, TypeSpec token
            0x1F, 0x49, // CMOD_REQD, TypeRef token
            0x08, // I4
        ]);

        let mods = parser.parse_custom_mods().unwrap();
        assert_eq!(mods, vec![Token::new(0x1B00_0010), Token::new(0x0100_0012)]);
        assert_eq!(parser.parse_type().unwrap(), TypeSignature::I4);
    }

    #[test]
    fn recursion_guard() {
        let mut guard = RecursionProtection::new();
        let token = Token::new(0x1B00_0001);

        guard.enter(token).unwrap();
        assert!(matches!(
            guard.enter(token),
            Err(SignatureRecursion(t)) if t == token
        ));
        guard.leave(token);
        guard.enter(token).unwrap();
    }

    #[test]
    fn depth_limit() {
        // deeply nested byref chain
        let mut blob = vec![0x10u8; MAX_RECURSION_DEPTH + 4];
        blob.push(0x08);
        let mut parser = SignatureParser::new(&blob);
        assert!(matches!(parser.parse_type(), Err(RecursionLimit(_))));
    }

    #[test]
    fn unknown_element() {
        let mut parser = SignatureParser::new(&[0x3F]);
        assert!(parser.parse_type().is_err());
    }
}
