use crate::{
    metadata::{
        ranges::MetadataRange,
        signatures::{SignatureMethod, SignatureParser},
        streams::{Blob, Strings},
        tables::{MethodDefRaw, ParamRaw},
        token::Token,
    },
    Result,
};

/// A method of a type (`MethodDef` row).
#[derive(Debug, Clone)]
pub struct MethodDefinition {
    /// The defining token
    pub token: Token,
    /// RVA of the method body (0 for abstract/extern methods)
    pub rva: u32,
    /// `MethodImplAttributes` bit mask
    pub impl_flags: u16,
    /// `MethodAttributes` bit mask
    pub flags: u16,
    /// Method name
    pub name: String,
    /// Decoded method signature
    pub signature: SignatureMethod,
    /// The method's run in the Param table
    pub params: MetadataRange,
}

impl MethodDefinition {
    /// Build a `MethodDefinition` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw `MethodDef` row
    /// * `strings` - The #Strings heap
    /// * `blob`    - The #Blob heap holding the signature
    /// * `params`  - The method's parameter run
    ///
    /// # Errors
    /// Returns heap access errors and signature parsing errors
    pub fn from_row(
        row: &MethodDefRaw,
        strings: &Strings,
        blob: &Blob,
        params: MetadataRange,
    ) -> Result<MethodDefinition> {
        let signature_data = blob.get(row.signature as usize)?.unwrap_or(&[]);
        let signature = SignatureParser::new(signature_data).parse_method_signature()?;

        Ok(MethodDefinition {
            token: row.token,
            rva: row.rva,
            impl_flags: row.impl_flags,
            flags: row.flags,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
            signature,
            params,
        })
    }
}

/// A method parameter (`Param` row).
#[derive(Debug, Clone)]
pub struct ParamDefinition {
    /// The defining token
    pub token: Token,
    /// `ParamAttributes` bit mask
    pub flags: u16,
    /// 1-based position; 0 names the return value
    pub sequence: u16,
    /// Parameter name (empty for unnamed parameters)
    pub name: String,
}

impl ParamDefinition {
    /// Build a `ParamDefinition` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw Param row
    /// * `strings` - The #Strings heap
    ///
    /// # Errors
    /// Returns heap access errors for invalid name indexes
    pub fn from_row(row: &ParamRaw, strings: &Strings) -> Result<ParamDefinition> {
        Ok(ParamDefinition {
            token: row.token,
            flags: row.flags,
            sequence: row.sequence,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
        })
    }
}
