use crate::{
    metadata::{
        signatures::{SignatureField, SignatureParser},
        streams::{Blob, Strings},
        tables::FieldRaw,
        token::Token,
    },
    Result,
};

/// A field of a type (`Field` row).
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// The defining token
    pub token: Token,
    /// `FieldAttributes` bit mask
    pub flags: u16,
    /// Field name
    pub name: String,
    /// Decoded field signature
    pub signature: SignatureField,
}

impl FieldDefinition {
    /// Build a `FieldDefinition` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw Field row
    /// * `strings` - The #Strings heap
    /// * `blob`    - The #Blob heap holding the signature
    ///
    /// # Errors
    /// Returns heap access errors and signature parsing errors
    pub fn from_row(row: &FieldRaw, strings: &Strings, blob: &Blob) -> Result<FieldDefinition> {
        let signature_data = blob.get(row.signature as usize)?.unwrap_or(&[]);
        let signature = SignatureParser::new(signature_data).parse_field_signature()?;

        Ok(FieldDefinition {
            token: row.token,
            flags: row.flags,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
            signature,
        })
    }
}
