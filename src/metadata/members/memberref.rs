use crate::{
    metadata::{
        signatures::{SignatureField, SignatureMethod, SignatureParser, CALLING_CONVENTION},
        streams::{Blob, Strings},
        tables::MemberRefRaw,
        token::Token,
    },
    Result,
};

/// The decoded signature of a member reference: field or method, selected
/// by the blob's header byte.
#[derive(Debug, Clone)]
pub enum MemberRefSignature {
    /// The reference names a field
    Field(SignatureField),
    /// The reference names a method (possibly a vararg call site)
    Method(SignatureMethod),
}

/// A reference to a member of another type or module (`MemberRef` row).
#[derive(Debug, Clone)]
pub struct MemberReference {
    /// The defining token
    pub token: Token,
    /// Token of the owning type/module, `None` when nil
    pub class: Option<Token>,
    /// Member name
    pub name: String,
    /// Decoded field or method signature
    pub signature: MemberRefSignature,
}

impl MemberReference {
    /// Build a `MemberReference` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw `MemberRef` row
    /// * `strings` - The #Strings heap
    /// * `blob`    - The #Blob heap holding the signature
    ///
    /// # Errors
    /// Returns heap access errors and signature parsing errors
    pub fn from_row(
        row: &MemberRefRaw,
        strings: &Strings,
        blob: &Blob,
    ) -> Result<MemberReference> {
        let signature_data = blob.get(row.signature as usize)?.unwrap_or(&[]);

        let signature = match signature_data.first() {
            Some(&CALLING_CONVENTION::FIELD) => MemberRefSignature::Field(
                SignatureParser::new(signature_data).parse_field_signature()?,
            ),
            Some(_) => MemberRefSignature::Method(
                SignatureParser::new(signature_data).parse_method_signature()?,
            ),
            None => {
                return Err(malformed_error!(
                    "MemberRef {} has an empty signature",
                    row.token
                ))
            }
        };

        Ok(MemberReference {
            token: row.token,
            class: row.class.as_token(),
            name: strings.get_or_empty(row.name as usize)?.to_string(),
            signature,
        })
    }
}
