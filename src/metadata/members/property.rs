use crate::{
    metadata::{
        signatures::{SignatureParser, SignatureProperty},
        streams::{Blob, Strings},
        tables::{EventRaw, PropertyRaw},
        token::Token,
    },
    Result,
};

/// A property of a type (`Property` row).
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    /// The defining token
    pub token: Token,
    /// `PropertyAttributes` bit mask
    pub flags: u16,
    /// Property name
    pub name: String,
    /// Decoded property signature
    pub signature: SignatureProperty,
}

impl PropertyDefinition {
    /// Build a `PropertyDefinition` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw Property row
    /// * `strings` - The #Strings heap
    /// * `blob`    - The #Blob heap holding the signature
    ///
    /// # Errors
    /// Returns heap access errors and signature parsing errors
    pub fn from_row(
        row: &PropertyRaw,
        strings: &Strings,
        blob: &Blob,
    ) -> Result<PropertyDefinition> {
        let signature_data = blob.get(row.signature as usize)?.unwrap_or(&[]);
        let signature = SignatureParser::new(signature_data).parse_property_signature()?;

        Ok(PropertyDefinition {
            token: row.token,
            flags: row.flags,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
            signature,
        })
    }
}

/// An event of a type (`Event` row).
#[derive(Debug, Clone)]
pub struct EventDefinition {
    /// The defining token
    pub token: Token,
    /// `EventAttributes` bit mask
    pub flags: u16,
    /// Event name
    pub name: String,
    /// Token of the event's delegate type, `None` when nil
    pub event_type: Option<Token>,
}

impl EventDefinition {
    /// Build an `EventDefinition` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw Event row
    /// * `strings` - The #Strings heap
    ///
    /// # Errors
    /// Returns heap access errors for invalid name indexes
    pub fn from_row(row: &EventRaw, strings: &Strings) -> Result<EventDefinition> {
        Ok(EventDefinition {
            token: row.token,
            flags: row.event_flags,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
            event_type: row.event_type.as_token(),
        })
    }
}
