use crate::{
    metadata::{
        streams::{Blob, Strings},
        tables::{AssemblyRefRaw, ModuleRefRaw},
        token::Token,
    },
    Result,
};

/// Four-part assembly version, ordered (major, minor, build, revision).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AssemblyVersion {
    /// Major version number
    pub major: u16,
    /// Minor version number
    pub minor: u16,
    /// Build number
    pub build: u16,
    /// Revision number
    pub revision: u16,
}

impl AssemblyVersion {
    /// Create a version from its four components
    #[must_use]
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        AssemblyVersion {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl std::fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// A reference to an external assembly (`AssemblyRef` row).
#[derive(Debug, Clone)]
pub struct AssemblyReference {
    /// The defining token
    pub token: Token,
    /// Simple name of the assembly
    pub name: String,
    /// Referenced version
    pub version: AssemblyVersion,
    /// `AssemblyFlags` bit mask
    pub flags: u32,
    /// Public key or its 8-byte token, empty when unsigned
    pub public_key_or_token: Vec<u8>,
    /// Culture name, `None` for culture-neutral references
    pub culture: Option<String>,
}

impl AssemblyReference {
    /// Build an `AssemblyReference` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw `AssemblyRef` row
    /// * `strings` - The #Strings heap
    /// * `blob`    - The #Blob heap holding the public key
    ///
    /// # Errors
    /// Returns heap access errors for invalid indexes
    pub fn from_row(
        row: &AssemblyRefRaw,
        strings: &Strings,
        blob: &Blob,
    ) -> Result<AssemblyReference> {
        Ok(AssemblyReference {
            token: row.token,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
            version: AssemblyVersion::new(
                row.major_version,
                row.minor_version,
                row.build_number,
                row.revision_number,
            ),
            flags: row.flags,
            public_key_or_token: blob
                .get(row.public_key_or_token as usize)?
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
            culture: strings.get(row.culture as usize)?.map(str::to_string),
        })
    }
}

/// A reference to another module (`ModuleRef` row).
#[derive(Debug, Clone)]
pub struct ModuleReference {
    /// The defining token
    pub token: Token,
    /// Module name
    pub name: String,
}

impl ModuleReference {
    /// Build a `ModuleReference` from its raw row.
    ///
    /// ## Arguments
    /// * `row`     - The raw `ModuleRef` row
    /// * `strings` - The #Strings heap
    ///
    /// # Errors
    /// Returns heap access errors for invalid name indexes
    pub fn from_row(row: &ModuleRefRaw, strings: &Strings) -> Result<ModuleReference> {
        Ok(ModuleReference {
            token: row.token,
            name: strings.get_or_empty(row.name as usize)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering() {
        let old = AssemblyVersion::new(2, 0, 0, 0);
        let newer = AssemblyVersion::new(4, 0, 0, 0);
        let newest = AssemblyVersion::new(4, 0, 1, 0);

        assert!(old < newer);
        assert!(newer < newest);
        assert_eq!(newest.to_string(), "4.0.1.0");

        // minor beats build
        assert!(AssemblyVersion::new(4, 1, 0, 0) > AssemblyVersion::new(4, 0, 9, 9));
    }
}
