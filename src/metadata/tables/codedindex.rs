use strum::{EnumCount, EnumIter};

use crate::{
    file::io::read_le_at,
    metadata::{
        tables::{TableId, TableInfoRef},
        token::Token,
    },
    Error::{InvalidCodedIndex, TokenOutOfRange},
    Result,
};

/// The coded index categories of ECMA-335 II.24.2.6.
///
/// Each category is a fixed, ordered list of candidate tables; the tag bits
/// of an encoded value select the candidate, the remaining bits carry the
/// row index.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef`, `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param`, `Property`
    HasConstant,
    /// The 22 tables that may carry custom attributes
    HasCustomAttribute,
    /// `Field`, `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef`, `Assembly`
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, `TypeSpec`
    MemberRefParent,
    /// `Event`, `Property`
    HasSemantics,
    /// `MethodDef`, `MemberRef`
    MethodDefOrRef,
    /// `Field`, `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef`, `ExportedType`
    Implementation,
    /// `MethodDef`, `MemberRef` (tags 0, 1 and 4 are unused by compilers)
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef`, `TypeRef`
    ResolutionScope,
    /// `TypeDef`, `MethodDef`
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// The ordered candidate tables of this category.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::HasCustomAttribute => &[
                TableId::MethodDef,
                TableId::Field,
                TableId::TypeRef,
                TableId::TypeDef,
                TableId::Param,
                TableId::InterfaceImpl,
                TableId::MemberRef,
                TableId::Module,
                // Named 'Permission' in the standard text; the table is DeclSecurity
                TableId::DeclSecurity,
                TableId::Property,
                TableId::Event,
                TableId::StandAloneSig,
                TableId::ModuleRef,
                TableId::TypeSpec,
                TableId::Assembly,
                TableId::AssemblyRef,
                TableId::File,
                TableId::ExportedType,
                TableId::ManifestResource,
                TableId::GenericParam,
                TableId::GenericParamConstraint,
                TableId::MethodSpec,
            ],
            CodedIndexType::HasFieldMarshal => &[TableId::Field, TableId::Param],
            CodedIndexType::HasDeclSecurity => {
                &[TableId::TypeDef, TableId::MethodDef, TableId::Assembly]
            }
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::HasSemantics => &[TableId::Event, TableId::Property],
            CodedIndexType::MethodDefOrRef => &[TableId::MethodDef, TableId::MemberRef],
            CodedIndexType::MemberForwarded => &[TableId::Field, TableId::MethodDef],
            CodedIndexType::Implementation => {
                &[TableId::File, TableId::AssemblyRef, TableId::ExportedType]
            }
            CodedIndexType::CustomAttributeType => &[
                TableId::MethodDef,
                TableId::MethodDef,
                TableId::MethodDef,
                TableId::MemberRef,
                TableId::MemberRef,
            ],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
            CodedIndexType::TypeOrMethodDef => &[TableId::TypeDef, TableId::MethodDef],
        }
    }
}

/// The decoded form of a coded index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The table this index refers to
    pub tag: TableId,
    /// The 1-based row the index points to (0 means nil)
    pub row: u32,
    /// The token composed from `tag` and `row`
    pub token: Token,
}

impl CodedIndex {
    /// Create a new `CodedIndex` from its decoded parts
    ///
    /// ## Arguments
    /// * `tag` - The table being referenced
    /// * `row` - The 1-based row index
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::from_table(tag, row),
        }
    }

    /// Read a coded index column from a row buffer and decode it.
    ///
    /// The column width (2 or 4 bytes) comes from the cached bit size in
    /// `info`.
    ///
    /// ## Arguments
    /// * `data`    - The buffer to read from
    /// * `offset`  - Read position, advanced by the amount read
    /// * `info`    - Table size information
    /// * `ci_type` - The coded index category of this column
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncation or
    /// [`InvalidCodedIndex`] for a tag with no candidate
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfoRef,
        ci_type: CodedIndexType,
    ) -> Result<Self> {
        let coded_value = if info.coded_index_bits(ci_type) > 16 {
            read_le_at::<u32>(data, offset)?
        } else {
            u32::from(read_le_at::<u16>(data, offset)?)
        };

        let (tag, row) = info.decode_coded_index(coded_value, ci_type)?;
        Ok(CodedIndex::new(tag, row))
    }

    /// The nil-aware view of this index: `None` when the row is 0.
    #[must_use]
    pub fn as_token(&self) -> Option<Token> {
        if self.row == 0 {
            None
        } else {
            Some(self.token)
        }
    }
}

/// Encoder/decoder for one coded index category against a concrete image.
///
/// Obtained from [`crate::Module::index_encoder`]; wraps the image's table
/// sizes so width and encoding agree with what the row parsers consumed.
pub struct CodedIndexEncoder {
    info: TableInfoRef,
    kind: CodedIndexType,
}

impl CodedIndexEncoder {
    pub(crate) fn new(info: TableInfoRef, kind: CodedIndexType) -> Self {
        CodedIndexEncoder { info, kind }
    }

    /// The category this encoder serves
    #[must_use]
    pub fn kind(&self) -> CodedIndexType {
        self.kind
    }

    /// Byte width of this coded index in the image (2 or 4)
    #[must_use]
    pub fn width(&self) -> u8 {
        self.info.coded_index_bytes(self.kind)
    }

    /// Encode a token into the coded value.
    ///
    /// ## Arguments
    /// * `token` - A token whose table is a candidate of this category
    ///
    /// # Errors
    /// Returns [`InvalidCodedIndex`] when the token's table is not a
    /// candidate, or [`TokenOutOfRange`] when its RID exceeds the table
    pub fn encode(&self, token: Token) -> Result<u32> {
        let Some(table) = TableId::from_token_table(token.table()) else {
            return Err(InvalidCodedIndex(u32::from(token.table())));
        };

        let encoded = self.info.encode_coded_index(table, token.rid(), self.kind)?;
        if token.rid() > self.info.get(table).rows {
            return Err(TokenOutOfRange(token));
        }

        Ok(encoded)
    }

    /// Decode a coded value into its table and row.
    ///
    /// ## Arguments
    /// * `value` - The encoded coded index
    ///
    /// # Errors
    /// Returns [`InvalidCodedIndex`] for a tag with no candidate
    pub fn decode(&self, value: u32) -> Result<CodedIndex> {
        let (tag, row) = self.info.decode_coded_index(value, self.kind)?;
        Ok(CodedIndex::new(tag, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableInfo;
    use std::sync::Arc;

    #[test]
    fn nil_rows() {
        let index = CodedIndex::new(TableId::TypeRef, 0);
        assert_eq!(index.as_token(), None);

        let index = CodedIndex::new(TableId::TypeRef, 3);
        assert_eq!(index.as_token(), Some(Token::new(0x0100_0003)));
    }

    #[test]
    fn read_small_and_large() {
        let info = Arc::new(TableInfo::new_test(
            &[(TableId::TypeDef, 8)],
            false,
            false,
            false,
        ));

        // 0b1011: tag 3 & 0b11 = 3? no: 0x0B = 0b1011, tag = 3 -> invalid.
        // 0x09 = 0b1001, tag 1 (TypeRef), row 2
        let data = [0x09, 0x00];
        let mut offset = 0;
        let index = CodedIndex::read(&data, &mut offset, &info, CodedIndexType::TypeDefOrRef).unwrap();
        assert_eq!(index.tag, TableId::TypeRef);
        assert_eq!(index.row, 2);
        assert_eq!(offset, 2);

        let info = Arc::new(TableInfo::new_test(
            &[(TableId::TypeSpec, 0x4000)],
            false,
            false,
            false,
        ));
        let data = [0x0A, 0x00, 0x01, 0x00]; // 0x0001000A: tag 2 (TypeSpec), row 0x4002
        let mut offset = 0;
        let index = CodedIndex::read(&data, &mut offset, &info, CodedIndexType::TypeDefOrRef).unwrap();
        assert_eq!(index.tag, TableId::TypeSpec);
        assert_eq!(index.row, 0x4002);
        assert_eq!(offset, 4);
    }

    #[test]
    fn encoder_roundtrip() {
        let info = Arc::new(TableInfo::new_test(
            &[(TableId::TypeDef, 4), (TableId::TypeSpec, 2)],
            false,
            false,
            false,
        ));
        let encoder = CodedIndexEncoder::new(info, CodedIndexType::TypeDefOrRef);

        assert_eq!(encoder.width(), 2);
        let encoded = encoder.encode(Token::new(0x1B00_0002)).unwrap();
        assert_eq!(encoded, 0b1010);

        let decoded = encoder.decode(encoded).unwrap();
        assert_eq!(decoded.tag, TableId::TypeSpec);
        assert_eq!(decoded.row, 2);

        assert!(matches!(encoder.decode(0b0011), Err(InvalidCodedIndex(3))));
        assert!(matches!(
            encoder.encode(Token::new(0x1B00_0003)),
            Err(TokenOutOfRange(_))
        ));
        assert!(encoder.encode(Token::new(0x0400_0001)).is_err());
    }
}
