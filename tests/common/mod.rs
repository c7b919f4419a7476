//! In-memory metadata image builder for integration tests.
//!
//! Assembles a complete `BSJB` metadata root with all five streams from
//! crafted heap entries and raw table rows. All indexes stay narrow (2
//! bytes), so tests spell out row bytes directly.

use std::collections::BTreeMap;

/// Builder for a synthetic metadata root.
#[derive(Default)]
pub struct ImageBuilder {
    strings: Vec<u8>,
    user_strings: Vec<u8>,
    guids: Vec<u8>,
    blobs: Vec<u8>,
    tables: BTreeMap<u8, (u32, Vec<u8>)>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        ImageBuilder {
            strings: vec![0],
            user_strings: vec![0],
            guids: Vec::new(),
            blobs: vec![0],
            tables: BTreeMap::new(),
        }
    }

    /// Intern a string into #Strings, returning its heap index.
    pub fn string(&mut self, value: &str) -> u16 {
        let offset = self.strings.len() as u16;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        offset
    }

    /// Intern a UTF-16 user string into #US, returning its heap index.
    pub fn user_string(&mut self, value: &str) -> u32 {
        let offset = self.user_strings.len() as u32;
        let units: Vec<u16> = value.encode_utf16().collect();
        let byte_len = units.len() * 2 + 1;
        assert!(byte_len < 0x80, "test strings stay in 1-byte lengths");
        self.user_strings.push(byte_len as u8);
        for unit in units {
            self.user_strings.extend_from_slice(&unit.to_le_bytes());
        }
        self.user_strings.push(0);
        offset
    }

    /// Append a GUID to #GUID, returning its 1-based index.
    pub fn guid(&mut self, bytes: [u8; 16]) -> u16 {
        self.guids.extend_from_slice(&bytes);
        (self.guids.len() / 16) as u16
    }

    /// Intern a blob into #Blob, returning its heap index.
    pub fn blob(&mut self, bytes: &[u8]) -> u16 {
        assert!(bytes.len() < 0x80, "test blobs stay in 1-byte lengths");
        let offset = self.blobs.len() as u16;
        self.blobs.push(bytes.len() as u8);
        self.blobs.extend_from_slice(bytes);
        offset
    }

    /// Append one raw row to a table.
    pub fn row(&mut self, table: u8, bytes: &[u8]) {
        let entry = self.tables.entry(table).or_default();
        entry.0 += 1;
        entry.1.extend_from_slice(bytes);
    }

    fn tables_stream(&self) -> Vec<u8> {
        let mut valid = 0u64;
        for table in self.tables.keys() {
            valid |= 1 << table;
        }

        let mut stream = Vec::new();
        stream.extend_from_slice(&0u32.to_le_bytes()); // reserved
        stream.push(2); // major
        stream.push(0); // minor
        stream.push(0); // heap_sizes: all narrow
        stream.push(1); // reserved
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0u64.to_le_bytes()); // sorted

        for (rows, _) in self.tables.values() {
            stream.extend_from_slice(&rows.to_le_bytes());
        }
        for (_, data) in self.tables.values() {
            stream.extend_from_slice(data);
        }

        stream
    }

    /// Assemble the full metadata root.
    pub fn build(&self) -> Vec<u8> {
        const VERSION: &[u8; 12] = b"v4.0.30319\0\0";

        let streams: [(&str, Vec<u8>); 5] = [
            ("#~", self.tables_stream()),
            ("#Strings", self.strings.clone()),
            ("#US", self.user_strings.clone()),
            ("#GUID", self.guids.clone()),
            ("#Blob", self.blobs.clone()),
        ];

        let header_block: usize = streams
            .iter()
            .map(|(name, _)| 8 + ((name.len() + 1 + 3) & !3))
            .sum();
        let mut offset = 16 + VERSION.len() + 4 + header_block;

        let mut root = Vec::new();
        root.extend_from_slice(&0x424A_5342u32.to_le_bytes());
        root.extend_from_slice(&1u16.to_le_bytes()); // major
        root.extend_from_slice(&1u16.to_le_bytes()); // minor
        root.extend_from_slice(&0u32.to_le_bytes()); // reserved
        root.extend_from_slice(&(VERSION.len() as u32).to_le_bytes());
        root.extend_from_slice(VERSION);
        root.extend_from_slice(&0u16.to_le_bytes()); // flags
        root.extend_from_slice(&(streams.len() as u16).to_le_bytes());

        for (name, data) in &streams {
            root.extend_from_slice(&(offset as u32).to_le_bytes());
            root.extend_from_slice(&(data.len() as u32).to_le_bytes());
            root.extend_from_slice(name.as_bytes());
            let padded = (name.len() + 1 + 3) & !3;
            root.extend(std::iter::repeat(0u8).take(padded - name.len()));
            offset += data.len();
        }

        for (_, data) in &streams {
            root.extend_from_slice(data);
        }

        root
    }
}

/// Two-byte little-endian helper for row construction.
pub fn le16(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Four-byte little-endian helper for row construction.
pub fn le32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}
