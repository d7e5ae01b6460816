//! Walks the SMBIOS structure table.
//!
//! Each structure is a 4-byte header, a formatted area of `length - 4`
//! bytes, then a string-set terminated by two null bytes. The buffer comes
//! straight from firmware, so every length is checked before it is used.

use crate::error::{Error, Result};

pub const HEADER_LEN: usize = 4;

pub const SYSTEM_INFORMATION: u8 = 1;
/// End-of-Table marker. Walked past like any other non-Type-1 structure.
pub const END_OF_TABLE: u8 = 127;

/// Offset of the UUID field inside a System Information structure.
const UUID_OFFSET: usize = 0x08;
/// Header plus the fixed fields through the UUID.
const UUID_MIN_LENGTH: usize = 0x19;

pub type UuidBytes = [u8; 16];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureHeader {
    pub kind: u8,
    /// Length of the formatted area, header included.
    pub length: u8,
    pub handle: u16,
}

impl StructureHeader {
    fn read(bytes: &[u8; HEADER_LEN]) -> Self {
        StructureHeader {
            kind: bytes[0],
            length: bytes[1],
            handle: u16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }
}

/// UUID field of a System Information formatted area.
///
/// `None` if the structure is not Type 1 or is too short to carry the
/// field. A field of all `0x00` or all `0xFF` means the firmware has no
/// UUID to report.
fn uuid_field(
    offset: usize,
    header: &StructureHeader,
    formatted: &[u8],
) -> Option<Result<UuidBytes>> {
    if header.kind != SYSTEM_INFORMATION {
        return None;
    }
    let fixed = formatted.first_chunk::<UUID_MIN_LENGTH>()?;
    let field: UuidBytes = std::array::from_fn(|i| fixed[UUID_OFFSET + i]);
    if field.iter().all(|&b| b == 0x00) || field.iter().all(|&b| b == 0xff) {
        tracing::warn!(offset, "SMBIOS UUID field is a sentinel");
        return Some(Err(Error::UuidNotSet));
    }
    Some(Ok(field))
}

/// One structure borrowed from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Structure<'a> {
    pub offset: usize,
    pub header: StructureHeader,
    /// Formatted area, header included.
    pub formatted: &'a [u8],
    /// String-set, without the double-null terminator.
    pub strings: &'a [u8],
}

impl Structure<'_> {
    /// See [`StructureTable::find_system_information`] for the field rules.
    pub fn uuid(&self) -> Option<Result<UuidBytes>> {
        uuid_field(self.offset, &self.header, self.formatted)
    }

    /// Strings referenced by the formatted area, 1-based as in SMBIOS.
    pub fn string(&self, index: u8) -> Option<&[u8]> {
        let index = usize::from(index).checked_sub(1)?;
        self.strings
            .split(|&b| b == 0)
            .filter(|s| !s.is_empty())
            .nth(index)
    }
}

enum Terminator {
    Scanning(usize),
    Found(usize),
    OutOfBounds,
}

/// Position of the first `00 00` pair at or after `start`.
fn find_double_null(bytes: &[u8], start: usize) -> Option<usize> {
    let mut state = Terminator::Scanning(start);
    loop {
        state = match state {
            Terminator::Scanning(pos) => match bytes.get(pos..pos + 2) {
                Some([0, 0]) => Terminator::Found(pos),
                Some(_) => Terminator::Scanning(pos + 1),
                None => Terminator::OutOfBounds,
            },
            Terminator::Found(pos) => return Some(pos),
            Terminator::OutOfBounds => return None,
        };
    }
}

/// Structure-table region of a raw SMBIOS buffer.
#[derive(Debug, Clone, Copy)]
pub struct StructureTable<'a> {
    bytes: &'a [u8],
}

impl<'a> StructureTable<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        StructureTable { bytes }
    }

    pub fn structures(&self) -> Structures<'a> {
        Structures {
            bytes: self.bytes,
            cursor: 0,
            done: false,
        }
    }

    /// UUID field of the first System Information structure.
    ///
    /// Only one Type 1 structure is expected, so the scan stops at the first
    /// one whatever it holds. Its string-set is never read, so a damaged one
    /// does not hide the UUID. Consuming the whole table without a Type 1 is
    /// `NotFound`.
    pub fn find_system_information(&self) -> Result<UuidBytes> {
        let mut structures = self.structures();
        while let Some(next) = structures.read_formatted() {
            let (header, formatted) = next?;
            if header.kind == SYSTEM_INFORMATION {
                let offset = structures.cursor;
                tracing::debug!(
                    offset,
                    length = header.length,
                    handle = header.handle,
                    "found System Information"
                );
                return uuid_field(offset, &header, formatted)
                    .unwrap_or(Err(Error::NotFound));
            }
            structures.skip_strings(formatted.len())?;
        }
        Err(Error::NotFound)
    }
}

pub fn find_system_information(table: &[u8]) -> Result<UuidBytes> {
    StructureTable::new(table).find_system_information()
}

/// Iterator over the structures of a table.
///
/// Fused after the first error, since a broken length leaves no way to
/// locate the next structure.
#[derive(Debug, Clone)]
pub struct Structures<'a> {
    bytes: &'a [u8],
    cursor: usize,
    done: bool,
}

impl<'a> Structures<'a> {
    /// Header and formatted area at the cursor. The cursor does not move.
    ///
    /// `None` once the table is fully consumed.
    fn read_formatted(&self) -> Option<Result<(StructureHeader, &'a [u8])>> {
        let offset = self.cursor;
        let rest = self.bytes.get(offset..)?;
        if rest.is_empty() {
            return None;
        }
        let Some(header) = rest.first_chunk::<HEADER_LEN>() else {
            return Some(Err(Error::TruncatedTable { offset }));
        };
        let header = StructureHeader::read(header);
        tracing::trace!(
            offset,
            kind = header.kind,
            length = header.length,
            handle = header.handle,
            "structure"
        );

        let length = usize::from(header.length);
        match rest.get(..length) {
            Some(formatted) if length >= HEADER_LEN => Some(Ok((header, formatted))),
            _ => {
                tracing::warn!(offset, length, "bad structure length");
                Some(Err(Error::MalformedStructure { offset }))
            }
        }
    }

    /// Moves the cursor past the string-set following a formatted area of
    /// `length` bytes and returns the strings.
    fn skip_strings(&mut self, length: usize) -> Result<&'a [u8]> {
        let offset = self.cursor;
        let rest = &self.bytes[offset..];
        let Some(end) = find_double_null(rest, length) else {
            tracing::warn!(offset, "unterminated string-set");
            return Err(Error::MalformedStructure { offset });
        };
        self.cursor = offset + end + 2;
        Ok(&rest[length..end])
    }

    fn read_next(&mut self) -> Option<Result<Structure<'a>>> {
        let offset = self.cursor;
        let (header, formatted) = match self.read_formatted()? {
            Ok(formatted) => formatted,
            Err(e) => return Some(Err(e)),
        };
        let strings = match self.skip_strings(formatted.len()) {
            Ok(strings) => strings,
            Err(e) => return Some(Err(e)),
        };
        Some(Ok(Structure {
            offset,
            header,
            formatted,
            strings,
        }))
    }
}

impl<'a> Iterator for Structures<'a> {
    type Item = Result<Structure<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.read_next();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
