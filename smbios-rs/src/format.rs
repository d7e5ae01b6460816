use std::fmt;

use uuid::Uuid;

use crate::table::UuidBytes;

/// Converts the SMBIOS field layout to RFC 4122 byte order.
///
/// The first three fields are stored little-endian; the last eight bytes
/// are already in network order. Applying it twice is the identity.
pub fn reorder(field: &UuidBytes) -> UuidBytes {
    Uuid::from_bytes_le(*field).into_bytes()
}

/// Platform UUID read from a System Information structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmbiosUuid(Uuid);

impl SmbiosUuid {
    /// Builds the UUID from the raw Type 1 field.
    pub fn from_field(field: &UuidBytes) -> Self {
        SmbiosUuid(Uuid::from_bytes_le(*field))
    }

    /// RFC 4122 byte order.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SmbiosUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// Canonical 8-4-4-4-12 lowercase form of a raw Type 1 UUID field.
pub fn format_uuid(field: &UuidBytes) -> String {
    SmbiosUuid::from_field(field).to_string()
}
