use std::io;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a UUID could not be read from the SMBIOS table.
///
/// Every variant is terminal for a single lookup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access system firmware table: {0}")]
    TableUnavailable(#[source] io::Error),
    #[error("malformed SMBIOS structure at offset {offset:#x}")]
    MalformedStructure { offset: usize },
    #[error("SMBIOS table truncated at offset {offset:#x}")]
    TruncatedTable { offset: usize },
    #[error("SMBIOS UUID is not set")]
    UuidNotSet,
    #[error("UUID not found in SMBIOS data")]
    NotFound,
}
