//! Reads the platform UUID from the SMBIOS System Information structure.

pub mod error;
pub mod format;
pub mod raw;
pub mod table;

pub use error::{Error, Result};
pub use format::{format_uuid, SmbiosUuid};
pub use raw::RawSmbiosData;
pub use table::{find_system_information, StructureTable, UuidBytes};

/// Reads the firmware table and returns the platform UUID.
pub fn system_uuid() -> Result<SmbiosUuid> {
    let buffer = load_raw_smbios_data()?;
    uuid_from_raw_smbios_data(&buffer)
}

/// Decodes a buffer laid out like `GetSystemFirmwareTable('RSMB')` output.
pub fn uuid_from_raw_smbios_data(buffer: &[u8]) -> Result<SmbiosUuid> {
    let raw = RawSmbiosData::parse(buffer)?;
    let field = find_system_information(raw.table)?;
    let uuid = SmbiosUuid::from_field(&field);
    tracing::debug!(%uuid, "SMBIOS UUID");
    Ok(uuid)
}

#[cfg(windows)]
fn load_raw_smbios_data() -> Result<Vec<u8>> {
    let buffer = win_api::firmware::raw_smbios_table()
        .map_err(|e| Error::TableUnavailable(e.into()))?;
    if buffer.is_empty() {
        return Err(Error::TableUnavailable(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "empty firmware table",
        )));
    }
    Ok(buffer)
}

#[cfg(not(windows))]
fn load_raw_smbios_data() -> Result<Vec<u8>> {
    Err(Error::TableUnavailable(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "GetSystemFirmwareTable is only available on Windows",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::{table_with_uuid, UUID_FIELD};

    fn raw_buffer(table: &[u8]) -> Vec<u8> {
        let mut buffer = vec![0, 3, 4, 0];
        buffer.extend_from_slice(&(table.len() as u32).to_le_bytes());
        buffer.extend_from_slice(table);
        buffer
    }

    #[test]
    fn uuid_from_raw_buffer() {
        let buffer = raw_buffer(&table_with_uuid(&UUID_FIELD));
        let uuid = uuid_from_raw_smbios_data(&buffer).unwrap();
        assert_eq!(uuid.to_string(), "00112233-4455-6677-8899-aabbccddeeff");
    }

    #[test]
    fn zeroed_uuid_from_raw_buffer() {
        let buffer = raw_buffer(&table_with_uuid(&[0; 16]));
        let err = uuid_from_raw_smbios_data(&buffer).unwrap_err();
        assert!(matches!(err, Error::UuidNotSet));
        assert_eq!(err.to_string(), "SMBIOS UUID is not set");
    }

    #[test]
    fn preamble_is_not_walked() {
        // a table with only the preamble has no structures at all
        let buffer = raw_buffer(&[]);
        assert!(matches!(
            uuid_from_raw_smbios_data(&buffer),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn system_uuid_test() {
        match system_uuid() {
            Ok(uuid) => println!("SMBIOS UUID: {uuid}"),
            Err(e) => println!("{e}"),
        }
    }
}
