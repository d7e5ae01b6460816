use windows::core::{Error, Result};
use windows::Win32::Foundation::ERROR_INSUFFICIENT_BUFFER;
use windows::Win32::System::SystemInformation::{
    GetSystemFirmwareTable, FIRMWARE_TABLE_PROVIDER, RSMB,
};

/// Reads the raw SMBIOS table (`RSMB` provider, table id 0).
///
/// The buffer starts with the 8-byte `RawSMBIOSData` preamble followed by
/// the structure table.
pub fn raw_smbios_table() -> Result<Vec<u8>> {
    get_system_firmware_table(RSMB, 0)
}

pub fn get_system_firmware_table(
    provider: FIRMWARE_TABLE_PROVIDER,
    table_id: u32,
) -> Result<Vec<u8>> {
    unsafe {
        // first call with no buffer returns the required size
        let size = GetSystemFirmwareTable(provider, table_id, None);
        if size == 0 {
            return Err(Error::from_win32());
        }
        let mut buffer = vec![0u8; size as usize];
        let written =
            GetSystemFirmwareTable(provider, table_id, Some(&mut buffer[..]));
        if written == 0 {
            return Err(Error::from_win32());
        }
        // table grew between the two calls
        if written > size {
            return Err(Error::from(ERROR_INSUFFICIENT_BUFFER.to_hresult()));
        }
        buffer.truncate(written as usize);
        tracing::trace!(provider = provider.0, table_id, size = written);
        Ok(buffer)
    }
}
