//! The `RawSMBIOSData` preamble returned by `GetSystemFirmwareTable`.

use crate::error::{Error, Result};

const PREAMBLE_LEN: usize = 8;

/// Borrowed view over a raw firmware buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSmbiosData<'a> {
    pub used_20_calling_method: u8,
    pub smbios_major_version: u8,
    pub smbios_minor_version: u8,
    pub dmi_revision: u8,
    pub length: u32,
    /// Exactly `length` bytes of structure table.
    pub table: &'a [u8],
}

impl<'a> RawSmbiosData<'a> {
    /// Splits the preamble off `buffer`.
    ///
    /// Bytes past the declared table length are ignored. A buffer shorter
    /// than the preamble, or than the length it declares, is truncated.
    pub fn parse(buffer: &'a [u8]) -> Result<Self> {
        let Some((preamble, rest)) = buffer.split_first_chunk::<PREAMBLE_LEN>()
        else {
            return Err(Error::TruncatedTable { offset: 0 });
        };
        let [calling_method, major, minor, dmi_revision, l0, l1, l2, l3] =
            *preamble;
        let length = u32::from_le_bytes([l0, l1, l2, l3]);
        let table = usize::try_from(length)
            .ok()
            .and_then(|len| rest.get(..len))
            .ok_or(Error::TruncatedTable {
                offset: PREAMBLE_LEN + rest.len(),
            })?;

        tracing::debug!(
            version = %format_args!("{major}.{minor}"),
            dmi_revision,
            length,
            "raw SMBIOS data"
        );

        Ok(RawSmbiosData {
            used_20_calling_method: calling_method,
            smbios_major_version: major,
            smbios_minor_version: minor,
            dmi_revision,
            length,
            table,
        })
    }

    pub fn is_later(&self, major: u8, minor: u8) -> bool {
        self.smbios_major_version > major
            || self.smbios_major_version == major
                && self.smbios_minor_version >= minor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preamble() {
        let buffer = [0, 3, 4, 0, 3, 0, 0, 0, 0x7f, 4, 0xff, 0xfe, 0xaa];
        let raw = RawSmbiosData::parse(&buffer).unwrap();
        assert_eq!(raw.used_20_calling_method, 0);
        assert_eq!(raw.smbios_major_version, 3);
        assert_eq!(raw.smbios_minor_version, 4);
        assert_eq!(raw.length, 3);
        // trailing 0xaa is outside the declared length
        assert_eq!(raw.table, &[0x7f, 4, 0xff]);
    }

    #[test]
    fn version_compare() {
        let buffer = [1, 2, 7, 0, 0, 0, 0, 0];
        let raw = RawSmbiosData::parse(&buffer).unwrap();
        assert!(raw.is_later(2, 4));
        assert!(raw.is_later(2, 7));
        assert!(!raw.is_later(2, 8));
        assert!(!raw.is_later(3, 0));
        assert!(raw.table.is_empty());
    }

    #[test]
    fn short_preamble() {
        let err = RawSmbiosData::parse(&[0, 3, 4, 0]).unwrap_err();
        assert!(matches!(err, Error::TruncatedTable { offset: 0 }));
    }

    #[test]
    fn length_past_end() {
        let buffer = [0, 3, 4, 0, 0x10, 0, 0, 0, 1, 2, 3];
        let err = RawSmbiosData::parse(&buffer).unwrap_err();
        assert!(matches!(err, Error::TruncatedTable { offset: 11 }));
    }
}
