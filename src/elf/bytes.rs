//! Bounds-checked access to the raw file bytes.

use crate::elf::types::{ElfError, Result};

/// Read-only window over the raw bytes of a file.
///
/// Every read the parser performs goes through [`ByteSource::slice`], so a
/// request that would run past the end of the file (or overflow the offset
/// arithmetic) surfaces as [`ElfError::OutOfBounds`] instead of a panic.
/// Scalars are decoded in native byte order; header validation only admits
/// files whose encoding matches the host.
#[derive(Debug, Clone, Copy)]
pub struct ByteSource<'data> {
    data: &'data [u8],
}

impl<'data> ByteSource<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self { data }
    }

    /// Total number of bytes available.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn slice(&self, offset: u64, len: u64) -> Result<&'data [u8]> {
        let end = offset
            .checked_add(len)
            .ok_or(ElfError::OutOfBounds { offset, len })?;
        if end > self.data.len() as u64 {
            return Err(ElfError::OutOfBounds { offset, len });
        }
        Ok(&self.data[offset as usize..end as usize])
    }

    pub fn read_u8(&self, offset: u64) -> Result<u8> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: u64) -> Result<u16> {
        let bytes: [u8; 2] = self.slice(offset, 2)?.try_into().unwrap();
        Ok(u16::from_ne_bytes(bytes))
    }

    pub fn read_u32(&self, offset: u64) -> Result<u32> {
        let bytes: [u8; 4] = self.slice(offset, 4)?.try_into().unwrap();
        Ok(u32::from_ne_bytes(bytes))
    }

    pub fn read_u64(&self, offset: u64) -> Result<u64> {
        let bytes: [u8; 8] = self.slice(offset, 8)?.try_into().unwrap();
        Ok(u64::from_ne_bytes(bytes))
    }
}
