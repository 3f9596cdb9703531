//! NUL-terminated string table lookups.

use memchr::memchr;

use crate::elf::types::{ElfError, Result};

/// Borrowed view of an ELF string table section.
///
/// Names are referenced by byte offset and terminated by NUL. A lookup
/// never reads outside the table, and a name that is missing its
/// terminator or is not valid UTF-8 surfaces as a typed error instead
/// of silently truncated garbage.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'data> {
    data: &'data [u8],
}

impl<'data> StringTable<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self { data }
    }

    /// Table with no contents; every lookup fails with
    /// [`ElfError::InvalidNameOffset`].
    pub fn empty() -> Self {
        Self { data: &[] }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resolve the name starting at `offset`.
    ///
    /// The terminating NUL must fall within the table. Offset 0 resolves
    /// to the empty string in any well-formed table.
    pub fn lookup(&self, offset: u32) -> Result<&'data str> {
        let start = offset as usize;
        if start >= self.data.len() {
            return Err(ElfError::InvalidNameOffset {
                offset,
                table_len: self.data.len(),
            });
        }
        let tail = &self.data[start..];
        let nul = memchr(0, tail).ok_or(ElfError::UnterminatedString { offset })?;
        std::str::from_utf8(&tail[..nul]).map_err(|_| ElfError::InvalidString { offset })
    }
}
