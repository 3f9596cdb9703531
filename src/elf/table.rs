//! Generic bounds-checked table views.
//!
//! Program headers, section headers, and symbols are all fixed-stride
//! tables located by an (offset, entry size, count) triple from some
//! header. [`TableView`] validates the triple once against the file
//! bounds and then decodes entries lazily on access.

use std::marker::PhantomData;

use crate::elf::bytes::ByteSource;
use crate::elf::types::{
    ElfError, ProgramHeaderEntry, Result, SectionHeaderEntry, SymbolEntry, TableKind, PHDR_SIZE,
    SHDR_SIZE, SYM_SIZE,
};

/// A fixed-size record that can be decoded from a table slot.
pub trait TableEntry: Sized {
    /// Encoded size of one record.
    const SIZE: u64;
    /// Table kind, for error reporting.
    const KIND: TableKind;

    /// Decode the record starting at `offset`.
    fn parse(source: &ByteSource<'_>, offset: u64) -> Result<Self>;
}

/// Lazy view over a homogeneous table of `T` records.
///
/// Construction proves that `count * entry_size` bytes starting at
/// `offset` lie within the file and that each slot is large enough to
/// hold a record, so later accesses cannot read out of bounds. Entries
/// with a stride larger than the record size are legal; the trailing
/// slot bytes are ignored.
#[derive(Debug)]
pub struct TableView<'data, T> {
    source: ByteSource<'data>,
    offset: u64,
    entry_size: u64,
    count: u64,
    _entry: PhantomData<T>,
}

// Manual impls: the derives would add an unwanted `T: Copy` bound even
// though `T` only appears in `PhantomData`.
impl<'data, T> Clone for TableView<'data, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'data, T> Copy for TableView<'data, T> {}

impl<'data, T: TableEntry> TableView<'data, T> {
    pub fn new(source: ByteSource<'data>, offset: u64, entry_size: u64, count: u64) -> Result<Self> {
        let len = count
            .checked_mul(entry_size)
            .ok_or(ElfError::TruncatedTable {
                table: T::KIND,
                offset,
                len: u64::MAX,
            })?;
        let end = offset.checked_add(len).ok_or(ElfError::TruncatedTable {
            table: T::KIND,
            offset,
            len,
        })?;
        if end > source.len() {
            return Err(ElfError::TruncatedTable {
                table: T::KIND,
                offset,
                len,
            });
        }
        if count > 0 && entry_size < T::SIZE {
            return Err(ElfError::MalformedHeader(format!(
                "{} entry size {} is smaller than the {}-byte record",
                T::KIND,
                entry_size,
                T::SIZE
            )));
        }
        Ok(Self {
            source,
            offset,
            entry_size,
            count,
            _entry: PhantomData,
        })
    }

    /// Number of entries in the table.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Decode the entry at `index`.
    ///
    /// Indexes at or past [`count`](Self::count) report the slot as
    /// truncated rather than panicking.
    pub fn get(&self, index: u64) -> Result<T> {
        if index >= self.count {
            return Err(ElfError::TruncatedTable {
                table: T::KIND,
                offset: self.offset,
                len: index.saturating_mul(self.entry_size),
            });
        }
        // In-bounds by construction: index < count and
        // offset + count * entry_size <= source.len().
        let slot = self.offset + index * self.entry_size;
        T::parse(&self.source, slot)
    }

    /// Iterate over all entries in table order.
    ///
    /// The view is `Copy`, so iteration can be restarted freely.
    pub fn iter(&self) -> Entries<'data, T> {
        Entries {
            view: *self,
            index: 0,
        }
    }
}

/// Iterator over the entries of a [`TableView`].
pub struct Entries<'data, T> {
    view: TableView<'data, T>,
    index: u64,
}

impl<'data, T: TableEntry> Iterator for Entries<'data, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.view.count {
            return None;
        }
        let entry = self.view.get(self.index);
        self.index += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.view.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl<'data, T: TableEntry> ExactSizeIterator for Entries<'data, T> {}

impl TableEntry for ProgramHeaderEntry {
    const SIZE: u64 = PHDR_SIZE;
    const KIND: TableKind = TableKind::ProgramHeaders;

    fn parse(source: &ByteSource<'_>, offset: u64) -> Result<Self> {
        Ok(Self {
            p_type: source.read_u32(offset)?,
            p_flags: source.read_u32(offset + 4)?,
            p_offset: source.read_u64(offset + 8)?,
            p_vaddr: source.read_u64(offset + 16)?,
            p_paddr: source.read_u64(offset + 24)?,
            p_filesz: source.read_u64(offset + 32)?,
            p_memsz: source.read_u64(offset + 40)?,
            p_align: source.read_u64(offset + 48)?,
        })
    }
}

impl TableEntry for SectionHeaderEntry {
    const SIZE: u64 = SHDR_SIZE;
    const KIND: TableKind = TableKind::SectionHeaders;

    fn parse(source: &ByteSource<'_>, offset: u64) -> Result<Self> {
        Ok(Self {
            sh_name: source.read_u32(offset)?,
            sh_type: source.read_u32(offset + 4)?,
            sh_flags: source.read_u64(offset + 8)?,
            sh_addr: source.read_u64(offset + 16)?,
            sh_offset: source.read_u64(offset + 24)?,
            sh_size: source.read_u64(offset + 32)?,
            sh_link: source.read_u32(offset + 40)?,
            sh_info: source.read_u32(offset + 44)?,
            sh_addralign: source.read_u64(offset + 48)?,
            sh_entsize: source.read_u64(offset + 56)?,
        })
    }
}

impl TableEntry for SymbolEntry {
    const SIZE: u64 = SYM_SIZE;
    const KIND: TableKind = TableKind::Symbols;

    fn parse(source: &ByteSource<'_>, offset: u64) -> Result<Self> {
        Ok(Self {
            st_name: source.read_u32(offset)?,
            st_info: source.read_u8(offset + 4)?,
            st_other: source.read_u8(offset + 5)?,
            st_shndx: source.read_u16(offset + 6)?,
            st_value: source.read_u64(offset + 8)?,
            st_size: source.read_u64(offset + 16)?,
        })
    }
}
