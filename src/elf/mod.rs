//! ELF (Executable and Linkable Format) parsing.
//!
//! A zero-copy, bounds-checked reader for ELF-64 files in the host's
//! byte order. Parsing validates the file header and both header tables
//! up front; entries and names are decoded lazily from borrowed views.

pub mod bytes;
pub mod header;
pub mod strtab;
pub mod table;
pub mod types;

use tracing::debug;

use bytes::ByteSource;
use header::parse_header;
use strtab::StringTable;
use table::TableView;
pub use types::*;

/// A validated view of one ELF-64 image.
///
/// Holding an `ElfImage` guarantees that the file header was well formed
/// and that the program header and section header tables lie fully within
/// the underlying bytes. The image borrows the bytes and never copies
/// table contents.
#[derive(Debug)]
pub struct ElfImage<'data> {
    source: ByteSource<'data>,
    header: FileHeader,
    program_headers: TableView<'data, ProgramHeaderEntry>,
    section_headers: TableView<'data, SectionHeaderEntry>,
    section_names: StringTable<'data>,
}

impl<'data> ElfImage<'data> {
    /// Parse an ELF-64 image from raw bytes.
    ///
    /// Fails with a typed [`ElfError`] on the first structural violation;
    /// no partially-validated image is ever returned.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let source = ByteSource::new(data);
        let header = parse_header(&source)?;
        let program_headers = TableView::new(
            source,
            header.e_phoff,
            header.e_phentsize as u64,
            header.e_phnum as u64,
        )?;
        let section_headers = TableView::new(
            source,
            header.e_shoff,
            header.e_shentsize as u64,
            header.e_shnum as u64,
        )?;
        let section_names = resolve_section_names(&source, &header, &section_headers)?;
        debug!(
            program_headers = header.e_phnum,
            sections = header.e_shnum,
            "parsed ELF image"
        );
        Ok(Self {
            source,
            header,
            program_headers,
            section_headers,
            section_names,
        })
    }

    /// The decoded file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The program header table, possibly empty.
    pub fn program_headers(&self) -> &TableView<'data, ProgramHeaderEntry> {
        &self.program_headers
    }

    /// The section header table, possibly empty.
    pub fn section_headers(&self) -> &TableView<'data, SectionHeaderEntry> {
        &self.section_headers
    }

    /// Resolve a section's name from the section name table.
    pub fn section_name(&self, section: &SectionHeaderEntry) -> Result<&'data str> {
        self.section_names.lookup(section.sh_name)
    }

    /// Locate the symbol table and its linked name strings.
    ///
    /// Scans section headers from index 1 (slot 0 is reserved) for the
    /// first full symbol table. `Ok(None)` means the file simply has none,
    /// as with stripped binaries; an error means a symbol table exists but
    /// is structurally unusable.
    pub fn find_symbol_table(&self) -> Result<Option<SymbolTable<'data>>> {
        for index in 1..self.section_headers.count() {
            let section = self.section_headers.get(index)?;
            if section.sh_type != SHT_SYMTAB {
                continue;
            }
            return self.resolve_symbol_table(&section).map(Some);
        }
        debug!("no symbol table section present");
        Ok(None)
    }

    fn resolve_symbol_table(&self, section: &SectionHeaderEntry) -> Result<SymbolTable<'data>> {
        if section.sh_link as u64 >= self.section_headers.count() {
            return Err(ElfError::InvalidLink {
                link: section.sh_link,
                count: self.header.e_shnum,
            });
        }
        let names_section = self.section_headers.get(section.sh_link as u64)?;
        let names = string_table_at(&self.source, &names_section)?;

        if section.sh_entsize < SYM_SIZE {
            return Err(ElfError::MalformedHeader(format!(
                "symbol table entry size {} is smaller than the {}-byte record",
                section.sh_entsize, SYM_SIZE
            )));
        }
        // A trailing partial record is ignored, matching readelf.
        let count = section.sh_size / section.sh_entsize;
        let entries = TableView::new(self.source, section.sh_offset, section.sh_entsize, count)?;
        debug!(
            symbols = count,
            link = section.sh_link,
            "located symbol table section"
        );
        Ok(SymbolTable { entries, names })
    }
}

/// The section name table named by `e_shstrndx`, or an empty table when
/// the file declares none.
fn resolve_section_names<'data>(
    source: &ByteSource<'data>,
    header: &FileHeader,
    sections: &TableView<'data, SectionHeaderEntry>,
) -> Result<StringTable<'data>> {
    if header.e_shnum == 0 || header.e_shstrndx == SHN_UNDEF {
        return Ok(StringTable::empty());
    }
    let entry = sections.get(header.e_shstrndx as u64)?;
    string_table_at(source, &entry)
}

fn string_table_at<'data>(
    source: &ByteSource<'data>,
    section: &SectionHeaderEntry,
) -> Result<StringTable<'data>> {
    let data = source
        .slice(section.sh_offset, section.sh_size)
        .map_err(|_| ElfError::TruncatedTable {
            table: TableKind::Strings,
            offset: section.sh_offset,
            len: section.sh_size,
        })?;
    Ok(StringTable::new(data))
}

/// A symbol table together with the string table it links to.
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable<'data> {
    entries: TableView<'data, SymbolEntry>,
    names: StringTable<'data>,
}

impl<'data> SymbolTable<'data> {
    /// The symbol records, index 0 included.
    pub fn entries(&self) -> &TableView<'data, SymbolEntry> {
        &self.entries
    }

    /// Number of symbol records.
    pub fn count(&self) -> u64 {
        self.entries.count()
    }

    /// Resolve a symbol's name from the linked string table.
    pub fn name_of(&self, symbol: &SymbolEntry) -> Result<&'data str> {
        self.names.lookup(symbol.st_name)
    }
}
