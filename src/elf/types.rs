//! Core ELF-64 types, constants, and parse errors.

use std::fmt;

use thiserror::Error;

/// ELF parsing errors.
///
/// Every variant names the structural rule that was violated, so a caller
/// can report exactly why a file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElfError {
    #[error("not an ELF binary (bad magic)")]
    BadMagic,
    #[error("unsupported ELF class {0} (only ELFCLASS64 is supported)")]
    UnsupportedClass(u8),
    #[error("unsupported data encoding {0} (file byte order must match the host)")]
    UnsupportedEncoding(u8),
    #[error("read of {len} bytes at offset {offset:#x} runs past the end of the file")]
    OutOfBounds { offset: u64, len: u64 },
    #[error("{table} table at offset {offset:#x} ({len} bytes) exceeds the file bounds")]
    TruncatedTable {
        table: TableKind,
        offset: u64,
        len: u64,
    },
    #[error("section name table index {index} is out of range ({count} sections)")]
    InvalidStringTableIndex { index: u16, count: u16 },
    #[error("name offset {offset:#x} is past the end of the string table ({table_len} bytes)")]
    InvalidNameOffset { offset: u32, table_len: usize },
    #[error("string at offset {offset:#x} is missing its NUL terminator")]
    UnterminatedString { offset: u32 },
    #[error("string at offset {offset:#x} is not valid UTF-8")]
    InvalidString { offset: u32 },
    #[error("symbol table link {link} is out of range ({count} sections)")]
    InvalidLink { link: u32, count: u16 },
    #[error("malformed header: {0}")]
    MalformedHeader(String),
}

pub type Result<T> = std::result::Result<T, ElfError>;

/// Which table a bounds failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    ProgramHeaders,
    SectionHeaders,
    Symbols,
    Strings,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgramHeaders => write!(f, "program header"),
            Self::SectionHeaders => write!(f, "section header"),
            Self::Symbols => write!(f, "symbol"),
            Self::Strings => write!(f, "string"),
        }
    }
}

/// ELF magic number
pub const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// Size of `e_ident`
pub const EI_NIDENT: usize = 16;
/// Index of the class byte in `e_ident`
pub const EI_CLASS: usize = 4;
/// Index of the data encoding byte in `e_ident`
pub const EI_DATA: usize = 5;

/// 64-bit object file class
pub const ELFCLASS64: u8 = 2;
/// Little-endian data encoding
pub const ELFDATA2LSB: u8 = 1;
/// Big-endian data encoding
pub const ELFDATA2MSB: u8 = 2;

/// Encoded size of the ELF-64 file header
pub const EHDR_SIZE: u64 = 64;
/// Encoded size of one ELF-64 program header
pub const PHDR_SIZE: u64 = 56;
/// Encoded size of one ELF-64 section header
pub const SHDR_SIZE: u64 = 64;
/// Encoded size of one ELF-64 symbol record
pub const SYM_SIZE: u64 = 24;

/// Reserved "no section" index
pub const SHN_UNDEF: u16 = 0;

/// Section type: inactive header slot
pub const SHT_NULL: u32 = 0;
/// Section type: program contents
pub const SHT_PROGBITS: u32 = 1;
/// Section type: full symbol table
pub const SHT_SYMTAB: u32 = 2;
/// Section type: string table
pub const SHT_STRTAB: u32 = 3;

/// The decoded ELF-64 file header.
///
/// Field names follow the ELF specification so they can be cross-checked
/// against `readelf` output directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Raw identification bytes, magic included.
    pub ident: [u8; EI_NIDENT],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u64,
    pub e_phoff: u64,
    pub e_shoff: u64,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

impl FileHeader {
    /// Class byte from `e_ident`.
    pub fn class(&self) -> u8 {
        self.ident[EI_CLASS]
    }

    /// Data encoding byte from `e_ident`.
    pub fn encoding(&self) -> u8 {
        self.ident[EI_DATA]
    }
}

/// One decoded ELF-64 program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHeaderEntry {
    pub p_type: u32,
    pub p_flags: u32,
    pub p_offset: u64,
    pub p_vaddr: u64,
    pub p_paddr: u64,
    pub p_filesz: u64,
    pub p_memsz: u64,
    pub p_align: u64,
}

/// One decoded ELF-64 section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeaderEntry {
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    pub sh_addr: u64,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    pub sh_entsize: u64,
}

/// One decoded ELF-64 symbol record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub st_name: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
    pub st_value: u64,
    pub st_size: u64,
}
