//! ELF-64 file header parsing and validation.
//!
//! The header is the root of trust for everything else in the file: the
//! program header and section header tables are located by fields decoded
//! here, so this module checks them against the file bounds before any
//! table view is built.

use tracing::debug;

use crate::elf::bytes::ByteSource;
use crate::elf::types::{
    ElfError, FileHeader, Result, TableKind, EHDR_SIZE, EI_CLASS, EI_DATA, EI_NIDENT, ELFCLASS64,
    ELFDATA2LSB, ELFDATA2MSB, ELF_MAGIC, PHDR_SIZE, SHDR_SIZE, SHN_UNDEF,
};

/// Data encoding byte a file must carry to be readable on this host.
pub const fn host_encoding() -> u8 {
    if cfg!(target_endian = "big") {
        ELFDATA2MSB
    } else {
        ELFDATA2LSB
    }
}

/// Decode and validate the file header at offset 0.
///
/// Checks run in a fixed order so the first structural violation is the
/// one reported: magic, class, encoding, field decode, geometry. Only
/// 64-bit files in the host's byte order are admitted.
pub fn parse_header(source: &ByteSource<'_>) -> Result<FileHeader> {
    // A file too short to hold the magic cannot be ELF either.
    let magic = source.slice(0, 4).unwrap_or(&[]);
    if magic != ELF_MAGIC {
        return Err(ElfError::BadMagic);
    }

    let mut ident = [0u8; EI_NIDENT];
    ident.copy_from_slice(source.slice(0, EI_NIDENT as u64)?);

    let class = ident[EI_CLASS];
    if class != ELFCLASS64 {
        return Err(ElfError::UnsupportedClass(class));
    }
    let encoding = ident[EI_DATA];
    if encoding != host_encoding() {
        return Err(ElfError::UnsupportedEncoding(encoding));
    }

    let header = FileHeader {
        ident,
        e_type: source.read_u16(16)?,
        e_machine: source.read_u16(18)?,
        e_version: source.read_u32(20)?,
        e_entry: source.read_u64(24)?,
        e_phoff: source.read_u64(32)?,
        e_shoff: source.read_u64(40)?,
        e_flags: source.read_u32(48)?,
        e_ehsize: source.read_u16(52)?,
        e_phentsize: source.read_u16(54)?,
        e_phnum: source.read_u16(56)?,
        e_shentsize: source.read_u16(58)?,
        e_shnum: source.read_u16(60)?,
        e_shstrndx: source.read_u16(62)?,
    };

    validate_geometry(&header, source)?;
    debug!(
        e_type = header.e_type,
        e_machine = header.e_machine,
        program_headers = header.e_phnum,
        sections = header.e_shnum,
        "parsed ELF file header"
    );
    Ok(header)
}

/// Cross-field checks: self-reported sizes, table bounds, and the section
/// name table index.
fn validate_geometry(header: &FileHeader, source: &ByteSource<'_>) -> Result<()> {
    if (header.e_ehsize as u64) < EHDR_SIZE {
        return Err(ElfError::MalformedHeader(format!(
            "e_ehsize {} is smaller than the {}-byte ELF-64 header",
            header.e_ehsize, EHDR_SIZE
        )));
    }
    if header.e_phnum > 0 && (header.e_phentsize as u64) < PHDR_SIZE {
        return Err(ElfError::MalformedHeader(format!(
            "e_phentsize {} is smaller than the {}-byte program header",
            header.e_phentsize, PHDR_SIZE
        )));
    }
    if header.e_shnum > 0 && (header.e_shentsize as u64) < SHDR_SIZE {
        return Err(ElfError::MalformedHeader(format!(
            "e_shentsize {} is smaller than the {}-byte section header",
            header.e_shentsize, SHDR_SIZE
        )));
    }

    check_table_bounds(
        source,
        TableKind::ProgramHeaders,
        header.e_phoff,
        header.e_phentsize,
        header.e_phnum,
    )?;
    check_table_bounds(
        source,
        TableKind::SectionHeaders,
        header.e_shoff,
        header.e_shentsize,
        header.e_shnum,
    )?;

    // The name table index must address a real section slot. SHN_UNDEF is
    // the only legal value when the file has no sections at all.
    if header.e_shnum == 0 {
        if header.e_shstrndx != SHN_UNDEF {
            return Err(ElfError::InvalidStringTableIndex {
                index: header.e_shstrndx,
                count: header.e_shnum,
            });
        }
    } else if header.e_shstrndx >= header.e_shnum {
        return Err(ElfError::InvalidStringTableIndex {
            index: header.e_shstrndx,
            count: header.e_shnum,
        });
    }
    Ok(())
}

fn check_table_bounds(
    source: &ByteSource<'_>,
    table: TableKind,
    offset: u64,
    entry_size: u16,
    count: u16,
) -> Result<()> {
    // u16 * u16 cannot overflow u64.
    let len = entry_size as u64 * count as u64;
    let end = offset
        .checked_add(len)
        .ok_or(ElfError::TruncatedTable { table, offset, len })?;
    if end > source.len() {
        return Err(ElfError::TruncatedTable { table, offset, len });
    }
    Ok(())
}
