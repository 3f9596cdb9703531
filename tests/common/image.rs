//! A small ELF-64 image builder for integration tests.
//!
//! Collects program headers and sections, then lays out a complete file:
//! header, program header table, section payloads, the generated section
//! name table, and the section header table. Images are built in native
//! byte order so the tests pass on any host.

use elendil::elf::header::host_encoding;
use elendil::elf::{
    EHDR_SIZE, ELFCLASS64, ELF_MAGIC, PHDR_SIZE, SHDR_SIZE, SHT_STRTAB, SHT_SYMTAB, SYM_SIZE,
};

struct SectionSpec {
    name: String,
    sh_type: u32,
    addr: u64,
    data: Vec<u8>,
    link: u32,
    entsize: u64,
}

struct ProgramHeaderSpec {
    p_type: u32,
    offset: u64,
    vaddr: u64,
    filesz: u64,
}

pub struct ImageBuilder {
    e_type: u16,
    entry: u64,
    program_headers: Vec<ProgramHeaderSpec>,
    sections: Vec<SectionSpec>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            e_type: 2, // ET_EXEC
            entry: 0x401000,
            program_headers: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn entry(mut self, entry: u64) -> Self {
        self.entry = entry;
        self
    }

    pub fn program_header(mut self, p_type: u32, offset: u64, vaddr: u64, filesz: u64) -> Self {
        self.program_headers.push(ProgramHeaderSpec {
            p_type,
            offset,
            vaddr,
            filesz,
        });
        self
    }

    pub fn section(self, name: &str, sh_type: u32, data: Vec<u8>) -> Self {
        self.section_linked(name, sh_type, data, 0, 0)
    }

    pub fn section_linked(
        mut self,
        name: &str,
        sh_type: u32,
        data: Vec<u8>,
        link: u32,
        entsize: u64,
    ) -> Self {
        self.sections.push(SectionSpec {
            name: name.to_string(),
            sh_type,
            addr: 0,
            data,
            link,
            entsize,
        });
        self
    }

    /// Append a `.symtab`/`.strtab` pair holding the null symbol plus one
    /// global function symbol per `(name, value)` entry, all attached to
    /// section 1.
    pub fn symbols(self, symbols: &[(&str, u64)]) -> Self {
        let names: Vec<&str> = symbols.iter().map(|(name, _)| *name).collect();
        let (strtab, offsets) = string_table(&names);

        let mut symtab = symbol_record(0, 0, 0, 0, 0);
        for ((_, value), name_off) in symbols.iter().zip(&offsets) {
            symtab.extend(symbol_record(*name_off, 0x12, 1, *value, 0));
        }

        // .symtab lands at index len+1, so .strtab follows at len+2.
        let strtab_index = (self.sections.len() + 2) as u32;
        self.section_linked(".symtab", SHT_SYMTAB, symtab, strtab_index, SYM_SIZE)
            .section(".strtab", SHT_STRTAB, strtab)
    }

    /// Lay out and encode the image.
    pub fn build(self) -> Vec<u8> {
        let mut shstrtab = vec![0u8];
        let mut name_offsets = Vec::new();
        for section in &self.sections {
            name_offsets.push(shstrtab.len() as u32);
            shstrtab.extend(section.name.bytes());
            shstrtab.push(0);
        }
        let shstrtab_name = shstrtab.len() as u32;
        shstrtab.extend(b".shstrtab");
        shstrtab.push(0);

        let phnum = self.program_headers.len() as u16;
        let shnum = self.sections.len() as u16 + 2; // null slot and .shstrtab
        let phoff = if phnum > 0 { EHDR_SIZE } else { 0 };

        let mut payload_off = EHDR_SIZE + phnum as u64 * PHDR_SIZE;
        let mut payload_offsets = Vec::new();
        for section in &self.sections {
            payload_offsets.push(payload_off);
            payload_off += section.data.len() as u64;
        }
        let shstrtab_off = payload_off;
        let shoff = shstrtab_off + shstrtab.len() as u64;

        let mut image = Vec::new();
        image.extend_from_slice(ELF_MAGIC);
        image.push(ELFCLASS64);
        image.push(host_encoding());
        image.push(1); // EV_CURRENT
        image.extend_from_slice(&[0u8; 9]);
        push_u16(&mut image, self.e_type);
        push_u16(&mut image, 62); // EM_X86_64
        push_u32(&mut image, 1);
        push_u64(&mut image, self.entry);
        push_u64(&mut image, phoff);
        push_u64(&mut image, shoff);
        push_u32(&mut image, 0); // e_flags
        push_u16(&mut image, EHDR_SIZE as u16);
        push_u16(&mut image, PHDR_SIZE as u16);
        push_u16(&mut image, phnum);
        push_u16(&mut image, SHDR_SIZE as u16);
        push_u16(&mut image, shnum);
        push_u16(&mut image, shnum - 1); // .shstrtab is always last

        for phdr in &self.program_headers {
            push_u32(&mut image, phdr.p_type);
            push_u32(&mut image, 5); // PF_R | PF_X
            push_u64(&mut image, phdr.offset);
            push_u64(&mut image, phdr.vaddr);
            push_u64(&mut image, phdr.vaddr);
            push_u64(&mut image, phdr.filesz);
            push_u64(&mut image, phdr.filesz);
            push_u64(&mut image, 0x1000);
        }

        for section in &self.sections {
            image.extend_from_slice(&section.data);
        }
        image.extend_from_slice(&shstrtab);

        image.extend_from_slice(&[0u8; SHDR_SIZE as usize]); // SHN_UNDEF slot
        for ((section, name_off), offset) in self
            .sections
            .iter()
            .zip(&name_offsets)
            .zip(&payload_offsets)
        {
            push_shdr(
                &mut image,
                *name_off,
                section.sh_type,
                section.addr,
                *offset,
                section.data.len() as u64,
                section.link,
                section.entsize,
            );
        }
        push_shdr(
            &mut image,
            shstrtab_name,
            SHT_STRTAB,
            0,
            shstrtab_off,
            shstrtab.len() as u64,
            0,
            0,
        );
        image
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode one 24-byte symbol record.
pub fn symbol_record(name: u32, info: u8, shndx: u16, value: u64, size: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(SYM_SIZE as usize);
    bytes.extend_from_slice(&name.to_ne_bytes());
    bytes.push(info);
    bytes.push(0); // st_other
    bytes.extend_from_slice(&shndx.to_ne_bytes());
    bytes.extend_from_slice(&value.to_ne_bytes());
    bytes.extend_from_slice(&size.to_ne_bytes());
    bytes
}

/// Build a string table holding `names`, returning each name's offset.
pub fn string_table(names: &[&str]) -> (Vec<u8>, Vec<u32>) {
    let mut table = vec![0u8];
    let mut offsets = Vec::new();
    for name in names {
        offsets.push(table.len() as u32);
        table.extend(name.bytes());
        table.push(0);
    }
    (table, offsets)
}

#[allow(clippy::too_many_arguments)]
fn push_shdr(
    image: &mut Vec<u8>,
    name: u32,
    sh_type: u32,
    addr: u64,
    offset: u64,
    size: u64,
    link: u32,
    entsize: u64,
) {
    push_u32(image, name);
    push_u32(image, sh_type);
    push_u64(image, 0); // sh_flags
    push_u64(image, addr);
    push_u64(image, offset);
    push_u64(image, size);
    push_u32(image, link);
    push_u32(image, 0); // sh_info
    push_u64(image, 1); // sh_addralign
    push_u64(image, entsize);
}

fn push_u16(image: &mut Vec<u8>, value: u16) {
    image.extend_from_slice(&value.to_ne_bytes());
}

fn push_u32(image: &mut Vec<u8>, value: u32) {
    image.extend_from_slice(&value.to_ne_bytes());
}

fn push_u64(image: &mut Vec<u8>, value: u64) {
    image.extend_from_slice(&value.to_ne_bytes());
}
