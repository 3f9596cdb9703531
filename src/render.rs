//! Text rendering of a parsed image.
//!
//! Addresses and file offsets are printed in hexadecimal, counts and raw
//! type numbers in decimal, following readelf. Rendering is a pure
//! function of the validated image, so the same image always produces
//! the same lines.

use tracing::{debug, warn};

use crate::elf::{ElfImage, SymbolTable};

/// Stands in for a name whose string table lookup failed.
const NAME_PLACEHOLDER: &str = "<corrupt>";

/// Render the dump for `image`, one output line per element.
///
/// Rendering never fails: the image was validated at parse time, and the
/// remaining fallible steps (symbol table discovery, name lookups) fall
/// back to omission or a placeholder.
pub fn render(image: &ElfImage<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    render_file_header(image, &mut lines);
    render_sections(image, &mut lines);
    render_program_headers(image, &mut lines);
    render_symbols(image, &mut lines);
    lines
}

fn render_file_header(image: &ElfImage<'_>, lines: &mut Vec<String>) {
    let header = image.header();
    let magic: Vec<String> = header.ident.iter().map(|b| format!("{b:02x}")).collect();
    lines.push("ELF Header:".to_string());
    lines.push(format!("  Magic:   {}", magic.join(" ")));
    lines.push(format!("  Type: {}", header.e_type));
    lines.push(format!("  Machine: {}", header.e_machine));
    lines.push(format!("  Version: {}", header.e_version));
    lines.push(format!("  Entry point address: {:#x}", header.e_entry));
    lines.push(format!("  Program header offset: {:#x}", header.e_phoff));
    lines.push(format!("  Section header offset: {:#x}", header.e_shoff));
    lines.push(format!("  Flags: {}", header.e_flags));
    lines.push(format!("  Header size: {}", header.e_ehsize));
    lines.push(format!("  Program header entry size: {}", header.e_phentsize));
    lines.push(format!("  Program header count: {}", header.e_phnum));
    lines.push(format!("  Section header entry size: {}", header.e_shentsize));
    lines.push(format!("  Section header count: {}", header.e_shnum));
    lines.push(format!("  Section name table index: {}", header.e_shstrndx));
}

fn render_sections(image: &ElfImage<'_>, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("Section Headers:".to_string());
    // Slot 0 is the reserved null section; it carries no information.
    for (index, entry) in image.section_headers().iter().enumerate().skip(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable section header");
                continue;
            }
        };
        let name = match image.section_name(&entry) {
            Ok(name) => name,
            Err(err) => {
                debug!(index, error = %err, "section name lookup failed");
                NAME_PLACEHOLDER
            }
        };
        lines.push(format!("  {name}  Offset: {:#x}", entry.sh_offset));
    }
}

fn render_program_headers(image: &ElfImage<'_>, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("Program Headers:".to_string());
    for (index, entry) in image.program_headers().iter().enumerate() {
        match entry {
            Ok(entry) => lines.push(format!(
                "  Type: {}  Offset: {:#x}  Address: {:#x}",
                entry.p_type, entry.p_offset, entry.p_vaddr
            )),
            Err(err) => warn!(index, error = %err, "skipping unreadable program header"),
        }
    }
}

fn render_symbols(image: &ElfImage<'_>, lines: &mut Vec<String>) {
    let table = match image.find_symbol_table() {
        Ok(Some(table)) => table,
        // Stripped binaries are a normal sight; say nothing.
        Ok(None) => return,
        Err(err) => {
            warn!(error = %err, "symbol table is unusable, omitting symbols");
            return;
        }
    };
    lines.push(String::new());
    lines.push("Symbols:".to_string());
    render_symbol_names(&table, lines);
}

fn render_symbol_names(table: &SymbolTable<'_>, lines: &mut Vec<String>) {
    for (index, entry) in table.entries().iter().enumerate() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable symbol");
                continue;
            }
        };
        let name = match table.name_of(&entry) {
            Ok(name) => name,
            Err(err) => {
                debug!(index, error = %err, "symbol name lookup failed");
                NAME_PLACEHOLDER
            }
        };
        lines.push(format!("  {name}"));
    }
}
