//! Common test utilities and helpers.
//!
//! Shared by the integration tests: an ELF-64 image builder and
//! temp-file plumbing for exercising the memory-mapped path.

pub mod image;

use std::io::Write;

use tempfile::NamedTempFile;

/// Write `bytes` to a fresh temp file and return its handle.
///
/// The file is deleted when the handle drops, so callers must keep it
/// alive for as long as they read through it.
pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Byte offset of field `field` within section header `index`, located
/// through the image's own `e_shoff` and `e_shentsize` fields.
pub fn shdr_field_offset(image: &[u8], index: usize, field: usize) -> usize {
    let shoff = u64::from_ne_bytes(image[40..48].try_into().unwrap()) as usize;
    let shentsize = u16::from_ne_bytes(image[58..60].try_into().unwrap()) as usize;
    shoff + index * shentsize + field
}

/// Lines of the rendered block starting after `title`, up to the next
/// blank line.
pub fn block<'a>(lines: &'a [String], title: &str) -> &'a [String] {
    let start = lines
        .iter()
        .position(|line| line == title)
        .unwrap_or_else(|| panic!("missing block {title:?}"))
        + 1;
    let len = lines[start..]
        .iter()
        .position(|line| line.is_empty())
        .unwrap_or(lines.len() - start);
    &lines[start..start + len]
}
