//! elendil: bounds-checked ELF-64 introspection.
//!
//! Opens an ELF-64 binary, validates its file header and header tables,
//! and exposes typed, zero-copy views of program headers, section
//! headers, the symbol table, and their string tables. The companion
//! binary renders the parsed image as a readelf-style text dump.
//!
//! Every byte the parser touches is bounds-checked first, so malformed
//! or truncated files produce typed errors instead of panics or
//! out-of-bounds reads.
//!
//! # Example
//!
//! ```no_run
//! use elendil::{ElfImage, FileImage};
//!
//! # fn main() -> Result<(), elendil::Error> {
//! let file = FileImage::open("/bin/ls")?;
//! let image = ElfImage::parse(file.bytes())?;
//! for line in elendil::render(&image) {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod elf;
pub mod error;
pub mod io;
pub mod logging;
pub mod render;

pub use crate::elf::{ElfError, ElfImage, SymbolTable};
pub use crate::error::{Error, Result};
pub use crate::io::FileImage;
pub use crate::render::render;
