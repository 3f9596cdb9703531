//! Error types for the elendil ELF introspection tool.
//!
//! Each layer keeps its own error enum; this module joins them into the
//! single type the library surface returns.

use thiserror::Error;

/// Main error type for elendil operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be acquired.
    #[error(transparent)]
    Io(#[from] crate::io::error::IoError),

    /// The file's bytes violate the ELF-64 structure.
    #[error(transparent)]
    Parse(#[from] crate::elf::ElfError),
}

/// Result type alias for elendil operations.
pub type Result<T> = std::result::Result<T, Error>;
