//! File acquisition for the parser.
//!
//! This module provides [`FileImage`], which opens a file and maps its
//! contents read-only into memory. The parsing core only ever sees a
//! borrowed byte slice, so it stays independent of how the bytes were
//! acquired; dropping the `FileImage` unmaps them on every exit path.

pub mod error;

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

use crate::io::error::{IoError, Result};

/// A read-only, memory-mapped file.
#[derive(Debug)]
pub struct FileImage {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    len: u64,
}

impl FileImage {
    /// Open `path` and map its contents read-only.
    ///
    /// Only regular files can be mapped; directories and other special
    /// files are rejected up front with a clear error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(IoError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        let len = metadata.len();

        debug!(path = %path.display(), size = len, "mapping file");

        let mmap = if len == 0 {
            None
        } else {
            // Safety: the map is read-only and backed by a regular file.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            len,
        })
    }

    /// The mapped contents; empty for zero-length files.
    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// File size in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
