//! Custom error types for the I/O module.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("underlying I/O error")]
    StdIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IoError>;
