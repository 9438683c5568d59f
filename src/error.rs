//! Error type shared by the index and the entry reader.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UnzipError>;

/// Errors raised while indexing an archive or reading one of its entries.
///
/// Every variant carries the archive path so a message is diagnosable on
/// its own, without re-running with logging enabled.
#[derive(Debug, Error)]
pub enum UnzipError {
    #[error(
        "Cannot find Central Directory in an alleged zip file: [{}], \
         searching through: [{searched}] bytes on the end of the file",
        path.display()
    )]
    CentralDirectoryNotFound { path: PathBuf, searched: usize },

    #[error(
        "Invalid EOCD position (from end): [{from_end}], in an alleged zip file: [{}]",
        path.display()
    )]
    InvalidEocdPosition { path: PathBuf, from_end: usize },

    #[error(
        "Cannot find Central Directory file header in an alleged zip file: [{}], \
         position: [{offset}], invalid signature: [{found:#010x}], must be: [{expected:#010x}]",
        path.display()
    )]
    InvalidCentralDirectoryHeader {
        path: PathBuf,
        offset: u64,
        found: u32,
        expected: u32,
    },

    #[error(
        "Cannot find local file header for entry: [{entry}] in an alleged zip file: [{}], \
         position: [{offset}], invalid signature: [{found:#010x}], must be: [{expected:#010x}]",
        path.display()
    )]
    InvalidLocalHeader {
        path: PathBuf,
        entry: String,
        offset: i32,
        found: u32,
        expected: u32,
    },

    #[error(
        "Value out of range for field: [{field}] of entry: [{entry}]: [{value}], in zip file: [{}]",
        path.display()
    )]
    FieldOutOfRange {
        path: PathBuf,
        entry: String,
        field: &'static str,
        value: i64,
    },

    #[error(
        "Entry name is not valid UTF-8: [{name}] in zip file: [{}], \
         Central Directory position: [{offset}]",
        path.display()
    )]
    InvalidEntryName {
        path: PathBuf,
        /// Lossy rendering, for display only
        name: String,
        offset: u64,
    },

    #[error("Invalid Duplicate entry: [{name}] in a zip file: [{}]", path.display())]
    DuplicateEntry { path: PathBuf, name: String },

    #[error("Specified zip entry not found: [{name}] in zip file: [{}]", path.display())]
    EntryNotFound { path: PathBuf, name: String },

    #[error(
        "Unsupported compression method: [{method}], in entry: [{entry}], in ZIP file: [{}]",
        path.display()
    )]
    UnsupportedCompression {
        path: PathBuf,
        entry: String,
        method: u16,
    },

    #[error("Inflate error: [{message}], in entry: [{entry}], file: [{}]", path.display())]
    Inflate {
        path: PathBuf,
        entry: String,
        message: String,
    },

    #[error("I/O error on zip file: [{}]: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<UnzipError> for io::Error {
    fn from(err: UnzipError) -> Self {
        let kind = match &err {
            UnzipError::Io { source, .. } => source.kind(),
            UnzipError::EntryNotFound { .. } => io::ErrorKind::NotFound,
            UnzipError::UnsupportedCompression { .. } => io::ErrorKind::Unsupported,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}
