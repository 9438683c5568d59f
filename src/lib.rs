//! # zipseek
//!
//! Random access to the entries of a ZIP archive without extracting it.
//!
//! An [`Index`] is built once per archive by parsing its Central Directory.
//! Entries are then looked up by name in constant time and streamed through
//! an [`EntrySource`], which seeks straight to the entry's local header and
//! decompresses on demand.
//!
//! ## Features
//!
//! - Locate the Central Directory from the file's tail, whatever the archive size
//! - Name lookups that never touch the file system
//! - Streaming reads of STORED and DEFLATE entries through a bounded buffer
//! - Errors carrying the archive path, entry name and offending offset
//!
//! ## Example
//!
//! ```no_run
//! use std::io::Read;
//! use zipseek::{Index, open_zip_entry};
//!
//! fn main() -> anyhow::Result<()> {
//!     let index = Index::open("bundle.zip")?;
//!
//!     // Lookups of missing names return the empty sentinel
//!     assert!(index.find_zip_entry("does/not/exist").is_empty());
//!
//!     let mut reader = open_zip_entry(&index, "bundle/bbbb.txt")?;
//!     let mut text = String::new();
//!     reader.read_to_string(&mut text)?;
//!     println!("{text}");
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, UnzipError};
pub use io::FileSource;
pub use zip::{CompressionMethod, EntrySource, FileEntry, Index};

/// Open a reader over the named entry of the archive behind `index`.
///
/// # Errors
///
/// Returns [`UnzipError::EntryNotFound`] if the name is not in the index, or
/// any error raised while validating the entry's local header.
pub fn open_zip_entry(index: &Index, name: &str) -> Result<EntrySource> {
    index.open_entry(name)
}
