//! ZIP archive indexing and entry reading.
//!
//! ## Architecture
//!
//! The module is organized into three components:
//!
//! - [`structures`]: on-disk signatures, the EOCD record and the [`FileEntry`] descriptor
//! - [`index`]: the Central Directory parser producing an immutable [`Index`]
//! - [`entry`]: [`EntrySource`], a pull-based reader over one entry's payload
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! The EOCD is found by scanning the file's tail, so building an index never
//! reads entry data, however large the archive.
//!
//! ## Limitations
//!
//! - STORED and DEFLATE only
//! - No ZIP64, encryption or multi-disk archives
//! - Offsets and lengths must fit in 31 bits

mod entry;
mod index;
mod structures;

pub use entry::EntrySource;
pub use index::Index;
pub use structures::*;
