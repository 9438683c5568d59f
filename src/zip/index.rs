//! Central Directory index.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Read a fixed-size window from the file's tail and find the End of
//!    Central Directory (EOCD) record in it
//! 2. Seek to the Central Directory and decode every record in order
//! 3. Keep each file record in a name map; directory records are dropped
//!
//! The archive is opened only while the index is built. Reading entry data
//! happens later through [`EntrySource`], which opens its own handle.

use log::{debug, trace};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use crate::error::{Result, UnzipError};
use crate::io::{BUFFER_SIZE, FileSource};

use super::entry::EntrySource;
use super::structures::*;

/// Upper bound on the buffer reserved up front by [`Index::read_entry`].
const MAX_PREALLOCATION: usize = 16 * BUFFER_SIZE;

/// One decoded Central Directory File Header.
struct CentralDirectoryRecord {
    name: String,
    entry: FileEntry,
}

impl CentralDirectoryRecord {
    /// Directory entries end with '/'
    fn is_file(&self) -> bool {
        !self.name.ends_with('/')
    }
}

/// Immutable name → [`FileEntry`] index over the files of one archive.
///
/// Built once by [`Index::open`]. Lookups never touch the file system, so an
/// `Index` can be shared freely between threads.
///
/// ## Example
///
/// ```no_run
/// use std::io::Read;
/// use zipseek::Index;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = Index::open("bundle.zip")?;
/// for name in index.get_entries() {
///     println!("{name}");
/// }
///
/// let mut text = String::new();
/// index.open_entry("bundle/aaa.txt")?.read_to_string(&mut text)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Index {
    path: PathBuf,
    entries: HashMap<String, FileEntry>,
    names: Vec<String>,
}

impl Index {
    /// Parse the Central Directory of the archive at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, if the EOCD record or any Central
    /// Directory header is malformed, or if two file records share a name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut src = FileSource::open(path)?;

        let eocd = find_eocd(&mut src)?;
        debug!(
            "Central Directory of [{}]: {} records at offset {}",
            path.display(),
            eocd.records_count,
            eocd.cd_offset
        );

        src.seek(eocd.cd_offset as u64)?;
        let mut entries = HashMap::with_capacity(eocd.records_count as usize);
        let mut names = Vec::with_capacity(eocd.records_count as usize);
        for _ in 0..eocd.records_count {
            let record = read_record(&mut src)?;
            trace!("record [{}]: {:?}", record.name, record.entry);
            if !record.is_file() {
                continue;
            }
            match entries.entry(record.name) {
                Entry::Occupied(slot) => {
                    return Err(UnzipError::DuplicateEntry {
                        path: path.to_path_buf(),
                        name: slot.key().clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    names.push(slot.key().clone());
                    slot.insert(record.entry);
                }
            }
        }
        debug!("indexed {} files in [{}]", names.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            names,
        })
    }

    /// Returns the entry with the specified name, or [`FileEntry::EMPTY`] if
    /// there is none.
    pub fn find_zip_entry(&self, name: &str) -> FileEntry {
        self.get(name).unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<FileEntry> {
        self.entries.get(name).copied()
    }

    /// File names in Central Directory order.
    pub fn get_entries(&self) -> &[String] {
        &self.names
    }

    pub fn zip_file_path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Open a decompressing reader over the named entry.
    ///
    /// # Errors
    ///
    /// [`UnzipError::EntryNotFound`] if the index has no such file, otherwise
    /// any error raised by [`EntrySource::new`].
    pub fn open_entry(&self, name: &str) -> Result<EntrySource> {
        let entry = self.get(name).ok_or_else(|| UnzipError::EntryNotFound {
            path: self.path.clone(),
            name: name.to_string(),
        })?;
        EntrySource::new(&self.path, name, entry)
    }

    /// Read the whole decompressed content of the named entry into memory.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let mut source = self.open_entry(name)?;
        // Declared length is untrusted
        let mut data = Vec::with_capacity(source.remaining().min(MAX_PREALLOCATION));
        let mut buf = vec![0u8; BUFFER_SIZE];
        while let Some(n) = source.read_chunk(&mut buf)? {
            data.extend_from_slice(&buf[..n]);
        }
        Ok(data)
    }
}

/// Find and decode the End of Central Directory record.
///
/// Only the last `BUFFER_SIZE` bytes are searched, which leaves room for a
/// short archive comment after the record.
fn find_eocd(src: &mut FileSource) -> Result<EndOfCentralDirectory> {
    let window = src.size().min(BUFFER_SIZE as u64) as usize;
    let mut buf = vec![0u8; window];
    src.read_tail(&mut buf)?;

    match EndOfCentralDirectory::locate(&buf) {
        Ok(pos) => {
            trace!("EOCD found {} bytes from the end", window - pos);
            Ok(EndOfCentralDirectory::from_bytes(&buf[pos..]))
        }
        Err(Some(from_end)) => Err(UnzipError::InvalidEocdPosition {
            path: src.path().to_path_buf(),
            from_end,
        }),
        Err(None) => Err(UnzipError::CentralDirectoryNotFound {
            path: src.path().to_path_buf(),
            searched: window,
        }),
    }
}

/// Decode the Central Directory File Header at the current position.
fn read_record(src: &mut FileSource) -> Result<CentralDirectoryRecord> {
    let header_offset = src.position()?;
    let sig = src.read_u32_le()?;
    if sig != CDFH_SIGNATURE {
        return Err(UnzipError::InvalidCentralDirectoryHeader {
            path: src.path().to_path_buf(),
            offset: header_offset,
            found: sig,
            expected: CDFH_SIGNATURE,
        });
    }

    // version made by, version needed, flags
    src.skip(6)?;
    let comp_method = src.read_u16_le()?;
    // mod time, mod date, crc32
    src.skip(8)?;
    let comp_length = src.read_u32_le()?;
    let uncomp_length = src.read_u32_le()?;
    let name_length = src.read_u16_le()?;
    let extra_length = src.read_u16_le()?;
    let comment_length = src.read_u16_le()?;
    // disk number, internal and external attributes
    src.skip(8)?;
    let offset = src.read_u32_le()?;

    let mut name_bytes = vec![0u8; name_length as usize];
    src.read_exact(&mut name_bytes)?;
    // Names are not transcoded. A lossy decode could merge distinct names
    let name = String::from_utf8(name_bytes).map_err(|err| UnzipError::InvalidEntryName {
        path: src.path().to_path_buf(),
        name: String::from_utf8_lossy(err.as_bytes()).into_owned(),
        offset: header_offset,
    })?;
    src.skip(extra_length as u64 + comment_length as u64)?;

    let to_i32 = |field: &'static str, value: u32| {
        i32::try_from(value).map_err(|_| UnzipError::FieldOutOfRange {
            path: src.path().to_path_buf(),
            entry: name.clone(),
            field,
            value: value.into(),
        })
    };
    let entry = FileEntry::new(
        to_i32("offset", offset)?,
        to_i32("compressed length", comp_length)?,
        to_i32("uncompressed length", uncomp_length)?,
        comp_method,
    );

    Ok(CentralDirectoryRecord { name, entry })
}
