//! Streaming reader over the decompressed content of one entry.

use flate2::{Decompress, FlushDecompress, Status};
use log::{trace, warn};
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Result, UnzipError};
use crate::io::{BUFFER_SIZE, FileSource};

use super::structures::*;

/// Pull-based reader producing the decompressed bytes of one archive entry.
///
/// Each `EntrySource` owns its own file handle and, for deflate entries, its
/// own inflate state; both are released on drop. Readers over the same
/// archive are independent of each other.
pub struct EntrySource {
    src: FileSource,
    name: String,
    entry: FileEntry,
    /// Decompressed bytes still expected
    remaining: usize,
    decoder: Decoder,
}

/// Decompression strategy, chosen once from the entry's method.
enum Decoder {
    Stored,
    Deflate(Inflater),
}

impl EntrySource {
    /// Open `path`, validate the local file header of `entry` and position
    /// the reader at the start of its payload.
    ///
    /// # Errors
    ///
    /// [`UnzipError::EntryNotFound`] for the empty sentinel and
    /// [`UnzipError::FieldOutOfRange`] for any other negative field. Also
    /// fails on I/O errors, on a local header signature mismatch and on any
    /// compression method other than stored or deflate.
    pub fn new(path: &Path, name: &str, entry: FileEntry) -> Result<Self> {
        if entry.is_empty() {
            return Err(UnzipError::EntryNotFound {
                path: path.to_path_buf(),
                name: name.to_string(),
            });
        }
        let offset = non_negative(path, name, "offset", entry.offset)?;
        let comp_length = non_negative(path, name, "compressed length", entry.comp_length)?;
        let remaining = non_negative(path, name, "uncompressed length", entry.uncomp_length)?;

        let mut src = FileSource::open(path)?;
        src.seek(offset as u64)?;
        skip_local_header(&mut src, name, entry)?;

        let decoder = match entry.method() {
            CompressionMethod::Stored => Decoder::Stored,
            CompressionMethod::Deflate => Decoder::Deflate(Inflater::new(comp_length)),
            CompressionMethod::Unknown(method) => {
                return Err(UnzipError::UnsupportedCompression {
                    path: path.to_path_buf(),
                    entry: name.to_string(),
                    method,
                });
            }
        };
        trace!(
            "opened [{name}] in [{}]: {:?}, payload at {}",
            path.display(),
            entry.method(),
            src.position()?
        );

        Ok(Self {
            src,
            name: name.to_string(),
            entry,
            remaining,
            decoder,
        })
    }

    /// Produce up to `buf.len()` decompressed bytes.
    ///
    /// Returns `Ok(None)` once the entry is exhausted; every later call does
    /// the same. `Ok(Some(0))` is only returned for an empty `buf`.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        if buf.is_empty() {
            return Ok(Some(0));
        }
        let len = buf.len().min(self.remaining);
        let out = &mut buf[..len];

        let produced = match &mut self.decoder {
            Decoder::Stored => {
                let n = self.src.read_up_to(out)?;
                if n == 0 {
                    warn!(
                        "[{}] in [{}] ended {} bytes early",
                        self.name,
                        self.src.path().display(),
                        self.remaining
                    );
                    self.remaining = 0;
                    return Ok(None);
                }
                Some(n)
            }
            Decoder::Deflate(inflater) => inflater.read(&mut self.src, &self.name, out)?,
        };

        match produced {
            Some(n) => {
                self.remaining -= n;
                Ok(Some(n))
            }
            None => Ok(None),
        }
    }

    /// Decompressed bytes not yet produced, according to the Central Directory.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn entry(&self) -> FileEntry {
        self.entry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zip_file_path(&self) -> &Path {
        self.src.path()
    }
}

impl Read for EntrySource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_chunk(buf)?.unwrap_or(0))
    }
}

/// Reject negative values other than the empty-entry sentinel.
fn non_negative(path: &Path, name: &str, field: &'static str, value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| UnzipError::FieldOutOfRange {
        path: path.to_path_buf(),
        entry: name.to_string(),
        field,
        value: value.into(),
    })
}

/// Check the local file header signature and skip to the payload.
fn skip_local_header(src: &mut FileSource, name: &str, entry: FileEntry) -> Result<()> {
    let sig = src.read_u32_le()?;
    if sig != LFH_SIGNATURE {
        return Err(UnzipError::InvalidLocalHeader {
            path: src.path().to_path_buf(),
            entry: name.to_string(),
            offset: entry.offset,
            found: sig,
            expected: LFH_SIGNATURE,
        });
    }
    // versions, flags, method, time, date, crc32 and both sizes
    src.skip(LFH_SIZE as u64 - 8)?;
    let name_length = src.read_u16_le()?;
    let extra_length = src.read_u16_le()?;
    src.skip(name_length as u64 + extra_length as u64)
}

/// Raw deflate state plus the staging buffer feeding it.
///
/// Never reads past the entry's compressed length, so bytes of the
/// following entry are left untouched.
struct Inflater {
    stream: Decompress,
    buf: Box<[u8]>,
    pos: usize,
    avail: usize,
    /// Compressed bytes of the entry not yet staged
    comp_left: usize,
    finished: bool,
}

impl Inflater {
    fn new(comp_length: usize) -> Self {
        Self {
            // ZIP embeds deflate data without a zlib header
            stream: Decompress::new(false),
            buf: vec![0u8; BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            avail: 0,
            comp_left: comp_length,
            finished: false,
        }
    }

    /// Inflate into `out` until at least one byte is produced or the stream
    /// ends.
    fn read(
        &mut self,
        src: &mut FileSource,
        name: &str,
        out: &mut [u8],
    ) -> Result<Option<usize>> {
        if self.finished {
            return Ok(None);
        }
        let failure = |src: &FileSource, message: String| UnzipError::Inflate {
            path: src.path().to_path_buf(),
            entry: name.to_string(),
            message,
        };
        loop {
            if self.pos == self.avail {
                self.refill(src)?;
            }

            let in_before = self.stream.total_in();
            let out_before = self.stream.total_out();
            let status = self
                .stream
                .decompress(&self.buf[self.pos..self.avail], out, FlushDecompress::None)
                .map_err(|e| failure(&*src, e.to_string()))?;
            let consumed = (self.stream.total_in() - in_before) as usize;
            let produced = (self.stream.total_out() - out_before) as usize;
            self.pos += consumed;

            if status == Status::StreamEnd {
                self.finished = true;
                return Ok((produced > 0).then_some(produced));
            }
            if produced > 0 {
                return Ok(Some(produced));
            }
            if consumed == 0 {
                let message = format!(
                    "compressed data ended after [{}] bytes, [{}] bytes never read",
                    self.stream.total_in(),
                    self.comp_left
                );
                return Err(failure(&*src, message));
            }
        }
    }

    fn refill(&mut self, src: &mut FileSource) -> Result<()> {
        let limit = self.buf.len().min(self.comp_left);
        self.avail = src.read_up_to(&mut self.buf[..limit])?;
        self.pos = 0;
        self.comp_left -= self.avail;
        trace!("staged {} compressed bytes, {} left", self.avail, self.comp_left);
        Ok(())
    }
}
