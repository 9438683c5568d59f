use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::BUFFER_SIZE;
use crate::error::{Result, UnzipError};

/// Buffered, seekable reader over a local archive file.
///
/// All I/O failures are reported as [`UnzipError::Io`] carrying the
/// archive path.
pub struct FileSource {
    reader: BufReader<File>,
    path: PathBuf,
    size: u64,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let wrap = |source| UnzipError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(wrap)?;
        let size = file.metadata().map_err(wrap)?.len();
        Ok(Self {
            reader: BufReader::with_capacity(BUFFER_SIZE, file),
            path: path.to_path_buf(),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file at the time it was opened
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn position(&mut self) -> Result<u64> {
        let res = self.reader.stream_position();
        self.wrap(res)
    }

    /// Seek to an absolute offset from the start of the file.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        let res = self.reader.seek(SeekFrom::Start(offset));
        self.wrap(res).map(drop)
    }

    /// Fill `buf` with the last `buf.len()` bytes of the file.
    pub fn read_tail(&mut self, buf: &mut [u8]) -> Result<()> {
        let res = self.reader.seek(SeekFrom::End(-(buf.len() as i64)));
        self.wrap(res)?;
        self.read_exact(buf)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let res = self.reader.read_exact(buf);
        self.wrap(res)
    }

    /// Read until `buf` is full or the file ends, returning the number of
    /// bytes read.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return self.wrap(Err(e)),
            }
        }
        Ok(filled)
    }

    /// Skip exactly `len` bytes; running into the end of the file is an error.
    pub fn skip(&mut self, len: u64) -> Result<()> {
        let res = io::copy(&mut (&mut self.reader).take(len), &mut io::sink());
        let skipped = self.wrap(res)?;
        if skipped != len {
            return self.wrap(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("cannot skip [{len}] bytes, only [{skipped}] available"),
            )));
        }
        Ok(())
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let res = self.reader.read_u16::<LittleEndian>();
        self.wrap(res)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let res = self.reader.read_u32::<LittleEndian>();
        self.wrap(res)
    }

    fn wrap<T>(&self, res: io::Result<T>) -> Result<T> {
        res.map_err(|source| UnzipError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
