use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// Short label used by the verbose listing
impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMethod::Stored => f.pad("Stored"),
            CompressionMethod::Deflate => f.pad("Defl:N"),
            CompressionMethod::Unknown(_) => f.pad(&format!("#{}", self.as_u16())),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes
pub struct EndOfCentralDirectory {
    /// Number of Central Directory records
    pub records_count: u16,
    /// Offset of the Central Directory from the start of the archive
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: u32 = 0x06054b50;
    pub const SIZE: usize = 22;

    const RECORDS_COUNT_OFFSET: usize = 8;
    const CD_OFFSET_OFFSET: usize = 16;

    /// Decode the fields of a record starting at `data[0]`.
    ///
    /// The caller guarantees `data` holds at least [`Self::SIZE`] bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let records_count = LittleEndian::read_u16(&data[Self::RECORDS_COUNT_OFFSET..]);
        let cd_offset = LittleEndian::read_u32(&data[Self::CD_OFFSET_OFFSET..]);
        Self {
            records_count,
            cd_offset,
        }
    }

    /// Scan `buf` backwards for the EOCD signature.
    ///
    /// Returns the rightmost position that leaves room for a complete
    /// record, or, when the signature only occurs too close to the end,
    /// `Err(Some(distance_from_end))` of the rightmost occurrence.
    /// `Err(None)` means the signature does not occur at all.
    pub fn locate(buf: &[u8]) -> Result<usize, Option<usize>> {
        let sig = Self::SIGNATURE.to_le_bytes();
        let mut too_close = None;
        for i in (0..buf.len().saturating_sub(3)).rev() {
            if buf[i..i + 4] != sig {
                continue;
            }
            if i + Self::SIZE <= buf.len() {
                return Ok(i);
            }
            too_close.get_or_insert(buf.len() - i);
        }
        Err(too_close)
    }
}

/// Central Directory File Header (CDFH)
pub const CDFH_SIGNATURE: u32 = 0x02014b50;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: u32 = 0x04034b50;
pub const LFH_SIZE: usize = 30;

/// Location and size of one file inside the archive, as recorded in the
/// Central Directory.
///
/// An entry with `offset == -1` is the "not found" sentinel returned by
/// [`Index::find_zip_entry`](super::Index::find_zip_entry); its other
/// fields carry no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileEntry {
    /// Offset of the local file header from the start of the archive
    pub offset: i32,
    /// Length of the payload as stored in the archive
    pub comp_length: i32,
    /// Length of the payload after decompression
    pub uncomp_length: i32,
    /// Compression method code, see [`CompressionMethod`]
    pub comp_method: u16,
}

impl FileEntry {
    pub const EMPTY: FileEntry = FileEntry {
        offset: -1,
        comp_length: -1,
        uncomp_length: -1,
        comp_method: 0,
    };

    pub fn new(offset: i32, comp_length: i32, uncomp_length: i32, comp_method: u16) -> Self {
        Self {
            offset,
            comp_length,
            uncomp_length,
            comp_method,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.offset == -1
    }

    pub fn method(&self) -> CompressionMethod {
        CompressionMethod::from_u16(self.comp_method)
    }
}

impl Default for FileEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}
