//! Byte-level ZIP writer for building test archives.
//!
//! Only the fields the index and the entry reader look at carry real
//! values; CRCs and timestamps are left at zero.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;
use std::path::PathBuf;

pub const STORED: u16 = 0;
pub const DEFLATE: u16 = 8;

#[derive(Default)]
pub struct ZipBuilder {
    data: Vec<u8>,
    central: Vec<u8>,
    records: u16,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with a ready-made payload and return its local
    /// header offset.
    pub fn raw(
        &mut self,
        name: impl AsRef<[u8]>,
        method: u16,
        payload: &[u8],
        uncomp_length: u32,
        extra_length: u16,
    ) -> u32 {
        let name = name.as_ref();
        let offset = self.data.len() as u32;
        let extra = vec![0u8; extra_length as usize];

        let d = &mut self.data;
        d.extend_from_slice(&0x04034b50u32.to_le_bytes());
        d.extend_from_slice(&20u16.to_le_bytes()); // version needed
        d.extend_from_slice(&0u16.to_le_bytes()); // flags
        d.extend_from_slice(&method.to_le_bytes());
        d.extend_from_slice(&0u16.to_le_bytes()); // time
        d.extend_from_slice(&0u16.to_le_bytes()); // date
        d.extend_from_slice(&0u32.to_le_bytes()); // crc32
        d.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        d.extend_from_slice(&uncomp_length.to_le_bytes());
        d.extend_from_slice(&(name.len() as u16).to_le_bytes());
        d.extend_from_slice(&extra_length.to_le_bytes());
        d.extend_from_slice(name);
        d.extend_from_slice(&extra);
        d.extend_from_slice(payload);

        self.central_record(
            name,
            method,
            payload.len() as u32,
            uncomp_length,
            offset,
            extra_length,
        );
        offset
    }

    pub fn stored(&mut self, name: &str, content: &[u8]) -> u32 {
        self.raw(name, STORED, content, content.len() as u32, 0)
    }

    pub fn deflated(&mut self, name: &str, content: &[u8]) -> u32 {
        let payload = deflate(content);
        self.raw(name, DEFLATE, &payload, content.len() as u32, 0)
    }

    pub fn directory(&mut self, name: &str) -> u32 {
        assert!(name.ends_with('/'));
        self.raw(name, STORED, &[], 0, 0)
    }

    /// Append a Central Directory record without any local data.
    pub fn central_record(
        &mut self,
        name: impl AsRef<[u8]>,
        method: u16,
        comp_length: u32,
        uncomp_length: u32,
        offset: u32,
        extra_length: u16,
    ) {
        let name = name.as_ref();
        let comment = b"cd";
        let c = &mut self.central;
        c.extend_from_slice(&0x02014b50u32.to_le_bytes());
        c.extend_from_slice(&0x031eu16.to_le_bytes()); // version made by
        c.extend_from_slice(&20u16.to_le_bytes()); // version needed
        c.extend_from_slice(&0u16.to_le_bytes()); // flags
        c.extend_from_slice(&method.to_le_bytes());
        c.extend_from_slice(&0u16.to_le_bytes()); // time
        c.extend_from_slice(&0u16.to_le_bytes()); // date
        c.extend_from_slice(&0u32.to_le_bytes()); // crc32
        c.extend_from_slice(&comp_length.to_le_bytes());
        c.extend_from_slice(&uncomp_length.to_le_bytes());
        c.extend_from_slice(&(name.len() as u16).to_le_bytes());
        c.extend_from_slice(&extra_length.to_le_bytes());
        c.extend_from_slice(&(comment.len() as u16).to_le_bytes());
        c.extend_from_slice(&0u16.to_le_bytes()); // disk number
        c.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
        c.extend_from_slice(&0u32.to_le_bytes()); // external attributes
        c.extend_from_slice(&offset.to_le_bytes());
        c.extend_from_slice(name);
        c.extend(std::iter::repeat_n(0xAAu8, extra_length as usize));
        c.extend_from_slice(comment);
        self.records += 1;
    }

    pub fn comment(&mut self, comment: &[u8]) {
        self.comment = comment.to_vec();
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = self.data;
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&self.central);
        out.extend_from_slice(&0x06054b50u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // disk number
        out.extend_from_slice(&0u16.to_le_bytes()); // disk with CD
        out.extend_from_slice(&self.records.to_le_bytes());
        out.extend_from_slice(&self.records.to_le_bytes());
        out.extend_from_slice(&(self.central.len() as u32).to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.comment);
        out
    }
}

pub fn deflate(content: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).unwrap();
    encoder.finish().unwrap()
}

/// Write `bytes` into `dir` and return the file path.
pub fn write_archive(dir: &tempfile::TempDir, file_name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(file_name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Layout of the classic `bundle.zip` fixture: a directory record, a
/// deflated `bundle/bbbb.txt` at offset 65 and a stored `bundle/aaa.txt` at
/// offset 144, each with a 28-byte extra field.
pub fn bundle_zip() -> Vec<u8> {
    let mut zip = ZipBuilder::new();
    zip.raw("bundle/", STORED, &[], 0, 28);
    // Raw deflate of "bbbbbbbb\n" with fixed Huffman codes
    let bbbb = [0x4b, 0x4a, 0x82, 0x00, 0x2e, 0x00];
    zip.raw("bundle/bbbb.txt", DEFLATE, &bbbb, 9, 28);
    zip.raw("bundle/aaa.txt", STORED, b"aaa\n", 4, 28);
    zip.finish()
}

/// Deterministic, poorly compressible bytes.
pub fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}
