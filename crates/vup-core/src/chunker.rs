//! Chunk segmentation and chunk-size validation.
//!
//! Splits a byte stream into fixed-size parts for the multipart protocol.
//! The reader is forward-only: the stream position is the sole source of
//! truth for progress, and no chunk is ever produced twice.

use crate::error::UploadError;
use std::io::Read;

/// One mebibyte.
pub const MIB: u64 = 1 << 20;

/// Smallest allowed part size, in megabytes.
pub const MIN_CHUNK_MB: u64 = 1;
/// Largest allowed part size, in megabytes (4 GiB).
pub const MAX_CHUNK_MB: u64 = 4096;

/// Validate a part size given in megabytes: must be a power of two within
/// [1 MiB, 4 GiB]. Returns the value unchanged on success.
pub fn validate_chunk_size_mb(mb: u64) -> Result<u64, UploadError> {
    if mb < MIN_CHUNK_MB || mb > MAX_CHUNK_MB {
        return Err(UploadError::Validation(format!(
            "illegal chunk size: expected a value between 1 MiB and 4 GiB, got {} MB",
            mb
        )));
    }
    if mb & (mb - 1) != 0 {
        return Err(UploadError::Validation(format!(
            "illegal chunk size: must be a power of two, got {} MB",
            mb
        )));
    }
    Ok(mb)
}

/// Number of chunks needed for `file_size` bytes at `chunk_size` bytes per chunk.
pub fn chunk_count(file_size: u64, chunk_size: u64) -> u64 {
    file_size.div_ceil(chunk_size)
}

/// Raw bytes of one chunk plus its position in the file.
/// Owned by a single loop iteration and discarded after the part is sent.
#[derive(Debug)]
pub struct ChunkPayload {
    /// 1-based ordinal of this chunk.
    pub index: u64,
    /// Inclusive start offset in the file.
    pub start: u64,
    /// Inclusive end offset in the file.
    pub end: u64,
    /// The chunk bytes; full `chunk_size` except possibly the last chunk.
    pub data: Vec<u8>,
}

/// Sequential fixed-size chunk reader over any byte stream.
///
/// Yields `ChunkPayload`s until the stream is exhausted; the end of the
/// sequence is signalled by a read returning zero bytes, exactly once.
/// For a resumed upload, construct with the persisted byte cursor and
/// chunk ordinal so numbering continues where the failed run stopped
/// (the caller must have positioned the stream accordingly).
pub struct ChunkReader<R> {
    source: R,
    chunk_size: u64,
    cursor: u64,
    index: u64,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Reader starting at byte `cursor` with `index` chunks already consumed.
    pub fn new(source: R, chunk_size: u64, cursor: u64, index: u64) -> Self {
        ChunkReader {
            source,
            chunk_size,
            cursor,
            index,
            done: false,
        }
    }

    /// Reader for a fresh stream positioned at byte 0.
    pub fn from_start(source: R, chunk_size: u64) -> Self {
        Self::new(source, chunk_size, 0, 0)
    }

    /// Read up to `chunk_size` bytes, looping over short reads.
    fn fill_chunk(&mut self) -> std::io::Result<Vec<u8>> {
        let mut data = vec![0u8; self.chunk_size as usize];
        let mut filled = 0;
        while filled < data.len() {
            let n = self.source.read(&mut data[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        data.truncate(filled);
        Ok(data)
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = std::io::Result<ChunkPayload>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let data = match self.fill_chunk() {
            Ok(data) => data,
            Err(e) => return Some(Err(e)),
        };
        if data.is_empty() {
            self.done = true;
            return None;
        }

        let start = self.cursor;
        let end = start + data.len() as u64 - 1;
        self.cursor = end + 1;
        self.index += 1;

        Some(Ok(ChunkPayload {
            index: self.index,
            start,
            end,
            data,
        }))
    }
}
