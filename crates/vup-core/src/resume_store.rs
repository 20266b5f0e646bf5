//! Durable resume records for interrupted uploads.
//!
//! On a transmit failure the engine dumps a `ResumeRecord` to a uniquely
//! named `dump-*.json` in the store directory; a later run loads it and
//! continues the session without resending acknowledged chunks. The JSON
//! shape is the contract between a failed run and a resumed run; records
//! without a `version` field (older dumps) read back as version 1.

use crate::chunker::{validate_chunk_size_mb, MIB};
use crate::error::UploadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current record format version.
pub const RECORD_VERSION: u32 = 1;

fn default_version() -> u32 {
    RECORD_VERSION
}

/// Snapshot of an upload sufficient to continue it. Always written after a
/// fully acknowledged chunk, never mid-chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Owning account scope of the session.
    pub account_id: String,
    pub vault_name: String,
    pub upload_id: String,
    /// Count of chunks successfully sent (1-based cursor).
    pub cur_chunk: u64,
    /// Bytes successfully sent.
    pub cur_byte: u64,
    pub file_path: PathBuf,
    pub chunk_size_mb: u64,
    /// Chunk ordinal -> part checksum, exactly one entry per sent chunk.
    pub part_checksums: BTreeMap<u64, String>,
}

impl ResumeRecord {
    /// Shape checks beyond what serde enforces. Returns the reason a record
    /// cannot be resumed from.
    fn check(&self) -> Result<(), String> {
        if self.version > RECORD_VERSION {
            return Err(format!("unsupported record version {}", self.version));
        }
        if let Err(e) = validate_chunk_size_mb(self.chunk_size_mb) {
            return Err(e.to_string());
        }
        if self.part_checksums.len() as u64 != self.cur_chunk {
            return Err(format!(
                "checksum map has {} entries but cur_chunk is {}",
                self.part_checksums.len(),
                self.cur_chunk
            ));
        }
        let in_range = self
            .part_checksums
            .keys()
            .all(|&k| k >= 1 && k <= self.cur_chunk);
        if !in_range {
            return Err("checksum map keys must cover exactly 1..=cur_chunk".to_string());
        }
        // cur_byte must land inside chunk cur_chunk: a record is only ever
        // written on a chunk boundary, so anything outside
        // ((cur_chunk - 1) * chunk_size, cur_chunk * chunk_size] means the
        // cursors disagree and resuming would send wrong byte ranges.
        let chunk_size = self.chunk_size_mb * MIB;
        if self.cur_byte > self.cur_chunk * chunk_size {
            return Err(format!(
                "cur_byte {} exceeds {} chunks of {} MB",
                self.cur_byte, self.cur_chunk, self.chunk_size_mb
            ));
        }
        if self.cur_chunk > 0 && self.cur_byte <= (self.cur_chunk - 1) * chunk_size {
            return Err(format!(
                "cur_byte {} is before the end of chunk {}",
                self.cur_byte, self.cur_chunk
            ));
        }
        Ok(())
    }
}

/// Serializes and restores resume records. Injected into the engine so
/// tests can substitute an in-memory store.
pub trait StatePersistor {
    /// Write `record` to a new, uniquely named durable record and return
    /// its location. Never overwrites an existing record.
    fn dump(&self, record: &ResumeRecord) -> Result<PathBuf, UploadError>;

    /// Read a record back; fails with `UploadError::Config` when required
    /// fields are missing, malformed, or inconsistent.
    fn load(&self, path: &Path) -> Result<ResumeRecord, UploadError>;
}

/// Directory-backed persistor writing `dump-*.json` files.
#[derive(Debug, Clone)]
pub struct DumpStore {
    dir: PathBuf,
}

impl DumpStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DumpStore { dir: dir.into() }
    }

    /// Store rooted at the process working directory.
    pub fn in_working_dir() -> std::io::Result<Self> {
        Ok(DumpStore::new(std::env::current_dir()?))
    }
}

impl StatePersistor for DumpStore {
    fn dump(&self, record: &ResumeRecord) -> Result<PathBuf, UploadError> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut file = tempfile::Builder::new()
            .prefix("dump-")
            .suffix(".json")
            .tempfile_in(&self.dir)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        let (_, path) = file
            .keep()
            .map_err(|e| UploadError::Io(e.error))?;
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<ResumeRecord, UploadError> {
        let config_err = |reason: String| UploadError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let data = fs::read_to_string(path)
            .map_err(|e| config_err(format!("cannot read: {}", e)))?;
        let record: ResumeRecord =
            serde_json::from_str(&data).map_err(|e| config_err(e.to_string()))?;
        record.check().map_err(config_err)?;
        Ok(record)
    }
}
