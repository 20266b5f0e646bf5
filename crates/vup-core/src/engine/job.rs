//! The unit of work driven by the engine.

use crate::chunker::{chunk_count, MIB};
use crate::remote::SessionHandle;
use crate::resume_store::ResumeRecord;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Inputs for a fresh upload, validated before any I/O.
#[derive(Debug, Clone)]
pub struct UploadPlan {
    pub vault_name: String,
    pub file_path: PathBuf,
    /// Archive description shown by the vault service.
    pub description: String,
    pub chunk_size_mb: u64,
}

/// Mutable state of one upload run. Created fresh or reconstructed from a
/// resume record; mutated only by the engine as each chunk is acknowledged.
///
/// Invariants: `cur_byte <= file_size`, `cur_chunk <= chunk_count`, and
/// `part_checksums` holds exactly one entry per chunk in `1..=cur_chunk`.
#[derive(Debug)]
pub struct UploadJob {
    pub vault_name: String,
    pub file_path: PathBuf,
    pub file_size: u64,
    pub chunk_size_mb: u64,
    pub chunk_count: u64,
    /// Chunks acknowledged so far.
    pub cur_chunk: u64,
    /// Bytes acknowledged so far.
    pub cur_byte: u64,
    pub handle: SessionHandle,
    pub part_checksums: BTreeMap<u64, String>,
}

impl UploadJob {
    /// Fresh job with no progress.
    pub fn fresh(plan: &UploadPlan, file_size: u64, handle: SessionHandle) -> Self {
        let chunk_size = plan.chunk_size_mb * MIB;
        UploadJob {
            vault_name: plan.vault_name.clone(),
            file_path: plan.file_path.clone(),
            file_size,
            chunk_size_mb: plan.chunk_size_mb,
            chunk_count: chunk_count(file_size, chunk_size),
            cur_chunk: 0,
            cur_byte: 0,
            handle,
            part_checksums: BTreeMap::new(),
        }
    }

    /// Job continuing from a persisted record, bound to `handle`.
    /// `file_size` is re-read from disk; the record only stores progress.
    pub fn from_record(record: ResumeRecord, file_size: u64, handle: SessionHandle) -> Self {
        let chunk_size = record.chunk_size_mb * MIB;
        UploadJob {
            vault_name: record.vault_name,
            file_path: record.file_path,
            file_size,
            chunk_size_mb: record.chunk_size_mb,
            chunk_count: chunk_count(file_size, chunk_size),
            cur_chunk: record.cur_chunk,
            cur_byte: record.cur_byte,
            handle,
            part_checksums: record.part_checksums,
        }
    }

    /// Part size in bytes.
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size_mb * MIB
    }

    /// Snapshot the resumable fields.
    pub fn to_record(&self) -> ResumeRecord {
        ResumeRecord {
            version: crate::resume_store::RECORD_VERSION,
            account_id: self.handle.account_id.clone(),
            vault_name: self.vault_name.clone(),
            upload_id: self.handle.upload_id.clone(),
            cur_chunk: self.cur_chunk,
            cur_byte: self.cur_byte,
            file_path: self.file_path.clone(),
            chunk_size_mb: self.chunk_size_mb,
            part_checksums: self.part_checksums.clone(),
        }
    }
}
