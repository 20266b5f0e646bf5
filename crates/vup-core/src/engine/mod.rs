//! The upload engine: initiation, sequential chunk transmission,
//! completion, and resume.
//!
//! Lifecycle: `start` (fresh) or `resume` (from a dumped record), then
//! `run`. Transmission is strictly sequential with one blocking call in
//! flight at a time; any error while transmitting triggers a best-effort
//! resume dump before the error propagates. Collaborators are injected at
//! construction so tests can run against in-memory fakes.

mod job;

pub use job::{UploadJob, UploadPlan};

use crate::checksum::ArchiveHasher;
use crate::chunker::{validate_chunk_size_mb, ChunkReader};
use crate::error::UploadError;
use crate::progress::ProgressStats;
use crate::remote::RemoteSession;
use crate::resume_store::StatePersistor;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

/// Callback invoked after each acknowledged chunk.
pub type ProgressFn<'a> = Box<dyn FnMut(&ProgressStats) + 'a>;

/// Drives one upload from start (or resume point) to completion.
/// Exclusively owns the source file handle for the duration of the run.
pub struct UploadEngine<'a, R, P, H> {
    remote: R,
    persistor: P,
    hasher: H,
    job: UploadJob,
    file: File,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, R, P, H> std::fmt::Debug for UploadEngine<'a, R, P, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadEngine")
            .field("job", &self.job)
            .finish_non_exhaustive()
    }
}

impl<'a, R, P, H> UploadEngine<'a, R, P, H>
where
    R: RemoteSession,
    P: StatePersistor,
    H: ArchiveHasher,
{
    /// Begin a fresh upload: validate the chunk size, open the file, and
    /// initiate a multipart session sized to the plan.
    pub fn start(remote: R, persistor: P, hasher: H, plan: UploadPlan) -> Result<Self, UploadError> {
        validate_chunk_size_mb(plan.chunk_size_mb)?;

        let file = File::open(&plan.file_path)?;
        let file_size = file.metadata()?.len();
        let part_size = plan.chunk_size_mb * crate::chunker::MIB;

        let handle = remote.initiate(&plan.vault_name, &plan.description, part_size)?;
        let job = UploadJob::fresh(&plan, file_size, handle);
        tracing::info!(
            path = %job.file_path.display(),
            file_size,
            part_size,
            chunks = job.chunk_count,
            upload_id = %job.handle.upload_id,
            "starting upload"
        );

        Ok(UploadEngine {
            remote,
            persistor,
            hasher,
            job,
            file,
            progress: None,
        })
    }

    /// Continue an interrupted upload from a dumped record: rebind to the
    /// existing session and position the file at the persisted byte cursor.
    pub fn resume(
        remote: R,
        persistor: P,
        hasher: H,
        record_path: &Path,
    ) -> Result<Self, UploadError> {
        let record = persistor.load(record_path)?;

        let mut file = File::open(&record.file_path)?;
        let file_size = file.metadata()?.len();
        // Reads must pick up exactly where the last acknowledged chunk ended.
        file.seek(SeekFrom::Start(record.cur_byte))?;

        let handle = remote.resume(&record.account_id, &record.vault_name, &record.upload_id)?;
        let job = UploadJob::from_record(record, file_size, handle);
        tracing::info!(
            path = %job.file_path.display(),
            cur_chunk = job.cur_chunk,
            cur_byte = job.cur_byte,
            upload_id = %job.handle.upload_id,
            "resuming upload"
        );

        Ok(UploadEngine {
            remote,
            persistor,
            hasher,
            job,
            file,
            progress: None,
        })
    }

    /// Observe progress after each acknowledged chunk.
    pub fn with_progress(mut self, f: impl FnMut(&ProgressStats) + 'a) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Current job state (for inspection; the engine owns all mutation).
    pub fn job(&self) -> &UploadJob {
        &self.job
    }

    /// Transmit all remaining chunks, then finalize the session.
    /// Consuming `self` releases the file handle on every exit path.
    pub fn run(mut self) -> Result<(), UploadError> {
        self.transmit()?;
        self.complete()
    }

    /// Send chunks until end of file. On any failure, dump a resume record
    /// (best effort) and propagate the original error.
    fn transmit(&mut self) -> Result<(), UploadError> {
        match self.transmit_chunks() {
            Ok(()) => Ok(()),
            Err(err) => {
                match self.persistor.dump(&self.job.to_record()) {
                    Ok(path) => {
                        tracing::warn!("resume record written to {}", path.display());
                    }
                    Err(dump_err) => {
                        // Never mask the transmit failure with a dump failure.
                        tracing::error!("failed to write resume record: {}", dump_err);
                    }
                }
                Err(err)
            }
        }
    }

    fn transmit_chunks(&mut self) -> Result<(), UploadError> {
        let chunk_size = self.job.chunk_size();
        let job = &mut self.job;
        let remote = &self.remote;
        let progress = &mut self.progress;
        let reader = ChunkReader::new(&mut self.file, chunk_size, job.cur_byte, job.cur_chunk);

        for payload in reader {
            let payload = payload?;
            let checksum =
                remote.upload_part(&job.handle, payload.start, payload.end, &payload.data)?;

            // Advance the cursors only after the part is acknowledged, so a
            // dumped record always reflects a chunk boundary.
            job.part_checksums.insert(payload.index, checksum);
            job.cur_chunk = payload.index;
            job.cur_byte += payload.data.len() as u64;

            tracing::debug!(
                chunk = payload.index,
                of = job.chunk_count,
                range = %crate::remote::content_range(payload.start, payload.end),
                "chunk acknowledged"
            );
            if let Some(f) = progress {
                f(&ProgressStats {
                    cur_chunk: job.cur_chunk,
                    chunk_count: job.chunk_count,
                    bytes_sent: job.cur_byte,
                    total_bytes: job.file_size,
                });
            }
        }

        Ok(())
    }

    /// Re-read the whole file through the hasher and finalize the session.
    /// Errors here propagate without a dump; every chunk is already sent.
    fn complete(&mut self) -> Result<(), UploadError> {
        let checksum = self.hasher.fingerprint(&self.job.file_path)?;
        self.remote
            .complete(&self.job.handle, self.job.file_size, &checksum)?;
        tracing::info!(
            upload_id = %self.job.handle.upload_id,
            total = self.job.file_size,
            "upload complete"
        );
        Ok(())
    }
}
