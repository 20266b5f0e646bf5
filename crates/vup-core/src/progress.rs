//! Progress reporting for uploads (chunks sent, MB, percent).
//!
//! The engine hands a snapshot to an optional callback after each
//! acknowledged chunk; the CLI renders it in verbose mode. Informational
//! only, never part of the durable resume contract.

use crate::chunker::MIB;

/// Snapshot of upload progress after one acknowledged chunk.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Chunks acknowledged so far.
    pub cur_chunk: u64,
    /// Total number of chunks in the file.
    pub chunk_count: u64,
    /// Bytes acknowledged so far.
    pub bytes_sent: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
}

impl ProgressStats {
    /// Cumulative megabytes sent, rounded to 2 decimals.
    pub fn mb_sent(&self) -> f64 {
        round2(self.bytes_sent as f64 / MIB as f64)
    }

    /// Total file size in megabytes, rounded to 2 decimals.
    pub fn total_mb(&self) -> f64 {
        round2(self.total_bytes as f64 / MIB as f64)
    }

    /// Percent complete in [0, 100], rounded to 2 decimals.
    /// A zero-byte file counts as fully sent.
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        round2(self.bytes_sent as f64 / self.total_bytes as f64 * 100.0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megabytes_round_to_two_decimals() {
        let stats = ProgressStats {
            cur_chunk: 1,
            chunk_count: 3,
            bytes_sent: 4 * MIB + 1234,
            total_bytes: 10 * MIB,
        };
        assert_eq!(stats.mb_sent(), 4.0);
        assert_eq!(stats.total_mb(), 10.0);
    }

    #[test]
    fn percent_for_partial_upload() {
        let stats = ProgressStats {
            cur_chunk: 1,
            chunk_count: 3,
            bytes_sent: 4 * MIB,
            total_bytes: 10 * MIB,
        };
        assert_eq!(stats.percent(), 40.0);
    }

    #[test]
    fn percent_rounds() {
        let stats = ProgressStats {
            cur_chunk: 1,
            chunk_count: 3,
            bytes_sent: 1,
            total_bytes: 3,
        };
        assert_eq!(stats.percent(), 33.33);
    }

    #[test]
    fn empty_file_is_complete() {
        let stats = ProgressStats {
            cur_chunk: 0,
            chunk_count: 0,
            bytes_sent: 0,
            total_bytes: 0,
        };
        assert_eq!(stats.percent(), 100.0);
    }
}
