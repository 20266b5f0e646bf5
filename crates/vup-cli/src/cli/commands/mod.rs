//! CLI command handlers, one per file.

mod checksum;
mod resume;
mod upload;

pub use checksum::run_checksum;
pub use resume::run_resume;
pub use upload::run_upload;

use vup_core::config::VupConfig;
use vup_core::progress::ProgressStats;
use vup_core::remote::HttpRemote;
use vup_core::resume_store::DumpStore;

/// Remote adapter for the configured endpoint.
pub(crate) fn remote_from_config(cfg: &VupConfig) -> HttpRemote {
    HttpRemote::new(cfg.endpoint.clone(), cfg.extra_headers.clone())
}

/// Resume dumps land in the configured directory, or the working directory.
pub(crate) fn dump_store_from_config(cfg: &VupConfig) -> anyhow::Result<DumpStore> {
    Ok(match &cfg.dump_dir {
        Some(dir) => DumpStore::new(dir.clone()),
        None => DumpStore::in_working_dir()?,
    })
}

/// Verbose-mode progress line, one per acknowledged chunk.
pub(crate) fn print_progress(stats: &ProgressStats) {
    println!(
        "Uploaded chunk {} of {} ({} MB / {} MB) [{}%]",
        stats.cur_chunk,
        stats.chunk_count,
        stats.mb_sent(),
        stats.total_mb(),
        stats.percent()
    );
}
