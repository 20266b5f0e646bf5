//! Logging init: file under the XDG state dir, stderr when unavailable.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vup=debug"))
}

/// Open `~/.local/state/vup/vup.log` for appending.
fn open_log_file() -> Result<(BoxMakeWriter, PathBuf)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vup")?;
    let log_dir = xdg_dirs.get_state_home().join("vup");

    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join("vup.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    // Single-threaded uploader; a mutexed file writer is plenty.
    Ok((BoxMakeWriter::new(Mutex::new(file)), path))
}

/// Initialize structured logging. Writes to the state-dir log file, or to
/// stderr when the state dir is unwritable, so the CLI always comes up.
pub fn init() {
    match open_log_file() {
        Ok((writer, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            tracing::info!("vup logging initialized at {}", path.display());
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .init();
            tracing::warn!("log file unavailable ({err:#}), logging to stderr");
        }
    }
}
