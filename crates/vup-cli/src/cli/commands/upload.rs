//! `vup upload <vault> <path>` – upload a file as a new multipart session.

use super::{dump_store_from_config, print_progress, remote_from_config};
use anyhow::{Context, Result};
use std::path::PathBuf;
use vup_core::checksum::TreeHasher;
use vup_core::config::VupConfig;
use vup_core::engine::{UploadEngine, UploadPlan};

pub fn run_upload(
    cfg: &VupConfig,
    vault: String,
    path: PathBuf,
    description: Option<String>,
    chunk_size_mb: Option<u64>,
    verbose: bool,
) -> Result<()> {
    let path = std::fs::canonicalize(&path)
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    let description = description.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let plan = UploadPlan {
        vault_name: vault,
        file_path: path,
        description,
        chunk_size_mb: chunk_size_mb.unwrap_or(cfg.default_chunk_size_mb),
    };

    let engine = UploadEngine::start(
        remote_from_config(cfg),
        dump_store_from_config(cfg)?,
        TreeHasher,
        plan,
    )?;
    let engine = if verbose {
        engine.with_progress(print_progress)
    } else {
        engine
    };
    engine.run()?;

    println!("Upload successful!");
    Ok(())
}
