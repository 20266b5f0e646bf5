//! `vup resume <dumpfile>` – continue an interrupted upload.

use super::{dump_store_from_config, print_progress, remote_from_config};
use anyhow::Result;
use std::path::Path;
use vup_core::checksum::TreeHasher;
use vup_core::config::VupConfig;
use vup_core::engine::UploadEngine;

pub fn run_resume(cfg: &VupConfig, dumpfile: &Path, verbose: bool) -> Result<()> {
    let engine = UploadEngine::resume(
        remote_from_config(cfg),
        dump_store_from_config(cfg)?,
        TreeHasher,
        dumpfile,
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
