//! Checksum command: compute the tree hash of a file.

use anyhow::Result;
use std::path::Path;
use vup_core::checksum;

/// Compute and print the tree hash of the given file.
pub fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::tree_hash_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
