//! Whole-archive tree hash, recomputed from disk at completion time.
//!
//! The remote side verifies the archive with a tree hash: SHA-256 over
//! 1 MiB leaves, with adjacent digests combined pairwise level by level
//! until a single root remains. An empty file hashes to SHA-256 of empty
//! input. Computed on demand, not inline with the upload loop.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Tree-hash leaf size. Fixed by the protocol, independent of the part size.
const LEAF_SIZE: usize = 1024 * 1024;

/// Collaborator that fingerprints a whole file for session completion.
/// The engine treats the result as opaque.
pub trait ArchiveHasher {
    fn fingerprint(&self, path: &Path) -> io::Result<String>;
}

/// Production hasher: the tree hash the vault service expects.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeHasher;

impl ArchiveHasher for TreeHasher {
    fn fingerprint(&self, path: &Path) -> io::Result<String> {
        tree_hash_path(path)
    }
}

/// Compute the tree hash of a file and return it as lowercase hex.
/// Reads in leaf-sized chunks to keep memory use bounded.
pub fn tree_hash_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut leaves: Vec<[u8; 32]> = Vec::new();
    let mut buf = vec![0u8; LEAF_SIZE];

    loop {
        let mut filled = 0;
        while filled < buf.len() {
            let n = f.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            break;
        }
        leaves.push(Sha256::digest(&buf[..filled]).into());
    }

    Ok(hex::encode(root_of(leaves)))
}

/// Fold leaf digests pairwise until a single root remains.
fn root_of(mut level: Vec<[u8; 32]>) -> [u8; 32] {
    if level.is_empty() {
        return Sha256::digest([]).into();
    }
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            if pair.len() == 2 {
                let mut h = Sha256::new();
                h.update(pair[0]);
                h.update(pair[1]);
                next.push(h.finalize().into());
            } else {
                // Odd digest is carried up unchanged.
                next.push(pair[0]);
            }
        }
        level = next;
    }
    level[0]
}
