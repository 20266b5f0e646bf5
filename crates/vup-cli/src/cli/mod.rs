//! CLI for the vup vault uploader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vup_core::config;

use commands::{run_checksum, run_resume, run_upload};

/// Top-level CLI for the vup vault uploader.
#[derive(Debug, Parser)]
#[command(name = "vup")]
#[command(about = "vup: resumable chunked uploads to an archival vault", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload a file to a vault as a new multipart session.
    Upload {
        /// Name of the vault to upload to.
        vault: String,

        /// Path to the file to upload.
        path: PathBuf,

        /// Description of the archive (defaults to the file name).
        #[arg(short, long, value_name = "DESC")]
        description: Option<String>,

        /// Part size in megabytes; must be a power of two between 1 and 4096.
        /// Defaults to the configured value (128).
        #[arg(short = 's', long = "chunk-size", value_name = "SIZE")]
        chunk_size_mb: Option<u64>,

        /// Print a progress line for each uploaded chunk.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Resume an interrupted upload from a resume dump file.
    Resume {
        /// Path to the dump file written when the upload failed.
        dumpfile: PathBuf,

        /// Print a progress line for each uploaded chunk.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compute the tree hash of a file (as verified by the vault service).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Upload {
                vault,
                path,
                description,
                chunk_size_mb,
                verbose,
            } => run_upload(&cfg, vault, path, description, chunk_size_mb, verbose),
            CliCommand::Resume { dumpfile, verbose } => run_resume(&cfg, &dumpfile, verbose),
            CliCommand::Checksum { path } => run_checksum(&path),
        }
    }
}
