pub mod checksum;
pub mod chunker;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod progress;
pub mod remote;
pub mod resume_store;
