//! Multipart-upload session contract.
//!
//! The engine talks to the vault service only through `RemoteSession`;
//! the curl-backed adapter lives in `http`, and tests substitute an
//! in-memory implementation. No retries happen at this layer.

pub mod http;

pub use http::HttpRemote;

use crate::error::RemoteError;

/// Identity of one multipart session on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    /// Account scope owning the session ("-" means the caller's account).
    pub account_id: String,
    pub vault_name: String,
    pub upload_id: String,
}

/// External multipart-upload protocol: create a session, send one part at a
/// time, finalize. Implementations perform exactly one attempt per call.
pub trait RemoteSession {
    /// Start a new multipart session on `vault` with the given part size.
    fn initiate(
        &self,
        vault: &str,
        description: &str,
        part_size: u64,
    ) -> Result<SessionHandle, RemoteError>;

    /// Rebind to an existing session. No liveness check happens here; a dead
    /// session surfaces on the first part upload.
    fn resume(
        &self,
        account_id: &str,
        vault: &str,
        upload_id: &str,
    ) -> Result<SessionHandle, RemoteError>;

    /// Transmit one part covering the inclusive byte range `[start, end]`.
    /// Returns the part checksum computed by the server.
    fn upload_part(
        &self,
        handle: &SessionHandle,
        start: u64,
        end: u64,
        body: &[u8],
    ) -> Result<String, RemoteError>;

    /// Finalize the session. The server rejects a size or checksum that
    /// disagrees with the parts it received.
    fn complete(
        &self,
        handle: &SessionHandle,
        total_size: u64,
        checksum: &str,
    ) -> Result<(), RemoteError>;
}

/// Wire form of a part's byte range: total size is asserted unknown.
pub fn content_range(start: u64, end: u64) -> String {
    format!("bytes {}-{}/*", start, end)
}
