//! In-memory `RemoteSession` for engine tests: records every part it
//! receives and can inject a failure on the Nth part-upload call.

use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use vup_core::error::RemoteError;
use vup_core::remote::{RemoteSession, SessionHandle};

/// One successfully received part.
#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub start: u64,
    pub end: u64,
    pub len: u64,
    pub checksum: String,
}

#[derive(Debug, Default)]
struct Inner {
    sessions_initiated: u64,
    parts: Vec<RecordedPart>,
    part_calls: u64,
    fail_on_call: Option<u64>,
    completed: Option<(u64, String)>,
}

/// Cloneable fake vault service; clones share the same recorded state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the Nth `upload_part` call (1-based, counted across the life of
    /// this fake) fail with a remote error.
    pub fn fail_on_call(&self, n: u64) {
        self.inner.lock().unwrap().fail_on_call = Some(n);
    }

    pub fn clear_failure(&self) {
        self.inner.lock().unwrap().fail_on_call = None;
    }

    pub fn parts(&self) -> Vec<RecordedPart> {
        self.inner.lock().unwrap().parts.clone()
    }

    /// Total `upload_part` attempts, including the failed one.
    pub fn part_calls(&self) -> u64 {
        self.inner.lock().unwrap().part_calls
    }

    pub fn completed(&self) -> Option<(u64, String)> {
        self.inner.lock().unwrap().completed.clone()
    }

    pub fn sessions_initiated(&self) -> u64 {
        self.inner.lock().unwrap().sessions_initiated
    }
}

impl RemoteSession for MemoryRemote {
    fn initiate(
        &self,
        vault: &str,
        _description: &str,
        _part_size: u64,
    ) -> Result<SessionHandle, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions_initiated += 1;
        Ok(SessionHandle {
            account_id: "test-account".to_string(),
            vault_name: vault.to_string(),
            upload_id: format!("mem-{}", inner.sessions_initiated),
        })
    }

    fn resume(
        &self,
        account_id: &str,
        vault: &str,
        upload_id: &str,
    ) -> Result<SessionHandle, RemoteError> {
        Ok(SessionHandle {
            account_id: account_id.to_string(),
            vault_name: vault.to_string(),
            upload_id: upload_id.to_string(),
        })
    }

    fn upload_part(
        &self,
        _handle: &SessionHandle,
        start: u64,
        end: u64,
        body: &[u8],
    ) -> Result<String, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.part_calls += 1;
        if inner.fail_on_call == Some(inner.part_calls) {
            return Err(RemoteError::Protocol("injected part failure".to_string()));
        }
        let checksum = hex::encode(Sha256::digest(body));
        inner.parts.push(RecordedPart {
            start,
            end,
            len: body.len() as u64,
            checksum: checksum.clone(),
        });
        Ok(checksum)
    }

    fn complete(
        &self,
        _handle: &SessionHandle,
        total_size: u64,
        checksum: &str,
    ) -> Result<(), RemoteError> {
        self.inner.lock().unwrap().completed = Some((total_size, checksum.to_string()));
        Ok(())
    }
}
