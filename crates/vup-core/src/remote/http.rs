//! curl-backed `RemoteSession` over a vault-style REST protocol.
//!
//! Endpoints, relative to the configured base URL:
//! - `POST   /{account}/vaults/{vault}/multipart-uploads` -> `{"upload_id", "account_id"?}`
//! - `PUT    /{account}/vaults/{vault}/multipart-uploads/{id}` (Content-Range + body) -> `{"checksum"}`
//! - `POST   /{account}/vaults/{vault}/multipart-uploads/{id}/complete` (size + checksum headers)
//!
//! Authentication and request signing are the deployment's concern; this
//! adapter only forwards the configured extra headers verbatim.

use super::{content_range, RemoteSession, SessionHandle};
use crate::error::RemoteError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

/// Account segment meaning "the caller's own account".
const SELF_ACCOUNT: &str = "-";

/// HTTP adapter for the multipart-upload protocol.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    extra_headers: HashMap<String, String>,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>, extra_headers: HashMap<String, String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        HttpRemote {
            base_url,
            extra_headers,
        }
    }

    fn uploads_url(&self, account_id: &str, vault: &str) -> String {
        format!(
            "{}/{}/vaults/{}/multipart-uploads",
            self.base_url, account_id, vault
        )
    }

    /// Build an Easy handle with common options and the header list applied.
    fn easy(&self, url: &str, headers: &[String]) -> Result<curl::easy::Easy, RemoteError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        // Connect timeout only: a part upload may legitimately take as long
        // as the link needs, so no transfer deadline is set.
        easy.connect_timeout(Duration::from_secs(15))?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.extra_headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        for h in headers {
            list.append(h)?;
        }
        easy.http_headers(list)?;
        Ok(easy)
    }
}

/// Run the transfer, optionally streaming `body` as the request payload,
/// and collect the response body. Returns (status, response bytes).
fn perform(
    easy: &mut curl::easy::Easy,
    body: Option<&[u8]>,
) -> Result<(u32, Vec<u8>), RemoteError> {
    let mut response = Vec::new();
    {
        let mut transfer = easy.transfer();
        if let Some(mut source) = body {
            transfer.read_function(move |into| Ok(source.read(into).unwrap_or(0)))?;
        }
        transfer.write_function(|data| {
            response.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let code = easy.response_code()? as u32;
    Ok((code, response))
}

/// Map a non-2xx response to `RemoteError::Http` with a short body preview.
fn check_status(code: u32, response: &[u8]) -> Result<(), RemoteError> {
    if (200..300).contains(&code) {
        return Ok(());
    }
    let body = String::from_utf8_lossy(response);
    let preview: String = body.chars().take(200).collect();
    Err(RemoteError::Http {
        code,
        body: preview,
    })
}

#[derive(Debug, Deserialize)]
struct InitiateResponse {
    upload_id: String,
    account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    checksum: String,
}

fn parse_initiate(response: &[u8]) -> Result<(String, String), RemoteError> {
    let parsed: InitiateResponse = serde_json::from_slice(response)
        .map_err(|e| RemoteError::Protocol(format!("malformed initiate response: {}", e)))?;
    let account_id = parsed.account_id.unwrap_or_else(|| SELF_ACCOUNT.to_string());
    Ok((account_id, parsed.upload_id))
}

fn parse_part(response: &[u8]) -> Result<String, RemoteError> {
    let parsed: PartResponse = serde_json::from_slice(response)
        .map_err(|e| RemoteError::Protocol(format!("malformed part response: {}", e)))?;
    Ok(parsed.checksum)
}

impl RemoteSession for HttpRemote {
    fn initiate(
        &self,
        vault: &str,
        description: &str,
        part_size: u64,
    ) -> Result<SessionHandle, RemoteError> {
        let url = self.uploads_url(SELF_ACCOUNT, vault);
        let headers = vec![
            format!("x-archive-description: {}", description),
            format!("x-part-size: {}", part_size),
        ];
        let mut easy = self.easy(&url, &headers)?;
        easy.post(true)?;
        easy.post_field_size(0)?;

        let (code, response) = perform(&mut easy, None)?;
        check_status(code, &response)?;
        let (account_id, upload_id) = parse_initiate(&response)?;
        tracing::debug!(%upload_id, vault, "initiated multipart session");

        Ok(SessionHandle {
            account_id,
            vault_name: vault.to_string(),
            upload_id,
        })
    }

    fn resume(
        &self,
        account_id: &str,
        vault: &str,
        upload_id: &str,
    ) -> Result<SessionHandle, RemoteError> {
        // Deliberately no round trip: a stale session fails on the first part.
        Ok(SessionHandle {
            account_id: account_id.to_string(),
            vault_name: vault.to_string(),
            upload_id: upload_id.to_string(),
        })
    }

    fn upload_part(
        &self,
        handle: &SessionHandle,
        start: u64,
        end: u64,
        body: &[u8],
    ) -> Result<String, RemoteError> {
        let url = format!(
            "{}/{}",
            self.uploads_url(&handle.account_id, &handle.vault_name),
            handle.upload_id
        );
        let headers = vec![format!("Content-Range: {}", content_range(start, end))];
        let mut easy = self.easy(&url, &headers)?;
        easy.upload(true)?;
        easy.in_filesize(body.len() as u64)?;

        let (code, response) = perform(&mut easy, Some(body))?;
        check_status(code, &response)?;
        parse_part(&response)
    }

    fn complete(
        &self,
        handle: &SessionHandle,
        total_size: u64,
        checksum: &str,
    ) -> Result<(), RemoteError> {
        let url = format!(
            "{}/{}/complete",
            self.uploads_url(&handle.account_id, &handle.vault_name),
            handle.upload_id
        );
        let headers = vec![
            format!("x-archive-size: {}", total_size),
            format!("x-checksum: {}", checksum),
        ];
        let mut easy = self.easy(&url, &headers)?;
        easy.post(true)?;
        easy.post_field_size(0)?;

        let (code, response) = perform(&mut easy, None)?;
        check_status(code, &response)
    }
}
