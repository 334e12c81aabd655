//! HTTP client for the bookmark service's API.
//!
//! Three outbound operations, each a single bounded-timeout call with no
//! retries. The caller's `Authorization` header is forwarded as-is, so the
//! bridge never holds credentials of its own.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::error::BridgeError;

const BOOKMARKS_PATH: &str = "/api/v1/bookmarks";
const ASSETS_PATH: &str = "/api/v1/assets";
const SINGLEFILE_PATH: &str = "/api/v1/bookmarks/singlefile";

#[derive(Debug)]
pub struct CreatedBookmark {
    pub id: String,
    pub already_exists: bool,
}

/// Raw reply from the native singlefile endpoint, relayed verbatim to the
/// original caller.
#[derive(Debug)]
pub struct PassthroughReply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST `/api/v1/bookmarks` with a link payload. The service reports an
    /// existing bookmark for the same URL via `alreadyExists`.
    pub async fn create_link_bookmark(
        &self,
        auth_header: &str,
        url: &str,
        title: Option<&str>,
    ) -> Result<CreatedBookmark, BridgeError> {
        let mut payload = json!({ "type": "link", "url": url });
        if let Some(title) = title {
            payload["title"] = Value::String(title.to_string());
        }

        let endpoint = format!("{}{}", self.base_url, BOOKMARKS_PATH);
        let response = self
            .client
            .post(&endpoint)
            .header(AUTHORIZATION, auth_header)
            .header(ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| BridgeError::Upstream(format!("bookmark create request failed: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Upstream(format!("bookmark create read failed: {e}")))?;
        if !status.is_success() {
            return Err(BridgeError::Upstream(format!(
                "bookmark create returned {}: {}",
                status,
                preview(&bytes)
            )));
        }

        let body = parse_object(&bytes);
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| BridgeError::Upstream("bookmark create response missing id".into()))?
            .to_string();
        let already_exists = body
            .get("alreadyExists")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(CreatedBookmark { id, already_exists })
    }

    /// POST `/api/v1/assets`, streaming the capture from its temp file.
    pub async fn upload_asset(
        &self,
        auth_header: &str,
        file_path: &Path,
        file_size: u64,
        filename: &str,
    ) -> Result<String, BridgeError> {
        let form = reqwest::multipart::Form::new().part(
            crate::multipart::FILE_FIELD,
            file_part(file_path, file_size, filename).await?,
        );

        let endpoint = format!("{}{}", self.base_url, ASSETS_PATH);
        let response = self
            .client
            .post(&endpoint)
            .header(AUTHORIZATION, auth_header)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| BridgeError::Upstream(format!("asset upload request failed: {e}")))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Upstream(format!("asset upload read failed: {e}")))?;
        if !status.is_success() {
            return Err(BridgeError::Upstream(format!(
                "asset upload returned {}: {}",
                status,
                preview(&bytes)
            )));
        }

        parse_object(&bytes)
            .get("assetId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BridgeError::Upstream("asset upload response missing assetId".into()))
    }

    /// POST the decoded form unchanged to the native singlefile endpoint and
    /// hand back whatever it says, 2xx or not.
    pub async fn forward_singlefile(
        &self,
        auth_header: &str,
        fields: &[(String, String)],
        file_path: &Path,
        file_size: u64,
        filename: &str,
        query: Option<&str>,
    ) -> Result<PassthroughReply, BridgeError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }
        form = form.part(
            crate::multipart::FILE_FIELD,
            file_part(file_path, file_size, filename).await?,
        );

        let mut endpoint = format!("{}{}", self.base_url, SINGLEFILE_PATH);
        if let Some(query) = query {
            endpoint = format!("{}?{}", endpoint, query);
        }

        let response = self
            .client
            .post(&endpoint)
            .header(AUTHORIZATION, auth_header)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| BridgeError::Upstream(format!("singlefile forward failed: {e}")))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Upstream(format!("singlefile forward read failed: {e}")))?
            .to_vec();

        Ok(PassthroughReply {
            status,
            content_type,
            body,
        })
    }
}

async fn file_part(
    path: &Path,
    size: u64,
    filename: &str,
) -> Result<reqwest::multipart::Part, BridgeError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| BridgeError::Internal(anyhow::anyhow!("failed to reopen capture file: {e}")))?;
    let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

    reqwest::multipart::Part::stream_with_length(body, size)
        .file_name(filename.to_string())
        .mime_str("text/html")
        .map_err(|e| BridgeError::Internal(anyhow::anyhow!("invalid capture mime type: {e}")))
}

/// Defensive body parse: a non-JSON or non-object body yields an empty map so
/// field absence is handled uniformly by the caller.
fn parse_object(bytes: &[u8]) -> serde_json::Map<String, Value> {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default()
}

fn preview(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.len() > 300 {
        let cut: String = trimmed.chars().take(300).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}
