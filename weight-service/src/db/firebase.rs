//! Firebase Realtime Database REST client.
//!
//! Subtrees live at `{base_url}/{path}.json`. Conditional writes use the
//! ETag mechanism: a GET with `X-Firebase-ETag: true` returns the subtree's
//! ETag, and a PUT with `if-match` fails with 412 when the subtree changed
//! in between.

use super::{BackendError, KvBackend, Version};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";

/// ETag Firebase reports for a path that holds no data.
const NULL_ETAG: &str = "null_etag";

#[derive(Clone)]
pub struct FirebaseClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl FirebaseClient {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn url(&self, path: &str) -> String {
        let mut url = format!("{}/{}.json", self.base_url, path.trim_matches('/'));
        if let Some(token) = &self.auth_token {
            url.push_str("?auth=");
            url.push_str(token);
        }
        url
    }

    fn status_error(path: &str, status: StatusCode) -> BackendError {
        BackendError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        }
    }
}

#[async_trait]
impl KvBackend for FirebaseClient {
    async fn get(&self, path: &str) -> Result<(Option<Value>, Version), BackendError> {
        let response = self
            .http
            .get(self.url(path))
            .header(ETAG_REQUEST_HEADER, "true")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(path, status));
        }

        let etag = response
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(NULL_ETAG)
            .to_string();

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|source| BackendError::Decode {
                path: path.to_string(),
                source,
            })?;

        let value = match value {
            Value::Null => None,
            other => Some(other),
        };

        Ok((value, Version::new(etag)))
    }

    async fn put(
        &self,
        path: &str,
        value: &Value,
        expected: Option<&Version>,
    ) -> Result<bool, BackendError> {
        let mut request = self.http.put(self.url(path)).json(value);
        if let Some(version) = expected {
            request = request.header(reqwest::header::IF_MATCH, version.as_str());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::PRECONDITION_FAILED {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Self::status_error(path, status));
        }

        Ok(true)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        // Shallow read of the root: constant-size response regardless of
        // how much data the tree holds.
        let mut url = format!("{}/.json?shallow=true", self.base_url);
        if let Some(token) = &self.auth_token {
            url.push_str("&auth=");
            url.push_str(token);
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error("/", status));
        }
        Ok(())
    }
}
