mod builder;
mod params;

use crate::error::{Result, RgpError};
use crate::response::{self, CanonicalResult, Normalized, RawBody, MESSAGE_KEY};
use crate::{log_debug, log_warn};
pub use builder::ClientBuilder;
use http::{header::HeaderMap, Method};
pub use params::{ParamValue, Params};
pub(crate) use params::SEGMENT_ENCODE_SET;
use reqwest::Client as ReqwestClient;

pub const DEFAULT_BASE_URL: &str = "https://api.rockgympro.com/v1";

/// Liveness path; its body is plain text rather than an envelope.
pub const PING_PATH: &str = "/ping";
const PONG: &str = "pong";

/// An authenticated handle on the API. Nothing in it changes after
/// construction, so a shared reference can serve any number of calls.
pub struct Client {
    inner: ReqwestClient,
    base_url: String,
    headers: HeaderMap,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::builder().credentials(username, api_key).build()
    }

    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches `path` and normalizes the envelope.
    pub async fn get(&self, path: &str, params: Option<&Params>) -> Result<Normalized> {
        let body = self.execute(path, params, Method::GET).await?;
        response::normalize_body(body)
    }

    /// Fetches `path` and returns the decoded body as the API sent it.
    pub async fn get_raw(&self, path: &str, params: Option<&Params>) -> Result<RawBody> {
        self.execute(path, params, Method::GET).await
    }

    /// Fetches one page of a collection. Accepts either a path or one of the
    /// absolute URLs listed in [`CanonicalResult::page_urls`]. Later pages
    /// are never followed automatically.
    pub async fn fetch_page(&self, url_or_path: &str) -> Result<CanonicalResult> {
        let path = self.strip_base_url(url_or_path);
        self.get(path, None).await?.into_canonical()
    }

    /// Returns `true` when `/ping` answers with `pong`.
    pub async fn test(&self) -> Result<bool> {
        let body = self.execute(PING_PATH, None, Method::GET).await?;
        Ok(matches!(body, RawBody::Text(text) if text == PONG))
    }

    /// Drops the configured base URL from the front of `url_or_path`, if
    /// it is there as a whole path prefix (`/v1beta` does not match `/v1`).
    pub fn strip_base_url<'a>(&self, url_or_path: &'a str) -> &'a str {
        match url_or_path.strip_prefix(self.base_url.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') => rest,
            _ => url_or_path,
        }
    }

    /// The full URL a request for `path` and `params` is sent to.
    pub fn build_url(&self, path: &str, params: Option<&Params>) -> Result<String> {
        let mut url = format!("{}{}", self.base_url, normalize_path(path)?);

        if let Some(query) = params.and_then(Params::encode) {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }

        Ok(url)
    }

    /// Performs one authenticated request and classifies the outcome.
    pub async fn execute(&self, path: &str, params: Option<&Params>, method: Method) -> Result<RawBody> {
        if method != Method::GET {
            return Err(RgpError::Internal(format!(
                "unsupported HTTP method: {}",
                method
            )));
        }

        let url = self.build_url(path, params)?;
        log_debug!(method = %method, url = %url, "[client] Sending request");

        let response = self
            .inner
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let is_success = (200..=299).contains(&status);
        let content = response.text().await?;

        log_debug!(
            "[client] Received response: Status: {}, Content Length: {} bytes",
            status,
            content.len()
        );

        if !is_success {
            let err = RgpError::transport(status, error_message(&content));
            log_warn!("[client] Request to {} failed: {}", url, err);
            return Err(err);
        }

        if is_ping(path) {
            return Ok(RawBody::Text(content));
        }

        let envelope: serde_json::Value = serde_json::from_str(&content)?;

        if let Some(err) = response::envelope_error(&envelope) {
            log_warn!("[client] API reported an error for {}: {}", url, err);
            return Err(err);
        }

        Ok(RawBody::Json(envelope))
    }
}

/// Prefixes a single `/` unless the path already starts with one.
pub fn normalize_path(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(RgpError::Internal("request path must not be empty".to_string()));
    }

    if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{}", path))
    }
}

fn is_ping(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    path.trim_start_matches('/') == PING_PATH.trim_start_matches('/')
}

/// Pulls `message` out of an error body when it is a JSON object.
fn error_message(content: &str) -> Option<String> {
    let body: serde_json::Value = serde_json::from_str(content).ok()?;
    body.get(MESSAGE_KEY).map(response::render_scalar)
}
