/* crates/clinic-content/src/client.rs */

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{ContentError, ContentResult};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Query parameters, kept sorted so identical requests produce identical URLs.
pub type Params = BTreeMap<String, String>;

const CSRF_HEADER: &str = "x-csrf-token";

/// Anything that can answer content API calls. The loader and form submission depend only on
/// this, so tests can substitute an in-memory source.
pub trait ContentSource: Send + Sync {
  fn get(&self, path: &str, params: &Params) -> BoxFuture<ContentResult<Value>>;

  fn post(&self, path: &str, body: Value) -> BoxFuture<ContentResult<Value>>;
}

/// JSON client for the clinic content API. Single attempt per call, no caching.
#[derive(Clone, Debug)]
pub struct ContentClient {
  inner: reqwest::Client,
  config: ClientConfig,
}

impl ContentClient {
  pub fn new(config: ClientConfig) -> ContentResult<Self> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(ref token) = config.csrf_token {
      let value = HeaderValue::from_str(token)
        .map_err(|_| ContentError::config("CSRF token is not a valid header value"))?;
      headers.insert(CSRF_HEADER, value);
    }

    let inner = reqwest::Client::builder()
      .default_headers(headers)
      .build()
      .map_err(|e| ContentError::config(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { inner, config })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  /// Absolute URL for `path` under the base URL, with `params` as the query string.
  pub fn endpoint_url(&self, path: &str, params: &Params) -> ContentResult<Url> {
    let base = self.config.base_url.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let mut url = Url::parse(&format!("{base}/{path}"))
      .map_err(|e| ContentError::config(format!("invalid endpoint {path:?}: {e}")))?;
    let root = self.config.base_url.path().trim_end_matches('/');
    if url.path() != root && !url.path().starts_with(&format!("{root}/")) {
      return Err(ContentError::validation(format!("endpoint {path:?} leaves the API base")));
    }
    if !params.is_empty() {
      url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
  }

  pub fn asset_url(&self, path: &str) -> Option<String> {
    asset_url(&self.config.asset_base_url, path)
  }

  /// # Errors
  ///
  /// Returns [`ContentError`] on connection failure, timeout, non-2xx status or a body that
  /// is not JSON.
  pub async fn get_json(&self, path: &str, params: &Params) -> ContentResult<Value> {
    let url = self.endpoint_url(path, params)?;
    debug!(method = "GET", %url, "content request");
    let request = self.inner.get(url.clone());
    self.execute(request, &url).await
  }

  /// # Errors
  ///
  /// Same taxonomy as [`ContentClient::get_json`]; a body that cannot be serialized is a
  /// validation error and nothing is sent.
  pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ContentResult<Value> {
    let body = serde_json::to_value(body)
      .map_err(|e| ContentError::validation(format!("request body: {e}")))?;
    let url = self.endpoint_url(path, &Params::new())?;
    debug!(method = "POST", %url, "content request");
    let request = self.inner.post(url.clone()).json(&body);
    self.execute(request, &url).await
  }

  async fn execute(&self, request: RequestBuilder, url: &Url) -> ContentResult<Value> {
    let timeout = self.config.timeout;
    // One deadline covers headers and body.
    let deadline = Instant::now() + timeout;
    let response = tokio::time::timeout_at(deadline, request.send())
      .await
      .map_err(|_| ContentError::timeout(timeout))?
      .map_err(|e| ContentError::from_transport(&e, timeout))?;

    let status = response.status();
    debug!(%url, status = status.as_u16(), "content response");
    let body = tokio::time::timeout_at(deadline, response.bytes())
      .await
      .map_err(|_| ContentError::timeout(timeout))?
      .map_err(|e| ContentError::from_transport(&e, timeout))?;

    if !status.is_success() {
      return Err(ContentError::http(status.as_u16(), error_message(status, &body)));
    }
    decode_body(&body)
  }
}

impl ContentSource for ContentClient {
  fn get(&self, path: &str, params: &Params) -> BoxFuture<ContentResult<Value>> {
    let client = self.clone();
    let path = path.to_string();
    let params = params.clone();
    Box::pin(async move { client.get_json(&path, &params).await })
  }

  fn post(&self, path: &str, body: Value) -> BoxFuture<ContentResult<Value>> {
    let client = self.clone();
    let path = path.to_string();
    Box::pin(async move { client.post_json(&path, &body).await })
  }
}

/// Resolve an image or file path from a content record against the asset root.
/// Absolute URLs pass through; a leading `uploads/` is not doubled.
pub fn asset_url(base: &Url, path: &str) -> Option<String> {
  let path = path.trim();
  if path.is_empty() {
    return None;
  }
  if path.starts_with("http://") || path.starts_with("https://") {
    return Some(path.to_string());
  }
  let relative = path.trim_start_matches('/');
  let relative = relative.strip_prefix("uploads/").unwrap_or(relative);
  base.join(relative).ok().map(String::from)
}

fn decode_body(body: &[u8]) -> ContentResult<Value> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Null);
  }
  serde_json::from_slice(body).map_err(|e| ContentError::validation(format!("response is not JSON: {e}")))
}

/// Prefer the API's own `message` field; fall back to the reason phrase.
fn error_message(status: StatusCode, body: &[u8]) -> String {
  serde_json::from_slice::<Value>(body)
    .ok()
    .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}
