/* crates/clinic-content/src/config.rs */

use std::time::Duration;

use url::Url;

use crate::errors::{ContentError, ContentResult};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_ASSET_BASE_URL: &str = "http://127.0.0.1:8000/uploads/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "CLINIC_API_BASE_URL";
pub const ENV_ASSET_BASE_URL: &str = "CLINIC_ASSET_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "CLINIC_API_TIMEOUT_MS";
pub const ENV_CSRF_TOKEN: &str = "CLINIC_CSRF_TOKEN";

#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: Url,
  /// Root for uploaded images and files referenced by content records.
  pub asset_base_url: Url,
  /// Bound on the wait for response headers.
  pub timeout: Duration,
  /// Forwarded as `X-CSRF-TOKEN` when set.
  pub csrf_token: Option<String>,
}

impl ClientConfig {
  pub fn new(base_url: &str, asset_base_url: &str) -> ContentResult<Self> {
    Ok(Self {
      base_url: parse_url(base_url, "base URL")?,
      asset_base_url: parse_url(&with_trailing_slash(asset_base_url), "asset base URL")?,
      timeout: DEFAULT_TIMEOUT,
      csrf_token: None,
    })
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
    self.csrf_token = Some(token.into());
    self
  }

  /// Defaults overridden by `CLINIC_*` environment variables.
  pub fn from_env() -> ContentResult<Self> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Same as [`ClientConfig::from_env`] with an injectable variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ContentResult<Self> {
    let base = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let assets = lookup(ENV_ASSET_BASE_URL).unwrap_or_else(|| DEFAULT_ASSET_BASE_URL.to_string());
    let mut config = Self::new(&base, &assets)?;

    if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
      let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ContentError::config(format!("{ENV_TIMEOUT_MS} must be milliseconds, got {raw:?}")))?;
      if ms == 0 {
        return Err(ContentError::config(format!("{ENV_TIMEOUT_MS} must be greater than zero")));
      }
      config.timeout = Duration::from_millis(ms);
    }
    if let Some(token) = lookup(ENV_CSRF_TOKEN).filter(|t| !t.is_empty()) {
      config.csrf_token = Some(token);
    }
    Ok(config)
  }
}

fn parse_url(raw: &str, what: &str) -> ContentResult<Url> {
  let url = Url::parse(raw.trim()).map_err(|e| ContentError::config(format!("{what} {raw:?}: {e}")))?;
  if !matches!(url.scheme(), "http" | "https") {
    return Err(ContentError::config(format!("{what} must be http(s), got {raw:?}")));
  }
  Ok(url)
}

fn with_trailing_slash(raw: &str) -> String {
  let raw = raw.trim();
  if raw.ends_with('/') { raw.to_string() } else { format!("{raw}/") }
}
