/* crates/clinic-content/src/errors.rs */

use std::time::Duration;

use thiserror::Error;

/// Classified failure of a content API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
  /// No response was received (DNS, refused connection, reset, TLS).
  #[error("network error: {message}")]
  Network { message: String },
  /// The response did not complete within the client timeout.
  #[error("request timed out after {}ms", .after.as_millis())]
  Timeout { after: Duration },
  #[error("HTTP {status}: {message}")]
  Http { status: u16, message: String },
  /// Body could not be interpreted as content.
  #[error("invalid payload: {message}")]
  Validation { message: String },
  #[error("invalid configuration: {message}")]
  Config { message: String },
}

impl ContentError {
  pub fn network(message: impl Into<String>) -> Self {
    Self::Network { message: message.into() }
  }

  pub fn timeout(after: Duration) -> Self {
    Self::Timeout { after }
  }

  pub fn http(status: u16, message: impl Into<String>) -> Self {
    Self::Http { status, message: message.into() }
  }

  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation { message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::Network { .. } => "NETWORK_ERROR",
      Self::Timeout { .. } => "TIMEOUT",
      Self::Http { .. } => "HTTP_ERROR",
      Self::Validation { .. } => "VALIDATION_ERROR",
      Self::Config { .. } => "CONFIG_ERROR",
    }
  }

  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Http { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Whether a caller-level retry could plausibly succeed. The client itself never retries.
  pub fn is_retryable(&self) -> bool {
    match self {
      Self::Network { .. } | Self::Timeout { .. } => true,
      Self::Http { status, .. } => *status >= 500 || *status == 429 || *status == 408,
      Self::Validation { .. } | Self::Config { .. } => false,
    }
  }

  /// Classify a transport-level reqwest failure.
  pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
    if err.is_timeout() {
      return Self::timeout(timeout);
    }
    if let Some(status) = err.status() {
      return Self::http(status.as_u16(), status.canonical_reason().unwrap_or("request failed"));
    }
    if err.is_decode() {
      return Self::validation(err.to_string());
    }
    Self::network(err.to_string())
  }
}

pub type ContentResult<T> = Result<T, ContentError>;

/// Client-side rejection of a form before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
  #[error("Please fill in all required fields.")]
  MissingRequired { field: &'static str },
  #[error("Please enter a valid phone number.")]
  InvalidPhone,
  #[error("Please choose a date that is today or later.")]
  DateInPast,
  #[error("Please enter the date as YYYY-MM-DD.")]
  InvalidDate,
}
