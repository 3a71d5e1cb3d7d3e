/* crates/clinic-content/src/popup.rs */

use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::normalize::Record;

pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(1000);
pub const MAX_DISPLAY_DELAY: Duration = Duration::from_secs(60);

const DEFAULT_TITLE: &str = "Nitroxide Treatment - Laughing Gas";
const DEFAULT_DESCRIPTION: &str = "Discover the benefits of our specialized Laughing Gas treatment. \
  A safe and effective solution for dental anxiety and pain management.";
const DEFAULT_BUTTON_TEXT: &str = "Learn More";
const DEFAULT_REDIRECT: &str = "/treatments/dental-implants-nashik";
const DEFAULT_FEATURES: [&str; 3] =
  ["Quick & Painless Procedure", "Safe for All Ages", "Anxiety-Free Experience"];

/// Advertisement shown once per visit after `display_delay`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
  pub title: String,
  pub description: String,
  pub image_url: Option<String>,
  pub button_text: String,
  pub redirect_url: String,
  pub features: Vec<String>,
  #[serde(rename = "display_delay_ms", serialize_with = "serialize_millis")]
  pub display_delay: Duration,
}

fn serialize_millis<S: serde::Serializer>(delay: &Duration, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_u64(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
}

impl Default for Popup {
  fn default() -> Self {
    Self {
      title: DEFAULT_TITLE.to_string(),
      description: DEFAULT_DESCRIPTION.to_string(),
      image_url: None,
      button_text: DEFAULT_BUTTON_TEXT.to_string(),
      redirect_url: DEFAULT_REDIRECT.to_string(),
      features: DEFAULT_FEATURES.iter().map(|f| (*f).to_string()).collect(),
      display_delay: DEFAULT_DISPLAY_DELAY,
    }
  }
}

impl Popup {
  /// The built-in popup in the API's own shape, for use as a request fallback.
  pub fn fallback_json() -> Value {
    json!({
      "title": DEFAULT_TITLE,
      "description": DEFAULT_DESCRIPTION,
      "image_url": null,
      "button_text": DEFAULT_BUTTON_TEXT,
      "redirect_url": DEFAULT_REDIRECT,
      "features": DEFAULT_FEATURES.iter().map(|text| json!({"text": text})).collect::<Vec<_>>(),
      "display_delay": DEFAULT_DISPLAY_DELAY.as_millis() as u64,
    })
  }

  /// Validate a fetched popup config. A record without a title is not a usable popup and
  /// yields the built-in one; bad delays and redirect targets are replaced individually.
  pub fn from_record(record: &Record) -> Self {
    let Some(title) = non_empty(record.str_field("title")) else {
      warn!(id = %record.id, "popup without title, using default");
      return Self::default();
    };

    let defaults = Self::default();
    Self {
      title: title.to_string(),
      description: non_empty(record.str_field("description")).unwrap_or_default().to_string(),
      image_url: non_empty(record.str_field("image_url")).map(str::to_string),
      button_text: non_empty(record.str_field("button_text"))
        .map_or(defaults.button_text, str::to_string),
      redirect_url: match record.str_field("redirect_url").map(str::trim) {
        Some(url) if is_safe_redirect(url) => url.to_string(),
        Some(url) => {
          warn!(redirect_url = url, "rejecting popup redirect target");
          defaults.redirect_url
        }
        None => defaults.redirect_url,
      },
      features: record.field("features").map(feature_texts).unwrap_or_default(),
      display_delay: display_delay(record.field("display_delay")),
    }
  }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|s| !s.is_empty())
}

/// Site-relative paths and absolute http(s) URLs only. Protocol-relative `//host` is not a
/// relative path.
pub fn is_safe_redirect(url: &str) -> bool {
  if url.starts_with('/') {
    return !url.starts_with("//");
  }
  match url::Url::parse(url) {
    Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
    Err(_) => false,
  }
}

fn display_delay(value: Option<&Value>) -> Duration {
  let millis = match value {
    Some(Value::Number(n)) => n.as_f64(),
    Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  match millis {
    Some(ms) if ms.is_finite() && ms >= 0.0 && ms <= MAX_DISPLAY_DELAY.as_millis() as f64 => {
      Duration::from_millis(ms as u64)
    }
    _ => DEFAULT_DISPLAY_DELAY,
  }
}

/// Features arrive either as plain strings or as `{text}` objects.
fn feature_texts(value: &Value) -> Vec<String> {
  let Value::Array(items) = value else { return Vec::new() };
  items
    .iter()
    .filter_map(|item| match item {
      Value::String(s) => Some(s.as_str()),
      Value::Object(map) => map.get("text").and_then(Value::as_str),
      _ => None,
    })
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect()
}
