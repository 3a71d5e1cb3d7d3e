/* crates/clinic-content/src/normalize.rs */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::{ContentError, ContentResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
  Num(i64),
  Text(String),
}

impl std::fmt::Display for RecordId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Num(n) => write!(f, "{n}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}

/// One content item after shape-collapsing. `fields` keeps the element exactly as the API
/// sent it, including `id`, `order` and `visible`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
  pub id: RecordId,
  pub order: f64,
  pub visible: bool,
  pub fields: Map<String, Value>,
}

impl Record {
  pub fn field(&self, name: &str) -> Option<&Value> {
    self.fields.get(name)
  }

  pub fn str_field(&self, name: &str) -> Option<&str> {
    self.fields.get(name).and_then(Value::as_str)
  }

  /// Numeric field, absent or non-numeric reads as zero.
  pub fn number_field(&self, name: &str) -> f64 {
    self.fields.get(name).and_then(Value::as_f64).unwrap_or(0.0)
  }

  /// Truthy check in the API's loose sense: `true`, non-zero numbers, `"1"`/`"true"`.
  pub fn flag(&self, name: &str) -> bool {
    match self.fields.get(name) {
      Some(Value::Bool(b)) => *b,
      Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
      Some(Value::String(s)) => matches!(s.as_str(), "1" | "true"),
      _ => false,
    }
  }

  pub fn into_value(self) -> Value {
    Value::Object(self.fields)
  }
}

/// Pagination block some list endpoints attach next to `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
  pub current_page: u32,
  pub last_page: u32,
  pub per_page: u32,
  pub total: u64,
}

/// Collapse any accepted payload shape into visible records in `order`.
/// Payloads that cannot be interpreted are logged and read as empty.
pub fn normalize(raw: &Value) -> Vec<Record> {
  match try_normalize(raw) {
    Ok(records) => records,
    Err(err) => {
      warn!(error = %err, "discarding uninterpretable content payload");
      Vec::new()
    }
  }
}

/// Strict form of [`normalize`].
///
/// # Errors
///
/// Returns [`ContentError::Validation`] for scalar payloads, arrays holding non-objects, and
/// `{success: false}` envelopes without `data`.
pub fn try_normalize(raw: &Value) -> ContentResult<Vec<Record>> {
  let mut records = collect(raw)?;
  records.retain(|r| r.visible);
  // Stable: equal orders keep their arrival order.
  records.sort_by(|a, b| a.order.total_cmp(&b.order));
  Ok(records)
}

fn collect(raw: &Value) -> ContentResult<Vec<Record>> {
  match raw {
    Value::Null => Ok(Vec::new()),
    Value::Object(obj) if obj.contains_key("data") => collect(&obj["data"]),
    Value::Object(obj) if obj.is_empty() => Ok(Vec::new()),
    Value::Object(obj) if obj.get("success") == Some(&Value::Bool(false)) => {
      let message = obj.get("message").and_then(Value::as_str).unwrap_or("request unsuccessful");
      Err(ContentError::validation(format!("API reported failure: {message}")))
    }
    Value::Object(obj) => Ok(vec![to_record(obj, 0)]),
    Value::Array(items) => items
      .iter()
      .enumerate()
      .map(|(index, item)| match item {
        Value::Object(obj) => Ok(to_record(obj, index)),
        other => Err(ContentError::validation(format!(
          "element {index} is {}, expected an object",
          kind(other)
        ))),
      })
      .collect(),
    Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
    other => Err(ContentError::validation(format!("payload is {}, expected object or array", kind(other)))),
  }
}

fn to_record(obj: &Map<String, Value>, index: usize) -> Record {
  let id = match obj.get("id") {
    Some(Value::Number(n)) => n.as_i64().map_or_else(|| RecordId::Text(n.to_string()), RecordId::Num),
    Some(Value::String(s)) => RecordId::Text(s.clone()),
    _ => RecordId::Num(index as i64),
  };
  let order = obj.get("order").and_then(Value::as_f64).unwrap_or(index as f64);
  let visible = obj.get("visible") != Some(&Value::Bool(false));
  Record { id, order, visible, fields: obj.clone() }
}

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

/// Pagination metadata from `meta` or `pagination`, at the top level of the payload.
pub fn page_meta(raw: &Value) -> Option<PageMeta> {
  let obj = raw.as_object()?;
  let meta = obj.get("meta").or_else(|| obj.get("pagination"))?;
  serde_json::from_value(meta.clone()).ok()
}
