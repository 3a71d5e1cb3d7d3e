/* crates/clinic-content/src/forms.rs */

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::client::ContentSource;
use crate::errors::{ContentError, FormError};
use crate::normalize::RecordId;

pub const BOOK_APPOINTMENT_ENDPOINT: &str = "book-appointment";
pub const DOCTOR_APPOINTMENT_ENDPOINT: &str = "doctor-appointments";
pub const CONTACT_FORM_SOURCE: &str = "website_contact_form";

/// Services offered in the contact form's dropdown; the first is preselected.
pub const SERVICE_OPTIONS: [&str; 8] = [
  "Dental Implants",
  "Cosmetic Dentistry",
  "Root Canal Treatment",
  "Paediatric Dentistry",
  "Teeth Whitening",
  "Periodontics (Gum Treatment)",
  "General Checkup",
  "Emergency Dental Care",
];

const MSG_INVALID_INPUT: &str = "Please check your form inputs and try again.";
const MSG_SERVER_ERROR: &str = "Server error. Please try again later.";
const MSG_NETWORK: &str = "Network error. Please check your connection and try again.";
const MSG_FAILED: &str = "Failed to submit appointment. Please try again.";

#[allow(clippy::unwrap_used)] // constant pattern
fn phone_pattern() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"^[0-9+\-\s()]{10,}$").unwrap())
}

/// Whitespace is ignored; at least ten digits or `+ - ( )` separators remain.
pub fn is_valid_phone(phone: &str) -> bool {
  let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
  phone_pattern().is_match(&compact)
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
  let value = value.trim();
  if value.is_empty() { Err(FormError::MissingRequired { field }) } else { Ok(value.to_string()) }
}

/// Optional `YYYY-MM-DD` date that must not be before `today`.
fn preferred_date(value: Option<&str>, today: NaiveDate) -> Result<Option<NaiveDate>, FormError> {
  let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else { return Ok(None) };
  let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?;
  if date < today {
    return Err(FormError::DateInPast);
  }
  Ok(Some(date))
}

/// A form the clinic API accepts as a booking.
pub trait Submission {
  fn endpoint(&self) -> &'static str;

  /// Validate and build the request body. Nothing is sent when this fails.
  fn payload(&self, now: DateTime<Utc>) -> Result<Value, FormError>;
}

/// Contact page booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentForm {
  pub name: String,
  pub phone: String,
  pub preferred_service: Option<String>,
  pub preferred_date: Option<String>,
  pub preferred_clinic: Option<String>,
  pub message: String,
}

impl Submission for AppointmentForm {
  fn endpoint(&self) -> &'static str {
    BOOK_APPOINTMENT_ENDPOINT
  }

  fn payload(&self, now: DateTime<Utc>) -> Result<Value, FormError> {
    let name = required("name", &self.name)?;
    let phone = required("phone", &self.phone)?;
    if !is_valid_phone(&phone) {
      return Err(FormError::InvalidPhone);
    }
    let date = preferred_date(self.preferred_date.as_deref(), now.date_naive())?;

    Ok(json!({
      "name": name,
      "phone": phone,
      "preferred_service": self.preferred_service.as_deref().unwrap_or(SERVICE_OPTIONS[0]),
      "preferred_date": date.map(|d| d.to_string()).unwrap_or_default(),
      "preferred_clinic": self.preferred_clinic.as_deref().unwrap_or_default(),
      "message": self.message.trim(),
      "submitted_at": now.to_rfc3339_opts(SecondsFormat::Millis, true),
      "source": CONTACT_FORM_SOURCE,
    }))
  }
}

/// Booking from a doctor's card on the doctors page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorAppointmentForm {
  pub doctor_id: Option<RecordId>,
  pub name: String,
  pub phone: String,
  pub date: String,
  pub preferred_time: Option<String>,
  pub message: Option<String>,
}

impl Submission for DoctorAppointmentForm {
  fn endpoint(&self) -> &'static str {
    DOCTOR_APPOINTMENT_ENDPOINT
  }

  fn payload(&self, now: DateTime<Utc>) -> Result<Value, FormError> {
    let name = required("name", &self.name)?;
    let phone = required("phone", &self.phone)?;
    if !is_valid_phone(&phone) {
      return Err(FormError::InvalidPhone);
    }
    required("date", &self.date)?;
    let date = preferred_date(Some(&self.date), now.date_naive())?;

    Ok(json!({
      "doctor_id": self.doctor_id,
      "name": name,
      "phone": phone,
      "date": date.map(|d| d.to_string()),
      "message": self.message.as_deref().map(str::trim).unwrap_or_default(),
      "preferred_time": self.preferred_time.as_deref().unwrap_or_default(),
    }))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
  Accepted,
  Rejected { message: String },
}

impl SubmitOutcome {
  fn rejected(message: &str) -> Self {
    Self::Rejected { message: message.to_string() }
  }

  /// User-facing outcome for a failed submission.
  pub fn from_error(err: &ContentError) -> Self {
    match err {
      ContentError::Http { status: 422, .. } => Self::rejected(MSG_INVALID_INPUT),
      ContentError::Http { status: 500, .. } => Self::rejected(MSG_SERVER_ERROR),
      ContentError::Network { .. } | ContentError::Timeout { .. } => Self::rejected(MSG_NETWORK),
      _ => Self::rejected(MSG_FAILED),
    }
  }
}

/// Validate `form`, post it, and translate the API's answer. A body reporting
/// `success: false` counts as a rejection even on a 2xx status.
pub async fn submit<F>(source: &dyn ContentSource, form: &F) -> Result<SubmitOutcome, FormError>
where
  F: Submission + ?Sized,
{
  submit_at(source, form, Utc::now()).await
}

pub async fn submit_at<F>(
  source: &dyn ContentSource,
  form: &F,
  now: DateTime<Utc>,
) -> Result<SubmitOutcome, FormError>
where
  F: Submission + ?Sized,
{
  let payload = form.payload(now)?;
  let endpoint = form.endpoint();
  debug!(endpoint, "submitting form");

  match source.post(endpoint, payload).await {
    Ok(body) if body.get("success") == Some(&Value::Bool(false)) => {
      warn!(endpoint, message = ?body.get("message"), "form rejected by API");
      Ok(SubmitOutcome::rejected(MSG_FAILED))
    }
    Ok(_) => Ok(SubmitOutcome::Accepted),
    Err(err) => {
      warn!(endpoint, error = %err, "form submission failed");
      Ok(SubmitOutcome::from_error(&err))
    }
  }
}

#[cfg(test)]
mod tests;
