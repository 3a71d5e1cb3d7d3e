/* crates/clinic-content/src/forms/tests.rs */

use std::time::Duration;

use chrono::TimeZone;

use super::*;
use crate::testing::FakeSource;

fn now() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
}

fn contact_form() -> AppointmentForm {
  AppointmentForm {
    name: "  Asha Patil ".into(),
    phone: "+91 81490 49104".into(),
    preferred_service: Some("Teeth Whitening".into()),
    preferred_date: Some("2025-03-12".into()),
    preferred_clinic: Some("Nashik Road".into()),
    message: " Evening slot please ".into(),
  }
}

#[test]
fn phone_rules() {
  assert!(is_valid_phone("+91 81490 49104"));
  assert!(is_valid_phone("(0253) 245-6789"));
  assert!(!is_valid_phone("12345"));
  assert!(!is_valid_phone("call me maybe"));
  assert!(!is_valid_phone("9876 54"));
}

#[test]
fn contact_payload_shape() {
  let payload = contact_form().payload(now()).unwrap();
  assert_eq!(payload["name"], "Asha Patil");
  assert_eq!(payload["phone"], "+91 81490 49104");
  assert_eq!(payload["preferred_date"], "2025-03-12");
  assert_eq!(payload["message"], "Evening slot please");
  assert_eq!(payload["source"], CONTACT_FORM_SOURCE);
  assert_eq!(payload["submitted_at"], "2025-03-10T09:30:00.000Z");
}

#[test]
fn contact_defaults_service_and_allows_no_date() {
  let form = AppointmentForm {
    preferred_service: None,
    preferred_date: Some("  ".into()),
    ..contact_form()
  };
  let payload = form.payload(now()).unwrap();
  assert_eq!(payload["preferred_service"], SERVICE_OPTIONS[0]);
  assert_eq!(payload["preferred_date"], "");
}

#[test]
fn contact_validation_errors() {
  let blank = AppointmentForm { name: "   ".into(), ..contact_form() };
  assert_eq!(blank.payload(now()), Err(FormError::MissingRequired { field: "name" }));

  let bad_phone = AppointmentForm { phone: "12-34".into(), ..contact_form() };
  assert_eq!(bad_phone.payload(now()), Err(FormError::InvalidPhone));

  let past = AppointmentForm { preferred_date: Some("2025-03-09".into()), ..contact_form() };
  assert_eq!(past.payload(now()), Err(FormError::DateInPast));

  let garbled = AppointmentForm { preferred_date: Some("12/03/2025".into()), ..contact_form() };
  assert_eq!(garbled.payload(now()), Err(FormError::InvalidDate));

  let today = AppointmentForm { preferred_date: Some("2025-03-10".into()), ..contact_form() };
  assert!(today.payload(now()).is_ok());
}

#[test]
fn form_error_messages_are_user_facing() {
  assert_eq!(
    FormError::MissingRequired { field: "phone" }.to_string(),
    "Please fill in all required fields."
  );
  assert_eq!(FormError::InvalidPhone.to_string(), "Please enter a valid phone number.");
}

#[test]
fn doctor_payload_shape() {
  let form = DoctorAppointmentForm {
    doctor_id: Some(RecordId::Num(4)),
    name: "Rahul".into(),
    phone: "9876543210".into(),
    date: "2025-03-11".into(),
    preferred_time: Some("Morning".into()),
    message: None,
  };
  let payload = form.payload(now()).unwrap();
  assert_eq!(
    payload,
    json!({
      "doctor_id": 4,
      "name": "Rahul",
      "phone": "9876543210",
      "date": "2025-03-11",
      "message": "",
      "preferred_time": "Morning",
    })
  );
}

#[test]
fn doctor_form_requires_date() {
  let form = DoctorAppointmentForm {
    name: "Rahul".into(),
    phone: "9876543210".into(),
    ..DoctorAppointmentForm::default()
  };
  assert_eq!(form.payload(now()), Err(FormError::MissingRequired { field: "date" }));
}

#[test]
fn error_mapping() {
  let cases = [
    (ContentError::http(422, "The phone field is invalid."), MSG_INVALID_INPUT),
    (ContentError::http(500, "Internal Server Error"), MSG_SERVER_ERROR),
    (ContentError::http(503, "Service Unavailable"), MSG_FAILED),
    (ContentError::network("connection reset"), MSG_NETWORK),
    (ContentError::timeout(Duration::from_secs(10)), MSG_NETWORK),
    (ContentError::validation("not json"), MSG_FAILED),
  ];
  for (err, message) in cases {
    assert_eq!(SubmitOutcome::from_error(&err), SubmitOutcome::Rejected { message: message.into() });
  }
}

#[tokio::test]
async fn accepted_submission_posts_payload() {
  let source = FakeSource::new().on_post(Ok(json!({"success": true, "data": {"id": 91}})));
  let outcome = submit_at(&source, &contact_form(), now()).await.unwrap();
  assert_eq!(outcome, SubmitOutcome::Accepted);

  let posts = source.posts();
  assert_eq!(posts.len(), 1);
  assert_eq!(posts[0].0, BOOK_APPOINTMENT_ENDPOINT);
  assert_eq!(posts[0].1["preferred_clinic"], "Nashik Road");
}

#[tokio::test]
async fn success_false_body_is_rejected() {
  let source = FakeSource::new().on_post(Ok(json!({"success": false, "message": "Slot taken"})));
  let outcome = submit_at(&source, &contact_form(), now()).await.unwrap();
  assert_eq!(outcome, SubmitOutcome::Rejected { message: MSG_FAILED.into() });
}

#[tokio::test]
async fn server_errors_become_rejections() {
  let source = FakeSource::new().on_post(Err(ContentError::http(422, "invalid")));
  let outcome = submit_at(&source, &contact_form(), now()).await.unwrap();
  assert_eq!(outcome, SubmitOutcome::Rejected { message: MSG_INVALID_INPUT.into() });
}

#[tokio::test]
async fn invalid_form_is_never_sent() {
  let source = FakeSource::new();
  let form = AppointmentForm { phone: String::new(), ..contact_form() };
  let err = submit_at(&source, &form, now()).await.unwrap_err();
  assert_eq!(err, FormError::MissingRequired { field: "phone" });
  assert!(source.posts().is_empty());
}
