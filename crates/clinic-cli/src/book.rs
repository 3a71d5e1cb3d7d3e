/* crates/clinic-cli/src/book.rs */

use clinic_content::{ContentSource, SubmitOutcome, Submission, submit};

use crate::ui;

/// Submit a booking form and report the outcome. Returns whether the API accepted it.
pub async fn book<F>(source: &dyn ContentSource, form: &F) -> bool
where
  F: Submission + ?Sized,
{
  ui::arrow(&format!("submitting to {}", form.endpoint()));
  match submit(source, form).await {
    Ok(SubmitOutcome::Accepted) => {
      ui::ok("appointment request received");
      true
    }
    Ok(SubmitOutcome::Rejected { message }) => {
      ui::fail(&message);
      false
    }
    Err(err) => {
      ui::fail(&err.to_string());
      false
    }
  }
}
