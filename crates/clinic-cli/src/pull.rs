/* crates/clinic-cli/src/pull.rs */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clinic_content::{
  ContentClient, LoadSession, OverallStatus, PageKind, PageView, ResourceLoader, ResourceResult,
};

use crate::ui;

/// Load one page through the resource loader, report each resource, and emit the composed
/// view model as JSON.
pub async fn pull_page(
  client: &ContentClient,
  kind: &PageKind,
  selector: Option<&str>,
  out: Option<&Path>,
) -> Result<OverallStatus> {
  ui::arrow(&format!("{} from {}", kind.name(), client.config().base_url));

  let loader = ResourceLoader::new(Arc::new(client.clone()));
  let session = loader.load(kind.requests()).await.into_session();
  report(&session);

  let view = PageView::compose(kind, &session, &client.config().asset_base_url, selector);
  let json = serde_json::to_string_pretty(&view).context("failed to serialize view model")?;
  match out {
    Some(path) => {
      std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
      ui::ok(&format!("saved {}", path.display()));
    }
    None => ui::raw(&json),
  }
  Ok(session.status())
}

fn report(session: &LoadSession) {
  for result in session.results() {
    report_resource(result);
  }
  let failed = session.failures().count();
  let summary = format!(
    "{} of {} loaded",
    session.results().len() - failed,
    ui::plural(session.results().len(), "resource", "resources")
  );
  match session.status() {
    OverallStatus::FullSuccess => ui::ok(&summary),
    OverallStatus::FullFailure => ui::fail(&summary),
    _ => ui::warn(&summary),
  }
  if let Some(notice) = session.status().notice() {
    ui::detail(notice);
  }
}

fn report_resource(result: &ResourceResult) {
  let records = ui::plural(result.records().len(), "record", "records");
  match &result.error {
    None => {
      let pages = result.meta.map(|m| format!(", page {}/{}", m.current_page, m.last_page));
      ui::ok(&format!("{}: {records}{}", result.key, pages.unwrap_or_default()));
    }
    Some(err) => {
      ui::fail(&format!("{}: {err} [{}]", result.key, err.code()));
      if result.recovered() {
        ui::detail(&format!("using fallback ({records})"));
      }
    }
  }
}
