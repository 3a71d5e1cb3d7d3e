/* crates/clinic-content/src/loader.rs */

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::client::{ContentSource, Params};
use crate::errors::{ContentError, ContentResult};
use crate::normalize::{PageMeta, Record, normalize, page_meta};

/// One named fetch within a page's request set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
  pub key: String,
  pub endpoint: String,
  pub params: Params,
  /// Substituted verbatim when the fetch fails.
  pub fallback: Option<Vec<Record>>,
}

impl ResourceRequest {
  pub fn new(key: impl Into<String>, endpoint: impl Into<String>) -> Self {
    Self { key: key.into(), endpoint: endpoint.into(), params: Params::new(), fallback: None }
  }

  pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
    self.params.insert(name.into(), value.to_string());
    self
  }

  pub fn fallback(mut self, records: Vec<Record>) -> Self {
    self.fallback = Some(records);
    self
  }

  /// Fallback given as an API-shaped literal; it goes through the same normalization as a
  /// live response.
  pub fn fallback_json(self, raw: &Value) -> Self {
    self.fallback(normalize(raw))
  }

  pub fn fallback_empty(self) -> Self {
    self.fallback(Vec::new())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
  Ok,
  Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResult {
  pub key: String,
  pub status: ResultStatus,
  /// Normalized response, or the fallback on failure. `None` only for a failure with no
  /// fallback.
  pub value: Option<Vec<Record>>,
  pub meta: Option<PageMeta>,
  pub error: Option<ContentError>,
}

impl ResourceResult {
  pub fn records(&self) -> &[Record] {
    self.value.as_deref().unwrap_or_default()
  }

  pub fn is_ok(&self) -> bool {
    self.status == ResultStatus::Ok
  }

  pub fn recovered(&self) -> bool {
    self.status == ResultStatus::Failed && self.value.is_some()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
  Loading,
  PartialSuccess,
  FullSuccess,
  FullFailure,
}

impl OverallStatus {
  /// Non-blocking notice a page shows for this status, if any.
  pub fn notice(self) -> Option<&'static str> {
    match self {
      Self::PartialSuccess => Some("Some content may be outdated."),
      Self::FullFailure => Some("Content is unavailable right now. Please try again later."),
      Self::Loading | Self::FullSuccess => None,
    }
  }
}

/// Rolls per-resource outcomes into the page status. A fallback counts as recovered content:
/// only a batch where every request failed and none had a fallback is a full failure.
pub fn overall_status(results: &[ResourceResult]) -> OverallStatus {
  let failed = results.iter().filter(|r| !r.is_ok()).count();
  if failed == 0 {
    OverallStatus::FullSuccess
  } else if failed == results.len() && results.iter().all(|r| r.value.is_none()) {
    OverallStatus::FullFailure
  } else {
    OverallStatus::PartialSuccess
  }
}

/// Bookkeeping for one settled batch. Results follow request order regardless of the order
/// in which responses arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSession {
  seq: u64,
  requests: Vec<ResourceRequest>,
  results: Vec<ResourceResult>,
  status: OverallStatus,
}

impl LoadSession {
  pub fn seq(&self) -> u64 {
    self.seq
  }

  pub fn requests(&self) -> &[ResourceRequest] {
    &self.requests
  }

  pub fn results(&self) -> &[ResourceResult] {
    &self.results
  }

  pub fn status(&self) -> OverallStatus {
    self.status
  }

  pub fn get(&self, key: &str) -> Option<&ResourceResult> {
    self.results.iter().find(|r| r.key == key)
  }

  /// Records for `key`, empty when the key is unknown or failed without fallback.
  pub fn records(&self, key: &str) -> &[Record] {
    self.get(key).map(ResourceResult::records).unwrap_or_default()
  }

  pub fn meta(&self, key: &str) -> Option<PageMeta> {
    self.get(key).and_then(|r| r.meta)
  }

  pub fn failures(&self) -> impl Iterator<Item = &ResourceResult> {
    self.results.iter().filter(|r| !r.is_ok())
  }
}

/// Externally observable loader state.
#[derive(Debug, Clone)]
pub enum LoadState {
  Idle,
  Loading { seq: u64 },
  Settled(Arc<LoadSession>),
}

impl LoadState {
  pub fn seq(&self) -> u64 {
    match self {
      Self::Idle => 0,
      Self::Loading { seq } => *seq,
      Self::Settled(session) => session.seq,
    }
  }

  pub fn status(&self) -> Option<OverallStatus> {
    match self {
      Self::Idle => None,
      Self::Loading { .. } => Some(OverallStatus::Loading),
      Self::Settled(session) => Some(session.status),
    }
  }

  pub fn session(&self) -> Option<&Arc<LoadSession>> {
    match self {
      Self::Settled(session) => Some(session),
      _ => None,
    }
  }
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
  /// The session settled while it was still the newest one and is now published.
  Current(Arc<LoadSession>),
  /// A newer load began first; this session was not published.
  Stale(Arc<LoadSession>),
}

impl LoadOutcome {
  pub fn is_current(&self) -> bool {
    matches!(self, Self::Current(_))
  }

  pub fn session(&self) -> &Arc<LoadSession> {
    match self {
      Self::Current(session) | Self::Stale(session) => session,
    }
  }

  pub fn into_session(self) -> Arc<LoadSession> {
    match self {
      Self::Current(session) | Self::Stale(session) => session,
    }
  }
}

/// Fetches a page's resources concurrently. Individual failures never abort the batch, and a
/// newer `load` always supersedes one still in flight.
pub struct ResourceLoader {
  source: Arc<dyn ContentSource>,
  state: watch::Sender<LoadState>,
  last_requests: Mutex<Vec<ResourceRequest>>,
}

impl ResourceLoader {
  pub fn new(source: Arc<dyn ContentSource>) -> Self {
    let (state, _) = watch::channel(LoadState::Idle);
    Self { source, state, last_requests: Mutex::new(Vec::new()) }
  }

  pub fn state(&self) -> LoadState {
    self.state.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<LoadState> {
    self.state.subscribe()
  }

  /// Issue every request at once and wait for all of them to settle.
  pub async fn load(&self, requests: Vec<ResourceRequest>) -> LoadOutcome {
    let requests = dedupe_keys(requests);
    *self.last_requests.lock().unwrap_or_else(PoisonError::into_inner) = requests.clone();

    let mut seq = 0;
    self.state.send_modify(|state| {
      seq = state.seq() + 1;
      *state = LoadState::Loading { seq };
    });
    debug!(seq, resources = requests.len(), "load started");

    let results = self.fetch_all(&requests).await;
    let status = overall_status(&results);
    let session = Arc::new(LoadSession { seq, requests, results, status });

    // Compare and publish under the channel lock so a newer session can never be overwritten.
    let published = self.state.send_if_modified(|state| {
      if state.seq() == seq {
        *state = LoadState::Settled(Arc::clone(&session));
        true
      } else {
        false
      }
    });

    if published {
      debug!(seq, ?status, "load settled");
      LoadOutcome::Current(session)
    } else {
      debug!(seq, "discarding stale load");
      LoadOutcome::Stale(session)
    }
  }

  /// Re-run the most recent request set, e.g. from a page's retry action.
  pub async fn reload(&self) -> LoadOutcome {
    let requests = self.last_requests.lock().unwrap_or_else(PoisonError::into_inner).clone();
    self.load(requests).await
  }

  async fn fetch_all(&self, requests: &[ResourceRequest]) -> Vec<ResourceResult> {
    let mut join_set = JoinSet::new();
    for (index, request) in requests.iter().enumerate() {
      let fetch = self.source.get(&request.endpoint, &request.params);
      join_set.spawn(async move { (index, fetch.await) });
    }

    let mut outcomes: Vec<Option<ContentResult<Value>>> = requests.iter().map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
      match joined {
        Ok((index, outcome)) => outcomes[index] = Some(outcome),
        Err(err) => warn!(error = %err, "content request task aborted"),
      }
    }

    requests
      .iter()
      .zip(outcomes)
      .map(|(request, outcome)| {
        let outcome = outcome
          .unwrap_or_else(|| Err(ContentError::network("request task did not complete")));
        settle(request, outcome)
      })
      .collect()
  }
}

fn settle(request: &ResourceRequest, outcome: ContentResult<Value>) -> ResourceResult {
  match outcome {
    Ok(raw) => ResourceResult {
      key: request.key.clone(),
      status: ResultStatus::Ok,
      value: Some(normalize(&raw)),
      meta: page_meta(&raw),
      error: None,
    },
    Err(err) => {
      warn!(
        key = %request.key,
        endpoint = %request.endpoint,
        error = %err,
        fallback = request.fallback.is_some(),
        "content resource failed"
      );
      ResourceResult {
        key: request.key.clone(),
        status: ResultStatus::Failed,
        value: request.fallback.clone(),
        meta: None,
        error: Some(err),
      }
    }
  }
}

/// Keys are unique within a request set; later duplicates are dropped.
fn dedupe_keys(requests: Vec<ResourceRequest>) -> Vec<ResourceRequest> {
  let mut seen = HashSet::new();
  requests
    .into_iter()
    .filter(|r| {
      let fresh = seen.insert(r.key.clone());
      if !fresh {
        warn!(key = %r.key, "duplicate resource key ignored");
      }
      fresh
    })
    .collect()
}
