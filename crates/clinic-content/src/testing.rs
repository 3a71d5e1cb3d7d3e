/* crates/clinic-content/src/testing.rs */

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use crate::client::{BoxFuture, ContentSource, Params};
use crate::errors::{ContentError, ContentResult};

/// In-memory content API: canned results per endpoint, with an optional delay.
#[derive(Default)]
pub(crate) struct FakeSource {
  routes: HashMap<String, (Duration, ContentResult<Value>)>,
  calls: Mutex<Vec<(String, Params)>>,
  posts: Mutex<Vec<(String, Value)>>,
  post_result: Option<ContentResult<Value>>,
}

impl FakeSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn ok(self, endpoint: &str, body: Value) -> Self {
    self.route(endpoint, Duration::ZERO, Ok(body))
  }

  pub fn fail(self, endpoint: &str, err: ContentError) -> Self {
    self.route(endpoint, Duration::ZERO, Err(err))
  }

  pub fn route(mut self, endpoint: &str, delay: Duration, result: ContentResult<Value>) -> Self {
    self.routes.insert(endpoint.to_string(), (delay, result));
    self
  }

  pub fn on_post(mut self, result: ContentResult<Value>) -> Self {
    self.post_result = Some(result);
    self
  }

  pub fn calls(&self) -> Vec<(String, Params)> {
    self.calls.lock().unwrap().clone()
  }

  pub fn posts(&self) -> Vec<(String, Value)> {
    self.posts.lock().unwrap().clone()
  }
}

impl ContentSource for FakeSource {
  fn get(&self, path: &str, params: &Params) -> BoxFuture<ContentResult<Value>> {
    self.calls.lock().unwrap().push((path.to_string(), params.clone()));
    let route = self.routes.get(path).cloned();
    Box::pin(async move {
      match route {
        Some((delay, result)) => {
          if !delay.is_zero() {
            tokio::time::sleep(delay).await;
          }
          result
        }
        None => Err(ContentError::http(404, "Not Found")),
      }
    })
  }

  fn post(&self, path: &str, body: Value) -> BoxFuture<ContentResult<Value>> {
    self.posts.lock().unwrap().push((path.to_string(), body));
    let result = self.post_result.clone().unwrap_or(Ok(Value::Null));
    Box::pin(async move { result })
  }
}
