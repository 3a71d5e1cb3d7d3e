/* crates/clinic-cli/src/filters.rs */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clinic_content::{FilterState, FilterStore};
use tracing::warn;

/// Filter state per scope in a small JSON file. A missing or unreadable file behaves as empty.
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn read_all(&self) -> Result<BTreeMap<String, FilterState>> {
    if !self.path.exists() {
      return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(&self.path)
      .with_context(|| format!("failed to read {}", self.path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", self.path.display()))
  }

  fn write_all(&self, entries: &BTreeMap<String, FilterState>) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(&self.path, json)
      .with_context(|| format!("failed to write {}", self.path.display()))
  }
}

impl FilterStore for JsonFileStore {
  fn load(&self, scope: &str) -> Option<FilterState> {
    match self.read_all() {
      Ok(mut entries) => entries.remove(scope),
      Err(err) => {
        warn!(error = %format!("{err:#}"), "ignoring saved filters");
        None
      }
    }
  }

  fn save(&self, scope: &str, filters: &FilterState) {
    let mut entries = self.read_all().unwrap_or_default();
    entries.insert(scope.to_string(), filters.clone());
    if let Err(err) = self.write_all(&entries) {
      warn!(error = %format!("{err:#}"), "could not save filters");
    }
  }
}

/// Command-line filters layered over the saved ones. Any explicit search or category change
/// starts over at page one unless a page is also given.
pub fn merge_filters(
  saved: Option<FilterState>,
  search: Option<String>,
  category: Option<String>,
  page: Option<u32>,
) -> FilterState {
  let mut filters = saved.unwrap_or_default();
  if let Some(search) = search {
    filters = filters.with_search(search);
  }
  if let Some(category) = category {
    filters = filters.with_category(category);
  }
  if let Some(page) = page {
    filters = filters.with_page(page);
  }
  filters
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trip_through_file() {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(tmp.path().join(".clinic/filters.json"));
    assert!(store.load("blog").is_none());

    let filters = FilterState::default().with_category("Kids").with_page(3);
    store.save("blog", &filters);
    assert!(store.path().is_file());
    assert_eq!(store.load("blog"), Some(filters));
    assert!(store.load("other").is_none());
  }

  #[test]
  fn corrupt_file_reads_as_empty_and_is_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("filters.json");
    std::fs::write(&path, "{not json").unwrap();
    let store = JsonFileStore::new(&path);
    assert!(store.load("blog").is_none());

    store.save("blog", &FilterState::default());
    assert_eq!(store.load("blog"), Some(FilterState::default()));
  }

  #[test]
  fn merge_resets_page_on_new_filters() {
    let saved = FilterState::default().with_category("Kids").with_page(4);
    let merged = merge_filters(Some(saved.clone()), None, None, None);
    assert_eq!(merged, saved);

    let merged = merge_filters(Some(saved.clone()), Some("floss".into()), None, None);
    assert_eq!(merged.page, 1);
    assert_eq!(merged.category, "Kids");

    let merged = merge_filters(Some(saved), None, Some("All".into()), Some(2));
    assert_eq!(merged.page, 2);
    assert_eq!(merged.category_filter(), None);
  }
}
