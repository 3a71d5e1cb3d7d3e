/* crates/clinic-content/src/view.rs */

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
  pub name: String,
  pub count: usize,
}

/// Tally `fields[category_field]` in first-seen order. Records without a usable category are
/// skipped; numeric categories are counted by their text form.
pub fn derive_category_counts(records: &[Record], category_field: &str) -> Vec<CategoryCount> {
  let mut counts: Vec<CategoryCount> = Vec::new();
  for record in records {
    let name = match record.field(category_field) {
      Some(Value::String(s)) if !s.is_empty() => s.clone(),
      Some(Value::Number(n)) => n.to_string(),
      _ => continue,
    };
    match counts.iter_mut().find(|c| c.name == name) {
      Some(entry) => entry.count += 1,
      None => counts.push(CategoryCount { name, count: 1 }),
    }
  }
  counts
}

/// Highest `fields[rank_field]` first (missing reads as 0), ties in input order.
pub fn rank_popular(records: &[Record], rank_field: &str, limit: usize) -> Vec<Record> {
  let mut ranked = records.to_vec();
  ranked.sort_by(|a, b| b.number_field(rank_field).total_cmp(&a.number_field(rank_field)));
  ranked.truncate(limit);
  ranked
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
  pub current_page: u32,
  pub page_size: u32,
  pub total_items: u64,
  pub total_pages: u32,
}

impl PaginationState {
  pub fn has_previous(&self) -> bool {
    self.current_page > 1
  }

  pub fn has_next(&self) -> bool {
    self.current_page < self.total_pages
  }

  /// Page numbers for the pager buttons.
  pub fn pages(&self) -> impl Iterator<Item = u32> {
    1..=self.total_pages
  }

  /// Zero-based index range of the current page within the full item list.
  pub fn window(&self) -> std::ops::Range<usize> {
    let size = self.page_size as usize;
    let total = usize::try_from(self.total_items).unwrap_or(usize::MAX);
    let start = (self.current_page as usize).saturating_sub(1).saturating_mul(size).min(total);
    start..start.saturating_add(size).min(total)
  }
}

/// `total_pages = ceil(total_items / page_size)`, never below one so an empty list still has
/// a page to show. The current page is clamped into `1..=total_pages`. A zero page size is
/// treated as one.
pub fn paginate(total_items: u64, page_size: u32, current_page: u32) -> PaginationState {
  let page_size = page_size.max(1);
  let total_pages =
    u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX).max(1);
  let current_page = current_page.clamp(1, total_pages);
  PaginationState { current_page, page_size, total_items, total_pages }
}

/// The records on the current page of a client-side paginated list.
pub fn page_slice<'a>(records: &'a [Record], pagination: &PaginationState) -> &'a [Record] {
  let window = pagination.window();
  &records[window.start.min(records.len())..window.end.min(records.len())]
}

pub fn find_by_slug<'a>(records: &'a [Record], slug: &str) -> Option<&'a Record> {
  records.iter().find(|r| r.str_field("slug") == Some(slug))
}

/// Up to `limit` records other than the one with `exclude_slug`, in list order.
pub fn recent_excluding(records: &[Record], exclude_slug: Option<&str>, limit: usize) -> Vec<Record> {
  records
    .iter()
    .filter(|r| exclude_slug.is_none() || r.str_field("slug") != exclude_slug)
    .take(limit)
    .cloned()
    .collect()
}

pub const ALL_CATEGORIES: &str = "All";

/// Page-owned list filters. Changing the search or category returns to page one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
  pub search: String,
  pub category: String,
  pub page: u32,
}

impl Default for FilterState {
  fn default() -> Self {
    Self { search: String::new(), category: ALL_CATEGORIES.to_string(), page: 1 }
  }
}

impl FilterState {
  pub fn with_search(self, search: impl Into<String>) -> Self {
    Self { search: search.into(), page: 1, ..self }
  }

  pub fn with_category(self, category: impl Into<String>) -> Self {
    Self { category: category.into(), page: 1, ..self }
  }

  pub fn with_page(self, page: u32) -> Self {
    Self { page: page.max(1), ..self }
  }

  /// Category to send to the API; the `All` sentinel means no filter.
  pub fn category_filter(&self) -> Option<&str> {
    let category = self.category.trim();
    if category.is_empty() || category == ALL_CATEGORIES { None } else { Some(category) }
  }

  pub fn search_filter(&self) -> Option<&str> {
    let search = self.search.trim();
    if search.is_empty() { None } else { Some(search) }
  }
}

/// Narrow persistence for the last-used filters. The loader never touches it.
pub trait FilterStore {
  fn load(&self, scope: &str) -> Option<FilterState>;

  fn save(&self, scope: &str, filters: &FilterState);
}

#[derive(Debug, Default)]
pub struct MemoryFilterStore {
  entries: std::sync::Mutex<std::collections::HashMap<String, FilterState>>,
}

impl FilterStore for MemoryFilterStore {
  fn load(&self, scope: &str) -> Option<FilterState> {
    self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner).get(scope).cloned()
  }

  fn save(&self, scope: &str, filters: &FilterState) {
    self
      .entries
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner)
      .insert(scope.to_string(), filters.clone());
  }
}
