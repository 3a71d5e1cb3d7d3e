/* crates/clinic-content/src/lib.rs */

pub mod client;
pub mod config;
pub mod errors;
pub mod forms;
pub mod icons;
pub mod loader;
pub mod normalize;
pub mod pages;
pub mod popup;
pub mod seo;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for ergonomic use
pub use client::{BoxFuture, ContentClient, ContentSource, Params, asset_url};
pub use config::ClientConfig;
pub use errors::{ContentError, ContentResult, FormError};
pub use forms::{AppointmentForm, DoctorAppointmentForm, SubmitOutcome, Submission, submit};
pub use icons::IconKind;
pub use loader::{
  LoadOutcome, LoadSession, LoadState, OverallStatus, ResourceLoader, ResourceRequest,
  ResourceResult, ResultStatus, overall_status,
};
pub use normalize::{PageMeta, Record, RecordId, normalize, page_meta, try_normalize};
pub use pages::{PageKind, PageStatus, PageView};
pub use popup::Popup;
pub use seo::{SeoCatalog, SeoMeta, SeoPage};
pub use view::{
  ALL_CATEGORIES, CategoryCount, FilterState, FilterStore, MemoryFilterStore, PaginationState,
  derive_category_counts, paginate, rank_popular,
};
