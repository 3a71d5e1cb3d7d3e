/* crates/clinic-content/src/pages.rs */

use serde::Serialize;
use serde_json::{Value, json};
use url::Url;

use crate::client::asset_url;
use crate::icons::IconKind;
use crate::loader::{LoadSession, OverallStatus, ResourceRequest};
use crate::normalize::{Record, normalize};
use crate::popup::Popup;
use crate::view::{
  CategoryCount, FilterState, PaginationState, derive_category_counts, find_by_slug, paginate,
  rank_popular, recent_excluding,
};

pub const DEFAULT_PER_PAGE: u32 = 6;
pub const POPULAR_LIMIT: usize = 3;
pub const RECENT_LIMIT: usize = 3;
pub const ABOUT_EMPTY_MESSAGE: &str =
  "No content available at the moment. Please check back later.";
pub const DEFAULT_CTA_CLINIC: &str = "Deolali Camp Clinic";

/// The data-driven pages of the site, each with a fixed request set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
  Home,
  Doctors,
  About,
  Navigation,
  Contact,
  Blog { filters: FilterState, per_page: u32 },
  BlogDetail { slug: String },
  Treatment { slug: String },
  Popup,
}

impl PageKind {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Home => "home",
      Self::Doctors => "doctors",
      Self::About => "about",
      Self::Navigation => "navigation",
      Self::Contact => "contact",
      Self::Blog { .. } => "blog",
      Self::BlogDetail { .. } => "blog-detail",
      Self::Treatment { .. } => "treatment",
      Self::Popup => "popup",
    }
  }

  pub fn requests(&self) -> Vec<ResourceRequest> {
    match self {
      Self::Home => vec![
        ResourceRequest::new("hero", "hero-section").fallback_empty(),
        ResourceRequest::new("welcome", "welcome-section").fallback_empty(),
        ResourceRequest::new("stats", "stats").fallback_json(&json!([])),
        ResourceRequest::new("services", "services").fallback_empty(),
        ResourceRequest::new("why_choose_us", "why-choose-us").fallback_empty(),
        ResourceRequest::new("testimonials", "testimonials").fallback_empty(),
        ResourceRequest::new("faqs", "faqs").fallback_empty(),
        ResourceRequest::new("cta", "cta").fallback_empty(),
      ],
      Self::Doctors => vec![
        ResourceRequest::new("doctors", "doctors").fallback_empty(),
        ResourceRequest::new("faqs", "doctor-faqs").fallback_empty(),
        ResourceRequest::new("why_choose_us", "why-choose-us-points").fallback_empty(),
        ResourceRequest::new("settings", "page-settings"),
      ],
      Self::About => vec![
        ResourceRequest::new("stories", "about-story").fallback_empty(),
        ResourceRequest::new("vision_mission", "vision-mission").fallback_empty(),
        ResourceRequest::new("team", "team-members").fallback_empty(),
      ],
      Self::Navigation => vec![
        ResourceRequest::new("treatments", "treatments")
          .param("active", true)
          .param("order", "asc")
          .fallback_empty(),
      ],
      Self::Contact => vec![ResourceRequest::new("clinics", "contact-information")],
      Self::Blog { filters, per_page } => {
        let mut posts =
          ResourceRequest::new("posts", "blogs").param("page", filters.page).param("per_page", per_page);
        if let Some(search) = filters.search_filter() {
          posts = posts.param("search", search);
        }
        if let Some(category) = filters.category_filter() {
          posts = posts.param("category", category);
        }
        vec![posts, ResourceRequest::new("categories", "blogs/categories").fallback_empty()]
      }
      Self::BlogDetail { slug } => vec![
        ResourceRequest::new("post", slug_endpoint("blogs", slug)),
        ResourceRequest::new("posts", "blogs").fallback_empty(),
      ],
      Self::Treatment { slug } => {
        let treatment = slug_endpoint("treatments", slug);
        let appointment = format!("{treatment}/appointments");
        vec![
          ResourceRequest::new("treatment", treatment),
          ResourceRequest::new("appointment", appointment).fallback_json(&default_appointment_card()),
        ]
      }
      Self::Popup => {
        vec![ResourceRequest::new("popup", "active-popup").fallback_json(&Popup::fallback_json())]
      }
    }
  }
}

/// `prefix/slug` with the slug encoded as a single path segment.
fn slug_endpoint(prefix: &str, slug: &str) -> String {
  format!("{prefix}/{}", urlencoding::encode(slug))
}

/// Booking card shown beside a treatment when the API has none.
pub fn default_appointment_card() -> Value {
  json!({
    "name": "Book Your Appointment",
    "booking_description": "Schedule your dental consultation today",
    "deolali_phone": "+91 90212 56647",
    "nashik_phone": "+91 81490 49104",
    "preferred_time": "9:30 AM - 9:00 PM",
    "preferred_date": "Flexible dates available",
    "button_text": "Book Appointment Now",
  })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageStatus {
  pub status: OverallStatus,
  pub notice: Option<&'static str>,
}

impl PageStatus {
  pub fn of(session: &LoadSession) -> Self {
    Self { status: session.status(), notice: session.status().notice() }
  }
}

fn first(session: &LoadSession, key: &str) -> Option<Record> {
  session.records(key).first().cloned()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub hero: Vec<Record>,
  pub welcome: Option<Record>,
  pub stats: Vec<Record>,
  pub services: Vec<Record>,
  pub why_choose_us: Vec<Record>,
  pub testimonials: Vec<Record>,
  pub faqs: Vec<Record>,
  pub cta: Option<Record>,
  /// Clinic preselected in the booking form beside the call to action.
  pub preferred_clinic: String,
}

impl HomeView {
  pub fn compose(session: &LoadSession) -> Self {
    let cta = first(session, "cta");
    Self {
      page: PageStatus::of(session),
      hero: session.records("hero").to_vec(),
      welcome: first(session, "welcome"),
      stats: session.records("stats").to_vec(),
      services: session.records("services").to_vec(),
      why_choose_us: session.records("why_choose_us").to_vec(),
      testimonials: session.records("testimonials").to_vec(),
      faqs: session.records("faqs").to_vec(),
      preferred_clinic: cta
        .as_ref()
        .and_then(|r| r.str_field("clinic1_name"))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_CTA_CLINIC)
        .to_string(),
      cta,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorsView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub doctors: Vec<Record>,
  pub faqs: Vec<Record>,
  pub why_choose_us: Vec<Record>,
  pub settings: Option<Record>,
}

impl DoctorsView {
  pub fn compose(session: &LoadSession) -> Self {
    Self {
      page: PageStatus::of(session),
      doctors: session.records("doctors").to_vec(),
      faqs: session.records("faqs").to_vec(),
      why_choose_us: session.records("why_choose_us").to_vec(),
      settings: first(session, "settings"),
    }
  }

  /// `settings[section][field]` when it is a non-empty string, else `fallback`.
  pub fn setting<'a>(&'a self, section: &str, field: &str, fallback: &'a str) -> &'a str {
    self
      .settings
      .as_ref()
      .and_then(|s| s.field(section))
      .and_then(|section| section.get(field))
      .and_then(Value::as_str)
      .filter(|v| !v.is_empty())
      .unwrap_or(fallback)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
  pub label: String,
  pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub treatments: Vec<NavLink>,
}

impl NavigationView {
  pub fn compose(session: &LoadSession) -> Self {
    let treatments = session
      .records("treatments")
      .iter()
      .filter(|r| r.flag("is_active"))
      .filter_map(|r| {
        let slug = r.str_field("slug")?;
        let label = r.str_field("h1").or_else(|| r.str_field("title")).unwrap_or(slug);
        Some(NavLink { label: label.to_string(), path: format!("/treatments/{slug}") })
      })
      .collect();
    Self { page: PageStatus::of(session), treatments }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogIndexView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub filters: FilterState,
  pub posts: Vec<Record>,
  pub categories: Vec<CategoryCount>,
  /// Category names published by the API, independent of the current page of posts.
  pub available_categories: Vec<String>,
  pub popular: Vec<Record>,
  pub pagination: PaginationState,
  pub total_count: u64,
}

impl BlogIndexView {
  /// Pagination comes from the API's meta block; without one the current page of records is
  /// all there is.
  pub fn compose(session: &LoadSession, filters: &FilterState, per_page: u32) -> Self {
    let posts = session.records("posts").to_vec();
    let pagination = match session.meta("posts") {
      Some(meta) => paginate(meta.total, meta.per_page.max(1), meta.current_page),
      None => paginate(posts.len() as u64, per_page, filters.page),
    };
    let available_categories = session
      .records("categories")
      .iter()
      .filter_map(|r| r.str_field("name"))
      .map(str::to_string)
      .collect();

    Self {
      page: PageStatus::of(session),
      filters: filters.clone(),
      categories: derive_category_counts(&posts, "category"),
      available_categories,
      popular: rank_popular(&posts, "views", POPULAR_LIMIT),
      total_count: pagination.total_items,
      pagination,
      posts,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogDetailView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub slug: String,
  pub post: Option<Record>,
  pub recent: Vec<Record>,
}

impl BlogDetailView {
  pub fn compose(session: &LoadSession, slug: &str) -> Self {
    let posts = session.records("posts");
    Self {
      page: PageStatus::of(session),
      slug: slug.to_string(),
      post: first(session, "post").or_else(|| find_by_slug(posts, slug).cloned()),
      recent: recent_excluding(posts, Some(slug), RECENT_LIMIT),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub stories: Vec<Record>,
  pub vision_mission: Option<Record>,
  pub team: Vec<Record>,
  pub empty_message: Option<&'static str>,
}

impl AboutView {
  pub fn compose(session: &LoadSession) -> Self {
    let stories = session.records("stories").to_vec();
    let vision_mission = first(session, "vision_mission");
    let team = session.records("team").to_vec();
    let empty = stories.is_empty() && vision_mission.is_none() && team.is_empty();
    Self {
      page: PageStatus::of(session),
      stories,
      vision_mission,
      team,
      empty_message: empty.then_some(ABOUT_EMPTY_MESSAGE),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.empty_message.is_some()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub clinics: Vec<Record>,
  pub selected: Option<Record>,
}

impl ContactView {
  /// `selector` matches a clinic's slug or the text of its id; no match selects the first.
  pub fn compose(session: &LoadSession, selector: Option<&str>) -> Self {
    let clinics = session.records("clinics").to_vec();
    let selected = selector
      .and_then(|sel| {
        clinics.iter().find(|c| c.str_field("slug") == Some(sel) || c.id.to_string() == sel)
      })
      .or_else(|| clinics.first())
      .cloned();
    Self { page: PageStatus::of(session), clinics, selected }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureItem {
  pub title: String,
  pub description: String,
  pub icon: IconKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub slug: String,
  pub treatment: Option<Record>,
  pub image_url: Option<String>,
  pub appointment: Record,
  pub features: Vec<FeatureItem>,
  pub faqs: Vec<Value>,
}

impl TreatmentView {
  pub fn compose(session: &LoadSession, slug: &str, assets: &Url) -> Self {
    let treatment = first(session, "treatment");
    let appointment = first(session, "appointment").unwrap_or_else(default_card_record);

    let features = treatment
      .as_ref()
      .and_then(|t| t.field("why_choose_items"))
      .and_then(Value::as_array)
      .map(|items| items.iter().map(feature_item).collect())
      .unwrap_or_default();
    let faqs = treatment
      .as_ref()
      .and_then(|t| t.field("faqs"))
      .and_then(Value::as_array)
      .cloned()
      .unwrap_or_default();
    let image_url = treatment
      .as_ref()
      .and_then(|t| t.str_field("image").or_else(|| t.str_field("image_url")))
      .and_then(|path| asset_url(assets, path));

    Self {
      page: PageStatus::of(session),
      slug: slug.to_string(),
      treatment,
      image_url,
      appointment,
      features,
      faqs,
    }
  }
}

fn default_card_record() -> Record {
  normalize(&default_appointment_card()).into_iter().next().unwrap_or_else(|| Record {
    id: crate::normalize::RecordId::Num(0),
    order: 0.0,
    visible: true,
    fields: serde_json::Map::new(),
  })
}

fn feature_item(item: &Value) -> FeatureItem {
  let text = |name: &str| item.get(name).and_then(Value::as_str).filter(|s| !s.is_empty());
  FeatureItem {
    title: text("title").unwrap_or("Feature").to_string(),
    description: text("description").unwrap_or("Description not available").to_string(),
    icon: IconKind::resolve(text("icon")),
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView {
  #[serde(flatten)]
  pub page: PageStatus,
  pub popup: Popup,
}

impl PopupView {
  pub fn compose(session: &LoadSession) -> Self {
    let popup = session.records("popup").first().map(Popup::from_record).unwrap_or_default();
    Self { page: PageStatus::of(session), popup }
  }
}

/// Any composed page, for callers that pick the page at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum PageView {
  Home(HomeView),
  Doctors(DoctorsView),
  About(AboutView),
  Navigation(NavigationView),
  Contact(ContactView),
  Blog(BlogIndexView),
  BlogDetail(BlogDetailView),
  Treatment(TreatmentView),
  Popup(PopupView),
}

impl PageView {
  /// `selector` picks the clinic on the contact page and is ignored elsewhere.
  pub fn compose(kind: &PageKind, session: &LoadSession, assets: &Url, selector: Option<&str>) -> Self {
    match kind {
      PageKind::Home => Self::Home(HomeView::compose(session)),
      PageKind::Doctors => Self::Doctors(DoctorsView::compose(session)),
      PageKind::About => Self::About(AboutView::compose(session)),
      PageKind::Navigation => Self::Navigation(NavigationView::compose(session)),
      PageKind::Contact => Self::Contact(ContactView::compose(session, selector)),
      PageKind::Blog { filters, per_page } => {
        Self::Blog(BlogIndexView::compose(session, filters, *per_page))
      }
      PageKind::BlogDetail { slug } => Self::BlogDetail(BlogDetailView::compose(session, slug)),
      PageKind::Treatment { slug } => Self::Treatment(TreatmentView::compose(session, slug, assets)),
      PageKind::Popup => Self::Popup(PopupView::compose(session)),
    }
  }
}

#[cfg(test)]
mod tests;
