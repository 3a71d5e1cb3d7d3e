/* crates/clinic-content/src/pages/tests.rs */

use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::errors::ContentError;
use crate::loader::ResourceLoader;
use crate::testing::FakeSource;

async fn settle(source: FakeSource, kind: &PageKind) -> Arc<LoadSession> {
  ResourceLoader::new(Arc::new(source)).load(kind.requests()).await.into_session()
}

fn assets() -> Url {
  Url::parse("http://127.0.0.1:8000/uploads/").unwrap()
}

#[test]
fn blog_requests_omit_all_and_empty_search() {
  let kind = PageKind::Blog { filters: FilterState::default().with_page(2), per_page: 6 };
  let requests = kind.requests();
  let posts = &requests[0];
  assert_eq!(posts.endpoint, "blogs");
  assert_eq!(posts.params.get("page").map(String::as_str), Some("2"));
  assert_eq!(posts.params.get("per_page").map(String::as_str), Some("6"));
  assert!(!posts.params.contains_key("category"));
  assert!(!posts.params.contains_key("search"));
  assert!(posts.fallback.is_none());
  assert_eq!(requests[1].endpoint, "blogs/categories");

  let kind = PageKind::Blog {
    filters: FilterState::default().with_category("Oral Care").with_search("gum"),
    per_page: 6,
  };
  let requests = kind.requests();
  assert_eq!(requests[0].params.get("category").map(String::as_str), Some("Oral Care"));
  assert_eq!(requests[0].params.get("search").map(String::as_str), Some("gum"));
  assert_eq!(requests[0].params.get("page").map(String::as_str), Some("1"));
}

#[test]
fn request_sets_and_fallbacks() {
  let doctors = PageKind::Doctors.requests();
  let endpoints: Vec<&str> = doctors.iter().map(|r| r.endpoint.as_str()).collect();
  assert_eq!(endpoints, ["doctors", "doctor-faqs", "why-choose-us-points", "page-settings"]);
  assert!(doctors[3].fallback.is_none());
  assert!(doctors[..3].iter().all(|r| r.fallback == Some(Vec::new())));

  let nav = PageKind::Navigation.requests();
  assert_eq!(nav[0].params.get("active").map(String::as_str), Some("true"));
  assert_eq!(nav[0].params.get("order").map(String::as_str), Some("asc"));

  let treatment = PageKind::Treatment { slug: "root-canal-treatment-nashik".into() }.requests();
  assert_eq!(treatment[0].endpoint, "treatments/root-canal-treatment-nashik");
  assert_eq!(treatment[1].endpoint, "treatments/root-canal-treatment-nashik/appointments");
  assert_eq!(treatment[1].fallback.as_ref().map(Vec::len), Some(1));

  let home = PageKind::Home.requests();
  let endpoints: Vec<&str> = home.iter().map(|r| r.endpoint.as_str()).collect();
  assert_eq!(
    endpoints,
    [
      "hero-section",
      "welcome-section",
      "stats",
      "services",
      "why-choose-us",
      "testimonials",
      "faqs",
      "cta"
    ]
  );
  assert!(home.iter().all(|r| r.fallback == Some(Vec::new())));
  assert!(PageKind::Contact.requests()[0].fallback.is_none());
}

#[test]
fn slugs_are_encoded_as_one_segment() {
  let treatment = PageKind::Treatment { slug: "braces?admin=1#top".into() }.requests();
  assert_eq!(treatment[0].endpoint, "treatments/braces%3Fadmin%3D1%23top");
  assert_eq!(treatment[1].endpoint, "treatments/braces%3Fadmin%3D1%23top/appointments");

  let detail = PageKind::BlogDetail { slug: "a/b".into() }.requests();
  assert_eq!(detail[0].endpoint, "blogs/a%2Fb");
}

#[tokio::test]
async fn home_collects_hero_stats_and_cta() {
  let source = FakeSource::new()
    .ok("hero-section", json!({"success": true, "data": [{"id": 1, "title": "Smile"}]}))
    .ok("stats", json!({"success": true, "data": [{"id": 1, "value": "5000+", "label": "Patients"}]}))
    .ok("cta", json!({"success": true, "data": [{"id": 1, "clinic1_name": "Nashik Road Clinic"}]}));
  let view = HomeView::compose(&*settle(source, &PageKind::Home).await);
  assert_eq!(view.hero.len(), 1);
  assert_eq!(view.stats[0].str_field("label"), Some("Patients"));
  assert!(view.cta.is_some());
  assert_eq!(view.preferred_clinic, "Nashik Road Clinic");
  assert_eq!(view.page.status, OverallStatus::PartialSuccess);

  let view = HomeView::compose(&*settle(FakeSource::new(), &PageKind::Home).await);
  assert!(view.stats.is_empty());
  assert!(view.cta.is_none());
  assert_eq!(view.preferred_clinic, DEFAULT_CTA_CLINIC);
}

#[tokio::test]
async fn navigation_lists_active_treatments_in_order() {
  let source = FakeSource::new().ok(
    "treatments",
    json!({"success": true, "data": [
      {"id": 1, "slug": "root-canal", "h1": "Root Canal", "is_active": true, "order": 2},
      {"id": 2, "slug": "implants", "h1": "Dental Implants", "is_active": 1, "order": 1},
      {"id": 3, "slug": "veneers", "h1": "Veneers", "is_active": false},
      {"id": 4, "h1": "No slug", "is_active": true},
    ]}),
  );
  let session = settle(source, &PageKind::Navigation).await;
  let view = NavigationView::compose(&session);
  assert_eq!(
    view.treatments,
    [
      NavLink { label: "Dental Implants".into(), path: "/treatments/implants".into() },
      NavLink { label: "Root Canal".into(), path: "/treatments/root-canal".into() },
    ]
  );
  assert_eq!(view.page.notice, None);
}

#[tokio::test]
async fn blog_index_uses_api_meta() {
  let source = FakeSource::new()
    .ok(
      "blogs",
      json!({
        "data": [
          {"id": 1, "slug": "a", "category": "Oral Care", "views": 10},
          {"id": 2, "slug": "b", "category": "Kids", "views": 40},
          {"id": 3, "slug": "c", "category": "Oral Care", "views": 25},
          {"id": 4, "slug": "d", "category": "Implants"},
        ],
        "meta": {"current_page": 2, "last_page": 3, "per_page": 4, "total": 11}
      }),
    )
    .ok("blogs/categories", json!([{"name": "Oral Care"}, {"name": "Kids"}]));
  let filters = FilterState::default().with_page(2);
  let kind = PageKind::Blog { filters: filters.clone(), per_page: 4 };
  let session = settle(source, &kind).await;
  let view = BlogIndexView::compose(&session, &filters, 4);

  assert_eq!(view.pagination.current_page, 2);
  assert_eq!(view.pagination.total_pages, 3);
  assert_eq!(view.total_count, 11);
  let popular: Vec<&str> = view.popular.iter().filter_map(|r| r.str_field("slug")).collect();
  assert_eq!(popular, ["b", "c", "a"]);
  let counts: Vec<(&str, usize)> = view.categories.iter().map(|c| (c.name.as_str(), c.count)).collect();
  assert_eq!(counts, [("Oral Care", 2), ("Kids", 1), ("Implants", 1)]);
  assert_eq!(view.available_categories, ["Oral Care", "Kids"]);
}

#[tokio::test]
async fn blog_index_without_meta_paginates_locally() {
  let source = FakeSource::new()
    .ok("blogs", json!([{"id": 1}, {"id": 2}]))
    .fail("blogs/categories", ContentError::http(404, "Not Found"));
  let filters = FilterState::default().with_page(5);
  let session = settle(source, &PageKind::Blog { filters: filters.clone(), per_page: 6 }).await;
  let view = BlogIndexView::compose(&session, &filters, 6);
  assert_eq!(view.pagination.current_page, 1);
  assert_eq!(view.pagination.total_pages, 1);
  assert_eq!(view.page.status, OverallStatus::PartialSuccess);
  assert_eq!(view.page.notice, Some("Some content may be outdated."));
}

#[tokio::test]
async fn blog_detail_finds_post_and_recent() {
  let source = FakeSource::new().ok(
    "blogs",
    json!([{"slug": "a"}, {"slug": "b"}, {"slug": "c"}, {"slug": "d"}, {"slug": "e"}]),
  );
  let kind = PageKind::BlogDetail { slug: "b".into() };
  let session = settle(source, &kind).await;
  let view = BlogDetailView::compose(&session, "b");
  assert_eq!(view.post.as_ref().and_then(|p| p.str_field("slug")), Some("b"));
  let recent: Vec<&str> = view.recent.iter().filter_map(|r| r.str_field("slug")).collect();
  assert_eq!(recent, ["a", "c", "d"]);

  let missing = BlogDetailView::compose(&session, "zzz");
  assert!(missing.post.is_none());
}

#[tokio::test]
async fn blog_detail_loads_post_beyond_first_page() {
  let first_page: Vec<_> = ["a", "b", "c", "d", "e", "f"].iter().map(|s| json!({"slug": s})).collect();
  let source = FakeSource::new()
    .ok("blogs", json!({"data": first_page, "meta": {"current_page": 1, "last_page": 2, "per_page": 6, "total": 7}}))
    .ok("blogs/g", json!({"success": true, "data": {"id": 7, "slug": "g", "title": "Gum care"}}));
  let kind = PageKind::BlogDetail { slug: "g".into() };
  let session = settle(source, &kind).await;
  let view = BlogDetailView::compose(&session, "g");
  assert_eq!(view.post.as_ref().and_then(|p| p.str_field("title")), Some("Gum care"));
  assert_eq!(view.recent.len(), RECENT_LIMIT);
  assert_eq!(view.page.status, OverallStatus::FullSuccess);
}

#[tokio::test]
async fn about_all_empty_shows_message() {
  let source = FakeSource::new()
    .ok("about-story", json!([{"id": 1, "visible": false}]))
    .ok("vision-mission", json!({"data": []}))
    .fail("team-members", ContentError::network("connection refused"));
  let session = settle(source, &PageKind::About).await;
  let view = AboutView::compose(&session);
  assert!(view.is_empty());
  assert_eq!(view.empty_message, Some(ABOUT_EMPTY_MESSAGE));
  assert_eq!(view.page.status, OverallStatus::PartialSuccess);
}

#[tokio::test]
async fn about_takes_first_visible_vision() {
  let source = FakeSource::new()
    .ok("about-story", json!([]))
    .ok(
      "vision-mission",
      json!([
        {"id": 1, "vision": "hidden", "visible": false},
        {"id": 2, "vision": "Pain-free care", "order": 5},
        {"id": 3, "vision": "Earlier", "order": 9},
      ]),
    )
    .ok("team-members", json!([]));
  let view = AboutView::compose(&*settle(source, &PageKind::About).await);
  assert!(!view.is_empty());
  let vision = view.vision_mission.as_ref().and_then(|r| r.str_field("vision"));
  assert_eq!(vision, Some("Pain-free care"));
}

#[tokio::test]
async fn contact_selects_by_slug_id_or_first() {
  let source = FakeSource::new().ok(
    "contact-information",
    json!([
      {"id": 1, "slug": "nashik-road", "name": "Nashik Road"},
      {"id": 2, "slug": "deolali-camp", "name": "Deolali Camp"},
    ]),
  );
  let session = settle(source, &PageKind::Contact).await;
  let name = |view: ContactView| view.selected.and_then(|c| c.str_field("name").map(str::to_string));
  assert_eq!(name(ContactView::compose(&session, Some("deolali-camp"))).as_deref(), Some("Deolali Camp"));
  assert_eq!(name(ContactView::compose(&session, Some("2"))).as_deref(), Some("Deolali Camp"));
  assert_eq!(name(ContactView::compose(&session, Some("pune"))).as_deref(), Some("Nashik Road"));
  assert_eq!(name(ContactView::compose(&session, None)).as_deref(), Some("Nashik Road"));
}

#[tokio::test]
async fn contact_failure_is_full_failure() {
  let source = FakeSource::new().fail("contact-information", ContentError::http(500, "Server Error"));
  let session = settle(source, &PageKind::Contact).await;
  let view = ContactView::compose(&session, None);
  assert_eq!(view.page.status, OverallStatus::FullFailure);
  assert!(view.selected.is_none());
  assert_eq!(view.page.notice, Some("Content is unavailable right now. Please try again later."));
}

#[tokio::test]
async fn treatment_with_failed_card_uses_default() {
  let source = FakeSource::new().ok(
    "treatments/dental-implants-nashik",
    json!({"success": true, "data": {
      "id": 7,
      "h1": "Dental Implants",
      "image": "/uploads/treatments/implant.jpg",
      "why_choose_items": [
        {"title": "Experienced team", "description": "19+ years", "icon": "Award"},
        {"icon": "sparkle"},
      ],
      "faqs": [{"question": "Does it hurt?", "answer": "No."}],
    }}),
  );
  let kind = PageKind::Treatment { slug: "dental-implants-nashik".into() };
  let session = settle(source, &kind).await;
  let view = TreatmentView::compose(&session, "dental-implants-nashik", &assets());

  assert_eq!(view.page.status, OverallStatus::PartialSuccess);
  assert_eq!(view.appointment.str_field("button_text"), Some("Book Appointment Now"));
  assert_eq!(view.image_url.as_deref(), Some("http://127.0.0.1:8000/uploads/treatments/implant.jpg"));
  assert_eq!(view.faqs.len(), 1);
  assert_eq!(
    view.features,
    [
      FeatureItem { title: "Experienced team".into(), description: "19+ years".into(), icon: IconKind::Award },
      FeatureItem {
        title: "Feature".into(),
        description: "Description not available".into(),
        icon: IconKind::CheckCircle,
      },
    ]
  );
}

#[tokio::test]
async fn treatment_empty_card_list_uses_default() {
  let source = FakeSource::new()
    .ok("treatments/braces", json!({"data": {"id": 1}}))
    .ok("treatments/braces/appointments", json!({"success": true, "data": []}));
  let session = settle(source, &PageKind::Treatment { slug: "braces".into() }).await;
  let view = TreatmentView::compose(&session, "braces", &assets());
  assert_eq!(view.page.status, OverallStatus::FullSuccess);
  assert_eq!(view.appointment.str_field("nashik_phone"), Some("+91 81490 49104"));
}

#[tokio::test]
async fn popup_falls_back_to_builtin() {
  let session = settle(FakeSource::new(), &PageKind::Popup).await;
  let view = PopupView::compose(&session);
  assert_eq!(view.popup, Popup::default());
  assert_eq!(view.page.status, OverallStatus::PartialSuccess);
}

#[tokio::test]
async fn doctors_settings_lookup() {
  let source = FakeSource::new()
    .ok("doctors", json!([{"id": 1, "name": "Dr. Joshi"}]))
    .ok("doctor-faqs", json!([]))
    .ok("why-choose-us-points", json!([]))
    .ok("page-settings", json!({"data": {"hero": {"title": "Meet Our Doctors", "subtitle": ""}}}));
  let view = DoctorsView::compose(&*settle(source, &PageKind::Doctors).await);
  assert_eq!(view.setting("hero", "title", "Doctors"), "Meet Our Doctors");
  assert_eq!(view.setting("hero", "subtitle", "Expert care"), "Expert care");
  assert_eq!(view.setting("cta", "title", "Book"), "Book");
}

#[tokio::test]
async fn page_view_serializes_with_page_tag() {
  let session = settle(FakeSource::new().ok("faqs", json!([])), &PageKind::Home).await;
  let view = PageView::compose(&PageKind::Home, &session, &assets(), None);
  let value = serde_json::to_value(&view).unwrap();
  assert_eq!(value["page"], "home");
  assert_eq!(value["status"], "partial_success");
}
