/* crates/clinic-content/src/seo.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const SITE_NAME: &str = "Dr. Joshi's Care & Cure Dental Clinic";
const SITE_BASE_URL: &str = "https://www.drjoshidental.com";
const DEFAULT_TITLE: &str =
  "Best Dental Clinic in Nashik Road | Braces, Aligners & Dental Implants";
const DEFAULT_DESCRIPTION: &str = "Dr. Joshi's Care & Cure Dental Clinic in Nashik Road offers \
  premium dental care with 4.9/5 rating from 113 Google reviews. Specializing in braces, \
  aligners, and dental implants.";

const TREATMENT_SLUGS: [(&str, &str); 7] = [
  ("dental-implants-nashik", "dentalImplants"),
  ("root-canal-treatment-nashik", "rootCanal"),
  ("cosmetic-dentist-nashik", "cosmeticDentistry"),
  ("pediatric-dentist-nashik", "pediatricDentistry"),
  ("teeth-whitening-nashik", "teethWhitening"),
  ("gum-disease-treatment-nashik", "gumDisease"),
  ("emergency-dental-care-nashik", "emergencyDental"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoPage {
  pub title: Option<String>,
  pub description: Option<String>,
  pub keywords: Option<String>,
  /// Site-relative path, e.g. `/about`.
  pub canonical: Option<String>,
}

/// Per-page SEO metadata plus the site-wide defaults used when a page has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoCatalog {
  pub site_name: String,
  pub base_url: String,
  pub default_title: String,
  pub default_description: String,
  pub pages: BTreeMap<String, SeoPage>,
  /// Treatment slug to page key.
  pub slugs: BTreeMap<String, String>,
}

impl Default for SeoCatalog {
  fn default() -> Self {
    Self {
      site_name: SITE_NAME.to_string(),
      base_url: SITE_BASE_URL.to_string(),
      default_title: DEFAULT_TITLE.to_string(),
      default_description: DEFAULT_DESCRIPTION.to_string(),
      pages: BTreeMap::new(),
      slugs: TREATMENT_SLUGS.iter().map(|(s, k)| ((*s).to_string(), (*k).to_string())).collect(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaAttr {
  Name,
  Property,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
  pub attr: MetaAttr,
  pub key: &'static str,
  pub content: String,
}

impl MetaTag {
  fn name(key: &'static str, content: impl Into<String>) -> Self {
    Self { attr: MetaAttr::Name, key, content: content.into() }
  }

  fn property(key: &'static str, content: impl Into<String>) -> Self {
    Self { attr: MetaAttr::Property, key, content: content.into() }
  }

  /// `<meta name="..." content="...">` with the content attribute-escaped.
  pub fn to_html(&self) -> String {
    let attr = match self.attr {
      MetaAttr::Name => "name",
      MetaAttr::Property => "property",
    };
    format!(r#"<meta {attr}="{}" content="{}">"#, self.key, escape_attr(&self.content))
  }
}

fn escape_attr(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '"' => out.push_str("&quot;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      _ => out.push(c),
    }
  }
  out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeoMeta {
  pub title: String,
  pub description: String,
  pub keywords: Option<String>,
  pub canonical_url: String,
  pub tags: Vec<MetaTag>,
}

impl SeoCatalog {
  /// Metadata for a page key; unknown keys get the site defaults at the site root.
  pub fn resolve(&self, key: &str) -> SeoMeta {
    match self.pages.get(key) {
      Some(page) => self.build(page, "/"),
      None => self.build(&SeoPage::default(), "/"),
    }
  }

  /// Metadata for a treatment slug. Unmapped slugs keep the defaults but point the canonical
  /// URL at the treatment's own path.
  pub fn resolve_slug(&self, slug: &str) -> SeoMeta {
    let fallback_path = format!("/treatments/{slug}");
    match self.slugs.get(slug).and_then(|key| self.pages.get(key)) {
      Some(page) => self.build(page, &fallback_path),
      None => self.build(&SeoPage::default(), &fallback_path),
    }
  }

  /// Key lookup first, then slug lookup; used where callers accept either.
  pub fn lookup(&self, key_or_slug: &str) -> SeoMeta {
    if self.pages.contains_key(key_or_slug) {
      self.resolve(key_or_slug)
    } else if self.slugs.contains_key(key_or_slug) {
      self.resolve_slug(key_or_slug)
    } else {
      self.resolve(key_or_slug)
    }
  }

  pub fn canonical_url(&self, path: &str) -> String {
    let base = self.base_url.trim_end_matches('/');
    let path = path.trim();
    if path.is_empty() || path == "/" {
      format!("{base}/")
    } else if path.starts_with('/') {
      format!("{base}{path}")
    } else {
      format!("{base}/{path}")
    }
  }

  fn build(&self, page: &SeoPage, default_path: &str) -> SeoMeta {
    let title = page.title.clone().unwrap_or_else(|| self.default_title.clone());
    let description = page.description.clone().unwrap_or_else(|| self.default_description.clone());
    let keywords = page.keywords.clone().filter(|k| !k.trim().is_empty());
    let canonical_url = self.canonical_url(page.canonical.as_deref().unwrap_or(default_path));

    let mut tags = vec![MetaTag::name("description", description.clone())];
    if let Some(keywords) = &keywords {
      tags.push(MetaTag::name("keywords", keywords.clone()));
    }
    tags.extend([
      MetaTag::property("og:title", title.clone()),
      MetaTag::property("og:description", description.clone()),
      MetaTag::property("og:url", canonical_url.clone()),
      MetaTag::property("og:site_name", self.site_name.clone()),
      MetaTag::name("twitter:card", "summary_large_image"),
    ]);

    SeoMeta { title, description, keywords, canonical_url, tags }
  }
}
