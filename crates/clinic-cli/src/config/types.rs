/* crates/clinic-cli/src/config/types.rs */

use clinic_content::SeoCatalog;
use clinic_content::config::{ENV_ASSET_BASE_URL, ENV_BASE_URL, ENV_CSRF_TOKEN, ENV_TIMEOUT_MS};
use clinic_content::pages::DEFAULT_PER_PAGE;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
  pub api: ApiSection,
  pub blog: BlogSection,
  pub seo: SeoCatalog,
}

/// Unset keys fall through to the client's built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiSection {
  pub base_url: Option<String>,
  pub asset_base_url: Option<String>,
  pub timeout_ms: Option<u64>,
  pub csrf_token: Option<String>,
}

impl ApiSection {
  /// File value for the environment variable that would override it.
  pub fn value_for(&self, env_key: &str) -> Option<String> {
    match env_key {
      ENV_BASE_URL => self.base_url.clone(),
      ENV_ASSET_BASE_URL => self.asset_base_url.clone(),
      ENV_TIMEOUT_MS => self.timeout_ms.map(|ms| ms.to_string()),
      ENV_CSRF_TOKEN => self.csrf_token.clone(),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlogSection {
  pub per_page: u32,
  /// Where the last-used blog filters are kept, relative to the config file.
  pub filters_file: String,
}

impl Default for BlogSection {
  fn default() -> Self {
    Self { per_page: DEFAULT_PER_PAGE, filters_file: ".clinic/filters.json".to_string() }
  }
}
