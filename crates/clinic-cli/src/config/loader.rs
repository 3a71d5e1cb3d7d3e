/* crates/clinic-cli/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clinic_content::ClientConfig;
use tracing::debug;

use super::types::ClinicConfig;

pub const CONFIG_FILE: &str = "clinic.toml";

pub fn find_clinic_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("{CONFIG_FILE} not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_clinic_config(path: &Path) -> Result<ClinicConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: ClinicConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  if config.blog.per_page == 0 {
    bail!("blog.per_page must be at least 1");
  }
  Ok(config)
}

/// An explicit path must load; otherwise search upward from `cwd` and fall back to defaults
/// when no file exists.
pub fn resolve_config(explicit: Option<PathBuf>, cwd: &Path) -> Result<(Option<PathBuf>, ClinicConfig)> {
  if let Some(path) = explicit {
    let config = load_clinic_config(&path)?;
    return Ok((Some(path), config));
  }
  match find_clinic_config(cwd) {
    Ok(path) => {
      let config = load_clinic_config(&path)?;
      Ok((Some(path), config))
    }
    Err(err) => {
      debug!(error = %err, "using built-in configuration");
      Ok((None, ClinicConfig::default()))
    }
  }
}

impl ClinicConfig {
  /// Client settings: environment first, then `[api]`, then built-in defaults.
  pub fn client_config(&self, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
    ClientConfig::from_lookup(|key| env(key).or_else(|| self.api.value_for(key)))
      .context("invalid [api] configuration")
  }
}
