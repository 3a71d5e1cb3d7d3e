/* crates/clinic-content/src/icons.rs */

use serde::Serialize;
use tracing::warn;

/// Icons a feature item may carry. The API sends free-form names; anything unknown renders
/// as a check mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
  Award,
  Users,
  Shield,
  Star,
  CheckCircle,
  Heart,
  Clock,
  Calendar,
}

impl IconKind {
  pub const ALL: [IconKind; 8] = [
    Self::Award,
    Self::Users,
    Self::Shield,
    Self::Star,
    Self::CheckCircle,
    Self::Heart,
    Self::Clock,
    Self::Calendar,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::Award => "Award",
      Self::Users => "Users",
      Self::Shield => "Shield",
      Self::Star => "Star",
      Self::CheckCircle => "CheckCircle",
      Self::Heart => "Heart",
      Self::Clock => "Clock",
      Self::Calendar => "Calendar",
    }
  }

  /// Exact lookup, case-insensitive, with the `fa-check` alias.
  pub fn parse(name: &str) -> Option<Self> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("fa-check") {
      return Some(Self::CheckCircle);
    }
    Self::ALL.into_iter().find(|icon| icon.name().eq_ignore_ascii_case(name))
  }

  pub fn resolve(name: Option<&str>) -> Self {
    match name {
      None => Self::CheckCircle,
      Some(raw) => Self::parse(raw).unwrap_or_else(|| {
        warn!(icon = raw, "unknown icon name, using CheckCircle");
        Self::CheckCircle
      }),
    }
  }
}

impl std::fmt::Display for IconKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}
