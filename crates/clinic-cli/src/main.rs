/* crates/clinic-cli/src/main.rs */

mod book;
mod config;
mod filters;
mod pull;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use clinic_content::{
  AppointmentForm, ContentClient, DoctorAppointmentForm, FilterStore, OverallStatus, PageKind,
  RecordId,
};
use tracing_subscriber::EnvFilter;

use config::{ClinicConfig, resolve_config};
use filters::{JsonFileStore, merge_filters};

const BLOG_SCOPE: &str = "blog";

#[derive(Parser)]
#[command(name = "clinic", about = "Clinic website content client")]
struct Cli {
  /// Path to clinic.toml (auto-detected if omitted)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  #[command(subcommand)]
  command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageArg {
  Home,
  Doctors,
  About,
  Navigation,
  Contact,
  Blog,
  BlogDetail,
  Treatment,
  Popup,
}

#[derive(Subcommand)]
enum Command {
  /// Load a page's content and print its view model
  Pull {
    #[arg(value_name = "PAGE")]
    target: PageArg,
    /// Treatment or blog post slug; clinic slug or id for the contact page
    #[arg(long)]
    slug: Option<String>,
    /// Blog search text
    #[arg(long)]
    search: Option<String>,
    /// Blog category ("All" clears it)
    #[arg(long)]
    category: Option<String>,
    /// Blog page number
    #[arg(long)]
    page: Option<u32>,
    /// Write the view model here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
  /// Request an appointment through the contact form
  Book {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    service: Option<String>,
    /// Preferred date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    clinic: Option<String>,
    #[arg(long, default_value = "")]
    message: String,
  },
  /// Book a specific doctor
  BookDoctor {
    #[arg(long)]
    doctor_id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    message: Option<String>,
  },
  /// Print SEO metadata for a page key or treatment slug
  Seo { key: String },
}

fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

fn build_client(config: &ClinicConfig) -> Result<ContentClient> {
  let client_config = config.client_config(|key| std::env::var(key).ok())?;
  ContentClient::new(client_config).context("failed to create content client")
}

/// Saved filters live next to the config file, or in the working directory without one.
fn filter_store(config_path: Option<&Path>, cwd: &Path, config: &ClinicConfig) -> JsonFileStore {
  let base = config_path.and_then(Path::parent).unwrap_or(cwd);
  JsonFileStore::new(base.join(&config.blog.filters_file))
}

fn page_kind(
  page: PageArg,
  slug: Option<String>,
  blog_filters: impl FnOnce() -> clinic_content::FilterState,
  per_page: u32,
) -> Result<PageKind> {
  let required = |slug: Option<String>, what: &str| -> Result<String> {
    match slug {
      Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
      _ => bail!("--slug is required for the {what} page"),
    }
  };
  Ok(match page {
    PageArg::Home => PageKind::Home,
    PageArg::Doctors => PageKind::Doctors,
    PageArg::About => PageKind::About,
    PageArg::Navigation => PageKind::Navigation,
    PageArg::Contact => PageKind::Contact,
    PageArg::Blog => PageKind::Blog { filters: blog_filters(), per_page },
    PageArg::BlogDetail => PageKind::BlogDetail { slug: required(slug, "blog-detail")? },
    PageArg::Treatment => PageKind::Treatment { slug: required(slug, "treatment")? },
    PageArg::Popup => PageKind::Popup,
  })
}

fn doctor_id(raw: &str) -> RecordId {
  raw.trim().parse().map_or_else(|_| RecordId::Text(raw.trim().to_string()), RecordId::Num)
}

#[tokio::main]
async fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();
  let cwd = std::env::current_dir().context("failed to get cwd")?;
  let (config_path, config) = resolve_config(cli.config, &cwd)?;

  match cli.command {
    Command::Pull { target, slug, search, category, page, out } => {
      ui::banner("pull");
      let client = build_client(&config)?;
      let store = filter_store(config_path.as_deref(), &cwd, &config);
      let explicit_filters = search.is_some() || category.is_some() || page.is_some();
      let selector = slug.clone();

      let kind = page_kind(
        target,
        slug,
        || merge_filters(store.load(BLOG_SCOPE), search, category, page),
        config.blog.per_page,
      )?;
      if let PageKind::Blog { filters, .. } = &kind
        && explicit_filters
      {
        store.save(BLOG_SCOPE, filters);
      }

      let selector = matches!(target, PageArg::Contact).then_some(selector).flatten();
      let status = pull::pull_page(&client, &kind, selector.as_deref(), out.as_deref()).await?;
      if status == OverallStatus::FullFailure {
        bail!("no content could be loaded");
      }
    }
    Command::Book { name, phone, service, date, clinic, message } => {
      ui::banner("book");
      let client = build_client(&config)?;
      let form = AppointmentForm {
        name,
        phone,
        preferred_service: service,
        preferred_date: date,
        preferred_clinic: clinic,
        message,
      };
      if !book::book(&client, &form).await {
        bail!("appointment was not booked");
      }
    }
    Command::BookDoctor { doctor_id: id, name, phone, date, time, message } => {
      ui::banner("book-doctor");
      let client = build_client(&config)?;
      let form = DoctorAppointmentForm {
        doctor_id: Some(doctor_id(&id)),
        name,
        phone,
        date,
        preferred_time: time,
        message,
      };
      if !book::book(&client, &form).await {
        bail!("appointment was not booked");
      }
    }
    Command::Seo { key } => {
      let meta = config.seo.lookup(&key);
      let json = serde_json::to_string_pretty(&meta).context("failed to serialize SEO metadata")?;
      ui::raw(&json);
    }
  }
  Ok(())
}
