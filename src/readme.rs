//! Profile README generation.
//!
//! Repositories are fetched page by page, filtered and split by recent activity, rendered as
//! markdown tables and substituted into a template:
//!
//! - `{{ACTIVE_REPOS}}`: repos pushed within the recency window
//! - `{{INACTIVE_REPOS}}`: everything else, folded into `<details>`
//! - `{{FEATURED}}`: repos named in the overrides file, in that order
//! - `{{UPDATED_AT}}`: generation time as `YYYY-MM-DD HH:MM UTC`
//!
//! The overrides file may add further placeholders; the built-in ones always win.

pub mod github;
pub mod overrides;
pub mod repo;
pub mod table;
pub mod template;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::encode::process::ensure_parent_dir;
use crate::foundation::error::{BannerError, BannerResult};

pub use github::{API_BASE_URL, GitHubClient, PER_PAGE, RepoSource, list_all};
pub use overrides::Overrides;
pub use repo::{Partitioned, Repository, cutoff, partition, prepare};
pub use table::{render_featured, render_inactive, render_table};
pub use template::{Rendered, render_template};

pub const DEFAULT_MONTHS: u32 = 3;

pub fn format_updated_at(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Placeholder values for one README render.
pub fn placeholder_values(
    repos: Vec<Repository>,
    overrides: &Overrides,
    now: DateTime<Utc>,
    months: u32,
) -> BTreeMap<String, String> {
    let repos = prepare(repos, overrides);
    let featured = render_featured(&repos, &overrides.featured);
    let Partitioned { active, inactive } = partition(repos, cutoff(now, months));
    tracing::debug!(active = active.len(), inactive = inactive.len(), "partitioned repositories");

    let mut values = overrides.placeholders.clone();
    values.insert(template::ACTIVE_REPOS.to_string(), render_table(&active));
    values.insert(template::INACTIVE_REPOS.to_string(), render_inactive(&inactive));
    values.insert(template::FEATURED.to_string(), featured);
    values.insert(template::UPDATED_AT.to_string(), format_updated_at(now));
    values
}

/// Render the README from already-fetched repositories.
pub fn render_readme(
    template: &str,
    repos: Vec<Repository>,
    overrides: &Overrides,
    now: DateTime<Utc>,
    months: u32,
) -> String {
    render_template(template, &placeholder_values(repos, overrides, now, months)).text
}

#[derive(Clone, Debug)]
pub struct ReadmeJob {
    pub owner: String,
    pub template: PathBuf,
    pub out: PathBuf,
    /// Optional curated content; a missing file is not an error.
    pub overrides: Option<PathBuf>,
    /// Recency window for the active table, in calendar months.
    pub months: u32,
}

impl ReadmeJob {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            template: PathBuf::from("README.template.md"),
            out: PathBuf::from("README.md"),
            overrides: Some(PathBuf::from("README.overrides.json")),
            months: DEFAULT_MONTHS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadmeReport {
    pub out: PathBuf,
    /// Repositories returned by the source, before filtering.
    pub fetched: usize,
    /// Placeholders in the template that had no value.
    pub unknown_placeholders: Vec<String>,
}

/// Fetch, render and write the README described by `job`.
#[tracing::instrument(skip(job, source), fields(owner = %job.owner, out = %job.out.display()))]
pub fn update_readme(
    job: &ReadmeJob,
    source: &dyn RepoSource,
    now: DateTime<Utc>,
) -> BannerResult<ReadmeReport> {
    if job.owner.trim().is_empty() {
        return Err(BannerError::validation("owner must not be empty"));
    }
    let template = std::fs::read_to_string(&job.template)
        .with_context(|| format!("read template {}", job.template.display()))?;
    let overrides = job
        .overrides
        .as_deref()
        .map(Overrides::load_or_default)
        .unwrap_or_default();

    let repos = list_all(source, &job.owner)?;
    let fetched = repos.len();
    let rendered = render_template(&template, &placeholder_values(repos, &overrides, now, job.months));

    ensure_parent_dir(&job.out)?;
    std::fs::write(&job.out, &rendered.text)
        .with_context(|| format!("write {}", job.out.display()))?;
    tracing::info!(fetched, "README written");

    Ok(ReadmeReport {
        out: job.out.clone(),
        fetched,
        unknown_placeholders: rendered.unknown,
    })
}

#[cfg(test)]
#[path = "../tests/unit/readme/render.rs"]
mod tests;
