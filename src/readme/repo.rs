use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Deserializer};

use crate::readme::overrides::Overrides;

/// Repository record as returned by the GitHub REST API.
///
/// Decoding is tolerant: missing or `null` fields take their defaults and an unparseable
/// `pushed_at` is treated as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub stargazers_count: u64,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    /// `None` when the API omitted the flag; such repos are not treated as public.
    pub private: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub fork: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub archived: bool,
}

impl Repository {
    pub fn is_public(&self) -> bool {
        self.private == Some(false)
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Repositories split by recent activity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partitioned {
    pub active: Vec<Repository>,
    pub inactive: Vec<Repository>,
}

/// `now` minus `months` calendar months. Day-of-month overflow clamps to the month's last day.
pub fn cutoff(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keep public, non-hidden repos, apply description overrides and sort newest push first.
/// Repos without a push timestamp sort last.
pub fn prepare(repos: Vec<Repository>, overrides: &Overrides) -> Vec<Repository> {
    let mut kept: Vec<Repository> = repos
        .into_iter()
        .filter(Repository::is_public)
        .filter(|r| !overrides.is_hidden(&r.name))
        .map(|mut r| {
            if let Some(desc) = overrides.descriptions.get(&r.name) {
                r.description = Some(desc.clone());
            }
            r
        })
        .collect();
    kept.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    kept
}

/// Active iff pushed at or after `cutoff`. A missing timestamp is inactive. Order is preserved.
pub fn partition(repos: Vec<Repository>, cutoff: DateTime<Utc>) -> Partitioned {
    let (active, inactive) = repos
        .into_iter()
        .partition(|r| r.pushed_at.is_some_and(|t| t >= cutoff));
    Partitioned { active, inactive }
}

#[cfg(test)]
#[path = "../../tests/unit/readme/repo.rs"]
mod tests;
