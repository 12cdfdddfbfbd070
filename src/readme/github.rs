//! Paginated repository listing from the GitHub REST API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

use crate::foundation::error::{BannerError, BannerResult};
use crate::readme::repo::Repository;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;
const USER_AGENT: &str = concat!("bannerkit/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of an owner's repositories. Pages are numbered from 1.
pub trait RepoSource {
    fn fetch_page(&self, owner: &str, page: u32, per_page: u32) -> BannerResult<Vec<Repository>>;
}

pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    /// `token` raises rate limits and exposes topics; anonymous access works without it.
    pub fn new(api_base: impl Into<String>, token: Option<&str>) -> BannerResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|_| BannerError::validation("token contains invalid header characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self, owner: &str, page: u32, per_page: u32) -> String {
        format!(
            "{}/users/{owner}/repos?per_page={per_page}&type=owner&sort=pushed&page={page}",
            self.api_base
        )
    }
}

impl RepoSource for GitHubClient {
    fn fetch_page(&self, owner: &str, page: u32, per_page: u32) -> BannerResult<Vec<Repository>> {
        let url = self.page_url(owner, page, per_page);
        tracing::debug!(%url, "fetching repositories");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BannerError::Api {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body: serde_json::Value = response.json()?;
        Ok(repos_from_page(body))
    }
}

/// Decode a page body. A non-array body is an empty page; entries that fail to decode are skipped.
pub fn repos_from_page(body: serde_json::Value) -> Vec<Repository> {
    let serde_json::Value::Array(items) = body else {
        tracing::warn!("repository page is not an array; treating it as empty");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Repository>(item) {
            Ok(repo) => Some(repo),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable repository entry");
                None
            }
        })
        .collect()
}

/// Fetch every page, stopping after the first empty or short one.
#[tracing::instrument(skip(source))]
pub fn list_all(source: &dyn RepoSource, owner: &str) -> BannerResult<Vec<Repository>> {
    let mut all = Vec::new();
    let mut page = 1;
    loop {
        let batch = source.fetch_page(owner, page, PER_PAGE)?;
        let n = batch.len();
        all.extend(batch);
        if n < PER_PAGE as usize {
            break;
        }
        page += 1;
    }
    tracing::info!(repos = all.len(), pages = page, "fetched repositories");
    Ok(all)
}

#[cfg(test)]
#[path = "../../tests/unit/readme/github.rs"]
mod tests;
