use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::error::BannerResult;
use crate::readme::template::is_placeholder_name;

/// Hand-curated README content, read from an optional JSON file.
///
/// Every field is optional. A missing file means "no overrides"; a malformed one is reported
/// and ignored, so the README still renders from API data alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Repo names listed under `{{FEATURED}}`, in this order.
    pub featured: Vec<String>,
    /// Repo names never shown.
    pub hidden: Vec<String>,
    /// Replacement descriptions by repo name.
    pub descriptions: BTreeMap<String, String>,
    /// Extra `{{NAME}}` substitutions.
    pub placeholders: BTreeMap<String, String>,
}

impl Overrides {
    pub fn parse(text: &str) -> BannerResult<Self> {
        let mut o: Overrides = serde_json::from_str(text)?;
        o.placeholders.retain(|name, _| {
            let ok = is_placeholder_name(name);
            if !ok {
                tracing::warn!(name, "ignoring placeholder override with an invalid name");
            }
            ok
        });
        Ok(o)
    }

    /// Load overrides from `path`, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no overrides file");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable overrides; using defaults");
                return Self::default();
            }
        };
        match Self::parse(&text) {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed overrides; using defaults");
                Self::default()
            }
        }
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.iter().any(|h| h.eq_ignore_ascii_case(name))
    }
}
