//! `{{NAME}}` placeholder substitution.
//!
//! Names are one or more of `A-Z`, `0-9` and `_`. Substitution is a single left-to-right pass,
//! so inserted content is never scanned for further placeholders.

use std::collections::BTreeMap;

pub const ACTIVE_REPOS: &str = "ACTIVE_REPOS";
pub const INACTIVE_REPOS: &str = "INACTIVE_REPOS";
pub const UPDATED_AT: &str = "UPDATED_AT";
pub const FEATURED: &str = "FEATURED";

pub fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Name of the placeholder token starting at the beginning of `s`, if there is one.
fn token_at(s: &str) -> Option<&str> {
    let rest = s.strip_prefix("{{")?;
    let end = rest.find("}}")?;
    let name = &rest[..end];
    is_placeholder_name(name).then_some(name)
}

/// Outcome of [`render_template`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholders that had no value and were removed.
    pub unknown: Vec<String>,
}

/// Replace every `{{NAME}}` with its value. Unknown names are removed and reported.
pub fn render_template(template: &str, values: &BTreeMap<String, String>) -> Rendered {
    let mut text = String::with_capacity(template.len());
    let mut unknown: Vec<String> = Vec::new();
    let mut i = 0;
    while let Some(off) = template[i..].find("{{") {
        let at = i + off;
        text.push_str(&template[i..at]);
        match token_at(&template[at..]) {
            Some(name) => {
                match values.get(name) {
                    Some(v) => text.push_str(v),
                    None => {
                        if !unknown.iter().any(|n| n == name) {
                            unknown.push(name.to_string());
                        }
                    }
                }
                i = at + name.len() + 4;
            }
            None => {
                text.push('{');
                i = at + 1;
            }
        }
    }
    text.push_str(&template[i..]);
    for name in &unknown {
        tracing::warn!(placeholder = %name, "template placeholder has no value; removed");
    }
    Rendered { text, unknown }
}

#[cfg(test)]
#[path = "../../tests/unit/readme/template.rs"]
mod tests;
