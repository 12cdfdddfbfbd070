//! Markdown tables for repository listings.

use crate::readme::repo::Repository;

pub const EMPTY_TABLE: &str = "_No repos found._";
pub const MAX_TOPICS: usize = 6;

const HEADER: &str = "| Repo | What it is | Lang | Stars | Last push | Topics |";
const ALIGN: &str = "| --- | --- | --- | ---: | --- | --- |";

/// Collapse to one trimmed line and escape pipes so the cell cannot break the row.
fn cell(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .replace('|', "\\|")
}

pub fn format_row(repo: &Repository) -> String {
    let desc = cell(repo.description.as_deref().unwrap_or_default());
    let lang = cell(repo.language.as_deref().unwrap_or_default());
    let pushed = repo
        .pushed_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let topics = repo
        .topics
        .iter()
        .take(MAX_TOPICS)
        .map(|t| format!("`{t}`"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "| [`{name}`]({url}) | {desc} | {lang} | ⭐ {stars} | {pushed} | {topics} |",
        name = repo.name,
        url = repo.html_url,
        stars = repo.stargazers_count,
    )
}

pub fn render_table(repos: &[Repository]) -> String {
    if repos.is_empty() {
        return EMPTY_TABLE.to_string();
    }
    let mut lines = Vec::with_capacity(repos.len() + 2);
    lines.push(HEADER.to_string());
    lines.push(ALIGN.to_string());
    lines.extend(repos.iter().map(format_row));
    lines.join("\n")
}

/// The inactive table, folded away behind a `<details>` toggle.
pub fn render_inactive(repos: &[Repository]) -> String {
    format!(
        "<details>\n<summary>Show inactive repos</summary>\n\n{}\n</details>",
        render_table(repos)
    )
}

/// Table of the named repos in the given order. Names match case-insensitively; names with no
/// matching repo are skipped with a warning.
pub fn render_featured(repos: &[Repository], names: &[String]) -> String {
    let picked: Vec<Repository> = names
        .iter()
        .filter_map(|name| {
            let found = repos.iter().find(|r| r.name.eq_ignore_ascii_case(name));
            if found.is_none() {
                tracing::warn!(repo = %name, "featured repo not found among public repos");
            }
            found.cloned()
        })
        .collect();
    render_table(&picked)
}

#[cfg(test)]
#[path = "../../tests/unit/readme/table.rs"]
mod tests;
