use super::*;
use chrono::{TimeZone, Utc};

fn repo(name: &str) -> Repository {
    Repository {
        name: name.to_string(),
        html_url: format!("https://github.com/o/{name}"),
        private: Some(false),
        ..Repository::default()
    }
}

#[test]
fn row_has_every_column() {
    let mut r = repo("bannerkit");
    r.description = Some("  Animated\r\nprofile | banner \n".to_string());
    r.language = Some("Rust".to_string());
    r.stargazers_count = 42;
    r.pushed_at = Some(Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 0).unwrap());
    r.topics = ["a", "b", "c", "d", "e", "f", "g"].map(String::from).to_vec();
    assert_eq!(
        format_row(&r),
        "| [`bannerkit`](https://github.com/o/bannerkit) | Animated profile \\| banner | Rust \
         | ⭐ 42 | 2026-03-09 | `a` `b` `c` `d` `e` `f` |"
    );
}

#[test]
fn missing_fields_leave_cells_empty() {
    assert_eq!(
        format_row(&repo("bare")),
        "| [`bare`](https://github.com/o/bare) |  |  | ⭐ 0 |  |  |"
    );
}

#[test]
fn table_has_header_and_alignment() {
    let t = render_table(&[repo("a"), repo("b")]);
    let lines: Vec<&str> = t.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "| Repo | What it is | Lang | Stars | Last push | Topics |");
    assert_eq!(lines[1], "| --- | --- | --- | ---: | --- | --- |");
    assert!(lines[2].starts_with("| [`a`]"));
    assert!(lines[3].starts_with("| [`b`]"));
}

#[test]
fn empty_table_is_a_note() {
    assert_eq!(render_table(&[]), "_No repos found._");
    assert_eq!(
        render_inactive(&[]),
        "<details>\n<summary>Show inactive repos</summary>\n\n_No repos found._\n</details>"
    );
}

#[test]
fn featured_follows_the_requested_order() {
    let repos = [repo("one"), repo("two"), repo("three")];
    let names = ["Three", "missing", "one"].map(String::from);
    let t = render_featured(&repos, &names);
    let rows: Vec<&str> = t.lines().skip(2).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("| [`three`]"));
    assert!(rows[1].starts_with("| [`one`]"));
    assert_eq!(render_featured(&repos, &[]), EMPTY_TABLE);
}
