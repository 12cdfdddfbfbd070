use super::*;
use chrono::TimeZone;
use serde_json::json;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

fn repo(name: &str, pushed: Option<DateTime<Utc>>) -> Repository {
    Repository {
        name: name.to_string(),
        html_url: format!("https://github.com/o/{name}"),
        pushed_at: pushed,
        private: Some(false),
        ..Repository::default()
    }
}

#[test]
fn decoding_tolerates_nulls_and_garbage_timestamps() {
    let r: Repository = serde_json::from_value(json!({
        "name": "x",
        "html_url": null,
        "description": null,
        "stargazers_count": null,
        "pushed_at": "not a date",
        "topics": null,
        "private": false,
        "unknown_field": 1
    }))
    .unwrap();
    assert_eq!(r.name, "x");
    assert_eq!(r.html_url, "");
    assert_eq!(r.stargazers_count, 0);
    assert!(r.pushed_at.is_none());
    assert!(r.topics.is_empty());
    assert!(r.is_public());
}

#[test]
fn decoding_reads_api_timestamps() {
    let r: Repository = serde_json::from_value(json!({
        "name": "x",
        "pushed_at": "2026-07-19T12:30:00Z",
        "private": false,
        "stargazers_count": 7,
        "topics": ["rust", "gif"]
    }))
    .unwrap();
    assert_eq!(r.pushed_at, Some(at(2026, 7, 19, 12, 30, 0)));
    assert_eq!(r.topics, vec!["rust", "gif"]);
}

#[test]
fn missing_private_flag_is_not_public() {
    let r: Repository = serde_json::from_value(json!({ "name": "x" })).unwrap();
    assert!(!r.is_public());
}

#[test]
fn cutoff_subtracts_calendar_months() {
    assert_eq!(cutoff(at(2026, 10, 19, 8, 0, 0), 3), at(2026, 7, 19, 8, 0, 0));
    assert_eq!(cutoff(at(2026, 5, 31, 0, 0, 0), 3), at(2026, 2, 28, 0, 0, 0));
    assert_eq!(cutoff(at(2026, 2, 1, 0, 0, 0), 0), at(2026, 2, 1, 0, 0, 0));
}

#[test]
fn partition_boundary_is_inclusive() {
    let c = at(2026, 7, 19, 8, 0, 0);
    let repos = vec![
        repo("exact", Some(c)),
        repo("after", Some(c + chrono::Duration::seconds(1))),
        repo("before", Some(c - chrono::Duration::seconds(1))),
        repo("never", None),
    ];
    let p = partition(repos, c);
    let names = |v: &[Repository]| v.iter().map(|r| r.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&p.active), ["exact", "after"]);
    assert_eq!(names(&p.inactive), ["before", "never"]);
}

#[test]
fn prepare_filters_overrides_and_sorts() {
    let mut private = repo("secret", Some(at(2026, 9, 1, 0, 0, 0)));
    private.private = Some(true);
    let repos = vec![
        repo("old", Some(at(2025, 1, 1, 0, 0, 0))),
        repo("undated", None),
        private,
        repo("hidden", Some(at(2026, 9, 2, 0, 0, 0))),
        repo("new", Some(at(2026, 9, 3, 0, 0, 0))),
    ];
    let overrides = Overrides {
        hidden: vec!["hidden".to_string()],
        descriptions: [("old".to_string(), "curated".to_string())].into(),
        ..Overrides::default()
    };
    let out = prepare(repos, &overrides);
    let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["new", "old", "undated"]);
    assert_eq!(out[1].description.as_deref(), Some("curated"));
}
