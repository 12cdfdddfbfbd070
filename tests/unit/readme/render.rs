use super::*;
use std::cell::Cell;

use chrono::TimeZone;
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 0).unwrap()
}

fn repos() -> Vec<Repository> {
    serde_json::from_value(json!([
        { "name": "fresh", "html_url": "https://github.com/o/fresh", "private": false,
          "pushed_at": "2026-10-01T00:00:00Z", "description": "new thing", "topics": ["rust"] },
        { "name": "stale", "html_url": "https://github.com/o/stale", "private": false,
          "pushed_at": "2024-01-01T00:00:00Z" },
        { "name": "secret", "html_url": "https://github.com/o/secret", "private": true,
          "pushed_at": "2026-10-02T00:00:00Z" }
    ]))
    .unwrap()
}

const TEMPLATE: &str = "# Hi\n\n{{FEATURED}}\n\n## Active\n{{ACTIVE_REPOS}}\n\n\
                        ## Older\n{{INACTIVE_REPOS}}\n\n{{NOTE}}\n_Updated {{UPDATED_AT}}_\n\
                        {{ACTIVE_REPOS}}\n";

#[test]
fn every_placeholder_is_substituted() {
    let overrides = Overrides {
        featured: vec!["stale".to_string()],
        placeholders: [("NOTE".to_string(), "hello".to_string())].into(),
        ..Overrides::default()
    };
    let out = render_readme(TEMPLATE, repos(), &overrides, now(), DEFAULT_MONTHS);

    assert!(!out.contains("{{"), "{out}");
    assert!(out.contains("_Updated 2026-10-19 08:05 UTC_"));
    assert!(out.contains("hello"));
    assert_eq!(out.matches("[`fresh`]").count(), 2);
    assert!(out.contains("<summary>Show inactive repos</summary>"));
    assert!(!out.contains("secret"));

    let featured = out.find("[`stale`]").unwrap();
    let active = out.find("## Active").unwrap();
    assert!(featured < active);
}

#[test]
fn builtin_placeholders_beat_overrides() {
    let overrides = Overrides {
        placeholders: [("UPDATED_AT".to_string(), "never".to_string())].into(),
        ..Overrides::default()
    };
    let out = render_readme("{{UPDATED_AT}}", vec![], &overrides, now(), 3);
    assert_eq!(out, "2026-10-19 08:05 UTC");
}

#[test]
fn empty_account_renders_notes() {
    let out = render_readme(
        "{{ACTIVE_REPOS}}|{{FEATURED}}",
        vec![],
        &Overrides::default(),
        now(),
        3,
    );
    assert_eq!(out, "_No repos found._|_No repos found._");
}

struct OnePage {
    calls: Cell<u32>,
}

impl RepoSource for OnePage {
    fn fetch_page(&self, owner: &str, page: u32, _: u32) -> BannerResult<Vec<Repository>> {
        assert_eq!(owner, "o");
        self.calls.set(self.calls.get() + 1);
        Ok(if page == 1 { repos() } else { vec![] })
    }
}

#[test]
fn update_readme_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("README.template.md");
    std::fs::write(&template, "{{ACTIVE_REPOS}}\n{{MYSTERY}}\n").unwrap();
    let overrides = dir.path().join("README.overrides.json");
    std::fs::write(&overrides, "{ broken").unwrap();

    let job = ReadmeJob {
        template,
        out: dir.path().join("out/README.md"),
        overrides: Some(overrides),
        ..ReadmeJob::new("o")
    };
    let src = OnePage { calls: Cell::new(0) };
    let report = update_readme(&job, &src, now()).unwrap();

    assert_eq!(src.calls.get(), 1);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.unknown_placeholders, ["MYSTERY"]);
    let text = std::fs::read_to_string(&report.out).unwrap();
    assert!(text.starts_with("| Repo |"));
    assert!(text.ends_with("\n\n"));
    assert!(!text.contains("MYSTERY"));
}

#[test]
fn missing_template_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let job = ReadmeJob {
        template: dir.path().join("nope.md"),
        out: dir.path().join("README.md"),
        overrides: None,
        ..ReadmeJob::new("o")
    };
    let src = OnePage { calls: Cell::new(0) };
    assert!(update_readme(&job, &src, now()).is_err());
    assert_eq!(src.calls.get(), 0);
    assert!(!job.out.exists());
}

#[test]
fn blank_owner_is_rejected() {
    let src = OnePage { calls: Cell::new(0) };
    let err = update_readme(&ReadmeJob::new("  "), &src, now()).unwrap_err();
    assert!(matches!(err, BannerError::Validation(_)));
}
