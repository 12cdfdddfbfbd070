use serde_json::json;

use super::*;
use crate::params::model::Labels;

#[test]
fn empty_payload_yields_hint_preset() {
    let p = resolve(Some(Preset::Military), &json!({}));
    assert_eq!(p, Preset::Military.defaults());
}

#[test]
fn null_payload_yields_greco() {
    assert_eq!(resolve(None, &Value::Null), Preset::Greco.defaults());
}

#[test]
fn payload_preset_wins_over_hint() {
    let p = resolve(Some(Preset::Greco), &json!({ "preset": "hybrid" }));
    assert_eq!(p.preset, Preset::Hybrid);
    assert_eq!(p.cam, Preset::Hybrid.defaults().cam);
}

#[test]
fn unknown_preset_falls_back_to_hint() {
    let p = resolve(Some(Preset::Military), &json!({ "preset": "baroque" }));
    assert_eq!(p.preset, Preset::Military);
}

#[test]
fn partial_override_keeps_sibling_defaults() {
    let p = resolve(None, &json!({ "cam": { "r": 6.6 }, "text": { "faceBias": 0.2 } }));
    let d = Preset::Greco.defaults();
    assert_eq!(p.cam.r, 6.6);
    assert_eq!(p.cam.sweep, d.cam.sweep);
    assert_eq!(p.text.face_bias, 0.2);
    assert_eq!(p.text.pull, d.text.pull);
    assert_eq!(p.halo, d.halo);
}

#[test]
fn wrong_type_leaf_falls_back_to_default() {
    let p = resolve(
        Some(Preset::Hybrid),
        &json!({ "cam": { "r": "far", "lift": 0.7 } }),
    );
    let d = Preset::Hybrid.defaults();
    assert_eq!(p.cam.r, d.cam.r);
    assert_eq!(p.cam.lift, 0.7);
}

#[test]
fn out_of_range_leaf_falls_back_to_default() {
    let p = resolve(None, &json!({ "cam": { "fov": 500.0 }, "core": { "size": -1.0 } }));
    let d = Preset::Greco.defaults();
    assert_eq!(p.cam.fov, d.cam.fov);
    assert_eq!(p.core.size, d.core.size);
}

#[test]
fn section_replaced_by_scalar_is_ignored() {
    let p = resolve(None, &json!({ "halo": 3 }));
    assert_eq!(p.halo, Preset::Greco.defaults().halo);
}

#[test]
fn non_object_payload_yields_defaults() {
    assert_eq!(resolve(None, &json!([1, 2, 3])), Preset::Greco.defaults());
    assert_eq!(resolve(None, &json!("greco")), Preset::Greco.defaults());
}

#[test]
fn labels_override() {
    let p = resolve(None, &json!({ "labels": { "title": "Ada Lovelace" } }));
    assert_eq!(p.labels.title, "Ada Lovelace");
    assert_eq!(p.labels.subtitle, Labels::default().subtitle);
}

#[test]
fn inline_is_merged_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banner.params.json");
    std::fs::write(&path, r#"{ "preset": "military", "cam": { "r": 6.8, "lift": 0.62 } }"#)
        .unwrap();

    let source = ParamsSource {
        file: Some(path),
        inline: Some(r#"{ "cam": { "r": 7.0 } }"#.to_string()),
    };
    let p = resolve_source(None, &source).unwrap();
    assert_eq!(p.preset, Preset::Military);
    assert_eq!(p.cam.r, 7.0);
    assert_eq!(p.cam.lift, 0.62);
}

#[test]
fn named_file_must_exist_and_parse() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ParamsSource::file(dir.path().join("missing.json")).load().is_err());

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(ParamsSource::file(bad).load().is_err());
    assert!(ParamsSource::inline("{").load().is_err());
}

#[test]
fn persisted_params_round_trip_through_resolve() {
    let mut p = Preset::Hybrid.defaults();
    p.cam.r = 6.7;
    p.labels.tagline = "example.dev".to_string();
    let json = p.to_pretty_json().unwrap();
    assert!(json.ends_with('\n'));
    assert!(json.contains("\"faceBias\""));

    let back = resolve(None, &serde_json::from_str(&json).unwrap());
    assert_eq!(back, p);
}

#[test]
fn deep_merge_replaces_scalars_and_merges_objects() {
    let mut base = json!({ "a": { "b": 1, "c": 2 }, "d": 3 });
    deep_merge(&mut base, &json!({ "a": { "b": 10 }, "d": { "e": 1 } }));
    assert_eq!(base, json!({ "a": { "b": 10, "c": 2 }, "d": { "e": 1 } }));
}
