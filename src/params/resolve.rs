use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::{Map, Value};

use crate::foundation::error::{BannerError, BannerResult};
use crate::params::model::SceneParams;
use crate::params::preset::Preset;

/// Where a scene-parameter payload comes from. File first, inline merged on top.
#[derive(Clone, Debug, Default)]
pub struct ParamsSource {
    pub file: Option<PathBuf>,
    pub inline: Option<String>,
}

impl ParamsSource {
    pub fn inline(json: impl Into<String>) -> Self {
        Self {
            file: None,
            inline: Some(json.into()),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            inline: None,
        }
    }

    /// Read and combine the raw override payloads.
    ///
    /// A file or inline string the caller explicitly named must parse as JSON; content-level
    /// problems inside a parsed payload are handled leniently by [`resolve`].
    pub fn load(&self) -> BannerResult<Value> {
        let mut combined = Value::Object(Map::new());
        if let Some(path) = &self.file {
            let v = read_json_file(path)?;
            deep_merge(&mut combined, &v);
        }
        if let Some(inline) = &self.inline {
            let v: Value = serde_json::from_str(inline)
                .map_err(|e| BannerError::params(format!("inline params are not valid JSON: {e}")))?;
            deep_merge(&mut combined, &v);
        }
        Ok(combined)
    }
}

fn read_json_file(path: &Path) -> BannerResult<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read params file '{}'", path.display()))?;
    serde_json::from_str(&text).map_err(|e| {
        BannerError::params(format!("params file '{}' is not valid JSON: {e}", path.display()))
    })
}

/// Load a source and resolve it against `hint`.
pub fn resolve_source(hint: Option<Preset>, source: &ParamsSource) -> BannerResult<SceneParams> {
    let overrides = source.load()?;
    Ok(resolve(hint, &overrides))
}

/// Merge an override payload over a preset.
///
/// The preset is taken from the payload's `preset` field, then `hint`, then greco. Each leaf
/// of the payload is applied on its own; a leaf that fails to deserialize or breaks
/// [`SceneParams::validate`] is dropped with a warning so the preset value survives. A
/// payload that is not a JSON object yields the preset defaults.
#[tracing::instrument(level = "debug", skip(overrides))]
pub fn resolve(hint: Option<Preset>, overrides: &Value) -> SceneParams {
    let preset = preset_from_payload(overrides)
        .or(hint)
        .unwrap_or_default();
    let defaults = preset.defaults();

    let Value::Object(map) = overrides else {
        if !overrides.is_null() {
            tracing::warn!(payload = %overrides, "scene params override is not an object; using preset defaults");
        }
        return defaults;
    };

    let mut merged = match serde_json::to_value(&defaults) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize preset defaults");
            return defaults;
        }
    };

    let mut path = Vec::new();
    for (key, value) in map {
        if key == "preset" {
            continue;
        }
        path.push(key.clone());
        apply_checked(&mut merged, &mut path, value);
        path.pop();
    }

    serde_json::from_value(merged).unwrap_or(defaults)
}

fn preset_from_payload(overrides: &Value) -> Option<Preset> {
    let raw = overrides.get("preset")?;
    match raw.as_str().map(str::parse::<Preset>) {
        Some(Ok(p)) => Some(p),
        _ => {
            tracing::warn!(preset = %raw, "unknown preset in scene params; ignoring");
            None
        }
    }
}

fn apply_checked(merged: &mut Value, path: &mut Vec<String>, value: &Value) {
    if let Value::Object(children) = value
        && value_at(merged, path).is_some_and(Value::is_object)
    {
        for (key, child) in children {
            path.push(key.clone());
            apply_checked(merged, path, child);
            path.pop();
        }
        return;
    }

    let mut candidate = merged.clone();
    set_at(&mut candidate, path, value.clone());
    match check(&candidate) {
        Ok(()) => *merged = candidate,
        Err(e) => tracing::warn!(
            field = %path.join("."),
            value = %value,
            error = %e,
            "ignoring invalid scene params override"
        ),
    }
}

fn check(candidate: &Value) -> BannerResult<()> {
    let params: SceneParams = serde_json::from_value(candidate.clone())?;
    params.validate()
}

fn value_at<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(root, |v, key| v.get(key))
}

fn set_at(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };
    let mut cur = root;
    for key in parents {
        if !cur.is_object() {
            *cur = Value::Object(Map::new());
        }
        let Value::Object(map) = cur else {
            return;
        };
        cur = map
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !cur.is_object() {
        *cur = Value::Object(Map::new());
    }
    if let Value::Object(map) = cur {
        map.insert(last.clone(), value);
    }
}

/// Recursive object merge: objects merge key by key, anything else replaces.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (k, v) in patch_map {
                match base_map.get_mut(k) {
                    Some(existing) => deep_merge(existing, v),
                    None => {
                        base_map.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/resolve.rs"]
mod tests;
