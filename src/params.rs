//! Scene parameters: named presets merged with caller overrides.

pub mod model;
pub mod preset;
pub mod resolve;

pub use model::{CamParams, CoreParams, HaloParams, HudParams, Labels, SceneParams, TextParams};
pub use preset::{Palette, Preset};
pub use resolve::{ParamsSource, deep_merge, resolve, resolve_source};
