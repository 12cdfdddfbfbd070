#![forbid(unsafe_code)]
//! Animated profile banner renderer and GitHub profile README generator.
//!
//! The banner side resolves scene parameters, animates a small 3D scene over one seamless loop,
//! rasterizes it on the CPU and encodes stills, contact sheets or a looping GIF (via `ffmpeg`).
//! The README side fetches an owner's repositories and fills a markdown template with tables.

pub mod encode;
pub mod foundation;
pub mod gallery;
pub mod iterate;
pub mod params;
pub mod pipeline;
pub mod readme;
pub mod render;
pub mod scene;
pub mod score;

pub use foundation::core::{Canvas, Rgba8};
pub use foundation::error::{BannerError, BannerResult};
pub use iterate::{IterateOpts, IterateReport, Variant, builtin_variants, run_iterate};
pub use params::{ParamsSource, Preset, SceneParams, resolve, resolve_source};
pub use pipeline::{DEFAULT_STILL_T, Mode, RenderJob, RenderReport, run};
pub use readme::{GitHubClient, Overrides, ReadmeJob, ReadmeReport, RepoSource, update_readme};
pub use render::{CpuRenderer, FrameRGBA, Quality, RenderOpts};
