//! Render a fixed set of parameter variants, rank them and promote the best to the banner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Value, json};

use crate::encode::process::{DEFAULT_FFMPEG_TIMEOUT, ensure_parent_dir};
use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};
use crate::gallery::{GalleryItem, render_gallery};
use crate::params::resolve;
use crate::pipeline::{DEFAULT_STILL_T, Mode, RenderJob, params_path_for, run};
use crate::render::backend::Quality;
use crate::score::score_png;

/// A named parameter payload, merged over its preset like any user override.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub slug: String,
    pub params: Value,
}

fn variant(preset: &str, name: &str, mut patch: Value) -> Variant {
    if let Value::Object(map) = &mut patch {
        map.insert("preset".to_string(), Value::String(preset.to_string()));
    }
    Variant {
        slug: format!("{preset}-{name}"),
        params: patch,
    }
}

/// Three styles, each with a tight and a wide camera flight.
pub fn builtin_variants() -> Vec<Variant> {
    vec![
        variant("greco", "tight", json!({
            "cam": { "r": 6.0, "sweep": 0.62, "lift": 0.58, "bob": 0.06, "roll": 0.012 },
            "halo": { "x": -0.38, "y": 0.20, "rx": 1.00, "ry": 0.20, "spin": 0.09, "wobble": 0.018 },
            "text": { "pull": 1.45, "lift": 0.12, "faceBias": 0.05, "size": 0.50, "depth": 0.105 },
            "core": { "x": 3.2, "y": 0.86, "z": -2.6, "size": 0.56 }
        })),
        variant("greco", "wide", json!({
            "cam": { "r": 6.6, "sweep": 0.74, "lift": 0.62, "bob": 0.07, "roll": 0.014 },
            "halo": { "x": -0.30, "y": 0.18, "rx": 0.96, "ry": 0.24, "spin": 0.10, "wobble": 0.020 },
            "text": { "pull": 1.55, "lift": 0.12, "faceBias": 0.05, "size": 0.50, "depth": 0.105 },
            "core": { "x": 3.4, "y": 0.92, "z": -2.8, "size": 0.54 }
        })),
        variant("military", "tight", json!({
            "cam": { "r": 6.1, "sweep": 0.58, "lift": 0.56, "bob": 0.06, "roll": 0.012 },
            "halo": { "x": -0.34, "y": 0.19, "rx": 1.05, "ry": 0.12, "spin": 0.12, "wobble": 0.018 },
            "text": { "pull": 1.50, "lift": 0.12, "faceBias": 0.06, "size": 0.48, "depth": 0.110 },
            "core": { "x": 3.6, "y": 0.98, "z": -3.1, "size": 0.50 }
        })),
        variant("military", "wide", json!({
            "cam": { "r": 6.8, "sweep": 0.70, "lift": 0.62, "bob": 0.07, "roll": 0.014 },
            "halo": { "x": -0.26, "y": 0.17, "rx": 1.02, "ry": 0.10, "spin": 0.12, "wobble": 0.020 },
            "text": { "pull": 1.60, "lift": 0.12, "faceBias": 0.06, "size": 0.48, "depth": 0.110 },
            "core": { "x": 3.7, "y": 1.00, "z": -3.2, "size": 0.48 }
        })),
        variant("hybrid", "tight", json!({
            "cam": { "r": 6.2, "sweep": 0.62, "lift": 0.58, "bob": 0.06, "roll": 0.012 },
            "halo": { "x": -0.34, "y": 0.19, "rx": 1.02, "ry": 0.16, "spin": 0.10, "wobble": 0.018 },
            "text": { "pull": 1.52, "lift": 0.12, "faceBias": 0.05, "size": 0.49, "depth": 0.108 },
            "core": { "x": 3.5, "y": 0.95, "z": -3.0, "size": 0.52 }
        })),
        variant("hybrid", "wide", json!({
            "cam": { "r": 6.7, "sweep": 0.72, "lift": 0.62, "bob": 0.07, "roll": 0.014 },
            "halo": { "x": -0.28, "y": 0.18, "rx": 0.98, "ry": 0.18, "spin": 0.11, "wobble": 0.020 },
            "text": { "pull": 1.62, "lift": 0.12, "faceBias": 0.05, "size": 0.49, "depth": 0.108 },
            "core": { "x": 3.6, "y": 0.98, "z": -3.1, "size": 0.50 }
        })),
    ]
}

#[derive(Clone, Debug)]
pub struct IterateOpts {
    /// Gallery root; previews land in `<out_dir>/previews`.
    pub out_dir: PathBuf,
    /// Final banner path. `None` skips promoting the winner.
    pub banner: Option<PathBuf>,
    /// Render a small looping GIF per variant.
    pub preview_gifs: bool,
    pub variants: Vec<Variant>,
    /// Size of stills and preview GIFs.
    pub preview_canvas: Canvas,
    pub still_canvas: Canvas,
    pub timeout: Duration,
    pub font: Option<PathBuf>,
}

impl Default for IterateOpts {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("tmp/banner-iterate"),
            banner: Some(PathBuf::from("assets/banner.gif")),
            preview_gifs: true,
            variants: builtin_variants(),
            preview_canvas: Canvas {
                width: 800,
                height: 200,
            },
            still_canvas: Canvas::BANNER,
            timeout: DEFAULT_FFMPEG_TIMEOUT,
            font: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct IterateReport {
    pub gallery: PathBuf,
    /// Items sorted best first.
    pub items: Vec<GalleryItem>,
    pub best: String,
    pub banner: Option<PathBuf>,
    pub params_path: Option<PathBuf>,
}

/// Render, score and rank every variant, then write the gallery and promote the best one.
#[tracing::instrument(skip(opts), fields(out_dir = %opts.out_dir.display(), variants = opts.variants.len()))]
pub fn run_iterate(opts: &IterateOpts) -> BannerResult<IterateReport> {
    if opts.variants.is_empty() {
        return Err(BannerError::validation("no variants to iterate"));
    }
    let previews = opts.out_dir.join("previews");
    std::fs::create_dir_all(&previews)?;

    let mut items = Vec::with_capacity(opts.variants.len());
    for v in &opts.variants {
        let params = resolve(None, &v.params);

        let still = previews.join(format!("{}.still.png", v.slug));
        let mut job = RenderJob::new(Mode::Still { t: DEFAULT_STILL_T }, &still, params.clone());
        job.canvas = opts.still_canvas;
        job.scale = 1;
        job.quality = Quality::Preview;
        job.font = opts.font.clone();
        run(&job)?;

        if opts.preview_gifs {
            let mut job = RenderJob::new(Mode::Gif, previews.join(format!("{}.gif", v.slug)), params);
            job.canvas = opts.preview_canvas;
            job.scale = 1;
            job.quality = Quality::Preview;
            job.timeout = opts.timeout;
            job.font = opts.font.clone();
            run(&job)?;
        }

        let (score, stats) = score_png(&still)?;
        tracing::info!(slug = %v.slug, score, "variant scored");
        items.push(GalleryItem {
            slug: v.slug.clone(),
            params: v.params.clone(),
            score,
            stats: Some(stats),
            has_gif: opts.preview_gifs,
        });
    }

    rank(&mut items);
    let best = &items[0];

    let gallery = opts.out_dir.join("index.html");
    std::fs::write(&gallery, render_gallery("Banner Iteration Gallery", &items))?;

    let (banner, params_path) = match &opts.banner {
        Some(path) => {
            let params_path = promote(best, path, opts)?;
            (Some(path.clone()), Some(params_path))
        }
        None => (None, None),
    };

    tracing::info!(gallery = %gallery.display(), best = %best.slug, "iteration finished");
    Ok(IterateReport {
        gallery,
        best: best.slug.clone(),
        items,
        banner,
        params_path,
    })
}

/// Best score first. The sort is stable, so ties keep variant order.
pub fn rank(items: &mut [GalleryItem]) {
    items.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Render the winner as the full-size banner and persist its payload beside it.
fn promote(best: &GalleryItem, banner: &Path, opts: &IterateOpts) -> BannerResult<PathBuf> {
    let mut job = RenderJob::new(Mode::Gif, banner, resolve(None, &best.params));
    job.timeout = opts.timeout;
    job.font = opts.font.clone();
    run(&job)?;

    let path = params_path_for(banner);
    ensure_parent_dir(&path)?;
    let mut text = serde_json::to_string_pretty(&best.params)?;
    text.push('\n');
    std::fs::write(&path, text)?;
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/iterate.rs"]
mod tests;
