//! Brightness heuristic used to rank banner variants.
//!
//! Only the title zone is measured, since that is where legibility matters.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{BannerError, BannerResult};
use crate::render::backend::FrameRGBA;

/// Midtone the average luma should sit near.
pub const TARGET_LUMA: f64 = 0.42;

/// Title zone as fractions of the frame: x, y, width, height.
pub const TITLE_ZONE: (f64, f64, f64, f64) = (0.10, 0.18, 0.78, 0.62);

/// Luma statistics as fractions of 255, on the limited (studio) range: black reads `16/255` and
/// white `235/255`, the way `ffmpeg`'s `signalstats` reports an RGB source.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LumaStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// BT.601 limited-range luma of the title zone of an opaque frame.
pub fn luma_stats(frame: &FrameRGBA) -> BannerResult<LumaStats> {
    let (fx, fy, fw, fh) = TITLE_ZONE;
    let (w, h) = (f64::from(frame.width), f64::from(frame.height));
    let x0 = (w * fx).floor() as u32;
    let y0 = (h * fy).floor() as u32;
    let cw = ((w * fw).floor() as u32).min(frame.width - x0.min(frame.width));
    let ch = ((h * fh).floor() as u32).min(frame.height - y0.min(frame.height));
    if cw == 0 || ch == 0 {
        return Err(BannerError::validation(format!(
            "frame {}x{} is too small to score",
            frame.width, frame.height
        )));
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for y in y0..y0 + ch {
        for x in x0..x0 + cw {
            let [r, g, b, _] = frame.pixel(x, y);
            let l = limited_range(
                (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0,
            );
            min = min.min(l);
            max = max.max(l);
            sum += l;
        }
    }
    Ok(LumaStats {
        min,
        max,
        avg: sum / f64::from(cw * ch),
    })
}

/// Map full-range luma in `[0, 1]` onto `[16, 235]`, as a fraction of 255.
pub fn limited_range(full: f64) -> f64 {
    (16.0 + 219.0 * full) / 255.0
}

/// Higher is better: readable midtones, no clipped highlights or crushed shadows, some range.
pub fn score(stats: &LumaStats) -> f64 {
    let mut s = -(stats.avg - TARGET_LUMA).abs() * 3.0;
    if stats.max > 0.985 {
        s -= (stats.max - 0.985) * 18.0;
    }
    if stats.min < 0.02 {
        s -= (0.02 - stats.min) * 10.0;
    }
    s + (stats.max - stats.min).clamp(0.0, 0.35) * 2.0
}

/// Score a frame already in memory.
pub fn luma_score(frame: &FrameRGBA) -> BannerResult<(f64, LumaStats)> {
    let stats = luma_stats(frame)?;
    Ok((score(&stats), stats))
}

/// Score a still on disk.
pub fn score_png(path: &Path) -> BannerResult<(f64, LumaStats)> {
    let img = image::open(path)
        .with_context(|| format!("open still '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    luma_score(&FrameRGBA::new(width, height, img.into_raw(), false)?)
}
